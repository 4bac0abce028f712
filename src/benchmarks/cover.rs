use tracing::{info, debug};
use tracing_subscriber;

use rand::prelude::*;
use statrs::distribution::DiscreteUniform;

use std::time::*;

use mismine::*;
use mismine::data::cover;

fn main() -> Result<(), MineError> {
    prepare_logging();

    let path = std::env::args().nth( 1 ).unwrap_or_else( || "./data/contextPasquier99.dat".to_string() );
    let database = io::read_database( &path )?;
    database.log( "benchmark data", tracing::Level::INFO );

    let n = 100000;
    benchmark_uniform_queries( &database, n );
    benchmark_projected_covers( &database, n / 100 );

    Ok( () )
}

/// Times cover_of for random queries, bucketed by query length
fn benchmark_uniform_queries( database: &TransactionalDatabase, number_queries: u64 ) -> Duration {
    let mut universe: Vec<ItemIndex> = (0 .. database.nb_items()).collect();
    let m = universe.len();
    if m == 0 {
	return Duration::ZERO;
    }
    // Use uniform to give shorter sequences a shot too
    let length_distribution = DiscreteUniform::new( 1, m as i64 ).expect( "at least one item" );

    let mut query_time = Duration::new( 0, 0 );
    let number_buckets = 10;
    let mut query_time_buckets = vec!( Duration::new( 0, 0 ); number_buckets );
    let mut gen = thread_rng();

    info!( "Start benchmark: {number_queries} uniform cover queries" );
    for _ in 0 .. number_queries {
	let query_length = length_distribution.sample( &mut gen ) as usize;
	let query = generate_random_query( &mut universe, query_length, &mut gen );

	let start = Instant::now();
	let support = cover::support( &database.cover_of( query ));
	let time_spent = Instant::now().duration_since( start );
	query_time += time_spent;
	debug!( "query of length {query_length} has support {support}" );

	let bucket_index = number_buckets * (query_length - 1) / m;
	query_time_buckets[ bucket_index ] += time_spent;
    }

    let length_query_times: Vec<u64> = query_time_buckets.iter().map( |d| d.as_millis() as u64 ).collect();
    info!( "Result: {number_queries} uniform queries took {}ms", query_time.as_millis() );
    info!( "time by length {length_query_times:?} [ms]" );
    query_time
}

/// Times the projection MinCov performs: cover of a random prefix intersected with every item
fn benchmark_projected_covers( database: &TransactionalDatabase, number_rounds: u64 ) -> Duration {
    let mut universe: Vec<ItemIndex> = (0 .. database.nb_items()).collect();
    let m = universe.len();
    let mut gen = thread_rng();
    let mut total = Duration::ZERO;

    info!( "Start benchmark: {number_rounds} rounds of projected covers" );
    for _ in 0 .. number_rounds {
	let prefix_length = gen.gen_range( 0 ..= m.min( 3 ));
	let prefix = generate_random_query( &mut universe, prefix_length, &mut gen );
	let start = Instant::now();
	let base = database.cover_of( prefix );
	let smallest = database.covers().iter()
	    .map( |item_cover| cover::intersection_size( &base, item_cover ))
	    .min();
	total += start.elapsed();
	debug!( "smallest projected cover {smallest:?}" );
    }
    info!( "Result: {number_rounds} projection rounds took {}ms", total.as_millis() );
    total
}

fn generate_random_query( universe: &mut Vec<ItemIndex>, length: usize, gen: &mut ThreadRng ) -> Vec<ItemIndex> {
    let m = universe.len();
    let mut query = Vec::with_capacity( length );
    for sample_count in 0 .. length {
	let i = gen.gen_range( sample_count .. m );
	query.push( universe[i] );
	// move i into sample count place to avoid drawing it again
	universe.swap( sample_count, i );
    }
    query.sort(); // canonical representation
    query
}

fn prepare_logging() {
    let tracer = tracing_subscriber::fmt::fmt()
	.with_max_level( tracing_subscriber::filter::LevelFilter::INFO )
	.finish();
    tracing::subscriber::set_global_default( tracer ).expect( "no other logger installed" );
}
