use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use tracing::*;
use tracing_subscriber::filter::LevelFilter;

use mismine::*;
use mismine::config::{Config, Heuristic, defaults};
use mismine::constraint::{Category, Closure, FreqRare, FrequencyBound, LengthBound, NonEmpty, Propagator};
use mismine::io::{PrettyFormatter, PatternFormatter};
use mismine::mis::MisFormatter;

/// Mines itemsets whose support reaches the smallest minimum item support among their items
#[derive( Parser, Debug )]
#[command( name = "miner", version )]
struct Args {
    /// Transactional data file, one transaction of whitespace separated items per line
    data: String,
    /// Scales item frequencies into thresholds
    #[arg( long, default_value_t = defaults::BETA )]
    beta: f64,
    /// Lower bound of every threshold
    #[arg( long, default_value_t = defaults::MIS_MIN, allow_negative_numbers = true )]
    mis_min: i64,
    #[arg( long, value_enum, default_value_t = defaults::HEURISTIC )]
    heuristic: Heuristic,
    /// Explicit lower bound on pattern support
    #[arg( long )]
    min_frequency: Option<Count>,
    #[arg( long, default_value_t = defaults::MIN_LENGTH )]
    min_length: usize,
    #[arg( long )]
    max_length: Option<usize>,
    /// Only report closed patterns
    #[arg( long )]
    closed: bool,
    /// Group items into categories of this many identifiers (`id / size`)
    #[arg( long )]
    category_size: Option<usize>,
    /// Categories a pattern must span, used with --category-size
    #[arg( long, default_value_t = defaults::MIN_CATEGORIES, requires = "category_size" )]
    min_categories: usize,
    /// Stop the search after this many nodes
    #[arg( long )]
    node_limit: Option<u64>,
    /// Write the patterns as JSON to this file
    #[arg( short, long )]
    output: Option<String>,
    /// Print the threshold of every item before mining
    #[arg( long )]
    show_mis: bool,
    /// More log output, repeat for trace level
    #[arg( short, long, action = clap::ArgAction::Count )]
    verbose: u8,
    /// Only log warnings and errors
    #[arg( short, long, conflicts_with = "verbose" )]
    quiet: bool,
}

impl Args {
    fn config( &self ) -> Config {
	Config {
	    beta: self.beta,
	    mis_min: self.mis_min,
	    heuristic: self.heuristic,
	    min_frequency: self.min_frequency,
	    min_length: self.min_length,
	    max_length: self.max_length,
	    closed: self.closed,
	    category_size: self.category_size,
	    min_categories: self.min_categories,
	    node_limit: self.node_limit,
	}
    }

    fn log_level( &self ) -> LevelFilter {
	match (self.quiet, self.verbose) {
	    (true, _) => LevelFilter::WARN,
	    (false, 0) => LevelFilter::INFO,
	    (false, 1) => LevelFilter::DEBUG,
	    _ => LevelFilter::TRACE,
	}
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    prepare_logging( args.log_level() );

    match run( &args ) {
	Ok( () ) => ExitCode::SUCCESS,
	Err( err ) => {
	    eprintln!( "error: {err}" );
	    ExitCode::FAILURE
	},
    }
}

fn run( args: &Args ) -> Result<(), MineError> {
    let config = args.config();
    config.validate()?;

    let start = Instant::now();
    let database = io::read_database( &args.data )?;
    database.log( &format!( "loaded {}", args.data ), Level::INFO );

    let calculator = MisCalculator::new( &database, config.beta, config.mis_min )?;
    calculator.log( "computed thresholds", Level::INFO );
    if args.show_mis {
	print!( "{}", MisFormatter::new().format_pretty( &calculator ));
    }
    let mis = calculator.compute_mis();

    let propagators = post_constraints( &database, &mis, &config )?;
    let selector = heuristic::create_selector( config.heuristic, &database, &mis );
    let mut miner = BacktrackMiner::new( selector );
    miner.set_node_limit( config.node_limit );
    let report = miner.mine( &database, &propagators );

    let elapsed = start.elapsed();
    let formatter = PatternFormatter::new();
    for pattern in &report.patterns {
	println!( "{}", formatter.format_pretty( pattern ));
    }
    if report.patterns.is_empty() {
	println!( "No patterns found." );
    }
    println!( "Total number of patterns: {}", report.patterns.len() );
    println!( "Execution time: {} ms", elapsed.as_millis() );
    if report.truncated {
	warn!( "search stopped at the node limit, the pattern list is incomplete" );
    }

    if let Some( path ) = &args.output {
	io::write_patterns( &report.patterns, path )?;
    }
    Ok( () )
}

/// Posts the constraints of a run in the order the host invokes them
fn post_constraints<'a>( database: &'a TransactionalDatabase, mis: &[Count], config: &Config ) -> Result<Vec<Box<dyn Propagator + 'a>>, MineError> {
    let nb_items = database.nb_items();
    let mut propagators: Vec<Box<dyn Propagator + 'a>> = vec!(
	Box::new( NonEmpty::new( nb_items )),
	Box::new( FreqRare::new( database, mis.to_vec() )? ),
    );
    if let Some( min_frequency ) = config.min_frequency {
	propagators.push( Box::new( FrequencyBound::new( database, min_frequency )));
    }
    if config.min_length > 1 || config.max_length.is_some() {
	propagators.push( Box::new( LengthBound::new( nb_items, config.min_length, config.max_length )));
    }
    if let Some( category_size ) = config.category_size {
	let category = Category::new( database, category_size, config.min_categories );
	category.log( "item categories", Level::INFO );
	propagators.push( Box::new( category ));
    }
    if config.closed {
	propagators.push( Box::new( Closure::new( database )));
    }
    debug!( "posted {}", propagators.iter().map( |p| p.name() ).collect::<Vec<_>>().join( ", " ));
    Ok( propagators )
}

fn prepare_logging( level: LevelFilter ) {
    let tracer = tracing_subscriber::fmt::fmt()
	.with_max_level( level )
	.with_writer( std::io::stderr )
	.finish();
    if tracing::subscriber::set_global_default( tracer ).is_err() {
	eprintln!( "a global logger was already installed" );
    }
}
