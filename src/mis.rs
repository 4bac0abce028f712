use tracing::*;

use crate::*;
use crate::io::PrettyFormatter;

/// Derives a minimum item support per item from its frequency:
/// `mis[i] = ceil( max( beta * frequency(i), mis_min ))`
#[derive( Debug )]
pub struct MisCalculator<'a> {
    database: &'a TransactionalDatabase,
    beta: f64,
    mis_min: Count,
}

/// One row of the threshold report
#[derive( Debug, Clone, Copy, PartialEq, Eq, serde::Serialize )]
pub struct MisEntry {
    pub item: Item,
    pub frequency: Count,
    pub mis: Count,
}

impl <'a> MisCalculator<'a> {

    /// Fails for beta outside [0, 1] or a negative mis_min.
    pub fn new( database: &'a TransactionalDatabase, beta: f64, mis_min: i64 ) -> Result<MisCalculator<'a>, MineError> {
	validate( beta, mis_min )?;
	Ok( MisCalculator {
	    database,
	    beta,
	    mis_min: mis_min as Count,
	})
    }

    pub fn beta( &self ) -> f64 { self.beta }
    pub fn mis_min( &self ) -> Count { self.mis_min }

    /// Thresholds indexed like the database items
    pub fn compute_mis( &self ) -> Vec<Count> {
	self.database.frequencies().iter()
	    .map( |frequency| threshold( self.beta, self.mis_min, *frequency ))
	    .collect()
    }

    pub fn report( &self ) -> Vec<MisEntry> {
	let mis = self.compute_mis();
	self.database.items().iter()
	    .zip( self.database.frequencies() )
	    .zip( mis )
	    .map( |((item, frequency), mis)| MisEntry{ item: *item, frequency: *frequency, mis })
	    .collect()
    }
}

/// Checks the policy pair without needing a database.
pub fn validate( beta: f64, mis_min: i64 ) -> Result<(), MineError> {
    if !(0.0 ..= 1.0).contains( &beta ) {
	return Err( MineError::invalid( "beta", beta, "must lie in [0, 1]" ));
    }
    if mis_min < 0 {
	return Err( MineError::invalid( "mis_min", mis_min, "must not be negative" ));
    }
    Ok( () )
}

fn threshold( beta: f64, mis_min: Count, frequency: Count ) -> Count {
    (beta * frequency as f64).max( mis_min as f64 ).ceil() as Count
}

impl <'a> Loggable for MisCalculator<'a> {
    fn log( &self, message: &str, level: Level ) {
	let mis = self.compute_mis();
	let lowest = mis.iter().min().copied().unwrap_or( self.mis_min );
	let highest = mis.iter().max().copied().unwrap_or( self.mis_min );
	log_at( level, &format!( "{message}: beta {:.3}, mis_min {}, thresholds in [{lowest}, {highest}]",
				 self.beta, self.mis_min ));
    }
}

/// Renders the `(item, frequency, mis)` report as a table
pub struct MisFormatter {
    show_header: bool,
}

impl MisFormatter {
    pub fn new() -> MisFormatter {
	MisFormatter{ show_header: true }
    }

    pub fn hide_header( &mut self ) { self.show_header = false; }
}

impl Default for MisFormatter {
    fn default() -> Self { MisFormatter::new() }
}

impl <'a> PrettyFormatter<MisCalculator<'a>> for MisFormatter {
    fn format_pretty( &self, calculator: &MisCalculator<'a> ) -> String {
	let mut output = String::new();
	if self.show_header {
	    output.push_str( "Item\tFrequency\tMIS\n" );
	}
	for entry in calculator.report() {
	    output.push_str( &format!( "{}\t{}\t\t{}\n", entry.item, entry.frequency, entry.mis ));
	}
	output
    }
}

#[cfg(test)]
mod test {
    use rand::prelude::*;

    use super::*;
    use crate::data::fixtures::*;

    #[test]
    fn test_toy_thresholds() {
	let database = toy_database();
	let calculator = MisCalculator::new( &database, 0.5, 1 ).unwrap();
	assert_eq!( calculator.compute_mis(), vec!( 2, 1, 1, 1 ));
	// repeated calls give the same array
	assert_eq!( calculator.compute_mis(), calculator.compute_mis() );

	let strict = MisCalculator::new( &database, 1.0, 0 ).unwrap();
	assert_eq!( strict.compute_mis(), vec!( 3, 2, 2, 2 ));
	let floor = MisCalculator::new( &database, 0.0, 3 ).unwrap();
	assert_eq!( floor.compute_mis(), vec!( 3, 3, 3, 3 ));
    }

    #[test]
    fn test_rejects_bad_policy() {
	let database = toy_database();
	assert!( MisCalculator::new( &database, -0.1, 1 ).is_err() );
	assert!( MisCalculator::new( &database, 1.5, 1 ).is_err() );
	assert!( MisCalculator::new( &database, f64::NAN, 1 ).is_err() );
	match MisCalculator::new( &database, 0.5, -2 ) {
	    Err( MineError::InvalidConfiguration{ parameter, value, .. } ) => {
		assert_eq!( parameter, "mis_min" );
		assert_eq!( value, "-2" );
	    },
	    other => panic!( "expected configuration error, got {other:?}" ),
	}
	assert!( MisCalculator::new( &database, 1.0, 0 ).is_ok() );
    }

    #[test]
    fn test_bounds_and_monotonicity() {
	let mut rng = StdRng::seed_from_u64( 11 );
	for _ in 0 .. 10 {
	    let database = random_database( &mut rng, 12, 40, 0.4 );
	    let beta = rng.gen_range( 0.0 ..= 1.0 );
	    let mis_min = rng.gen_range( 0 .. 5 );
	    let mis = MisCalculator::new( &database, beta, mis_min ).unwrap().compute_mis();

	    for i in 0 .. database.nb_items() {
		assert!( mis[i] >= mis_min as Count );
		for j in 0 .. database.nb_items() {
		    if database.frequency( i ) <= database.frequency( j ) {
			assert!( mis[i] <= mis[j] );
		    }
		}
	    }
	}
    }

    #[test]
    fn test_report() {
	let database = TransactionalDatabase::from_transactions( vec!( vec!( 5, 9 ), vec!( 9 ))).unwrap();
	let calculator = MisCalculator::new( &database, 0.5, 1 ).unwrap();
	assert_eq!( calculator.report(), vec!(
	    MisEntry{ item: 5, frequency: 1, mis: 1 },
	    MisEntry{ item: 9, frequency: 2, mis: 1 },
	));

	let table = MisFormatter::new().format_pretty( &calculator );
	assert_eq!( table, "Item\tFrequency\tMIS\n5\t1\t\t1\n9\t2\t\t1\n" );
    }
}
