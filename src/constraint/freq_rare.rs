use bit_set::BitSet;
use tracing::*;

use crate::data::cover::{intersection_size, support};
use super::*;

const NAME: &str = "freq_rare";

/// Frequency/rarity rule: a pattern must be supported by at least as many transactions
/// as the smallest MIS among its items.
///
/// Per call, with `P` the present items and `U` the unknown ones:
/// `s = min( mis[i] | i in P ∪ U )` bounds the final pattern's smallest threshold from below.
/// `|cover(P)| < s` is a contradiction. Every unknown `i` with `|cover(P) ∩ cover(i)| < s`
/// can never join a valid pattern and is excluded. Both tests use the `cover(P)` and `s` computed
/// at the start of the call; exclusions requested here may enable more on the next call.
pub struct FreqRare<'a> {
    database: &'a TransactionalDatabase,
    mis: Vec<Count>,
    watched: BitSet,
}

/// What the rule derives from one snapshot before pruning
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct SupportBound {
    /// cover of the present items
    pub cover: Cover,
    /// smallest threshold among present and unknown items, None if there are none
    pub required: Option<Count>,
}

impl <'a> FreqRare<'a> {

    /// Pre-check: one threshold per database item
    pub fn new( database: &'a TransactionalDatabase, mis: Vec<Count> ) -> Result<FreqRare<'a>, MineError> {
	if mis.len() != database.nb_items() {
	    return Err( MineError::ThresholdMismatch{ expected: database.nb_items(), found: mis.len() });
	}
	Ok( FreqRare {
	    database,
	    mis,
	    watched: watch_all( database.nb_items() ),
	})
    }

    pub fn mis( &self ) -> &[Count] {
	&self.mis
    }

    /// Computes `cover(P)` and `s` for the partition.
    pub fn bound( &self, partition: &Partition ) -> SupportBound {
	let cover = self.database.cover_of( partition.present.iter() );
	// with P empty this is the minimum over U alone
	let required = partition.present.union( &partition.unknown )
	    .map( |item| self.mis[ item ] )
	    .min();
	SupportBound{ cover, required }
    }

    fn check( bound: &SupportBound ) -> Result<Count, Contradiction> {
	match bound.required {
	    None => Err( Contradiction{ constraint: NAME, reason: "no item left to form a pattern" }),
	    Some( required ) if support( &bound.cover ) < required =>
		Err( Contradiction{ constraint: NAME, reason: "support of the present items is below the smallest threshold" }),
	    Some( required ) => Ok( required ),
	}
    }
}

impl <'a> Propagator for FreqRare<'a> {

    fn name( &self ) -> &'static str { NAME }

    fn watched( &self ) -> &BitSet { &self.watched }

    fn propagate( &self, domains: &Domains ) -> PropagationStatus {
	let partition = domains.partition( &self.watched );
	let bound = self.bound( &partition );
	let required = FreqRare::check( &bound )?;

	let reductions: Vec<Reduction> = partition.unknown.iter()
	    .filter( |item| intersection_size( &bound.cover, self.database.cover( *item )) < required )
	    .map( Reduction::exclude )
	    .collect();

	if !reductions.is_empty() {
	    trace!( "support {} needs {required}: excluding {} items", support( &bound.cover ), reductions.len() );
	}
	Ok( reductions )
    }

    fn is_entailed( &self, domains: &Domains ) -> Entailment {
	let partition = domains.partition( &self.watched );
	match FreqRare::check( &self.bound( &partition )) {
	    Err( _ ) => Entailment::Violated,
	    Ok( _ ) => Entailment::Undetermined,
	}
    }
}

#[cfg(test)]
mod test {
    use rand::prelude::*;

    use super::*;
    use crate::data::fixtures::*;
    use crate::mis::MisCalculator;

    fn excluded( status: PropagationStatus ) -> Vec<ItemIndex> {
	let mut items: Vec<ItemIndex> = status.expect( "no contradiction" ).iter()
	    .map( |reduction| {
		assert_eq!( reduction.state, ItemState::Absent );
		reduction.item
	    })
	    .collect();
	items.sort();
	items
    }

    /// Whether a complete pattern satisfies the rule
    fn accepted( database: &TransactionalDatabase, mis: &[Count], pattern: &[ItemIndex] ) -> bool {
	match pattern.iter().map( |i| mis[*i] ).min() {
	    None => false,
	    Some( required ) => support( &database.cover_of( pattern.iter().copied() )) >= required,
	}
    }

    #[test]
    fn test_no_pruning() {
	let database = toy_database();
	let mis = MisCalculator::new( &database, 0.5, 1 ).unwrap().compute_mis();
	let rule = FreqRare::new( &database, mis ).unwrap();

	let domains = snapshot( 4, &[0], &[] );
	let bound = rule.bound( &domains.partition( rule.watched() ));
	assert_eq!( support( &bound.cover ), 3 );
	assert_eq!( bound.required, Some( 1 ));
	assert!( excluded( rule.propagate( &domains )).is_empty() );
	assert_eq!( rule.is_entailed( &domains ), Entailment::Undetermined );
    }

    #[test]
    fn test_pruning() {
	let database = toy_database();
	let mis = MisCalculator::new( &database, 0.5, 1 ).unwrap().compute_mis();
	let rule = FreqRare::new( &database, mis ).unwrap();

	let domains = snapshot( 4, &[0, 1], &[] );
	let bound = rule.bound( &domains.partition( rule.watched() ));
	assert_eq!( bound.cover.iter().collect::<Vec<usize>>(), vec!( 0 ));
	assert_eq!( bound.required, Some( 1 ));
	assert_eq!( excluded( rule.propagate( &domains )), vec!( 2, 3 ));
    }

    #[test]
    fn test_contradiction() {
	let database = TransactionalDatabase::from_transactions( vec!(
	    vec!( 0, 1 ), vec!( 0, 2 ), vec!( 1, 2 ),
	)).unwrap();
	let rule = FreqRare::new( &database, vec!( 3, 3, 3 )).unwrap();

	// nothing decided: all of the data supports the empty set, but no single item reaches 3
	let mut domains = Domains::new( 3 );
	let reductions = rule.propagate( &domains ).unwrap();
	assert_eq!( reductions.len(), 3 );
	for reduction in reductions {
	    domains.apply( reduction ).unwrap();
	}
	assert!( rule.propagate( &domains ).is_err() );
	assert_eq!( rule.is_entailed( &domains ), Entailment::Violated );

	// item 0 present: support 2 is below the threshold 3
	let domains = snapshot( 3, &[0], &[] );
	assert!( rule.propagate( &domains ).is_err() );
    }

    #[test]
    fn test_threshold_count_mismatch() {
	let database = toy_database();
	assert!( FreqRare::new( &database, vec!( 1, 1 )).is_err() );
    }

    #[test]
    fn test_idempotent() {
	let mut rng = StdRng::seed_from_u64( 3 );
	for _ in 0 .. 30 {
	    let database = random_database( &mut rng, 7, 20, 0.5 );
	    let mis: Vec<Count> = (0 .. 7).map( |_| rng.gen_range( 1 .. 8 )).collect();
	    let rule = FreqRare::new( &database, mis ).unwrap();
	    let present: Vec<ItemIndex> = (0 .. 7).filter( |_| rng.gen_bool( 0.2 )).collect();
	    let domains = snapshot( 7, &present, &[] );

	    assert_eq!( rule.propagate( &domains ), rule.propagate( &domains ));
	}
    }

    #[test]
    fn test_sound_against_brute_force() {
	let mut rng = StdRng::seed_from_u64( 17 );
	let nb_items = 7;
	for _ in 0 .. 60 {
	    let database = random_database( &mut rng, nb_items, 16, 0.55 );
	    let mis: Vec<Count> = (0 .. nb_items).map( |_| rng.gen_range( 1 .. 7 )).collect();
	    let rule = FreqRare::new( &database, mis.clone() ).unwrap();

	    let mut present = Vec::new();
	    let mut absent = Vec::new();
	    for item in 0 .. nb_items {
		match rng.gen_range( 0 .. 4 ) {
		    0 => present.push( item ),
		    1 => absent.push( item ),
		    _ => {},
		}
	    }
	    let domains = snapshot( nb_items, &present, &absent );
	    let unknown: Vec<ItemIndex> = domains.unknown().collect();

	    let reductions = match rule.propagate( &domains ) {
		Ok( reductions ) => reductions,
		Err( _ ) => {
		    // no completion of this node may be accepted
		    for mask in 0u32 .. 1 << unknown.len() {
			let mut pattern = present.clone();
			pattern.extend( unknown.iter().enumerate().filter( |(bit, _)| mask & (1 << bit) != 0 ).map( |(_, i)| *i ));
			assert!( !accepted( &database, &mis, &pattern ));
		    }
		    continue;
		}
	    };

	    for reduction in reductions {
		let others: Vec<ItemIndex> = unknown.iter().copied().filter( |i| *i != reduction.item ).collect();
		for mask in 0u32 .. 1 << others.len() {
		    let mut pattern = present.clone();
		    pattern.push( reduction.item );
		    pattern.extend( others.iter().enumerate().filter( |(bit, _)| mask & (1 << bit) != 0 ).map( |(_, i)| *i ));
		    assert!( !accepted( &database, &mis, &pattern ), "excluded {} but {pattern:?} is valid", reduction.item );
		}
	    }
	}
    }
}
