use bit_set::BitSet;

use crate::data::cover::{intersection_size, support};
use super::*;

const NAME: &str = "frequency";

/// Explicit lower bound on the support of the pattern: `|cover(P)| >= min_frequency`.
pub struct FrequencyBound<'a> {
    database: &'a TransactionalDatabase,
    min_frequency: Count,
    watched: BitSet,
}

impl <'a> FrequencyBound<'a> {
    pub fn new( database: &'a TransactionalDatabase, min_frequency: Count ) -> FrequencyBound<'a> {
	FrequencyBound {
	    database,
	    min_frequency,
	    watched: watch_all( database.nb_items() ),
	}
    }
}

impl <'a> Propagator for FrequencyBound<'a> {

    fn name( &self ) -> &'static str { NAME }

    fn watched( &self ) -> &BitSet { &self.watched }

    fn propagate( &self, domains: &Domains ) -> PropagationStatus {
	let partition = domains.partition( &self.watched );
	let cover = self.database.cover_of( partition.present.iter() );
	if support( &cover ) < self.min_frequency {
	    return Err( Contradiction{ constraint: NAME, reason: "support fell below the minimum frequency" });
	}
	Ok( partition.unknown.iter()
	    .filter( |item| intersection_size( &cover, self.database.cover( *item )) < self.min_frequency )
	    .map( Reduction::exclude )
	    .collect() )
    }

    fn is_entailed( &self, domains: &Domains ) -> Entailment {
	let cover = self.database.cover_of( domains.present() );
	if support( &cover ) < self.min_frequency {
	    Entailment::Violated
	} else if domains.is_complete() {
	    Entailment::Satisfied
	} else {
	    Entailment::Undetermined
	}
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data::fixtures::*;

    #[test]
    fn test_minimum_frequency() {
	let database = toy_database();
	let rule = FrequencyBound::new( &database, 2 );

	// every pair with item 0 occurs exactly once
	let domains = snapshot( 4, &[0], &[] );
	assert_eq!( rule.propagate( &domains ), Ok( vec!(
	    Reduction::exclude( 1 ), Reduction::exclude( 2 ), Reduction::exclude( 3 ),
	)));

	let domains = snapshot( 4, &[0, 1], &[] );
	assert!( rule.propagate( &domains ).is_err() );
	assert_eq!( rule.is_entailed( &domains ), Entailment::Violated );

	let domains = snapshot( 4, &[3], &[0, 1, 2] );
	assert_eq!( rule.is_entailed( &domains ), Entailment::Satisfied );
    }
}
