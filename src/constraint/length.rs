use bit_set::BitSet;

use super::*;

const NAME: &str = "length";

/// Bounds the number of items in the pattern: `min_length <= |P| <= max_length`.
pub struct LengthBound {
    min_length: usize,
    max_length: usize,
    watched: BitSet,
}

impl LengthBound {
    pub fn new( nb_items: usize, min_length: usize, max_length: Option<usize> ) -> LengthBound {
	LengthBound {
	    min_length,
	    max_length: max_length.unwrap_or( nb_items ),
	    watched: watch_all( nb_items ),
	}
    }
}

impl Propagator for LengthBound {

    fn name( &self ) -> &'static str { NAME }

    fn watched( &self ) -> &BitSet { &self.watched }

    fn propagate( &self, domains: &Domains ) -> PropagationStatus {
	let partition = domains.partition( &self.watched );
	let present = partition.present.len();
	let reachable = present + partition.unknown.len();

	if present > self.max_length {
	    Err( Contradiction{ constraint: NAME, reason: "pattern is longer than allowed" })
	} else if reachable < self.min_length {
	    Err( Contradiction{ constraint: NAME, reason: "pattern cannot reach the minimum length" })
	} else if present == self.max_length {
	    Ok( partition.unknown.iter().map( Reduction::exclude ).collect() )
	} else if reachable == self.min_length {
	    Ok( partition.unknown.iter().map( Reduction::include ).collect() )
	} else {
	    Ok( Vec::new() )
	}
    }

    fn is_entailed( &self, domains: &Domains ) -> Entailment {
	let partition = domains.partition( &self.watched );
	let present = partition.present.len();
	let reachable = present + partition.unknown.len();
	if present > self.max_length || reachable < self.min_length {
	    Entailment::Violated
	} else if present >= self.min_length && reachable <= self.max_length {
	    Entailment::Satisfied
	} else {
	    Entailment::Undetermined
	}
    }
}
