use bit_set::BitSet;

use super::*;

const NAME: &str = "non_empty";

/// At least one watched item is present.
pub struct NonEmpty {
    watched: BitSet,
}

impl NonEmpty {
    pub fn new( nb_items: usize ) -> NonEmpty {
	NonEmpty{ watched: watch_all( nb_items ) }
    }
}

impl Propagator for NonEmpty {

    fn name( &self ) -> &'static str { NAME }

    fn watched( &self ) -> &BitSet { &self.watched }

    fn propagate( &self, domains: &Domains ) -> PropagationStatus {
	let partition = domains.partition( &self.watched );
	if !partition.present.is_empty() {
	    return Ok( Vec::new() );
	}
	let mut unknown = partition.unknown.iter();
	match (unknown.next(), unknown.next()) {
	    (None, _) => Err( Contradiction{ constraint: NAME, reason: "every item is absent" }),
	    (Some( last ), None) => Ok( vec!( Reduction::include( last ))),
	    _ => Ok( Vec::new() ),
	}
    }

    fn is_entailed( &self, domains: &Domains ) -> Entailment {
	let partition = domains.partition( &self.watched );
	if !partition.present.is_empty() {
	    Entailment::Satisfied
	} else if partition.unknown.is_empty() {
	    Entailment::Violated
	} else {
	    Entailment::Undetermined
	}
    }
}
