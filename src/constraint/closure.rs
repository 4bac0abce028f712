use bit_set::BitSet;

use super::*;

const NAME: &str = "closure";

/// The pattern is closed: no item outside it occurs in every transaction of its cover.
///
/// An absent item whose cover contains `cover(P)` is a contradiction, an unknown one is forced
/// present. An unknown item `i` is excluded when adding it would make the pattern's cover a
/// subset of some absent item's cover.
pub struct Closure<'a> {
    database: &'a TransactionalDatabase,
    watched: BitSet,
}

impl <'a> Closure<'a> {
    pub fn new( database: &'a TransactionalDatabase ) -> Closure<'a> {
	Closure {
	    database,
	    watched: watch_all( database.nb_items() ),
	}
    }

    fn absorbed_by_absent( &self, cover: &Cover, absent: &BitSet ) -> bool {
	absent.iter().any( |item| cover.is_subset( self.database.cover( item )))
    }
}

impl <'a> Propagator for Closure<'a> {

    fn name( &self ) -> &'static str { NAME }

    fn watched( &self ) -> &BitSet { &self.watched }

    fn propagate( &self, domains: &Domains ) -> PropagationStatus {
	let partition = domains.partition( &self.watched );
	let cover = self.database.cover_of( partition.present.iter() );
	if self.absorbed_by_absent( &cover, &partition.absent ) {
	    return Err( Contradiction{ constraint: NAME, reason: "an absent item covers the pattern" });
	}

	let mut reductions = Vec::new();
	for item in partition.unknown.iter() {
	    let item_cover = self.database.cover( item );
	    if cover.is_subset( item_cover ) {
		reductions.push( Reduction::include( item ));
		continue;
	    }
	    let mut extended = cover.clone();
	    extended.intersect_with( item_cover );
	    if self.absorbed_by_absent( &extended, &partition.absent ) {
		reductions.push( Reduction::exclude( item ));
	    }
	}
	Ok( reductions )
    }

    fn is_entailed( &self, domains: &Domains ) -> Entailment {
	let partition = domains.partition( &self.watched );
	let cover = self.database.cover_of( partition.present.iter() );
	if self.absorbed_by_absent( &cover, &partition.absent ) {
	    Entailment::Violated
	} else if partition.unknown.is_empty() {
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
    fn test_closure_reductions() {
	let database = toy_database();
	let rule = Closure::new( &database );

	assert_eq!( rule.propagate( &snapshot( 4, &[0], &[] )), Ok( Vec::new() ));
	// {1,2} only occurs in the third transaction, which also holds 3
	assert_eq!( rule.propagate( &snapshot( 4, &[1, 2], &[] )), Ok( vec!( Reduction::include( 3 ))));
	assert!( rule.propagate( &snapshot( 4, &[1, 2], &[3] )).is_err() );
	// {2,3} would only occur where 1 occurs too
	assert_eq!( rule.propagate( &snapshot( 4, &[3], &[1] )), Ok( vec!( Reduction::exclude( 2 ))));
    }

    #[test]
    fn test_entailment() {
	let database = toy_database();
	let rule = Closure::new( &database );
	assert_eq!( rule.is_entailed( &snapshot( 4, &[0], &[1, 2, 3] )), Entailment::Satisfied );
	assert_eq!( rule.is_entailed( &snapshot( 4, &[1, 2], &[0, 3] )), Entailment::Violated );
	assert_eq!( rule.is_entailed( &snapshot( 4, &[1], &[] )), Entailment::Undetermined );
    }
}
