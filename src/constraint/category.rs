use bit_set::BitSet;
use tracing::*;

use super::*;

const NAME: &str = "category";

/// The pattern spans at least `min_categories` categories.
/// An item belongs to category `id / category_size`. Only categories whose identifier
/// range `[c * size, (c + 1) * size)` lies entirely at or below the largest item take part.
pub struct Category {
    min_categories: usize,
    /// eligible categories with their member items, ascending by category
    groups: Vec<(Item, BitSet)>,
    watched: BitSet,
}

impl Category {
    pub fn new( database: &TransactionalDatabase, category_size: usize, min_categories: usize ) -> Category {
	let max_item = database.items().iter().copied().max().unwrap_or( 0 );
	let eligible = (max_item + 1) / category_size.max( 1 );

	let mut groups: Vec<(Item, BitSet)> = (0 .. eligible)
	    .map( |category| (category, BitSet::with_capacity( database.nb_items() )))
	    .collect();
	for index in 0 .. database.nb_items() {
	    let category = database.item( index ) / category_size.max( 1 );
	    if category < eligible {
		groups[ category ].1.insert( index );
	    }
	}
	// a category without items in the data can never be reached
	groups.retain( |(_, members)| !members.is_empty() );

	let mut watched = BitSet::with_capacity( database.nb_items() );
	for (_, members) in &groups {
	    watched.union_with( members );
	}
	Category{ min_categories, groups, watched }
    }

    pub fn nb_categories( &self ) -> usize {
	self.groups.len()
    }

    /// Categories with a present member, and categories without one that still have an unknown member
    fn count( &self, domains: &Domains ) -> (usize, Vec<&BitSet>) {
	let mut present = 0;
	let mut reachable = Vec::new();
	for (_, members) in &self.groups {
	    if members.iter().any( |item| domains.state( item ) == ItemState::Present ) {
		present += 1;
	    } else if members.iter().any( |item| domains.is_unknown( item )) {
		reachable.push( members );
	    }
	}
	(present, reachable)
    }
}

impl Propagator for Category {

    fn name( &self ) -> &'static str { NAME }

    fn watched( &self ) -> &BitSet { &self.watched }

    fn propagate( &self, domains: &Domains ) -> PropagationStatus {
	let (present, reachable) = self.count( domains );
	if present >= self.min_categories {
	    return Ok( Vec::new() );
	}
	if present + reachable.len() < self.min_categories {
	    return Err( Contradiction{ constraint: NAME, reason: "too few categories remain reachable" });
	}
	if present + reachable.len() > self.min_categories {
	    return Ok( Vec::new() );
	}
	// every reachable category is needed: a lone candidate must be taken
	let mut reductions = Vec::new();
	for members in reachable {
	    let mut candidates = members.iter().filter( |item| domains.is_unknown( *item ));
	    if let (Some( last ), None) = (candidates.next(), candidates.next()) {
		reductions.push( Reduction::include( last ));
	    }
	}
	Ok( reductions )
    }

    fn is_entailed( &self, domains: &Domains ) -> Entailment {
	let (present, reachable) = self.count( domains );
	if present >= self.min_categories {
	    Entailment::Satisfied
	} else if present + reachable.len() < self.min_categories {
	    Entailment::Violated
	} else {
	    Entailment::Undetermined
	}
    }
}

impl Loggable for Category {
    fn log( &self, message: &str, level: Level ) {
	log_at( level, &format!( "{message}: {} categories, at least {} required", self.groups.len(), self.min_categories ));
	for (category, members) in &self.groups {
	    log_at( level, &format!( "category {category}: {:?}", members.iter().collect::<Vec<_>>() ));
	}
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// Items 0 to 6 in pairs: {0,1}, {2,3}, {4,5}; item 6 is left without a full category
    fn paired_database() -> TransactionalDatabase {
	TransactionalDatabase::new( (0 .. 7).collect(), vec!(
	    vec!( 0, 2, 4, 6 ), vec!( 1, 3, 5 ), vec!( 0, 3 ),
	)).unwrap()
    }

    #[test]
    fn test_groups() {
	let rule = Category::new( &paired_database(), 2, 2 );
	assert_eq!( rule.nb_categories(), 3 );
	assert!( !rule.watched().contains( 6 ));

	// ids 1, 4, 5: category {2,3} has no items, category {0,1} keeps item 1
	let sparse = TransactionalDatabase::from_transactions( vec!( vec!( 1, 4 ), vec!( 5 ))).unwrap();
	assert_eq!( Category::new( &sparse, 2, 1 ).nb_categories(), 2 );
    }

    #[test]
    fn test_propagate() {
	let rule = Category::new( &paired_database(), 2, 2 );

	assert_eq!( rule.propagate( &Domains::new( 7 )), Ok( Vec::new() ));
	// {0,1} is gone, both remaining categories are needed and {2,3} has one candidate left
	assert_eq!( rule.propagate( &snapshot( 7, &[], &[0, 1, 2] )), Ok( vec!( Reduction::include( 3 ))));
	assert_eq!( rule.propagate( &snapshot( 7, &[0], &[2, 3, 5] )), Ok( vec!( Reduction::include( 4 ))));
	assert_eq!( rule.propagate( &snapshot( 7, &[0, 2], &[] )), Ok( Vec::new() ));
	// item 6 belongs to no category
	assert!( rule.propagate( &snapshot( 7, &[6], &[0, 1, 2, 3] )).is_err() );
    }

    #[test]
    fn test_entailment() {
	let rule = Category::new( &paired_database(), 2, 2 );
	assert_eq!( rule.is_entailed( &snapshot( 7, &[0, 2], &[] )), Entailment::Satisfied );
	assert_eq!( rule.is_entailed( &Domains::new( 7 )), Entailment::Undetermined );
	assert_eq!( rule.is_entailed( &snapshot( 7, &[], &[0, 1, 2, 3] )), Entailment::Violated );
    }
}
