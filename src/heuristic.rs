use crate::*;
use crate::config::Heuristic;
use crate::constraint::{Domains, ItemState};
use crate::data::cover::intersection_size;

/// Picks the next item to branch on and the state to try first.
/// Only affects the order of enumeration, never which patterns are found.
pub trait VariableSelector {
    fn name( &self ) -> &'static str;

    /// Next unknown item, None once the snapshot is complete
    fn select( &self, domains: &Domains ) -> Option<ItemIndex>;

    fn first_state( &self ) -> ItemState;
}

/// Branches on the item whose addition leaves the smallest cover, excluding it first.
pub struct MinCov<'a> {
    database: &'a TransactionalDatabase,
}

/// Branches on the item with the smallest threshold, including it first.
pub struct MinMis {
    mis: Vec<Count>,
}

impl <'a> MinCov<'a> {
    pub fn new( database: &'a TransactionalDatabase ) -> MinCov<'a> {
	MinCov{ database }
    }
}

impl <'a> VariableSelector for MinCov<'a> {

    fn name( &self ) -> &'static str { "min-cov" }

    fn select( &self, domains: &Domains ) -> Option<ItemIndex> {
	let cover = self.database.cover_of( domains.present() );
	domains.unknown()
	    .min_by_key( |item| intersection_size( &cover, self.database.cover( *item )))
    }

    fn first_state( &self ) -> ItemState { ItemState::Absent }
}

impl MinMis {
    pub fn new( mis: Vec<Count> ) -> MinMis {
	MinMis{ mis }
    }
}

impl VariableSelector for MinMis {

    fn name( &self ) -> &'static str { "min-mis" }

    fn select( &self, domains: &Domains ) -> Option<ItemIndex> {
	domains.unknown().min_by_key( |item| self.mis[ *item ] )
    }

    fn first_state( &self ) -> ItemState { ItemState::Present }
}

/// Instantiates the configured strategy
pub fn create_selector<'a>( heuristic: Heuristic, database: &'a TransactionalDatabase, mis: &[Count] ) -> Box<dyn VariableSelector + 'a> {
    match heuristic {
	Heuristic::MinCov => Box::new( MinCov::new( database )),
	Heuristic::MinMis => Box::new( MinMis::new( mis.to_vec() )),
    }
}
