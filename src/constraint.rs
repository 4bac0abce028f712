use std::fmt;

use bit_set::BitSet;
use thiserror::Error;

use crate::*;

mod category;
mod closure;
mod freq_rare;
mod frequency;
mod length;
mod non_empty;

pub use category::Category;
pub use closure::Closure;
pub use freq_rare::FreqRare;
pub use frequency::FrequencyBound;
pub use length::LengthBound;
pub use non_empty::NonEmpty;

/// Decision state of one item variable
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash )]
pub enum ItemState {
    /// forced into the pattern
    Present,
    /// forced out of the pattern
    Absent,
    Unknown,
}

impl ItemState {
    /// The other terminal state. Unknown stays unknown.
    pub fn opposite( self ) -> ItemState {
	match self {
	    ItemState::Present => ItemState::Absent,
	    ItemState::Absent => ItemState::Present,
	    ItemState::Unknown => ItemState::Unknown,
	}
    }
}

/// Snapshot of every item's state at one search node. Owned by the host; propagators only read it.
#[derive( Clone, PartialEq, Eq )]
pub struct Domains {
    states: Vec<ItemState>,
}

/// Three-way split of the watched items, recomputed from a snapshot on every call
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct Partition {
    pub present: BitSet,
    pub absent: BitSet,
    pub unknown: BitSet,
}

/// Request to move an unknown item into a terminal state
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash )]
pub struct Reduction {
    pub item: ItemIndex,
    pub state: ItemState,
}

/// No pattern exists below the current node. The host backtracks.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Error )]
#[error( "{constraint}: {reason}" )]
pub struct Contradiction {
    pub constraint: &'static str,
    pub reason: &'static str,
}

/// Outcome of one propagation call: the requested reductions, possibly none, or a contradiction.
pub type PropagationStatus = Result<Vec<Reduction>, Contradiction>;

#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub enum Entailment {
    Satisfied,
    Violated,
    Undetermined,
}

/// A domain-pruning rule the host invokes whenever a watched item changes.
/// Implementations hold no per-node state; everything is derived from the snapshot handed in.
pub trait Propagator {
    fn name( &self ) -> &'static str;

    /// Items whose changes trigger this propagator
    fn watched( &self ) -> &BitSet;

    /// Reads the snapshot and either requests reductions or signals a contradiction.
    /// Calling it again on an unchanged snapshot yields the same answer.
    fn propagate( &self, domains: &Domains ) -> PropagationStatus;

    fn is_entailed( &self, domains: &Domains ) -> Entailment;
}

impl Domains {

    /// Every item unknown
    pub fn new( nb_items: usize ) -> Domains {
	Domains{ states: vec![ ItemState::Unknown; nb_items ] }
    }

    pub fn from_states( states: Vec<ItemState> ) -> Domains {
	Domains{ states }
    }

    pub fn len( &self ) -> usize {
	self.states.len()
    }

    pub fn is_empty( &self ) -> bool {
	self.states.is_empty()
    }

    pub fn state( &self, item: ItemIndex ) -> ItemState {
	self.states[ item ]
    }

    pub fn is_unknown( &self, item: ItemIndex ) -> bool {
	self.states[ item ] == ItemState::Unknown
    }

    pub fn is_complete( &self ) -> bool {
	self.states.iter().all( |state| *state != ItemState::Unknown )
    }

    pub fn iter_state( &self, state: ItemState ) -> impl Iterator<Item = ItemIndex> + '_ {
	self.states.iter()
	    .enumerate()
	    .filter( move |(_, s)| **s == state )
	    .map( |(item, _)| item )
    }

    pub fn present( &self ) -> impl Iterator<Item = ItemIndex> + '_ {
	self.iter_state( ItemState::Present )
    }

    pub fn unknown( &self ) -> impl Iterator<Item = ItemIndex> + '_ {
	self.iter_state( ItemState::Unknown )
    }

    pub fn absent( &self ) -> impl Iterator<Item = ItemIndex> + '_ {
	self.iter_state( ItemState::Absent )
    }

    /// Applies a reduction. Returns whether the snapshot changed.
    /// Forcing an item into the opposite of its decided state is a contradiction.
    pub fn apply( &mut self, reduction: Reduction ) -> Result<bool, Contradiction> {
	let current = self.states[ reduction.item ];
	if current == reduction.state || reduction.state == ItemState::Unknown {
	    Ok( false )
	} else if current == ItemState::Unknown {
	    self.states[ reduction.item ] = reduction.state;
	    Ok( true )
	} else {
	    Err( Contradiction{ constraint: "domain", reason: "item forced into both present and absent" })
	}
    }

    /// Splits the watched items by state
    pub fn partition( &self, watched: &BitSet ) -> Partition {
	let mut partition = Partition {
	    present: BitSet::with_capacity( self.len() ),
	    absent: BitSet::with_capacity( self.len() ),
	    unknown: BitSet::with_capacity( self.len() ),
	};
	for item in watched.iter() {
	    match self.states[ item ] {
		ItemState::Present => partition.present.insert( item ),
		ItemState::Absent => partition.absent.insert( item ),
		ItemState::Unknown => partition.unknown.insert( item ),
	    };
	}
	partition
    }
}

impl fmt::Debug for Domains {
    fn fmt( &self, f: &mut fmt::Formatter<'_> ) -> fmt::Result {
	let symbols: String = self.states.iter()
	    .map( |state| match state {
		ItemState::Present => '1',
		ItemState::Absent => '0',
		ItemState::Unknown => '?',
	    })
	    .collect();
	write!( f, "[{symbols}]" )
    }
}

impl Reduction {
    pub fn exclude( item: ItemIndex ) -> Reduction {
	Reduction{ item, state: ItemState::Absent }
    }

    pub fn include( item: ItemIndex ) -> Reduction {
	Reduction{ item, state: ItemState::Present }
    }
}

/// Watch set covering items `0 .. nb_items`
pub fn watch_all( nb_items: usize ) -> BitSet {
    (0 .. nb_items).collect()
}

/// Snapshot with the given items present and absent, everything else unknown
#[cfg(test)]
pub(crate) fn snapshot( nb_items: usize, present: &[ItemIndex], absent: &[ItemIndex] ) -> Domains {
    let mut domains = Domains::new( nb_items );
    for item in present {
	domains.apply( Reduction::include( *item )).unwrap();
    }
    for item in absent {
	domains.apply( Reduction::exclude( *item )).unwrap();
    }
    domains
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_apply() {
	let mut domains = Domains::new( 3 );
	assert_eq!( domains.apply( Reduction::include( 0 )), Ok( true ));
	assert_eq!( domains.apply( Reduction::include( 0 )), Ok( false ));
	assert!( domains.apply( Reduction::exclude( 0 )).is_err() );
	assert_eq!( domains.apply( Reduction::exclude( 2 )), Ok( true ));

	assert_eq!( domains.present().collect::<Vec<_>>(), vec!( 0 ));
	assert_eq!( domains.unknown().collect::<Vec<_>>(), vec!( 1 ));
	assert_eq!( domains.absent().collect::<Vec<_>>(), vec!( 2 ));
	assert!( !domains.is_complete() );
	assert_eq!( format!( "{domains:?}" ), "[1?0]" );
    }

    #[test]
    fn test_partition_respects_watch_set() {
	let domains = snapshot( 5, &[0, 3], &[1] );
	let watched: BitSet = vec!( 0, 1, 2 ).into_iter().collect();
	let partition = domains.partition( &watched );

	assert_eq!( partition.present.iter().collect::<Vec<_>>(), vec!( 0 ));
	assert_eq!( partition.absent.iter().collect::<Vec<_>>(), vec!( 1 ));
	assert_eq!( partition.unknown.iter().collect::<Vec<_>>(), vec!( 2 ));
    }
}
