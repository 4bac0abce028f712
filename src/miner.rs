use tracing::*;

use crate::*;
use crate::constraint::{Contradiction, Domains, Entailment, Propagator, Reduction};
use crate::data::cover::support;
use crate::heuristic::VariableSelector;

/// Enumerates every complete assignment that satisfies the posted propagators.
pub trait Miner {
    fn mine<'a>( &mut self, database: &'a TransactionalDatabase, propagators: &[Box<dyn Propagator + 'a>] ) -> MiningReport;
}

/// A mined itemset in original identifiers together with its measures
#[derive( Debug, Clone, PartialEq, Eq, Hash, serde::Serialize )]
pub struct Pattern {
    pub items: Itemvec,
    /// `[frequency, length]`
    pub measures: Vec<Count>,
}

#[derive( Debug, Default, serde::Serialize )]
pub struct MiningReport {
    pub patterns: Vec<Pattern>,
    /// search nodes visited
    pub nodes: u64,
    /// nodes closed by a contradiction or a violated constraint
    pub failures: u64,
    /// the node limit stopped the search before it was exhausted
    pub truncated: bool,
}

/// Depth-first backtracking with propagation to a fixpoint at every node.
/// Each node owns a snapshot of the domains, so backtracking drops the child's copy.
pub struct BacktrackMiner<'s> {
    selector: Box<dyn VariableSelector + 's>,
    node_limit: Option<u64>,
}

impl <'s> Miner for BacktrackMiner<'s> {
    fn mine<'a>( &mut self, database: &'a TransactionalDatabase, propagators: &[Box<dyn Propagator + 'a>] ) -> MiningReport {
	let _span = info_span!( "mining", heuristic = self.selector.name() ).entered();
	let mut report = MiningReport::default();

	// the last element is explored next
	let mut open: Vec<Domains> = vec!( Domains::new( database.nb_items() ));
	while let Some( mut domains ) = open.pop() {
	    if self.node_limit.map_or( false, |limit| report.nodes >= limit ) {
		info!( "node limit reached after {} nodes", report.nodes );
		report.truncated = true;
		break;
	    }
	    report.nodes += 1;

	    if let Err( contradiction ) = self.fixpoint( &mut domains, propagators ) {
		trace!( "backtrack at {domains:?}: {contradiction}" );
		report.failures += 1;
		continue;
	    }

	    match self.selector.select( &domains ) {
		None => match self.conclude( database, &domains, propagators ) {
		    Some( pattern ) => {
			pattern.log( "found pattern", Level::DEBUG );
			report.patterns.push( pattern );
		    },
		    None => report.failures += 1,
		},
		Some( item ) => {
		    let first = self.selector.first_state();
		    for state in [first.opposite(), first] {
			let mut child = domains.clone();
			child.apply( Reduction{ item, state })
			    .expect( "selected items are unknown" );
			open.push( child );
		    }
		},
	    }
	}

	info!( "{} patterns, {} nodes, {} failures", report.patterns.len(), report.nodes, report.failures );
	report
    }
}

impl <'s> BacktrackMiner<'s> {

    pub fn new( selector: Box<dyn VariableSelector + 's> ) -> BacktrackMiner<'s> {
	BacktrackMiner {
	    selector,
	    node_limit: None,
	}
    }

    pub fn set_node_limit( &mut self, limit: Option<u64> ) {
	self.node_limit = limit;
    }

    /// Invokes every propagator until a full round leaves the snapshot unchanged.
    pub fn fixpoint<'a>( &self, domains: &mut Domains, propagators: &[Box<dyn Propagator + 'a>] ) -> Result<(), Contradiction> {
	let mut changed = true;
	while changed {
	    changed = false;
	    for propagator in propagators {
		for reduction in propagator.propagate( domains )? {
		    changed |= domains.apply( reduction )?;
		}
	    }
	}
	Ok( () )
    }

    /// Turns a complete snapshot into a pattern unless some constraint reports a violation.
    fn conclude<'a>( &self, database: &TransactionalDatabase, domains: &Domains, propagators: &[Box<dyn Propagator + 'a>] ) -> Option<Pattern> {
	if let Some( violated ) = propagators.iter().find( |p| p.is_entailed( domains ) == Entailment::Violated ) {
	    debug!( "complete assignment {domains:?} violates {}", violated.name() );
	    return None;
	}
	let present: Vec<ItemIndex> = domains.present().collect();
	let frequency = support( &database.cover_of( present.iter().copied() ));
	Some( Pattern {
	    items: database.to_items( present.iter().copied() ),
	    measures: vec!( frequency, present.len() as Count ),
	})
    }
}

impl Pattern {
    pub fn frequency( &self ) -> Count {
	self.measures[0]
    }

    pub fn length( &self ) -> usize {
	self.items.len()
    }
}

impl Loggable for Pattern {
    fn log( &self, message: &str, level: Level ) {
	log_at( level, &format!( "{message}: {:?} freq={}", self.items, self.frequency() ));
    }
}
