pub mod defaults;

use crate::*;

/// Branching strategy of the search
#[derive( Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, serde::Serialize )]
pub enum Heuristic {
    /// smallest threshold first, try including it
    MinMis,
    /// smallest projected cover first, try excluding it
    MinCov,
}

/// Settings of one mining run
#[derive( Debug, Clone )]
pub struct Config {
    /// scales item frequencies into thresholds, in [0, 1]
    pub beta: f64,
    /// floor of every threshold
    pub mis_min: i64,
    pub heuristic: Heuristic,
    /// explicit lower bound on pattern support
    pub min_frequency: Option<Count>,
    pub min_length: usize,
    pub max_length: Option<usize>,
    /// only report closed patterns
    pub closed: bool,
    /// width of an item category in identifiers, None disables the category constraint
    pub category_size: Option<usize>,
    pub min_categories: usize,
    /// stop after visiting this many search nodes
    pub node_limit: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
	use defaults::*;
	Config {
	    beta: BETA,
	    mis_min: MIS_MIN,
	    heuristic: HEURISTIC,
	    min_frequency: None,
	    min_length: MIN_LENGTH,
	    max_length: None,
	    closed: CLOSED,
	    category_size: None,
	    min_categories: MIN_CATEGORIES,
	    node_limit: None,
	}
    }
}

impl Config {

    /// Rejects settings no search can run with
    pub fn validate( &self ) -> Result<(), MineError> {
	mis::validate( self.beta, self.mis_min )?;
	if let Some( max_length ) = self.max_length {
	    if max_length < self.min_length {
		return Err( MineError::invalid( "max_length", max_length, "must not be below min_length" ));
	    }
	}
	if self.category_size == Some( 0 ) {
	    return Err( MineError::invalid( "category_size", 0, "categories need at least one item" ));
	}
	if self.category_size.is_some() && self.min_categories == 0 {
	    return Err( MineError::invalid( "min_categories", 0, "must require at least one category" ));
	}
	if self.node_limit == Some( 0 ) {
	    return Err( MineError::invalid( "node_limit", 0, "must allow at least one node" ));
	}
	Ok( () )
    }
}
