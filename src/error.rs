use thiserror::Error;

use crate::Item;

/// Failures that stop a mining run before or after the search.
/// Contradictions found during the search are not errors, see `constraint::Contradiction`.
#[derive( Debug, Error )]
pub enum MineError {
    #[error( "line {line}: cannot read token {token:?} as an item ({reason})" )]
    DataFormat {
	line: usize,
	token: String,
	reason: String,
    },

    #[error( "the data source contains no transactions" )]
    EmptyDatabase,

    #[error( "transaction {transaction} references undefined item {item}" )]
    UndefinedItem {
	transaction: usize,
	item: Item,
    },

    #[error( "invalid configuration: {parameter} = {value} ({reason})" )]
    InvalidConfiguration {
	parameter: &'static str,
	value: String,
	reason: &'static str,
    },

    #[error( "threshold array has {found} entries but the database has {expected} items" )]
    ThresholdMismatch {
	expected: usize,
	found: usize,
    },

    #[error( "cannot access {path}: {source}" )]
    Io {
	path: String,
	#[source]
	source: std::io::Error,
    },

    #[error( "cannot serialize output: {0}" )]
    Output( #[from] serde_json::Error ),
}

impl MineError {
    pub(crate) fn invalid<V: ToString>( parameter: &'static str, value: V, reason: &'static str ) -> MineError {
	MineError::InvalidConfiguration {
	    parameter,
	    value: value.to_string(),
	    reason,
	}
    }
}

