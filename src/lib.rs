
pub mod config;
pub mod constraint;
pub mod data;
pub mod error;
pub mod heuristic;
pub mod io;
pub mod miner;
pub mod mis;

use tracing::*;

pub use data::{Item, ItemIndex, Itemvec, Count, Cover, TransactionalDatabase};
pub use error::MineError;
pub use mis::MisCalculator;
pub use miner::{Miner, BacktrackMiner, Pattern, MiningReport};

/// Objects that can be recorded in the log
pub trait Loggable {
    fn log( &self, message: &str, level: tracing::Level );
}

/// Emits a message at a level only known at runtime.
pub(crate) fn log_at( level: Level, message: &str ) {
    match level {
	Level::ERROR => error!( "{message}" ),
	Level::WARN => warn!( "{message}" ),
	Level::INFO => info!( "{message}" ),
	Level::DEBUG => debug!( "{message}" ),
	Level::TRACE => trace!( "{message}" ),
    }
}
