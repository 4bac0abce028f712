use crate::config::{self};

pub const BETA: f64 = 0.5;
pub const MIS_MIN: i64 = 1;
pub const HEURISTIC: config::Heuristic = config::Heuristic::MinMis;
pub const MIN_LENGTH: usize = 1;
pub const CLOSED: bool = false;
pub const MIN_CATEGORIES: usize = 2;
