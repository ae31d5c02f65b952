//! Minimax polynomial approximations of elementary functions, computed by the
//! Remez exchange algorithm in arbitrary precision.

pub mod approx;
pub mod emit;
pub mod format;
pub mod functions;
pub mod opts;
pub mod precision;
pub mod utils;
