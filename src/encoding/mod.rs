//! Search-space encoding for the metaheuristics.
//!
//! Uses the OSV/MAV dual-vector encoding:
//!
//! - **Operation sequence** (OSV): job ids in priority order. The k-th
//!   occurrence of job J = J's k-th operation.
//! - **Machine assignment** (MAV): chosen machine per operation.
//!
//! # Submodules
//!
//! - [`neighbor`]: the swap / reassign neighbor operator
//!
//! # Reference
//! - Cheng et al. (1996), "A Tutorial Survey of JSSP using GA"
//! - Bierwirth (1995), "A generalized permutation approach to JSSP"

pub mod neighbor;
mod solution;

pub use neighbor::{Move, NeighborOperator, reassign_move, swap_move};
pub use solution::EncodedSolution;
