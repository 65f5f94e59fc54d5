//! Derivative-free optimization of box-constrained continuous functions.
//!
//! Two local search methods are provided, Nelder-Mead simplex search and
//! Hooke-Jeeves pattern search, together with a multi-start harness that
//! restarts them under a global evaluation budget and records the full
//! search trajectory.

pub mod config;
pub mod error;
pub mod objective;
pub mod prelude;
pub mod search;
pub mod solution;
pub mod stats;
