//! dfkit prelude.
//!
//! This module contains the most used types and traits so that you can
//! import them easily as a group.
//!
//! ```
//! use dfkit::prelude::*;
//! ```

#[doc(no_inline)]
pub use crate::config::{CommonConfig, HookeJeevesConfig, MethodConfig, NelderMeadConfig};

#[doc(no_inline)]
pub use crate::error::SearchError;

#[doc(no_inline)]
pub use crate::objective::{Evaluator, Objective};

#[doc(no_inline)]
pub use crate::search::{HookeJeeves, IteratedSearch, Method, NelderMead, Simplex};

#[doc(no_inline)]
pub use crate::solution::EvaluatedSolution;

#[doc(no_inline)]
pub use crate::stats::{SearchStats, SolutionRecord, StatsEntry};
