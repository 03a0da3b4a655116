//! Filter evaluators used by the screening pipeline
//!
//! Both evaluators are pure: they take a fetched record or series plus the
//! caller's constraints and return a verdict.

pub mod fundamentals;
pub mod technical;

pub use fundamentals::{
    FieldConstraint, FundamentalsConstraintSet, Scalar, passes_fundamentals, resolve_path,
    validate_constraints,
};
pub use technical::{Comparator, TechnicalConstraint, latest_observation, passes_technical};
