//! Core traits for the calculator
//!
//! ```text
//! Estimation:
//!   - EstimationEngine: input + catalog → effort, price, timeline, advisories
//! ```
//!
//! Collaborator traits live next to their implementations: the key-value
//! store in the persistence crate, document renderers in the export crate.

mod estimator;

pub use estimator::EstimationEngine;
