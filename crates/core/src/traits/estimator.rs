//! Estimation engine trait
//!
//! The engine is a pure function of its input and an injected catalog. It is
//! synchronous and infallible: bad inputs are coerced at deserialization and
//! policy problems surface as advisories in the result.
//!
//! # Example
//!
//! ```ignore
//! use erp_calc_core::traits::EstimationEngine;
//!
//! let engine = Estimator::new(catalog);
//! let result = engine.estimate(&input);
//! println!("{} days, {} total", result.final_days, result.grand_total);
//! ```

use crate::catalog::Catalog;
use crate::input::EstimateInput;
use crate::result::EstimateResult;

/// Turns a configured selection into effort, price and timeline
pub trait EstimationEngine: Send + Sync {
    /// Run the full pipeline; never mutates `input`
    fn estimate(&self, input: &EstimateInput) -> EstimateResult;

    /// The catalog this engine was built with
    fn catalog(&self) -> &Catalog;

    /// Convenience: estimate a batch of inputs against the same catalog
    fn estimate_all(&self, inputs: &[EstimateInput]) -> Vec<EstimateResult> {
        inputs.iter().map(|input| self.estimate(input)).collect()
    }
}
