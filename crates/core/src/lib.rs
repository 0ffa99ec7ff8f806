//! Core types and traits for the ERP package calculator
//!
//! This crate provides the foundational types shared by every other crate:
//! - Catalog records (functional items, forms, interfaces, templates, add-on tiers)
//! - Copy-on-write selections and multiplier maps
//! - Risk profile and lookup table
//! - Engine input and result shapes
//! - Lenient numeric coercion used at every deserialization boundary
//! - The `EstimationEngine` trait implemented by the engine crate

pub mod catalog;
pub mod error;
pub mod input;
pub mod multipliers;
pub mod numeric;
pub mod policy;
pub mod preset;
pub mod result;
pub mod risk;
pub mod selection;
pub mod traits;

pub use catalog::{
    AddonTier, Catalog, CatalogItem, CatalogParts, EstimationConstants, FormItem, IndustryTemplate,
    InterfaceComplexity, InterfaceItem, LineOfBusiness, Priority, ScopeTriple, NO_TEMPLATE,
};
pub use error::{Error, Result};
pub use input::{
    AddonSelection, CommercialInputs, EffortOverride, EffortSliders, EstimateInput, TeamSizing,
};
pub use multipliers::MultiplierMap;
pub use numeric::{round_half_up, round_to_granularity, to_count};
pub use policy::PolicyThresholds;
pub use preset::{PresetDefinition, PresetOverride, PresetOverrides, Tier};
pub use result::{
    Advisory, AdvisoryCode, AddonQuote, Bucket, DiscountOutcome, EffortBuckets, EstimateResult,
    ReferenceFigures, ResolvedSummary, Timeline,
};
pub use risk::{
    ClientRelationship, ComplexityLevel, MigrationPath, RiskProfile, RiskTable, TimelinePressure,
};
pub use selection::Selection;
pub use traits::EstimationEngine;
