//! Flat JSON export of an estimate

use crate::error::ExportError;
use chrono::{DateTime, Utc};
use erp_calc_core::{EstimateInput, EstimateResult};
use serde::{Deserialize, Serialize};

/// The configuration that went in, the figures that came out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonExport {
    pub configuration: EstimateInput,
    pub calculations: EstimateResult,
    pub timestamp: DateTime<Utc>,
}

impl JsonExport {
    pub fn new(input: &EstimateInput, result: &EstimateResult, timestamp: DateTime<Utc>) -> Self {
        Self {
            configuration: input.clone(),
            calculations: result.clone(),
            timestamp,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Download name, e.g. `ERP_Estimate_standard_20260105.json`
    pub fn file_name(&self) -> String {
        format!(
            "ERP_Estimate_{}_{}.json",
            self.calculations.tier,
            self.timestamp.format("%Y%m%d")
        )
    }
}
