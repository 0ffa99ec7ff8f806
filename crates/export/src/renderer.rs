//! Document renderers

use crate::error::ExportError;
use crate::html::HtmlProposalRenderer;
use crate::proposal::ProposalPayload;
use erp_calc_engine::ReportLayout;

/// Turns a proposal payload into a document body
pub trait DocumentRenderer: Send + Sync {
    fn name(&self) -> &'static str;

    /// MIME type of the rendered body
    fn content_type(&self) -> &'static str;

    fn render(&self, proposal: &ProposalPayload) -> Result<String, ExportError>;
}

/// The payload itself, pretty-printed
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonProposalRenderer;

impl DocumentRenderer for JsonProposalRenderer {
    fn name(&self) -> &'static str {
        "json"
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn render(&self, proposal: &ProposalPayload) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(proposal)?)
    }
}

/// Create a renderer by format name
pub fn create_renderer(
    format: &str,
    layout: ReportLayout,
) -> Result<Box<dyn DocumentRenderer>, ExportError> {
    match format.trim().to_ascii_lowercase().as_str() {
        "html" => Ok(Box::new(HtmlProposalRenderer::new(layout))),
        "json" => Ok(Box::new(JsonProposalRenderer)),
        other => Err(ExportError::UnknownFormat(other.to_string())),
    }
}

pub fn available_formats() -> &'static [&'static str] {
    &["html", "json"]
}
