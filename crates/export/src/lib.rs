//! Document export for the ERP package calculator
//!
//! Consumes engine output only:
//! - [`ProposalPayload`]: client-facing figures, phases, milestones and scope
//! - [`JsonExport`]: the configuration and calculations as flat JSON
//! - [`DocumentRenderer`] implementations for printable HTML and JSON

pub mod error;
pub mod format;
pub mod html;
pub mod json;
pub mod proposal;
pub mod renderer;

pub use error::ExportError;
pub use html::HtmlProposalRenderer;
pub use json::JsonExport;
pub use proposal::{
    AuditRow, CommercialRow, Financials, Milestone, Phase, ProposalOptions, ProposalPayload,
    ScopeColumn,
};
pub use renderer::{available_formats, create_renderer, DocumentRenderer, JsonProposalRenderer};
