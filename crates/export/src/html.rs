//! Printable HTML proposal
//!
//! A single self-contained page with inline CSS. Every piece of text that
//! comes from the payload is escaped.

use crate::error::ExportError;
use crate::format::{currency, thousands};
use crate::proposal::ProposalPayload;
use crate::renderer::DocumentRenderer;
use erp_calc_engine::ReportLayout;

pub struct HtmlProposalRenderer {
    pub title: String,
    pub layout: ReportLayout,
}

impl HtmlProposalRenderer {
    pub fn new(layout: ReportLayout) -> Self {
        Self {
            title: "Cloud ERP Implementation Proposal".to_string(),
            layout,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    fn header(&self, p: &ProposalPayload, html: &mut String) {
        html.push_str("<header class=\"brand\">\n");
        html.push_str(&format!("<h1>{}</h1>\n", escape_html(&self.title)));
        html.push_str(&format!(
            "<p>Prepared for <strong>{}</strong> &middot; Proposal {} &middot; Valid until {}</p>\n",
            escape_html(&p.client_name),
            escape_html(&p.proposal_id),
            p.valid_until.format("%d %b %Y")
        ));
        html.push_str("</header>\n");
    }

    fn key_figures(&self, p: &ProposalPayload, html: &mut String) {
        html.push_str("<section class=\"hero\">\n");
        html.push_str(&format!(
            "<div class=\"big\">{}</div>\n",
            escape_html(&currency(&p.currency_symbol, p.grand_total))
        ));
        html.push_str(&format!(
            "<div class=\"sub\">{} mandays &middot; {} weeks &middot; {} team members</div>\n",
            thousands(p.total_mandays),
            p.timeline_weeks,
            p.team_size
        ));
        html.push_str("</section>\n");
    }

    fn executive_summary(&self, p: &ProposalPayload, html: &mut String) {
        let symbol = p.currency_symbol.as_str();
        let mut text = format!(
            "{} is proposed a {} Cloud ERP implementation of {} mandays, delivered over {} weeks. \
             The implementation is priced at {}.",
            p.client_name,
            p.package_tier.display_name(),
            thousands(p.total_mandays),
            p.timeline_weeks,
            currency(symbol, p.financials.implementation_subtotal)
        );
        if let Some(template) = &p.industry_template {
            text.push_str(&format!(" Scope is tailored for the {} industry.", template));
        }
        if p.financials.addon_price > 0 {
            text.push_str(&format!(
                " Application management support is quoted at {}{}.",
                currency(symbol, p.financials.addon_price),
                if p.financials.addon_included {
                    " and included in the total"
                } else {
                    " in addition"
                }
            ));
        }

        html.push_str("<h2>Executive Summary</h2>\n");
        html.push_str(&format!("<p>{}</p>\n", escape_html(&text)));
    }

    fn effort_table(&self, p: &ProposalPayload, html: &mut String) {
        html.push_str("<h2>Effort Breakdown</h2>\n<table>\n");
        html.push_str("<thead><tr><th>Item</th><th class=\"num\">Days</th></tr></thead>\n<tbody>\n");
        for row in self.layout.render(&p.effort) {
            html.push_str(&format!(
                "<tr><td>{}</td><td class=\"num\">{}</td></tr>\n",
                escape_html(&row.label),
                thousands(row.days)
            ));
        }
        html.push_str(&format!(
            "<tr class=\"total\"><td>Estimated effort</td><td class=\"num\">{}</td></tr>\n",
            thousands(p.effort.total())
        ));
        html.push_str(&format!(
            "<tr class=\"total\"><td><strong>Quoted mandays</strong></td><td class=\"num\"><strong>{}</strong></td></tr>\n",
            thousands(p.total_mandays)
        ));
        html.push_str("</tbody>\n</table>\n");
    }

    fn financial_table(&self, p: &ProposalPayload, html: &mut String) {
        let symbol = p.currency_symbol.as_str();
        html.push_str("<h2>Financial Summary</h2>\n<table>\n");
        html.push_str("<thead><tr><th>Item</th><th class=\"num\">Base</th><th class=\"num\">Net</th><th>Notes</th></tr></thead>\n<tbody>\n");
        for row in &p.commercials {
            html.push_str(&format!(
                "<tr><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td>{}</td></tr>\n",
                escape_html(&row.label),
                escape_html(&currency(symbol, row.base)),
                escape_html(&currency(symbol, row.net)),
                escape_html(&row.notes)
            ));
        }
        html.push_str("</tbody>\n");
        html.push_str(&format!(
            "<tfoot><tr><td colspan=\"2\">Grand Total</td><td class=\"num\">{}</td><td></td></tr></tfoot>\n",
            escape_html(&currency(symbol, p.grand_total))
        ));
        html.push_str("</table>\n");
        html.push_str(&format!("<p class=\"note\">{}</p>\n", escape_html(&p.price_note)));
    }

    fn milestones(&self, p: &ProposalPayload, html: &mut String) {
        html.push_str("<h2>Payment Milestones</h2>\n<table>\n");
        html.push_str("<thead><tr><th>Milestone</th><th>When</th><th class=\"num\">Amount</th></tr></thead>\n<tbody>\n");
        for m in &p.milestones {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td class=\"num\">{}</td></tr>\n",
                escape_html(&m.name),
                escape_html(&m.when),
                escape_html(&m.display)
            ));
        }
        html.push_str("</tbody>\n</table>\n");
    }

    fn timeline(&self, p: &ProposalPayload, html: &mut String) {
        html.push_str("<h2>Timeline</h2>\n");
        html.push_str(&format!("<p>{}</p>\n<table>\n", escape_html(&p.timeline_summary)));
        html.push_str("<thead><tr><th>Phase</th><th>Start</th><th>End</th><th class=\"num\">Weeks</th></tr></thead>\n<tbody>\n");
        for phase in &p.phases {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td class=\"num\">{}</td></tr>\n",
                escape_html(&phase.name),
                phase.start.format("%Y-%m-%d"),
                phase.end.format("%Y-%m-%d"),
                phase.weeks
            ));
        }
        html.push_str("</tbody>\n</table>\n");
    }

    fn scope(&self, p: &ProposalPayload, html: &mut String) {
        html.push_str("<h2>Scope</h2>\n<div class=\"scope\">\n");
        for column in &p.scope_columns {
            html.push_str(&format!("<div class=\"card\">\n<h3>{}</h3>\n", escape_html(&column.title)));
            if column.items.is_empty() {
                html.push_str("<p class=\"empty\">None selected</p>\n");
            } else {
                html.push_str("<ul>\n");
                for item in &column.items {
                    html.push_str(&format!("<li>{}</li>\n", escape_html(item)));
                }
                html.push_str("</ul>\n");
            }
            html.push_str("</div>\n");
        }
        html.push_str("</div>\n");
    }

    fn considerations(&self, p: &ProposalPayload, html: &mut String) {
        html.push_str("<h2>Considerations</h2>\n");
        if p.warnings.is_empty() {
            html.push_str("<p class=\"empty\">No open considerations.</p>\n");
            return;
        }
        html.push_str("<ul class=\"warnings\">\n");
        for w in &p.warnings {
            html.push_str(&format!(
                "<li class=\"{}\">{}</li>\n",
                w.code.as_str(),
                escape_html(&w.message)
            ));
        }
        html.push_str("</ul>\n");
    }

    fn audit(&self, p: &ProposalPayload, html: &mut String) {
        html.push_str("<h2>Inputs</h2>\n<table class=\"audit\">\n<tbody>\n");
        for row in &p.input_audit {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td></tr>\n",
                escape_html(&row.key),
                escape_html(&row.value)
            ));
        }
        html.push_str("</tbody>\n</table>\n");
    }
}

impl DocumentRenderer for HtmlProposalRenderer {
    fn name(&self) -> &'static str {
        "html"
    }

    fn content_type(&self) -> &'static str {
        "text/html; charset=utf-8"
    }

    fn render(&self, p: &ProposalPayload) -> Result<String, ExportError> {
        let mut html = String::with_capacity(16 * 1024);

        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"UTF-8\">\n");
        html.push_str(&format!(
            "<title>{} - {}</title>\n",
            escape_html(&self.title),
            escape_html(&p.client_name)
        ));
        html.push_str("<style>\n");
        html.push_str(INLINE_CSS);
        html.push_str("</style>\n</head>\n<body>\n");

        self.header(p, &mut html);
        self.key_figures(p, &mut html);
        self.executive_summary(p, &mut html);
        self.effort_table(p, &mut html);
        self.financial_table(p, &mut html);
        self.milestones(p, &mut html);
        self.timeline(p, &mut html);
        self.scope(p, &mut html);
        self.considerations(p, &mut html);
        self.audit(p, &mut html);

        html.push_str(&format!(
            "<footer>Generated {} &middot; Package: {} &middot; Layout: {}</footer>\n",
            p.generated_at.format("%Y-%m-%d %H:%M UTC"),
            p.package_tier.as_str().to_uppercase(),
            escape_html(&self.layout.name)
        ));
        html.push_str("</body>\n</html>\n");

        Ok(html)
    }
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const INLINE_CSS: &str = r#"
body { font-family: Arial, sans-serif; margin: 40px; color: #333; }
.brand h1 { margin: 0; font-size: 24px; }
.brand p { margin: 5px 0 0; color: #666; }
.hero { background: #0B2F86; color: white; padding: 30px; text-align: center; border-radius: 10px; margin: 20px 0; }
.hero .big { font-size: 36px; font-weight: bold; margin-bottom: 10px; }
.hero .sub { font-size: 14px; opacity: 0.9; }
h2 { color: #0B2F86; border-bottom: 2px solid #eee; padding-bottom: 10px; }
table { width: 100%; border-collapse: collapse; margin: 20px 0; }
th, td { padding: 10px; text-align: left; border-bottom: 1px solid #ddd; }
th { background: #f5f5f5; }
.num { text-align: right; }
.total { background: #f9f9f9; }
tfoot td { font-weight: bold; background: #0B2F86; color: white; }
.note, .empty { color: #666; font-size: 12px; }
.scope { display: flex; gap: 16px; }
.card { flex: 1; border: 1px solid #eee; border-radius: 8px; padding: 0 12px; }
.warnings li { color: #8a5300; margin-bottom: 6px; }
footer { margin-top: 40px; text-align: center; color: #666; font-size: 12px; }
@media print { body { margin: 20px; } .hero { -webkit-print-color-adjust: exact; } }
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"A&B's"</b>"#),
            "&lt;b&gt;&quot;A&amp;B&#39;s&quot;&lt;/b&gt;"
        );
    }
}
