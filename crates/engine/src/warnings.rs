//! Advisory rules
//!
//! Each rule is evaluated on its own and yields at most one advisory.

use erp_calc_core::{Advisory, AdvisoryCode, PolicyThresholds};

/// Figures the rules look at
#[derive(Debug, Clone, Copy, Default)]
pub struct WarningContext {
    /// Some selected item belongs to the baseline line of business
    pub has_baseline_item: bool,
    pub admin_override: bool,
    pub manday_discount_pct: f64,
    pub manday_discount_enabled: bool,
    pub rate_discount_pct: f64,
    pub wrapper_days: u64,
    pub risk_multiplier: f64,
    pub final_days: u64,
    pub weeks: u64,
}

pub fn evaluate_warnings(ctx: &WarningContext, policy: &PolicyThresholds) -> Vec<Advisory> {
    let mut warnings = Vec::new();

    if !ctx.admin_override && !ctx.has_baseline_item {
        warnings.push(Advisory::new(
            AdvisoryCode::MissingBaseline,
            format!(
                "At least one {} capability is recommended across bundles or items.",
                policy.baseline_line_of_business
            ),
        ));
    }

    if ctx.manday_discount_enabled && ctx.manday_discount_pct > policy.max_manday_discount_pct {
        warnings.push(Advisory::new(
            AdvisoryCode::MandayDiscountAboveCap,
            format!(
                "Manday discount {}% exceeds policy cap of {}%. Approval required.",
                ctx.manday_discount_pct, policy.max_manday_discount_pct
            ),
        ));
    }

    if ctx.rate_discount_pct > policy.max_rate_discount_pct {
        warnings.push(Advisory::new(
            AdvisoryCode::RateDiscountAboveCap,
            format!(
                "Rate discount {}% exceeds policy cap of {}%. Approval required.",
                ctx.rate_discount_pct, policy.max_rate_discount_pct
            ),
        ));
    }

    if ctx.wrapper_days < policy.min_wrapper_days {
        warnings.push(Advisory::new(
            AdvisoryCode::WrapperUnderScoped,
            "Wrapper effort looks low: PMO/Training/Hypercare may be under-scoped.",
        ));
    }

    if ctx.risk_multiplier > policy.high_risk_multiplier {
        warnings.push(Advisory::new(
            AdvisoryCode::HighRisk,
            "High risk factors detected; consider contingency.",
        ));
    }

    if ctx.final_days > policy.large_scope_days {
        warnings.push(Advisory::new(
            AdvisoryCode::LargeScope,
            "Large scope; consider a phased approach.",
        ));
    }

    if ctx.weeks > policy.long_timeline_weeks {
        warnings.push(Advisory::new(
            AdvisoryCode::LongTimeline,
            format!(
                "Timeline exceeds {} weeks; resource constraints possible.",
                policy.long_timeline_weeks
            ),
        ));
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy() -> WarningContext {
        WarningContext {
            has_baseline_item: true,
            manday_discount_enabled: true,
            wrapper_days: 97,
            risk_multiplier: 1.0,
            final_days: 500,
            weeks: 20,
            ..Default::default()
        }
    }

    fn codes(ctx: &WarningContext) -> Vec<AdvisoryCode> {
        evaluate_warnings(ctx, &PolicyThresholds::default())
            .into_iter()
            .map(|a| a.code)
            .collect()
    }

    #[test]
    fn test_healthy_estimate_has_no_warnings() {
        assert!(codes(&healthy()).is_empty());
    }

    #[test]
    fn test_manday_discount_only_while_enabled() {
        let mut ctx = WarningContext {
            manday_discount_pct: 20.0,
            ..healthy()
        };
        assert_eq!(codes(&ctx), vec![AdvisoryCode::MandayDiscountAboveCap]);

        ctx.manday_discount_enabled = false;
        assert!(codes(&ctx).is_empty());
    }

    #[test]
    fn test_thresholds_are_strict() {
        let at_limits = WarningContext {
            manday_discount_pct: 15.0,
            rate_discount_pct: 10.0,
            wrapper_days: 40,
            risk_multiplier: 1.3,
            final_days: 800,
            weeks: 30,
            ..healthy()
        };
        assert!(codes(&at_limits).is_empty());

        let beyond = WarningContext {
            manday_discount_pct: 15.5,
            rate_discount_pct: 10.5,
            wrapper_days: 39,
            risk_multiplier: 1.31,
            final_days: 801,
            weeks: 31,
            ..healthy()
        };
        assert_eq!(codes(&beyond).len(), 6);
    }

    #[test]
    fn test_missing_baseline_respects_admin_override() {
        let mut ctx = WarningContext {
            has_baseline_item: false,
            ..healthy()
        };
        let warnings = evaluate_warnings(&ctx, &PolicyThresholds::default());
        assert_eq!(warnings[0].code, AdvisoryCode::MissingBaseline);
        assert!(warnings[0].message.contains("Finance"));

        ctx.admin_override = true;
        assert!(codes(&ctx).is_empty());
    }

    #[test]
    fn test_message_carries_percentages() {
        let ctx = WarningContext {
            rate_discount_pct: 12.5,
            ..healthy()
        };
        let warnings = evaluate_warnings(&ctx, &PolicyThresholds::default());
        assert_eq!(
            warnings[0].message,
            "Rate discount 12.5% exceeds policy cap of 10%. Approval required."
        );
    }
}
