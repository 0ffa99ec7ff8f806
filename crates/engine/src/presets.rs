//! Preset tiers and industry templates
//!
//! Every operation returns a new input; the one passed in is left untouched.

use erp_calc_core::{
    Catalog, Error, EstimateInput, MultiplierMap, PresetOverrides, Result, Selection, Tier,
};

/// Selection with the synchronised add-on key present exactly when `flag` is set
pub fn with_addon_toggled(selection: &Selection, addon_key: &str, flag: bool) -> Selection {
    if addon_key.is_empty() {
        return selection.clone();
    }
    selection.with_flag(addon_key, flag)
}

/// Replace the selection and effort sliders with a tier's preset
///
/// A stored override for the tier wins over the built-in preset when one is
/// supplied. An override's wrapper days only replace the sliders it sets;
/// the rest keep their current values.
pub fn apply_tier(
    input: &EstimateInput,
    tier: Tier,
    catalog: &Catalog,
    overrides: Option<&PresetOverrides>,
) -> Result<EstimateInput> {
    let addon_key = catalog.constants().synced_addon_key.as_str();
    let mut next = input.clone();
    next.tier = tier;

    if let Some(o) = overrides.and_then(|all| all.get(tier)) {
        tracing::debug!(tier = %tier, keys = o.keys.len(), "Applying stored preset override");
        next.selected_items = with_addon_toggled(&o.keys, addon_key, o.include_flag);
        if let Some(wrapper) = &o.wrapper_days {
            next.effort = wrapper.apply_to(&input.effort);
        }
        return Ok(next);
    }

    let preset = catalog
        .preset(tier)
        .ok_or_else(|| Error::UnknownTier(tier.to_string()))?;

    let keys: Selection = preset.keys.iter().map(String::as_str).collect();
    next.selected_items = with_addon_toggled(&keys, addon_key, preset.include_addon_key);
    next.effort = preset.effort;
    Ok(next)
}

/// Apply an industry template
///
/// Multipliers reset to all-1.0 and take the template's overrides; forms and
/// interfaces are replaced by the template's required sets.
pub fn apply_template(input: &EstimateInput, template_id: &str, catalog: &Catalog) -> Result<EstimateInput> {
    let template = catalog
        .template(template_id)
        .ok_or_else(|| Error::UnknownTemplate(template_id.to_string()))?;

    let mut next = input.clone();
    next.industry_template = template.id.clone();
    next.multipliers = MultiplierMap::merged_over_default(&template.multipliers);
    next.selected_forms = template.required_forms.iter().map(String::as_str).collect();
    next.selected_interfaces = template
        .required_interfaces
        .iter()
        .map(String::as_str)
        .collect();
    Ok(next)
}

pub fn reset_multipliers(input: &EstimateInput) -> EstimateInput {
    EstimateInput {
        multipliers: input.multipliers.reset(),
        ..input.clone()
    }
}
