//! Catalog resolver
//!
//! Splits a selection into bundles and atomic items. An atomic item inside
//! the scope of a selected bundle is suppressed so its days are not counted
//! twice. Output follows catalog order; keys the catalog does not know are
//! ignored.

use erp_calc_core::{Catalog, CatalogItem, ResolvedSummary, Selection};

/// Selected items, classified
#[derive(Debug, Clone, Default)]
pub struct Resolved<'a> {
    pub bundles: Vec<&'a CatalogItem>,
    pub atomic: Vec<&'a CatalogItem>,
    pub suppressed: Vec<&'a CatalogItem>,
}

impl<'a> Resolved<'a> {
    /// Items that contribute functional days (bundles first, then atomic)
    pub fn counted(&self) -> impl Iterator<Item = &'a CatalogItem> + '_ {
        self.bundles.iter().chain(self.atomic.iter()).copied()
    }

    pub fn summary(&self) -> ResolvedSummary {
        let keys = |items: &[&CatalogItem]| -> Vec<String> {
            items.iter().map(|i| i.key.clone()).collect()
        };
        ResolvedSummary {
            bundles: keys(&self.bundles),
            atomic: keys(&self.atomic),
            suppressed: keys(&self.suppressed),
        }
    }
}

pub fn resolve<'a>(selection: &Selection, catalog: &'a Catalog) -> Resolved<'a> {
    let selected: Vec<&CatalogItem> = catalog
        .items()
        .iter()
        .filter(|item| selection.contains(&item.key))
        .collect();

    let bundles: Vec<&CatalogItem> = selected.iter().copied().filter(|i| i.bundle).collect();

    let mut resolved = Resolved {
        bundles,
        ..Default::default()
    };

    for item in selected.into_iter().filter(|i| !i.bundle) {
        if resolved.bundles.iter().any(|b| item.is_in_scope_of(b)) {
            resolved.suppressed.push(item);
        } else {
            resolved.atomic.push(item);
        }
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::catalog;

    fn keys(items: &[&CatalogItem]) -> Vec<String> {
        items.iter().map(|i| i.key.clone()).collect()
    }

    #[test]
    fn test_no_bundle_everything_atomic() {
        let catalog = catalog();
        let sel: Selection = ["p2p", "gl", "drc"].into_iter().collect();
        let r = resolve(&sel, &catalog);
        assert!(r.bundles.is_empty());
        assert_eq!(keys(&r.atomic), vec!["p2p", "gl", "drc"]);
    }

    #[test]
    fn test_bundle_suppresses_in_scope_items() {
        let catalog = catalog();
        let sel: Selection = ["p2p", "fin_base", "drc"].into_iter().collect();
        let r = resolve(&sel, &catalog);
        assert_eq!(keys(&r.bundles), vec!["fin_base"]);
        assert_eq!(keys(&r.atomic), vec!["drc"]);
        assert_eq!(keys(&r.suppressed), vec!["p2p"]);
        assert_eq!(r.counted().count(), 2);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let catalog = catalog();
        let sel: Selection = ["nope", "crm"].into_iter().collect();
        let r = resolve(&sel, &catalog);
        assert_eq!(keys(&r.atomic), vec!["crm"]);
        assert_eq!(r.summary().suppressed.len(), 0);
    }
}
