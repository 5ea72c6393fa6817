//! Default workout catalog and catalog helpers.
//!
//! This module provides the built-in weights days and cardio/mobility
//! templates, plus the validation and mobility pooling the generator relies on.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog
///
/// **Note**: Prefer `get_default_catalog()` outside of tests.
pub fn build_default_catalog() -> Catalog {
    Catalog {
        // ====================================================================
        // Weights days
        // ====================================================================
        weights: vec![
            CatalogEntry::new("upper_push", "Upper Body Push", Some("upper")),
            CatalogEntry::new("lower_body", "Lower Body", Some("lower")),
            CatalogEntry::new("upper_pull", "Upper Body Pull", Some("upper")),
        ],

        // ====================================================================
        // Cardio templates
        // ====================================================================
        cardio: vec![
            CatalogEntry::new("zone2_run", "Zone 2 Run", Some("endurance")),
            CatalogEntry::new("bike_intervals", "Bike Intervals", Some("intervals")),
            CatalogEntry::new("rower_steady", "Steady Row", Some("endurance")),
        ],

        // ====================================================================
        // Mobility templates
        // ====================================================================
        mobility: vec![
            CatalogEntry::new("hip_cars", "Hip CARs", Some("hips")),
            CatalogEntry::new("thoracic_flow", "Thoracic Spine Flow", Some("spine")),
            CatalogEntry::new("dead_bug", "Dead Bug Series", Some("core")),
            CatalogEntry::new("shoulder_cars", "Shoulder CARs", Some("shoulders")),
        ],
    }
}

impl Catalog {
    /// Append extra entries after the built-in ones, skipping ids already present
    pub fn with_custom(mut self, extra: &Catalog) -> Self {
        for kind in [WorkoutKind::Weights, WorkoutKind::Cardio, WorkoutKind::Mobility] {
            for entry in extra.entries(kind) {
                let list = match kind {
                    WorkoutKind::Weights => &mut self.weights,
                    WorkoutKind::Cardio => &mut self.cardio,
                    WorkoutKind::Mobility => &mut self.mobility,
                };
                if list.iter().any(|e| e.id == entry.id) {
                    tracing::warn!(
                        "Custom {} entry '{}' shadows a built-in id, skipping",
                        kind,
                        entry.id
                    );
                    continue;
                }
                list.push(entry.clone());
            }
        }
        self
    }

    /// Mobility templates with duplicate display names collapsed (first wins)
    pub fn mobility_pool(&self) -> Vec<&CatalogEntry> {
        let mut seen = HashSet::new();
        self.mobility
            .iter()
            .filter(|e| seen.insert(e.name.as_str()))
            .collect()
    }

    /// Validate the catalog for consistency
    ///
    /// Returns a list of validation errors, or empty Vec if valid. Empty lists
    /// are allowed; the generator leaves those positions unconfigured.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for kind in [WorkoutKind::Weights, WorkoutKind::Cardio, WorkoutKind::Mobility] {
            let mut ids = HashSet::new();
            for entry in self.entries(kind) {
                if entry.id.is_empty() {
                    errors.push(format!("{} entry has empty ID", kind));
                }
                if entry.name.is_empty() {
                    errors.push(format!("{} entry '{}' has empty name", kind, entry.id));
                }
                if !ids.insert(entry.id.as_str()) {
                    errors.push(format!("Duplicate {} id '{}'", kind, entry.id));
                }
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_loads() {
        let catalog = build_default_catalog();
        assert_eq!(catalog.weights.len(), 3);
        assert_eq!(catalog.cardio.len(), 3);
        assert_eq!(catalog.mobility.len(), 4);
    }

    #[test]
    fn test_default_catalog_validates() {
        let catalog = get_default_catalog();
        let errors = catalog.validate();
        assert!(
            errors.is_empty(),
            "Default catalog has validation errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_duplicate_ids_reported() {
        let mut catalog = build_default_catalog();
        catalog
            .cardio
            .push(CatalogEntry::new("zone2_run", "Another Run", None));
        let errors = catalog.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("zone2_run"));
    }

    #[test]
    fn test_mobility_pool_collapses_names_first_wins() {
        let catalog = Catalog {
            mobility: vec![
                CatalogEntry::new("hips_a", "Hip Opener", None),
                CatalogEntry::new("spine", "Spine Flow", None),
                CatalogEntry::new("hips_b", "Hip Opener", Some("core")),
            ],
            ..Catalog::default()
        };
        let ids: Vec<_> = catalog.mobility_pool().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["hips_a", "spine"]);
    }

    #[test]
    fn test_with_custom_appends_and_skips_shadowed() {
        let extra = Catalog {
            cardio: vec![
                CatalogEntry::new("swim", "Pool Swim", None),
                CatalogEntry::new("zone2_run", "Shadow", None),
            ],
            ..Catalog::default()
        };
        let catalog = build_default_catalog().with_custom(&extra);
        assert_eq!(catalog.cardio.len(), 4);
        assert_eq!(catalog.cardio[3].id, "swim");
        assert_eq!(catalog.cardio[0].name, "Zone 2 Run");
    }
}
