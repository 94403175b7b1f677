//! Map and variant eligibility.
//!
//! Variant names are classified once into [`VariantKind`] by the library;
//! every rule here runs over that typed set.

use tracing::debug;
use crate::error::EngineError;
use crate::library::AssetLibrary;
use crate::model::{Variant, VariantKind};

/// Narrow a map's variants to the selectable ones.
///
/// `default` is kept only when `allow_defaults` is set and `disable*` names
/// are always dropped. If any `force*` variant remains, only the forced
/// variants are returned, regardless of `allow_defaults`. Input order is
/// preserved.
pub fn filter_variants(variants: Vec<Variant>, allow_defaults: bool) -> Vec<Variant> {
    let candidates: Vec<Variant> = variants
        .into_iter()
        .filter(|v| match v.kind {
            VariantKind::Default => allow_defaults,
            VariantKind::Disabled => false,
            VariantKind::Forced | VariantKind::Normal => true,
        })
        .collect();

    if candidates.iter().any(|v| v.kind == VariantKind::Forced) {
        return candidates
            .into_iter()
            .filter(|v| v.kind == VariantKind::Forced)
            .collect();
    }

    candidates
}

/// Inclusion and exclusion rules for one run.
#[derive(Debug, Clone, Default)]
pub struct MapFilter {
    /// Treat `default` as an ordinary selectable skin
    pub allow_defaults: bool,
    /// Restrict to these maps, in this order (empty means all)
    pub included_maps: Vec<String>,
    /// Never process these maps
    pub excluded_maps: Vec<String>,
}

impl MapFilter {
    /// Selectable variants of `map`, freshly read from disk.
    ///
    /// # Errors
    /// Returns `EnumerationFailed` if the map directory cannot be listed.
    pub fn eligible_variants(
        &self,
        library: &AssetLibrary,
        map: &str,
    ) -> Result<Vec<Variant>, EngineError> {
        Ok(filter_variants(library.variants(map)?, self.allow_defaults))
    }

    /// Maps to process, in enumeration order or in inclusion-list order
    /// when an inclusion list is configured.
    ///
    /// A map is eligible when it has at least one selectable variant and is
    /// not excluded. Exclusion wins over inclusion.
    ///
    /// # Errors
    /// Any map directory that cannot be listed fails the whole call.
    pub fn eligible_maps(&self, library: &AssetLibrary) -> Result<Vec<String>, EngineError> {
        let mut available = Vec::new();
        for map in library.map_names()? {
            if self.eligible_variants(library, &map)?.is_empty() {
                debug!(map = %map, "no selectable variant; skipping map");
                continue;
            }
            if self.excluded_maps.contains(&map) {
                debug!(map = %map, "map excluded by config");
                continue;
            }
            available.push(map);
        }

        if self.included_maps.is_empty() {
            return Ok(available);
        }

        Ok(self
            .included_maps
            .iter()
            .filter(|m| available.contains(m))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn names(variants: &[Variant]) -> Vec<&str> {
        variants.iter().map(|v| v.name.as_str()).collect()
    }

    fn make_library(root: &Path, maps: &[(&str, &[&str])]) -> AssetLibrary {
        for (map, variants) in maps {
            fs::create_dir_all(root.join(map)).expect("Failed to create map dir");
            for variant in *variants {
                fs::create_dir_all(root.join(map).join(variant))
                    .expect("Failed to create variant dir");
            }
        }
        AssetLibrary::new(root)
    }

    #[test]
    fn test_filter_drops_default_and_disabled() {
        let variants = vec![
            Variant::new("default"),
            Variant::new("snowy"),
            Variant::new("disabled_old"),
        ];
        assert_eq!(names(&filter_variants(variants, false)), vec!["snowy"]);
    }

    #[test]
    fn test_filter_keeps_default_when_allowed() {
        let variants = vec![Variant::new("default"), Variant::new("snowy")];
        assert_eq!(names(&filter_variants(variants, true)), vec!["default", "snowy"]);
    }

    #[test]
    fn test_force_overrides_everything() {
        let variants = vec![
            Variant::new("default"),
            Variant::new("snowy"),
            Variant::new("Force_Night"),
            Variant::new("forceDay"),
            Variant::new("disable_force"),
        ];
        assert_eq!(
            names(&filter_variants(variants, true)),
            vec!["Force_Night", "forceDay"]
        );
    }

    #[test]
    fn test_disabled_only_map_is_empty() {
        let variants = vec![Variant::new("default"), Variant::new("DisableMe")];
        assert!(filter_variants(variants, false).is_empty());
    }

    #[test]
    fn test_maps_without_variants_are_not_eligible() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let library = make_library(
            temp_dir.path(),
            &[
                ("Midgard", &["default", "snowy"]),
                ("Titan", &["default"]),
                ("Kings Pass", &["default", "disable_all"]),
            ],
        );

        let filter = MapFilter::default();
        let maps = filter.eligible_maps(&library).expect("Failed to filter");
        assert_eq!(maps, vec!["Midgard".to_string()]);
    }

    #[test]
    fn test_allow_defaults_makes_default_only_map_eligible() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let library = make_library(temp_dir.path(), &[("Titan", &["default"])]);

        let filter = MapFilter {
            allow_defaults: true,
            ..MapFilter::default()
        };
        let maps = filter.eligible_maps(&library).expect("Failed to filter");
        assert_eq!(maps, vec!["Titan".to_string()]);
    }

    #[test]
    fn test_inclusion_order_is_preserved() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let library = make_library(
            temp_dir.path(),
            &[
                ("Midgard", &["snowy"]),
                ("Titan", &["night"]),
                ("Kings Pass", &["red"]),
            ],
        );

        let filter = MapFilter {
            included_maps: vec![
                "Titan".to_string(),
                "Nowhere".to_string(),
                "Midgard".to_string(),
            ],
            ..MapFilter::default()
        };
        let maps = filter.eligible_maps(&library).expect("Failed to filter");
        assert_eq!(maps, vec!["Titan".to_string(), "Midgard".to_string()]);
    }

    #[test]
    fn test_exclusion_beats_inclusion() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let library = make_library(temp_dir.path(), &[("Titan", &["night"])]);

        let filter = MapFilter {
            included_maps: vec!["Titan".to_string()],
            excluded_maps: vec!["Titan".to_string()],
            ..MapFilter::default()
        };
        let maps = filter.eligible_maps(&library).expect("Failed to filter");
        assert!(maps.is_empty());
    }

    #[test]
    fn test_eligible_variants_reads_disk() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let library = make_library(
            temp_dir.path(),
            &[("Midgard", &["default", "snowy", "force_winter"])],
        );

        let filter = MapFilter::default();
        let variants = filter
            .eligible_variants(&library, "Midgard")
            .expect("Failed to list variants");
        assert_eq!(names(&variants), vec!["force_winter"]);
    }
}
