//! Skin selection.

use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::debug;
use crate::error::EngineError;
use crate::filter::MapFilter;
use crate::library::AssetLibrary;
use crate::model::{Variant, DEFAULT_VARIANT};

/// Pick one variant uniformly at random.
///
/// # Errors
/// Returns `EmptySelection` if `variants` is empty.
pub fn choose_variant<R: Rng + ?Sized>(
    map: &str,
    variants: &[Variant],
    rng: &mut R,
) -> Result<Variant, EngineError> {
    variants
        .choose(rng)
        .cloned()
        .ok_or_else(|| EngineError::EmptySelection {
            map: map.to_string(),
        })
}

/// The variant every reset applies.
pub fn reset_variant() -> Variant {
    Variant::new(DEFAULT_VARIANT)
}

/// Chooses a skin for a map from its current eligible variants.
pub struct SkinSelector<'a, R: Rng + ?Sized> {
    library: &'a AssetLibrary,
    filter: &'a MapFilter,
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> SkinSelector<'a, R> {
    pub fn new(library: &'a AssetLibrary, filter: &'a MapFilter, rng: &'a mut R) -> Self {
        SkinSelector { library, filter, rng }
    }

    /// Re-read the map's eligible variants and pick one at random.
    ///
    /// # Errors
    /// `EmptySelection` if the map lost all its variants since filtering,
    /// `EnumerationFailed` if it can no longer be listed.
    pub fn select(&mut self, map: &str) -> Result<Variant, EngineError> {
        let variants = self.filter.eligible_variants(self.library, map)?;
        let chosen = choose_variant(map, &variants, &mut *self.rng)?;
        debug!(map = %map, variant = %chosen, candidates = variants.len(), "selected skin");
        Ok(chosen)
    }
}
