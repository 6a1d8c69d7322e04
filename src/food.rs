//! Per-food-type physical and nutritional priors.
//!
//! [`FoodTable`] is an immutable label → [`FoodTypeParams`] map with one
//! default entry used for every unrecognised label. The built-in entries cover
//! the ten dishes the classifier upstream knows about; extra entries can be
//! supplied through configuration when the table is built.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Mass fractions of the three macro-nutrients.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MacroRatio {
    pub protein: f32,
    pub carbs: f32,
    pub fat: f32,
}

/// Curated grouping used by the health score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodCategory {
    Healthy,
    #[default]
    Neutral,
    Indulgent,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FoodTypeParams {
    /// Real-world extent (cm) of the longest side of a typical serving.
    pub typical_planar_size_cm: f32,
    /// Height (cm) reached when the normalised depth signal is 1.0.
    pub max_relief_depth_cm: f32,
    /// Correction from a prism of `area × depth` to the actual shape.
    pub volume_shape_factor: f32,
    /// Inclusive `(min, max)` clamp applied to every volume.
    pub volume_plausible_range_cm3: (f32, f32),
    pub density_g_per_cm3: f32,
    pub caloric_density_kcal_per_g: f32,
    pub macro_ratio: MacroRatio,
    #[serde(default)]
    pub category: FoodCategory,
}

impl FoodTypeParams {
    /// Generic entry applied to labels the table does not know.
    pub fn generic() -> Self {
        entry(
            20.0,
            5.0,
            0.8,
            (100.0, 800.0),
            0.35,
            2.0,
            (0.03, 0.50, 0.22),
            FoodCategory::Neutral,
        )
    }

    /// Reject entries that would produce non-physical estimates: geometry,
    /// density and energy fields must be finite and positive, the volume
    /// range must satisfy `0 < min <= max` and each macro ratio must lie in
    /// `[0, 1]`.
    pub fn validate(&self) -> Result<(), String> {
        let positive = [
            ("typical_planar_size_cm", self.typical_planar_size_cm),
            ("max_relief_depth_cm", self.max_relief_depth_cm),
            ("volume_shape_factor", self.volume_shape_factor),
            ("density_g_per_cm3", self.density_g_per_cm3),
            ("caloric_density_kcal_per_g", self.caloric_density_kcal_per_g),
        ];
        for (name, v) in positive {
            if !(v.is_finite() && v > 0.0) {
                return Err(format!("{name} must be finite and > 0, got {v}"));
            }
        }
        let (lo, hi) = self.volume_plausible_range_cm3;
        if !(lo.is_finite() && hi.is_finite() && lo > 0.0 && lo <= hi) {
            return Err(format!(
                "volume_plausible_range_cm3 must satisfy 0 < min <= max, got ({lo}, {hi})"
            ));
        }
        let m = &self.macro_ratio;
        for (name, v) in [("protein", m.protein), ("carbs", m.carbs), ("fat", m.fat)] {
            if !(0.0..=1.0).contains(&v) {
                return Err(format!("macro_ratio.{name} must lie in [0, 1], got {v}"));
            }
        }
        Ok(())
    }

    /// Clamp `volume` into the plausible range.
    pub fn clamp_volume(&self, volume: f32) -> f32 {
        let (lo, hi) = self.volume_plausible_range_cm3;
        volume.max(lo).min(hi)
    }
}

#[allow(clippy::too_many_arguments)]
fn entry(
    size: f32,
    relief: f32,
    shape: f32,
    range: (f32, f32),
    density: f32,
    kcal: f32,
    (protein, carbs, fat): (f32, f32, f32),
    category: FoodCategory,
) -> FoodTypeParams {
    FoodTypeParams {
        typical_planar_size_cm: size,
        max_relief_depth_cm: relief,
        volume_shape_factor: shape,
        volume_plausible_range_cm3: range,
        density_g_per_cm3: density,
        caloric_density_kcal_per_g: kcal,
        macro_ratio: MacroRatio { protein, carbs, fat },
        category,
    }
}

/// Immutable lookup of food priors.
#[derive(Clone, Debug)]
pub struct FoodTable {
    entries: HashMap<String, FoodTypeParams>,
    default: FoodTypeParams,
}

impl Default for FoodTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FoodTable {
    pub fn builtin() -> Self {
        use FoodCategory::*;
        // size, relief, shape, volume range, density, kcal/g, (protein, carbs, fat)
        let rows = [
            (
                "apple_pie",
                entry(20.0, 5.0, 0.8, (100.0, 800.0), 0.35, 2.8, (0.03, 0.50, 0.22), Indulgent),
            ),
            (
                "caesar_salad",
                entry(25.0, 8.0, 0.6, (200.0, 1200.0), 0.25, 1.1, (0.18, 0.08, 0.10), Healthy),
            ),
            (
                "dumplings",
                entry(15.0, 4.0, 0.9, (150.0, 600.0), 0.45, 1.6, (0.10, 0.20, 0.08), Neutral),
            ),
            (
                "french_fries",
                entry(15.0, 3.0, 0.4, (100.0, 500.0), 0.25, 2.8, (0.03, 0.40, 0.18), Indulgent),
            ),
            (
                "hamburger",
                entry(12.0, 6.0, 1.0, (200.0, 900.0), 0.40, 2.5, (0.20, 0.25, 0.18), Indulgent),
            ),
            (
                "chicken_curry",
                entry(20.0, 6.0, 0.8, (300.0, 1000.0), 0.35, 1.4, (0.16, 0.10, 0.12), Healthy),
            ),
            (
                "cup_cakes",
                entry(8.0, 5.0, 0.7, (50.0, 300.0), 0.30, 3.8, (0.04, 0.50, 0.20), Indulgent),
            ),
            (
                "pizza",
                entry(30.0, 2.0, 0.5, (400.0, 1500.0), 0.35, 2.4, (0.14, 0.35, 0.15), Neutral),
            ),
            (
                "sushi",
                entry(10.0, 4.0, 0.9, (100.0, 500.0), 0.45, 1.2, (0.10, 0.30, 0.03), Healthy),
            ),
            (
                "ice_cream",
                entry(10.0, 6.0, 0.6, (50.0, 400.0), 0.50, 2.2, (0.05, 0.25, 0.15), Indulgent),
            ),
        ];
        Self {
            entries: rows
                .into_iter()
                .map(|(label, params)| (label.to_string(), params))
                .collect(),
            default: FoodTypeParams::generic(),
        }
    }

    /// Built-in table with `extra` entries added or replacing built-ins.
    /// Fails on the first entry that does not pass [`FoodTypeParams::validate`].
    pub fn with_overrides(
        extra: impl IntoIterator<Item = (String, FoodTypeParams)>,
    ) -> Result<Self, String> {
        let mut table = Self::builtin();
        for (label, params) in extra {
            params
                .validate()
                .map_err(|e| format!("invalid food entry '{label}': {e}"))?;
            log::debug!("FoodTable: override for '{label}'");
            table.entries.insert(label, params);
        }
        Ok(table)
    }

    /// Parameters for `label`, or the default entry when unknown.
    pub fn get(&self, label: &str) -> &FoodTypeParams {
        self.entries.get(label).unwrap_or(&self.default)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.entries.contains_key(label)
    }

    /// Known labels in sorted order.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_label_uses_generic_defaults() {
        let table = FoodTable::builtin();
        let p = table.get("mystery_stew");
        assert_eq!(p.density_g_per_cm3, 0.35);
        assert_eq!(p.caloric_density_kcal_per_g, 2.0);
        assert_eq!(p.macro_ratio, table.get("apple_pie").macro_ratio);
        assert_eq!(p.volume_plausible_range_cm3, (100.0, 800.0));
        assert!(!table.contains("mystery_stew"));
    }

    #[test]
    fn builtin_entries_are_valid() {
        let table = FoodTable::builtin();
        assert_eq!(table.labels().len(), 10);
        for label in table.labels() {
            let p = table.get(label);
            assert_eq!(p.validate(), Ok(()), "{label}");
            let (lo, hi) = p.volume_plausible_range_cm3;
            assert!(lo < hi, "{label}: ({lo}, {hi})");
        }
        assert_eq!(FoodTypeParams::generic().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_non_physical_entries() {
        let cases: [(&str, fn(&mut FoodTypeParams)); 7] = [
            ("reversed range", |p| p.volume_plausible_range_cm3 = (700.0, 150.0)),
            ("zero range floor", |p| p.volume_plausible_range_cm3 = (0.0, 150.0)),
            ("negative density", |p| p.density_g_per_cm3 = -1.0),
            ("zero kcal", |p| p.caloric_density_kcal_per_g = 0.0),
            ("nan size", |p| p.typical_planar_size_cm = f32::NAN),
            ("infinite relief", |p| p.max_relief_depth_cm = f32::INFINITY),
            ("fat ratio above one", |p| p.macro_ratio.fat = 1.5),
        ];
        for (name, mutate) in cases {
            let mut p = FoodTypeParams::generic();
            mutate(&mut p);
            assert!(p.validate().is_err(), "{name} accepted");
            let err = FoodTable::with_overrides([("soup".to_string(), p)]).unwrap_err();
            assert!(err.contains("'soup'"), "{name}: {err}");
        }
    }

    #[test]
    fn single_point_range_is_allowed() {
        let mut p = FoodTypeParams::generic();
        p.volume_plausible_range_cm3 = (250.0, 250.0);
        assert_eq!(p.validate(), Ok(()));
        assert_eq!(p.clamp_volume(10.0), 250.0);
        assert_eq!(p.clamp_volume(900.0), 250.0);
    }

    #[test]
    fn overrides_replace_and_extend() {
        let mut soup = FoodTypeParams::generic();
        soup.density_g_per_cm3 = 1.0;
        let table = FoodTable::with_overrides([
            ("soup".to_string(), soup.clone()),
            ("pizza".to_string(), soup),
        ])
        .unwrap();
        assert!(table.contains("soup"));
        assert_eq!(table.get("pizza").density_g_per_cm3, 1.0);
        assert_eq!(table.get("sushi").density_g_per_cm3, 0.45);
    }
}
