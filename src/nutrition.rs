//! Nutrition derived from an estimated volume and the food priors.

use crate::error::EstimateError;
use crate::food::{FoodCategory, FoodTable};
use log::trace;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const KCAL_PER_G_FAT: f32 = 9.0;
const KCAL_PER_G_PROTEIN: f32 = 4.0;

/// Final per-image estimate handed to callers.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionEstimate {
    pub calories: f32,
    pub protein_g: u32,
    pub carbs_g: u32,
    pub fat_g: u32,
    pub mass_g: f32,
    pub volume_cm3: f32,
    /// 1 (least healthy) to 10.
    pub health_score: u8,
    /// 0 to 95.
    pub confidence_score: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutritionParams {
    /// Hard ceiling on reported calories.
    pub max_calories: f32,
    /// Volume band (cm³) that earns the full confidence bonus.
    pub confident_volume_cm3: (f32, f32),
    /// Calorie band that earns the full confidence bonus.
    pub confident_calories: (f32, f32),
    pub base_confidence: u8,
    pub max_confidence: u8,
}

impl Default for NutritionParams {
    fn default() -> Self {
        Self {
            max_calories: 1500.0,
            confident_volume_cm3: (50.0, 1000.0),
            confident_calories: (50.0, 800.0),
            base_confidence: 70,
            max_confidence: 95,
        }
    }
}

#[derive(Clone, Debug)]
pub struct NutritionDeriver {
    params: NutritionParams,
    foods: Arc<FoodTable>,
}

impl Default for NutritionDeriver {
    fn default() -> Self {
        Self::new(NutritionParams::default(), Arc::new(FoodTable::builtin()))
    }
}

impl NutritionDeriver {
    pub fn new(params: NutritionParams, foods: Arc<FoodTable>) -> Self {
        Self { params, foods }
    }

    pub fn params(&self) -> &NutritionParams {
        &self.params
    }

    pub fn derive(
        &self,
        volume_cm3: f32,
        food_type: &str,
    ) -> Result<NutritionEstimate, EstimateError> {
        if !(volume_cm3.is_finite() && volume_cm3 > 0.0) {
            return Err(EstimateError::NutritionDegenerate { volume_cm3 });
        }
        let food = self.foods.get(food_type);
        let mass_g = volume_cm3 * food.density_g_per_cm3;
        let calories = (mass_g * food.caloric_density_kcal_per_g)
            .min(self.params.max_calories)
            .max(0.0);
        let macros = Macros {
            protein: mass_g * food.macro_ratio.protein,
            carbs: mass_g * food.macro_ratio.carbs,
            fat: mass_g * food.macro_ratio.fat,
        };
        let health_score = health_score(food.category, mass_g, calories, &macros);
        let confidence_score = self.confidence_score(volume_cm3, calories);
        trace!(
            "NutritionDeriver: '{food_type}' mass={mass_g:.1}g kcal={calories:.1} \
             health={health_score} confidence={confidence_score}"
        );
        Ok(NutritionEstimate {
            calories,
            protein_g: round_grams(macros.protein),
            carbs_g: round_grams(macros.carbs),
            fat_g: round_grams(macros.fat),
            mass_g,
            volume_cm3,
            health_score,
            confidence_score,
        })
    }

    fn confidence_score(&self, volume_cm3: f32, calories: f32) -> u8 {
        let p = &self.params;
        let band = |value: f32, (lo, hi): (f32, f32)| {
            if (lo..=hi).contains(&value) {
                10
            } else if value > 0.0 {
                5
            } else {
                0
            }
        };
        let score = p.base_confidence as u32
            + band(volume_cm3, p.confident_volume_cm3)
            + band(calories, p.confident_calories);
        score.min(p.max_confidence as u32) as u8
    }
}

struct Macros {
    protein: f32,
    carbs: f32,
    fat: f32,
}

fn round_grams(g: f32) -> u32 {
    g.max(0.0).round() as u32
}

/// Start at 5, adjust for calorie density, fat and protein share of the
/// calories, carb density and the curated category, then clamp to `[1, 10]`.
/// All energy terms use the reported (capped) calories.
fn health_score(category: FoodCategory, mass_g: f32, calories: f32, macros: &Macros) -> u8 {
    let mut score = 5i32;

    if mass_g > 0.0 {
        score -= match calories / mass_g {
            d if d > 3.5 => 3,
            d if d > 3.0 => 2,
            d if d > 2.5 => 1,
            _ => 0,
        };
    }

    if calories > 0.0 {
        let fat_share = macros.fat * KCAL_PER_G_FAT / calories;
        score -= match fat_share {
            s if s > 0.8 => 3,
            s if s > 0.65 => 2,
            s if s > 0.5 => 1,
            _ => 0,
        };
        if fat_share < 0.3 {
            score += 1;
        }

        let protein_share = macros.protein * KCAL_PER_G_PROTEIN / calories;
        score += match protein_share {
            s if s > 0.3 => 2,
            s if s > 0.2 => 1,
            _ => 0,
        };
    }

    if mass_g > 0.0 {
        score -= match macros.carbs / mass_g {
            c if c > 0.6 => 2,
            c if c > 0.4 => 1,
            _ => 0,
        };
    }

    score += match category {
        FoodCategory::Healthy => 1,
        FoodCategory::Neutral => 0,
        FoodCategory::Indulgent => -1,
    };

    score.clamp(1, 10) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::food::{FoodTypeParams, MacroRatio};

    #[test]
    fn non_positive_volume_is_rejected() {
        let d = NutritionDeriver::default();
        assert_eq!(
            d.derive(0.0, "pizza"),
            Err(EstimateError::NutritionDegenerate { volume_cm3: 0.0 })
        );
        assert!(d.derive(-5.0, "pizza").is_err());
        assert!(d.derive(f32::NAN, "pizza").is_err());
    }

    #[test]
    fn apple_pie_mass_calories_and_macros() {
        let n = NutritionDeriver::default().derive(400.0, "apple_pie").unwrap();
        assert!((n.mass_g - 140.0).abs() < 1e-3);
        assert!((n.calories - 392.0).abs() < 1e-2);
        assert_eq!(n.protein_g, 4);
        assert_eq!(n.carbs_g, 70);
        assert_eq!(n.fat_g, 31);
        assert_eq!(n.volume_cm3, 400.0);
        assert_eq!(n.confidence_score, 90);
        assert!((1..=10).contains(&n.health_score));
    }

    #[test]
    fn calories_are_capped() {
        let n = NutritionDeriver::default().derive(1500.0, "cup_cakes").unwrap();
        assert_eq!(n.calories, 1500.0);
        assert_eq!(n.confidence_score, 80);
    }

    #[test]
    fn unknown_food_uses_generic_densities() {
        let n = NutritionDeriver::default().derive(100.0, "bibimbap").unwrap();
        assert!((n.mass_g - 35.0).abs() < 1e-4);
        assert!((n.calories - 70.0).abs() < 1e-3);
        assert_eq!(n.carbs_g, 18);
    }

    #[test]
    fn healthy_dishes_outscore_indulgent_ones() {
        let d = NutritionDeriver::default();
        let sushi = d.derive(300.0, "sushi").unwrap().health_score;
        let fries = d.derive(300.0, "french_fries").unwrap().health_score;
        let cupcake = d.derive(200.0, "cup_cakes").unwrap().health_score;
        assert!(sushi > fries, "sushi={sushi} fries={fries}");
        assert!(sushi > cupcake, "sushi={sushi} cupcake={cupcake}");
        assert!(sushi >= 8);
    }

    #[test]
    fn health_scores_of_builtin_foods() {
        let d = NutritionDeriver::default();
        let expected = [
            ("apple_pie", 1),
            ("caesar_salad", 5),
            ("chicken_curry", 6),
            ("cup_cakes", 1),
            ("dumplings", 6),
            ("french_fries", 2),
            ("hamburger", 5),
            ("ice_cream", 3),
            ("pizza", 5),
            ("sushi", 9),
            ("unlisted_dish", 1),
        ];
        for (label, score) in expected {
            let got = d.derive(300.0, label).unwrap().health_score;
            assert_eq!(got, score, "{label}");
        }
    }

    /// Score for 100 g with the given calorie density, fat and protein share
    /// of the calories and carb mass fraction.
    fn score_for(kcal_per_g: f32, fat: f32, protein: f32, carbs: f32, cat: FoodCategory) -> u8 {
        let mass_g = 100.0;
        let calories = kcal_per_g * mass_g;
        let macros = Macros {
            protein: protein * calories / KCAL_PER_G_PROTEIN,
            carbs: carbs * mass_g,
            fat: fat * calories / KCAL_PER_G_FAT,
        };
        health_score(cat, mass_g, calories, &macros)
    }

    #[test]
    fn health_score_tiers() {
        use FoodCategory::*;
        // Baseline: no adjustment fires.
        assert_eq!(score_for(2.0, 0.4, 0.1, 0.2, Neutral), 5);

        // Calorie density.
        assert_eq!(score_for(2.7, 0.4, 0.1, 0.2, Neutral), 4);
        assert_eq!(score_for(3.2, 0.4, 0.1, 0.2, Neutral), 3);
        assert_eq!(score_for(3.6, 0.4, 0.1, 0.2, Neutral), 2);

        // Fat share of calories.
        assert_eq!(score_for(2.0, 0.2, 0.1, 0.2, Neutral), 6);
        assert_eq!(score_for(2.0, 0.55, 0.1, 0.2, Neutral), 4);
        assert_eq!(score_for(2.0, 0.7, 0.1, 0.2, Neutral), 3);
        assert_eq!(score_for(2.0, 0.85, 0.1, 0.2, Neutral), 2);

        // Protein share of calories.
        assert_eq!(score_for(2.0, 0.4, 0.25, 0.2, Neutral), 6);
        assert_eq!(score_for(2.0, 0.4, 0.35, 0.2, Neutral), 7);

        // Carb mass fraction.
        assert_eq!(score_for(2.0, 0.4, 0.1, 0.5, Neutral), 4);
        assert_eq!(score_for(2.0, 0.4, 0.1, 0.7, Neutral), 3);

        // Category.
        assert_eq!(score_for(2.0, 0.4, 0.1, 0.2, Healthy), 6);
        assert_eq!(score_for(2.0, 0.4, 0.1, 0.2, Indulgent), 4);

        // Everything bad clamps to the floor, everything good stays below 10.
        assert_eq!(score_for(3.6, 0.85, 0.1, 0.7, Indulgent), 1);
        assert_eq!(score_for(1.0, 0.2, 0.35, 0.1, Healthy), 9);
    }

    #[test]
    fn calorie_cap_feeds_the_density_term() {
        let rich = FoodTypeParams {
            density_g_per_cm3: 1.0,
            caloric_density_kcal_per_g: 4.0,
            macro_ratio: MacroRatio {
                protein: 0.35,
                carbs: 0.0,
                fat: 0.0,
            },
            category: FoodCategory::Neutral,
            ..FoodTypeParams::generic()
        };
        let foods = FoodTable::with_overrides([("bar".to_string(), rich)]).unwrap();
        let d = NutritionDeriver::new(NutritionParams::default(), Arc::new(foods));

        // 100 g at 4 kcal/g: dense, low fat, protein share 0.35.
        let small = d.derive(100.0, "bar").unwrap();
        assert_eq!(small.calories, 400.0);
        assert_eq!(small.health_score, 5);

        // 1000 g capped to 1500 kcal: effective 1.5 kcal/g.
        let large = d.derive(1000.0, "bar").unwrap();
        assert_eq!(large.calories, 1500.0);
        assert_eq!(large.health_score, 8);
    }

    #[test]
    fn confidence_never_exceeds_cap() {
        let params = NutritionParams {
            base_confidence: 90,
            ..Default::default()
        };
        let d = NutritionDeriver::new(params, Arc::new(FoodTable::builtin()));
        assert_eq!(d.derive(400.0, "pizza").unwrap().confidence_score, 95);
    }
}
