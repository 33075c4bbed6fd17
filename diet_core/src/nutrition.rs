//! Nutrition target calculator.
//!
//! Maps a biometric profile to daily calorie and macro targets:
//! - BMR: Mifflin-St Jeor
//! - TDEE: BMR scaled by activity multiplier
//! - Calorie target: TDEE adjusted by goal
//! - Macros: protein per kg, fat at 25% of calories, carbs fill the rest
//!
//! Every stage is rounded to a whole number before feeding the next one.
//! No bounds checking happens here; see `validation` for boundary checks.

use crate::{ActivityLevel, BiometricProfile, Gender, Goal, Macros, NutritionTargets};

/// Deficit applied for weight loss (~0.5 kg/week)
const LOSE_WEIGHT_DEFICIT: i32 = 500;

/// Surplus applied for a lean bulk
const GAIN_MUSCLE_SURPLUS: i32 = 300;

/// Share of calories allocated to fat
const FAT_CALORIE_SHARE: f64 = 0.25;

const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
const KCAL_PER_GRAM_CARB: f64 = 4.0;
const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Basal metabolic rate (kcal/day), Mifflin-St Jeor
///
/// `Other` uses -78, the midpoint of the male (+5) and female (-161)
/// offsets. This is an averaging approximation, not a clinically validated
/// constant.
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age_years: u32, gender: Gender) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age_years);
    match gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
        Gender::Other => base - 78.0,
    }
}

/// Total daily energy expenditure from a (rounded) BMR
pub fn calculate_tdee(bmr: i32, activity_level: ActivityLevel) -> i32 {
    (f64::from(bmr) * activity_level.multiplier()).round() as i32
}

/// Goal-adjusted daily calorie target
pub fn calculate_calorie_target(tdee: i32, goal: Goal) -> i32 {
    match goal {
        Goal::LoseWeight => tdee - LOSE_WEIGHT_DEFICIT,
        Goal::GainMuscle => tdee + GAIN_MUSCLE_SURPLUS,
        Goal::Maintain => tdee,
    }
}

/// Grams of protein per kg of body weight for a goal
pub fn protein_per_kg(goal: Goal) -> f64 {
    match goal {
        Goal::GainMuscle => 1.6,
        Goal::LoseWeight => 1.2,
        Goal::Maintain => 1.0,
    }
}

/// Split a calorie target into protein, fat and carb grams
///
/// Carbs take whatever is left after protein and fat and are floored at
/// zero when the target is too low to cover both.
pub fn calculate_macros(calorie_target: i32, weight_kg: f64, goal: Goal) -> Macros {
    let protein = (weight_kg * protein_per_kg(goal)).round() as i32;

    let fat_calories = f64::from(calorie_target) * FAT_CALORIE_SHARE;
    let fat = (fat_calories / KCAL_PER_GRAM_FAT).round() as i32;

    let protein_calories = f64::from(protein) * KCAL_PER_GRAM_PROTEIN;
    let remaining_calories = f64::from(calorie_target) - protein_calories - fat_calories;
    let carbs = ((remaining_calories / KCAL_PER_GRAM_CARB).round() as i32).max(0);

    Macros { protein, fat, carbs }
}

/// Compute the full set of daily targets for a profile
///
/// Pure and total: identical input always yields identical output.
pub fn compute_nutrition_targets(profile: &BiometricProfile) -> NutritionTargets {
    let bmr = calculate_bmr(
        profile.weight_kg,
        profile.height_cm,
        profile.age_years,
        profile.gender,
    )
    .round() as i32;
    let tdee = calculate_tdee(bmr, profile.activity_level);
    let calorie_target = calculate_calorie_target(tdee, profile.goal);
    let macros = calculate_macros(calorie_target, profile.weight_kg, profile.goal);

    tracing::debug!(
        "Computed targets: BMR {}, TDEE {}, {} kcal ({}g P / {}g F / {}g C)",
        bmr,
        tdee,
        calorie_target,
        macros.protein,
        macros.fat,
        macros.carbs
    );

    NutritionTargets {
        bmr,
        tdee,
        calorie_target,
        protein_target: macros.protein,
        fat_target: macros.fat,
        carb_target: macros.carbs,
    }
}

/// Percentage of a daily target consumed, capped at 100
pub fn calculate_percentage(consumed: f64, target: f64) -> u32 {
    if target == 0.0 {
        return 0;
    }
    ((consumed / target) * 100.0).round().clamp(0.0, 100.0) as u32
}
