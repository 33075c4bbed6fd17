//! Core domain types for the Nutri diet tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Biometric enumerations (gender, activity level, goal, diet preference)
//! - Calculator input and output records
//! - Weight observations and progress recommendations
//! - Macro totals for logged food

use crate::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Normalize user-supplied enum text: `lose-weight`, `Lose_Weight` -> `LOSE_WEIGHT`
fn normalize_token(s: &str) -> String {
    s.trim().to_uppercase().replace(['-', ' '], "_")
}

// ============================================================================
// Biometric Enumerations
// ============================================================================

/// Gender used by the BMR formula
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "MALE" | "M" => Ok(Gender::Male),
            "FEMALE" | "F" => Ok(Gender::Female),
            "OTHER" => Ok(Gender::Other),
            other => Err(Error::Validation(format!("Unknown gender: {}", other))),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        };
        f.write_str(label)
    }
}

/// Habitual activity level, each mapped to a fixed TDEE multiplier
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
    ExtraActive,
}

impl ActivityLevel {
    /// Multiplier applied to BMR to estimate total daily energy expenditure
    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }

    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
        ActivityLevel::ExtraActive,
    ];
}

impl FromStr for ActivityLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "SEDENTARY" => Ok(ActivityLevel::Sedentary),
            "LIGHTLY_ACTIVE" | "LIGHT" => Ok(ActivityLevel::LightlyActive),
            "MODERATELY_ACTIVE" | "MODERATE" => Ok(ActivityLevel::ModeratelyActive),
            "VERY_ACTIVE" | "VERY" => Ok(ActivityLevel::VeryActive),
            "EXTRA_ACTIVE" | "EXTRA" => Ok(ActivityLevel::ExtraActive),
            other => Err(Error::Validation(format!(
                "Unknown activity level: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ActivityLevel::Sedentary => "Sedentary (little or no exercise)",
            ActivityLevel::LightlyActive => "Lightly Active (1-3 days/week)",
            ActivityLevel::ModeratelyActive => "Moderately Active (3-5 days/week)",
            ActivityLevel::VeryActive => "Very Active (6-7 days/week)",
            ActivityLevel::ExtraActive => "Extra Active (twice a day)",
        };
        f.write_str(label)
    }
}

/// What the user is trying to achieve
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Goal {
    LoseWeight,
    GainMuscle,
    Maintain,
}

impl Goal {
    pub const ALL: [Goal; 3] = [Goal::LoseWeight, Goal::GainMuscle, Goal::Maintain];
}

impl FromStr for Goal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "LOSE_WEIGHT" | "LOSE" => Ok(Goal::LoseWeight),
            "GAIN_MUSCLE" | "GAIN" => Ok(Goal::GainMuscle),
            "MAINTAIN" => Ok(Goal::Maintain),
            other => Err(Error::Validation(format!("Unknown goal: {}", other))),
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Goal::LoseWeight => "Weight Loss",
            Goal::GainMuscle => "Muscle Gain",
            Goal::Maintain => "Maintenance",
        };
        f.write_str(label)
    }
}

/// Dietary restriction passed through to meal plan generation
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DietPreference {
    #[default]
    None,
    Vegetarian,
    Vegan,
    Keto,
    Paleo,
    Mediterranean,
}

impl FromStr for DietPreference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "NONE" => Ok(DietPreference::None),
            "VEGETARIAN" => Ok(DietPreference::Vegetarian),
            "VEGAN" => Ok(DietPreference::Vegan),
            "KETO" => Ok(DietPreference::Keto),
            "PALEO" => Ok(DietPreference::Paleo),
            "MEDITERRANEAN" => Ok(DietPreference::Mediterranean),
            other => Err(Error::Validation(format!(
                "Unknown diet preference: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for DietPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DietPreference::None => "No Restriction",
            DietPreference::Vegetarian => "Vegetarian",
            DietPreference::Vegan => "Vegan",
            DietPreference::Keto => "Keto",
            DietPreference::Paleo => "Paleo",
            DietPreference::Mediterranean => "Mediterranean",
        };
        f.write_str(label)
    }
}

// ============================================================================
// Calculator Records
// ============================================================================

/// Input to the nutrition target calculator
///
/// Ranges are enforced by `validation`, not by the calculator.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct BiometricProfile {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: u32,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

/// Daily energy and macro targets, all whole numbers
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NutritionTargets {
    /// kcal/day
    pub bmr: i32,
    /// kcal/day
    pub tdee: i32,
    /// kcal/day
    pub calorie_target: i32,
    /// grams/day
    pub protein_target: i32,
    /// grams/day
    pub fat_target: i32,
    /// grams/day, floored at zero
    pub carb_target: i32,
}

/// Protein, fat and carb allocation for a calorie target
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Macros {
    pub protein: i32,
    pub fat: i32,
    pub carbs: i32,
}

// ============================================================================
// Progress Types
// ============================================================================

/// A single body-weight reading
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WeightObservation {
    pub weight_kg: f64,
    pub recorded_at: DateTime<Utc>,
}

/// Outcome category of the progress adjustment engine
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    IncreaseCalories,
    DecreaseCalories,
    Maintain,
    InsufficientData,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Recommendation::IncreaseCalories => "increase_calories",
            Recommendation::DecreaseCalories => "decrease_calories",
            Recommendation::Maintain => "maintain",
            Recommendation::InsufficientData => "insufficient_data",
        };
        f.write_str(label)
    }
}

/// Calorie adjustment recommended from recent weight history
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProgressRecommendation {
    pub recommendation: Recommendation,
    /// kcal; zero unless the recommendation is increase/decrease
    pub adjustment_amount: i32,
    pub message: String,
    /// current - previous, when a previous observation exists
    pub weight_change_kg: Option<f64>,
    /// weight change relative to the previous observation, in percent
    pub percentage_change: Option<f64>,
}

impl ProgressRecommendation {
    /// Change to apply to the calorie target, negative for a decrease
    pub fn signed_adjustment(&self) -> i32 {
        match self.recommendation {
            Recommendation::IncreaseCalories => self.adjustment_amount,
            Recommendation::DecreaseCalories => -self.adjustment_amount,
            Recommendation::Maintain | Recommendation::InsufficientData => 0,
        }
    }
}

// ============================================================================
// Food Totals
// ============================================================================

/// Summed energy and macros of logged food
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct MacroTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl std::ops::Add for MacroTotals {
    type Output = MacroTotals;

    fn add(self, other: MacroTotals) -> MacroTotals {
        MacroTotals {
            calories: self.calories + other.calories,
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fat: self.fat + other.fat,
        }
    }
}

impl std::iter::Sum for MacroTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(MacroTotals::default(), |acc, m| acc + m)
    }
}

/// Unit used when displaying body weight
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
}
