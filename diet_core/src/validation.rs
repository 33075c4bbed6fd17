//! Boundary validation for user-supplied input.
//!
//! The calculators assume validated input and never check ranges
//! themselves. Callers run these checks before persisting or computing.

use crate::{BiometricProfile, Error, Result};
use std::ops::RangeInclusive;

pub const AGE_RANGE: RangeInclusive<u32> = 14..=100;
pub const HEIGHT_RANGE_CM: RangeInclusive<f64> = 100.0..=250.0;
pub const PROFILE_WEIGHT_RANGE_KG: RangeInclusive<f64> = 30.0..=500.0;
/// Weight log entries accept a wider range than the profile
pub const LOGGED_WEIGHT_RANGE_KG: RangeInclusive<f64> = 20.0..=500.0;
pub const NAME_LENGTH: RangeInclusive<usize> = 2..=60;
pub const FOOD_NAME_LENGTH: RangeInclusive<usize> = 1..=200;
pub const FOOD_CALORIES_RANGE: RangeInclusive<f64> = 0.0..=10_000.0;
pub const FOOD_MACRO_RANGE_G: RangeInclusive<f64> = 0.0..=1_000.0;

fn check_range(field: &str, value: f64, range: &RangeInclusive<f64>) -> Result<()> {
    if value.is_finite() && range.contains(&value) {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "{} must be between {} and {} (got {})",
            field,
            range.start(),
            range.end(),
            value
        )))
    }
}

fn check_length(field: &str, value: &str, range: &RangeInclusive<usize>) -> Result<()> {
    let len = value.trim().chars().count();
    if range.contains(&len) {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "{} must be {} to {} characters",
            field,
            range.start(),
            range.end()
        )))
    }
}

/// Check a biometric profile against the accepted ranges
pub fn validate_profile(profile: &BiometricProfile) -> Result<()> {
    if !AGE_RANGE.contains(&profile.age_years) {
        return Err(Error::Validation(format!(
            "age must be between {} and {} (got {})",
            AGE_RANGE.start(),
            AGE_RANGE.end(),
            profile.age_years
        )));
    }
    check_range("height", profile.height_cm, &HEIGHT_RANGE_CM)?;
    check_range("weight", profile.weight_kg, &PROFILE_WEIGHT_RANGE_KG)?;
    Ok(())
}

/// Check the weight carried on a profile update
pub fn validate_profile_weight(weight_kg: f64) -> Result<()> {
    check_range("weight", weight_kg, &PROFILE_WEIGHT_RANGE_KG)
}

/// Check a display name
pub fn validate_name(name: &str) -> Result<()> {
    check_length("name", name, &NAME_LENGTH)
}

/// Check a single weight log reading
pub fn validate_logged_weight(weight_kg: f64) -> Result<()> {
    check_range("weight", weight_kg, &LOGGED_WEIGHT_RANGE_KG)
}

/// Check a food log entry before it is appended
pub fn validate_food_entry(
    food_name: &str,
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
) -> Result<()> {
    check_length("food name", food_name, &FOOD_NAME_LENGTH)?;
    check_range("calories", calories, &FOOD_CALORIES_RANGE)?;
    check_range("protein", protein, &FOOD_MACRO_RANGE_G)?;
    check_range("carbs", carbs, &FOOD_MACRO_RANGE_G)?;
    check_range("fat", fat, &FOOD_MACRO_RANGE_G)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActivityLevel, Gender, Goal};

    fn profile(weight_kg: f64, height_cm: f64, age_years: u32) -> BiometricProfile {
        BiometricProfile {
            weight_kg,
            height_cm,
            age_years,
            gender: Gender::Female,
            activity_level: ActivityLevel::Sedentary,
            goal: Goal::Maintain,
        }
    }

    #[test]
    fn test_profile_bounds_inclusive() {
        assert!(validate_profile(&profile(30.0, 100.0, 14)).is_ok());
        assert!(validate_profile(&profile(500.0, 250.0, 100)).is_ok());
    }

    #[test]
    fn test_profile_out_of_range() {
        assert!(validate_profile(&profile(29.9, 170.0, 30)).is_err());
        assert!(validate_profile(&profile(70.0, 99.0, 30)).is_err());
        assert!(validate_profile(&profile(70.0, 170.0, 13)).is_err());
        assert!(validate_profile(&profile(70.0, 170.0, 101)).is_err());
        assert!(validate_profile(&profile(f64::NAN, 170.0, 30)).is_err());
    }

    #[test]
    fn test_logged_weight_range() {
        assert!(validate_logged_weight(20.0).is_ok());
        assert!(validate_logged_weight(19.9).is_err());
        assert!(validate_logged_weight(f64::INFINITY).is_err());
    }

    #[test]
    fn test_name_length() {
        assert!(validate_name("Al").is_ok());
        assert!(validate_name(" A ").is_err());
        assert!(validate_name(&"x".repeat(61)).is_err());
    }

    #[test]
    fn test_food_entry() {
        assert!(validate_food_entry("Banana", 89.0, 1.1, 23.0, 0.3).is_ok());
        assert!(validate_food_entry("", 89.0, 1.1, 23.0, 0.3).is_err());
        assert!(validate_food_entry("Banana", -1.0, 1.1, 23.0, 0.3).is_err());
        assert!(validate_food_entry("Banana", 89.0, 1.1, 1000.5, 0.3).is_err());
    }
}
