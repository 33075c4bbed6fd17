//! Progress adjustment engine.
//!
//! Turns the three most recent weight readings into a calorie
//! recommendation. Rules are evaluated in a fixed order and the first
//! match wins:
//!
//! 0. No previous reading → insufficient data
//! 1. Losing weight faster than 1% since the previous reading → increase
//! 2. Losing weight, within 0.2 kg of two readings ago (plateau) → decrease
//! 3. Gaining muscle but weight went down → increase
//! 4. Otherwise → maintain
//!
//! Plateau detection only applies to the weight-loss goal.

use crate::{Goal, ProgressRecommendation, Recommendation, WeightObservation};

/// Weekly loss (as % of body weight) above which the deficit is too steep
const RAPID_LOSS_THRESHOLD_PCT: f64 = -1.0;

/// Absolute change (kg) over two readings below which progress has stalled
const PLATEAU_THRESHOLD_KG: f64 = 0.2;

/// Fraction of the calorie target used for every adjustment
const ADJUSTMENT_FACTOR: f64 = 0.05;

/// Number of readings the engine looks at
pub const WINDOW: usize = 3;

fn adjustment_for(calorie_target: i32) -> i32 {
    (f64::from(calorie_target) * ADJUSTMENT_FACTOR).round() as i32
}

/// Analyze recent weight readings, newest first
///
/// Only the first three readings are considered (current, previous,
/// two-weeks-prior). An empty slice is treated like a single reading.
pub fn analyze_progress(
    observations: &[WeightObservation],
    calorie_target: i32,
    goal: Goal,
) -> ProgressRecommendation {
    let mut weights = observations.iter().take(WINDOW).map(|o| o.weight_kg);

    let Some(current) = weights.next() else {
        tracing::debug!("No weight observations, reporting insufficient data");
        return insufficient_data();
    };

    analyze_weekly_progress(current, weights.next(), weights.next(), calorie_target, goal)
}

/// Core decision procedure over explicit readings
pub fn analyze_weekly_progress(
    current: f64,
    previous: Option<f64>,
    two_weeks_ago: Option<f64>,
    calorie_target: i32,
    goal: Goal,
) -> ProgressRecommendation {
    let Some(previous) = previous else {
        return insufficient_data();
    };

    let weight_change = current - previous;
    let percentage_change = weight_change / previous * 100.0;

    tracing::debug!(
        "Weight change {:+.2} kg ({:+.2}%) for goal {:?}",
        weight_change,
        percentage_change,
        goal
    );

    let (recommendation, adjustment_amount, message) = if goal == Goal::LoseWeight
        && percentage_change < RAPID_LOSS_THRESHOLD_PCT
    {
        let adjustment = adjustment_for(calorie_target);
        (
            Recommendation::IncreaseCalories,
            adjustment,
            format!(
                "You're losing weight faster than recommended. Increasing calories by {} to preserve muscle.",
                adjustment
            ),
        )
    } else if goal == Goal::LoseWeight
        && two_weeks_ago.is_some_and(|w| (current - w).abs() < PLATEAU_THRESHOLD_KG)
    {
        let adjustment = adjustment_for(calorie_target);
        (
            Recommendation::DecreaseCalories,
            adjustment,
            format!(
                "Weight plateau detected. Reducing calories by {} to restart progress.",
                adjustment
            ),
        )
    } else if goal == Goal::GainMuscle && weight_change < 0.0 {
        let adjustment = adjustment_for(calorie_target);
        (
            Recommendation::IncreaseCalories,
            adjustment,
            format!(
                "You're losing weight while trying to gain muscle. Increasing calories by {}.",
                adjustment
            ),
        )
    } else {
        (
            Recommendation::Maintain,
            0,
            "Progress is on track. Keep up the great work!".to_string(),
        )
    };

    tracing::info!(
        "Progress recommendation: {} ({} kcal)",
        recommendation,
        adjustment_amount
    );

    ProgressRecommendation {
        recommendation,
        adjustment_amount,
        message,
        weight_change_kg: Some(weight_change),
        percentage_change: Some(percentage_change),
    }
}

fn insufficient_data() -> ProgressRecommendation {
    ProgressRecommendation {
        recommendation: Recommendation::InsufficientData,
        adjustment_amount: 0,
        message: "Not enough data yet. Keep logging your weight weekly.".to_string(),
        weight_change_kg: None,
        percentage_change: None,
    }
}
