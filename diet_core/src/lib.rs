#![forbid(unsafe_code)]

//! Core domain model and calculations for the Nutri diet tracker.
//!
//! This crate provides:
//! - Domain types (biometric profile, targets, weight and food entries)
//! - Nutrition target calculator
//! - Progress adjustment engine
//! - Boundary validation
//! - Persistence (JSONL logs, profile state, CSV export)
//! - Built-in food database and meal plan handling

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod nutrition;
pub mod progress;
pub mod validation;
pub mod journal;
pub mod weight_log;
pub mod food_log;
pub mod profile;
pub mod foods;
pub mod meal_plan;
pub mod format;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use nutrition::{calculate_percentage, compute_nutrition_targets};
pub use progress::{analyze_progress, analyze_weekly_progress};
pub use journal::{EntrySink, JsonlJournal};
pub use profile::{ProfileUpdate, UserProfile};
pub use foods::{search_foods, FoodItem};
pub use meal_plan::{build_prompt, parse_meal_plan, MealPlanInput, WeeklyMealPlan};
