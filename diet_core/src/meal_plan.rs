//! Weekly meal plans.
//!
//! Plans are produced by an external text-generation service from a
//! prompt built here. This module owns the prompt, the JSON schema the
//! service must answer with, validation of the answer, and storage of the
//! accepted plan keyed by the Monday of its week.

use crate::{DietPreference, Error, Goal, MacroTotals, Result, UserProfile};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Days in a generated plan
pub const DAYS_PER_PLAN: usize = 7;

/// Allowed deviation of a day's calories from the target
pub const CALORIE_TOLERANCE: f64 = 0.05;

/// A single food within a meal
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MealFood {
    pub item: String,
    pub amount: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub name: String,
    pub foods: Vec<MealFood>,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DayMeals {
    pub breakfast: Meal,
    pub lunch: Meal,
    pub dinner: Meal,
    pub snack: Meal,
}

impl DayMeals {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Meal)> {
        [
            ("Breakfast", &self.breakfast),
            ("Lunch", &self.lunch),
            ("Dinner", &self.dinner),
            ("Snack", &self.snack),
        ]
        .into_iter()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub day: String,
    pub meals: DayMeals,
    pub daily_totals: MacroTotals,
}

impl DayPlan {
    /// Whether the day's calories are within `tolerance` (fraction) of target
    pub fn within_tolerance(&self, calorie_target: i32, tolerance: f64) -> bool {
        let target = f64::from(calorie_target);
        (self.daily_totals.calories - target).abs() <= target * tolerance
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct GroceryList {
    #[serde(default)]
    pub proteins: Vec<String>,
    #[serde(default)]
    pub carbohydrates: Vec<String>,
    #[serde(default)]
    pub fats: Vec<String>,
    #[serde(default)]
    pub vegetables: Vec<String>,
    #[serde(default)]
    pub fruits: Vec<String>,
    #[serde(default)]
    pub other: Vec<String>,
}

/// A seven-day plan as returned by the generator
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyMealPlan {
    pub week_plan: Vec<DayPlan>,
    #[serde(default)]
    pub grocery_list: GroceryList,
}

impl WeeklyMealPlan {
    /// Days whose calories fall outside the tolerance band
    pub fn days_off_target(&self, calorie_target: i32) -> Vec<&DayPlan> {
        self.week_plan
            .iter()
            .filter(|d| !d.within_tolerance(calorie_target, CALORIE_TOLERANCE))
            .collect()
    }
}

/// Everything the prompt needs about the user
#[derive(Clone, Debug, PartialEq)]
pub struct MealPlanInput {
    pub calorie_target: i32,
    pub protein_target: i32,
    pub carb_target: i32,
    pub fat_target: i32,
    pub diet_preference: DietPreference,
    pub goal: Goal,
    pub weight_kg: f64,
}

impl MealPlanInput {
    /// Build from a profile that has completed onboarding
    pub fn from_profile(profile: &UserProfile) -> Result<Self> {
        let targets = profile.require_targets()?;
        let weight_kg = profile
            .weight_kg
            .ok_or_else(|| Error::Profile("Profile has no weight".into()))?;

        Ok(Self {
            calorie_target: targets.calorie_target,
            protein_target: targets.protein_target,
            carb_target: targets.carb_target,
            fat_target: targets.fat_target,
            diet_preference: profile.diet_preference,
            goal: profile.goal_or_default(),
            weight_kg,
        })
    }
}

fn goal_phrase(goal: Goal) -> &'static str {
    match goal {
        Goal::LoseWeight => "lose weight",
        Goal::GainMuscle => "gain muscle",
        Goal::Maintain => "maintain",
    }
}

const RESPONSE_SCHEMA: &str = r#"{
  "weekPlan": [
    {
      "day": "Monday",
      "meals": {
        "breakfast": {
          "name": "Meal name",
          "foods": [
            {"item": "food name", "amount": "100g", "calories": 150, "protein": 10, "carbs": 15, "fat": 5}
          ],
          "totalCalories": 400,
          "totalProtein": 30,
          "totalCarbs": 40,
          "totalFat": 12
        },
        "lunch": { "name": "...", "foods": [...], "totalCalories": 0, "totalProtein": 0, "totalCarbs": 0, "totalFat": 0 },
        "dinner": { "name": "...", "foods": [...], "totalCalories": 0, "totalProtein": 0, "totalCarbs": 0, "totalFat": 0 },
        "snack": { "name": "...", "foods": [...], "totalCalories": 0, "totalProtein": 0, "totalCarbs": 0, "totalFat": 0 }
      },
      "dailyTotals": { "calories": 0, "protein": 0, "carbs": 0, "fat": 0 }
    }
  ],
  "groceryList": {
    "proteins": ["..."],
    "carbohydrates": ["..."],
    "fats": ["..."],
    "vegetables": ["..."],
    "fruits": ["..."],
    "other": ["..."]
  }
}"#;

/// Prompt asking the generator for a seven-day plan
pub fn build_prompt(input: &MealPlanInput) -> String {
    let diet_text = match input.diet_preference {
        DietPreference::None => "no specific dietary restrictions".to_string(),
        other => other.to_string(),
    };

    format!(
        "You are a professional certified nutritionist. Generate a complete 7-day meal plan.

User Profile:
- Daily Calorie Target: {calories} kcal (stay within ±5%)
- Protein Target: {protein}g per day
- Carbohydrate Target: {carbs}g per day
- Fat Target: {fat}g per day
- Dietary Preference: {diet}
- Goal: {goal}
- Current Weight: {weight}kg

Requirements:
1. Each day must include breakfast, lunch, dinner, and 1 snack
2. Every meal must list specific foods with exact quantities (grams or ml)
3. Provide estimated calories and macros (protein, carbs, fat in grams) per food item and meal total
4. Daily totals must be within ±5% of calorie target
5. Meals should be practical, delicious, and varied across the week
6. Respect the dietary preference strictly
7. Include a comprehensive grocery list organized by category

Return ONLY valid JSON matching this exact schema:
{schema}",
        calories = input.calorie_target,
        protein = input.protein_target,
        carbs = input.carb_target,
        fat = input.fat_target,
        diet = diet_text,
        goal = goal_phrase(input.goal),
        weight = input.weight_kg,
        schema = RESPONSE_SCHEMA,
    )
}

/// Parse and validate a generator response
pub fn parse_meal_plan(content: &str) -> Result<WeeklyMealPlan> {
    if content.trim().is_empty() {
        return Err(Error::MealPlan("No response received from generator".into()));
    }

    let plan: WeeklyMealPlan = serde_json::from_str(content)
        .map_err(|e| Error::MealPlan(format!("Failed to parse generator response: {}", e)))?;

    if plan.week_plan.len() != DAYS_PER_PLAN {
        return Err(Error::MealPlan(format!(
            "Meal plan must contain exactly {} days (got {})",
            DAYS_PER_PLAN,
            plan.week_plan.len()
        )));
    }

    tracing::debug!("Parsed meal plan with {} days", plan.week_plan.len());
    Ok(plan)
}

/// Monday of the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

fn plan_path(dir: &Path, week: NaiveDate) -> PathBuf {
    dir.join(format!("{}.json", week_start(week).format("%Y-%m-%d")))
}

/// Store an accepted plan for the week containing `week`
pub fn save_plan(dir: &Path, week: NaiveDate, plan: &WeeklyMealPlan) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = plan_path(dir, week);

    // Write to a temp file in the same directory and rename over the old plan
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(serde_json::to_string_pretty(plan)?.as_bytes())?;
    temp.as_file().sync_all()?;
    temp.persist(&path).map_err(|e| Error::Io(e.error))?;

    tracing::info!("Saved meal plan to {:?}", path);
    Ok(path)
}

/// Load the stored plan for the week containing `week`, if any
pub fn load_plan(dir: &Path, week: NaiveDate) -> Result<Option<WeeklyMealPlan>> {
    let path = plan_path(dir, week);
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&path)?;
    Ok(Some(serde_json::from_str(&contents)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActivityLevel, BiometricProfile, Gender};

    fn meal(name: &str, calories: f64) -> serde_json::Value {
        serde_json::json!({
            "name": name,
            "foods": [
                {"item": "Oats", "amount": "80g", "calories": calories, "protein": 10, "carbs": 40, "fat": 5}
            ],
            "totalCalories": calories,
            "totalProtein": 10,
            "totalCarbs": 40,
            "totalFat": 5
        })
    }

    fn plan_json(days: usize, daily_calories: f64) -> String {
        let day_names = [
            "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday", "Extra",
        ];
        let week: Vec<_> = day_names
            .iter()
            .take(days)
            .map(|day| {
                serde_json::json!({
                    "day": day,
                    "meals": {
                        "breakfast": meal("Porridge", daily_calories / 4.0),
                        "lunch": meal("Bowl", daily_calories / 4.0),
                        "dinner": meal("Stew", daily_calories / 4.0),
                        "snack": meal("Fruit", daily_calories / 4.0)
                    },
                    "dailyTotals": {"calories": daily_calories, "protein": 40, "carbs": 160, "fat": 20}
                })
            })
            .collect();

        serde_json::json!({
            "weekPlan": week,
            "groceryList": {"proteins": ["Eggs"], "fruits": ["Banana"]}
        })
        .to_string()
    }

    fn input() -> MealPlanInput {
        MealPlanInput {
            calorie_target: 2056,
            protein_target: 84,
            carb_target: 302,
            fat_target: 57,
            diet_preference: DietPreference::None,
            goal: Goal::LoseWeight,
            weight_kg: 70.0,
        }
    }

    #[test]
    fn test_prompt_includes_targets() {
        let prompt = build_prompt(&input());
        assert!(prompt.contains("Daily Calorie Target: 2056 kcal"));
        assert!(prompt.contains("Protein Target: 84g"));
        assert!(prompt.contains("no specific dietary restrictions"));
        assert!(prompt.contains("Goal: lose weight"));
        assert!(prompt.contains("\"weekPlan\""));
    }

    #[test]
    fn test_prompt_names_diet() {
        let prompt = build_prompt(&MealPlanInput {
            diet_preference: DietPreference::Mediterranean,
            ..input()
        });
        assert!(prompt.contains("Dietary Preference: Mediterranean"));
    }

    #[test]
    fn test_parse_valid_plan() {
        let plan = parse_meal_plan(&plan_json(7, 2000.0)).unwrap();
        assert_eq!(plan.week_plan.len(), 7);
        assert_eq!(plan.week_plan[0].meals.breakfast.total_calories, 500.0);
        assert_eq!(plan.grocery_list.proteins, vec!["Eggs"]);
        assert!(plan.grocery_list.vegetables.is_empty());
    }

    #[test]
    fn test_parse_rejects_wrong_day_count() {
        assert!(matches!(
            parse_meal_plan(&plan_json(6, 2000.0)),
            Err(Error::MealPlan(_))
        ));
        assert!(parse_meal_plan(&plan_json(8, 2000.0)).is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_meal_plan(""), Err(Error::MealPlan(_))));
        assert!(matches!(
            parse_meal_plan("```json\n{}\n```"),
            Err(Error::MealPlan(_))
        ));
    }

    #[test]
    fn test_tolerance_band() {
        let plan = parse_meal_plan(&plan_json(7, 2100.0)).unwrap();
        // 2100 is within 5% of 2056 (102.8)
        assert!(plan.days_off_target(2056).is_empty());
        // but not of 1800 (90)
        assert_eq!(plan.days_off_target(1800).len(), 7);
    }

    #[test]
    fn test_week_start_is_monday() {
        let thursday = NaiveDate::from_ymd_opt(2024, 1, 18).unwrap();
        let monday = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(week_start(thursday), monday);
        assert_eq!(week_start(monday), monday);
    }

    #[test]
    fn test_save_and_load_plan_by_week() {
        let temp_dir = tempfile::tempdir().unwrap();
        let plan = parse_meal_plan(&plan_json(7, 2000.0)).unwrap();
        let wednesday = NaiveDate::from_ymd_opt(2024, 1, 17).unwrap();

        let path = save_plan(temp_dir.path(), wednesday, &plan).unwrap();
        assert!(path.ends_with("2024-01-15.json"));

        let sunday = NaiveDate::from_ymd_opt(2024, 1, 21).unwrap();
        assert_eq!(load_plan(temp_dir.path(), sunday).unwrap(), Some(plan));

        let next_week = NaiveDate::from_ymd_opt(2024, 1, 22).unwrap();
        assert!(load_plan(temp_dir.path(), next_week).unwrap().is_none());
    }

    #[test]
    fn test_input_from_profile() {
        let mut profile = UserProfile::default();
        assert!(MealPlanInput::from_profile(&profile).is_err());

        profile
            .onboard(
                "Sam",
                BiometricProfile {
                    weight_kg: 70.0,
                    height_cm: 175.0,
                    age_years: 30,
                    gender: Gender::Male,
                    activity_level: ActivityLevel::ModeratelyActive,
                    goal: Goal::LoseWeight,
                },
                DietPreference::Keto,
            )
            .unwrap();

        assert_eq!(
            MealPlanInput::from_profile(&profile).unwrap(),
            MealPlanInput {
                diet_preference: DietPreference::Keto,
                ..input()
            }
        );
    }

    #[test]
    fn test_save_plan_replaces_previous_atomically() {
        let temp_dir = tempfile::tempdir().unwrap();
        let monday = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();

        let first = parse_meal_plan(&plan_json(7, 2000.0)).unwrap();
        let second = parse_meal_plan(&plan_json(7, 2400.0)).unwrap();
        save_plan(temp_dir.path(), monday, &first).unwrap();
        save_plan(temp_dir.path(), monday, &second).unwrap();

        assert_eq!(load_plan(temp_dir.path(), monday).unwrap(), Some(second));

        let names: Vec<String> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["2024-01-15.json"]);
    }
}
