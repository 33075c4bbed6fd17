//! Built-in food database.
//!
//! A small static list of common foods with per-serving energy and macros,
//! used to prefill food log entries. Search is a plain case-insensitive
//! substring filter on the name.

use crate::MacroTotals;
use once_cell::sync::Lazy;
use serde::Serialize;

/// A food with nutrition values for one serving
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct FoodItem {
    pub name: &'static str,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub serving: &'static str,
}

impl FoodItem {
    /// Energy and macros for a number of servings
    pub fn scaled(&self, servings: f64) -> MacroTotals {
        MacroTotals {
            calories: self.calories * servings,
            protein: self.protein * servings,
            carbs: self.carbs * servings,
            fat: self.fat * servings,
        }
    }
}

const fn food(
    name: &'static str,
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
    serving: &'static str,
) -> FoodItem {
    FoodItem {
        name,
        calories,
        protein,
        carbs,
        fat,
        serving,
    }
}

/// Cached food database - built once and reused across all lookups
static FOOD_DATABASE: Lazy<Vec<FoodItem>> = Lazy::new(|| {
    vec![
        // Proteins
        food("Chicken Breast (cooked)", 165.0, 31.0, 0.0, 3.6, "100g"),
        food("Salmon (cooked)", 208.0, 20.0, 0.0, 13.0, "100g"),
        food("Tuna (canned, in water)", 86.0, 19.0, 0.0, 0.5, "100g"),
        food("Eggs (large)", 72.0, 6.0, 0.4, 5.0, "1 egg (50g)"),
        food("Greek Yogurt (plain, 0%)", 59.0, 10.0, 3.6, 0.4, "100g"),
        food("Cottage Cheese", 98.0, 11.0, 3.4, 4.3, "100g"),
        food("Ground Beef (90% lean)", 215.0, 26.0, 0.0, 12.0, "100g"),
        food("Turkey Breast", 135.0, 30.0, 0.0, 1.0, "100g"),
        food("Shrimp", 85.0, 18.0, 0.9, 0.9, "100g"),
        food("Tofu (firm)", 76.0, 8.0, 1.9, 4.8, "100g"),
        food("Whey Protein Powder", 120.0, 24.0, 3.0, 1.5, "30g scoop"),
        food("Lentils (cooked)", 116.0, 9.0, 20.0, 0.4, "100g"),
        food("Chickpeas (cooked)", 164.0, 8.9, 27.0, 2.6, "100g"),
        food("Black Beans (cooked)", 132.0, 8.9, 24.0, 0.5, "100g"),

        // Carbohydrates
        food("White Rice (cooked)", 130.0, 2.7, 28.0, 0.3, "100g"),
        food("Brown Rice (cooked)", 112.0, 2.6, 24.0, 0.9, "100g"),
        food("Oats (dry)", 389.0, 17.0, 66.0, 7.0, "100g"),
        food("Bread (whole wheat)", 247.0, 13.0, 41.0, 3.4, "100g"),
        food("Pasta (cooked)", 131.0, 5.0, 25.0, 1.1, "100g"),
        food("Sweet Potato (cooked)", 86.0, 1.6, 20.0, 0.1, "100g"),
        food("Quinoa (cooked)", 120.0, 4.4, 21.0, 1.9, "100g"),
        food("Banana", 89.0, 1.1, 23.0, 0.3, "1 medium (118g)"),
        food("Apple", 52.0, 0.3, 14.0, 0.2, "1 medium (182g)"),
        food("Orange", 47.0, 0.9, 12.0, 0.1, "1 medium (131g)"),
        food("Blueberries", 57.0, 0.7, 14.0, 0.3, "100g"),
        food("Strawberries", 32.0, 0.7, 7.7, 0.3, "100g"),

        // Fats
        food("Olive Oil", 884.0, 0.0, 0.0, 100.0, "100ml"),
        food("Avocado", 160.0, 2.0, 9.0, 15.0, "100g"),
        food("Almonds", 579.0, 21.0, 22.0, 50.0, "100g"),
        food("Walnuts", 654.0, 15.0, 14.0, 65.0, "100g"),
        food("Peanut Butter", 588.0, 25.0, 20.0, 50.0, "100g"),
        food("Cheddar Cheese", 402.0, 25.0, 1.3, 33.0, "100g"),
        food("Butter", 717.0, 0.9, 0.1, 81.0, "100g"),

        // Vegetables
        food("Broccoli", 34.0, 2.8, 7.0, 0.4, "100g"),
        food("Spinach", 23.0, 2.9, 3.6, 0.4, "100g"),
        food("Mixed Salad Greens", 17.0, 1.6, 2.9, 0.2, "100g"),
        food("Tomato", 18.0, 0.9, 3.9, 0.2, "100g"),
        food("Cucumber", 15.0, 0.7, 3.6, 0.1, "100g"),
        food("Bell Pepper", 31.0, 1.0, 6.0, 0.3, "100g"),
        food("Mushrooms", 22.0, 3.1, 3.3, 0.3, "100g"),
        food("Onion", 40.0, 1.1, 9.3, 0.1, "100g"),
        food("Carrots", 41.0, 0.9, 10.0, 0.2, "100g"),
        food("Zucchini", 17.0, 1.2, 3.1, 0.3, "100g"),

        // Dairy & Alternatives
        food("Whole Milk", 61.0, 3.2, 4.8, 3.3, "100ml"),
        food("Skim Milk", 34.0, 3.4, 5.0, 0.1, "100ml"),
        food("Almond Milk (unsweetened)", 17.0, 0.6, 1.4, 1.4, "100ml"),

        // Snacks
        food("Rice Cakes", 387.0, 8.2, 82.0, 2.8, "100g"),
        food("Dark Chocolate (70%)", 600.0, 7.8, 46.0, 43.0, "100g"),
        food("Protein Bar (average)", 200.0, 20.0, 22.0, 5.0, "1 bar (60g)"),
    ]
});

/// Get a reference to the built-in food list
pub fn food_database() -> &'static [FoodItem] {
    &FOOD_DATABASE
}

/// Foods whose name contains `query`, case-insensitively, up to `limit`
///
/// A blank query returns the first `limit` foods.
pub fn search_foods(query: &str, limit: usize) -> Vec<&'static FoodItem> {
    let query = query.trim().to_lowercase();
    let results: Vec<_> = food_database()
        .iter()
        .filter(|f| query.is_empty() || f.name.to_lowercase().contains(&query))
        .take(limit)
        .collect();

    tracing::debug!("Food search {:?} matched {} items", query, results.len());
    results
}

/// Exact (case-insensitive) name lookup, falling back to the first match
pub fn find_food(name: &str) -> Option<&'static FoodItem> {
    let needle = name.trim().to_lowercase();
    food_database()
        .iter()
        .find(|f| f.name.to_lowercase() == needle)
        .or_else(|| search_foods(name, 1).into_iter().next())
}
