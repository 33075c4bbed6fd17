use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use diet_core::format::{
    format_calories, format_height, format_macro, format_weight, format_weight_change,
};
use diet_core::validation::PROFILE_WEIGHT_RANGE_KG;
use diet_core::*;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "nutri")]
#[command(about = "Diet tracking with adaptive calorie targets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the profile and compute nutrition targets
    Onboard {
        #[arg(long)]
        name: String,

        #[command(flatten)]
        biometrics: BiometricArgs,

        /// Dietary preference (none, vegetarian, vegan, keto, paleo, mediterranean)
        #[arg(long, default_value = "none")]
        diet: DietPreference,
    },

    /// Show or edit the stored profile
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },

    /// Compute targets without saving anything
    Calc {
        #[command(flatten)]
        biometrics: BiometricArgs,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Log a body-weight reading
    Weigh {
        /// Weight in kg (or lbs with --lbs)
        weight: f64,

        /// Read the weight as pounds
        #[arg(long)]
        lbs: bool,
    },

    /// List logged weights, oldest first
    Weights {
        /// Maximum number of readings (defaults to display.history_limit)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Analyze recent weight trend and recommend a calorie adjustment
    Analyze {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Food logging and the built-in food database
    Food {
        #[command(subcommand)]
        action: FoodCommand,
    },

    /// Weekly meal plans
    MealPlan {
        #[command(subcommand)]
        action: MealPlanCommand,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },

    /// Export weight and food logs to CSV
    Export {
        /// Output directory (defaults to <data-dir>/export)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct BiometricArgs {
    /// Age in years
    #[arg(long)]
    age: u32,

    /// male, female or other
    #[arg(long)]
    gender: Gender,

    /// Height in cm
    #[arg(long)]
    height: f64,

    /// Weight in kg
    #[arg(long)]
    weight: f64,

    /// lose-weight, gain-muscle or maintain
    #[arg(long)]
    goal: Goal,

    /// sedentary, lightly-active, moderately-active, very-active or extra-active
    #[arg(long)]
    activity: ActivityLevel,
}

impl BiometricArgs {
    fn to_profile(&self) -> BiometricProfile {
        BiometricProfile {
            weight_kg: self.weight,
            height_cm: self.height,
            age_years: self.age,
            gender: self.gender,
            activity_level: self.activity,
            goal: self.goal,
        }
    }
}

#[derive(Subcommand)]
enum ProfileCommand {
    /// Print the stored profile and targets
    Show,

    /// Update profile fields; targets are recomputed when needed
    Set {
        #[arg(long)]
        name: Option<String>,

        /// Weight in kg
        #[arg(long)]
        weight: Option<f64>,

        #[arg(long)]
        goal: Option<Goal>,

        #[arg(long)]
        activity: Option<ActivityLevel>,

        #[arg(long)]
        diet: Option<DietPreference>,
    },
}

#[derive(Subcommand)]
enum FoodCommand {
    /// Log a food, either with explicit values or from the food database
    Add {
        /// Food name (required unless --lookup is used)
        #[arg(long, required_unless_present = "lookup")]
        name: Option<String>,

        #[arg(long, conflicts_with = "lookup")]
        calories: Option<f64>,

        /// Protein in grams
        #[arg(long, conflicts_with = "lookup")]
        protein: Option<f64>,

        /// Carbohydrates in grams
        #[arg(long, conflicts_with = "lookup")]
        carbs: Option<f64>,

        /// Fat in grams
        #[arg(long, conflicts_with = "lookup")]
        fat: Option<f64>,

        /// Take the values from the food database
        #[arg(long, conflicts_with = "name")]
        lookup: Option<String>,

        /// Number of servings when using --lookup
        #[arg(long)]
        servings: Option<f64>,
    },

    /// Search the built-in food database
    Search {
        #[arg(default_value = "")]
        query: String,

        /// Maximum results (defaults to foods.search_limit)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show the food log for a day with totals against targets
    Today {
        /// Day to show (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Remove a logged entry by id
    Remove { id: Uuid },
}

#[derive(Subcommand)]
enum MealPlanCommand {
    /// Print the prompt used to generate a weekly plan
    Prompt,

    /// Validate a generated plan against the calorie target
    Check {
        file: PathBuf,

        /// Store the plan as this week's plan
        #[arg(long)]
        save: bool,
    },

    /// Show this week's stored plan
    Show,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Write a config file with default values
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Files under the data directory
struct DataPaths {
    profile: PathBuf,
    weights: PathBuf,
    food_log: PathBuf,
    meal_plans: PathBuf,
    export: PathBuf,
}

impl DataPaths {
    fn new(data_dir: &Path) -> Self {
        Self {
            profile: data_dir.join("profile.json"),
            weights: data_dir.join("weights.jsonl"),
            food_log: data_dir.join("food_log.jsonl"),
            meal_plans: data_dir.join("meal_plans"),
            export: data_dir.join("export"),
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    diet_core::logging::init();

    let cli = Cli::parse();

    // Determine data directory
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let paths = DataPaths::new(&data_dir);

    match cli.command {
        Commands::Onboard {
            name,
            biometrics,
            diet,
        } => cmd_onboard(&paths, &name, biometrics.to_profile(), diet),
        Commands::Profile { action } => match action {
            ProfileCommand::Show => cmd_profile_show(&paths, &config),
            ProfileCommand::Set {
                name,
                weight,
                goal,
                activity,
                diet,
            } => cmd_profile_set(
                &paths,
                ProfileUpdate {
                    name,
                    weight_kg: weight,
                    goal,
                    activity_level: activity,
                    diet_preference: diet,
                },
            ),
        },
        Commands::Calc { biometrics, json } => cmd_calc(biometrics.to_profile(), json),
        Commands::Weigh { weight, lbs } => {
            let weight_kg = if lbs {
                diet_core::format::lbs_to_kg(weight)
            } else {
                weight
            };
            cmd_weigh(&paths, weight_kg, &config)
        }
        Commands::Weights { limit } => {
            cmd_weights(&paths, limit.unwrap_or(config.display.history_limit), &config)
        }
        Commands::Analyze { json } => cmd_analyze(&paths, json, &config),
        Commands::Food { action } => match action {
            FoodCommand::Add {
                name,
                calories,
                protein,
                carbs,
                fat,
                lookup,
                servings,
            } => {
                let (food_name, macros) = match lookup {
                    Some(query) => {
                        let item = diet_core::foods::find_food(&query).ok_or_else(|| {
                            Error::NotFound(format!("No food matching '{}'", query))
                        })?;
                        (item.name.to_string(), item.scaled(servings.unwrap_or(1.0)))
                    }
                    None => {
                        let name = name.ok_or_else(|| {
                            Error::Validation("--name is required without --lookup".into())
                        })?;
                        let calories = calories.ok_or_else(|| {
                            Error::Validation("--calories is required without --lookup".into())
                        })?;
                        (
                            name,
                            MacroTotals {
                                calories,
                                protein: protein.unwrap_or(0.0),
                                carbs: carbs.unwrap_or(0.0),
                                fat: fat.unwrap_or(0.0),
                            },
                        )
                    }
                };
                cmd_food_add(&paths, &food_name, macros)
            }
            FoodCommand::Search { query, limit } => {
                cmd_food_search(&query, limit.unwrap_or(config.foods.search_limit))
            }
            FoodCommand::Today { date } => {
                cmd_food_today(&paths, date.unwrap_or_else(|| Local::now().date_naive()))
            }
            FoodCommand::Remove { id } => cmd_food_remove(&paths, id),
        },
        Commands::MealPlan { action } => match action {
            MealPlanCommand::Prompt => cmd_meal_plan_prompt(&paths),
            MealPlanCommand::Check { file, save } => cmd_meal_plan_check(&paths, &file, save),
            MealPlanCommand::Show => cmd_meal_plan_show(&paths),
        },
        Commands::Config { action } => match action {
            ConfigCommand::Init { force } => cmd_config_init(&Config::default_config_path(), force),
        },
        Commands::Export { out } => {
            let out_dir = out.unwrap_or_else(|| paths.export.clone());
            cmd_export(&paths, &out_dir)
        }
    }
}

fn cmd_onboard(
    paths: &DataPaths,
    name: &str,
    biometrics: BiometricProfile,
    diet: DietPreference,
) -> Result<()> {
    let (_, targets) = UserProfile::update(&paths.profile, |profile| {
        profile.onboard(name, biometrics, diet)
    })?;

    println!("✓ Profile saved for {}", name.trim());
    println!();
    display_targets(&targets);
    Ok(())
}

fn cmd_profile_show(paths: &DataPaths, config: &Config) -> Result<()> {
    let profile = UserProfile::load(&paths.profile)?;

    if !profile.onboarding_complete {
        println!("No profile yet. Run `nutri onboard` to create one.");
        return Ok(());
    }

    println!("Name:       {}", profile.name.as_deref().unwrap_or("-"));
    if let Some(age) = profile.age_years {
        println!("Age:        {}", age);
    }
    if let Some(gender) = profile.gender {
        println!("Gender:     {}", gender);
    }
    if let Some(height) = profile.height_cm {
        println!("Height:     {}", format_height(height));
    }
    if let Some(weight) = profile.weight_kg {
        println!("Weight:     {}", format_weight(weight, config.display.weight_unit));
    }
    if let Some(goal) = profile.goal {
        println!("Goal:       {}", goal);
    }
    if let Some(activity) = profile.activity_level {
        println!("Activity:   {}", activity);
    }
    println!("Diet:       {}", profile.diet_preference);

    if let Some(targets) = profile.targets {
        println!();
        display_targets(&targets);
    }
    Ok(())
}

fn cmd_profile_set(paths: &DataPaths, update: ProfileUpdate) -> Result<()> {
    let (profile, recomputed) =
        UserProfile::update(&paths.profile, |profile| profile.apply_update(update))?;

    println!("✓ Profile updated");
    if recomputed {
        if let Some(targets) = profile.targets {
            println!();
            display_targets(&targets);
        }
    }
    Ok(())
}

fn cmd_calc(biometrics: BiometricProfile, json: bool) -> Result<()> {
    diet_core::validation::validate_profile(&biometrics)?;
    let targets = compute_nutrition_targets(&biometrics);

    if json {
        println!("{}", serde_json::to_string_pretty(&targets)?);
    } else {
        display_targets(&targets);
    }
    Ok(())
}

fn cmd_weigh(paths: &DataPaths, weight_kg: f64, config: &Config) -> Result<()> {
    let observation = diet_core::weight_log::record_weight(&paths.weights, weight_kg, Utc::now())?;
    println!(
        "✓ Logged {}",
        format_weight(observation.weight_kg, config.display.weight_unit)
    );

    let profile = UserProfile::load(&paths.profile)?;
    if !profile.onboarding_complete {
        return Ok(());
    }
    if !PROFILE_WEIGHT_RANGE_KG.contains(&weight_kg) {
        tracing::warn!(
            "Weight {} kg is outside the profile range, profile not updated",
            weight_kg
        );
        return Ok(());
    }

    let (profile, recomputed) = UserProfile::update(&paths.profile, |profile| {
        profile.apply_update(ProfileUpdate {
            weight_kg: Some(weight_kg),
            ..Default::default()
        })
    })?;

    if recomputed {
        if let Some(targets) = profile.targets {
            println!(
                "  New calorie target: {}",
                format_calories(f64::from(targets.calorie_target))
            );
        }
    }
    Ok(())
}

fn cmd_weights(paths: &DataPaths, limit: usize, config: &Config) -> Result<()> {
    let history = diet_core::weight_log::load_history_page(&paths.weights, limit)?;

    if history.is_empty() {
        println!("No weight readings logged yet.");
        return Ok(());
    }

    for obs in &history {
        println!(
            "{}  {}",
            obs.recorded_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            format_weight(obs.weight_kg, config.display.weight_unit)
        );
    }
    Ok(())
}

fn cmd_analyze(paths: &DataPaths, json: bool, config: &Config) -> Result<()> {
    let profile = UserProfile::load(&paths.profile)?;
    let recent = diet_core::weight_log::load_recent(&paths.weights, diet_core::progress::WINDOW)?;

    let calorie_target = profile
        .targets
        .map(|t| t.calorie_target)
        .unwrap_or(config.analysis.fallback_calorie_target);
    let goal = profile.goal_or_default();

    let result = analyze_progress(&recent, calorie_target, goal);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("Goal:            {}", goal);
    println!("Calorie target:  {}", format_calories(f64::from(calorie_target)));
    if let Some(change) = result.weight_change_kg {
        println!(
            "Weekly change:   {}",
            format_weight_change(change, config.display.weight_unit)
        );
    }
    println!("Recommendation:  {}", result.recommendation);
    let delta = result.signed_adjustment();
    if delta != 0 {
        println!(
            "Adjustment:      {:+} kcal (new target {})",
            delta,
            format_calories(f64::from(calorie_target + delta))
        );
    }
    println!();
    println!("{}", result.message);
    Ok(())
}

fn cmd_food_add(paths: &DataPaths, food_name: &str, macros: MacroTotals) -> Result<()> {
    let entry = diet_core::food_log::add_entry(&paths.food_log, food_name, macros, Utc::now())?;

    println!(
        "✓ Logged {} ({})",
        entry.food_name,
        format_calories(entry.calories)
    );
    println!("  id: {}", entry.id);
    Ok(())
}

fn cmd_food_search(query: &str, limit: usize) -> Result<()> {
    let results = search_foods(query, limit);

    if results.is_empty() {
        println!("No foods match '{}'", query);
        return Ok(());
    }

    for item in results {
        println!(
            "{:<28} {:>9}  P {:>4}  C {:>4}  F {:>4}  per {}",
            item.name,
            format_calories(item.calories),
            format_macro(item.protein),
            format_macro(item.carbs),
            format_macro(item.fat),
            item.serving
        );
    }
    Ok(())
}

fn cmd_food_today(paths: &DataPaths, date: NaiveDate) -> Result<()> {
    let entries = diet_core::food_log::entries_on(&paths.food_log, date)?;
    let totals = diet_core::food_log::totals(&entries);

    println!("Food log for {}", date.format("%Y-%m-%d"));
    println!();

    if entries.is_empty() {
        println!("  Nothing logged.");
    }
    for entry in &entries {
        println!(
            "  {}  {:<28} {:>9}  {}",
            entry.logged_at.with_timezone(&Local).format("%H:%M"),
            entry.food_name,
            format_calories(entry.calories),
            entry.id
        );
    }

    println!();
    let profile = UserProfile::load(&paths.profile)?;
    match profile.targets {
        Some(targets) => {
            display_progress_line("Calories", totals.calories, targets.calorie_target, " kcal");
            display_progress_line("Protein", totals.protein, targets.protein_target, "g");
            display_progress_line("Carbs", totals.carbs, targets.carb_target, "g");
            display_progress_line("Fat", totals.fat, targets.fat_target, "g");
        }
        None => {
            println!("  Calories  {}", format_calories(totals.calories));
            println!(
                "  Protein {}  Carbs {}  Fat {}",
                format_macro(totals.protein),
                format_macro(totals.carbs),
                format_macro(totals.fat)
            );
        }
    }
    Ok(())
}

fn display_progress_line(label: &str, consumed: f64, target: i32, unit: &str) {
    println!(
        "  {:<9} {:>5.0} / {}{}  ({}%)",
        label,
        consumed,
        target,
        unit,
        calculate_percentage(consumed, f64::from(target))
    );
}

fn cmd_food_remove(paths: &DataPaths, id: Uuid) -> Result<()> {
    let removed = diet_core::food_log::remove_entry(&paths.food_log, id)?;
    println!("✓ Removed {} ({})", removed.food_name, format_calories(removed.calories));
    Ok(())
}

fn cmd_meal_plan_prompt(paths: &DataPaths) -> Result<()> {
    let profile = UserProfile::load(&paths.profile)?;
    let input = MealPlanInput::from_profile(&profile)?;
    println!("{}", build_prompt(&input));
    Ok(())
}

fn cmd_meal_plan_check(paths: &DataPaths, file: &Path, save: bool) -> Result<()> {
    let profile = UserProfile::load(&paths.profile)?;
    let targets = profile.require_targets()?;

    let contents = std::fs::read_to_string(file)?;
    let plan = parse_meal_plan(&contents)?;

    println!(
        "Daily calorie target: {} (±{:.0}%)",
        format_calories(f64::from(targets.calorie_target)),
        diet_core::meal_plan::CALORIE_TOLERANCE * 100.0
    );
    println!();
    for day in &plan.week_plan {
        let within = day.within_tolerance(
            targets.calorie_target,
            diet_core::meal_plan::CALORIE_TOLERANCE,
        );
        let mark = if within { "✓" } else { "✗" };
        println!(
            "  {} {:<10} {:>10}  P {:>5}  C {:>5}  F {:>5}",
            mark,
            day.day,
            format_calories(day.daily_totals.calories),
            format_macro(day.daily_totals.protein),
            format_macro(day.daily_totals.carbs),
            format_macro(day.daily_totals.fat)
        );
    }

    let off_target = plan.days_off_target(targets.calorie_target).len();
    println!();
    if off_target == 0 {
        println!("All days within tolerance.");
    } else {
        println!("{} day(s) outside tolerance.", off_target);
    }

    if save {
        let path = diet_core::meal_plan::save_plan(
            &paths.meal_plans,
            Local::now().date_naive(),
            &plan,
        )?;
        println!("✓ Saved plan to {}", path.display());
    }
    Ok(())
}

fn cmd_meal_plan_show(paths: &DataPaths) -> Result<()> {
    let today = Local::now().date_naive();
    let Some(plan) = diet_core::meal_plan::load_plan(&paths.meal_plans, today)? else {
        println!("No meal plan stored for this week.");
        return Ok(());
    };

    println!(
        "Meal plan for week of {}",
        diet_core::meal_plan::week_start(today).format("%Y-%m-%d")
    );
    for day in &plan.week_plan {
        println!();
        println!("{} ({})", day.day, format_calories(day.daily_totals.calories));
        for (label, meal) in day.meals.iter() {
            println!(
                "  {:<10} {} ({})",
                label,
                meal.name,
                format_calories(meal.total_calories)
            );
        }
    }

    let grocery = &plan.grocery_list;
    let sections = [
        ("Proteins", &grocery.proteins),
        ("Carbohydrates", &grocery.carbohydrates),
        ("Fats", &grocery.fats),
        ("Vegetables", &grocery.vegetables),
        ("Fruits", &grocery.fruits),
        ("Other", &grocery.other),
    ];
    println!();
    println!("Grocery list");
    for (label, items) in sections {
        if !items.is_empty() {
            println!("  {}: {}", label, items.join(", "));
        }
    }
    Ok(())
}

fn cmd_config_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        println!("Config already exists at {}", path.display());
        println!("Use --force to overwrite it with defaults.");
        return Ok(());
    }

    Config::default().save_to(path)?;
    println!("✓ Wrote default config to {}", path.display());
    Ok(())
}

fn cmd_export(paths: &DataPaths, out_dir: &Path) -> Result<()> {
    let weights_csv = out_dir.join("weights.csv");
    let food_csv = out_dir.join("food_log.csv");

    let weights = diet_core::export::export_weights(&paths.weights, &weights_csv)?;
    let foods = diet_core::export::export_food_log(&paths.food_log, &food_csv)?;

    println!("✓ Exported {} weight readings to {}", weights, weights_csv.display());
    println!("✓ Exported {} food entries to {}", foods, food_csv.display());
    Ok(())
}

fn display_targets(targets: &NutritionTargets) {
    println!("BMR:             {}", format_calories(f64::from(targets.bmr)));
    println!("TDEE:            {}", format_calories(f64::from(targets.tdee)));
    println!(
        "Calorie target:  {}",
        format_calories(f64::from(targets.calorie_target))
    );
    println!("Protein:         {}", format_macro(f64::from(targets.protein_target)));
    println!("Fat:             {}", format_macro(f64::from(targets.fat_target)));
    println!("Carbs:           {}", format_macro(f64::from(targets.carb_target)));
}
