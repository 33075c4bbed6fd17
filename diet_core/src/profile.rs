//! User profile persistence with file locking.
//!
//! The profile holds the biometric fields and the targets computed from
//! them. Targets are never edited directly: any change to weight, goal or
//! activity level triggers a full recomputation.

use crate::nutrition::compute_nutrition_targets;
use crate::validation::{validate_name, validate_profile, validate_profile_weight};
use crate::{
    ActivityLevel, BiometricProfile, DietPreference, Error, Gender, Goal, NutritionTargets, Result,
};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Weight assumed when a recompute is triggered before any weight is known
const FALLBACK_WEIGHT_KG: f64 = 70.0;

/// Persistent user profile
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct UserProfile {
    pub name: Option<String>,
    pub age_years: Option<u32>,
    pub gender: Option<Gender>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub goal: Option<Goal>,
    pub activity_level: Option<ActivityLevel>,
    #[serde(default)]
    pub diet_preference: DietPreference,
    pub targets: Option<NutritionTargets>,
    #[serde(default)]
    pub onboarding_complete: bool,
}

/// Partial edit of an existing profile; `None` leaves a field unchanged
#[derive(Clone, Debug, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub weight_kg: Option<f64>,
    pub goal: Option<Goal>,
    pub activity_level: Option<ActivityLevel>,
    pub diet_preference: Option<DietPreference>,
}

impl ProfileUpdate {
    fn affects_targets(&self) -> bool {
        self.weight_kg.is_some() || self.goal.is_some() || self.activity_level.is_some()
    }
}

impl UserProfile {
    /// Biometric profile, if every field the calculator needs is present
    pub fn biometrics(&self) -> Option<BiometricProfile> {
        Some(BiometricProfile {
            weight_kg: self.weight_kg?,
            height_cm: self.height_cm?,
            age_years: self.age_years?,
            gender: self.gender?,
            activity_level: self.activity_level?,
            goal: self.goal?,
        })
    }

    /// Goal used for progress analysis when none has been chosen
    pub fn goal_or_default(&self) -> Goal {
        self.goal.unwrap_or(Goal::Maintain)
    }

    /// Populate the profile from onboarding answers and compute targets
    pub fn onboard(
        &mut self,
        name: &str,
        biometrics: BiometricProfile,
        diet_preference: DietPreference,
    ) -> Result<NutritionTargets> {
        validate_name(name)?;
        validate_profile(&biometrics)?;

        let targets = compute_nutrition_targets(&biometrics);

        self.name = Some(name.trim().to_string());
        self.age_years = Some(biometrics.age_years);
        self.gender = Some(biometrics.gender);
        self.height_cm = Some(biometrics.height_cm);
        self.weight_kg = Some(biometrics.weight_kg);
        self.goal = Some(biometrics.goal);
        self.activity_level = Some(biometrics.activity_level);
        self.diet_preference = diet_preference;
        self.targets = Some(targets);
        self.onboarding_complete = true;

        tracing::info!(
            "Onboarded profile with calorie target {}",
            targets.calorie_target
        );
        Ok(targets)
    }

    /// Apply a partial update
    ///
    /// Targets are recomputed when weight, goal or activity level change
    /// and height, age and gender are known. Missing activity level and
    /// goal fall back to moderately active and maintain. Returns whether
    /// targets were recomputed.
    pub fn apply_update(&mut self, update: ProfileUpdate) -> Result<bool> {
        if let Some(ref name) = update.name {
            validate_name(name)?;
        }
        if let Some(weight_kg) = update.weight_kg {
            validate_profile_weight(weight_kg)?;
        }

        let recompute = update.affects_targets();

        if let Some(name) = update.name {
            self.name = Some(name.trim().to_string());
        }
        if let Some(weight_kg) = update.weight_kg {
            self.weight_kg = Some(weight_kg);
        }
        if let Some(goal) = update.goal {
            self.goal = Some(goal);
        }
        if let Some(activity_level) = update.activity_level {
            self.activity_level = Some(activity_level);
        }
        if let Some(diet_preference) = update.diet_preference {
            self.diet_preference = diet_preference;
        }

        if !recompute {
            return Ok(false);
        }

        let (Some(height_cm), Some(age_years), Some(gender)) =
            (self.height_cm, self.age_years, self.gender)
        else {
            tracing::debug!("Profile incomplete, skipping target recomputation");
            return Ok(false);
        };

        let biometrics = BiometricProfile {
            weight_kg: self.weight_kg.unwrap_or(FALLBACK_WEIGHT_KG),
            height_cm,
            age_years,
            gender,
            activity_level: self
                .activity_level
                .unwrap_or(ActivityLevel::ModeratelyActive),
            goal: self.goal.unwrap_or(Goal::Maintain),
        };
        self.targets = Some(compute_nutrition_targets(&biometrics));

        tracing::info!("Recomputed nutrition targets after profile update");
        Ok(true)
    }

    /// Targets, or an error explaining that onboarding is required
    pub fn require_targets(&self) -> Result<NutritionTargets> {
        self.targets.ok_or_else(|| {
            Error::Profile("No nutrition targets yet; run `nutri onboard` first".into())
        })
    }

    /// Load profile from a file with shared locking
    ///
    /// Returns default profile if file doesn't exist.
    /// If file is corrupted, logs a warning and returns default profile.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No profile file found, using empty profile");
            return Ok(Self::default());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(
                    "Unable to open profile {:?}: {}. Using empty profile.",
                    path,
                    e
                );
                return Ok(Self::default());
            }
        };

        // Acquire shared lock for reading
        if let Err(e) = file.lock_shared() {
            tracing::warn!(
                "Unable to lock profile {:?}: {}. Using empty profile.",
                path,
                e
            );
            return Ok(Self::default());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!(
                "Failed to read profile {:?}: {}. Using empty profile.",
                path,
                e
            );
            return Ok(Self::default());
        }

        file.unlock()?;

        match serde_json::from_str::<UserProfile>(&contents) {
            Ok(profile) => {
                tracing::debug!("Loaded profile from {:?}", path);
                Ok(profile)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse profile {:?}: {}. Using empty profile.",
                    path,
                    e
                );
                Ok(Self::default())
            }
        }
    }

    /// Save profile to a file with exclusive locking
    ///
    /// Atomically writes by:
    /// 1. Writing to a temp file
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Create unique temp file in the same directory for atomic rename
        let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "profile path missing parent")
        })?)?;

        // Acquire exclusive lock on the temp file to serialize concurrent writers
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string_pretty(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        // Atomically replace old profile
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved profile to {:?}", path);
        Ok(())
    }

    /// Load profile, modify it, and save it back atomically
    pub fn update<F, T>(path: &Path, f: F) -> Result<(Self, T)>
    where
        F: FnOnce(&mut UserProfile) -> Result<T>,
    {
        let mut profile = Self::load(path)?;
        let outcome = f(&mut profile)?;
        profile.save(path)?;
        Ok((profile, outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn biometrics() -> BiometricProfile {
        BiometricProfile {
            weight_kg: 70.0,
            height_cm: 175.0,
            age_years: 30,
            gender: Gender::Male,
            activity_level: ActivityLevel::ModeratelyActive,
            goal: Goal::Maintain,
        }
    }

    fn onboarded() -> UserProfile {
        let mut profile = UserProfile::default();
        profile
            .onboard("Sam", biometrics(), DietPreference::None)
            .unwrap();
        profile
    }

    #[test]
    fn test_onboard_computes_targets() {
        let profile = onboarded();
        assert!(profile.onboarding_complete);
        assert_eq!(profile.biometrics(), Some(biometrics()));
        assert_eq!(profile.targets.unwrap().calorie_target, 2556);
    }

    #[test]
    fn test_onboard_rejects_invalid() {
        let mut profile = UserProfile::default();
        let too_young = BiometricProfile {
            age_years: 12,
            ..biometrics()
        };
        assert!(profile
            .onboard("Sam", too_young, DietPreference::None)
            .is_err());
        assert!(profile.targets.is_none());
        assert!(!profile.onboarding_complete);
    }

    #[test]
    fn test_update_goal_recomputes() {
        let mut profile = onboarded();
        let recomputed = profile
            .apply_update(ProfileUpdate {
                goal: Some(Goal::LoseWeight),
                ..Default::default()
            })
            .unwrap();

        assert!(recomputed);
        let targets = profile.targets.unwrap();
        assert_eq!(targets.calorie_target, 2056);
        assert_eq!(targets.protein_target, 84);
    }

    #[test]
    fn test_update_diet_only_keeps_targets() {
        let mut profile = onboarded();
        let before = profile.targets;
        let recomputed = profile
            .apply_update(ProfileUpdate {
                diet_preference: Some(DietPreference::Vegan),
                ..Default::default()
            })
            .unwrap();

        assert!(!recomputed);
        assert_eq!(profile.targets, before);
        assert_eq!(profile.diet_preference, DietPreference::Vegan);
    }

    #[test]
    fn test_update_without_biometrics_skips_recompute() {
        let mut profile = UserProfile::default();
        let recomputed = profile
            .apply_update(ProfileUpdate {
                weight_kg: Some(80.0),
                ..Default::default()
            })
            .unwrap();

        assert!(!recomputed);
        assert_eq!(profile.weight_kg, Some(80.0));
        assert!(profile.targets.is_none());
    }

    #[test]
    fn test_update_falls_back_for_missing_goal_and_activity() {
        let mut profile = UserProfile {
            age_years: Some(30),
            gender: Some(Gender::Male),
            height_cm: Some(175.0),
            ..Default::default()
        };
        profile
            .apply_update(ProfileUpdate {
                weight_kg: Some(70.0),
                ..Default::default()
            })
            .unwrap();

        // Moderately active, maintain
        assert_eq!(profile.targets.unwrap().calorie_target, 2556);
    }

    #[test]
    fn test_update_rejects_bad_weight() {
        let mut profile = onboarded();
        assert!(profile
            .apply_update(ProfileUpdate {
                weight_kg: Some(5.0),
                ..Default::default()
            })
            .is_err());
        assert_eq!(profile.weight_kg, Some(70.0));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("profile.json");

        let profile = onboarded();
        profile.save(&path).unwrap();

        let loaded = UserProfile::load(&path).unwrap();
        assert_eq!(loaded, profile);
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let profile = UserProfile::load(&temp_dir.path().join("nonexistent.json")).unwrap();
        assert_eq!(profile, UserProfile::default());
    }

    #[test]
    fn test_corrupted_profile_returns_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("profile.json");
        std::fs::write(&path, "{ invalid json }").unwrap();

        let profile = UserProfile::load(&path).unwrap();
        assert!(profile.targets.is_none());
    }

    #[test]
    fn test_update_pattern() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("profile.json");
        onboarded().save(&path).unwrap();

        let (_, recomputed) = UserProfile::update(&path, |p| {
            p.apply_update(ProfileUpdate {
                activity_level: Some(ActivityLevel::Sedentary),
                ..Default::default()
            })
        })
        .unwrap();
        assert!(recomputed);

        let loaded = UserProfile::load(&path).unwrap();
        assert_eq!(loaded.activity_level, Some(ActivityLevel::Sedentary));
        assert_eq!(loaded.targets.unwrap().tdee, 1979); // round(1649 * 1.2)
    }

    #[test]
    fn test_require_targets() {
        assert!(matches!(
            UserProfile::default().require_targets(),
            Err(Error::Profile(_))
        ));
        assert!(onboarded().require_targets().is_ok());
    }
}
