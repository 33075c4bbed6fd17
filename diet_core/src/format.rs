//! Human-readable formatting for weights, heights and energy.

use crate::WeightUnit;

/// Pounds per kilogram
pub const LBS_PER_KG: f64 = 2.20462;

const CM_PER_INCH: f64 = 2.54;

pub fn kg_to_lbs(kg: f64) -> f64 {
    kg * LBS_PER_KG
}

pub fn lbs_to_kg(lbs: f64) -> f64 {
    lbs / LBS_PER_KG
}

/// Weight with one decimal in the requested unit
pub fn format_weight(kg: f64, unit: WeightUnit) -> String {
    match unit {
        WeightUnit::Kg => format!("{:.1} kg", kg),
        WeightUnit::Lbs => format!("{:.1} lbs", kg_to_lbs(kg)),
    }
}

/// Height in centimetres with the feet/inches equivalent
pub fn format_height(cm: f64) -> String {
    let total_inches = (cm / CM_PER_INCH).round() as i64;
    format!("{:.0} cm ({}'{}\")", cm, total_inches / 12, total_inches % 12)
}

pub fn format_calories(kcal: f64) -> String {
    format!("{:.0} kcal", kcal.round())
}

pub fn format_macro(grams: f64) -> String {
    format!("{:.0}g", grams.round())
}

/// Signed change, e.g. "-0.8 kg"
pub fn format_weight_change(kg: f64, unit: WeightUnit) -> String {
    let value = match unit {
        WeightUnit::Kg => kg,
        WeightUnit::Lbs => kg_to_lbs(kg),
    };
    let sign = if value > 0.0 { "+" } else { "" };
    let label = match unit {
        WeightUnit::Kg => "kg",
        WeightUnit::Lbs => "lbs",
    };
    format!("{}{:.1} {}", sign, value, label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_weight() {
        assert_eq!(format_weight(70.0, WeightUnit::Kg), "70.0 kg");
        assert_eq!(format_weight(70.0, WeightUnit::Lbs), "154.3 lbs");
    }

    #[test]
    fn test_unit_conversion() {
        assert!((lbs_to_kg(kg_to_lbs(82.5)) - 82.5).abs() < 1e-9);
    }

    #[test]
    fn test_format_height() {
        assert_eq!(format_height(175.0), "175 cm (5'9\")");
        assert_eq!(format_height(152.4), "152 cm (5'0\")");
    }

    #[test]
    fn test_format_energy_and_macros() {
        assert_eq!(format_calories(2055.6), "2056 kcal");
        assert_eq!(format_macro(31.4), "31g");
    }

    #[test]
    fn test_format_weight_change() {
        assert_eq!(format_weight_change(-0.8, WeightUnit::Kg), "-0.8 kg");
        assert_eq!(format_weight_change(0.5, WeightUnit::Kg), "+0.5 kg");
        assert_eq!(format_weight_change(0.0, WeightUnit::Kg), "0.0 kg");
    }
}
