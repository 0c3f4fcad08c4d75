//! Domain entities for meal image analysis.
//!
//! [`MealAnalysis`] is the JSON contract the vision model is asked to produce.
//! The model's output is only loosely trusted: the response normalizer
//! guarantees valid JSON with a `healthiness` key, and [`audit_analysis`]
//! reports the remaining contract deviations for logging.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Source URL used when the model cannot name one.
pub const DEFAULT_SOURCE_URL: &str = "https://fdc.nal.usda.gov/";

/// Label injected when the model omits `healthiness`.
pub const UNKNOWN_HEALTHINESS: &str = "N/A";

static GRAMS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+)?g$").expect("valid grams regex"));

/// What the vision model handed back, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutput {
    /// Already-structured JSON (object or array expected).
    Structured(Value),
    /// Free text, possibly fenced in markdown or surrounded by prose.
    Text(String),
}

/// Categorical nutrition-quality label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Healthiness {
    #[serde(rename = "healthy")]
    Healthy,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "unhealthy")]
    Unhealthy,
    #[serde(rename = "N/A")]
    NotAvailable,
}

impl Healthiness {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "healthy" => Some(Self::Healthy),
            "medium" => Some(Self::Medium),
            "unhealthy" => Some(Self::Unhealthy),
            UNKNOWN_HEALTHINESS => Some(Self::NotAvailable),
            _ => None,
        }
    }
}

/// Text in the three languages the storefront supports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Localized<T> {
    pub en: T,
    pub he: T,
    pub ru: T,
}

/// Macronutrients as gram strings, e.g. `"30g"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub proteins: String,
    pub carbohydrates: String,
    pub fats: String,
}

impl Macros {
    pub fn is_well_formed(&self) -> bool {
        [&self.proteins, &self.carbohydrates, &self.fats]
            .iter()
            .all(|v| GRAMS_REGEX.is_match(v))
    }
}

/// The analysis contract requested from the vision model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealAnalysis {
    #[serde(rename = "mealName")]
    pub meal_name: Localized<String>,
    #[serde(rename = "estimatedCalories")]
    pub estimated_calories: f64,
    pub macros: Macros,
    pub ingredients: Localized<Vec<String>>,
    pub healthiness: Healthiness,
    pub health_assessment: String,
    pub source: String,
}

/// Placeholder analysis returned alongside an error when analysis fails.
#[derive(Debug, Clone, Serialize)]
pub struct FallbackAnalysis {
    pub meal_name: &'static str,
    pub estimated_calories: u32,
    pub macronutrients: BTreeMap<&'static str, &'static str>,
    pub ingredients: Vec<&'static str>,
    pub healthiness: &'static str,
    pub health_assessment: &'static str,
    pub source: &'static str,
}

impl Default for FallbackAnalysis {
    fn default() -> Self {
        Self {
            meal_name: "Unknown meal (analysis failed)",
            estimated_calories: 0,
            macronutrients: BTreeMap::from([
                ("proteins", "0g"),
                ("carbohydrates", "0g"),
                ("fats", "0g"),
            ]),
            ingredients: vec!["could not analyze image"],
            healthiness: UNKNOWN_HEALTHINESS,
            health_assessment: "Analysis failed. Please try again later.",
            source: DEFAULT_SOURCE_URL,
        }
    }
}

/// Lists the ways a normalized analysis deviates from [`MealAnalysis`].
///
/// An empty list means the value deserializes cleanly and every field is
/// within its documented format.
pub fn audit_analysis(value: &Value) -> Vec<String> {
    let mut issues = Vec::new();

    let Some(object) = value.as_object() else {
        issues.push("analysis is not a JSON object".to_string());
        return issues;
    };

    if !object
        .get("estimatedCalories")
        .is_some_and(Value::is_number)
    {
        issues.push("estimatedCalories is missing or not a number".to_string());
    }

    match object.get("healthiness").and_then(Value::as_str) {
        Some(label) if Healthiness::parse(label).is_some() => {}
        Some(label) => issues.push(format!("healthiness '{label}' is not a known label")),
        None => issues.push("healthiness is missing or not a string".to_string()),
    }

    match object.get("macros") {
        Some(macros) => match serde_json::from_value::<Macros>(macros.clone()) {
            Ok(m) if !m.is_well_formed() => {
                issues.push("macros must be gram strings such as '30g'".to_string())
            }
            Ok(_) => {}
            Err(e) => issues.push(format!("macros are malformed: {e}")),
        },
        None => issues.push("macros are missing".to_string()),
    }

    match object.get("source").and_then(Value::as_str) {
        Some(src) if src.starts_with("http://") || src.starts_with("https://") => {}
        _ => issues.push("source is not an http(s) URL".to_string()),
    }

    if issues.is_empty()
        && let Err(e) = serde_json::from_value::<MealAnalysis>(value.clone())
    {
        issues.push(format!("analysis does not match the contract: {e}"));
    }

    issues
}
