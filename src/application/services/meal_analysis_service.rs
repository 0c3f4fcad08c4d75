//! Meal photo analysis through a vision model.

use crate::application::credentials::ApiCredential;
use crate::domain::entities::meal::{DEFAULT_SOURCE_URL, audit_analysis};
use crate::domain::ports::{VisionError, VisionModel};
use crate::domain::response_normalizer::{NormalizeError, normalize_value};
use crate::error::AppError;
use crate::utils::urls::has_http_scheme;
use serde_json::{Value, json};
use std::sync::{Arc, LazyLock};
use thiserror::Error;
use tracing::{info, warn};

/// Top-level `error` text of every failed analysis response.
pub const ANALYSIS_FAILED_MESSAGE: &str = "Failed to analyze image with OpenAI Vision API";

/// Instructions sent with every image.
pub static MEAL_ANALYSIS_PROMPT: LazyLock<String> = LazyLock::new(|| {
    format!(
        r#"Analyze this meal image and return its nutritional information as JSON. Include:
1. Meal identification
2. An accurate calorie estimate
3. A macronutrient breakdown in grams
4. The list of ingredients
5. A categorical healthiness value ('healthy', 'medium' or 'unhealthy')
6. A detailed health assessment
7. A source URL with more information

Give the meal name and the ingredient list in English, Hebrew and Russian.

Respond with exactly this structure:
{{
  "mealName": {{"en": "...", "he": "...", "ru": "..."}},
  "estimatedCalories": 670,
  "macros": {{
    "proteins": "30g",
    "carbohydrates": "50g",
    "fats": "40g"
  }},
  "ingredients": {{
    "en": ["...", "..."],
    "he": ["...", "..."],
    "ru": ["...", "..."]
  }},
  "healthiness": "healthy" | "medium" | "unhealthy" | "N/A",
  "health_assessment": "Detailed health assessment of the meal",
  "source": "A valid http(s) URL with more information about this meal"
}}

Rules:
- Base calories and macros on the visible portions.
- estimatedCalories must be a number.
- proteins, carbohydrates and fats must be strings ending with 'g'.
- healthiness must be one of 'healthy', 'medium', 'unhealthy' or 'N/A'.
- health_assessment must be a complete sentence or more.
- source must be a valid URL; use {DEFAULT_SOURCE_URL} if unsure.
- Translations must be accurate for food."#
    )
});

/// Why an analysis produced no usable result.
///
/// The display text becomes the `message` field of the fallback response.
#[derive(Debug, Error)]
pub enum AnalysisFailure {
    #[error("OpenAI API key not configured")]
    NotConfigured,

    #[error(transparent)]
    Vision(#[from] VisionError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

/// An image submitted for analysis.
#[derive(Debug, Clone)]
pub struct MealImage {
    pub image_url: String,
    pub image_name: String,
    pub function_info: Value,
}

/// Service sending meal photos to the vision model and cleaning up the answer.
pub struct MealAnalysisService {
    vision: Arc<dyn VisionModel>,
    credential: Arc<ApiCredential>,
}

impl MealAnalysisService {
    pub fn new(vision: Arc<dyn VisionModel>, credential: Arc<ApiCredential>) -> Self {
        Self { vision, credential }
    }

    /// Whether an OpenAI key is currently held in memory.
    pub fn is_configured(&self) -> bool {
        self.credential.is_configured()
    }

    /// Analyzes one meal image and returns the normalized analysis as compact JSON.
    ///
    /// Deviations from the analysis contract are logged but do not fail the call.
    ///
    /// # Errors
    ///
    /// Returns an [`AnalysisFailure`] if no key is available, the model call
    /// fails or its output cannot be normalized.
    pub async fn analyze(&self, image: &MealImage) -> Result<String, AnalysisFailure> {
        info!(
            image_name = %image.image_name,
            function_info = %image.function_info,
            "Analyzing meal image"
        );

        let api_key = self
            .credential
            .get_or_reload()
            .await
            .ok_or(AnalysisFailure::NotConfigured)?;

        let output = self
            .vision
            .analyze_image(&api_key, &image.image_url, &MEAL_ANALYSIS_PROMPT)
            .await?;

        let analysis = normalize_value(output)?;

        let issues = audit_analysis(&analysis);
        if !issues.is_empty() {
            warn!(
                image_name = %image.image_name,
                issues = ?issues,
                "Analysis deviates from the expected format"
            );
        }

        let healthiness = analysis.get("healthiness").cloned().unwrap_or_default();
        info!(
            image_name = %image.image_name,
            healthiness = %healthiness,
            "Meal image analyzed"
        );

        Ok(analysis.to_string())
    }
}

/// Checks the submitted image URL.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the URL is missing, blank or not http(s).
pub fn validate_image_url(raw: Option<&str>) -> Result<String, AppError> {
    let url = raw.map(str::trim).unwrap_or_default();

    if url.is_empty() {
        return Err(AppError::bad_request("No image URL provided", Value::Null));
    }

    if !has_http_scheme(url) {
        return Err(AppError::bad_request(
            "Invalid image URL format. Must start with http:// or https://",
            json!({"image_url": url}),
        ));
    }

    Ok(url.to_string())
}
