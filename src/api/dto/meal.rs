//! DTOs for meal image analysis.

use crate::application::services::MealImage;
use crate::domain::entities::FallbackAnalysis;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const DEFAULT_IMAGE_NAME: &str = "unknown.jpg";

/// Request for `POST /analyze-meal-image`.
#[derive(Debug, Deserialize)]
pub struct AnalyzeMealRequest {
    pub image_url: Option<String>,

    /// Defaults to `unknown.jpg` when missing or null.
    #[serde(default)]
    pub image_name: Option<String>,

    /// Opaque caller metadata, only logged.
    #[serde(default = "empty_object")]
    pub function_info: Value,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl AnalyzeMealRequest {
    pub fn into_image(self, image_url: String) -> MealImage {
        MealImage {
            image_url,
            image_name: self
                .image_name
                .unwrap_or_else(|| DEFAULT_IMAGE_NAME.to_string()),
            function_info: self.function_info,
        }
    }
}

/// Body returned with status 200 when analysis fails.
#[derive(Debug, Serialize)]
pub struct MealAnalysisFailureResponse {
    pub error: &'static str,
    pub message: String,
    pub fallback_analysis: FallbackAnalysis,
}
