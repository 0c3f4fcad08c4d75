//! Handler for meal image analysis.

use axum::{
    Json,
    extract::State,
    extract::rejection::JsonRejection,
    http::header,
    response::{IntoResponse, Response},
};

use crate::api::dto::meal::{AnalyzeMealRequest, MealAnalysisFailureResponse};
use crate::application::services::meal_analysis_service::{
    ANALYSIS_FAILED_MESSAGE, validate_image_url,
};
use crate::domain::entities::FallbackAnalysis;
use crate::error::AppError;
use crate::state::AppState;

/// Analyzes a meal photo and returns its nutrition facts.
///
/// # Endpoint
///
/// `POST /analyze-meal-image`
///
/// # Request Body
///
/// ```json
/// { "image_url": "https://cdn.example.com/meal.jpg", "image_name": "meal.jpg", "function_info": {} }
/// ```
///
/// # Response Codes
///
/// - **200 OK**: the normalized analysis JSON, or an `error` body with a
///   `fallback_analysis` when the analysis itself fails
/// - **400 Bad Request**: missing or non-http(s) `image_url`
pub async fn analyze_meal_image_handler(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeMealRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!("Unreadable meal analysis request: {}", rejection.body_text());
            return Ok(failure(rejection.body_text()));
        }
    };

    let image_url = validate_image_url(request.image_url.as_deref())?;
    let image = request.into_image(image_url);

    match state.meal_service.analyze(&image).await {
        Ok(analysis) => Ok(([(header::CONTENT_TYPE, "application/json")], analysis).into_response()),
        Err(e) => {
            tracing::error!(image_name = %image.image_name, "Meal analysis failed: {}", e);
            Ok(failure(e.to_string()))
        }
    }
}

fn failure(message: String) -> Response {
    Json(MealAnalysisFailureResponse {
        error: ANALYSIS_FAILED_MESSAGE,
        message,
        fallback_analysis: FallbackAnalysis::default(),
    })
    .into_response()
}
