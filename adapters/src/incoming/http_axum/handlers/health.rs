use axum::{Json, extract::State};

#[cfg(feature = "docs")]
use crate::incoming::http_axum::dto::responses::ApiResponseValue;
use crate::incoming::http_axum::dto::responses::ApiResponse;
use crate::shared::app_state::AppState;

#[cfg_attr(feature = "docs", utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = ApiResponseValue,
         example = json!({
             "ok": true,
             "data": {
                 "status": "ok",
                 "environment": "development",
                 "version": "0.1.0"
             }
         })
        )
    ),
    tag = "system",
    summary = "Liveness check",
    operation_id = "health_check"
))]
pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success_with_data(Some(serde_json::json!({
        "status": "ok",
        "environment": state.config.environment.env,
        "version": env!("CARGO_PKG_VERSION"),
    }))))
}
