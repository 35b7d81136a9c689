//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;

use super::AppState;
use super::types::{AnalyticsResponse, ErrorResponse, FilterQuery};
use crate::analytics::analyze;
use crate::data::{
    DailyData, DataSummary, HourlyAverage, MonthlySummary, SolarDataPoint, aggregate_by_day,
    aggregate_by_hour, aggregate_by_month, filter, summarize,
};

type ApiError = (StatusCode, Json<ErrorResponse>);
type ApiResult<T> = Result<Json<T>, ApiError>;

/// Applies the query's filter to the loaded records.
fn filtered(state: &AppState, query: FilterQuery) -> Result<Vec<SolarDataPoint>, ApiError> {
    let options = query
        .into_options()
        .map_err(|error| (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })))?;
    Ok(filter(&state.records, &options))
}

/// `GET /summary` → 200 + `DataSummary` JSON
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> ApiResult<DataSummary> {
    let records = filtered(&state, query)?;
    Ok(Json(summarize(&records)))
}

/// `GET /daily` → 200 + `Vec<DailyData>` JSON
pub async fn get_daily(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> ApiResult<Vec<DailyData>> {
    let records = filtered(&state, query)?;
    Ok(Json(aggregate_by_day(&records)))
}

/// `GET /monthly` → 200 + `Vec<MonthlySummary>` JSON
pub async fn get_monthly(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> ApiResult<Vec<MonthlySummary>> {
    let records = filtered(&state, query)?;
    Ok(Json(aggregate_by_month(&records)))
}

/// `GET /hourly` → 200 + 24 `HourlyAverage` entries
pub async fn get_hourly(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> ApiResult<Vec<HourlyAverage>> {
    let records = filtered(&state, query)?;
    Ok(Json(aggregate_by_hour(&records)))
}

/// `GET /analytics` → 200 + summary and all five analyses
pub async fn get_analytics(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> ApiResult<AnalyticsResponse> {
    let records = filtered(&state, query)?;
    Ok(Json(AnalyticsResponse {
        summary: summarize(&records),
        analytics: analyze(&records, &state.config.analytics_params()),
    }))
}

/// `GET /records` → 200 + filtered records
/// `GET /records?months=13` → 400 + `ErrorResponse`
pub async fn get_records(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> ApiResult<Vec<SolarDataPoint>> {
    Ok(Json(filtered(&state, query)?))
}
