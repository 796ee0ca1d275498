use crate::infra::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::Local;
use preflist::error::AppError;
use preflist::predictor::{
    DatasetSource, DatasetStatistics, PreferenceList, PreferenceRow, PreferenceService,
    ProbabilityHistogram, RequestCriteria, SearchWindow,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Fixed enumerations offered to the frontend. The core treats any
/// non-"All" value as an exact match whether or not it appears here.
const QUOTAS: [&str; 9] = [
    "All", "General", "Ladies", "PWD", "Defense", "TFWS", "EWS", "Orphan", "Minority",
];
const CATEGORIES: [&str; 10] = [
    "All", "Open", "SC", "ST", "VJ", "NT1", "NT2", "NT3", "OBC", "SEBC",
];
const SEAT_TYPES: [&str; 4] = [
    "All",
    "State Level",
    "Home University",
    "Other than Home University",
];
const ROUNDS: [&str; 3] = ["1", "2", "3"];

#[derive(Debug, Deserialize)]
pub(crate) struct PredictionRequest {
    /// Accepted as a signed integer so an out-of-domain rank is answered
    /// with the validation message instead of a deserialization error.
    pub(crate) student_rank: i64,
    pub(crate) quota: String,
    pub(crate) category: String,
    pub(crate) seat_type: String,
    pub(crate) round_no: String,
    #[serde(default)]
    pub(crate) min_probability: f64,
    #[serde(default)]
    pub(crate) rank_range_lower: Option<u32>,
    #[serde(default)]
    pub(crate) rank_range_upper: Option<u32>,
}

impl PredictionRequest {
    fn into_criteria(self) -> RequestCriteria {
        let student_rank = if self.student_rank <= 0 {
            0
        } else {
            u32::try_from(self.student_rank).unwrap_or(u32::MAX)
        };
        let defaults = SearchWindow::default();

        RequestCriteria {
            student_rank,
            quota: self.quota,
            category: self.category,
            seat_type: self.seat_type,
            round: self.round_no,
            min_probability: self.min_probability,
            window: SearchWindow::new(
                self.rank_range_lower.unwrap_or(defaults.below),
                self.rank_range_upper.unwrap_or(defaults.above),
            ),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct PredictionResponse {
    pub(crate) preferences: Vec<PreferenceRow>,
    pub(crate) plot_data: PlotData,
}

/// Histogram payload in the shape the frontend's plotting library expects.
#[derive(Debug, Serialize)]
pub(crate) struct PlotData {
    pub(crate) x: Vec<u8>,
    #[serde(rename = "type")]
    pub(crate) kind: &'static str,
    pub(crate) nbinsx: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) name: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Marker {
    pub(crate) color: &'static str,
    pub(crate) line: MarkerLine,
}

#[derive(Debug, Serialize)]
pub(crate) struct MarkerLine {
    pub(crate) color: &'static str,
    pub(crate) width: u8,
}

impl PlotData {
    fn from_histogram(histogram: &ProbabilityHistogram) -> Self {
        let garnish = !histogram.values.is_empty();
        Self {
            x: histogram.values.clone(),
            kind: "histogram",
            nbinsx: histogram.bins,
            marker: garnish.then_some(Marker {
                color: "#006B6B",
                line: MarkerLine {
                    color: "white",
                    width: 1,
                },
            }),
            name: garnish.then_some("Admission Probability Distribution"),
        }
    }
}

/// Assemble the HTTP surface over a preference service. The `/ready` and
/// `/metrics` plumbing expects an [`AppState`] extension layered on by the
/// caller.
pub fn api_router<S>(service: Arc<PreferenceService<S>>) -> Router
where
    S: DatasetSource + 'static,
{
    Router::new()
        .route("/api/health", get(health_endpoint::<S>))
        .route("/api/branches", get(branches_endpoint::<S>))
        .route("/api/quotas", get(quotas_endpoint))
        .route("/api/categories", get(categories_endpoint))
        .route("/api/seat-types", get(seat_types_endpoint))
        .route("/api/rounds", get(rounds_endpoint))
        .route("/api/stats", get(stats_endpoint::<S>))
        .route("/api/predict", post(predict_endpoint::<S>))
        .with_state(service)
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn health_endpoint<S: DatasetSource + 'static>(
    State(service): State<Arc<PreferenceService<S>>>,
) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "data_loaded": service.healthy(),
        "timestamp": Local::now().to_rfc3339(),
    }))
}

pub(crate) async fn branches_endpoint<S: DatasetSource + 'static>(
    State(service): State<Arc<PreferenceService<S>>>,
) -> Json<serde_json::Value> {
    Json(json!({ "branches": service.unique_branches() }))
}

pub(crate) async fn quotas_endpoint() -> Json<serde_json::Value> {
    Json(json!({ "quotas": QUOTAS }))
}

pub(crate) async fn categories_endpoint() -> Json<serde_json::Value> {
    Json(json!({ "categories": CATEGORIES }))
}

pub(crate) async fn seat_types_endpoint() -> Json<serde_json::Value> {
    Json(json!({ "seat_types": SEAT_TYPES }))
}

pub(crate) async fn rounds_endpoint() -> Json<serde_json::Value> {
    Json(json!({ "rounds": ROUNDS }))
}

pub(crate) async fn stats_endpoint<S: DatasetSource + 'static>(
    State(service): State<Arc<PreferenceService<S>>>,
) -> Result<Json<DatasetStatistics>, AppError> {
    let statistics = service.statistics()?;
    Ok(Json(statistics))
}

pub(crate) async fn predict_endpoint<S: DatasetSource + 'static>(
    State(service): State<Arc<PreferenceService<S>>>,
    Json(payload): Json<PredictionRequest>,
) -> Result<Json<PredictionResponse>, AppError> {
    let criteria = payload.into_criteria();
    let list: PreferenceList = service.generate(&criteria)?;

    Ok(Json(PredictionResponse {
        plot_data: PlotData::from_histogram(&list.histogram),
        preferences: list.rows,
    }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
