use axum::Router;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use chrono::Utc;
use std::sync::Arc;

use crate::logging::*;
use crate::model::StellestModel;
use crate::{analytics, model, narrative, risk};
use stellest_common::ApiResponse;
use stellest_common::analytics::DashboardData;
use stellest_common::config;
use stellest_common::patient::{PatientInput, validate_bounds};
use stellest_common::prediction::{HealthStatus, ModelInfo, PredictionResult};

struct AppState {
    model: StellestModel,
}

pub async fn run() -> crate::Result<()> {
    let state = Arc::new(AppState {
        model: StellestModel::new(),
    });
    let app = Router::new()
        .route("/health", get(health))
        .route("/predict", post(predict))
        .route("/model_info", get(model_info))
        .route("/analytics/dashboard", get(analytics_dashboard))
        .with_state(state);

    let bind_addr = crate::config::get("SERVER_BIND_ADDR")?;
    let log = DEFAULT.new(o!("function" => "web::run"));
    info!(log, "Listening"; "addr" => %bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health(State(_): State<Arc<AppState>>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        model_loaded: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn predict(
    State(state): State<Arc<AppState>>,
    Json(patient): Json<PatientInput>,
) -> std::result::Result<Json<PredictionResult>, (StatusCode, Json<serde_json::Value>)> {
    let log = DEFAULT.new(o!("function" => "predict"));
    let started = std::time::Instant::now();

    if let Err(e) = validate_bounds(&patient) {
        warn!(log, "Rejected patient data"; "detail" => %e);
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({ "detail": e.to_string() })),
        ));
    }

    let (ensemble, individual_models) = state.model.predict(&patient);
    let risk_factors = risk::analyze(&patient);
    let recommendation = model::recommendation(ensemble.probability).to_string();

    let enhanced_analytics = config::get_bool("ANALYTICS_ENABLED", true)
        .then(|| analytics::generate(&patient, &ensemble));
    let openai_analysis = config::get_bool("NARRATIVE_ENABLED", true)
        .then(|| narrative::analyze(&patient, &ensemble));

    let now = Utc::now();
    let processing_time = started.elapsed().as_secs_f64();

    info!(log, "Prediction served";
        "probability" => ensemble.probability,
        "will_benefit" => ensemble.will_benefit,
        "processing_time" => processing_time
    );

    Ok(Json(PredictionResult {
        patient_name: Some(patient.patient_name.clone()),
        ensemble_prediction: ensemble,
        individual_models,
        risk_factors: Some(risk_factors),
        recommendation: Some(recommendation),
        patient_id: Some(format!("patient_{}", now.format("%Y%m%d_%H%M%S"))),
        timestamp: Some(now.to_rfc3339()),
        processing_time: Some((processing_time * 1000.0).round() / 1000.0),
        enhanced_analytics,
        openai_analysis,
    }))
}

async fn model_info(State(_): State<Arc<AppState>>) -> Json<ModelInfo> {
    Json(ModelInfo {
        model_name: "Stellest AI Ensemble".to_string(),
        accuracy: 0.85,
        features_count: 12,
        training_samples: 250,
        last_updated: "2024-01-01".to_string(),
        description: "Ensemble of four classifiers predicting Stellest lens treatment benefit."
            .to_string(),
    })
}

async fn analytics_dashboard(
    State(_): State<Arc<AppState>>,
) -> Json<ApiResponse<DashboardData, String>> {
    Json(ApiResponse::Success(analytics::dashboard()))
}
