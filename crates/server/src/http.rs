//! HTTP Endpoints
//!
//! REST API for the calculator. Request bodies are partial estimate inputs:
//! any field left out takes the configured default.

use axum::{
    extract::{Json, Path, Query, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use erp_calc_core::{
    Catalog, EstimateInput, EstimateResult, EstimationEngine, PresetOverride, Tier,
};
use erp_calc_engine::{apply_template, apply_tier, ReportLayout};
use erp_calc_export::{
    DocumentRenderer, HtmlProposalRenderer, JsonExport, ProposalOptions, ProposalPayload,
};

use crate::metrics::{metrics_handler, record_estimate};
use crate::state::AppState;
use crate::ServerError;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let config = state.config.read();
    let cors_layer = build_cors_layer(&config.server.cors_origins, config.server.cors_enabled);
    let timeout = Duration::from_secs(config.server.timeout_seconds.max(1));
    drop(config);

    Router::new()
        // Catalog and estimation
        .route("/api/catalog", get(get_catalog))
        .route("/api/estimate", post(estimate))
        .route("/api/estimate/report", post(estimate_report))
        // Presets and templates
        .route("/api/tiers/:tier/apply", post(apply_tier_handler))
        .route("/api/templates/:id/apply", post(apply_template_handler))
        .route("/api/presets", get(get_presets))
        .route("/api/presets/:tier", put(put_preset).delete(delete_preset))
        // Export
        .route("/api/export/json", post(export_json))
        .route("/api/export/html", post(export_html))
        .route("/api/proposal", post(proposal))
        // Health check
        .route("/health", get(health_check))
        // Prometheus metrics
        .route("/metrics", get(metrics_handler))
        // Admin
        .route("/admin/reload-config", post(reload_config))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .layer(CompressionLayer::new())
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - If cors_enabled is false, returns permissive layer (for dev)
/// - If cors_origins is empty, defaults to localhost:3000
/// - Otherwise, uses the configured origins
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];

    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    if parsed_origins.is_empty() {
        tracing::info!("No usable CORS origins configured, defaulting to localhost:3000");
        return CorsLayer::new()
            .allow_origin(HeaderValue::from_static("http://localhost:3000"))
            .allow_methods(methods)
            .allow_headers(Any);
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods(methods)
        .allow_headers(Any)
}

/// Overlay `patch` onto `base`; nested objects merge, `null` keeps the base
fn merge_json(base: &mut Value, patch: Value) {
    match (base, patch) {
        (_, Value::Null) => {}
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                if value.is_null() {
                    continue;
                }
                let nested = value.is_object() && base.get(&key).is_some_and(Value::is_object);
                match base.get_mut(&key) {
                    Some(slot) if nested => merge_json(slot, value),
                    _ => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, patch) => *base = patch,
    }
}

/// Configured defaults overlaid with whatever the client sent
fn parse_input(state: &AppState, body: Value) -> Result<EstimateInput, ServerError> {
    let mut merged = serde_json::to_value(state.seed_input())
        .map_err(|e| ServerError::Internal(e.to_string()))?;
    merge_json(&mut merged, body);
    serde_json::from_value(merged).map_err(|e| ServerError::InvalidRequest(e.to_string()))
}

fn run_estimate(state: &AppState, route: &'static str, input: &EstimateInput) -> EstimateResult {
    let started = Instant::now();
    let result = state.engine.estimate(input);
    record_estimate(route, started.elapsed(), &result);
    result
}

#[derive(Debug, Default, Deserialize)]
struct LayoutQuery {
    layout: Option<String>,
}

impl LayoutQuery {
    fn layout(&self) -> Result<ReportLayout, ServerError> {
        self.layout
            .as_deref()
            .map(str::parse::<ReportLayout>)
            .transpose()
            .map_err(ServerError::InvalidRequest)
            .map(Option::unwrap_or_default)
    }
}

async fn get_catalog(State(state): State<AppState>) -> Json<Catalog> {
    Json(state.catalog.as_ref().clone())
}

async fn estimate(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<EstimateResult>, ServerError> {
    let input = parse_input(&state, body)?;
    Ok(Json(run_estimate(&state, "estimate", &input)))
}

/// Effort table grouped by a report layout
async fn estimate_report(
    State(state): State<AppState>,
    Query(query): Query<LayoutQuery>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ServerError> {
    let layout = query.layout()?;
    let input = parse_input(&state, body)?;
    let result = run_estimate(&state, "report", &input);

    Ok(Json(serde_json::json!({
        "layout": layout.name,
        "rows": layout.render(&result.buckets),
        "totalDays": result.buckets.total(),
        "finalDays": result.final_days,
        "warnings": result.warnings,
    })))
}

/// The transformed input and its estimate
#[derive(Debug, Serialize)]
struct AppliedResponse {
    input: EstimateInput,
    result: EstimateResult,
}

async fn apply_tier_handler(
    State(state): State<AppState>,
    Path(tier): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<AppliedResponse>, ServerError> {
    let tier: Tier = tier.parse()?;
    let input = parse_input(&state, body)?;
    let overrides = state.active_overrides().await;

    let next = apply_tier(&input, tier, &state.catalog, overrides.as_ref())?;
    let result = run_estimate(&state, "tier_apply", &next);
    Ok(Json(AppliedResponse {
        input: next,
        result,
    }))
}

async fn apply_template_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<AppliedResponse>, ServerError> {
    let input = parse_input(&state, body)?;
    let next = apply_template(&input, &id, &state.catalog)?;
    let result = run_estimate(&state, "template_apply", &next);
    Ok(Json(AppliedResponse {
        input: next,
        result,
    }))
}

async fn get_presets(State(state): State<AppState>) -> Json<Value> {
    let overrides = state.presets.load().await;
    Json(serde_json::json!({
        "enabled": state.overrides_enabled(),
        "durable": state.is_durable_store(),
        "overrides": overrides,
    }))
}

async fn put_preset(
    State(state): State<AppState>,
    Path(tier): Path<String>,
    Json(value): Json<PresetOverride>,
) -> Result<Json<Value>, ServerError> {
    if !state.overrides_enabled() {
        return Err(ServerError::Disabled("preset overrides are switched off".to_string()));
    }
    let tier: Tier = tier.parse()?;

    let unknown: Vec<&str> = value
        .keys
        .iter()
        .filter(|key| state.catalog.item(key).is_none())
        .collect();
    if !unknown.is_empty() {
        tracing::warn!(tier = %tier, unknown = ?unknown, "Preset override names unknown catalog keys");
    }

    let doc = state.presets.set_tier(tier, value).await?;
    Ok(Json(serde_json::json!({ "overrides": doc })))
}

async fn delete_preset(
    State(state): State<AppState>,
    Path(tier): Path<String>,
) -> Result<Json<Value>, ServerError> {
    if !state.overrides_enabled() {
        return Err(ServerError::Disabled("preset overrides are switched off".to_string()));
    }
    let tier: Tier = tier.parse()?;
    let doc = state.presets.clear_tier(tier).await?;
    Ok(Json(serde_json::json!({ "overrides": doc })))
}

async fn export_json(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ServerError> {
    let input = parse_input(&state, body)?;
    let result = run_estimate(&state, "export_json", &input);
    let export = JsonExport::new(&input, &result, Utc::now());

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.file_name()),
            ),
        ],
        export.to_json_pretty()?,
    ))
}

/// Estimate input plus the proposal details around it
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProposalRequest {
    input: Value,
    options: ProposalOptions,
}

fn build_proposal(
    state: &AppState,
    route: &'static str,
    request: ProposalRequest,
) -> Result<ProposalPayload, ServerError> {
    let input = parse_input(state, request.input)?;
    let result = run_estimate(state, route, &input);
    Ok(ProposalPayload::build(
        &input,
        &result,
        &state.catalog,
        &request.options,
        Utc::now(),
    ))
}

async fn export_html(
    State(state): State<AppState>,
    Query(query): Query<LayoutQuery>,
    Json(request): Json<ProposalRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let renderer = HtmlProposalRenderer::new(query.layout()?);
    let proposal = build_proposal(&state, "export_html", request)?;
    let body = renderer.render(&proposal)?;

    tracing::info!(proposal_id = %proposal.proposal_id, "Proposal document rendered");
    Ok(([(header::CONTENT_TYPE, renderer.content_type())], body))
}

async fn proposal(
    State(state): State<AppState>,
    Json(request): Json<ProposalRequest>,
) -> Result<Json<ProposalPayload>, ServerError> {
    Ok(Json(build_proposal(&state, "proposal", request)?))
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "catalog": {
            "items": state.catalog.items().len(),
            "forms": state.catalog.forms().len(),
            "interfaces": state.catalog.interfaces().len(),
            "templates": state.catalog.templates().len(),
        },
        "presets": {
            "overridesEnabled": state.overrides_enabled(),
            "durable": state.is_durable_store(),
        },
    }))
}

/// POST /admin/reload-config
///
/// Note: CORS and the store backend are only applied at startup.
async fn reload_config(State(state): State<AppState>) -> impl IntoResponse {
    match state.reload_config() {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "success",
                "message": "Configuration reloaded successfully"
            })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use erp_calc_config::{CatalogConfig, Settings};
    use serde_json::json;
    use tower::ServiceExt;

    fn state_with(settings: Settings) -> AppState {
        let catalog = CatalogConfig::embedded().unwrap().clone().into_catalog();
        AppState::new(settings, catalog)
    }

    fn app() -> Router {
        create_router(state_with(Settings::default()))
    }

    async fn send_raw(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, String, String) {
        let body = match body {
            Some(v) => Body::from(v.to_string()),
            None => Body::empty(),
        };
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, _, text) = send_raw(app, method, uri, body).await;
        (status, serde_json::from_str(&text).unwrap_or(Value::Null))
    }

    #[test]
    fn test_merge_json() {
        let mut base = json!({"a": 1, "nested": {"x": 1, "y": 2}, "list": [1]});
        merge_json(
            &mut base,
            json!({"nested": {"y": 3, "z": null}, "list": [2, 3], "a": null, "b": true}),
        );
        assert_eq!(
            base,
            json!({"a": 1, "nested": {"x": 1, "y": 3}, "list": [2, 3], "b": true})
        );
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert!(body["catalog"]["items"].as_u64().unwrap() > 0);
        assert_eq!(body["presets"]["durable"], false);
    }

    #[tokio::test]
    async fn test_empty_estimate_uses_defaults() {
        let (status, body) = send(&app(), Method::POST, "/api/estimate", Some(json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        // technical 75 + wrapper 97
        assert_eq!(body["finalDays"], 172);
        assert_eq!(body["finalRate"], 2000);
        assert_eq!(body["warnings"][0]["code"], "missing_baseline");
    }

    #[tokio::test]
    async fn test_configured_rate_seeds_input() {
        let mut settings = Settings::default();
        settings.commercial.base_rate = 2500.0;
        let app = create_router(state_with(settings));

        let (_, body) = send(&app, Method::POST, "/api/estimate", Some(json!({}))).await;
        assert_eq!(body["finalRate"], 2500);

        let (_, body) = send(
            &app,
            Method::POST,
            "/api/estimate",
            Some(json!({"commercial": {"baseRate": 1000}})),
        )
        .await;
        assert_eq!(body["finalRate"], 1000);
    }

    #[tokio::test]
    async fn test_malformed_input_is_rejected() {
        let (status, body) = send(&app(), Method::POST, "/api/estimate", Some(json!([1, 2]))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_request");
    }

    #[tokio::test]
    async fn test_report_layouts() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/estimate/report?layout=detailed",
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rows"].as_array().unwrap().len(), 5);
        assert_eq!(body["totalDays"], 172);

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/estimate/report?layout=pivot",
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_apply_premium_tier() {
        let (status, body) =
            send(&app(), Method::POST, "/api/tiers/premium/apply", Some(json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["input"]["tier"], "premium");
        assert_eq!(body["result"]["finalDays"], 1290);

        let (status, _) = send(&app(), Method::POST, "/api/tiers/gold/apply", Some(json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_apply_template() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/templates/foodProcessing/apply",
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["input"]["industryTemplate"], "foodProcessing");

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/templates/shipbuilding/apply",
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_preset_override_lifecycle() {
        let app = app();
        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/presets/standard",
            Some(json!({"keys": ["lease"], "includeFlag": false})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&app, Method::GET, "/api/presets", None).await;
        assert_eq!(body["overrides"]["standard"]["keys"], json!(["lease"]));
        assert!(body["overrides"]["premium"].is_null());

        let (_, body) =
            send(&app, Method::POST, "/api/tiers/standard/apply", Some(json!({}))).await;
        assert_eq!(body["input"]["selectedItems"], json!(["lease"]));

        let (status, body) = send(&app, Method::DELETE, "/api/presets/standard", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["overrides"]["standard"].is_null());
    }

    #[tokio::test]
    async fn test_override_wrapper_merges_over_request_sliders() {
        let app = app();
        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/presets/premium",
            Some(json!({"keys": ["lease"], "wrapper": {"pmo": 70}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(
            &app,
            Method::POST,
            "/api/tiers/premium/apply",
            Some(json!({"effort": {"security": 33, "cutover": 50}})),
        )
        .await;
        assert_eq!(body["input"]["effort"]["pmo"], 70);
        assert_eq!(body["input"]["effort"]["security"], 33);
        assert_eq!(body["input"]["effort"]["cutover"], 50);
    }

    #[tokio::test]
    async fn test_overrides_disabled() {
        let mut settings = Settings::default();
        settings.presets.overrides_enabled = false;
        let app = create_router(state_with(settings));

        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/presets/essential",
            Some(json!({"keys": ["lease"]})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "disabled");
    }

    #[tokio::test]
    async fn test_export_json_attachment() {
        let (status, content_type, text) = send_raw(
            &app(),
            Method::POST,
            "/api/export/json",
            Some(json!({"selectedItems": ["finance_base_424"]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, "application/json");

        let body: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(body["configuration"]["selectedItems"], json!(["finance_base_424"]));
        assert_eq!(body["calculations"]["buckets"]["functionalRaw"], 424);
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_export_html() {
        let (status, content_type, text) = send_raw(
            &app(),
            Method::POST,
            "/api/export/html?layout=compact",
            Some(json!({"options": {"clientName": "Acme & Sons"}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(content_type.starts_with("text/html"));
        assert!(text.starts_with("<!DOCTYPE html>"));
        assert!(text.contains("Acme &amp; Sons"));
        assert!(text.contains("Technical &amp; Wrapper"));
    }

    #[tokio::test]
    async fn test_proposal_payload() {
        let (status, body) = send(
            &app(),
            Method::POST,
            "/api/proposal",
            Some(json!({"input": {"selectedItems": ["finance_base_424"]}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["proposalId"].as_str().unwrap().starts_with("ABMY-"));
        assert_eq!(body["validityDays"], 30);
        assert_eq!(body["phases"].as_array().unwrap().len(), 6);
        assert_eq!(body["milestones"].as_array().unwrap().len(), 3);
    }
}
