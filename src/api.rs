use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::services::ServeDir;
use tracing::{debug, error, info, instrument, warn};
use utoipa::{OpenApi, ToSchema};

use crate::climatology::ClimatologyError;
use crate::fetch_error::FetchError;
use crate::services::likelihood_service::{
    ExceedanceEstimate, LikelihoodError, LikelihoodQuery, MonthLikelihood, ProbabilitySet,
};
use crate::services::LikelihoodService;

#[derive(Clone)]
pub struct AppState {
    pub likelihood_service: LikelihoodService,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Weather Likelihood Service API",
        description = "Historical probabilities that daily weather variables exceeded a \
                       threshold at a point, computed from the NASA POWER 1981-2010 daily record"
    ),
    paths(health, get_likelihood),
    components(schemas(
        HealthResponse,
        ErrorResponse,
        MonthLikelihood,
        ProbabilitySet,
        ExceedanceEstimate
    )),
    tags(
        (name = "health", description = "Service health"),
        (name = "likelihood", description = "Exceedance probability endpoints")
    )
)]
pub struct ApiDoc;

pub fn generate_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

const REDOC_HTML: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <title>Weather Likelihood API Documentation</title>
    <meta charset="utf-8"/>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style>
      body { margin: 0; padding: 0; }
    </style>
  </head>
  <body>
    <redoc spec-url="/api-docs/openapi.json"></redoc>
    <script src="https://cdn.redoc.ly/redoc/latest/bundles/redoc.standalone.js"></script>
  </body>
</html>
"#;

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health))
        .route("/likelihood", get(get_likelihood))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/api-docs/openapi.json", get(openapi_spec))
        .route("/docs", get(redoc_ui))
        .fallback_service(ServeDir::new("static"))
}

#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
#[instrument(skip(_state))]
async fn health(State(_state): State<AppState>) -> impl IntoResponse {
    debug!("Health check requested");
    info!("Health check successful");
    let response = HealthResponse {
        status: "healthy".to_string(),
    };
    (StatusCode::OK, Json(response))
}

#[utoipa::path(
    get,
    path = "/api/v1/likelihood",
    params(LikelihoodQuery),
    responses(
        (status = 200, description = "Exceedance probabilities for the requested point and month", body = MonthLikelihood),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 404, description = "Requested parameter absent from the POWER record", body = ErrorResponse),
        (status = 502, description = "POWER API request failed", body = ErrorResponse)
    ),
    tag = "likelihood"
)]
#[instrument(skip(state, query), fields(lat = query.lat, lon = query.lon, month = query.month))]
async fn get_likelihood(
    State(state): State<AppState>,
    Query(query): Query<LikelihoodQuery>,
) -> Result<Json<MonthLikelihood>, (StatusCode, Json<ErrorResponse>)> {
    debug!(
        "Computing likelihood for ({}, {}) month {}",
        query.lat, query.lon, query.month
    );

    if let Err(reason) = query.validate() {
        warn!("Rejected likelihood query: {}", reason);
        return Err(error_response(StatusCode::BAD_REQUEST, reason));
    }

    let likelihood = state
        .likelihood_service
        .month_likelihood(&query)
        .await
        .map_err(|e| {
            error!(
                "Failed to compute likelihood for ({}, {}) month {}: {}",
                query.lat, query.lon, query.month, e
            );
            error_response(error_status(&e), e.to_string())
        })?;

    info!(
        "Computed likelihood for ({}, {}) month {}: heat={:?}, rain={:?}",
        query.lat,
        query.lon,
        query.month,
        likelihood.probabilities.heat.probability,
        likelihood.probabilities.rain.probability
    );

    Ok(Json(likelihood))
}

async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(generate_openapi_spec())
}

async fn redoc_ui() -> Html<&'static str> {
    Html(REDOC_HTML)
}

/// Map service failures onto HTTP statuses. A parameter the record does not
/// carry is 404, caller mistakes are 400, provider trouble is 502.
fn error_status(error: &LikelihoodError) -> StatusCode {
    match error {
        LikelihoodError::Climatology(ClimatologyError::ParameterNotFound(_)) => {
            StatusCode::NOT_FOUND
        }
        LikelihoodError::Climatology(_) => StatusCode::BAD_REQUEST,
        LikelihoodError::Fetch(FetchError::ClientError(_)) => StatusCode::BAD_REQUEST,
        LikelihoodError::Fetch(_) => StatusCode::BAD_GATEWAY,
    }
}

fn error_response(status: StatusCode, message: String) -> (StatusCode, Json<ErrorResponse>) {
    (status, Json(ErrorResponse { error: message }))
}
