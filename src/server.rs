use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context as AnyhowContext, Result};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::info;
use uuid::Uuid;

use crate::{
    config::IdValidators,
    dto::AppInstanceInfoDto,
    error::Error,
    model::AppInstanceInfo,
    service::AppInstanceInfoService,
};

const ACCESS_TOKEN_HEADER: &str = "access_token";

pub async fn run(
    addr: SocketAddr,
    service: Arc<dyn AppInstanceInfoService>,
    validators: IdValidators,
) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .context("failed to bind instance info listener")?;
    run_with_listener(listener, service, validators).await
}

pub async fn run_with_listener(
    listener: TcpListener,
    service: Arc<dyn AppInstanceInfoService>,
    validators: IdValidators,
) -> Result<()> {
    let state = Arc::new(AppState {
        service,
        validators,
    });
    let router = build_router(state);
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "appo api listening");
    } else {
        info!("appo api listening");
    }
    axum::serve(listener, router.into_make_service())
        .await
        .context("instance info endpoint failed")
}

struct AppState {
    service: Arc<dyn AppInstanceInfoService>,
    validators: IdValidators,
}

impl AppState {
    fn check_tenant_id(&self, tenant_id: &str) -> Result<(), Error> {
        if self.validators.tenant_id_ok(tenant_id) {
            Ok(())
        } else {
            Err(Error::InvalidInput(format!(
                "tenant id '{tenant_id}' does not match the configured pattern"
            )))
        }
    }

    fn check_app_instance_id(&self, app_instance_id: &str) -> Result<(), Error> {
        if self.validators.app_instance_id_ok(app_instance_id) {
            Ok(())
        } else {
            Err(Error::InvalidInput(format!(
                "application instance id '{app_instance_id}' does not match the configured pattern"
            )))
        }
    }
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/appo/v1/tenants/{tenant_id}/app_instance_infos",
            get(get_all_handler).post(create_handler),
        )
        .route(
            "/appo/v1/tenants/{tenant_id}/app_instance_infos/{app_instance_id}",
            get(get_one_handler)
                .put(update_handler)
                .delete(delete_handler),
        )
        .with_state(state)
}

/// Maps domain errors onto HTTP statuses. Collaborator failures pass through
/// with their original message; nothing is swallowed or rephrased here.
struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(value: Error) -> Self {
        ApiError(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            Error::InvalidInput(_) | Error::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::Persistence(_) | Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

// Token verification belongs to an upstream collaborator; this layer only
// enforces presence and forwards the request.
fn require_access_token(headers: &HeaderMap) -> Result<(), Error> {
    match headers.get(ACCESS_TOKEN_HEADER) {
        Some(value) if !value.is_empty() => Ok(()),
        _ => Err(Error::InvalidInput(
            "access_token header is required".into(),
        )),
    }
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "UP",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn get_one_handler(
    State(state): State<Arc<AppState>>,
    Path((tenant_id, app_instance_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<AppInstanceInfoDto>, ApiError> {
    require_access_token(&headers)?;
    state.check_tenant_id(&tenant_id)?;
    state.check_app_instance_id(&app_instance_id)?;

    info!(%app_instance_id, "Retrieve application instance info");
    let info = state.service.get(&tenant_id, &app_instance_id).await?;
    Ok(Json(info.into()))
}

async fn get_all_handler(
    State(state): State<Arc<AppState>>,
    Path(tenant_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Vec<AppInstanceInfoDto>>, ApiError> {
    require_access_token(&headers)?;
    state.check_tenant_id(&tenant_id)?;

    info!("Retrieve application instance infos");
    let infos = state.service.get_all(&tenant_id).await?;
    Ok(Json(infos.into_iter().map(Into::into).collect()))
}

async fn create_handler(
    State(state): State<Arc<AppState>>,
    Path(tenant_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<AppInstanceInfoDto>,
) -> Result<Json<AppInstanceInfoDto>, ApiError> {
    require_access_token(&headers)?;
    state.check_tenant_id(&tenant_id)?;
    if !body.app_instance_id.is_empty() {
        state.check_app_instance_id(&body.app_instance_id)?;
    }

    info!(app_instance_id = %body.app_instance_id, "Create application instance info");
    let mut info = AppInstanceInfo::from(body);
    if info.app_instance_id.is_empty() {
        info.app_instance_id = Uuid::new_v4().to_string();
    }
    let created = state.service.create(&tenant_id, info).await?;
    Ok(Json(created.into()))
}

async fn update_handler(
    State(state): State<Arc<AppState>>,
    Path((tenant_id, app_instance_id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<AppInstanceInfoDto>,
) -> Result<Json<AppInstanceInfoDto>, ApiError> {
    require_access_token(&headers)?;
    state.check_tenant_id(&tenant_id)?;
    state.check_app_instance_id(&app_instance_id)?;
    body.validate(&state.validators)?;

    info!(%app_instance_id, "Update application instance info");
    // The path parameter is authoritative for the record identity.
    let mut info = AppInstanceInfo::from(body);
    info.app_instance_id = app_instance_id;
    let updated = state.service.update(&tenant_id, info).await?;
    Ok(Json(updated.into()))
}

async fn delete_handler(
    State(state): State<Arc<AppState>>,
    Path((tenant_id, app_instance_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<&'static str>, ApiError> {
    require_access_token(&headers)?;
    state.check_tenant_id(&tenant_id)?;
    state.check_app_instance_id(&app_instance_id)?;

    info!(%app_instance_id, "Delete application instance info");
    state.service.delete(&tenant_id, &app_instance_id).await?;
    Ok(Json("success"))
}
