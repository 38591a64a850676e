use axum::{
	Json, Router,
	extract::{Path, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::state::AppState;
use strand_domain::chat::{ChatRequest, ChatResponse};
use strand_service::{Error, IndexReport};
use strand_storage::models::{NewProduct, Product};

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message, field } => json_error(
				StatusCode::BAD_REQUEST,
				"invalid_request",
				message,
				field.map(|field| vec![field]),
			),
			Error::NotFound { message } =>
				json_error(StatusCode::NOT_FOUND, "not_found", message, None),
			Error::Generation { .. } => json_error(
				StatusCode::BAD_GATEWAY,
				"generation_failed",
				"The answer could not be generated. Please try again.",
				None,
			),
			Error::Provider { message } => {
				tracing::error!(error = %message, "Provider error.");

				json_error(
					StatusCode::BAD_GATEWAY,
					"provider_error",
					"Upstream provider failed.",
					None,
				)
			},
			Error::Storage { message } => {
				tracing::error!(error = %message, "Storage error.");

				json_error(
					StatusCode::INTERNAL_SERVER_ERROR,
					"storage_error",
					"Internal error.",
					None,
				)
			},
			Error::Qdrant { message } => {
				tracing::error!(error = %message, "Qdrant error.");

				json_error(
					StatusCode::INTERNAL_SERVER_ERROR,
					"qdrant_error",
					"Internal error.",
					None,
				)
			},
			Error::IndexClosed => json_error(
				StatusCode::SERVICE_UNAVAILABLE,
				"index_unavailable",
				"The product index is not open.",
				None,
			),
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

pub fn router(state: AppState) -> Router {
	let cors_permissive = state.service.cfg.service.cors_permissive;
	let router = Router::new()
		.route("/health", get(health))
		.route("/v1/chat", post(chat))
		.route("/v1/products", get(list_products))
		.route("/v1/products/{product_id}", get(get_product))
		.with_state(state);

	if cors_permissive { router.layer(CorsLayer::permissive()) } else { router }
}

pub fn admin_router(state: AppState) -> Router {
	Router::new()
		.route("/v1/admin/build_index", post(build_index))
		.route("/v1/admin/products", post(import_products))
		.with_state(state)
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn chat(
	State(state): State<AppState>,
	Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
	let response = state.service.chat(payload).await?;

	Ok(Json(response))
}

async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
	let products = state.service.list_products().await?;

	Ok(Json(products))
}

async fn get_product(
	State(state): State<AppState>,
	Path(product_id): Path<i64>,
) -> Result<Json<Product>, ApiError> {
	let product = state.service.get_product(product_id).await?;

	Ok(Json(product))
}

async fn build_index(State(state): State<AppState>) -> Result<Json<IndexReport>, ApiError> {
	let report = state.service.build_index().await?;

	Ok(Json(report))
}

async fn import_products(
	State(state): State<AppState>,
	Json(payload): Json<Vec<NewProduct>>,
) -> Result<Json<Vec<Product>>, ApiError> {
	let inserted = state.service.import_products(payload).await?;

	Ok(Json(inserted))
}
