use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use service::auth::domain::{LoginInput, RegisterInput, UserId};
use service::auth::Authenticator;

use crate::errors::ApiError;
use crate::routes::AUTH_BASE;

#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<dyn Authenticator>,
}

#[utoipa::path(post, path = "/api/Auth/Register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 201, description = "Registered", body = crate::openapi::EnvelopeDoc), (status = 400, description = "Rejected", body = crate::openapi::EnvelopeDoc)))]
pub async fn register(State(state): State<ServerState>, Json(input): Json<RegisterInput>) -> Result<Response, ApiError> {
    let resp = state.auth.register(input).await?;
    // 201 must point at the new resource
    match resp.data().map(|id| format!("{AUTH_BASE}/{id}")) {
        Some(location) => Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(resp)).into_response()),
        None => Ok((StatusCode::BAD_REQUEST, Json(resp)).into_response()),
    }
}

#[utoipa::path(get, path = "/api/Auth/{id}", tag = "auth", params(("id" = i32, Path, description = "User id")), responses((status = 200, description = "Found", body = crate::openapi::UserDoc), (status = 404, description = "Not found")))]
pub async fn get_user(State(state): State<ServerState>, Path(id): Path<UserId>) -> Result<Response, ApiError> {
    match state.auth.get_user(id).await? {
        Some(user) => Ok((StatusCode::OK, Json(user)).into_response()),
        None => Ok(StatusCode::NOT_FOUND.into_response()),
    }
}

#[utoipa::path(post, path = "/api/Auth/Login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged in", body = crate::openapi::EnvelopeDoc), (status = 400, description = "Rejected", body = crate::openapi::EnvelopeDoc)))]
pub async fn login(State(state): State<ServerState>, Json(input): Json<LoginInput>) -> Result<Response, ApiError> {
    let resp = state.auth.login(input).await?;
    let status = if resp.is_success() { StatusCode::OK } else { StatusCode::BAD_REQUEST };
    Ok((status, Json(resp)).into_response())
}
