use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::user::{Identity, Registration};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub user_id: i32,
    pub email: String,
    /// `customer` or `admin`.
    pub role: String,
}

impl From<Identity> for UserResponse {
    fn from(identity: Identity) -> Self {
        Self {
            user_id: identity.user_id,
            email: identity.email,
            role: identity.role.as_str().to_string(),
        }
    }
}

/// POST /users/register
#[utoipa::path(
    post,
    path = "/users/register",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Customer account created", body = UserResponse),
        (status = 400, description = "Malformed email or short password"),
        (status = 409, description = "Email already registered"),
    ),
    tag = "users"
)]
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<CredentialsRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let registration = Registration {
        email: body.email,
        password: body.password,
    };

    let identity = web::block(move || state.users.register(registration))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(UserResponse::from(identity)))
}

/// POST /users/login
///
/// Verifies the credentials and returns the identity. The caller's session
/// layer is expected to forward `user_id` as the `X-User-Id` header.
#[utoipa::path(
    post,
    path = "/users/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = UserResponse),
        (status = 401, description = "Invalid email or password"),
    ),
    tag = "users"
)]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<CredentialsRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let identity = web::block(move || state.users.login(&body.email, &body.password))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(UserResponse::from(identity)))
}
