// src/handlers/auth.rs

use axum::{extract::State, response::IntoResponse};

use crate::{
    common::{error::AppError, extract::ValidatedJson, response::ApiResponse},
    config::AppState,
    middleware::auth::AuthenticatedStaff,
    models::auth::{AuthResponse, LoginPayload},
};

// Handler de login
pub async fn login(
    State(app_state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    let token = app_state
        .auth_service
        .login(&payload.login, &payload.password)
        .await?;

    Ok(ApiResponse::ok(AuthResponse { token }))
}

// Handler da rota protegida /auth/me
pub async fn me(AuthenticatedStaff(staff): AuthenticatedStaff) -> impl IntoResponse {
    ApiResponse::ok(staff)
}
