// src/handlers/staff.rs

use axum::{extract::State, response::IntoResponse};

use crate::{
    common::{error::AppError, extract::ValidatedJson, response::ApiResponse},
    config::AppState,
    db::CrudRepository,
    models::staff::{CreateStaffPayload, Staff},
};

// Cadastro de funcionário: a senha vira hash antes do INSERT.
pub async fn create_staff(
    State(app_state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateStaffPayload>,
) -> Result<impl IntoResponse, AppError> {
    let password_hash = app_state.auth_service.hash_password(&payload.password).await?;
    let draft = payload.into_new_staff(password_hash);

    let staff = CrudRepository::<Staff>::new(app_state.db_pool.clone())
        .create(&draft)
        .await?;

    tracing::info!("👤 Funcionário '{}' cadastrado ({})", staff.login, staff.id);
    Ok(ApiResponse::created(staff))
}
