// src/handlers/crud.rs

use axum::{
    extract::State,
    response::IntoResponse,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        extract::{IdPath, ValidatedJson},
        pagination::ListParams,
        response::ApiResponse,
    },
    config::AppState,
    db::{CrudRepository, Entity},
};

// ---
// Handlers genéricos do CRUD: um por operação, instanciados por entidade no router.
// ---

pub async fn create<T>(
    State(app_state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<T::Create>,
) -> Result<impl IntoResponse, AppError>
where
    T: Entity,
    T::Create: DeserializeOwned + Validate,
{
    let record = CrudRepository::<T>::new(app_state.db_pool.clone())
        .create(&payload)
        .await?;
    Ok(ApiResponse::created(record))
}

pub async fn get_by_id<T: Entity>(
    State(app_state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<impl IntoResponse, AppError> {
    let record = CrudRepository::<T>::new(app_state.db_pool.clone())
        .get_by_id(id)
        .await?;
    Ok(ApiResponse::ok(record))
}

pub async fn get_list<T: Entity>(
    State(app_state): State<AppState>,
    params: ListParams,
) -> Result<impl IntoResponse, AppError> {
    let page = CrudRepository::<T>::new(app_state.db_pool.clone())
        .get_list(&params)
        .await?;
    Ok(ApiResponse::ok(page))
}

pub async fn update<T>(
    State(app_state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(payload): ValidatedJson<T::Update>,
) -> Result<impl IntoResponse, AppError>
where
    T: Entity,
    T::Update: DeserializeOwned + Validate,
{
    let record = CrudRepository::<T>::new(app_state.db_pool.clone())
        .update(id, &payload)
        .await?;
    Ok(ApiResponse::ok(record))
}

pub async fn delete<T: Entity>(
    State(app_state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<impl IntoResponse, AppError> {
    CrudRepository::<T>::new(app_state.db_pool.clone())
        .delete(id)
        .await?;
    Ok(ApiResponse::ok("dados removidos com sucesso"))
}
