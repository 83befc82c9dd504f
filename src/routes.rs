// src/routes.rs

use std::time::Duration;

use axum::{
    http::StatusCode,
    middleware::map_response,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::de::DeserializeOwned;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use validator::Validate;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    db::Entity,
    handlers::{self, crud},
    models::{
        basket::Basket,
        branch::Branch,
        category::Category,
        income::{Income, IncomeProduct},
        product::Product,
        sale::Sale,
        staff::Staff,
        storage::{Storage, StorageTransaction},
        tarif::Tarif,
        transaction::Transaction,
    },
};

pub fn router(app_state: AppState) -> Router {
    let request_timeout = app_state.config.request_timeout;

    let entities = Router::new()
        .merge(crud_routes::<Branch>("branch"))
        .merge(crud_routes::<Category>("category"))
        .merge(crud_routes::<Product>("product"))
        .merge(crud_routes::<Tarif>("tarif"))
        .merge(crud_routes::<Sale>("sale"))
        .merge(crud_routes::<Basket>("basket"))
        .merge(crud_routes::<Storage>("storage"))
        .merge(crud_routes::<StorageTransaction>("storage_transaction"))
        .merge(crud_routes::<Transaction>("transaction"))
        .merge(crud_routes::<Income>("income"))
        .merge(crud_routes::<IncomeProduct>("income_product"))
        // Funcionário tem cadastro próprio (hash da senha)
        .route("/staff", post(handlers::staff::create_staff))
        .merge(entity_routes::<Staff>("staff"));

    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/me", get(handlers::auth::me));

    let routes = Router::new()
        .route("/health", get(health))
        .route("/start_sale", post(handlers::sale::start_sale))
        .route("/start_sale_barcode", post(handlers::sale::start_sale_barcode))
        .nest("/auth", auth_routes)
        .merge(entities);

    with_http_layers(routes, request_timeout).with_state(app_state)
}

// Fallbacks, trace e prazo. Toda resposta que não sai de um handler
// (rota inexistente, método errado, timeout) também leva o envelope.
fn with_http_layers<S>(routes: Router<S>, request_timeout: Duration) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    routes
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(TraceLayer::new_for_http())
        // Prazo da requisição: ao estourar, o future (e a transação dele) é descartado.
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(map_response(envelope_timeout))
}

async fn health() -> impl IntoResponse {
    ApiResponse::ok("ok")
}

async fn route_not_found() -> AppError {
    AppError::RouteNotFound
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

// O TimeoutLayer responde 408 com corpo vazio.
async fn envelope_timeout(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        return AppError::RequestTimeout.into_response();
    }
    response
}

// POST /{entidade} + as rotas de `entity_routes`.
fn crud_routes<T>(singular: &str) -> Router<AppState>
where
    T: Entity,
    T::Create: DeserializeOwned + Validate,
    T::Update: DeserializeOwned + Validate,
{
    Router::new()
        .route(&format!("/{singular}"), post(crud::create::<T>))
        .merge(entity_routes::<T>(singular))
}

// GET|PUT|DELETE /{entidade}/{id} e GET /{entidades}
fn entity_routes<T>(singular: &str) -> Router<AppState>
where
    T: Entity,
    T::Update: DeserializeOwned + Validate,
{
    Router::new()
        .route(
            &format!("/{singular}/{{id}}"),
            get(crud::get_by_id::<T>)
                .put(crud::update::<T>)
                .delete(crud::delete::<T>),
        )
        .route(&format!("/{}", T::PLURAL), get(crud::get_list::<T>))
}
