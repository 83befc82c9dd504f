// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::common::response::ApiResponse;

// Nosso tipo de erro único, com `thiserror` para a ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Um ou mais campos são inválidos.")]
    ValidationError(#[from] ValidationErrors),

    // Corpo ilegível, id malformado, etc.
    #[error("{0}")]
    BadRequest(String),

    #[error("{0} não encontrado(a).")]
    NotFound(&'static str),

    #[error("Produto não encontrado: {0}")]
    ProductNotFound(String),

    #[error("Não existe estoque do produto {product_id} na filial {branch_id}.")]
    InventoryNotFound {
        product_id: uuid::Uuid,
        branch_id: uuid::Uuid,
    },

    #[error("Estoque insuficiente de '{product}': restam {available}, pedido {requested}.")]
    InsufficientStock {
        product: String,
        available: i32,
        requested: i32,
    },

    #[error("Tipo de tarifa inválido: '{0}'.")]
    InvalidTarifType(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Rota não encontrada.")]
    RouteNotFound,

    #[error("Método não permitido para esta rota.")]
    MethodNotAllowed,

    #[error("A requisição excedeu o tempo limite.")]
    RequestTimeout,

    #[error("{0}")]
    Forbidden(String),

    #[error("Login ou senha inválidos.")]
    InvalidCredentials,

    #[error("Token de autenticação inválido ou ausente.")]
    InvalidToken,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_)
            | AppError::RouteNotFound
            | AppError::ProductNotFound(_)
            | AppError::InventoryNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::InsufficientStock { .. } | AppError::InvalidTarifType(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converte violação de unicidade em `Conflict`; o resto segue como erro de banco.
    pub fn from_unique(err: sqlx::Error, what: &str) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return AppError::Conflict(format!("{what} já está em uso."));
            }
        }
        AppError::DatabaseError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let data: Value = match &self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = BTreeMap::new();
                collect_details("", errors, &mut details);
                json!({ "error": self.to_string(), "details": details })
            }
            AppError::InsufficientStock { available, requested, .. } => json!({
                "error": self.to_string(),
                "available": available,
                "requested": requested,
            }),
            // 5xx: a causa vai para o log, o cliente recebe uma mensagem genérica.
            e if status.is_server_error() => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                json!({ "error": "Ocorreu um erro inesperado." })
            }
            e => json!({ "error": e.to_string() }),
        };

        ApiResponse::new(status, data).into_response()
    }
}

// Achata os erros aninhados em chaves como `items[0].quantity`.
fn collect_details(
    prefix: &str,
    errors: &ValidationErrors,
    out: &mut BTreeMap<String, Vec<String>>,
) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                out.entry(path).or_default().extend(field_errors.iter().map(|e| {
                    match &e.message {
                        Some(m) => m.to_string(),
                        None => e.code.to_string(),
                    }
                }));
            }
            ValidationErrorsKind::Struct(inner) => collect_details(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_details(&format!("{path}[{index}]"), inner, out);
                }
            }
        }
    }
}
