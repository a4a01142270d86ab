use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde_json::json;
use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Insufficient stock for product {product_id}")]
    StockExhausted {
        product_id: i32,
        requested: i32,
        available: i32,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound(what) => AppError::NotFound(format!("{what} not found")),
            DomainError::InvalidInput(msg) => AppError::BadRequest(msg),
            DomainError::StockExhausted {
                product_id,
                requested,
                available,
            } => AppError::StockExhausted {
                product_id,
                requested,
                available,
            },
            DomainError::Conflict(msg) => AppError::Conflict(msg),
            DomainError::Forbidden(msg) => AppError::Forbidden(msg),
            e @ DomainError::InvalidCredentials => AppError::Unauthorized(e.to_string()),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) | AppError::StockExhausted { .. } => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        match self {
            AppError::StockExhausted {
                product_id,
                requested,
                available,
            } => builder.json(json!({
                "error": self.to_string(),
                "product_id": product_id,
                "requested": requested,
                "available": available,
            })),
            AppError::Internal(msg) => {
                log::error!("Internal error: {}", msg);
                builder.json(json!({ "error": "Internal server error" }))
            }
            _ => builder.json(json!({ "error": self.to_string() })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn not_found_returns_404() {
        let resp = AppError::NotFound("Product 1 not found".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_error_returns_500() {
        let err = AppError::Internal("something went wrong".to_string());
        assert_eq!(
            err.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn stock_exhaustion_returns_409() {
        let err: AppError = DomainError::StockExhausted {
            product_id: 3,
            requested: 2,
            available: 1,
        }
        .into();
        assert_eq!(err.error_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn domain_not_found_maps_to_app_not_found() {
        let app_err: AppError = DomainError::not_found("Product 7").into();
        assert!(matches!(app_err, AppError::NotFound(ref m) if m == "Product 7 not found"));
    }

    #[test]
    fn domain_invalid_input_maps_to_bad_request() {
        let app_err: AppError = DomainError::invalid("bad value").into();
        assert_eq!(app_err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_credentials_map_to_401() {
        let app_err: AppError = DomainError::InvalidCredentials.into();
        assert_eq!(app_err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(app_err.to_string(), "Invalid email or password");
    }

    #[test]
    fn forbidden_and_conflict_statuses() {
        let forbidden: AppError = DomainError::Forbidden("no".to_string()).into();
        let conflict: AppError = DomainError::Conflict("dup".to_string()).into();
        assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(conflict.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn domain_internal_maps_to_app_internal() {
        let app_err: AppError = DomainError::Internal("oops".to_string()).into();
        assert!(matches!(app_err, AppError::Internal(_)));
    }
}
