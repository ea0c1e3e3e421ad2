use axum::http::StatusCode;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::response::ApiResponse;

/// Path clients are sent back to when a room session is missing or stale.
pub const ACCESS_REDIRECT: &str = "/access";

/// Standard error type for the Kartela service.
#[derive(Debug, Error)]
pub enum KartelaError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The room session is missing, expired, revoked or bound to another room.
    #[error("Session required: {0}")]
    SessionRequired(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Validation errors")]
    ValidationErrors(Vec<FieldError>),

    #[error("Too many attempts, retry in {0} seconds")]
    RateLimited(u64),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl KartelaError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            KartelaError::NotFound(_) => StatusCode::NOT_FOUND,
            KartelaError::BadRequest(_) => StatusCode::BAD_REQUEST,
            KartelaError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            KartelaError::SessionRequired(_) => StatusCode::UNAUTHORIZED,
            KartelaError::Forbidden(_) => StatusCode::FORBIDDEN,
            KartelaError::Conflict(_) => StatusCode::CONFLICT,
            KartelaError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            KartelaError::ValidationErrors(_) => StatusCode::UNPROCESSABLE_ENTITY,
            KartelaError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            KartelaError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            KartelaError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            KartelaError::NotFound(_) => "NOT_FOUND",
            KartelaError::BadRequest(_) => "BAD_REQUEST",
            KartelaError::Unauthorized(_) => "UNAUTHORIZED",
            KartelaError::SessionRequired(_) => "SESSION_REQUIRED",
            KartelaError::Forbidden(_) => "FORBIDDEN",
            KartelaError::Conflict(_) => "CONFLICT",
            KartelaError::Validation(_) => "VALIDATION_ERROR",
            KartelaError::ValidationErrors(_) => "VALIDATION_ERROR",
            KartelaError::RateLimited(_) => "RATE_LIMITED",
            KartelaError::Internal(_) => "INTERNAL_ERROR",
            KartelaError::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Turkish message shown to operators at the scanner / terminal.
    pub fn user_message(&self) -> &'static str {
        match self {
            KartelaError::NotFound(_) => "Kayıt bulunamadı.",
            KartelaError::BadRequest(_) => "Geçersiz istek.",
            KartelaError::Unauthorized(_) => "Kimlik doğrulanamadı.",
            KartelaError::SessionRequired(_) => {
                "Oturum bulunamadı veya süresi doldu. Lütfen tekrar giriş yapın."
            }
            KartelaError::Forbidden(_) => "Bu işlem için yetkiniz yok.",
            KartelaError::Conflict(_) => "İşlem mevcut durumla çakışıyor.",
            KartelaError::Validation(_) | KartelaError::ValidationErrors(_) => {
                "Girilen bilgiler geçersiz."
            }
            KartelaError::RateLimited(_) => "Çok fazla deneme. Lütfen biraz bekleyin.",
            KartelaError::Internal(_) | KartelaError::Database(_) => {
                "Beklenmeyen bir hata oluştu."
            }
        }
    }

    /// Create a validation error with field-level details.
    pub fn validation_fields(errors: Vec<FieldError>) -> Self {
        KartelaError::ValidationErrors(errors)
    }
}

impl From<validator::ValidationErrors> for KartelaError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = field.to_string();
                errs.iter()
                    .map(|e| {
                        let message = e
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("failed `{}` check", e.code));
                        FieldError::with_code(field.clone(), message, e.code.to_string())
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        KartelaError::ValidationErrors(fields)
    }
}

/// Error detail for API responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub user_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

/// Field-level validation error.
///
/// ```json
/// {
///   "field": "number",
///   "message": "must not be empty",
///   "code": "length"
/// }
/// ```
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl FieldError {
    /// Create a new field error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
            code: None,
        }
    }

    /// Create a new field error with a code.
    pub fn with_code(
        field: impl Into<String>,
        message: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
            code: Some(code.into()),
        }
    }
}

impl axum::response::IntoResponse for KartelaError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        match &self {
            KartelaError::Internal(_) | KartelaError::Database(_) => {
                tracing::error!(error = %self, "request failed");
            }
            _ => tracing::debug!(error = %self, "request rejected"),
        }

        let fields = match &self {
            KartelaError::ValidationErrors(errs) => Some(errs.clone()),
            _ => None,
        };
        let message = match &self {
            KartelaError::ValidationErrors(errs) => errs
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect::<Vec<_>>()
                .join("; "),
            _ => self.to_string(),
        };
        let redirect = match &self {
            KartelaError::SessionRequired(_) => Some(ACCESS_REDIRECT.to_string()),
            _ => None,
        };
        let body: ApiResponse<()> = ApiResponse {
            success: false,
            data: None,
            error: Some(ErrorDetail {
                code: self.error_code().to_string(),
                message,
                user_message: self.user_message().to_string(),
                fields,
                redirect,
            }),
        };

        let mut response = (status, axum::Json(body)).into_response();
        if let KartelaError::RateLimited(secs) = self {
            if let Ok(value) = axum::http::HeaderValue::from_str(&secs.to_string()) {
                response
                    .headers_mut()
                    .insert(axum::http::header::RETRY_AFTER, value);
            }
        }
        response
    }
}
