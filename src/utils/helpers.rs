use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const GENERIC_ERROR: &str = "Something went wrong";
pub const INVALID_ID: &str = "Id invalid";

/// Envelope for every API answer: `{ message, result? }`.
#[derive(Serialize, Deserialize, Debug)]
pub struct ApiResponse<T> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            result: Some(data),
        }
    }

    pub fn error(message: String) -> ApiResponse<()> {
        ApiResponse {
            message,
            result: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            result: None,
        }
    }

    pub fn to_response(&self, status: StatusCode) -> HttpResponse {
        HttpResponse::build(status).json(self)
    }
}

/// Identifiers must be well formed before the store is touched.
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

pub fn invalid_id() -> HttpResponse {
    ApiResponse::<()>::error(INVALID_ID.to_string()).to_response(StatusCode::UNPROCESSABLE_ENTITY)
}

/// Answers malformed JSON bodies with the usual envelope instead of plain text.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        let response =
            ApiResponse::<()>::error(format!("Invalid request body: {}", err))
                .to_response(StatusCode::BAD_REQUEST);
        InternalError::from_response(err, response).into()
    })
}
