use actix_web::{FromRequest, HttpRequest, dev::Payload, error::InternalError, http::header, web};
use futures_util::future::{Ready, ready};
use tracing::warn;
use uuid::Uuid;

use crate::services::auth::AuthService;
use crate::utils::helpers::ApiResponse;

/// Organizer identity taken from an `Authorization: Bearer` header.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
}

fn unauthorized(message: &str) -> actix_web::Error {
    let response = ApiResponse::<()>::error(message.to_string())
        .to_response(actix_web::http::StatusCode::UNAUTHORIZED);
    InternalError::from_response(message.to_string(), response).into()
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let Some(auth) = req.app_data::<web::Data<AuthService>>() else {
            return ready(Err(actix_web::error::ErrorInternalServerError(
                "Authentication service not configured",
            )));
        };

        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        let Some(token) = token else {
            return ready(Err(unauthorized("Authentication required")));
        };

        ready(match auth.verify_token(token) {
            Ok(claims) => Ok(AuthenticatedUser {
                user_id: claims.sub,
                email: claims.email,
            }),
            Err(e) => {
                warn!("Rejected token: {}", e);
                Err(unauthorized("Invalid or expired token"))
            }
        })
    }
}
