use crate::{
    database::connection::DbPool,
    models::{
        auth::{AuthResponse, LoginRequest, RegisterRequest, UserInfo},
        user::{CreateUser, User, UserError},
    },
    services::auth::AuthService,
    utils::helpers::{ApiResponse, GENERIC_ERROR},
};
use actix_web::{HttpResponse, Result, web};
use tracing::{error, info, warn};

fn auth_response(auth_service: &AuthService, user: User) -> Result<AuthResponse> {
    let token = auth_service.generate_token(&user).map_err(|e| {
        error!("Failed to generate token: {}", e);
        actix_web::error::ErrorInternalServerError("Failed to generate token")
    })?;

    Ok(AuthResponse {
        token,
        user: UserInfo {
            id: user.id,
            fullname: user.fullname,
            email: user.email,
        },
    })
}

pub async fn register(
    pool: web::Data<DbPool>,
    auth_service: web::Data<AuthService>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    let request = request.into_inner();
    if request.fullname.trim().is_empty() || request.email.trim().is_empty() || request.password.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error(
            "Name, email and password are required".to_string(),
        )));
    }

    let create_user = CreateUser {
        fullname: request.fullname,
        email: request.email,
        password: request.password,
    };

    let user = match User::create(&pool, create_user).await {
        Ok(user) => user,
        Err(e @ UserError::EmailTaken { .. }) => {
            warn!("Registration refused: {}", e);
            return Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error(e.to_string())));
        }
        Err(e) => {
            error!("Failed to create user: {}", e);
            return Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error(GENERIC_ERROR.to_string())));
        }
    };
    info!("Registered organizer {}", user.id);

    let response = auth_response(&auth_service, user)?;
    Ok(HttpResponse::Created().json(ApiResponse::success("Registered successfully", response)))
}

pub async fn login(
    pool: web::Data<DbPool>,
    auth_service: web::Data<AuthService>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let user = match auth_service
        .authenticate_user(&pool, &request.email, &request.password)
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!("Invalid credentials for user: {}", request.email);
            return Ok(HttpResponse::Unauthorized()
                .json(ApiResponse::<()>::error("Invalid credentials".to_string())));
        }
        Err(e) => {
            error!("Authentication error: {}", e);
            return Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error(GENERIC_ERROR.to_string())));
        }
    };

    let response = auth_response(&auth_service, user)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Logged in successfully", response)))
}
