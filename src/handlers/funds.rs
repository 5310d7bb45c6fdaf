use crate::{
    database::connection::DbPool,
    middleware::auth::AuthenticatedUser,
    models::fund::{CreateFund, Fund, FundError},
    requests::fund::CreateFundRequest,
    utils::helpers::{ApiResponse, GENERIC_ERROR, invalid_id, parse_id},
};
use actix_web::{HttpResponse, Result, web};
use tracing::{error, info};

pub async fn create(
    pool: web::Data<DbPool>,
    request: web::Json<CreateFundRequest>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    info!("Creating fundraise for user: {}", user.user_id);
    let request = request.into_inner();

    let create_fund = CreateFund {
        user_id: user.user_id,
        title: request.title,
        org_name: request.org_name,
        description: request.description,
        cause: request.cause,
        image_url: request.image_url,
        amount: request.amount,
        deadline: request.deadline,
    };

    match Fund::create(&pool, create_fund).await {
        Ok(fund) => {
            info!("Successfully created fundraise with ID: {}", fund.id);
            Ok(HttpResponse::Created().json(ApiResponse::success("Fundraise created", fund)))
        }
        Err(FundError::Database(e)) => {
            error!("Database error creating fundraise: {}", e);
            Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error(GENERIC_ERROR.to_string())))
        }
        Err(e) => Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error(e.to_string()))),
    }
}

pub async fn get_fund(pool: web::Data<DbPool>, path: web::Path<String>) -> Result<HttpResponse> {
    let Some(fund_id) = parse_id(&path) else {
        return Ok(invalid_id());
    };
    info!("Getting fundraise {}", fund_id);

    match Fund::find_by_id(&pool, fund_id).await {
        Ok(Some(fund)) => Ok(HttpResponse::Ok().json(ApiResponse::success("Fetched fundraise", fund))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error(
            FundError::NotFound { id: fund_id }.to_string(),
        ))),
        Err(e) => {
            error!("Error getting fundraise {}: {}", fund_id, e);
            Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error(GENERIC_ERROR.to_string())))
        }
    }
}

pub async fn all(pool: web::Data<DbPool>) -> Result<HttpResponse> {
    info!("Getting all fundraises");

    match Fund::find_all(&pool).await {
        Ok(funds) => Ok(HttpResponse::Ok().json(ApiResponse::success("Fetched fundraises", funds))),
        Err(e) => {
            error!("Error getting all fundraises: {}", e);
            Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error(GENERIC_ERROR.to_string())))
        }
    }
}
