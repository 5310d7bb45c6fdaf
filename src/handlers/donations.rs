use crate::{
    database::connection::DbPool,
    models::donation::{DONATION_SUCCESS, DonationError},
    requests::donation::DonationRequest,
    services::donation,
    utils::helpers::{ApiResponse, GENERIC_ERROR, invalid_id},
};
use actix_web::{HttpResponse, Result, web};
use tracing::{error, info, warn};

pub async fn create(
    pool: web::Data<DbPool>,
    request: web::Json<DonationRequest>,
) -> Result<HttpResponse> {
    let request = request.into_inner();
    info!("Donation of {} requested for fund {}", request.donation_amount, request.fund_id);

    match donation::record_donation(&pool, request).await {
        Ok(_) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::message(DONATION_SUCCESS))),
        Err(DonationError::InvalidId) => Ok(invalid_id()),
        Err(DonationError::Database(e)) => {
            error!("Database error recording donation: {}", e);
            Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error(GENERIC_ERROR.to_string())))
        }
        Err(e) => {
            warn!("Donation rejected: {}", e);
            Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error(e.to_string())))
        }
    }
}

pub async fn donors(pool: web::Data<DbPool>, path: web::Path<String>) -> Result<HttpResponse> {
    let fund_id = path.into_inner();
    info!("Listing donors of fund {}", fund_id);

    match donation::list_donors(&pool, &fund_id).await {
        Ok(donors) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            "Fetched fundraise donors successfully",
            donors,
        ))),
        Err(DonationError::InvalidId) => Ok(invalid_id()),
        Err(e) => {
            error!("Error listing donors of fund {}: {}", fund_id, e);
            Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error(GENERIC_ERROR.to_string())))
        }
    }
}
