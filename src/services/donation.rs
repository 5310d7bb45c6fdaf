use tracing::info;

use crate::database::connection::DbPool;
use crate::models::donation::{CreateDonation, Donation, DonationError, Donor};
use crate::requests::donation::DonationRequest;
use crate::utils::helpers::parse_id;

/// Validates a donation against the fund it targets and records it.
///
/// Client-side checks are never trusted: minimum amount, remaining capacity
/// and donor name are all re-checked here, atomically with the increment of
/// the fund's raised total.
pub async fn record_donation(
    pool: &DbPool,
    request: DonationRequest,
) -> Result<Donation, DonationError> {
    let fund_id = parse_id(&request.fund_id).ok_or(DonationError::InvalidId)?;

    let donation = Donation::record(
        pool,
        CreateDonation {
            fund_id,
            donor_name: request.donor_name,
            donation_amount: request.donation_amount,
            profile_image: request.profile_image,
        },
    )
    .await?;

    info!(
        "Recorded donation {} of {} to fund {}",
        donation.id, donation.donation_amount, fund_id
    );
    Ok(donation)
}

pub async fn list_donors(pool: &DbPool, fund_id: &str) -> Result<Vec<Donor>, DonationError> {
    let fund_id = parse_id(fund_id).ok_or(DonationError::InvalidId)?;
    Donation::find_donors(pool, fund_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fund::{CreateFund, Fund};
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    async fn seeded_fund(pool: &DbPool, amount: i64, raised: i64) -> Fund {
        let fund = Fund::create(
            pool,
            CreateFund {
                user_id: Uuid::new_v4(),
                title: "Flood relief".to_string(),
                org_name: "River Aid".to_string(),
                description: String::new(),
                cause: "Disaster".to_string(),
                image_url: None,
                amount,
                deadline: Utc::now() + Duration::days(10),
            },
        )
        .await
        .unwrap();

        if raised > 0 {
            record_donation(pool, request(&fund.id.to_string(), "seed", raised))
                .await
                .unwrap();
        }
        Fund::find_by_id(pool, fund.id).await.unwrap().unwrap()
    }

    fn request(fund_id: &str, name: &str, amount: i64) -> DonationRequest {
        DonationRequest {
            fund_id: fund_id.to_string(),
            donor_name: name.to_string(),
            donation_amount: amount,
            profile_image: None,
        }
    }

    #[tokio::test]
    async fn donation_fills_fund_exactly_to_target() {
        let pool = DbPool::in_memory();
        let fund = seeded_fund(&pool, 1000, 980).await;
        let id = fund.id.to_string();

        let over = record_donation(&pool, request(&id, "Kiran", 21)).await;
        assert!(matches!(over, Err(DonationError::ExceedsCapacity { remaining: 20 })));

        let donation = record_donation(&pool, request(&id, "Kiran", 20)).await.unwrap();
        let fund = Fund::find_by_id(&pool, fund.id).await.unwrap().unwrap();
        assert_eq!(fund.amount_raised, 1000);

        let donors = list_donors(&pool, &id).await.unwrap();
        assert_eq!(donors.iter().filter(|d| d.id == donation.id).count(), 1);
    }

    #[tokio::test]
    async fn unknown_fund_is_not_found() {
        let pool = DbPool::in_memory();
        let missing = Uuid::new_v4();

        let result = record_donation(&pool, request(&missing.to_string(), "Kiran", 50)).await;

        assert!(matches!(result, Err(DonationError::FundNotFound { id }) if id == missing));
    }

    #[tokio::test]
    async fn malformed_ids_are_rejected_before_lookup() {
        let pool = DbPool::in_memory();

        assert!(matches!(
            record_donation(&pool, request("abc", "Kiran", 50)).await,
            Err(DonationError::InvalidId)
        ));
        assert!(matches!(
            list_donors(&pool, "abc").await,
            Err(DonationError::InvalidId)
        ));
    }

    #[tokio::test]
    async fn fund_without_donations_lists_nobody() {
        let pool = DbPool::in_memory();
        let fund = seeded_fund(&pool, 500, 0).await;

        let donors = list_donors(&pool, &fund.id.to_string()).await.unwrap();

        assert!(donors.is_empty());
    }

    #[tokio::test]
    async fn donor_name_is_stored_trimmed() {
        let pool = DbPool::in_memory();
        let fund = seeded_fund(&pool, 500, 0).await;

        let donation = record_donation(&pool, request(&fund.id.to_string(), "  Noor  ", 25))
            .await
            .unwrap();

        assert_eq!(donation.donor_name, "Noor");
    }
}
