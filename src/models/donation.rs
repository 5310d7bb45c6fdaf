use crate::database::connection::DbPool;
use crate::models::fund::Fund;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

/// Smallest donation accepted, in whole currency units.
pub const MIN_DONATION: i64 = 20;

/// Confirmation message for an accepted donation.
pub const DONATION_SUCCESS: &str = "Donation successful!";

#[derive(Error, Debug)]
pub enum DonationError {
    #[error("Id invalid")]
    InvalidId,
    #[error("Fundraise with ID {id} not found")]
    FundNotFound { id: Uuid },
    #[error("Minimum donation amount is INR {}", MIN_DONATION)]
    BelowMinimum,
    #[error("Amount exceeds acceptance limit of INR {remaining}")]
    ExceedsCapacity { remaining: i64 },
    #[error("Donor name is required")]
    MissingDonorName,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: Uuid,
    pub fund_id: Uuid,
    pub donor_name: String,
    pub donation_amount: i64,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Public projection of a donation, as shown in a fund's donor list.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Donor {
    pub id: Uuid,
    pub donor_name: String,
    pub donation_amount: i64,
    pub profile_image: Option<String>,
}

impl From<&Donation> for Donor {
    fn from(donation: &Donation) -> Self {
        Donor {
            id: donation.id,
            donor_name: donation.donor_name.clone(),
            donation_amount: donation.donation_amount,
            profile_image: donation.profile_image.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateDonation {
    pub fund_id: Uuid,
    pub donor_name: String,
    pub donation_amount: i64,
    pub profile_image: Option<String>,
}

/// Checks a donation against a fund's remaining capacity.
///
/// Order matters for the message the donor sees: minimum, then capacity,
/// then name.
pub fn check_donation(remaining: i64, donor_name: &str, amount: i64) -> Result<(), DonationError> {
    if amount < MIN_DONATION {
        return Err(DonationError::BelowMinimum);
    }
    if amount > remaining {
        return Err(DonationError::ExceedsCapacity { remaining });
    }
    if donor_name.trim().is_empty() {
        return Err(DonationError::MissingDonorName);
    }
    Ok(())
}

impl Donation {
    pub(crate) fn from_request(donation: CreateDonation, now: DateTime<Utc>) -> Self {
        Donation {
            id: Uuid::new_v4(),
            fund_id: donation.fund_id,
            donor_name: donation.donor_name.trim().to_string(),
            donation_amount: donation.donation_amount,
            profile_image: donation.profile_image,
            created_at: now,
        }
    }

    /// Records the donation and raises the fund's total in one step.
    ///
    /// The capacity check and the increment happen under the same lock (a
    /// row lock in PostgreSQL, the store mutex in memory), so concurrent
    /// donations cannot jointly overshoot the target.
    pub async fn record(pool: &DbPool, donation: CreateDonation) -> Result<Self, DonationError> {
        let now = Utc::now();

        match pool {
            DbPool::Postgres(pg) => {
                let fund_id = donation.fund_id;
                let mut tx = pg.begin().await?;

                let fund = sqlx::query_as::<_, Fund>("SELECT * FROM funds WHERE id = $1 FOR UPDATE")
                    .bind(fund_id)
                    .fetch_optional(&mut *tx)
                    .await?
                    .ok_or(DonationError::FundNotFound { id: fund_id })?;

                check_donation(fund.remaining(), &donation.donor_name, donation.donation_amount)?;

                let updated = sqlx::query(
                    "UPDATE funds
                     SET amount_raised = amount_raised + $2, updated_at = $3
                     WHERE id = $1 AND amount - amount_raised >= $2",
                )
                .bind(fund_id)
                .bind(donation.donation_amount)
                .bind(now)
                .execute(&mut *tx)
                .await?;

                if updated.rows_affected() == 0 {
                    return Err(DonationError::ExceedsCapacity {
                        remaining: fund.remaining(),
                    });
                }

                let record = Donation::from_request(donation, now);
                let donation = sqlx::query_as::<_, Donation>(
                    "INSERT INTO donations (id, fund_id, donor_name, donation_amount, profile_image, created_at)
                     VALUES ($1, $2, $3, $4, $5, $6)
                     RETURNING id, fund_id, donor_name, donation_amount, profile_image, created_at",
                )
                .bind(record.id)
                .bind(record.fund_id)
                .bind(record.donor_name)
                .bind(record.donation_amount)
                .bind(record.profile_image)
                .bind(record.created_at)
                .fetch_one(&mut *tx)
                .await?;

                tx.commit().await?;

                Ok(donation)
            }
            DbPool::Memory(store) => store.record_donation(donation, now),
        }
    }

    /// Donors of a fund in insertion order. Unknown funds yield an empty list.
    pub async fn find_donors(pool: &DbPool, fund_id: Uuid) -> Result<Vec<Donor>, DonationError> {
        match pool {
            DbPool::Postgres(pg) => {
                let donors = sqlx::query_as::<_, Donor>(
                    "SELECT id, donor_name, donation_amount, profile_image
                     FROM donations
                     WHERE fund_id = $1
                     ORDER BY seq ASC",
                )
                .bind(fund_id)
                .fetch_all(pg)
                .await?;

                Ok(donors)
            }
            DbPool::Memory(store) => Ok(store.donors(fund_id)),
        }
    }
}
