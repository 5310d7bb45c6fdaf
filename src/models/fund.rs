use crate::database::connection::DbPool;
use crate::models::donation::MIN_DONATION;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum FundError {
    #[error("Fundraise with ID {id} not found")]
    NotFound { id: Uuid },
    #[error("{0}")]
    Invalid(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "fund_status")]
pub enum FundStatus {
    Open,
    Close,
    Hold,
}

impl FundStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FundStatus::Open => "Open",
            FundStatus::Close => "Close",
            FundStatus::Hold => "Hold",
        }
    }
}

impl fmt::Display for FundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Fund {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub org_name: String,
    pub description: String,
    pub cause: String,
    #[serde(rename = "imageURL")]
    pub image_url: Option<String>,
    pub amount: i64,
    pub amount_raised: i64,
    pub deadline: DateTime<Utc>,
    pub status: FundStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateFund {
    pub user_id: Uuid,
    pub title: String,
    pub org_name: String,
    pub description: String,
    pub cause: String,
    pub image_url: Option<String>,
    pub amount: i64,
    pub deadline: DateTime<Utc>,
}

impl CreateFund {
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), FundError> {
        if self.title.trim().is_empty() {
            return Err(FundError::Invalid("Title is required".to_string()));
        }
        if self.org_name.trim().is_empty() {
            return Err(FundError::Invalid("Organization name is required".to_string()));
        }
        if self.amount < MIN_DONATION {
            return Err(FundError::Invalid(format!(
                "Target amount must be at least {}",
                MIN_DONATION
            )));
        }
        if self.deadline <= now {
            return Err(FundError::Invalid("Deadline must be in the future".to_string()));
        }
        Ok(())
    }
}

impl Fund {
    /// Ceiling for the next donation.
    pub fn remaining(&self) -> i64 {
        (self.amount - self.amount_raised).max(0)
    }

    pub fn is_open(&self) -> bool {
        self.status == FundStatus::Open
    }

    /// Open funds past their deadline or fully raised.
    pub fn is_finished(&self, now: DateTime<Utc>) -> bool {
        self.is_open() && (self.deadline < now || self.amount_raised >= self.amount)
    }

    pub async fn create(pool: &DbPool, fund: CreateFund) -> Result<Self, FundError> {
        let now = Utc::now();
        fund.validate(now)?;

        let record = Fund {
            id: Uuid::new_v4(),
            user_id: fund.user_id,
            title: fund.title.trim().to_string(),
            org_name: fund.org_name.trim().to_string(),
            description: fund.description,
            cause: fund.cause,
            image_url: fund.image_url,
            amount: fund.amount,
            amount_raised: 0,
            deadline: fund.deadline,
            status: FundStatus::Open,
            created_at: now,
            updated_at: now,
        };

        match pool {
            DbPool::Postgres(pg) => {
                let fund = sqlx::query_as::<_, Fund>(
                    "INSERT INTO funds (id, user_id, title, org_name, description, cause, image_url,
                                        amount, amount_raised, deadline, status, created_at, updated_at)
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                     RETURNING *",
                )
                .bind(record.id)
                .bind(record.user_id)
                .bind(record.title)
                .bind(record.org_name)
                .bind(record.description)
                .bind(record.cause)
                .bind(record.image_url)
                .bind(record.amount)
                .bind(record.amount_raised)
                .bind(record.deadline)
                .bind(record.status)
                .bind(record.created_at)
                .bind(record.updated_at)
                .fetch_one(pg)
                .await?;

                Ok(fund)
            }
            DbPool::Memory(store) => Ok(store.insert_fund(record)),
        }
    }

    pub async fn find_by_id(pool: &DbPool, id: Uuid) -> Result<Option<Self>, FundError> {
        match pool {
            DbPool::Postgres(pg) => {
                let fund = sqlx::query_as::<_, Fund>("SELECT * FROM funds WHERE id = $1")
                    .bind(id)
                    .fetch_optional(pg)
                    .await?;

                Ok(fund)
            }
            DbPool::Memory(store) => Ok(store.find_fund(id)),
        }
    }

    pub async fn find_all(pool: &DbPool) -> Result<Vec<Self>, FundError> {
        match pool {
            DbPool::Postgres(pg) => {
                let funds =
                    sqlx::query_as::<_, Fund>("SELECT * FROM funds ORDER BY created_at DESC")
                        .fetch_all(pg)
                        .await?;

                Ok(funds)
            }
            DbPool::Memory(store) => Ok(store.list_funds()),
        }
    }

    /// Moves every open fund that is past its deadline or fully raised to
    /// `Close` and returns the funds that changed.
    pub async fn close_finished(pool: &DbPool, now: DateTime<Utc>) -> Result<Vec<Self>, FundError> {
        match pool {
            DbPool::Postgres(pg) => {
                let funds = sqlx::query_as::<_, Fund>(
                    "UPDATE funds
                     SET status = 'Close', updated_at = $1
                     WHERE status = 'Open' AND (deadline < $1 OR amount_raised >= amount)
                     RETURNING *",
                )
                .bind(now)
                .fetch_all(pg)
                .await?;

                Ok(funds)
            }
            DbPool::Memory(store) => Ok(store.close_finished(now)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn create_fund(amount: i64, deadline: DateTime<Utc>) -> CreateFund {
        CreateFund {
            user_id: Uuid::new_v4(),
            title: "Clean water".to_string(),
            org_name: "Wells for All".to_string(),
            description: "Drill two wells".to_string(),
            cause: "Health".to_string(),
            image_url: None,
            amount,
            deadline,
        }
    }

    #[test]
    fn status_labels_match_wire_names() {
        for status in [FundStatus::Open, FundStatus::Close, FundStatus::Hold] {
            let wire = serde_json::to_value(status).unwrap();

            assert_eq!(wire, status.to_string());
        }
    }

    #[test]
    fn create_fund_rejects_past_deadline() {
        let now = Utc::now();
        let fund = create_fund(1000, now - Duration::days(1));

        assert!(matches!(fund.validate(now), Err(FundError::Invalid(_))));
    }

    #[test]
    fn create_fund_rejects_target_below_donation_floor() {
        let now = Utc::now();
        let fund = create_fund(MIN_DONATION - 1, now + Duration::days(1));

        assert!(fund.validate(now).is_err());
    }

    #[tokio::test]
    async fn created_fund_starts_open_with_nothing_raised() {
        let pool = DbPool::in_memory();
        let fund = Fund::create(&pool, create_fund(500, Utc::now() + Duration::days(7)))
            .await
            .unwrap();

        assert_eq!(fund.status, FundStatus::Open);
        assert_eq!(fund.amount_raised, 0);
        assert_eq!(fund.remaining(), 500);

        let fetched = Fund::find_by_id(&pool, fund.id).await.unwrap();
        assert_eq!(fetched, Some(fund));
    }

    #[tokio::test]
    async fn close_finished_only_touches_expired_open_funds() {
        let pool = DbPool::in_memory();
        let live = Fund::create(&pool, create_fund(500, Utc::now() + Duration::days(7)))
            .await
            .unwrap();
        let expiring = Fund::create(&pool, create_fund(500, Utc::now() + Duration::hours(1)))
            .await
            .unwrap();

        let closed = Fund::close_finished(&pool, Utc::now() + Duration::hours(2))
            .await
            .unwrap();

        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].id, expiring.id);
        assert_eq!(closed[0].status, FundStatus::Close);

        let live = Fund::find_by_id(&pool, live.id).await.unwrap().unwrap();
        assert_eq!(live.status, FundStatus::Open);
    }
}
