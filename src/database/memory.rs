use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::donation::{CreateDonation, Donation, DonationError, Donor, check_donation};
use crate::models::fund::{Fund, FundStatus};
use crate::models::user::{User, UserError};

/// Process-local store used when no database url is configured.
///
/// Every operation runs under a single mutex, which makes the donation
/// capacity check and the raised-total increment one atomic step.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Collections>,
}

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    funds: Vec<Fund>,
    donations: Vec<Donation>,
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, Collections> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert_user(&self, user: User) -> Result<User, UserError> {
        let mut db = self.lock();
        if db.users.iter().any(|u| u.email == user.email) {
            return Err(UserError::EmailTaken { email: user.email });
        }
        db.users.push(user.clone());
        Ok(user)
    }

    pub fn find_user(&self, predicate: impl Fn(&User) -> bool) -> Option<User> {
        self.lock().users.iter().find(|u| predicate(u)).cloned()
    }

    pub fn insert_fund(&self, fund: Fund) -> Fund {
        self.lock().funds.push(fund.clone());
        fund
    }

    pub fn find_fund(&self, id: Uuid) -> Option<Fund> {
        self.lock().funds.iter().find(|f| f.id == id).cloned()
    }

    pub fn list_funds(&self) -> Vec<Fund> {
        let mut funds = self.lock().funds.clone();
        funds.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        funds
    }

    pub fn close_finished(&self, now: DateTime<Utc>) -> Vec<Fund> {
        let mut db = self.lock();
        let mut closed = Vec::new();
        for fund in db.funds.iter_mut().filter(|f| f.is_finished(now)) {
            fund.status = FundStatus::Close;
            fund.updated_at = now;
            closed.push(fund.clone());
        }
        closed
    }

    pub fn record_donation(
        &self,
        donation: CreateDonation,
        now: DateTime<Utc>,
    ) -> Result<Donation, DonationError> {
        let mut db = self.lock();
        let fund_id = donation.fund_id;

        let fund = db
            .funds
            .iter_mut()
            .find(|f| f.id == fund_id)
            .ok_or(DonationError::FundNotFound { id: fund_id })?;

        check_donation(fund.remaining(), &donation.donor_name, donation.donation_amount)?;
        fund.amount_raised += donation.donation_amount;
        fund.updated_at = now;

        let record = Donation::from_request(donation, now);
        db.donations.push(record.clone());
        Ok(record)
    }

    pub fn donors(&self, fund_id: Uuid) -> Vec<Donor> {
        self.lock()
            .donations
            .iter()
            .filter(|d| d.fund_id == fund_id)
            .map(Donor::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::sync::Arc;

    fn fund(amount: i64, amount_raised: i64) -> Fund {
        let now = Utc::now();
        Fund {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "School roof".to_string(),
            org_name: "Village Trust".to_string(),
            description: String::new(),
            cause: "Education".to_string(),
            image_url: None,
            amount,
            amount_raised,
            deadline: now + Duration::days(30),
            status: FundStatus::Open,
            created_at: now,
            updated_at: now,
        }
    }

    fn donation(fund_id: Uuid, name: &str, amount: i64) -> CreateDonation {
        CreateDonation {
            fund_id,
            donor_name: name.to_string(),
            donation_amount: amount,
            profile_image: None,
        }
    }

    #[test]
    fn donation_raises_total_and_appends_donor() {
        let store = MemoryStore::default();
        let fund = store.insert_fund(fund(1000, 980));

        assert!(store.record_donation(donation(fund.id, "Ravi", 21), Utc::now()).is_err());
        store
            .record_donation(donation(fund.id, "Ravi", 20), Utc::now())
            .unwrap();

        assert_eq!(store.find_fund(fund.id).unwrap().amount_raised, 1000);
        let donors = store.donors(fund.id);
        assert_eq!(donors.len(), 1);
        assert_eq!(donors[0].donor_name, "Ravi");
    }

    #[test]
    fn donors_keep_insertion_order() {
        let store = MemoryStore::default();
        let fund = store.insert_fund(fund(10_000, 0));

        for name in ["first", "second", "third"] {
            store
                .record_donation(donation(fund.id, name, 50), Utc::now())
                .unwrap();
        }

        let names: Vec<_> = store
            .donors(fund.id)
            .into_iter()
            .map(|d| d.donor_name)
            .collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[test]
    fn concurrent_donations_never_overshoot() {
        let store = Arc::new(MemoryStore::default());
        let fund = store.insert_fund(fund(100, 60));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store
                        .record_donation(donation(fund.id, &format!("donor {i}"), 20), Utc::now())
                        .is_ok()
                })
            })
            .collect();

        let accepted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(accepted, 2);
        assert_eq!(store.find_fund(fund.id).unwrap().amount_raised, 100);
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let store = MemoryStore::default();
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            fullname: "Meera".to_string(),
            email: "meera@example.com".to_string(),
            password_hash: "x".to_string(),
            created_at: now,
            updated_at: now,
        };

        store.insert_user(user.clone()).unwrap();
        let again = User {
            id: Uuid::new_v4(),
            ..user
        };
        assert!(matches!(
            store.insert_user(again),
            Err(UserError::EmailTaken { .. })
        ));
    }
}
