use std::mem;

use futures_util::join;
use tracing::warn;
use uuid::Uuid;

use crate::utils::helpers::GENERIC_ERROR;
use crate::view::client::{ClientError, FundApi};
use crate::view::form::DonationForm;
use crate::view::state::{DonationPanel, FundDetailsState};

/// Drives one fund detail page: loads it, takes form edits, submits
/// donations and reloads afterwards.
pub struct FundDetails<A> {
    api: A,
    fund_id: String,
    viewer: Option<Uuid>,
    state: FundDetailsState,
}

impl<A: FundApi> FundDetails<A> {
    pub fn new(api: A, fund_id: impl Into<String>, viewer: Option<Uuid>) -> Self {
        Self {
            api,
            fund_id: fund_id.into(),
            viewer,
            state: FundDetailsState::default(),
        }
    }

    pub fn state(&self) -> &FundDetailsState {
        &self.state
    }

    pub fn panel(&self) -> DonationPanel {
        self.state.panel(self.viewer)
    }

    pub fn render(&self) -> String {
        self.state.render(self.viewer)
    }

    fn transition(&mut self, next: impl FnOnce(FundDetailsState) -> FundDetailsState) {
        self.state = next(mem::take(&mut self.state));
    }

    pub fn edit(&mut self, form: DonationForm) {
        self.transition(|state| state.form_edited(form));
    }

    /// Fetches the fund and its donors concurrently.
    pub async fn load(&mut self) {
        let (fund, donors) = join!(
            self.api.fetch_fund(&self.fund_id),
            self.api.fetch_donors(&self.fund_id)
        );

        match fund {
            Ok(fund) => self.transition(|state| state.fund_loaded(fund)),
            Err(ClientError::Rejected { message, .. }) => {
                self.transition(|state| state.fund_failed(message))
            }
            Err(e) => {
                warn!("Fetching fund {} failed: {}", self.fund_id, e);
                self.transition(|state| state.fund_failed(GENERIC_ERROR));
            }
        }

        match donors {
            Ok(donors) => self.transition(|state| state.donors_loaded(donors)),
            Err(e) => {
                warn!("Fetching donors of fund {} failed: {}", self.fund_id, e);
                self.transition(FundDetailsState::donors_failed);
            }
        }
    }

    /// Validates locally, posts the donation and reloads on success.
    /// Returns whether the donation was accepted.
    pub async fn submit(&mut self) -> bool {
        if self.panel() != DonationPanel::Form {
            return false;
        }
        let Some(fund) = self.state.fund() else {
            return false;
        };

        let request = match self.state.form().validate(fund) {
            Ok(request) => request,
            Err(e) => {
                self.transition(|state| state.submit_rejected(e.to_string()));
                return false;
            }
        };

        match self.api.donate(&request).await {
            Ok(_) => {
                self.transition(FundDetailsState::submit_succeeded);
                self.load().await;
                true
            }
            Err(ClientError::Rejected { message, .. }) => {
                self.transition(|state| state.submit_rejected(message));
                false
            }
            Err(e) => {
                warn!("Donation to fund {} failed: {}", self.fund_id, e);
                self.transition(|state| state.submit_rejected(GENERIC_ERROR));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::donation::Donor;
    use crate::models::fund::{Fund, FundStatus};
    use crate::requests::donation::DonationRequest;
    use crate::view::state::Notice;
    use chrono::Utc;
    use std::sync::Mutex;

    /// In-process stand-in for the API that applies donations to one fund.
    struct FakeApi {
        fund: Mutex<Fund>,
        donors: Mutex<Vec<Donor>>,
        posted: Mutex<Vec<DonationRequest>>,
        reject_with: Option<String>,
    }

    impl FakeApi {
        fn new(fund: Fund) -> Self {
            Self {
                fund: Mutex::new(fund),
                donors: Mutex::new(Vec::new()),
                posted: Mutex::new(Vec::new()),
                reject_with: None,
            }
        }
    }

    impl FundApi for FakeApi {
        async fn fetch_fund(&self, _fund_id: &str) -> Result<Fund, ClientError> {
            Ok(self.fund.lock().unwrap().clone())
        }

        async fn fetch_donors(&self, _fund_id: &str) -> Result<Vec<Donor>, ClientError> {
            Ok(self.donors.lock().unwrap().clone())
        }

        async fn donate(&self, request: &DonationRequest) -> Result<String, ClientError> {
            self.posted.lock().unwrap().push(request.clone());
            if let Some(message) = &self.reject_with {
                return Err(ClientError::Rejected {
                    status: 400,
                    message: message.clone(),
                });
            }
            self.fund.lock().unwrap().amount_raised += request.donation_amount;
            self.donors.lock().unwrap().push(Donor {
                id: Uuid::new_v4(),
                donor_name: request.donor_name.clone(),
                donation_amount: request.donation_amount,
                profile_image: None,
            });
            Ok("Donation successful!".to_string())
        }
    }

    fn fund(amount: i64, amount_raised: i64) -> Fund {
        let now = Utc::now();
        Fund {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Bridge repair".to_string(),
            org_name: "Hill Council".to_string(),
            description: String::new(),
            cause: "Infrastructure".to_string(),
            image_url: None,
            amount,
            amount_raised,
            deadline: now,
            status: FundStatus::Open,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn successful_submit_resets_form_and_refreshes_totals() {
        let fund = fund(1000, 980);
        let mut page = FundDetails::new(FakeApi::new(fund.clone()), fund.id.to_string(), None);
        page.load().await;

        page.edit(DonationForm::new("Mira", 20));
        assert!(page.submit().await);

        let state = page.state();
        assert_eq!(state.fund().unwrap().amount_raised, 1000);
        assert_eq!(state.donors().len(), 1);
        assert_eq!(state.form(), &DonationForm::default());
        assert_eq!(
            state.notice(),
            Some(&Notice::Success("Donation successful!".to_string()))
        );
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_the_api() {
        let fund = fund(1000, 980);
        let mut page = FundDetails::new(FakeApi::new(fund.clone()), fund.id.to_string(), None);
        page.load().await;

        page.edit(DonationForm::new("Mira", 21));
        assert!(!page.submit().await);

        assert!(page.api.posted.lock().unwrap().is_empty());
        assert_eq!(
            page.state().notice(),
            Some(&Notice::Error("Amount exceeds acceptance limit".to_string()))
        );
    }

    #[tokio::test]
    async fn server_rejection_is_shown_and_form_kept() {
        let fund = fund(500, 0);
        let mut api = FakeApi::new(fund.clone());
        api.reject_with = Some("Amount exceeds acceptance limit of INR 10".to_string());
        let mut page = FundDetails::new(api, fund.id.to_string(), None);
        page.load().await;

        page.edit(DonationForm::new("Mira", 50));
        assert!(!page.submit().await);

        assert_eq!(page.state().form(), &DonationForm::new("Mira", 50));
        assert!(matches!(page.state().notice(), Some(Notice::Error(_))));
    }

    #[tokio::test]
    async fn owner_cannot_submit() {
        let fund = fund(500, 0);
        let owner = fund.user_id;
        let mut page = FundDetails::new(FakeApi::new(fund.clone()), fund.id.to_string(), Some(owner));
        page.load().await;

        page.edit(DonationForm::new("Me", 50));

        assert_eq!(page.panel(), DonationPanel::Hidden);
        assert!(!page.submit().await);
        assert!(page.api.posted.lock().unwrap().is_empty());
    }
}
