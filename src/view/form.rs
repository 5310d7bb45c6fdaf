use thiserror::Error;

use crate::models::donation::MIN_DONATION;
use crate::models::fund::Fund;
use crate::requests::donation::DonationRequest;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Minimum donation amount is INR {}", MIN_DONATION)]
    BelowMinimum,
    #[error("Amount exceeds acceptance limit")]
    ExceedsCapacity,
    #[error("Donor name is required")]
    MissingName,
}

/// Values typed into the donate form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationForm {
    pub donor_name: String,
    pub donation_amount: i64,
}

impl Default for DonationForm {
    fn default() -> Self {
        Self {
            donor_name: String::new(),
            donation_amount: MIN_DONATION,
        }
    }
}

impl DonationForm {
    pub fn new(donor_name: impl Into<String>, donation_amount: i64) -> Self {
        Self {
            donor_name: donor_name.into(),
            donation_amount,
        }
    }

    /// Checks run before anything is sent; the server repeats them.
    pub fn validate(&self, fund: &Fund) -> Result<DonationRequest, FormError> {
        if self.donation_amount < MIN_DONATION {
            return Err(FormError::BelowMinimum);
        }
        if self.donation_amount > fund.amount - fund.amount_raised {
            return Err(FormError::ExceedsCapacity);
        }
        if self.donor_name.trim().is_empty() {
            return Err(FormError::MissingName);
        }

        Ok(DonationRequest {
            fund_id: fund.id.to_string(),
            donor_name: self.donor_name.clone(),
            donation_amount: self.donation_amount,
            profile_image: None,
        })
    }
}
