use std::fmt::Write;

use uuid::Uuid;

use crate::models::donation::{DONATION_SUCCESS, Donor};
use crate::models::fund::Fund;
use crate::view::form::DonationForm;

pub const CLOSED_MESSAGE: &str = "No donations to closed fundraise";

/// Toast shown to the viewer after the last transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

/// What the donate area of the page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DonationPanel {
    /// Nothing loaded yet, or the viewer organizes this fund.
    Hidden,
    Form,
    Closed(&'static str),
}

/// Snapshot of the fund detail page.
///
/// Transitions consume the snapshot and return the next one; nothing is
/// mutated in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FundDetailsState {
    fund: Option<Fund>,
    donors: Vec<Donor>,
    form: DonationForm,
    notice: Option<Notice>,
}

impl FundDetailsState {
    pub fn fund(&self) -> Option<&Fund> {
        self.fund.as_ref()
    }

    pub fn donors(&self) -> &[Donor] {
        &self.donors
    }

    pub fn form(&self) -> &DonationForm {
        &self.form
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn fund_loaded(self, fund: Fund) -> Self {
        Self {
            fund: Some(fund),
            ..self
        }
    }

    /// Keeps whatever was shown before; only the notice changes.
    pub fn fund_failed(self, message: impl Into<String>) -> Self {
        Self {
            notice: Some(Notice::Error(message.into())),
            ..self
        }
    }

    pub fn donors_loaded(self, donors: Vec<Donor>) -> Self {
        Self { donors, ..self }
    }

    /// Donor list failures are silent; the previous list stays on screen.
    pub fn donors_failed(self) -> Self {
        self
    }

    pub fn form_edited(self, form: DonationForm) -> Self {
        Self { form, ..self }
    }

    pub fn submit_rejected(self, message: impl Into<String>) -> Self {
        Self {
            notice: Some(Notice::Error(message.into())),
            ..self
        }
    }

    pub fn submit_succeeded(self) -> Self {
        Self {
            form: DonationForm::default(),
            notice: Some(Notice::Success(DONATION_SUCCESS.to_string())),
            ..self
        }
    }

    pub fn panel(&self, viewer: Option<Uuid>) -> DonationPanel {
        match &self.fund {
            None => DonationPanel::Hidden,
            Some(fund) if viewer == Some(fund.user_id) => DonationPanel::Hidden,
            Some(fund) if fund.is_open() => DonationPanel::Form,
            Some(_) => DonationPanel::Closed(CLOSED_MESSAGE),
        }
    }

    /// Plain-text rendering of the page. Missing fields render empty.
    pub fn render(&self, viewer: Option<Uuid>) -> String {
        let mut out = String::new();
        let fund = self.fund.as_ref();
        let field = |f: fn(&Fund) -> String| fund.map(f).unwrap_or_default();

        let _ = writeln!(out, "{}", field(|f| f.title.clone()));
        let _ = writeln!(out, " - {}", field(|f| f.org_name.clone()));
        let _ = writeln!(out, "{}", field(|f| f.description.clone()));
        let _ = writeln!(out, "Cause : {}", field(|f| f.cause.clone()));
        let _ = writeln!(out, "Deadline : {}", field(|f| f.deadline.format("%d %b %Y").to_string()));
        let _ = writeln!(out, "Status : {}", field(|f| f.status.to_string()));
        let _ = writeln!(out, "Amount Raising : ₹{}", field(|f| f.amount.to_string()));
        let _ = writeln!(out, "Amount Raised : ₹{}", field(|f| f.amount_raised.to_string()));

        match self.panel(viewer) {
            DonationPanel::Hidden => {}
            DonationPanel::Form => {
                let _ = writeln!(
                    out,
                    "[Donate] name: {:?} amount: {}",
                    self.form.donor_name, self.form.donation_amount
                );
            }
            DonationPanel::Closed(message) => {
                let _ = writeln!(out, "{}", message);
            }
        }

        let _ = writeln!(out, "Donors");
        if self.donors.is_empty() {
            let _ = writeln!(out, "No donors to show");
        }
        for donor in &self.donors {
            let _ = writeln!(out, "{} - ₹{}", donor.donor_name, donor.donation_amount);
        }

        out
    }
}
