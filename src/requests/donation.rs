use serde::{Deserialize, Serialize};

/// Body of `POST /donations`. The fund id stays a string so a malformed id
/// can be answered with 422 instead of a generic body error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DonationRequest {
    pub fund_id: String,
    pub donor_name: String,
    pub donation_amount: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}
