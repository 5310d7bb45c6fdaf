use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFundRequest {
    pub title: String,
    pub org_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cause: String,
    #[serde(default, rename = "imageURL")]
    pub image_url: Option<String>,
    pub amount: i64,
    pub deadline: DateTime<Utc>,
}
