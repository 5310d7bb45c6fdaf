use std::future::Future;

use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::donation::Donor;
use crate::models::fund::Fund;
use crate::requests::donation::DonationRequest;
use crate::utils::helpers::ApiResponse;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered, but without the expected result.
    #[error("{message}")]
    Rejected { status: u16, message: String },
}

/// Calls the fund detail page makes against the API.
pub trait FundApi {
    fn fetch_fund(&self, fund_id: &str) -> impl Future<Output = Result<Fund, ClientError>> + Send;

    fn fetch_donors(
        &self,
        fund_id: &str,
    ) -> impl Future<Output = Result<Vec<Donor>, ClientError>> + Send;

    /// Returns the server's confirmation message.
    fn donate(
        &self,
        request: &DonationRequest,
    ) -> impl Future<Output = Result<String, ClientError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpFundApi {
    client: Client,
    base_url: String,
}

impl HttpFundApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn read<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        let body: ApiResponse<T> = response.json().await?;

        match body.result {
            Some(result) if status.is_success() => Ok(result),
            _ => Err(ClientError::Rejected {
                status: status.as_u16(),
                message: body.message,
            }),
        }
    }
}

impl FundApi for HttpFundApi {
    async fn fetch_fund(&self, fund_id: &str) -> Result<Fund, ClientError> {
        let response = self
            .client
            .get(format!("{}/funds/{}", self.base_url, fund_id))
            .send()
            .await?;
        Self::read(response).await
    }

    async fn fetch_donors(&self, fund_id: &str) -> Result<Vec<Donor>, ClientError> {
        let response = self
            .client
            .get(format!("{}/funds/donors/{}", self.base_url, fund_id))
            .send()
            .await?;
        Self::read(response).await
    }

    async fn donate(&self, request: &DonationRequest) -> Result<String, ClientError> {
        let response = self
            .client
            .post(format!("{}/donations", self.base_url))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body: ApiResponse<serde_json::Value> = response.json().await?;
        if status.is_success() {
            Ok(body.message)
        } else {
            Err(ClientError::Rejected {
                status: status.as_u16(),
                message: body.message,
            })
        }
    }
}
