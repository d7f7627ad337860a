use crate::config::GatewayConfig;
use crate::domain::charge::{CaptureRequest, Charge, CustomerProfile, NewCharge, NewCustomer};
use crate::domain::money::MinorUnits;
use crate::domain::ports::PaymentApi;
use crate::error::{GatewayError, Result, StriperError};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Stripe REST client speaking the form-encoded `v1` API.
///
/// The secret key is supplied per request rather than held by the client, so a
/// single client serves both sandbox and live keys.
#[derive(Clone)]
pub struct StripeClient {
    http: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    code: Option<String>,
}

#[derive(Serialize)]
struct CaptureParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    amount: Option<MinorUnits>,
}

impl StripeClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StriperError::InternalError(Box::new(e)))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        Self::new(config.api_base.clone(), config.timeout)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url, path)
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> std::result::Result<T, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.json::<ErrorEnvelope>().await.ok().map(|envelope| envelope.error);
        Err(GatewayError {
            message: body
                .as_ref()
                .and_then(|error| error.message.clone())
                .unwrap_or_else(|| format!("HTTP {status}")),
            status: Some(status.as_u16()),
            kind: body.as_ref().and_then(|error| error.kind.clone()),
            code: body.and_then(|error| error.code),
        })
    }
}

#[async_trait]
impl PaymentApi for StripeClient {
    async fn create_customer(
        &self,
        secret_key: &str,
        customer: &NewCustomer,
    ) -> std::result::Result<CustomerProfile, GatewayError> {
        let response = self
            .http
            .post(self.url("customers"))
            .bearer_auth(secret_key)
            .form(customer)
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn create_charge(
        &self,
        secret_key: &str,
        charge: &NewCharge,
    ) -> std::result::Result<Charge, GatewayError> {
        let response = self
            .http
            .post(self.url("charges"))
            .bearer_auth(secret_key)
            .form(charge)
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn retrieve_charge(
        &self,
        secret_key: &str,
        charge_id: &str,
    ) -> std::result::Result<Charge, GatewayError> {
        let response = self
            .http
            .get(self.url(&format!("charges/{charge_id}")))
            .bearer_auth(secret_key)
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn capture_charge(
        &self,
        secret_key: &str,
        capture: &CaptureRequest,
    ) -> std::result::Result<Charge, GatewayError> {
        let response = self
            .http
            .post(self.url(&format!("charges/{}/capture", capture.transaction_id)))
            .bearer_auth(secret_key)
            .form(&CaptureParams {
                amount: capture.amount,
            })
            .send()
            .await?;
        Self::parse(response).await
    }
}
