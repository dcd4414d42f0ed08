//! Reqwest-backed Paystack gateway adapter.
//!
//! Owns transport details only: request serialisation, bearer
//! authentication, the request timeout, HTTP error mapping, and JSON
//! decoding into port records.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use zeroize::Zeroizing;

use super::dto::{EnvelopeDto, InitializeDataDto, InitializeRequestDto, MetadataDto, VerifyDataDto};
use crate::domain::ports::{
    AuthorizedTransaction, PaymentGateway, PaymentGatewayError, TransactionRequest,
    VerifiedTransaction,
};

/// Payment gateway adapter talking to one Paystack-compatible endpoint.
pub struct PaystackGateway {
    client: Client,
    base_url: Url,
    secret_key: Zeroizing<String>,
}

impl PaystackGateway {
    /// Build an adapter whose every request is bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        secret_key: Zeroizing<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            secret_key,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, PaymentGatewayError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}/{path}"))
            .map_err(|err| PaymentGatewayError::transport(format!("invalid endpoint: {err}")))
    }
}

#[async_trait]
impl PaymentGateway for PaystackGateway {
    async fn create_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<AuthorizedTransaction, PaymentGatewayError> {
        let body = InitializeRequestDto {
            email: request.email.as_str(),
            amount: request.amount_minor_units,
            callback_url: request.callback_url.as_str(),
            metadata: MetadataDto {
                appointment_id: request.appointment_id.to_string(),
            },
        };
        let response = self
            .client
            .post(self.endpoint("transaction/initialize")?)
            .bearer_auth(self.secret_key.as_str())
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let data: InitializeDataDto = read_envelope(response).await?;
        Ok(data.into())
    }

    async fn verify_transaction(
        &self,
        reference: &str,
    ) -> Result<VerifiedTransaction, PaymentGatewayError> {
        let mut url = self.endpoint("transaction/verify")?;
        url.path_segments_mut()
            .map_err(|()| PaymentGatewayError::transport("endpoint cannot carry a path"))?
            .push(reference);
        let response = self
            .client
            .get(url)
            .bearer_auth(self.secret_key.as_str())
            .send()
            .await
            .map_err(map_transport_error)?;

        let data: VerifyDataDto = read_envelope(response).await?;
        data.into_verified().map_err(PaymentGatewayError::decode)
    }
}

async fn read_envelope<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, PaymentGatewayError> {
    let status = response.status();
    let body = response.bytes().await.map_err(map_transport_error)?;
    if !status.is_success() {
        return Err(map_status_error(status, body.as_ref()));
    }
    decode_envelope(body.as_ref())
}

fn decode_envelope<T: DeserializeOwned>(body: &[u8]) -> Result<T, PaymentGatewayError> {
    let envelope: EnvelopeDto<T> = serde_json::from_slice(body).map_err(|error| {
        PaymentGatewayError::decode(format!("invalid Paystack JSON payload: {error}"))
    })?;
    envelope.into_data().map_err(PaymentGatewayError::rejected)
}

fn map_transport_error(error: reqwest::Error) -> PaymentGatewayError {
    if error.is_timeout() {
        PaymentGatewayError::timeout(error.to_string())
    } else {
        PaymentGatewayError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> PaymentGatewayError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            PaymentGatewayError::timeout(message)
        }
        _ if status.is_client_error() => PaymentGatewayError::rejected(message),
        _ => PaymentGatewayError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
