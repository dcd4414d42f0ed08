//! DTOs for the Paystack transaction API.
//!
//! Responses decode into these transport types first, then map into port
//! records in one pass.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::AppointmentId;
use crate::domain::ports::{AuthorizedTransaction, TransactionStatus, VerifiedTransaction};

#[derive(Debug, Serialize)]
pub(super) struct InitializeRequestDto<'a> {
    pub(super) email: &'a str,
    /// Minor units (kobo / cents).
    pub(super) amount: u64,
    pub(super) callback_url: &'a str,
    pub(super) metadata: MetadataDto,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct MetadataDto {
    pub(super) appointment_id: String,
}

/// Paystack wraps every payload in `{ status, message, data }`.
#[derive(Debug, Deserialize)]
pub(super) struct EnvelopeDto<T> {
    pub(super) status: bool,
    #[serde(default)]
    pub(super) message: String,
    pub(super) data: Option<T>,
}

#[derive(Debug, Deserialize)]
pub(super) struct InitializeDataDto {
    pub(super) authorization_url: String,
    pub(super) reference: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct VerifyDataDto {
    pub(super) status: String,
    /// Minor units actually charged.
    #[serde(default)]
    pub(super) amount: Option<u64>,
    /// An object when the intent carried metadata, otherwise often `""`.
    #[serde(default)]
    pub(super) metadata: Value,
}

impl<T> EnvelopeDto<T> {
    pub(super) fn into_data(self) -> Result<T, String> {
        match (self.status, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err("response envelope is missing data".to_owned()),
            (false, _) => Err(format!("provider reported failure: {}", self.message)),
        }
    }
}

impl From<InitializeDataDto> for AuthorizedTransaction {
    fn from(value: InitializeDataDto) -> Self {
        Self {
            authorization_url: value.authorization_url,
            reference: value.reference,
        }
    }
}

impl VerifyDataDto {
    pub(super) fn into_verified(self) -> Result<VerifiedTransaction, String> {
        let status = match self.status.as_str() {
            "success" => TransactionStatus::Success,
            "failed" | "abandoned" | "reversed" => TransactionStatus::Failed,
            _ => TransactionStatus::Pending,
        };
        let appointment_id = match self.metadata.get("appointmentId").and_then(Value::as_str) {
            Some(raw) => Some(
                AppointmentId::new(raw)
                    .map_err(|err| format!("metadata appointmentId is invalid: {err}"))?,
            ),
            None => None,
        };
        Ok(VerifiedTransaction {
            status,
            appointment_id,
            amount_minor_units: self.amount,
        })
    }
}
