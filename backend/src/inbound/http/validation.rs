//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every rejection is an `invalid_request` error whose details name the
//! offending field and a stable code, so clients can highlight the input.

use serde_json::json;

use crate::domain::{AppointmentId, DoctorId, Error, Slot, SlotDate, SlotTime};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidSlotDate,
    InvalidSlotTime,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidSlotDate => "invalid_slot_date",
            ErrorCode::InvalidSlotTime => "invalid_slot_time",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) const DOCTOR_ID: FieldName = FieldName::new("doctorId");
pub(crate) const APPOINTMENT_ID: FieldName = FieldName::new("appointmentId");
pub(crate) const SLOT_DATE: FieldName = FieldName::new("slotDate");
pub(crate) const SLOT_TIME: FieldName = FieldName::new("slotTime");

fn field_error(field: FieldName, code: ErrorCode, message: String, value: Option<&str>) -> Error {
    let details = match value {
        Some(value) => json!({
            "field": field.as_str(),
            "value": value,
            "code": code.as_str(),
        }),
        None => json!({
            "field": field.as_str(),
            "code": code.as_str(),
        }),
    };
    Error::invalid_request(message).with_details(details)
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {}", field.as_str()),
        None,
    )
}

fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    field_error(
        field,
        ErrorCode::InvalidUuid,
        format!("{} must be a valid UUID", field.as_str()),
        Some(value),
    )
}

pub(crate) fn parse_doctor_id(value: &str, field: FieldName) -> Result<DoctorId, Error> {
    DoctorId::new(value).map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn parse_appointment_id(value: &str) -> Result<AppointmentId, Error> {
    AppointmentId::new(value).map_err(|_| invalid_uuid_error(APPOINTMENT_ID, value))
}

pub(crate) fn parse_slot_date(value: &str) -> Result<SlotDate, Error> {
    SlotDate::new(value).map_err(|err| {
        field_error(
            SLOT_DATE,
            ErrorCode::InvalidSlotDate,
            err.to_string(),
            Some(value),
        )
    })
}

pub(crate) fn parse_slot_time(value: &str) -> Result<SlotTime, Error> {
    SlotTime::new(value).map_err(|err| {
        field_error(
            SLOT_TIME,
            ErrorCode::InvalidSlotTime,
            err.to_string(),
            Some(value),
        )
    })
}

/// Parse an optional `(slotDate, slotTime)` pair into a [`Slot`].
pub(crate) fn parse_slot(date: Option<&str>, time: Option<&str>) -> Result<Slot, Error> {
    let date = date.ok_or_else(|| missing_field_error(SLOT_DATE))?;
    let time = time.ok_or_else(|| missing_field_error(SLOT_TIME))?;
    Ok(Slot::new(parse_slot_date(date)?, parse_slot_time(time)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::Value;

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a str> {
        error.details().and_then(|d| d.get(key)).and_then(Value::as_str)
    }

    #[rstest]
    #[case(None, Some("10:00"), "slotDate", "missing_field")]
    #[case(Some("10_5_2024"), None, "slotTime", "missing_field")]
    #[case(Some("2024-05-10"), Some("10:00"), "slotDate", "invalid_slot_date")]
    #[case(Some("31_2_2024"), Some("10:00"), "slotDate", "invalid_slot_date")]
    #[case(Some("10_5_2024"), Some("   "), "slotTime", "invalid_slot_time")]
    fn slot_rejections_name_the_field(
        #[case] date: Option<&str>,
        #[case] time: Option<&str>,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let error = parse_slot(date, time).expect_err("slot is rejected");
        assert_eq!(detail(&error, "field"), Some(field));
        assert_eq!(detail(&error, "code"), Some(code));
    }

    #[test]
    fn accepts_unpadded_slot_dates() {
        let slot = parse_slot(Some("1_5_2024"), Some("09:30")).expect("valid slot");
        assert_eq!(slot.date.as_str(), "1_5_2024");
        assert_eq!(slot.time.as_str(), "09:30");
    }

    #[test]
    fn bad_identifiers_echo_the_value() {
        let error = parse_appointment_id("not-a-uuid").expect_err("invalid uuid");
        assert_eq!(detail(&error, "field"), Some("appointmentId"));
        assert_eq!(detail(&error, "value"), Some("not-a-uuid"));
        assert_eq!(detail(&error, "code"), Some("invalid_uuid"));
    }
}
