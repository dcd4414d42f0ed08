//! Patient appointment handlers.
//!
//! ```text
//! POST /api/user/appointments {"doctorId":"…","slotDate":"10_5_2024","slotTime":"10:00"}
//! GET  /api/user/appointments
//! POST /api/user/appointments/{appointmentId}/cancel
//! POST /api/user/appointments/{appointmentId}/payment
//! POST /api/user/appointments/{appointmentId}/payment/verify {"reference":"…"}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::{
    BookAppointmentRequest, CancelAppointmentRequest, Canceller, ConfirmPaymentRequest,
    InitiatePaymentRequest, PaymentOutcome,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::dto::{AppointmentResponse, TransitionResponse, appointment_list};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    DOCTOR_ID, FieldName, missing_field_error, parse_appointment_id, parse_doctor_id, parse_slot,
};

/// Booking request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    /// Doctor to book.
    pub doctor_id: Option<String>,
    /// Slot date as `D_M_YYYY`.
    #[schema(example = "10_5_2024")]
    pub slot_date: Option<String>,
    /// Slot time as `HH:MM`.
    #[schema(example = "10:00")]
    pub slot_time: Option<String>,
}

/// Payment confirmation body; `reference` comes back from the provider redirect.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentRequest {
    /// Provider reference from the checkout redirect.
    pub reference: Option<String>,
}

/// Where to send the patient to pay.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLinkResponse {
    /// Checkout URL the patient is redirected to.
    pub authorization_url: String,
    /// Provider transaction reference.
    pub reference: String,
}

/// Outcome of a payment confirmation.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusResponse {
    /// Appointment the payment is for.
    pub appointment_id: String,
    /// One of `paid`, `failed`, `pending`.
    #[schema(example = "paid")]
    pub outcome: String,
}

fn outcome_label(outcome: PaymentOutcome) -> &'static str {
    match outcome {
        PaymentOutcome::Paid => "paid",
        PaymentOutcome::Failed => "failed",
        PaymentOutcome::Pending => "pending",
    }
}

const REFERENCE: FieldName = FieldName::new("reference");

/// Book a slot with a doctor.
#[utoipa::path(
    post,
    path = "/api/user/appointments",
    request_body = BookRequest,
    responses(
        (status = 201, description = "Appointment booked", body = AppointmentResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Doctor or patient not found", body = Error),
        (status = 409, description = "Slot taken or doctor unavailable", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["patients"],
    operation_id = "bookAppointment",
    security(("BearerToken" = []))
)]
#[post("/user/appointments")]
pub async fn book_appointment(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<BookRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = auth.require_user()?;
    let BookRequest {
        doctor_id,
        slot_date,
        slot_time,
    } = payload.into_inner();
    let doctor_id = doctor_id.ok_or_else(|| missing_field_error(DOCTOR_ID))?;
    let request = BookAppointmentRequest {
        user_id,
        doctor_id: parse_doctor_id(&doctor_id, DOCTOR_ID)?,
        slot: parse_slot(slot_date.as_deref(), slot_time.as_deref())?,
    };
    let booked = state.appointments.book_appointment(request).await?;
    Ok(HttpResponse::Created().json(AppointmentResponse::from(booked.appointment)))
}

/// List the caller's appointments, oldest first.
#[utoipa::path(
    get,
    path = "/api/user/appointments",
    responses(
        (status = 200, description = "Appointments", body = [AppointmentResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not a patient token", body = Error)
    ),
    tags = ["patients"],
    operation_id = "listMyAppointments",
    security(("BearerToken" = []))
)]
#[get("/user/appointments")]
pub async fn list_my_appointments(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<web::Json<Vec<AppointmentResponse>>> {
    let user_id = auth.require_user()?;
    let appointments = state.appointment_queries.list_for_user(user_id).await?;
    Ok(web::Json(appointment_list(appointments)))
}

/// Cancel one of the caller's appointments and free its slot.
#[utoipa::path(
    post,
    path = "/api/user/appointments/{appointmentId}/cancel",
    params(("appointmentId" = String, Path, description = "Appointment identifier")),
    responses(
        (status = 200, description = "Cancelled (or already cancelled)", body = TransitionResponse),
        (status = 403, description = "Booked by someone else", body = Error),
        (status = 404, description = "Appointment not found", body = Error)
    ),
    tags = ["patients"],
    operation_id = "cancelMyAppointment",
    security(("BearerToken" = []))
)]
#[post("/user/appointments/{appointment_id}/cancel")]
pub async fn cancel_my_appointment(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<TransitionResponse>> {
    let user_id = auth.require_user()?;
    let appointment_id = parse_appointment_id(&path.into_inner())?;
    let cancelled = state
        .appointments
        .cancel_appointment(CancelAppointmentRequest {
            appointment_id,
            canceller: Canceller::Patient(user_id),
        })
        .await?;
    Ok(web::Json(TransitionResponse {
        appointment_id: cancelled.appointment_id.to_string(),
        changed: cancelled.newly_cancelled,
    }))
}

/// Open a payment transaction for an appointment.
#[utoipa::path(
    post,
    path = "/api/user/appointments/{appointmentId}/payment",
    params(("appointmentId" = String, Path, description = "Appointment identifier")),
    responses(
        (status = 200, description = "Redirect the patient here", body = PaymentLinkResponse),
        (status = 403, description = "Booked by someone else", body = Error),
        (status = 404, description = "Appointment not found", body = Error),
        (status = 409, description = "Appointment cancelled", body = Error),
        (status = 503, description = "Payment provider unavailable", body = Error)
    ),
    tags = ["payments"],
    operation_id = "initiatePayment",
    security(("BearerToken" = []))
)]
#[post("/user/appointments/{appointment_id}/payment")]
pub async fn initiate_payment(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<PaymentLinkResponse>> {
    let user_id = auth.require_user()?;
    let appointment_id = parse_appointment_id(&path.into_inner())?;
    let link = state
        .payments
        .initiate_payment(InitiatePaymentRequest {
            appointment_id,
            user_id,
        })
        .await?;
    Ok(web::Json(PaymentLinkResponse {
        authorization_url: link.authorization_url,
        reference: link.reference,
    }))
}

/// Confirm a payment with the provider and record it.
#[utoipa::path(
    post,
    path = "/api/user/appointments/{appointmentId}/payment/verify",
    params(("appointmentId" = String, Path, description = "Appointment identifier")),
    request_body = VerifyPaymentRequest,
    responses(
        (status = 200, description = "Provider verdict", body = PaymentStatusResponse),
        (status = 400, description = "Missing reference or mismatched transaction", body = Error),
        (status = 404, description = "Appointment not found", body = Error),
        (status = 503, description = "Payment provider unavailable", body = Error)
    ),
    tags = ["payments"],
    operation_id = "confirmPayment",
    security(("BearerToken" = []))
)]
#[post("/user/appointments/{appointment_id}/payment/verify")]
pub async fn confirm_payment(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
    payload: web::Json<VerifyPaymentRequest>,
) -> ApiResult<web::Json<PaymentStatusResponse>> {
    let user_id = auth.require_user()?;
    let appointment_id = parse_appointment_id(&path.into_inner())?;
    let reference = payload
        .into_inner()
        .reference
        .ok_or_else(|| missing_field_error(REFERENCE))?;
    let confirmed = state
        .payments
        .confirm_payment(ConfirmPaymentRequest {
            reference,
            appointment_id,
            user_id,
        })
        .await?;
    Ok(web::Json(PaymentStatusResponse {
        appointment_id: confirmed.appointment_id.to_string(),
        outcome: outcome_label(confirmed.outcome).to_owned(),
    }))
}

/// Mount the patient routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(book_appointment)
        .service(list_my_appointments)
        .service(cancel_my_appointment)
        .service(initiate_payment)
        .service(confirm_payment);
}

#[cfg(test)]
#[path = "patients_tests.rs"]
mod tests;
