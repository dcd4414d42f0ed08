//! Handlers for signed-in doctors.
//!
//! ```text
//! GET  /api/doctor/appointments
//! POST /api/doctor/appointments/{appointmentId}/complete
//! POST /api/doctor/appointments/{appointmentId}/cancel
//! GET  /api/doctor/dashboard
//! POST /api/doctor/availability
//! ```

use actix_web::{get, post, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::{
    CancelAppointmentRequest, Canceller, ChangeAvailabilityRequest, ChangeAvailabilityResponse,
    CompleteAppointmentRequest,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::dto::{
    AppointmentResponse, DoctorDashboardResponse, TransitionResponse, appointment_list,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_appointment_id;

/// Availability after a toggle.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    /// Doctor whose availability changed.
    pub doctor_id: String,
    /// Availability after the change.
    pub available: bool,
}

impl From<ChangeAvailabilityResponse> for AvailabilityResponse {
    fn from(value: ChangeAvailabilityResponse) -> Self {
        Self {
            doctor_id: value.doctor_id.to_string(),
            available: value.available,
        }
    }
}

/// The calling doctor's appointments.
#[utoipa::path(
    get,
    path = "/api/doctor/appointments",
    responses(
        (status = 200, description = "Appointments", body = [AppointmentResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not a doctor token", body = Error)
    ),
    tags = ["doctor"],
    operation_id = "listDoctorAppointments",
    security(("BearerToken" = []))
)]
#[get("/doctor/appointments")]
pub async fn list_doctor_appointments(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<web::Json<Vec<AppointmentResponse>>> {
    let doctor_id = auth.require_doctor()?;
    let appointments = state.appointment_queries.list_for_doctor(doctor_id).await?;
    Ok(web::Json(appointment_list(appointments)))
}

/// Mark an appointment as completed.
#[utoipa::path(
    post,
    path = "/api/doctor/appointments/{appointmentId}/complete",
    params(("appointmentId" = String, Path, description = "Appointment identifier")),
    responses(
        (status = 200, description = "Completed (or already completed)", body = TransitionResponse),
        (status = 403, description = "Another doctor's appointment", body = Error),
        (status = 404, description = "Appointment not found", body = Error),
        (status = 409, description = "Appointment cancelled", body = Error)
    ),
    tags = ["doctor"],
    operation_id = "completeAppointment",
    security(("BearerToken" = []))
)]
#[post("/doctor/appointments/{appointment_id}/complete")]
pub async fn complete_appointment(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<TransitionResponse>> {
    let doctor_id = auth.require_doctor()?;
    let appointment_id = parse_appointment_id(&path.into_inner())?;
    let completed = state
        .appointments
        .complete_appointment(CompleteAppointmentRequest {
            appointment_id,
            doctor_id,
        })
        .await?;
    Ok(web::Json(TransitionResponse {
        appointment_id: completed.appointment_id.to_string(),
        changed: completed.newly_completed,
    }))
}

/// Cancel one of the calling doctor's appointments.
#[utoipa::path(
    post,
    path = "/api/doctor/appointments/{appointmentId}/cancel",
    params(("appointmentId" = String, Path, description = "Appointment identifier")),
    responses(
        (status = 200, description = "Cancelled (or already cancelled)", body = TransitionResponse),
        (status = 403, description = "Another doctor's appointment", body = Error),
        (status = 404, description = "Appointment not found", body = Error)
    ),
    tags = ["doctor"],
    operation_id = "doctorCancelAppointment",
    security(("BearerToken" = []))
)]
#[post("/doctor/appointments/{appointment_id}/cancel")]
pub async fn cancel_doctor_appointment(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<TransitionResponse>> {
    let doctor_id = auth.require_doctor()?;
    let appointment_id = parse_appointment_id(&path.into_inner())?;
    let cancelled = state
        .appointments
        .cancel_appointment(CancelAppointmentRequest {
            appointment_id,
            canceller: Canceller::Doctor(doctor_id),
        })
        .await?;
    Ok(web::Json(TransitionResponse {
        appointment_id: cancelled.appointment_id.to_string(),
        changed: cancelled.newly_cancelled,
    }))
}

/// Earnings, counts and the latest bookings for the calling doctor.
#[utoipa::path(
    get,
    path = "/api/doctor/dashboard",
    responses(
        (status = 200, description = "Dashboard", body = DoctorDashboardResponse),
        (status = 403, description = "Not a doctor token", body = Error)
    ),
    tags = ["doctor"],
    operation_id = "doctorDashboard",
    security(("BearerToken" = []))
)]
#[get("/doctor/dashboard")]
pub async fn doctor_dashboard(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<web::Json<DoctorDashboardResponse>> {
    let doctor_id = auth.require_doctor()?;
    let dashboard = state.appointment_queries.doctor_dashboard(doctor_id).await?;
    Ok(web::Json(dashboard.into()))
}

/// Flip the calling doctor's availability.
#[utoipa::path(
    post,
    path = "/api/doctor/availability",
    responses(
        (status = 200, description = "New availability", body = AvailabilityResponse),
        (status = 403, description = "Not a doctor token", body = Error),
        (status = 404, description = "Doctor not found", body = Error)
    ),
    tags = ["doctor"],
    operation_id = "toggleOwnAvailability",
    security(("BearerToken" = []))
)]
#[post("/doctor/availability")]
pub async fn toggle_own_availability(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<web::Json<AvailabilityResponse>> {
    let doctor_id = auth.require_doctor()?;
    let changed = state
        .directory
        .change_availability(ChangeAvailabilityRequest {
            doctor_id,
            requester: auth.principal(),
        })
        .await?;
    Ok(web::Json(changed.into()))
}

/// Mount the doctor routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_doctor_appointments)
        .service(complete_appointment)
        .service(cancel_doctor_appointment)
        .service(doctor_dashboard)
        .service(toggle_own_availability);
}
