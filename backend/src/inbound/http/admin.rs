//! Administrator handlers.
//!
//! ```text
//! POST /api/admin/login {"email":"admin@clinic.test","password":"…"}
//! GET  /api/admin/doctors
//! GET  /api/admin/appointments
//! POST /api/admin/appointments/{appointmentId}/cancel
//! POST /api/admin/doctors/{doctorId}/availability
//! GET  /api/admin/dashboard
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::{CancelAppointmentRequest, Canceller, ChangeAvailabilityRequest};
use crate::domain::{Error, LoginCredentials, LoginValidationError, Principal};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::doctor_portal::AvailabilityResponse;
use crate::inbound::http::dto::{
    AdminDashboardResponse, AppointmentResponse, DoctorSummaryResponse, TransitionResponse,
    appointment_list,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{DOCTOR_ID, parse_appointment_id, parse_doctor_id};

/// Admin login body.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminLoginRequest {
    /// Contact email.
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

impl TryFrom<AdminLoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: AdminLoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Bearer token issued on successful login.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// Bearer token for the admin routes.
    pub token: String,
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyEmail => Error::invalid_request("email must not be empty")
            .with_details(json!({ "field": "email", "code": "empty_email" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

/// Exchange the configured admin credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Login success", body = TokenResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminLogin",
    security([])
)]
#[post("/admin/login")]
pub async fn admin_login(
    state: web::Data<HttpState>,
    payload: web::Json<AdminLoginRequest>,
) -> ApiResult<web::Json<TokenResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let token = state.admin_login.login(&credentials).await?;
    Ok(web::Json(TokenResponse { token }))
}

/// Every doctor, for the admin panel.
#[utoipa::path(
    get,
    path = "/api/admin/doctors",
    responses(
        (status = 200, description = "Doctors", body = [DoctorSummaryResponse]),
        (status = 403, description = "Not an admin token", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminListDoctors",
    security(("BearerToken" = []))
)]
#[get("/admin/doctors")]
pub async fn admin_list_doctors(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<web::Json<Vec<DoctorSummaryResponse>>> {
    auth.require_admin()?;
    let doctors = state.directory.list_doctors().await?;
    Ok(web::Json(
        doctors.into_iter().map(DoctorSummaryResponse::from).collect(),
    ))
}

/// Every appointment, oldest first.
#[utoipa::path(
    get,
    path = "/api/admin/appointments",
    responses(
        (status = 200, description = "Appointments", body = [AppointmentResponse]),
        (status = 403, description = "Not an admin token", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminListAppointments",
    security(("BearerToken" = []))
)]
#[get("/admin/appointments")]
pub async fn admin_list_appointments(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<web::Json<Vec<AppointmentResponse>>> {
    auth.require_admin()?;
    let appointments = state.appointment_queries.list_all().await?;
    Ok(web::Json(appointment_list(appointments)))
}

/// Cancel any appointment.
#[utoipa::path(
    post,
    path = "/api/admin/appointments/{appointmentId}/cancel",
    params(("appointmentId" = String, Path, description = "Appointment identifier")),
    responses(
        (status = 200, description = "Cancelled (or already cancelled)", body = TransitionResponse),
        (status = 403, description = "Not an admin token", body = Error),
        (status = 404, description = "Appointment not found", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminCancelAppointment",
    security(("BearerToken" = []))
)]
#[post("/admin/appointments/{appointment_id}/cancel")]
pub async fn admin_cancel_appointment(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<TransitionResponse>> {
    auth.require_admin()?;
    let appointment_id = parse_appointment_id(&path.into_inner())?;
    let cancelled = state
        .appointments
        .cancel_appointment(CancelAppointmentRequest {
            appointment_id,
            canceller: Canceller::Admin,
        })
        .await?;
    Ok(web::Json(TransitionResponse {
        appointment_id: cancelled.appointment_id.to_string(),
        changed: cancelled.newly_cancelled,
    }))
}

/// Flip any doctor's availability.
#[utoipa::path(
    post,
    path = "/api/admin/doctors/{doctorId}/availability",
    params(("doctorId" = String, Path, description = "Doctor identifier")),
    responses(
        (status = 200, description = "New availability", body = AvailabilityResponse),
        (status = 403, description = "Not an admin token", body = Error),
        (status = 404, description = "Doctor not found", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminToggleAvailability",
    security(("BearerToken" = []))
)]
#[post("/admin/doctors/{doctor_id}/availability")]
pub async fn admin_toggle_availability(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<AvailabilityResponse>> {
    auth.require_admin()?;
    let doctor_id = parse_doctor_id(&path.into_inner(), DOCTOR_ID)?;
    let changed = state
        .directory
        .change_availability(ChangeAvailabilityRequest {
            doctor_id,
            requester: Principal::Admin,
        })
        .await?;
    Ok(web::Json(changed.into()))
}

/// Clinic-wide counts and the latest bookings.
#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    responses(
        (status = 200, description = "Dashboard", body = AdminDashboardResponse),
        (status = 403, description = "Not an admin token", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminDashboard",
    security(("BearerToken" = []))
)]
#[get("/admin/dashboard")]
pub async fn admin_dashboard(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<web::Json<AdminDashboardResponse>> {
    auth.require_admin()?;
    let dashboard = state.appointment_queries.admin_dashboard().await?;
    Ok(web::Json(dashboard.into()))
}

/// Mount the admin routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(admin_login)
        .service(admin_list_doctors)
        .service(admin_list_appointments)
        .service(admin_cancel_appointment)
        .service(admin_toggle_availability)
        .service(admin_dashboard);
}
