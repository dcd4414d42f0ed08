//! Public doctor directory handlers.
//!
//! ```text
//! GET /api/doctors
//! GET /api/doctors/{doctorId}/slots?date=10_5_2024
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::DoctorSummaryResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    DOCTOR_ID, SLOT_DATE, missing_field_error, parse_doctor_id, parse_slot_date,
};

/// Query string for the occupied-slots lookup.
#[derive(Debug, Deserialize, IntoParams)]
pub struct SlotsQuery {
    /// Day to inspect, as `D_M_YYYY`.
    pub date: Option<String>,
}

/// Times already taken on one day.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookedSlotsResponse {
    /// Doctor queried.
    pub doctor_id: String,
    /// Date queried, as `D_M_YYYY`.
    pub slot_date: String,
    /// Occupied times in booking order.
    #[schema(example = json!(["10:00", "10:30"]))]
    pub slot_times: Vec<String>,
}

/// List every doctor with the public profile fields.
#[utoipa::path(
    get,
    path = "/api/doctors",
    responses(
        (status = 200, description = "Doctors", body = [DoctorSummaryResponse]),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["doctors"],
    operation_id = "listDoctors",
    security([])
)]
#[get("/doctors")]
pub async fn list_doctors(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<DoctorSummaryResponse>>> {
    let doctors = state.directory.list_doctors().await?;
    Ok(web::Json(
        doctors.into_iter().map(DoctorSummaryResponse::from).collect(),
    ))
}

/// Occupied slot times for a doctor on one day.
#[utoipa::path(
    get,
    path = "/api/doctors/{doctorId}/slots",
    params(
        ("doctorId" = String, Path, description = "Doctor identifier"),
        SlotsQuery
    ),
    responses(
        (status = 200, description = "Booked times", body = BookedSlotsResponse),
        (status = 400, description = "Invalid identifier or date", body = Error),
        (status = 404, description = "Doctor not found", body = Error)
    ),
    tags = ["doctors"],
    operation_id = "bookedSlots",
    security([])
)]
#[get("/doctors/{doctor_id}/slots")]
pub async fn booked_slots(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<SlotsQuery>,
) -> ApiResult<web::Json<BookedSlotsResponse>> {
    let doctor_id = parse_doctor_id(&path.into_inner(), DOCTOR_ID)?;
    let raw_date = query
        .into_inner()
        .date
        .ok_or_else(|| missing_field_error(SLOT_DATE))?;
    let date = parse_slot_date(&raw_date)?;
    let times = state.directory.booked_slots(doctor_id, date.clone()).await?;
    Ok(web::Json(BookedSlotsResponse {
        doctor_id: doctor_id.to_string(),
        slot_date: date.as_str().to_owned(),
        slot_times: times.iter().map(|time| time.as_str().to_owned()).collect(),
    }))
}

/// Mount the public directory routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_doctors).service(booked_slots);
}
