//! Response payloads shared by the patient, doctor, and admin handlers.
//!
//! Domain entities stay free of `utoipa`; these wrappers carry the schema
//! annotations and the wire naming (camelCase).

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{
    Address, AdminDashboard, Appointment, DoctorDashboard, DoctorListing, DoctorSnapshot,
    UserSnapshot,
};

/// One appointment as returned to any role.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentResponse {
    /// Appointment identifier.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    /// Patient who booked.
    pub user_id: String,
    /// Doctor the slot belongs to.
    pub doctor_id: String,
    /// Slot date as `D_M_YYYY`.
    #[schema(example = "10_5_2024")]
    pub slot_date: String,
    /// Slot time as `HH:MM`.
    #[schema(example = "10:00")]
    pub slot_time: String,
    /// Patient details frozen at booking time.
    #[schema(value_type = Object)]
    pub user_data: UserSnapshot,
    /// Doctor details frozen at booking time.
    #[schema(value_type = Object)]
    pub doc_data: DoctorSnapshot,
    /// Fee in whole currency units, frozen at booking time.
    #[schema(example = 500)]
    pub amount: u64,
    /// Booking time, RFC 3339.
    pub booked_at: String,
    /// Cancelled by patient, doctor or admin.
    pub cancelled: bool,
    /// Paid online.
    pub payment: bool,
    /// Marked done by the doctor.
    pub completed: bool,
}

impl From<Appointment> for AppointmentResponse {
    fn from(value: Appointment) -> Self {
        let flags = value.flags();
        Self {
            id: value.id().to_string(),
            user_id: value.user_id().to_string(),
            doctor_id: value.doctor_id().to_string(),
            slot_date: value.slot().date.as_str().to_owned(),
            slot_time: value.slot().time.as_str().to_owned(),
            user_data: value.user_snapshot().clone(),
            doc_data: value.doctor_snapshot().clone(),
            amount: value.amount().units(),
            booked_at: value.created_at().to_rfc3339(),
            cancelled: flags.cancelled,
            payment: flags.payment,
            completed: flags.completed,
        }
    }
}

pub(crate) fn appointment_list(appointments: Vec<Appointment>) -> Vec<AppointmentResponse> {
    appointments.into_iter().map(AppointmentResponse::from).collect()
}

/// Public doctor card. Never includes the email address.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorSummaryResponse {
    /// Doctor identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Profile image URL.
    pub image: String,
    /// Medical speciality.
    pub speciality: String,
    /// Qualification.
    pub degree: String,
    /// Free-text experience, e.g. `4 Years`.
    pub experience: String,
    /// Short biography.
    pub about: String,
    /// Consultation fee in major units.
    #[schema(example = 500)]
    pub fees: u64,
    /// Postal address.
    #[schema(value_type = Object)]
    pub address: Address,
    /// Whether the doctor accepts new bookings.
    pub available: bool,
}

impl From<DoctorListing> for DoctorSummaryResponse {
    fn from(value: DoctorListing) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            image: value.image,
            speciality: value.speciality,
            degree: value.degree,
            experience: value.experience,
            about: value.about,
            fees: value.fees.units(),
            address: value.address,
            available: value.available,
        }
    }
}

/// Doctor-facing dashboard.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorDashboardResponse {
    /// Sum of amounts over completed or paid appointments.
    pub earnings: u64,
    /// Number of appointments.
    pub appointments: usize,
    /// Distinct patients, cancelled bookings included.
    pub patients: usize,
    /// Most recent appointments, newest first.
    pub latest_appointments: Vec<AppointmentResponse>,
}

impl From<DoctorDashboard> for DoctorDashboardResponse {
    fn from(value: DoctorDashboard) -> Self {
        Self {
            earnings: value.earnings.units(),
            appointments: value.appointments,
            patients: value.patients,
            latest_appointments: appointment_list(value.latest_appointments),
        }
    }
}

/// Admin-facing dashboard.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboardResponse {
    /// Number of registered doctors.
    pub doctors: u64,
    /// Number of appointments.
    pub appointments: usize,
    /// Number of distinct patients.
    pub patients: u64,
    /// Most recent appointments, newest first.
    pub latest_appointments: Vec<AppointmentResponse>,
}

impl From<AdminDashboard> for AdminDashboardResponse {
    fn from(value: AdminDashboard) -> Self {
        Self {
            doctors: value.doctors,
            appointments: value.appointments,
            patients: value.patients,
            latest_appointments: appointment_list(value.latest_appointments),
        }
    }
}

/// Acknowledgement returned by cancel and complete.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransitionResponse {
    /// Appointment that was transitioned.
    pub appointment_id: String,
    /// `false` when the flag was already set before this call.
    pub changed: bool,
}
