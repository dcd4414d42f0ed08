//! Dashboard aggregates folded from appointment lists.

use std::collections::HashSet;

use super::{Amount, Appointment};

/// How many recent appointments a dashboard shows.
pub const LATEST_APPOINTMENTS: usize = 5;

/// Doctor-facing dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorDashboard {
    /// Sum of amounts over completed or paid appointments.
    pub earnings: Amount,
    /// Number of appointments.
    pub appointments: usize,
    /// Distinct patients, cancelled bookings included.
    pub patients: usize,
    /// Most recent appointments, newest first.
    pub latest_appointments: Vec<Appointment>,
}

impl DoctorDashboard {
    /// Fold a doctor's appointments, given in insertion order.
    ///
    /// Cancelled appointments still count towards `appointments` and
    /// `patients`; earnings follow [`Appointment::counts_towards_earnings`].
    pub fn fold(appointments: Vec<Appointment>) -> Self {
        let earnings = appointments
            .iter()
            .filter(|appointment| appointment.counts_towards_earnings())
            .fold(Amount::ZERO, |total, appointment| {
                total.saturating_add(appointment.amount())
            });
        let patients = appointments
            .iter()
            .map(Appointment::user_id)
            .collect::<HashSet<_>>()
            .len();
        let count = appointments.len();

        Self {
            earnings,
            appointments: count,
            patients,
            latest_appointments: latest(appointments),
        }
    }
}

/// Administrator dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminDashboard {
    /// Number of registered doctors.
    pub doctors: u64,
    /// Number of appointments.
    pub appointments: usize,
    /// Number of distinct patients.
    pub patients: u64,
    /// Most recent appointments, newest first.
    pub latest_appointments: Vec<Appointment>,
}

impl AdminDashboard {
    /// `patients` counts registered users, not distinct bookers.
    pub fn fold(doctors: u64, patients: u64, appointments: Vec<Appointment>) -> Self {
        Self {
            doctors,
            appointments: appointments.len(),
            patients,
            latest_appointments: latest(appointments),
        }
    }
}

fn latest(appointments: Vec<Appointment>) -> Vec<Appointment> {
    appointments
        .into_iter()
        .rev()
        .take(LATEST_APPOINTMENTS)
        .collect()
}
