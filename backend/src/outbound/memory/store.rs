//! Mutex-guarded in-memory implementation of every persistence port.
//!
//! Each port call takes the lock once and finishes its read-check-write
//! before releasing it, which gives the same atomicity the PostgreSQL
//! adapters get from conditional statements.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{
    AppointmentRepository, AppointmentRepositoryError, DoctorRepository, DoctorRepositoryError,
    FlagUpdate, ReleaseOutcome, ReserveOutcome, SlotLedger, SlotLedgerError, UserRepository,
    UserRepositoryError,
};
use crate::domain::{
    Appointment, AppointmentId, Doctor, DoctorId, LifecycleFlag, SlotDate, SlotKey, SlotTime,
    UserId, UserSnapshot,
};

#[derive(Debug, Clone, Copy)]
struct Reservation {
    holder: AppointmentId,
    seq: u64,
}

#[derive(Debug, Default)]
struct State {
    doctors: Vec<Doctor>,
    users: Vec<UserSnapshot>,
    appointments: Vec<Appointment>,
    reservations: HashMap<SlotKey, Reservation>,
    next_seq: u64,
}

/// Shared in-memory store; wrap in `Arc` and hand the same instance to every
/// service so they observe one consistent state.
#[derive(Debug, Default)]
pub struct InMemoryClinicStore {
    state: Mutex<State>,
}

impl InMemoryClinicStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // Every mutation completes under a single guard, so a poisoned lock still
    // protects consistent data.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add or replace a doctor record.
    pub fn upsert_doctor(&self, doctor: Doctor) {
        let mut state = self.lock();
        match state.doctors.iter_mut().find(|existing| existing.id == doctor.id) {
            Some(existing) => *existing = doctor,
            None => state.doctors.push(doctor),
        }
    }

    /// Add or replace a patient record.
    pub fn upsert_user(&self, user: UserSnapshot) {
        let mut state = self.lock();
        match state.users.iter_mut().find(|existing| existing.id == user.id) {
            Some(existing) => *existing = user,
            None => state.users.push(user),
        }
    }

    fn set_flag(&self, appointment_id: &AppointmentId, flag: LifecycleFlag) -> FlagUpdate {
        let mut state = self.lock();
        match state
            .appointments
            .iter_mut()
            .find(|appointment| &appointment.id() == appointment_id)
        {
            Some(appointment) => {
                if appointment.set_flag(flag) {
                    FlagUpdate::Applied
                } else {
                    FlagUpdate::AlreadySet
                }
            }
            None => FlagUpdate::Missing,
        }
    }

    fn appointments_where(&self, keep: impl Fn(&Appointment) -> bool) -> Vec<Appointment> {
        self.lock()
            .appointments
            .iter()
            .filter(|appointment| keep(appointment))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl DoctorRepository for InMemoryClinicStore {
    async fn find_by_id(
        &self,
        doctor_id: &DoctorId,
    ) -> Result<Option<Doctor>, DoctorRepositoryError> {
        Ok(self
            .lock()
            .doctors
            .iter()
            .find(|doctor| &doctor.id == doctor_id)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Doctor>, DoctorRepositoryError> {
        Ok(self.lock().doctors.clone())
    }

    async fn toggle_availability(
        &self,
        doctor_id: &DoctorId,
    ) -> Result<Option<bool>, DoctorRepositoryError> {
        let mut state = self.lock();
        Ok(state
            .doctors
            .iter_mut()
            .find(|doctor| &doctor.id == doctor_id)
            .map(|doctor| {
                doctor.available = !doctor.available;
                doctor.available
            }))
    }

    async fn count(&self) -> Result<u64, DoctorRepositoryError> {
        Ok(self.lock().doctors.len() as u64)
    }
}

#[async_trait]
impl UserRepository for InMemoryClinicStore {
    async fn find_snapshot(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserSnapshot>, UserRepositoryError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|user| &user.id == user_id)
            .cloned())
    }

    async fn count(&self) -> Result<u64, UserRepositoryError> {
        Ok(self.lock().users.len() as u64)
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryClinicStore {
    async fn insert(&self, appointment: &Appointment) -> Result<(), AppointmentRepositoryError> {
        let mut state = self.lock();
        if state
            .appointments
            .iter()
            .any(|existing| existing.id() == appointment.id())
        {
            return Err(AppointmentRepositoryError::query(format!(
                "appointment {} already exists",
                appointment.id()
            )));
        }
        state.appointments.push(appointment.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        appointment_id: &AppointmentId,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError> {
        Ok(self
            .lock()
            .appointments
            .iter()
            .find(|appointment| &appointment.id() == appointment_id)
            .cloned())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Appointment>, AppointmentRepositoryError> {
        Ok(self.appointments_where(|appointment| appointment.is_booked_by(user_id)))
    }

    async fn list_for_doctor(
        &self,
        doctor_id: &DoctorId,
    ) -> Result<Vec<Appointment>, AppointmentRepositoryError> {
        Ok(self.appointments_where(|appointment| appointment.is_with(doctor_id)))
    }

    async fn list_all(&self) -> Result<Vec<Appointment>, AppointmentRepositoryError> {
        Ok(self.lock().appointments.clone())
    }

    async fn mark_cancelled(
        &self,
        appointment_id: &AppointmentId,
    ) -> Result<FlagUpdate, AppointmentRepositoryError> {
        Ok(self.set_flag(appointment_id, LifecycleFlag::Cancelled))
    }

    async fn mark_paid(
        &self,
        appointment_id: &AppointmentId,
    ) -> Result<FlagUpdate, AppointmentRepositoryError> {
        Ok(self.set_flag(appointment_id, LifecycleFlag::Payment))
    }

    async fn mark_completed(
        &self,
        appointment_id: &AppointmentId,
    ) -> Result<FlagUpdate, AppointmentRepositoryError> {
        Ok(self.set_flag(appointment_id, LifecycleFlag::Completed))
    }
}

#[async_trait]
impl SlotLedger for InMemoryClinicStore {
    async fn reserve(
        &self,
        key: &SlotKey,
        holder: &AppointmentId,
    ) -> Result<ReserveOutcome, SlotLedgerError> {
        let mut state = self.lock();
        if state.reservations.contains_key(key) {
            return Ok(ReserveOutcome::AlreadyBooked);
        }
        let seq = state.next_seq;
        state.next_seq += 1;
        state.reservations.insert(
            key.clone(),
            Reservation {
                holder: *holder,
                seq,
            },
        );
        Ok(ReserveOutcome::Reserved)
    }

    async fn release(
        &self,
        key: &SlotKey,
        holder: &AppointmentId,
    ) -> Result<ReleaseOutcome, SlotLedgerError> {
        let mut state = self.lock();
        match state.reservations.get(key) {
            Some(reservation) if &reservation.holder == holder => {
                state.reservations.remove(key);
                Ok(ReleaseOutcome::Released)
            }
            _ => Ok(ReleaseOutcome::NotHeld),
        }
    }

    async fn occupied_times(
        &self,
        doctor_id: &DoctorId,
        date: &SlotDate,
    ) -> Result<Vec<SlotTime>, SlotLedgerError> {
        let state = self.lock();
        let mut taken: Vec<(u64, SlotTime)> = state
            .reservations
            .iter()
            .filter(|(key, _)| &key.doctor_id == doctor_id && &key.slot.date == date)
            .map(|(key, reservation)| (reservation.seq, key.slot.time.clone()))
            .collect();
        taken.sort_by_key(|(seq, _)| *seq);
        Ok(taken.into_iter().map(|(_, time)| time).collect())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use std::sync::Arc;

    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::appointment::test_support::{appointment_with, doctor, slot};
    use crate::domain::{Amount, AppointmentFlags};

    #[fixture]
    fn store() -> InMemoryClinicStore {
        InMemoryClinicStore::new()
    }

    fn key(doctor_id: DoctorId, time: &str) -> SlotKey {
        SlotKey::new(doctor_id, slot("10_5_2024", time))
    }

    #[rstest]
    #[tokio::test]
    async fn reserve_is_exclusive_until_the_holder_releases(store: InMemoryClinicStore) {
        let doctor_id = DoctorId::random();
        let first = AppointmentId::random();
        let second = AppointmentId::random();
        let key = key(doctor_id, "10:00");

        assert_eq!(store.reserve(&key, &first).await, Ok(ReserveOutcome::Reserved));
        assert_eq!(
            store.reserve(&key, &second).await,
            Ok(ReserveOutcome::AlreadyBooked)
        );
        assert_eq!(
            store.release(&key, &second).await,
            Ok(ReleaseOutcome::NotHeld)
        );
        assert_eq!(store.release(&key, &first).await, Ok(ReleaseOutcome::Released));
        assert_eq!(store.reserve(&key, &second).await, Ok(ReserveOutcome::Reserved));
    }

    #[rstest]
    #[tokio::test]
    async fn occupied_times_follow_reservation_order(store: InMemoryClinicStore) {
        let doctor_id = DoctorId::random();
        for time in ["11:30", "09:00", "10:00"] {
            store
                .reserve(&key(doctor_id, time), &AppointmentId::random())
                .await
                .expect("reserve");
        }
        store
            .reserve(&key(DoctorId::random(), "08:00"), &AppointmentId::random())
            .await
            .expect("reserve other doctor");

        let times = store
            .occupied_times(&doctor_id, &SlotDate::new("10_5_2024").expect("date"))
            .await
            .expect("times");

        let labels: Vec<_> = times.iter().map(SlotTime::as_str).collect();
        assert_eq!(labels, ["11:30", "09:00", "10:00"]);
    }

    #[rstest]
    #[tokio::test]
    async fn concurrent_reservations_admit_exactly_one(store: InMemoryClinicStore) {
        let store = Arc::new(store);
        let key = key(DoctorId::random(), "10:00");
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                let key = key.clone();
                tokio::spawn(async move { store.reserve(&key, &AppointmentId::random()).await })
            })
            .collect();

        let mut reserved = 0;
        for handle in handles {
            if handle.await.expect("join") == Ok(ReserveOutcome::Reserved) {
                reserved += 1;
            }
        }
        assert_eq!(reserved, 1);
    }

    #[rstest]
    #[tokio::test]
    async fn flags_transition_once(store: InMemoryClinicStore) {
        let appointment = appointment_with(
            UserId::random(),
            DoctorId::random(),
            Amount::new(10),
            AppointmentFlags::default(),
        );
        let id = appointment.id();
        store.insert(&appointment).await.expect("insert");

        assert_eq!(store.mark_paid(&id).await, Ok(FlagUpdate::Applied));
        assert_eq!(store.mark_paid(&id).await, Ok(FlagUpdate::AlreadySet));
        assert_eq!(
            store.mark_cancelled(&AppointmentId::random()).await,
            Ok(FlagUpdate::Missing)
        );
        let stored = AppointmentRepository::find_by_id(&store, &id)
            .await
            .expect("find")
            .expect("present");
        assert!(stored.is_paid());
        assert!(!stored.is_cancelled());
    }

    #[rstest]
    #[tokio::test]
    async fn toggling_flips_availability(store: InMemoryClinicStore) {
        let doctor_id = DoctorId::random();
        store.upsert_doctor(doctor(doctor_id, Amount::new(10), true));

        assert_eq!(store.toggle_availability(&doctor_id).await, Ok(Some(false)));
        assert_eq!(store.toggle_availability(&doctor_id).await, Ok(Some(true)));
        assert_eq!(
            store.toggle_availability(&DoctorId::random()).await,
            Ok(None)
        );
    }
}
