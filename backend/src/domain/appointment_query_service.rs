//! Appointment listings and dashboards.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::booking_service::{map_appointment_error, map_doctor_error, map_user_error};
use crate::domain::ports::{
    AppointmentQuery, AppointmentRepository, DoctorRepository, UserRepository,
};
use crate::domain::{AdminDashboard, Appointment, DoctorDashboard, DoctorId, Error, UserId};

/// Read-side service implementing [`AppointmentQuery`].
#[derive(Clone)]
pub struct AppointmentQueryService<D, U, A> {
    doctors: Arc<D>,
    users: Arc<U>,
    appointments: Arc<A>,
}

impl<D, U, A> AppointmentQueryService<D, U, A> {
    /// Build the service over its read ports.
    pub fn new(doctors: Arc<D>, users: Arc<U>, appointments: Arc<A>) -> Self {
        Self {
            doctors,
            users,
            appointments,
        }
    }
}

#[async_trait]
impl<D, U, A> AppointmentQuery for AppointmentQueryService<D, U, A>
where
    D: DoctorRepository,
    U: UserRepository,
    A: AppointmentRepository,
{
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Appointment>, Error> {
        self.appointments
            .list_for_user(&user_id)
            .await
            .map_err(map_appointment_error)
    }

    async fn list_for_doctor(&self, doctor_id: DoctorId) -> Result<Vec<Appointment>, Error> {
        self.appointments
            .list_for_doctor(&doctor_id)
            .await
            .map_err(map_appointment_error)
    }

    async fn list_all(&self) -> Result<Vec<Appointment>, Error> {
        self.appointments
            .list_all()
            .await
            .map_err(map_appointment_error)
    }

    async fn doctor_dashboard(&self, doctor_id: DoctorId) -> Result<DoctorDashboard, Error> {
        let appointments = self.list_for_doctor(doctor_id).await?;
        Ok(DoctorDashboard::fold(appointments))
    }

    async fn admin_dashboard(&self) -> Result<AdminDashboard, Error> {
        let doctors = self.doctors.count().await.map_err(map_doctor_error)?;
        let patients = self.users.count().await.map_err(map_user_error)?;
        let appointments = self.list_all().await?;
        Ok(AdminDashboard::fold(doctors, patients, appointments))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;
    use crate::domain::appointment::test_support::appointment_with;
    use crate::domain::ports::{
        AppointmentRepositoryError, MockAppointmentRepository, MockDoctorRepository,
        MockUserRepository,
    };
    use crate::domain::{Amount, AppointmentFlags, ErrorCode};

    fn service(
        doctors: MockDoctorRepository,
        users: MockUserRepository,
        appointments: MockAppointmentRepository,
    ) -> AppointmentQueryService<MockDoctorRepository, MockUserRepository, MockAppointmentRepository>
    {
        AppointmentQueryService::new(Arc::new(doctors), Arc::new(users), Arc::new(appointments))
    }

    #[rstest]
    #[tokio::test]
    async fn doctor_dashboard_folds_doctor_appointments() {
        let doctor_id = DoctorId::random();
        let paid = AppointmentFlags {
            cancelled: false,
            payment: true,
            completed: false,
        };
        let list = vec![
            appointment_with(UserId::random(), doctor_id, Amount::new(500), paid),
            appointment_with(UserId::random(), doctor_id, Amount::new(300), Default::default()),
        ];
        let mut appointments = MockAppointmentRepository::new();
        appointments
            .expect_list_for_doctor()
            .withf(move |id| id == &doctor_id)
            .return_once(move |_| Ok(list));

        let dashboard = service(
            MockDoctorRepository::new(),
            MockUserRepository::new(),
            appointments,
        )
        .doctor_dashboard(doctor_id)
        .await
        .expect("dashboard");

        assert_eq!(dashboard.earnings, Amount::new(500));
        assert_eq!(dashboard.appointments, 2);
        assert_eq!(dashboard.patients, 2);
    }

    #[rstest]
    #[tokio::test]
    async fn admin_dashboard_combines_counts() {
        let mut doctors = MockDoctorRepository::new();
        doctors.expect_count().return_once(|| Ok(4));
        let mut users = MockUserRepository::new();
        users.expect_count().return_once(|| Ok(12));
        let mut appointments = MockAppointmentRepository::new();
        appointments.expect_list_all().return_once(|| Ok(Vec::new()));

        let dashboard = service(doctors, users, appointments)
            .admin_dashboard()
            .await
            .expect("dashboard");

        assert_eq!(dashboard.doctors, 4);
        assert_eq!(dashboard.patients, 12);
        assert_eq!(dashboard.appointments, 0);
    }

    #[rstest]
    #[tokio::test]
    async fn listing_maps_connection_errors() {
        let mut appointments = MockAppointmentRepository::new();
        appointments
            .expect_list_for_user()
            .return_once(|_| Err(AppointmentRepositoryError::connection("refused")));

        let error = service(
            MockDoctorRepository::new(),
            MockUserRepository::new(),
            appointments,
        )
        .list_for_user(UserId::random())
        .await
        .expect_err("store down");

        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }
}
