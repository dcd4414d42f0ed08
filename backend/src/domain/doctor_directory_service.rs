//! Public doctor directory and availability switches.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::booking_service::{map_doctor_error, map_ledger_error};
use crate::domain::ports::{
    ChangeAvailabilityRequest, ChangeAvailabilityResponse, DoctorDirectory, DoctorRepository,
    SlotLedger,
};
use crate::domain::{DoctorId, DoctorListing, Error, Principal, SlotDate, SlotTime};

/// Directory service implementing [`DoctorDirectory`].
#[derive(Clone)]
pub struct DoctorDirectoryService<D, L> {
    doctors: Arc<D>,
    ledger: Arc<L>,
}

impl<D, L> DoctorDirectoryService<D, L> {
    /// Build the service over the doctor store and slot ledger.
    pub fn new(doctors: Arc<D>, ledger: Arc<L>) -> Self {
        Self { doctors, ledger }
    }
}

#[async_trait]
impl<D, L> DoctorDirectory for DoctorDirectoryService<D, L>
where
    D: DoctorRepository,
    L: SlotLedger,
{
    async fn list_doctors(&self) -> Result<Vec<DoctorListing>, Error> {
        let doctors = self.doctors.list().await.map_err(map_doctor_error)?;
        Ok(doctors.iter().map(|doctor| doctor.listing()).collect())
    }

    async fn booked_slots(
        &self,
        doctor_id: DoctorId,
        date: SlotDate,
    ) -> Result<Vec<SlotTime>, Error> {
        self.doctors
            .find_by_id(&doctor_id)
            .await
            .map_err(map_doctor_error)?
            .ok_or_else(|| Error::not_found(format!("doctor {doctor_id} not found")))?;
        self.ledger
            .occupied_times(&doctor_id, &date)
            .await
            .map_err(map_ledger_error)
    }

    async fn change_availability(
        &self,
        request: ChangeAvailabilityRequest,
    ) -> Result<ChangeAvailabilityResponse, Error> {
        let ChangeAvailabilityRequest {
            doctor_id,
            requester,
        } = request;
        let allowed = match requester {
            Principal::Doctor(id) => id == doctor_id,
            Principal::Admin => true,
            Principal::User(_) => false,
        };
        if !allowed {
            return Err(Error::forbidden(
                "only the doctor or an admin may change availability",
            ));
        }

        let available = self
            .doctors
            .toggle_availability(&doctor_id)
            .await
            .map_err(map_doctor_error)?
            .ok_or_else(|| Error::not_found(format!("doctor {doctor_id} not found")))?;

        info!(doctor_id = %doctor_id, available, role = requester.role(), "availability changed");
        Ok(ChangeAvailabilityResponse {
            doctor_id,
            available,
        })
    }
}
