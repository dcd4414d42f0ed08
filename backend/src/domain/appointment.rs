//! Appointment records and their lifecycle flags.
//!
//! An appointment carries three independent facts: `cancelled`, `payment`,
//! and `completed`. They are not a state machine; every combination is
//! representable (a paid visit may be cancelled, a visit may be completed
//! unpaid) and reporting relies on that.

use std::fmt;

use chrono::{DateTime, Utc};

use super::{
    Amount, AppointmentId, DoctorId, DoctorSnapshot, Slot, SlotKey, UserId, UserSnapshot,
};

/// Validation errors raised when assembling an appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppointmentValidationError {
    /// The embedded patient snapshot belongs to someone else.
    UserSnapshotMismatch,
    /// The embedded doctor snapshot belongs to someone else.
    DoctorSnapshotMismatch,
}

impl fmt::Display for AppointmentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserSnapshotMismatch => {
                write!(f, "user snapshot does not match the appointment user id")
            }
            Self::DoctorSnapshotMismatch => {
                write!(f, "doctor snapshot does not match the appointment doctor id")
            }
        }
    }
}

impl std::error::Error for AppointmentValidationError {}

/// Input used to assemble an [`Appointment`].
#[derive(Debug, Clone)]
pub struct AppointmentDraft {
    /// Identifier.
    pub id: AppointmentId,
    /// Patient who booked.
    pub user_id: UserId,
    /// Doctor the slot belongs to.
    pub doctor_id: DoctorId,
    /// Booked date and time.
    pub slot: Slot,
    /// Patient details frozen at booking time.
    pub user_snapshot: UserSnapshot,
    /// Doctor details frozen at booking time.
    pub doctor_snapshot: DoctorSnapshot,
    /// Fee charged, copied from the doctor at booking time.
    pub amount: Amount,
    /// Booking time.
    pub created_at: DateTime<Utc>,
}

/// The three independent lifecycle flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppointmentFlags {
    /// Cancelled by patient, doctor or admin.
    pub cancelled: bool,
    /// Paid online.
    pub payment: bool,
    /// Marked done by the doctor.
    pub completed: bool,
}

/// Names one of the [`AppointmentFlags`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleFlag {
    /// The `cancelled` flag.
    Cancelled,
    /// The `payment` flag.
    Payment,
    /// The `completed` flag.
    Completed,
}

impl AppointmentFlags {
    /// Whether `flag` is set.
    pub fn is_set(&self, flag: LifecycleFlag) -> bool {
        match flag {
            LifecycleFlag::Cancelled => self.cancelled,
            LifecycleFlag::Payment => self.payment,
            LifecycleFlag::Completed => self.completed,
        }
    }

    /// Set `flag`, returning `true` when it was previously clear.
    pub fn set(&mut self, flag: LifecycleFlag) -> bool {
        let slot = match flag {
            LifecycleFlag::Cancelled => &mut self.cancelled,
            LifecycleFlag::Payment => &mut self.payment,
            LifecycleFlag::Completed => &mut self.completed,
        };
        !std::mem::replace(slot, true)
    }
}

/// Booked appointment.
///
/// ## Invariants
/// - `user_snapshot.id == user_id` and `doctor_snapshot.id == doctor_id`.
/// - `amount` and both snapshots never change after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    id: AppointmentId,
    user_id: UserId,
    doctor_id: DoctorId,
    slot: Slot,
    user_snapshot: UserSnapshot,
    doctor_snapshot: DoctorSnapshot,
    amount: Amount,
    created_at: DateTime<Utc>,
    flags: AppointmentFlags,
}

impl Appointment {
    /// Create a freshly booked appointment with every flag cleared.
    pub fn book(draft: AppointmentDraft) -> Result<Self, AppointmentValidationError> {
        Self::restore(draft, AppointmentFlags::default())
    }

    /// Rebuild an appointment read back from storage.
    pub fn restore(
        draft: AppointmentDraft,
        flags: AppointmentFlags,
    ) -> Result<Self, AppointmentValidationError> {
        if draft.user_snapshot.id != draft.user_id {
            return Err(AppointmentValidationError::UserSnapshotMismatch);
        }
        if draft.doctor_snapshot.id != draft.doctor_id {
            return Err(AppointmentValidationError::DoctorSnapshotMismatch);
        }

        let AppointmentDraft {
            id,
            user_id,
            doctor_id,
            slot,
            user_snapshot,
            doctor_snapshot,
            amount,
            created_at,
        } = draft;
        Ok(Self {
            id,
            user_id,
            doctor_id,
            slot,
            user_snapshot,
            doctor_snapshot,
            amount,
            created_at,
            flags,
        })
    }

    /// Appointment identifier.
    pub fn id(&self) -> AppointmentId {
        self.id
    }

    /// Patient who booked.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Doctor the slot belongs to.
    pub fn doctor_id(&self) -> DoctorId {
        self.doctor_id
    }

    /// Booked date and time.
    pub fn slot(&self) -> &Slot {
        &self.slot
    }

    /// Ledger key this appointment holds while it is not cancelled.
    pub fn slot_key(&self) -> SlotKey {
        SlotKey::new(self.doctor_id, self.slot.clone())
    }

    /// Patient details frozen at booking time.
    pub fn user_snapshot(&self) -> &UserSnapshot {
        &self.user_snapshot
    }

    /// Doctor details frozen at booking time.
    pub fn doctor_snapshot(&self) -> &DoctorSnapshot {
        &self.doctor_snapshot
    }

    /// Amount due, frozen at booking time.
    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Booking time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Current lifecycle flags.
    pub fn flags(&self) -> AppointmentFlags {
        self.flags
    }

    /// Set one flag in place. Storage adapters use this to mirror their
    /// conditional updates; the other flags are untouched.
    pub fn set_flag(&mut self, flag: LifecycleFlag) -> bool {
        self.flags.set(flag)
    }

    /// Whether the appointment was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.flags.cancelled
    }

    /// Whether payment was confirmed.
    pub fn is_paid(&self) -> bool {
        self.flags.payment
    }

    /// Whether the doctor marked it done.
    pub fn is_completed(&self) -> bool {
        self.flags.completed
    }

    /// Whether the appointment was booked by `user_id`.
    pub fn is_booked_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    /// Whether the appointment is with `doctor_id`.
    pub fn is_with(&self, doctor_id: &DoctorId) -> bool {
        &self.doctor_id == doctor_id
    }

    /// Earnings policy: a visit counts once it is completed or paid.
    pub fn counts_towards_earnings(&self) -> bool {
        self.flags.completed || self.flags.payment
    }
}
