//! Fee amounts in whole currency units.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Minor units per whole currency unit (kobo per naira, cents per dollar).
pub const MINOR_UNITS_PER_UNIT: u64 = 100;

/// Non-negative fee in whole currency units.
///
/// Appointments copy the doctor's fee into an `Amount` at booking time; the
/// copy is never updated afterwards.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    /// Zero fee.
    pub const ZERO: Self = Self(0);

    /// Wrap a whole-unit value.
    pub const fn new(units: u64) -> Self {
        Self(units)
    }

    /// Whole-unit value.
    pub const fn units(self) -> u64 {
        self.0
    }

    /// Value in minor units as payment gateways expect, or `None` on overflow.
    pub fn to_minor_units(self) -> Option<u64> {
        self.0.checked_mul(MINOR_UNITS_PER_UNIT)
    }

    /// Saturating sum used by reporting folds.
    #[must_use]
    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
