//! In-process adapters used when no database is configured, and by the
//! behaviour tests.

mod store;

pub use store::InMemoryClinicStore;
