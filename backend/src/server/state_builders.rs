//! Wiring of stores, gateways, and services into [`HttpState`].
//!
//! With a database URL the Diesel adapters back every store; without one a
//! single shared [`InMemoryClinicStore`] does. Either way the same services
//! sit in front, so behaviour does not depend on the backing store.

use std::io;
use std::sync::Arc;

use chrono::Utc;
use mockable::DefaultClock;
use tracing::{info, warn};
use uuid::Uuid;
use zeroize::Zeroizing;

use clinic_backend::domain::ports::{
    AppointmentRepository, DoctorRepository, PaymentGateway, SlotLedger, TokenVerifier,
    UnconfiguredPaymentGateway, UserRepository,
};
use clinic_backend::domain::{
    Address, AdminLoginService, Amount, AppointmentQueryService, BookingService, Doctor,
    DoctorDirectoryService, DoctorId, LoginCredentials, PaymentService, Principal, UserId,
    UserSnapshot,
};
use clinic_backend::inbound::http::state::HttpState;
use clinic_backend::outbound::auth::SignedTokenVerifier;
use clinic_backend::outbound::memory::InMemoryClinicStore;
use clinic_backend::outbound::payment::PaystackGateway;
use clinic_backend::outbound::persistence::{
    DbPool, DieselAppointmentRepository, DieselDoctorRepository, DieselSlotLedger,
    DieselUserRepository,
};

use super::ClinicSettings;

/// Ports shared by both store flavours.
struct SharedPorts {
    gateway: Arc<dyn PaymentGateway>,
    tokens: Arc<dyn TokenVerifier>,
    admin: Option<LoginCredentials>,
    client_base_url: String,
}

fn assemble<D, U, A, L>(
    doctors: Arc<D>,
    users: Arc<U>,
    appointments: Arc<A>,
    ledger: Arc<L>,
    shared: SharedPorts,
) -> HttpState
where
    D: DoctorRepository + 'static,
    U: UserRepository + 'static,
    A: AppointmentRepository + 'static,
    L: SlotLedger + 'static,
{
    let SharedPorts {
        gateway,
        tokens,
        admin,
        client_base_url,
    } = shared;
    HttpState {
        appointments: Arc::new(BookingService::new(
            doctors.clone(),
            users.clone(),
            appointments.clone(),
            ledger.clone(),
            Arc::new(DefaultClock),
        )),
        appointment_queries: Arc::new(AppointmentQueryService::new(
            doctors.clone(),
            users,
            appointments.clone(),
        )),
        payments: Arc::new(PaymentService::new(appointments, gateway, client_base_url)),
        directory: Arc::new(DoctorDirectoryService::new(doctors, ledger)),
        admin_login: Arc::new(AdminLoginService::new(admin, tokens.clone())),
        tokens,
    }
}

fn token_secret(settings: &ClinicSettings) -> io::Result<Zeroizing<String>> {
    if let Some(secret) = settings.token_secret() {
        return Ok(secret);
    }
    if cfg!(debug_assertions) || settings.seed_demo {
        warn!("CLINIC_TOKEN_SECRET is unset; using an ephemeral secret (dev only)");
        return Ok(Zeroizing::new(Uuid::new_v4().simple().to_string()));
    }
    Err(io::Error::other("CLINIC_TOKEN_SECRET must be set"))
}

fn payment_gateway(settings: &ClinicSettings) -> io::Result<Arc<dyn PaymentGateway>> {
    let Some(secret_key) = settings.paystack_secret_key() else {
        warn!("CLINIC_PAYSTACK_SECRET_KEY is unset; payment endpoints will answer 503");
        return Ok(Arc::new(UnconfiguredPaymentGateway));
    };
    let base_url = settings.paystack_base_url().map_err(io::Error::other)?;
    let gateway = PaystackGateway::new(base_url, secret_key, settings.gateway_timeout())
        .map_err(|err| io::Error::other(format!("payment client setup failed: {err}")))?;
    Ok(Arc::new(gateway))
}

fn shared_ports(
    settings: &ClinicSettings,
    tokens: Arc<SignedTokenVerifier>,
) -> io::Result<SharedPorts> {
    Ok(SharedPorts {
        gateway: payment_gateway(settings)?,
        tokens,
        admin: settings.admin_credentials().map_err(io::Error::other)?,
        client_base_url: settings.client_base_url().to_owned(),
    })
}

/// Build the handler state for `settings`, backed by `pool` when present.
///
/// # Errors
/// Returns [`io::Error`] when a required secret is missing or a setting is
/// malformed.
pub(crate) fn build_http_state(
    settings: &ClinicSettings,
    pool: Option<DbPool>,
) -> io::Result<HttpState> {
    let tokens = Arc::new(SignedTokenVerifier::new(token_secret(settings)?));
    let shared = shared_ports(settings, tokens.clone())?;

    match pool {
        Some(pool) => {
            if settings.seed_demo {
                warn!("demo seeding only applies to in-memory stores; skipping");
            }
            Ok(assemble(
                Arc::new(DieselDoctorRepository::new(pool.clone())),
                Arc::new(DieselUserRepository::new(pool.clone())),
                Arc::new(DieselAppointmentRepository::new(pool.clone())),
                Arc::new(DieselSlotLedger::new(pool)),
                shared,
            ))
        }
        None => {
            warn!("CLINIC_DATABASE_URL is unset; bookings live in memory only");
            let store = Arc::new(InMemoryClinicStore::new());
            if settings.seed_demo {
                seed_demo_records(&store, tokens.as_ref());
            }
            Ok(assemble(
                store.clone(),
                store.clone(),
                store.clone(),
                store,
                shared,
            ))
        }
    }
}

/// One available doctor and one patient, with tokens logged for manual testing.
fn seed_demo_records(store: &InMemoryClinicStore, tokens: &dyn TokenVerifier) {
    let doctor_id = DoctorId::random();
    let user_id = UserId::random();
    store.upsert_doctor(Doctor {
        id: doctor_id,
        name: "Dr. Amaka Obi".to_owned(),
        email: "amaka.obi@clinic.test".to_owned(),
        image: String::new(),
        speciality: "General physician".to_owned(),
        degree: "MBBS".to_owned(),
        experience: "4 Years".to_owned(),
        about: "Primary care and preventive medicine.".to_owned(),
        fees: Amount::new(500),
        address: Address {
            line1: "17 Marina Road".to_owned(),
            line2: "Lagos".to_owned(),
        },
        available: true,
        created_at: Utc::now(),
    });
    store.upsert_user(UserSnapshot {
        id: user_id,
        name: "Tunde Bello".to_owned(),
        email: "tunde.bello@clinic.test".to_owned(),
        phone: "0000000000".to_owned(),
        image: String::new(),
        address: Address::default(),
        gender: "Not Selected".to_owned(),
        dob: None,
    });
    info!(
        %doctor_id,
        %user_id,
        doctor_token = %tokens.issue(&Principal::Doctor(doctor_id)),
        user_token = %tokens.issue(&Principal::User(user_id)),
        "demo records seeded"
    );
}
