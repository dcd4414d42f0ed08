//! Integration tests for the Diesel slot ledger and appointment flags
//! against embedded PostgreSQL.
//!
//! Each test gets its own database cloned from a migrated template. Steps run
//! synchronously on a runtime owned by the test context.

use std::sync::Arc;

use chrono::Utc;
use clinic_backend::domain::ports::{
    AppointmentRepository, FlagUpdate, ReleaseOutcome, ReserveOutcome, SlotLedger,
};
use clinic_backend::domain::{
    Address, Amount, Appointment, AppointmentDraft, AppointmentId, DoctorId, DoctorSnapshot,
    Slot, SlotDate, SlotKey, SlotTime, UserId, UserSnapshot,
};
use clinic_backend::outbound::persistence::{
    DbPool, DieselAppointmentRepository, DieselSlotLedger, PoolConfig,
};
use futures::future::join_all;
use pg_embedded_setup_unpriv::TemporaryDatabase;
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;

mod support;

use support::embedded_postgres::seed_doctor_and_patient;
use support::{handle_cluster_setup_failure, provision_template_database, shared_cluster};

// -----------------------------------------------------------------------------
// Test Context
// -----------------------------------------------------------------------------

struct TestContext {
    runtime: Runtime,
    ledger: Arc<DieselSlotLedger>,
    appointments: DieselAppointmentRepository,
    doctor_id: DoctorId,
    user_id: UserId,
    _database: TemporaryDatabase,
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .enable_all()
        .build()
        .map_err(|err| err.to_string())?;
    let cluster = shared_cluster()?;
    let database = provision_template_database(cluster)?;
    let database_url = database.url().to_owned();

    let doctor_id = DoctorId::random();
    let user_id = UserId::random();
    seed_doctor_and_patient(&database_url, *doctor_id.as_uuid(), *user_id.as_uuid())?;

    let config = PoolConfig::new(database_url.as_str())
        .with_max_size(8)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    Ok(TestContext {
        runtime,
        ledger: Arc::new(DieselSlotLedger::new(pool.clone())),
        appointments: DieselAppointmentRepository::new(pool),
        doctor_id,
        user_id,
        _database: database,
    })
}

#[fixture]
fn context() -> Option<TestContext> {
    match setup_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn date() -> SlotDate {
    SlotDate::new("10_5_2024").expect("valid date")
}

fn key(ctx: &TestContext, time: &str) -> SlotKey {
    SlotKey::new(
        ctx.doctor_id,
        Slot::new(date(), SlotTime::new(time).expect("valid time")),
    )
}

fn appointment(ctx: &TestContext) -> Appointment {
    let address = Address::default();
    Appointment::book(AppointmentDraft {
        id: AppointmentId::random(),
        user_id: ctx.user_id,
        doctor_id: ctx.doctor_id,
        slot: Slot::new(date(), SlotTime::new("10:00").expect("valid time")),
        user_snapshot: UserSnapshot {
            id: ctx.user_id,
            name: "Ada".to_owned(),
            email: format!("{}@clinic.test", ctx.user_id),
            phone: "0000000000".to_owned(),
            image: String::new(),
            address: address.clone(),
            gender: "Not Selected".to_owned(),
            dob: None,
        },
        doctor_snapshot: DoctorSnapshot {
            id: ctx.doctor_id,
            name: "Dr. Amaka Obi".to_owned(),
            email: format!("{}@clinic.test", ctx.doctor_id),
            image: String::new(),
            speciality: "General physician".to_owned(),
            degree: "MBBS".to_owned(),
            experience: "4 Years".to_owned(),
            about: "Primary care".to_owned(),
            fees: Amount::new(500),
            address,
        },
        amount: Amount::new(500),
        created_at: Utc::now(),
    })
    .expect("snapshots match ids")
}

fn occupied(ctx: &TestContext) -> Vec<String> {
    ctx.runtime
        .block_on(ctx.ledger.occupied_times(&ctx.doctor_id, &date()))
        .expect("occupied times")
        .iter()
        .map(|time| time.as_str().to_owned())
        .collect()
}

// -----------------------------------------------------------------------------
// Slot ledger
// -----------------------------------------------------------------------------

#[rstest]
fn concurrent_reservations_have_one_winner(context: Option<TestContext>) {
    let Some(ctx) = context else {
        eprintln!("SKIP-TEST-CLUSTER: concurrent_reservations_have_one_winner skipped");
        return;
    };
    let contested = key(&ctx, "10:00");

    let outcomes = ctx.runtime.block_on(async {
        let tasks = (0..16).map(|_| {
            let ledger = ctx.ledger.clone();
            let contested = contested.clone();
            tokio::spawn(async move { ledger.reserve(&contested, &AppointmentId::random()).await })
        });
        join_all(tasks).await
    });
    let outcomes: Vec<ReserveOutcome> = outcomes
        .into_iter()
        .map(|joined| joined.expect("task completes").expect("reserve succeeds"))
        .collect();

    let winners = outcomes
        .iter()
        .filter(|outcome| **outcome == ReserveOutcome::Reserved)
        .count();
    assert_eq!(winners, 1, "outcomes: {outcomes:?}");
    assert_eq!(occupied(&ctx), vec!["10:00".to_owned()]);
}

#[rstest]
fn release_by_another_appointment_is_not_held(context: Option<TestContext>) {
    let Some(ctx) = context else {
        eprintln!("SKIP-TEST-CLUSTER: release_by_another_appointment_is_not_held skipped");
        return;
    };
    let slot = key(&ctx, "10:00");
    let holder = AppointmentId::random();

    let (reserved, foreign_release) = ctx.runtime.block_on(async {
        let reserved = ctx.ledger.reserve(&slot, &holder).await;
        let foreign = ctx.ledger.release(&slot, &AppointmentId::random()).await;
        (reserved, foreign)
    });

    assert_eq!(reserved.expect("reserve succeeds"), ReserveOutcome::Reserved);
    assert_eq!(foreign_release.expect("release succeeds"), ReleaseOutcome::NotHeld);
    assert_eq!(occupied(&ctx), vec!["10:00".to_owned()]);
}

#[rstest]
fn released_slot_can_be_reserved_again(context: Option<TestContext>) {
    let Some(ctx) = context else {
        eprintln!("SKIP-TEST-CLUSTER: released_slot_can_be_reserved_again skipped");
        return;
    };
    let slot = key(&ctx, "10:00");
    let first = AppointmentId::random();
    let second = AppointmentId::random();

    ctx.runtime.block_on(async {
        assert_eq!(
            ctx.ledger.reserve(&slot, &first).await.expect("reserve"),
            ReserveOutcome::Reserved
        );
        assert_eq!(
            ctx.ledger.reserve(&slot, &second).await.expect("reserve"),
            ReserveOutcome::AlreadyBooked
        );
        assert_eq!(
            ctx.ledger.release(&slot, &first).await.expect("release"),
            ReleaseOutcome::Released
        );
        assert_eq!(
            ctx.ledger.release(&slot, &first).await.expect("release"),
            ReleaseOutcome::NotHeld
        );
        assert_eq!(
            ctx.ledger.reserve(&slot, &second).await.expect("reserve"),
            ReserveOutcome::Reserved
        );
        assert_eq!(
            ctx.ledger.release(&slot, &first).await.expect("release"),
            ReleaseOutcome::NotHeld,
            "a stale holder must not free the new reservation"
        );
    });
    assert_eq!(occupied(&ctx), vec!["10:00".to_owned()]);
}

#[rstest]
fn occupied_times_follow_reservation_order(context: Option<TestContext>) {
    let Some(ctx) = context else {
        eprintln!("SKIP-TEST-CLUSTER: occupied_times_follow_reservation_order skipped");
        return;
    };
    let other_day = SlotKey::new(
        ctx.doctor_id,
        Slot::new(
            SlotDate::new("11_5_2024").expect("valid date"),
            SlotTime::new("08:00").expect("valid time"),
        ),
    );

    ctx.runtime.block_on(async {
        for time in ["11:00", "09:30", "10:00"] {
            ctx.ledger
                .reserve(&key(&ctx, time), &AppointmentId::random())
                .await
                .expect("reserve succeeds");
        }
        ctx.ledger
            .reserve(&other_day, &AppointmentId::random())
            .await
            .expect("reserve succeeds");
    });

    assert_eq!(occupied(&ctx), vec!["11:00", "09:30", "10:00"]);
}

// -----------------------------------------------------------------------------
// Appointment flags
// -----------------------------------------------------------------------------

#[rstest]
fn flag_updates_report_applied_already_set_and_missing(context: Option<TestContext>) {
    let Some(ctx) = context else {
        eprintln!("SKIP-TEST-CLUSTER: flag_updates_report_applied_already_set_and_missing skipped");
        return;
    };
    let booked = appointment(&ctx);
    let id = booked.id();

    let stored = ctx.runtime.block_on(async {
        ctx.appointments.insert(&booked).await.expect("insert succeeds");
        assert_eq!(
            ctx.appointments.mark_cancelled(&id).await.expect("update"),
            FlagUpdate::Applied
        );
        assert_eq!(
            ctx.appointments.mark_cancelled(&id).await.expect("update"),
            FlagUpdate::AlreadySet
        );
        assert_eq!(
            ctx.appointments.mark_paid(&id).await.expect("update"),
            FlagUpdate::Applied
        );
        assert_eq!(
            ctx.appointments
                .mark_completed(&AppointmentId::random())
                .await
                .expect("update"),
            FlagUpdate::Missing
        );
        ctx.appointments.find_by_id(&id).await.expect("read back")
    });

    let stored = stored.expect("appointment stored");
    assert!(stored.is_cancelled());
    assert!(stored.is_paid());
    assert!(!stored.is_completed());
    assert_eq!(stored.amount(), Amount::new(500));
}
