//! Tests for the patient appointment handlers.

use actix_web::http::StatusCode;
use actix_web::test;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::appointment::test_support::appointment_with;
use crate::domain::ports::{
    BookAppointmentResponse, CancelAppointmentResponse, ConfirmPaymentResponse,
    InitiatePaymentResponse,
};
use crate::domain::{
    Amount, AppointmentFlags, AppointmentId, DoctorId, Principal, UserId,
};
use crate::inbound::http::test_utils::{StateBuilder, api_app, bearer};

async fn send(state: HttpState, request: test::TestRequest) -> (StatusCode, Value) {
    let app = test::init_service(api_app(state, configure)).await;
    let response = test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body = test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, value)
}

#[actix_web::test]
async fn booking_returns_the_created_appointment() {
    let user_id = UserId::random();
    let doctor_id = DoctorId::random();
    let mut builder = StateBuilder::default();
    builder
        .appointments
        .expect_book_appointment()
        .withf(move |request| {
            request.user_id == user_id
                && request.doctor_id == doctor_id
                && request.slot.date.as_str() == "10_5_2024"
                && request.slot.time.as_str() == "10:00"
        })
        .return_once(move |_| {
            Ok(BookAppointmentResponse {
                appointment: appointment_with(
                    user_id,
                    doctor_id,
                    Amount::new(500),
                    AppointmentFlags::default(),
                ),
            })
        });

    let request = test::TestRequest::post()
        .uri("/api/user/appointments")
        .insert_header(bearer(&Principal::User(user_id)))
        .set_json(json!({
            "doctorId": doctor_id.to_string(),
            "slotDate": "10_5_2024",
            "slotTime": "10:00",
        }));
    let (status, body) = send(builder.build(), request).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["amount"], json!(500));
    assert_eq!(body["slotDate"], json!("10_5_2024"));
    assert_eq!(body["cancelled"], json!(false));
    assert_eq!(body["docData"]["fees"], json!(500));
}

#[rstest]
#[case(json!({"slotDate": "10_5_2024", "slotTime": "10:00"}), "doctorId")]
#[case(json!({"doctorId": "nope", "slotDate": "10_5_2024", "slotTime": "10:00"}), "doctorId")]
#[case(json!({"doctorId": "6f1c1f0e-3b55-4d0c-9d1e-0d5b8d7f2a11", "slotTime": "10:00"}), "slotDate")]
#[actix_web::test]
async fn booking_rejects_bad_payloads_before_calling_the_service(
    #[case] payload: Value,
    #[case] field: &str,
) {
    let request = test::TestRequest::post()
        .uri("/api/user/appointments")
        .insert_header(bearer(&Principal::User(UserId::random())))
        .set_json(payload);
    let (status, body) = send(StateBuilder::default().build(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], json!(field));
}

#[actix_web::test]
async fn doctors_cannot_book_as_patients() {
    let request = test::TestRequest::post()
        .uri("/api/user/appointments")
        .insert_header(bearer(&Principal::Doctor(DoctorId::random())))
        .set_json(json!({
            "doctorId": DoctorId::random().to_string(),
            "slotDate": "10_5_2024",
            "slotTime": "10:00",
        }));
    let (status, _) = send(StateBuilder::default().build(), request).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn slot_conflicts_surface_as_409_with_a_reason_code() {
    let mut builder = StateBuilder::default();
    builder.appointments.expect_book_appointment().return_once(|_| {
        Err(Error::conflict("slot already booked")
            .with_details(json!({"code": "slot_already_booked"})))
    });

    let request = test::TestRequest::post()
        .uri("/api/user/appointments")
        .insert_header(bearer(&Principal::User(UserId::random())))
        .set_json(json!({
            "doctorId": DoctorId::random().to_string(),
            "slotDate": "10_5_2024",
            "slotTime": "10:00",
        }));
    let (status, body) = send(builder.build(), request).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["details"]["code"], json!("slot_already_booked"));
}

#[actix_web::test]
async fn cancel_passes_the_patient_as_canceller() {
    let user_id = UserId::random();
    let appointment_id = AppointmentId::random();
    let mut builder = StateBuilder::default();
    builder
        .appointments
        .expect_cancel_appointment()
        .withf(move |request| {
            request.appointment_id == appointment_id
                && request.canceller == Canceller::Patient(user_id)
        })
        .return_once(move |_| {
            Ok(CancelAppointmentResponse {
                appointment_id,
                newly_cancelled: false,
            })
        });

    let request = test::TestRequest::post()
        .uri(&format!("/api/user/appointments/{appointment_id}/cancel"))
        .insert_header(bearer(&Principal::User(user_id)));
    let (status, body) = send(builder.build(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["changed"], json!(false));
}

#[actix_web::test]
async fn initiate_payment_returns_the_authorisation_link() {
    let user_id = UserId::random();
    let appointment_id = AppointmentId::random();
    let mut builder = StateBuilder::default();
    builder
        .payments
        .expect_initiate_payment()
        .withf(move |request| request.appointment_id == appointment_id && request.user_id == user_id)
        .return_once(|_| {
            Ok(InitiatePaymentResponse {
                authorization_url: "https://checkout.example/abc".to_owned(),
                reference: "ref-abc".to_owned(),
            })
        });

    let request = test::TestRequest::post()
        .uri(&format!("/api/user/appointments/{appointment_id}/payment"))
        .insert_header(bearer(&Principal::User(user_id)));
    let (status, body) = send(builder.build(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authorizationUrl"], json!("https://checkout.example/abc"));
    assert_eq!(body["reference"], json!("ref-abc"));
}

#[rstest]
#[case(PaymentOutcome::Paid, "paid")]
#[case(PaymentOutcome::Pending, "pending")]
#[case(PaymentOutcome::Failed, "failed")]
#[actix_web::test]
async fn confirm_payment_reports_the_provider_verdict(
    #[case] outcome: PaymentOutcome,
    #[case] label: &str,
) {
    let user_id = UserId::random();
    let appointment_id = AppointmentId::random();
    let mut builder = StateBuilder::default();
    builder
        .payments
        .expect_confirm_payment()
        .withf(|request| request.reference == "ref-abc")
        .return_once(move |_| {
            Ok(ConfirmPaymentResponse {
                appointment_id,
                outcome,
            })
        });

    let request = test::TestRequest::post()
        .uri(&format!("/api/user/appointments/{appointment_id}/payment/verify"))
        .insert_header(bearer(&Principal::User(user_id)))
        .set_json(json!({"reference": "ref-abc"}));
    let (status, body) = send(builder.build(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], json!(label));
}

#[actix_web::test]
async fn confirm_payment_requires_a_reference() {
    let request = test::TestRequest::post()
        .uri(&format!(
            "/api/user/appointments/{}/payment/verify",
            AppointmentId::random()
        ))
        .insert_header(bearer(&Principal::User(UserId::random())))
        .set_json(json!({}));
    let (status, body) = send(StateBuilder::default().build(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], json!("reference"));
}
