//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use zeroize::Zeroizing;

use crate::domain::Principal;
use crate::domain::ports::{
    MockAdminLogin, MockAppointmentCommand, MockAppointmentQuery, MockDoctorDirectory,
    MockPaymentCommand, TokenVerifier,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::auth::SignedTokenVerifier;

const TEST_TOKEN_SECRET: &str = "http-test-secret";

fn test_tokens() -> SignedTokenVerifier {
    SignedTokenVerifier::new(Zeroizing::new(TEST_TOKEN_SECRET.to_owned()))
}

/// `Authorization` header carrying a token for `principal`.
pub(crate) fn bearer(principal: &Principal) -> (&'static str, String) {
    (
        "Authorization",
        format!("Bearer {}", test_tokens().issue(principal)),
    )
}

/// Builds an [`HttpState`] from mocks; unset ports panic if called.
#[derive(Default)]
pub(crate) struct StateBuilder {
    pub(crate) appointments: MockAppointmentCommand,
    pub(crate) appointment_queries: MockAppointmentQuery,
    pub(crate) payments: MockPaymentCommand,
    pub(crate) directory: MockDoctorDirectory,
    pub(crate) admin_login: MockAdminLogin,
}

impl StateBuilder {
    pub(crate) fn build(self) -> HttpState {
        HttpState {
            appointments: Arc::new(self.appointments),
            appointment_queries: Arc::new(self.appointment_queries),
            payments: Arc::new(self.payments),
            directory: Arc::new(self.directory),
            admin_login: Arc::new(self.admin_login),
            tokens: Arc::new(test_tokens()),
        }
    }
}

/// App with `state` registered and `configure` mounted under `/api`.
pub(crate) fn api_app<F>(
    state: HttpState,
    configure: F,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    F: FnOnce(&mut web::ServiceConfig),
{
    App::new()
        .app_data(web::Data::new(state))
        .service(web::scope("/api").configure(configure))
}
