//! Bearer authentication for HTTP handlers.
//!
//! [`Authenticated`] pulls `Authorization: Bearer <token>` off the request and
//! resolves it through the [`TokenVerifier`](crate::domain::ports::TokenVerifier)
//! held in [`HttpState`]. Role checks live here so handlers only ask for the
//! identity they need.

use actix_web::http::header::Header;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};
use futures_util::future::{Ready, ready};
use serde_json::json;
use tracing::debug;

use crate::domain::ports::TokenError;
use crate::domain::{DoctorId, Error, Principal, UserId};
use crate::inbound::http::state::HttpState;

/// Caller identity proven by a valid bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authenticated(Principal);

impl Authenticated {
    /// Resolved principal.
    pub fn principal(&self) -> Principal {
        self.0
    }

    /// Require the patient role.
    pub fn require_user(&self) -> Result<UserId, Error> {
        match self.0 {
            Principal::User(id) => Ok(id),
            other => Err(wrong_role("user", other)),
        }
    }

    /// Require the doctor role.
    pub fn require_doctor(&self) -> Result<DoctorId, Error> {
        match self.0 {
            Principal::Doctor(id) => Ok(id),
            other => Err(wrong_role("doctor", other)),
        }
    }

    /// Require the admin role.
    pub fn require_admin(&self) -> Result<(), Error> {
        match self.0 {
            Principal::Admin => Ok(()),
            other => Err(wrong_role("admin", other)),
        }
    }
}

fn wrong_role(required: &str, actual: Principal) -> Error {
    Error::forbidden(format!("{required} role required")).with_details(json!({
        "required": required,
        "actual": actual.role(),
    }))
}

fn map_token_error(error: TokenError) -> Error {
    debug!(%error, "bearer token rejected");
    Error::unauthorized("invalid bearer token")
}

fn authenticate(req: &HttpRequest) -> Result<Authenticated, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("http state is not registered"))?;
    let header = Authorization::<Bearer>::parse(req)
        .map_err(|_| Error::unauthorized("bearer token required"))?;
    let principal = state
        .tokens
        .verify(header.as_ref().token())
        .map_err(map_token_error)?;
    Ok(Authenticated(principal))
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
