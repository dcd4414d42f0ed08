//! Port for resolving bearer tokens into principals.

use crate::domain::Principal;

use super::define_port_error;

define_port_error! {
    /// Reasons a bearer token is refused.
    pub enum TokenError {
        /// Token does not have the `<role>.<subject>.<signature>` shape.
        Malformed =>
            "token is malformed",
        /// Role segment is not one of `user`, `doctor`, `admin`.
        UnknownRole { role: String } =>
            "token role {role} is not recognised",
        /// Signature does not match the payload.
        BadSignature =>
            "token signature is invalid",
    }
}

/// Port for verifying and issuing bearer tokens.
#[cfg_attr(test, mockall::automock)]
pub trait TokenVerifier: Send + Sync {
    /// Resolve a raw token into the principal it was issued for.
    fn verify(&self, token: &str) -> Result<Principal, TokenError>;

    /// Issue a token for `principal`.
    fn issue(&self, principal: &Principal) -> String;
}
