//! SHA-256 signed bearer tokens.
//!
//! Token shape: `<role>.<subject>.<signature>` where `signature` is the hex
//! SHA-256 of `secret ‖ role ‖ "." ‖ subject`. Subjects are UUIDs for users
//! and doctors and the literal `root` for the administrator.

use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::domain::ports::{TokenError, TokenVerifier};
use crate::domain::{DoctorId, Principal, UserId, constant_time_eq};

const ADMIN_SUBJECT: &str = "root";

/// Issues and verifies tokens signed with one shared secret.
pub struct SignedTokenVerifier {
    secret: Zeroizing<Vec<u8>>,
}

impl SignedTokenVerifier {
    /// Verifier keyed by `secret`.
    pub fn new(secret: Zeroizing<String>) -> Self {
        Self {
            secret: Zeroizing::new(secret.as_bytes().to_vec()),
        }
    }

    fn signature(&self, role: &str, subject: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_slice());
        hasher.update(role.as_bytes());
        hasher.update(b".");
        hasher.update(subject.as_bytes());
        hex::encode(hasher.finalize())
    }
}

fn subject_of(principal: &Principal) -> String {
    match principal {
        Principal::User(id) => id.to_string(),
        Principal::Doctor(id) => id.to_string(),
        Principal::Admin => ADMIN_SUBJECT.to_owned(),
    }
}

impl TokenVerifier for SignedTokenVerifier {
    fn verify(&self, token: &str) -> Result<Principal, TokenError> {
        let mut parts = token.trim().splitn(3, '.');
        let (Some(role), Some(subject), Some(signature)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenError::malformed());
        };

        let expected = self.signature(role, subject);
        if !constant_time_eq(expected.as_bytes(), signature.as_bytes()) {
            return Err(TokenError::bad_signature());
        }

        match role {
            "user" => UserId::new(subject)
                .map(Principal::User)
                .map_err(|_| TokenError::malformed()),
            "doctor" => DoctorId::new(subject)
                .map(Principal::Doctor)
                .map_err(|_| TokenError::malformed()),
            "admin" if subject == ADMIN_SUBJECT => Ok(Principal::Admin),
            "admin" => Err(TokenError::malformed()),
            other => Err(TokenError::unknown_role(other)),
        }
    }

    fn issue(&self, principal: &Principal) -> String {
        let role = principal.role();
        let subject = subject_of(principal);
        let signature = self.signature(role, &subject);
        format!("{role}.{subject}.{signature}")
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn verifier() -> SignedTokenVerifier {
        SignedTokenVerifier::new(Zeroizing::new("test-secret".to_owned()))
    }

    #[rstest]
    #[case(Principal::User(UserId::random()))]
    #[case(Principal::Doctor(DoctorId::random()))]
    #[case(Principal::Admin)]
    fn issued_tokens_verify(verifier: SignedTokenVerifier, #[case] principal: Principal) {
        let token = verifier.issue(&principal);
        assert_eq!(verifier.verify(&token), Ok(principal));
    }

    #[rstest]
    fn tokens_from_another_secret_are_rejected(verifier: SignedTokenVerifier) {
        let other = SignedTokenVerifier::new(Zeroizing::new("other-secret".to_owned()));
        let token = other.issue(&Principal::Admin);
        assert_eq!(verifier.verify(&token), Err(TokenError::BadSignature));
    }

    #[rstest]
    fn swapping_the_role_breaks_the_signature(verifier: SignedTokenVerifier) {
        let id = UserId::random();
        let token = verifier.issue(&Principal::User(id));
        let forged = token.replacen("user.", "doctor.", 1);
        assert_eq!(verifier.verify(&forged), Err(TokenError::BadSignature));
    }

    #[rstest]
    #[case("")]
    #[case("user-only")]
    #[case("user.123")]
    fn malformed_tokens_are_rejected(verifier: SignedTokenVerifier, #[case] token: &str) {
        assert_eq!(verifier.verify(token), Err(TokenError::Malformed));
    }

    #[rstest]
    fn signed_unknown_roles_are_reported(verifier: SignedTokenVerifier) {
        let signature = verifier.signature("nurse", "x");
        let token = format!("nurse.x.{signature}");
        assert_eq!(
            verifier.verify(&token),
            Err(TokenError::unknown_role("nurse"))
        );
    }
}
