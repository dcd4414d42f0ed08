//! Administrator login against configured credentials.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::ports::{AdminLogin, TokenVerifier};
use crate::domain::{Error, LoginCredentials, Principal};

/// Exchanges the configured admin credentials for an admin bearer token.
#[derive(Clone)]
pub struct AdminLoginService {
    configured: Option<LoginCredentials>,
    tokens: Arc<dyn TokenVerifier>,
}

impl AdminLoginService {
    /// `configured = None` disables admin login entirely.
    pub fn new(configured: Option<LoginCredentials>, tokens: Arc<dyn TokenVerifier>) -> Self {
        Self { configured, tokens }
    }
}

#[async_trait]
impl AdminLogin for AdminLoginService {
    async fn login(&self, credentials: &LoginCredentials) -> Result<String, Error> {
        let Some(configured) = self.configured.as_ref() else {
            return Err(Error::unauthorized("admin login is disabled"));
        };
        if !configured.matches(credentials) {
            warn!("admin login rejected");
            return Err(Error::unauthorized("invalid credentials"));
        }
        Ok(self.tokens.issue(&Principal::Admin))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockTokenVerifier;

    fn creds(email: &str, password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts(email, password).expect("credentials shape")
    }

    #[rstest]
    #[tokio::test]
    async fn matching_credentials_receive_admin_token() {
        let mut tokens = MockTokenVerifier::new();
        tokens
            .expect_issue()
            .withf(|principal| principal == &Principal::Admin)
            .return_const("admin.root.sig".to_owned());
        let service = AdminLoginService::new(
            Some(creds("admin@clinic.test", "secret")),
            Arc::new(tokens),
        );

        let token = service
            .login(&creds("admin@clinic.test", "secret"))
            .await
            .expect("login succeeds");

        assert_eq!(token, "admin.root.sig");
    }

    #[rstest]
    #[case(Some(("admin@clinic.test", "secret")), "wrong")]
    #[case(None, "secret")]
    #[tokio::test]
    async fn other_logins_are_unauthorized(
        #[case] configured: Option<(&str, &str)>,
        #[case] password: &str,
    ) {
        let mut tokens = MockTokenVerifier::new();
        tokens.expect_issue().times(0);
        let service = AdminLoginService::new(
            configured.map(|(email, pw)| creds(email, pw)),
            Arc::new(tokens),
        );

        let error = service
            .login(&creds("admin@clinic.test", password))
            .await
            .expect_err("rejected");

        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }
}
