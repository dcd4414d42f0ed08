//! Runtime settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `CLINIC_*` environment variables, and config
//! files. Secrets are handed out wrapped in [`Zeroizing`] and never appear in
//! `Debug` output.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;
use zeroize::Zeroizing;

use clinic_backend::domain::{LoginCredentials, LoginValidationError};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_PAYSTACK_BASE_URL: &str = "https://api.paystack.co";
const DEFAULT_CLIENT_BASE_URL: &str = "http://localhost:5173";
const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 10;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("bind address `{value}` is not a socket address")]
    BindAddr { value: String },
    #[error("paystack base URL `{value}` is not a URL")]
    PaystackBaseUrl { value: String },
    #[error("admin email and password must be set together")]
    PartialAdminCredentials,
    #[error("admin credentials are invalid: {0}")]
    AdminCredentials(#[from] LoginValidationError),
}

/// Server settings.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CLINIC")]
pub struct ClinicSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; in-memory stores are used when absent.
    pub database_url: Option<String>,
    /// Secret used to sign and verify bearer tokens.
    pub token_secret: Option<String>,
    /// Admin login email; set together with `admin_password`.
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    /// Paystack secret key; payment endpoints answer 503 when absent.
    pub paystack_secret_key: Option<String>,
    /// Override for the Paystack API origin.
    pub paystack_base_url: Option<String>,
    /// Front-end origin used to build the payment callback URL.
    pub client_base_url: Option<String>,
    /// Upper bound on one payment gateway call.
    pub gateway_timeout_secs: Option<u64>,
    /// Seed a demo doctor and patient into the in-memory stores.
    #[ortho_config(default = false)]
    pub seed_demo: bool,
}

impl fmt::Debug for ClinicSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClinicSettings")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("token_secret", &self.token_secret.as_ref().map(|_| "<redacted>"))
            .field("admin_email", &self.admin_email)
            .field(
                "paystack_secret_key",
                &self.paystack_secret_key.as_ref().map(|_| "<redacted>"),
            )
            .field("paystack_base_url", &self.paystack_base_url)
            .field("client_base_url", &self.client_base_url)
            .field("gateway_timeout_secs", &self.gateway_timeout_secs)
            .field("seed_demo", &self.seed_demo)
            .finish_non_exhaustive()
    }
}

impl ClinicSettings {
    /// Parsed listen address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|_| SettingsError::BindAddr {
            value: raw.to_owned(),
        })
    }

    /// Parsed Paystack API origin.
    pub fn paystack_base_url(&self) -> Result<Url, SettingsError> {
        let raw = self
            .paystack_base_url
            .as_deref()
            .unwrap_or(DEFAULT_PAYSTACK_BASE_URL);
        Url::parse(raw).map_err(|_| SettingsError::PaystackBaseUrl {
            value: raw.to_owned(),
        })
    }

    /// Front-end origin for payment callbacks.
    pub fn client_base_url(&self) -> &str {
        self.client_base_url
            .as_deref()
            .unwrap_or(DEFAULT_CLIENT_BASE_URL)
    }

    /// Gateway call timeout.
    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_secs(
            self.gateway_timeout_secs
                .unwrap_or(DEFAULT_GATEWAY_TIMEOUT_SECS),
        )
    }

    /// Token signing secret, wiped on drop.
    pub fn token_secret(&self) -> Option<Zeroizing<String>> {
        self.token_secret.clone().map(Zeroizing::new)
    }

    /// Paystack secret key, wiped on drop.
    pub fn paystack_secret_key(&self) -> Option<Zeroizing<String>> {
        self.paystack_secret_key.clone().map(Zeroizing::new)
    }

    /// Configured admin login, or `None` when admin login is disabled.
    pub fn admin_credentials(&self) -> Result<Option<LoginCredentials>, SettingsError> {
        match (&self.admin_email, &self.admin_password) {
            (Some(email), Some(password)) => {
                Ok(Some(LoginCredentials::try_from_parts(email, password)?))
            }
            (None, None) => Ok(None),
            _ => Err(SettingsError::PartialAdminCredentials),
        }
    }
}
