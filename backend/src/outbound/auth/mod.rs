//! Bearer-token adapters.

mod signed_token;

pub use signed_token::SignedTokenVerifier;
