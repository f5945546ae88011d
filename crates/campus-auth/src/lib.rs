//! Campus Auth — resolves callers into authenticated principals:
//! password login, registration against a tenant code, and signed
//! session tokens.

pub mod config;
pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use service::{AuthService, LoginInput, LoginOutput, RegisterInput};
pub use token::SessionClaims;
