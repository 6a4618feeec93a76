//! Account entity and related types.

pub mod model;
pub mod provider;

pub use model::{Account, CreateAccount, MAX_REFRESH_FINGERPRINTS, MAX_USERNAME_LEN};
pub use provider::AuthProvider;
