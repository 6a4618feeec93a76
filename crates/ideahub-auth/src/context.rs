//! Verified request identity.

use uuid::Uuid;

/// The identity handed to downstream handlers once a bearer access token
/// has been verified. Everything outside the auth core consumes this and
/// nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// The authenticated account's ID.
    pub subject_id: Uuid,
    /// The username at the time the token was issued.
    pub username: String,
}
