//! Session port - authentication is an external collaborator; the core only
//! reads the current session and reacts to its changes.

use async_trait::async_trait;
use uuid::Uuid;

/// The authenticated session, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
    pub email: String,
}

/// Handler invoked whenever the session changes; `None` means signed out.
pub type SessionHandler = Box<dyn Fn(Option<Session>) + Send + Sync>;

/// Session provider trait.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// The active session, or `None` when signed out.
    async fn session(&self) -> Option<Session>;

    /// Register a handler for session changes.
    async fn on_change(&self, handler: SessionHandler);

    /// End the active session.
    async fn sign_out(&self) -> Result<(), AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("No active session")]
    NotSignedIn,

    #[error("Provider error: {0}")]
    Provider(String),
}
