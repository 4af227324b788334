//! In-memory session provider.
//!
//! The managed backend owns real authentication; this adapter only models
//! the narrow surface the app consumes: the current session and change
//! callbacks.

use async_trait::async_trait;
use tokio::sync::RwLock;

use amigo_core::ports::{AuthError, Session, SessionHandler, SessionProvider};

#[derive(Default)]
pub struct InMemorySessionProvider {
    session: RwLock<Option<Session>>,
    handlers: RwLock<Vec<SessionHandler>>,
}

impl InMemorySessionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a session, notifying change handlers.
    pub async fn sign_in(&self, session: Session) {
        *self.session.write().await = Some(session.clone());
        for handler in self.handlers.read().await.iter() {
            handler(Some(session.clone()));
        }
        tracing::debug!(user_id = %session.user_id, "Session established");
    }
}

#[async_trait]
impl SessionProvider for InMemorySessionProvider {
    async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    async fn on_change(&self, handler: SessionHandler) {
        self.handlers.write().await.push(handler);
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let had_session = self.session.write().await.take().is_some();
        if !had_session {
            return Err(AuthError::NotSignedIn);
        }
        for handler in self.handlers.read().await.iter() {
            handler(None);
        }
        tracing::debug!("Session ended");
        Ok(())
    }
}
