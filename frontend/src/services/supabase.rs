//! Supabase auth client.
//!
//! Talks to the GoTrue REST endpoints with `gloo-net` and persists the
//! session in `localStorage`, where it survives reloads. One instance is
//! built at start-up and shared by the app shell and the navigation guard.

use async_trait::async_trait;
use chrono::Utc;
use gloo::storage::errors::StorageError;
use gloo::storage::{LocalStorage, Storage};
use gloo_net::http::{Request, Response};
use serde_json::{json, Value};
use shared::session::{
    resolve_session, AuthConfig, GoTrueError, Session, SessionError, SessionOracle, SessionStore,
    SessionUser, SignUpResponse, StoredSession, TokenRefresher,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    SignedIn(Session),
    /// The provider sent a confirmation email; no session yet.
    ConfirmationRequired { email: Option<String> },
}

/// Session persisted in `localStorage` under the provider's key.
pub struct BrowserSessionStore {
    key: String,
}

impl SessionStore for BrowserSessionStore {
    fn load(&self) -> Result<StoredSession, SessionError> {
        match LocalStorage::get::<Session>(&self.key) {
            Ok(session) => Ok(StoredSession::Present(session)),
            Err(StorageError::KeyNotFound(_)) => Ok(StoredSession::Missing),
            Err(StorageError::SerdeError(err)) => Ok(StoredSession::Unreadable(err.to_string())),
            Err(err) => Err(SessionError::Storage(err.to_string())),
        }
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        LocalStorage::set(&self.key, session).map_err(|err| SessionError::Storage(err.to_string()))
    }

    fn clear(&self) {
        LocalStorage::delete(&self.key);
    }
}

pub struct SupabaseAuth {
    config: AuthConfig,
    store: BrowserSessionStore,
}

impl SupabaseAuth {
    pub fn new(config: AuthConfig) -> Self {
        let store = BrowserSessionStore {
            key: config.storage_key(),
        };
        Self { config, store }
    }

    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, SessionError> {
        let session = self
            .token_grant("password", json!({ "email": email, "password": password }))
            .await?;
        self.store.save(&session)?;
        tracing::info!(user_id = %session.user.id, "signed in");
        Ok(session)
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, SessionError> {
        let body = json!({ "email": email, "password": password });
        let response = self.post(&self.config.signup_url(), &body, None).await?;
        let text = response.text().await.map_err(transport)?;

        match serde_json::from_str::<SignUpResponse>(&text)? {
            SignUpResponse::Session(session) => {
                let session = session.with_expiry_from(Utc::now());
                self.store.save(&session)?;
                tracing::info!(user_id = %session.user.id, "signed up and signed in");
                Ok(SignUpOutcome::SignedIn(session))
            }
            SignUpResponse::User(user) => {
                tracing::info!(user_id = %user.id, "signed up, confirmation pending");
                Ok(SignUpOutcome::ConfirmationRequired { email: user.email })
            }
        }
    }

    /// Clear the local session, then revoke it remotely on a best-effort basis.
    pub async fn sign_out(&self) -> Result<(), SessionError> {
        let stored = self.store.load()?;
        self.store.clear();

        if let StoredSession::Present(session) = stored {
            let bearer = session.bearer();
            if let Err(err) = self
                .post(&self.config.logout_url(), &json!({}), Some(&bearer))
                .await
            {
                tracing::warn!(%err, "remote sign-out failed");
            }
        }
        tracing::info!("signed out");
        Ok(())
    }

    pub async fn user(&self) -> Result<Option<SessionUser>, SessionError> {
        Ok(self.current_session().await?.map(|session| session.user))
    }

    async fn token_grant(&self, grant_type: &str, body: Value) -> Result<Session, SessionError> {
        let response = self
            .post(&self.config.token_url(grant_type), &body, None)
            .await?;
        let text = response.text().await.map_err(transport)?;
        Ok(serde_json::from_str::<Session>(&text)?.with_expiry_from(Utc::now()))
    }

    async fn post(
        &self,
        url: &str,
        body: &Value,
        bearer: Option<&str>,
    ) -> Result<Response, SessionError> {
        let mut request = Request::post(url).header("apikey", self.config.anon_key());
        if let Some(bearer) = bearer {
            request = request.header("Authorization", bearer);
        }

        let response = request
            .json(body)
            .map_err(transport)?
            .send()
            .await
            .map_err(transport)?;

        if !response.ok() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(GoTrueError::rejection(status, &text));
        }
        Ok(response)
    }
}

#[async_trait(?Send)]
impl TokenRefresher for SupabaseAuth {
    async fn refresh(&self, refresh_token: &str) -> Result<Session, SessionError> {
        self.token_grant("refresh_token", json!({ "refresh_token": refresh_token }))
            .await
    }
}

#[async_trait(?Send)]
impl SessionOracle for SupabaseAuth {
    async fn current_session(&self) -> Result<Option<Session>, SessionError> {
        resolve_session(&self.store, self, Utc::now()).await
    }
}

fn transport(err: gloo_net::Error) -> SessionError {
    SessionError::Transport(err.to_string())
}
