//! Session oracle contract and Supabase auth (GoTrue) wire types.
//!
//! The rest of the application only ever asks one question of the auth
//! provider: is there a valid session right now? [`SessionOracle`] is that
//! question. The types below describe what the provider sends back and
//! where its endpoints live, so the browser client stays a thin transport.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;
use uuid::Uuid;

/// Sessions this close to expiry are treated as already expired.
pub const EXPIRY_MARGIN_SECS: i64 = 10;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The provider could not be reached
    #[error("auth provider unreachable: {0}")]
    Transport(String),

    /// The provider answered with an error status
    #[error("auth provider rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Local session storage failed
    #[error("session storage error: {0}")]
    Storage(String),

    /// The provider's response body did not parse
    #[error("malformed auth response: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl SessionError {
    /// A client-side rejection (bad credentials, revoked refresh token).
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { status, .. } if (400..500).contains(status))
    }
}

/// Answers whether a valid session currently exists.
///
/// Implementations may suspend (remote call, storage read). Futures are not
/// `Send`: the browser runs everything on one thread.
#[async_trait(?Send)]
pub trait SessionOracle {
    /// The current session, refreshed if the provider supports it.
    async fn current_session(&self) -> Result<Option<Session>, SessionError>;

    async fn session_exists(&self) -> Result<bool, SessionError> {
        Ok(self.current_session().await?.is_some())
    }
}

/// What local storage holds under the session key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredSession {
    Missing,
    /// Present but not a session, e.g. written by an older client
    Unreadable(String),
    Present(Session),
}

/// Where the current session is persisted between page loads.
pub trait SessionStore {
    fn load(&self) -> Result<StoredSession, SessionError>;
    fn save(&self, session: &Session) -> Result<(), SessionError>;
    fn clear(&self);
}

/// Exchanges a refresh token for a new session.
#[async_trait(?Send)]
pub trait TokenRefresher {
    async fn refresh(&self, refresh_token: &str) -> Result<Session, SessionError>;
}

/// The session in `store`, refreshed through `refresher` once it expires.
///
/// An unreadable stored value is discarded. A refreshed session replaces
/// the stored one. A refresh the provider rejects (revoked or reused
/// token) clears the store and means "no session"; any other failure is
/// returned so the caller's failure policy applies.
pub async fn resolve_session(
    store: &dyn SessionStore,
    refresher: &dyn TokenRefresher,
    now: DateTime<Utc>,
) -> Result<Option<Session>, SessionError> {
    let session = match store.load()? {
        StoredSession::Missing => return Ok(None),
        StoredSession::Unreadable(reason) => {
            tracing::warn!(%reason, "discarding unreadable stored session");
            store.clear();
            return Ok(None);
        }
        StoredSession::Present(session) => session,
    };
    if !session.is_expired_at(now) {
        return Ok(Some(session));
    }

    tracing::debug!(user_id = %session.user.id, "stored session expired, refreshing");
    match refresher.refresh(&session.refresh_token).await {
        Ok(fresh) => {
            store.save(&fresh)?;
            Ok(Some(fresh))
        }
        Err(err) if err.is_rejection() => {
            tracing::info!(%err, "refresh rejected, clearing session");
            store.clear();
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Authenticated user attached to a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_confirmed_at: Option<DateTime<Utc>>,
}

/// Session as issued by the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub token_type: String,
    /// Lifetime in seconds at issue time
    pub expires_in: i64,
    /// Unix timestamp; older provider versions omit it
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub refresh_token: String,
    pub user: SessionUser,
}

impl Session {
    /// Fill in `expires_at` from `expires_in` when the provider left it out.
    pub fn with_expiry_from(mut self, issued_at: DateTime<Utc>) -> Self {
        if self.expires_at.is_none() {
            self.expires_at = Some(issued_at.timestamp() + self.expires_in);
        }
        self
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now.timestamp() + EXPIRY_MARGIN_SECS >= expires_at,
            None => false,
        }
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

/// Body returned by the signup endpoint.
///
/// Projects that auto-confirm emails answer with a full session; projects
/// that require confirmation answer with the bare user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SignUpResponse {
    Session(Session),
    User(SessionUser),
}

/// Error body, in either of the shapes GoTrue has used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GoTrueError {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
}

impl GoTrueError {
    pub fn message(&self) -> String {
        self.error_description
            .as_ref()
            .or(self.msg.as_ref())
            .or(self.error.as_ref())
            .or(self.error_code.as_ref())
            .cloned()
            .unwrap_or_else(|| "unknown error".to_string())
    }

    /// Build a [`SessionError::Rejected`] from a status and raw body.
    pub fn rejection(status: u16, body: &str) -> SessionError {
        let message = serde_json::from_str::<GoTrueError>(body)
            .map(|err| err.message())
            .unwrap_or_else(|_| body.trim().to_string());
        SessionError::Rejected { status, message }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthConfigError {
    #[error("invalid auth provider URL: {0}")]
    InvalidUrl(String),

    #[error("auth provider URL has no host: {0}")]
    MissingHost(String),

    #[error("auth provider public key is empty")]
    EmptyKey,
}

/// Where the auth provider lives and the public key it expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    url: Url,
    anon_key: String,
}

impl AuthConfig {
    pub fn new(url: &str, anon_key: impl Into<String>) -> Result<Self, AuthConfigError> {
        let url = Url::parse(url).map_err(|e| AuthConfigError::InvalidUrl(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AuthConfigError::InvalidUrl(url.to_string()));
        }
        if url.host_str().is_none() {
            return Err(AuthConfigError::MissingHost(url.to_string()));
        }
        let anon_key = anon_key.into();
        if anon_key.trim().is_empty() {
            return Err(AuthConfigError::EmptyKey);
        }
        Ok(Self { url, anon_key })
    }

    pub fn anon_key(&self) -> &str {
        &self.anon_key
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.url.as_str().trim_end_matches('/'), path)
    }

    /// Token endpoint for a grant (`password`, `refresh_token`).
    pub fn token_url(&self, grant_type: &str) -> String {
        self.endpoint(&format!("token?grant_type={}", urlencoding::encode(grant_type)))
    }

    pub fn signup_url(&self) -> String {
        self.endpoint("signup")
    }

    pub fn logout_url(&self) -> String {
        self.endpoint("logout")
    }

    pub fn user_url(&self) -> String {
        self.endpoint("user")
    }

    /// Local storage key for the persisted session: `sb-<project-ref>-auth-token`.
    pub fn storage_key(&self) -> String {
        let project_ref = self
            .url
            .host_str()
            .and_then(|host| host.split('.').next())
            .unwrap_or("local");
        format!("sb-{project_ref}-auth-token")
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use chrono::TimeZone;

    use super::*;

    fn session_json(expires_at: Option<i64>) -> String {
        let expires_at = expires_at.map_or("null".to_string(), |t| t.to_string());
        format!(
            r#"{{
                "access_token": "jwt",
                "token_type": "bearer",
                "expires_in": 3600,
                "expires_at": {expires_at},
                "refresh_token": "refresh",
                "user": {{
                    "id": "8f0e4c6a-3a4f-4b55-9d3e-0f1c2b3a4d5e",
                    "email": "test@example.com",
                    "aud": "authenticated"
                }}
            }}"#
        )
    }

    #[test]
    fn test_session_parses_token_response() {
        let session: Session = serde_json::from_str(&session_json(Some(1_700_003_600))).unwrap();
        assert_eq!(session.user.email.as_deref(), Some("test@example.com"));
        assert_eq!(session.expires_at, Some(1_700_003_600));
        assert_eq!(session.bearer(), "Bearer jwt");
    }

    #[test]
    fn test_expiry_filled_from_issue_time() {
        let issued = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let session: Session = serde_json::from_str(&session_json(None)).unwrap();
        let session = session.with_expiry_from(issued);
        assert_eq!(session.expires_at, Some(1_700_003_600));
    }

    #[test]
    fn test_expiry_respects_margin() {
        let session: Session = serde_json::from_str(&session_json(Some(1_700_003_600))).unwrap();
        let fresh = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let within_margin = Utc.timestamp_opt(1_700_003_600 - EXPIRY_MARGIN_SECS, 0).unwrap();
        assert!(!session.is_expired_at(fresh));
        assert!(session.is_expired_at(within_margin));
    }

    #[test]
    fn test_signup_response_shapes() {
        let signed_in: SignUpResponse = serde_json::from_str(&session_json(None)).unwrap();
        assert!(matches!(signed_in, SignUpResponse::Session(_)));

        let pending: SignUpResponse = serde_json::from_str(
            r#"{"id": "8f0e4c6a-3a4f-4b55-9d3e-0f1c2b3a4d5e", "email": "new@example.com", "confirmation_sent_at": "2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(matches!(pending, SignUpResponse::User(user) if user.email.as_deref() == Some("new@example.com")));
    }

    #[test]
    fn test_gotrue_error_shapes() {
        let legacy = GoTrueError::rejection(
            400,
            r#"{"error": "invalid_grant", "error_description": "Invalid login credentials"}"#,
        );
        assert_eq!(legacy.to_string(), "auth provider rejected request (400): Invalid login credentials");
        assert!(legacy.is_rejection());

        let current = GoTrueError::rejection(
            422,
            r#"{"code": 422, "error_code": "weak_password", "msg": "Password should be at least 6 characters"}"#,
        );
        assert!(matches!(current, SessionError::Rejected { message, .. } if message.starts_with("Password")));

        let opaque = GoTrueError::rejection(502, "Bad Gateway\n");
        assert!(matches!(&opaque, SessionError::Rejected { message, .. } if message == "Bad Gateway"));
        assert!(!opaque.is_rejection());
    }

    #[test]
    fn test_auth_config_endpoints() {
        let config = AuthConfig::new("https://abcdefgh.supabase.co/", "anon").unwrap();
        assert_eq!(
            config.token_url("refresh_token"),
            "https://abcdefgh.supabase.co/auth/v1/token?grant_type=refresh_token"
        );
        assert_eq!(config.signup_url(), "https://abcdefgh.supabase.co/auth/v1/signup");
        assert_eq!(config.logout_url(), "https://abcdefgh.supabase.co/auth/v1/logout");
        assert_eq!(config.storage_key(), "sb-abcdefgh-auth-token");
    }

    #[test]
    fn test_auth_config_rejects_bad_input() {
        assert!(matches!(
            AuthConfig::new("not a url", "anon"),
            Err(AuthConfigError::InvalidUrl(_))
        ));
        assert!(matches!(
            AuthConfig::new("ftp://example.com", "anon"),
            Err(AuthConfigError::InvalidUrl(_))
        ));
        assert_eq!(
            AuthConfig::new("https://abcdefgh.supabase.co", "  "),
            Err(AuthConfigError::EmptyKey)
        );
    }

    struct MemoryStore {
        slot: RefCell<StoredSession>,
        saves: Cell<usize>,
    }

    impl MemoryStore {
        fn holding(stored: StoredSession) -> Self {
            Self {
                slot: RefCell::new(stored),
                saves: Cell::new(0),
            }
        }
    }

    impl SessionStore for MemoryStore {
        fn load(&self) -> Result<StoredSession, SessionError> {
            Ok(self.slot.borrow().clone())
        }

        fn save(&self, session: &Session) -> Result<(), SessionError> {
            self.saves.set(self.saves.get() + 1);
            *self.slot.borrow_mut() = StoredSession::Present(session.clone());
            Ok(())
        }

        fn clear(&self) {
            *self.slot.borrow_mut() = StoredSession::Missing;
        }
    }

    struct StubRefresher {
        result: RefCell<Option<Result<Session, SessionError>>>,
        calls: Cell<usize>,
    }

    impl StubRefresher {
        fn answering(result: Result<Session, SessionError>) -> Self {
            Self {
                result: RefCell::new(Some(result)),
                calls: Cell::new(0),
            }
        }

        fn unused() -> Self {
            Self {
                result: RefCell::new(None),
                calls: Cell::new(0),
            }
        }
    }

    #[async_trait(?Send)]
    impl TokenRefresher for StubRefresher {
        async fn refresh(&self, refresh_token: &str) -> Result<Session, SessionError> {
            assert_eq!(refresh_token, "refresh");
            self.calls.set(self.calls.get() + 1);
            self.result
                .borrow_mut()
                .take()
                .unwrap_or_else(|| Err(SessionError::Transport("unexpected refresh".into())))
        }
    }

    const EXPIRES_AT: i64 = 1_700_003_600;

    fn stored() -> Session {
        serde_json::from_str(&session_json(Some(EXPIRES_AT))).unwrap()
    }

    fn rotated() -> Session {
        Session {
            access_token: "jwt-2".to_string(),
            refresh_token: "refresh-2".to_string(),
            expires_at: Some(EXPIRES_AT + 3600),
            ..stored()
        }
    }

    fn before_expiry() -> DateTime<Utc> {
        Utc.timestamp_opt(EXPIRES_AT - 600, 0).unwrap()
    }

    fn after_expiry() -> DateTime<Utc> {
        Utc.timestamp_opt(EXPIRES_AT + 60, 0).unwrap()
    }

    #[tokio::test]
    async fn test_missing_session_is_none() {
        let store = MemoryStore::holding(StoredSession::Missing);
        let refresher = StubRefresher::unused();
        let resolved = resolve_session(&store, &refresher, before_expiry()).await.unwrap();
        assert_eq!(resolved, None);
        assert_eq!(refresher.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_unexpired_session_returned_as_stored() {
        let store = MemoryStore::holding(StoredSession::Present(stored()));
        let refresher = StubRefresher::unused();
        let resolved = resolve_session(&store, &refresher, before_expiry()).await.unwrap();
        assert_eq!(resolved, Some(stored()));
        assert_eq!(refresher.calls.get(), 0);
        assert_eq!(store.saves.get(), 0);
    }

    #[tokio::test]
    async fn test_expired_session_is_refreshed_and_stored() {
        let store = MemoryStore::holding(StoredSession::Present(stored()));
        let refresher = StubRefresher::answering(Ok(rotated()));
        let resolved = resolve_session(&store, &refresher, after_expiry()).await.unwrap();
        assert_eq!(resolved, Some(rotated()));
        assert_eq!(refresher.calls.get(), 1);
        assert_eq!(*store.slot.borrow(), StoredSession::Present(rotated()));
    }

    #[tokio::test]
    async fn test_rejected_refresh_clears_session() {
        let store = MemoryStore::holding(StoredSession::Present(stored()));
        let refresher = StubRefresher::answering(Err(GoTrueError::rejection(
            400,
            r#"{"error": "invalid_grant", "error_description": "Invalid Refresh Token: Already Used"}"#,
        )));
        let resolved = resolve_session(&store, &refresher, after_expiry()).await.unwrap();
        assert_eq!(resolved, None);
        assert_eq!(*store.slot.borrow(), StoredSession::Missing);
    }

    #[tokio::test]
    async fn test_transport_failure_propagates_and_keeps_session() {
        let store = MemoryStore::holding(StoredSession::Present(stored()));
        let refresher =
            StubRefresher::answering(Err(SessionError::Transport("connection refused".into())));
        let resolved = resolve_session(&store, &refresher, after_expiry()).await;
        assert!(matches!(resolved, Err(SessionError::Transport(_))));
        assert_eq!(*store.slot.borrow(), StoredSession::Present(stored()));
    }

    #[tokio::test]
    async fn test_server_error_on_refresh_propagates() {
        let store = MemoryStore::holding(StoredSession::Present(stored()));
        let refresher = StubRefresher::answering(Err(GoTrueError::rejection(503, "")));
        let resolved = resolve_session(&store, &refresher, after_expiry()).await;
        assert!(matches!(resolved, Err(SessionError::Rejected { status: 503, .. })));
        assert_eq!(*store.slot.borrow(), StoredSession::Present(stored()));
    }

    #[tokio::test]
    async fn test_unreadable_session_is_discarded() {
        let store = MemoryStore::holding(StoredSession::Unreadable("expected value".into()));
        let refresher = StubRefresher::unused();
        let resolved = resolve_session(&store, &refresher, before_expiry()).await.unwrap();
        assert_eq!(resolved, None);
        assert_eq!(*store.slot.borrow(), StoredSession::Missing);
    }
}
