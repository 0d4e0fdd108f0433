//! Navigation guard.
//!
//! Every navigation attempt is evaluated once: the target is resolved in the
//! [`RouteTable`], and if any matched entry requires authentication the
//! [`SessionOracle`] is asked whether a session exists. The oracle call is
//! raced against a timeout so a slow provider cannot hang navigation.
//!
//! The guard keeps no state between evaluations. A view that renders the
//! guarded routes pairs it with a [`NavigationTracker`], which decides which
//! decision still applies when navigations overlap.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use std::time::Duration;

use futures::future::{self, Either, LocalBoxFuture};

use crate::routes::{RouteTable, LOGIN_PATH};
use crate::session::{SessionError, SessionOracle};

pub const DEFAULT_GUARD_TIMEOUT: Duration = Duration::from_secs(5);

/// Timers and background tasks for the guard.
pub trait Scheduler {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;

    /// Run `task` to completion without anyone waiting on it.
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}

/// What to do when the session oracle fails outright.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OracleFailurePolicy {
    /// Redirect to login as if no session existed.
    #[default]
    FailClosed,
    /// Let the navigation through.
    FailOpen,
}

impl FromStr for OracleFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "closed" | "fail-closed" => Ok(Self::FailClosed),
            "open" | "fail-open" => Ok(Self::FailOpen),
            other => Err(format!("expected \"closed\" or \"open\", got {other:?}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardPolicy {
    /// Upper bound on the session check
    pub timeout: Duration,
    pub on_oracle_error: OracleFailurePolicy,
    /// Redirect target for protected routes
    pub login_path: String,
}

impl Default for GuardPolicy {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_GUARD_TIMEOUT,
            on_oracle_error: OracleFailurePolicy::default(),
            login_path: LOGIN_PATH.to_string(),
        }
    }
}

/// A single navigation request, consumed by one evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationAttempt {
    pub to: String,
    pub from: Option<String>,
}

impl NavigationAttempt {
    pub fn new(to: impl Into<String>, from: Option<String>) -> Self {
        Self {
            to: to.into(),
            from,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// The oracle reported no session
    Unauthenticated,
    /// The oracle did not answer within the policy timeout
    SessionCheckTimedOut,
    /// The oracle failed and the policy fails closed
    SessionCheckFailed,
}

impl fmt::Display for RedirectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unauthenticated => "unauthenticated",
            Self::SessionCheckTimedOut => "session check timed out",
            Self::SessionCheckFailed => "session check failed",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Navigation completes to the requested path.
    Allow { path: String },
    /// Navigation is replaced by one to `to`.
    Redirect { to: String, reason: RedirectReason },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow { .. })
    }

    /// Path the navigation ends on.
    pub fn final_path(&self) -> &str {
        match self {
            Self::Allow { path } => path,
            Self::Redirect { to, .. } => to,
        }
    }
}

pub struct NavigationGuard {
    routes: RouteTable,
    oracle: Rc<dyn SessionOracle>,
    scheduler: Rc<dyn Scheduler>,
    policy: GuardPolicy,
}

impl NavigationGuard {
    pub fn new(
        routes: RouteTable,
        oracle: Rc<dyn SessionOracle>,
        scheduler: Rc<dyn Scheduler>,
        policy: GuardPolicy,
    ) -> Self {
        Self {
            routes,
            oracle,
            scheduler,
            policy,
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn policy(&self) -> &GuardPolicy {
        &self.policy
    }

    /// Decide whether `attempt` may complete.
    pub async fn evaluate(&self, attempt: &NavigationAttempt) -> Decision {
        let needs_auth = self.routes.requires_auth(&attempt.to);
        if !needs_auth {
            tracing::debug!(to = %attempt.to, "public route, navigation allowed");
            return self.allow(attempt);
        }

        let oracle = Rc::clone(&self.oracle);
        let check: LocalBoxFuture<'static, Result<bool, SessionError>> =
            Box::pin(async move { oracle.session_exists().await });
        let deadline = self.scheduler.sleep(self.policy.timeout);

        let decision = match future::select(check, deadline).await {
            Either::Left((Ok(true), _)) => self.allow(attempt),
            Either::Left((Ok(false), _)) => self.redirect(RedirectReason::Unauthenticated),
            Either::Left((Err(err), _)) => {
                tracing::warn!(
                    to = %attempt.to,
                    error = %err,
                    policy = ?self.policy.on_oracle_error,
                    "session check failed"
                );
                match self.policy.on_oracle_error {
                    OracleFailurePolicy::FailClosed => {
                        self.redirect(RedirectReason::SessionCheckFailed)
                    }
                    OracleFailurePolicy::FailOpen => self.allow(attempt),
                }
            }
            Either::Right(((), pending)) => {
                tracing::warn!(
                    to = %attempt.to,
                    timeout_ms = self.policy.timeout.as_millis() as u64,
                    "session check timed out"
                );
                // A refresh may be in flight; it must still store the rotated token.
                self.scheduler.spawn(Box::pin(async move {
                    if let Err(err) = pending.await {
                        tracing::debug!(error = %err, "late session check failed");
                    }
                }));
                self.redirect(RedirectReason::SessionCheckTimedOut)
            }
        };

        tracing::info!(
            to = %attempt.to,
            from = attempt.from.as_deref().unwrap_or("-"),
            outcome = decision.final_path(),
            "protected route evaluated"
        );
        decision
    }

    fn allow(&self, attempt: &NavigationAttempt) -> Decision {
        Decision::Allow {
            path: attempt.to.clone(),
        }
    }

    fn redirect(&self, reason: RedirectReason) -> Decision {
        Decision::Redirect {
            to: self.policy.login_path.clone(),
            reason,
        }
    }
}

/// Ties guard decisions to the navigation that asked for them.
///
/// Every location change starts a new navigation and withdraws any earlier
/// permission, even one for the same path. Only the newest navigation can
/// settle; decisions for navigations the user has already left are dropped.
#[derive(Debug, Default)]
pub struct NavigationTracker {
    generation: u64,
    current: Option<String>,
    allowed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTicket {
    generation: u64,
    pub attempt: NavigationAttempt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    /// Render the requested view.
    Show,
    /// Replace the current history entry with `to`, so the blocked path
    /// never stays in the back stack.
    Replace { to: String, reason: RedirectReason },
    /// A newer navigation started while this one was being decided.
    Superseded,
}

impl NavigationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a navigation to `to`; nothing renders until it settles.
    pub fn begin(&mut self, to: impl Into<String>) -> NavigationTicket {
        let to = to.into();
        self.generation += 1;
        self.allowed = false;
        let from = self.current.replace(to.clone());
        NavigationTicket {
            generation: self.generation,
            attempt: NavigationAttempt::new(to, from),
        }
    }

    pub fn settle(&mut self, ticket: &NavigationTicket, decision: Decision) -> Settlement {
        if ticket.generation != self.generation {
            return Settlement::Superseded;
        }
        match decision {
            Decision::Allow { .. } => {
                self.allowed = true;
                Settlement::Show
            }
            Decision::Redirect { to, reason } => Settlement::Replace { to, reason },
        }
    }

    /// Whether the view for `path` may render right now.
    ///
    /// False for a path whose navigation has not started yet, which is the
    /// case during the render that precedes it.
    pub fn may_render(&self, path: &str) -> bool {
        self.allowed && self.current.as_deref() == Some(path)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use async_trait::async_trait;

    use super::*;
    use crate::session::Session;

    /// Tokio timers; spawned tasks are held until the test runs them.
    #[derive(Default)]
    struct TestScheduler {
        detached: RefCell<Vec<LocalBoxFuture<'static, ()>>>,
    }

    impl TestScheduler {
        async fn run_detached(&self) {
            let tasks = std::mem::take(&mut *self.detached.borrow_mut());
            for task in tasks {
                task.await;
            }
        }
    }

    impl Scheduler for TestScheduler {
        fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
            Box::pin(tokio::time::sleep(duration))
        }

        fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
            self.detached.borrow_mut().push(task);
        }
    }

    enum Behaviour {
        SignedIn,
        SignedOut,
        Failing,
        Hanging,
        /// Answers "signed in" after a delay.
        Slow(Duration),
    }

    struct StubOracle {
        behaviour: Behaviour,
        calls: Cell<usize>,
        finished: Cell<usize>,
    }

    impl StubOracle {
        fn new(behaviour: Behaviour) -> Rc<Self> {
            Rc::new(Self {
                behaviour,
                calls: Cell::new(0),
                finished: Cell::new(0),
            })
        }
    }

    fn session() -> Session {
        serde_json::from_str(
            r#"{
                "access_token": "jwt",
                "token_type": "bearer",
                "expires_in": 3600,
                "refresh_token": "refresh",
                "user": { "id": "8f0e4c6a-3a4f-4b55-9d3e-0f1c2b3a4d5e" }
            }"#,
        )
        .unwrap()
    }

    #[async_trait(?Send)]
    impl SessionOracle for StubOracle {
        async fn current_session(&self) -> Result<Option<Session>, SessionError> {
            self.calls.set(self.calls.get() + 1);
            match self.behaviour {
                Behaviour::SignedIn => Ok(Some(session())),
                Behaviour::SignedOut => Ok(None),
                Behaviour::Failing => Err(SessionError::Transport("connection refused".into())),
                Behaviour::Hanging => future::pending().await,
                Behaviour::Slow(delay) => {
                    tokio::time::sleep(delay).await;
                    self.finished.set(self.finished.get() + 1);
                    Ok(Some(session()))
                }
            }
        }
    }

    fn guard_with(oracle: Rc<StubOracle>, policy: GuardPolicy) -> NavigationGuard {
        let scheduler = Rc::new(TestScheduler::default());
        NavigationGuard::new(RouteTable::canonical(), oracle, scheduler, policy)
    }

    fn guard(behaviour: Behaviour) -> NavigationGuard {
        guard_with(StubOracle::new(behaviour), GuardPolicy::default())
    }

    /// A concrete path for every pattern in the canonical table.
    fn sample_paths(protected: bool) -> Vec<String> {
        RouteTable::canonical()
            .entries()
            .iter()
            .filter(|entry| entry.requires_auth == protected)
            .map(|entry| entry.pattern.replace(":id", "5").replace(":userId", "3"))
            .collect()
    }

    async fn decide(guard: &NavigationGuard, to: &str) -> Decision {
        guard.evaluate(&NavigationAttempt::new(to, Some("/".to_string()))).await
    }

    #[tokio::test]
    async fn test_protected_routes_redirect_without_session() {
        let guard = guard(Behaviour::SignedOut);
        for path in sample_paths(true) {
            assert_eq!(
                decide(&guard, &path).await,
                Decision::Redirect {
                    to: LOGIN_PATH.to_string(),
                    reason: RedirectReason::Unauthenticated,
                },
                "{path}"
            );
        }
    }

    #[tokio::test]
    async fn test_public_routes_allowed_in_any_session_state() {
        for behaviour in [
            Behaviour::SignedIn,
            Behaviour::SignedOut,
            Behaviour::Failing,
            Behaviour::Hanging,
        ] {
            let guard = guard(behaviour);
            for path in sample_paths(false) {
                let decision = decide(&guard, &path).await;
                assert_eq!(decision.final_path(), path);
                assert!(decision.is_allowed());
            }
        }
    }

    #[tokio::test]
    async fn test_protected_routes_allowed_with_session() {
        let guard = guard(Behaviour::SignedIn);
        for path in sample_paths(true) {
            assert_eq!(
                decide(&guard, &path).await,
                Decision::Allow { path: path.clone() }
            );
        }
    }

    #[tokio::test]
    async fn test_evaluation_is_idempotent() {
        for behaviour in [Behaviour::SignedIn, Behaviour::SignedOut] {
            let guard = guard(behaviour);
            let first = decide(&guard, "/profile").await;
            let second = decide(&guard, "/profile").await;
            assert_eq!(first, second);
        }
    }

    #[tokio::test]
    async fn test_upload_without_session_redirects_to_login() {
        let decision = decide(&guard(Behaviour::SignedOut), "/upload").await;
        assert_eq!(decision.final_path(), "/login");
    }

    #[tokio::test]
    async fn test_admin_with_session_is_allowed() {
        let decision = decide(&guard(Behaviour::SignedIn), "/admin").await;
        assert_eq!(decision, Decision::Allow { path: "/admin".to_string() });
    }

    #[tokio::test]
    async fn test_post_detail_without_session_is_allowed() {
        let decision = decide(&guard(Behaviour::SignedOut), "/posts/5").await;
        assert_eq!(decision, Decision::Allow { path: "/posts/5".to_string() });
    }

    #[tokio::test]
    async fn test_unmatched_path_is_allowed_without_oracle_call() {
        let oracle = StubOracle::new(Behaviour::SignedOut);
        let guard = guard_with(oracle.clone(), GuardPolicy::default());
        let decision = decide(&guard, "/nonexistent").await;
        assert_eq!(decision.final_path(), "/nonexistent");
        assert_eq!(oracle.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_oracle_consulted_once_per_protected_navigation() {
        let oracle = StubOracle::new(Behaviour::SignedIn);
        let guard = guard_with(oracle.clone(), GuardPolicy::default());
        decide(&guard, "/upload").await;
        decide(&guard, "/posts").await;
        decide(&guard, "/admin").await;
        assert_eq!(oracle.calls.get(), 2);
    }

    #[tokio::test]
    async fn test_oracle_failure_fails_closed_by_default() {
        let decision = decide(&guard(Behaviour::Failing), "/admin").await;
        assert_eq!(
            decision,
            Decision::Redirect {
                to: LOGIN_PATH.to_string(),
                reason: RedirectReason::SessionCheckFailed,
            }
        );
    }

    #[tokio::test]
    async fn test_oracle_failure_can_fail_open() {
        let policy = GuardPolicy {
            on_oracle_error: OracleFailurePolicy::FailOpen,
            ..GuardPolicy::default()
        };
        let guard = guard_with(StubOracle::new(Behaviour::Failing), policy);
        let decision = decide(&guard, "/admin").await;
        assert_eq!(decision, Decision::Allow { path: "/admin".to_string() });
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_oracle_times_out_as_unauthenticated() {
        let policy = GuardPolicy {
            timeout: Duration::from_millis(250),
            // The timeout outcome must not depend on the failure policy.
            on_oracle_error: OracleFailurePolicy::FailOpen,
            ..GuardPolicy::default()
        };
        let guard = guard_with(StubOracle::new(Behaviour::Hanging), policy);

        let started = tokio::time::Instant::now();
        let decision = decide(&guard, "/upload").await;

        assert_eq!(
            decision,
            Decision::Redirect {
                to: LOGIN_PATH.to_string(),
                reason: RedirectReason::SessionCheckTimedOut,
            }
        );
        assert!(started.elapsed() >= Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_out_check_runs_to_completion_in_background() {
        let oracle = StubOracle::new(Behaviour::Slow(Duration::from_secs(1)));
        let scheduler = Rc::new(TestScheduler::default());
        let policy = GuardPolicy {
            timeout: Duration::from_millis(250),
            ..GuardPolicy::default()
        };
        let guard =
            NavigationGuard::new(RouteTable::canonical(), oracle.clone(), scheduler.clone(), policy);

        let decision = decide(&guard, "/profile").await;
        assert!(matches!(
            decision,
            Decision::Redirect { reason: RedirectReason::SessionCheckTimedOut, .. }
        ));
        assert_eq!(oracle.finished.get(), 0);

        scheduler.run_detached().await;
        assert_eq!(oracle.finished.get(), 1);
    }

    #[tokio::test]
    async fn test_answered_check_leaves_nothing_running() {
        let scheduler = Rc::new(TestScheduler::default());
        let guard = NavigationGuard::new(
            RouteTable::canonical(),
            StubOracle::new(Behaviour::SignedIn),
            scheduler.clone(),
            GuardPolicy::default(),
        );
        decide(&guard, "/profile").await;
        assert!(scheduler.detached.borrow().is_empty());
    }

    fn allow(path: &str) -> Decision {
        Decision::Allow { path: path.to_string() }
    }

    fn to_login(reason: RedirectReason) -> Decision {
        Decision::Redirect {
            to: LOGIN_PATH.to_string(),
            reason,
        }
    }

    #[test]
    fn test_tracker_renders_only_after_own_navigation_allowed() {
        let mut tracker = NavigationTracker::new();
        assert!(!tracker.may_render("/admin"));

        let ticket = tracker.begin("/admin");
        assert!(!tracker.may_render("/admin"));
        assert_eq!(tracker.settle(&ticket, allow("/admin")), Settlement::Show);
        assert!(tracker.may_render("/admin"));
        assert!(!tracker.may_render("/profile"));
    }

    #[test]
    fn test_tracker_revisit_needs_fresh_decision() {
        let mut tracker = NavigationTracker::new();
        let first = tracker.begin("/admin");
        tracker.settle(&first, allow("/admin"));

        // Leave for /profile, then come back before /profile is decided.
        let profile = tracker.begin("/profile");
        assert!(!tracker.may_render("/admin"));
        let again = tracker.begin("/admin");
        assert!(!tracker.may_render("/admin"));

        assert_eq!(tracker.settle(&profile, allow("/profile")), Settlement::Superseded);
        assert!(!tracker.may_render("/admin"));

        // The session is gone by the time the second visit is decided.
        assert_eq!(
            tracker.settle(&again, to_login(RedirectReason::Unauthenticated)),
            Settlement::Replace {
                to: LOGIN_PATH.to_string(),
                reason: RedirectReason::Unauthenticated,
            }
        );
        assert!(!tracker.may_render("/admin"));
    }

    #[test]
    fn test_tracker_drops_older_decision_that_lands_last() {
        let mut tracker = NavigationTracker::new();
        let older = tracker.begin("/upload");
        let newer = tracker.begin("/posts");

        assert_eq!(tracker.settle(&newer, allow("/posts")), Settlement::Show);
        assert_eq!(
            tracker.settle(&older, to_login(RedirectReason::SessionCheckFailed)),
            Settlement::Superseded
        );
        assert!(tracker.may_render("/posts"));
    }

    #[test]
    fn test_tracker_redirect_replaces_instead_of_showing() {
        let mut tracker = NavigationTracker::new();
        let ticket = tracker.begin("/upload");
        let settlement = tracker.settle(&ticket, to_login(RedirectReason::SessionCheckTimedOut));
        assert_eq!(
            settlement,
            Settlement::Replace {
                to: "/login".to_string(),
                reason: RedirectReason::SessionCheckTimedOut,
            }
        );
        assert!(!tracker.may_render("/upload"));

        // The redirect itself is a new navigation.
        let login = tracker.begin("/login");
        assert_eq!(login.attempt.from.as_deref(), Some("/upload"));
        assert_eq!(tracker.settle(&login, allow("/login")), Settlement::Show);
        assert!(tracker.may_render("/login"));
    }

    #[tokio::test]
    async fn test_tracker_with_guard_keeps_only_latest_outcome() {
        let guard = guard(Behaviour::SignedOut);
        let mut tracker = NavigationTracker::new();

        let protected = tracker.begin("/admin");
        let public = tracker.begin("/posts/5");
        assert_eq!(protected.attempt.from, None);
        assert_eq!(public.attempt.from.as_deref(), Some("/admin"));

        let public_decision = guard.evaluate(&public.attempt).await;
        let protected_decision = guard.evaluate(&protected.attempt).await;

        assert_eq!(tracker.settle(&public, public_decision), Settlement::Show);
        assert_eq!(tracker.settle(&protected, protected_decision), Settlement::Superseded);
        assert!(tracker.may_render("/posts/5"));
    }

    #[test]
    fn test_failure_policy_parsing() {
        assert_eq!("closed".parse::<OracleFailurePolicy>(), Ok(OracleFailurePolicy::FailClosed));
        assert_eq!(" Open ".parse::<OracleFailurePolicy>(), Ok(OracleFailurePolicy::FailOpen));
        assert!("maybe".parse::<OracleFailurePolicy>().is_err());
    }
}
