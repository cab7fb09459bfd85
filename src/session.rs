// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session lifecycle against the cloud API.
//!
//! Logging in is a plain `GET` on the login page; the API answers (usually
//! with a redirect) carrying a `remember` cookie whose value is the session
//! token. The token is then attached to every method call.
//!
//! Sessions silently expire server-side, so the token is renewed on a fixed
//! schedule by a background task (see [`spawn_auto_relogin`]).

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::Error;
use crate::protocol::{HttpRequest, TOKEN_COOKIE_NAME, Transport};

/// Login page path.
pub const LOGIN_PATH: &str = "/en/login/";

/// Number of login attempts per [`SessionManager::auto_relogin`] run.
pub const MAX_LOGIN_ATTEMPTS: u32 = 2;

/// Interval between two scheduled re-logins.
pub const AUTO_RELOGIN_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);

/// Shortest period accepted by [`spawn_auto_relogin`].
pub const MIN_RELOGIN_PERIOD: Duration = Duration::from_secs(60);

/// Account credentials for the cloud API.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    login: String,
    password: String,
}

impl Credentials {
    /// Creates credentials from a login and a password.
    #[must_use]
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }

    /// Returns the account login.
    #[must_use]
    pub fn login(&self) -> &str {
        &self.login
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Authentication state of the single session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    authenticated: bool,
    token: Option<String>,
}

impl Session {
    /// Returns true if a login succeeded and has not been invalidated since.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Returns the session token, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

/// Acquires and renews the session token.
pub struct SessionManager<P: Transport> {
    transport: Arc<P>,
    credentials: Credentials,
    session: RwLock<Session>,
}

impl<P: Transport> SessionManager<P> {
    /// Creates a manager with no session.
    #[must_use]
    pub fn new(transport: Arc<P>, credentials: Credentials) -> Self {
        Self {
            transport,
            credentials,
            session: RwLock::new(Session::default()),
        }
    }

    /// Returns a snapshot of the session.
    #[must_use]
    pub fn session(&self) -> Session {
        self.session.read().clone()
    }

    /// Returns true if a valid session is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.read().authenticated
    }

    /// Returns the token if the session is authenticated.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        let session = self.session.read();
        if session.authenticated {
            session.token.clone()
        } else {
            None
        }
    }

    /// Drops the current session.
    pub fn invalidate(&self) {
        *self.session.write() = Session::default();
    }

    /// Logs in with the configured credentials.
    ///
    /// On success the session holds the new token. On failure any previous
    /// token is discarded.
    ///
    /// # Errors
    ///
    /// Returns `Error::Auth` if the request fails or the response carries no
    /// token.
    pub async fn login(&self) -> Result<String, Error> {
        let request = HttpRequest::get(LOGIN_PATH)
            .with_query("login[username]", self.credentials.login.as_str())
            .with_query("login[password]", self.credentials.password.as_str());

        let outcome = match self.transport.get(&request).await {
            Ok(response) => extract_token(response.set_cookies()).ok_or_else(|| {
                Error::Auth(format!(
                    "API did not send a token back (HTTP {}, {} cookie(s))",
                    response.status(),
                    response.set_cookies().len()
                ))
            }),
            Err(e) => Err(Error::Auth(format!("authentication rejected by API: {e}"))),
        };

        match outcome {
            Ok(token) => {
                *self.session.write() = Session {
                    authenticated: true,
                    token: Some(token.clone()),
                };
                tracing::debug!("Retrieved a session token");
                Ok(token)
            }
            Err(e) => {
                self.invalidate();
                Err(e)
            }
        }
    }

    /// Runs [`MAX_LOGIN_ATTEMPTS`] login attempts and logs each outcome.
    ///
    /// Every attempt runs even when an earlier one succeeded. Returns whether
    /// the session is authenticated afterwards.
    pub async fn auto_relogin(&self, is_initial: bool) -> bool {
        for attempt in 1..=MAX_LOGIN_ATTEMPTS {
            if is_initial {
                tracing::info!(attempt, "First log-in");
            } else {
                tracing::info!(attempt, "Attempting auto log-in");
            }

            match self.login().await {
                Ok(_) if is_initial => tracing::info!(attempt, "Successfully logged-in"),
                Ok(_) => tracing::info!(
                    attempt,
                    "Successfully logged-in automatically after set delay"
                ),
                Err(e) => tracing::error!(
                    attempt,
                    login = %self.credentials.login,
                    error = %e,
                    "Could not log-in"
                ),
            }
        }
        self.is_authenticated()
    }
}

impl<P: Transport> fmt::Debug for SessionManager<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("credentials", &self.credentials)
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

/// Extracts the session token from `Set-Cookie` header values.
///
/// The first cookie named `remember` with a non-empty value wins.
///
/// # Examples
///
/// ```
/// use pellet_stove_lib::session::extract_token;
///
/// let cookies = vec![
///     "PHPSESSID=xyz; path=/".to_string(),
///     "remember=abc123; expires=Thu, 01 Jan 2099 00:00:00 GMT; path=/".to_string(),
/// ];
/// assert_eq!(extract_token(&cookies), Some("abc123".to_string()));
/// ```
#[must_use]
pub fn extract_token(set_cookies: &[String]) -> Option<String> {
    set_cookies.iter().find_map(|cookie| {
        let pair = cookie.split(';').next()?;
        let (name, value) = pair.split_once('=')?;
        (name == TOKEN_COOKIE_NAME && !value.is_empty()).then(|| value.to_string())
    })
}

/// Handle to the background re-login task.
///
/// Dropping the handle aborts the task; [`shutdown`](Self::shutdown) stops it
/// gracefully.
#[derive(Debug)]
pub struct AutoRelogin {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl AutoRelogin {
    /// Stops the task and waits for it to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    /// Returns true once the task has stopped.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

impl Drop for AutoRelogin {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Spawns the re-login task.
///
/// The task logs in right away (`is_initial = true`), then again every
/// `period`. A run that overruns its slot makes the next tick be skipped, so
/// two runs never overlap. Periods shorter than [`MIN_RELOGIN_PERIOD`] are
/// raised to it.
pub fn spawn_auto_relogin<P>(session: Arc<SessionManager<P>>, period: Duration) -> AutoRelogin
where
    P: Transport + 'static,
{
    if period < MIN_RELOGIN_PERIOD {
        tracing::warn!(
            requested_secs = period.as_secs_f64(),
            applied_secs = MIN_RELOGIN_PERIOD.as_secs(),
            "Auto log-in period too short, using minimum"
        );
    }
    let period = period.max(MIN_RELOGIN_PERIOD);
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let mut ticks = tokio::time::interval(period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut is_initial = true;

        loop {
            let initial = is_initial;
            let session = &session;
            let ticks = &mut ticks;
            let run = async move {
                ticks.tick().await;
                session.auto_relogin(initial).await
            };

            tokio::select! {
                _ = &mut shutdown_rx => break,
                authenticated = run => {
                    is_initial = false;
                    tracing::debug!(authenticated, "Scheduled log-in finished");
                }
            }
        }

        tracing::debug!("Auto log-in task stopped");
    });

    AutoRelogin {
        shutdown: Some(shutdown_tx),
        task: Some(task),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeTransport, login_response, status_envelope};

    fn manager(transport: &Arc<FakeTransport>) -> SessionManager<FakeTransport> {
        SessionManager::new(Arc::clone(transport), Credentials::new("me@x.org", "pw"))
    }

    #[test]
    fn extract_token_takes_first_match() {
        let cookies = vec![
            "remember=first; path=/".to_string(),
            "remember=second; path=/".to_string(),
        ];
        assert_eq!(extract_token(&cookies), Some("first".to_string()));
    }

    #[test]
    fn extract_token_ignores_other_cookies() {
        let cookies = vec![
            "remembered=nope".to_string(),
            "PHPSESSID=abc".to_string(),
            "remember=; path=/".to_string(),
        ];
        assert_eq!(extract_token(&cookies), None);
        assert_eq!(extract_token(&[]), None);
    }

    #[test]
    fn credentials_debug_redacts_password() {
        let debug = format!("{:?}", Credentials::new("me", "secret"));
        assert!(debug.contains("me"));
        assert!(!debug.contains("secret"));
    }

    #[tokio::test]
    async fn login_stores_token() {
        let transport = Arc::new(FakeTransport::new());
        transport.push_ok(login_response("tok"));
        let session = manager(&transport);

        assert_eq!(session.login().await.unwrap(), "tok");
        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some("tok".to_string()));

        let request = &transport.requests()[0];
        assert_eq!(request.path(), LOGIN_PATH);
        assert_eq!(request.query_value("login[username]"), Some("me@x.org"));
        assert_eq!(request.query_value("login[password]"), Some("pw"));
        assert_eq!(request.cookie(), None);
    }

    #[tokio::test]
    async fn login_without_token_clears_session() {
        let transport = Arc::new(FakeTransport::new());
        transport.push_ok(login_response("tok"));
        transport.push_ok(status_envelope(0));
        let session = manager(&transport);

        session.login().await.unwrap();
        let err = session.login().await.unwrap_err();

        assert!(matches!(err, Error::Auth(_)));
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
    }

    #[tokio::test]
    async fn login_transport_failure_is_auth_error() {
        let transport = Arc::new(FakeTransport::new());
        transport.push_timeout();
        let session = manager(&transport);

        assert!(matches!(session.login().await, Err(Error::Auth(_))));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn auto_relogin_runs_every_attempt() {
        let transport = Arc::new(FakeTransport::new());
        transport.push_ok(login_response("one"));
        transport.push_ok(login_response("two"));
        let session = manager(&transport);

        assert!(session.auto_relogin(true).await);
        assert_eq!(transport.request_count(), 2);
        assert_eq!(session.token(), Some("two".to_string()));
    }

    #[tokio::test]
    async fn auto_relogin_last_failure_wins() {
        let transport = Arc::new(FakeTransport::new());
        transport.push_ok(login_response("one"));
        transport.push_timeout();
        let session = manager(&transport);

        assert!(!session.auto_relogin(false).await);
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn scheduled_relogin_runs_on_period_and_stops() {
        let transport = Arc::new(FakeTransport::new());
        for i in 0..6 {
            transport.push_ok(login_response(&format!("t{i}")));
        }
        let session = Arc::new(manager(&transport));

        let handle = spawn_auto_relogin(Arc::clone(&session), AUTO_RELOGIN_PERIOD);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(transport.request_count(), 2);

        tokio::time::sleep(AUTO_RELOGIN_PERIOD).await;
        assert_eq!(transport.request_count(), 4);

        handle.shutdown().await;
        tokio::time::sleep(AUTO_RELOGIN_PERIOD * 2).await;
        assert_eq!(transport.request_count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_period_is_raised_to_minimum() {
        let transport = Arc::new(FakeTransport::new());
        for i in 0..6 {
            transport.push_ok(login_response(&format!("t{i}")));
        }
        let session = Arc::new(manager(&transport));

        let handle = spawn_auto_relogin(Arc::clone(&session), Duration::ZERO);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(transport.request_count(), 2);
        assert!(!handle.is_finished());

        tokio::time::sleep(MIN_RELOGIN_PERIOD).await;
        assert_eq!(transport.request_count(), 4);
        assert!(!handle.is_finished());

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handle_stops_task() {
        let transport = Arc::new(FakeTransport::new());
        for i in 0..4 {
            transport.push_ok(login_response(&format!("t{i}")));
        }
        let session = Arc::new(manager(&transport));

        let handle = spawn_auto_relogin(Arc::clone(&session), AUTO_RELOGIN_PERIOD);
        tokio::time::sleep(Duration::from_secs(1)).await;
        drop(handle);

        tokio::time::sleep(AUTO_RELOGIN_PERIOD * 2).await;
        assert_eq!(transport.request_count(), 2);
    }
}
