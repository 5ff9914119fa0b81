// Logged-out signal
// Fired once per terminal authentication failure, independent of the failing request

use std::sync::atomic::{AtomicUsize, Ordering};

/// Navigation facility invoked when the session ends involuntarily
pub trait LogoutHandler: Send + Sync {
    fn logged_out(&self);
}

/// Sends the client back to its login entry point.
///
/// A terminal client has no page to navigate to, so the redirect is recorded
/// and the front end (the `budget-cli` binary) checks `is_pending()` after a
/// failed command to tell the user where to log in again.
#[derive(Debug)]
pub struct LoginRedirect {
    login_path: String,
    redirects: AtomicUsize,
}

impl LoginRedirect {
    pub fn new(login_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
            redirects: AtomicUsize::new(0),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Number of redirects issued so far
    pub fn redirect_count(&self) -> usize {
        self.redirects.load(Ordering::SeqCst)
    }

    pub fn is_pending(&self) -> bool {
        self.redirect_count() > 0
    }
}

impl LogoutHandler for LoginRedirect {
    fn logged_out(&self) {
        self.redirects.fetch_add(1, Ordering::SeqCst);
        tracing::warn!(login_path = %self.login_path, "Session ended, redirecting to login");
    }
}
