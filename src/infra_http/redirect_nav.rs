use crate::domain_port::LoginRedirector;
use std::sync::atomic::{AtomicBool, Ordering};

/// Hard navigation to the login surface.
///
/// Outside a browser there is no page to leave, so the navigation is
/// latched for the host shell to act on; `take_pending` consumes the latch.
#[derive(Debug)]
pub struct NavRedirector {
    login_path: String,
    pending: AtomicBool,
}

impl NavRedirector {
    pub fn new(login_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
            pending: AtomicBool::new(false),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn take_pending(&self) -> bool {
        self.pending.swap(false, Ordering::SeqCst)
    }
}

impl LoginRedirector for NavRedirector {
    fn redirect_to_login(&self) {
        tracing::warn!("session terminated, navigating to {}", self.login_path);
        self.pending.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_latch_is_consumed_once() {
        let redirector = NavRedirector::new("/login");
        assert!(!redirector.take_pending());
        redirector.redirect_to_login();
        assert!(redirector.take_pending());
        assert!(!redirector.take_pending());
    }
}
