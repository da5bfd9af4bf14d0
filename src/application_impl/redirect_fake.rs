use crate::domain_port::LoginRedirector;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts forced-logout navigations instead of performing them.
#[derive(Debug, Default)]
pub struct FakeRedirector {
    hits: AtomicUsize,
}

impl FakeRedirector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl LoginRedirector for FakeRedirector {
    fn redirect_to_login(&self) {
        self.hits.fetch_add(1, Ordering::SeqCst);
    }
}
