//! Per-mount view state and the liveness token guarding async results.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::session::{PLACEHOLDER_CART_COUNT, SessionView};

/// Transient state owned by one mounted page.
///
/// `loading` starts `true` and flips to `false` exactly once, when the
/// session gate resolves. Later resolutions are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    loading: bool,
    search_term: String,
    cart_count: u32,
    session: SessionView,
}

impl ViewState {
    /// Fresh state for a page mount with the visitor's search input.
    #[must_use]
    pub fn new(search_term: impl Into<String>) -> Self {
        Self {
            loading: true,
            search_term: search_term.into(),
            cart_count: 0,
            session: SessionView::anonymous(),
        }
    }

    /// Record the session gate's outcome.
    ///
    /// Returns `false` without touching anything if the gate already
    /// resolved for this mount.
    pub fn resolve_session(&mut self, session: SessionView) -> bool {
        if !self.loading {
            return false;
        }
        self.cart_count = if session.is_authenticated {
            PLACEHOLDER_CART_COUNT
        } else {
            0
        };
        self.session = session;
        self.loading = false;
        true
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    #[must_use]
    pub const fn cart_count(&self) -> u32 {
        self.cart_count
    }

    #[must_use]
    pub const fn session(&self) -> &SessionView {
        &self.session
    }

    /// Header name, present only once a signed-in session resolved.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.session.display_name.as_deref()
    }
}

/// The active lifetime of a mounted page.
///
/// Dropping (or [`unmount`](Mount::unmount)ing) the mount invalidates every
/// [`Liveness`] handed out from it, so late async results are discarded
/// instead of mutating state for a page that is gone.
#[derive(Debug)]
pub struct Mount {
    alive: Arc<AtomicBool>,
}

impl Mount {
    #[must_use]
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    /// A token for work started on behalf of this mount.
    #[must_use]
    pub fn liveness(&self) -> Liveness {
        Liveness {
            alive: Arc::clone(&self.alive),
        }
    }

    /// End the mount explicitly.
    pub fn unmount(self) {
        drop(self);
    }
}

impl Default for Mount {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Mount {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::Release);
    }
}

/// Cheap, cloneable view of whether a [`Mount`] is still active.
#[derive(Debug, Clone)]
pub struct Liveness {
    alive: Arc<AtomicBool>,
}

impl Liveness {
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Pass `value` through only if the mount is still active.
    #[must_use]
    pub fn deliver<T>(&self, value: T) -> Option<T> {
        self.is_alive().then_some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Email;

    #[test]
    fn test_loading_resolves_once() {
        let mut view = ViewState::new("");
        assert!(view.is_loading());

        let jane = SessionView::authenticated(None, Some(&Email::new("jane@x.com")));
        assert!(view.resolve_session(jane));
        assert!(!view.is_loading());
        assert_eq!(view.display_name(), Some("jane"));
        assert_eq!(view.cart_count(), 3);

        // A second resolution never reverts or overwrites.
        assert!(!view.resolve_session(SessionView::anonymous()));
        assert!(!view.is_loading());
        assert_eq!(view.display_name(), Some("jane"));
    }

    #[test]
    fn test_anonymous_resolution() {
        let mut view = ViewState::new("lamp");
        assert!(view.resolve_session(SessionView::anonymous()));
        assert!(!view.is_loading());
        assert_eq!(view.display_name(), None);
        assert_eq!(view.cart_count(), 0);
        assert_eq!(view.search_term(), "lamp");
    }

    #[test]
    fn test_liveness_follows_mount() {
        let mount = Mount::new();
        let token = mount.liveness();
        let copy = token.clone();
        assert!(token.is_alive());
        assert_eq!(token.deliver(7), Some(7));

        mount.unmount();
        assert!(!token.is_alive());
        assert!(!copy.is_alive());
        assert_eq!(copy.deliver("late"), None);
    }

    #[test]
    fn test_liveness_dropped_mount() {
        let token = {
            let mount = Mount::default();
            mount.liveness()
        };
        assert_eq!(token.deliver(()), None);
    }
}
