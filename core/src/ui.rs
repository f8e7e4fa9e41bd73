//! Loading indicator and error banner state.
//!
//! # Design
//! The banner and the loading flag are an explicit `UiState` value rather
//! than ambient globals, and rendering reads them through a pure function.
//! Each error banner carries its own deadline, and showing a new banner
//! replaces the old one together with its deadline, so an auto-hide that
//! belongs to an older banner can never hide a newer one.
//!
//! Time is read through `Clock` so tests can advance it by hand.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// How long an error banner stays visible without further action.
pub const ERROR_DISPLAY_DURATION: Duration = Duration::from_secs(5);

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Shared count of in-flight API calls. Loading is shown while it is non-zero.
///
/// Clones observe the same counter, so a transport can check that the
/// indicator is raised while it runs.
#[derive(Debug, Clone, Default)]
pub struct LoadingIndicator {
    in_flight: Arc<AtomicUsize>,
}

impl LoadingIndicator {
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Raise the indicator until the returned guard is dropped.
    pub fn start(&self) -> LoadingGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        LoadingGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

/// Lowers the loading indicator on drop, including during unwinding.
#[must_use = "the loading indicator is lowered as soon as the guard is dropped"]
#[derive(Debug)]
pub struct LoadingGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A visible error message and the instant it hides itself.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Banner {
    message: String,
    expires_at: Instant,
}

#[derive(Debug, Default)]
pub struct UiState {
    loading: LoadingIndicator,
    banner: Option<Banner>,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loading(&self) -> &LoadingIndicator {
        &self.loading
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.banner.as_ref().map(|banner| banner.message.as_str())
    }

    /// Show `message`, replacing any current banner and its pending auto-hide.
    pub fn show_error(&mut self, message: impl Into<String>, now: Instant) {
        self.banner = Some(Banner {
            message: message.into(),
            expires_at: now + ERROR_DISPLAY_DURATION,
        });
    }

    pub fn hide_error(&mut self) {
        self.banner = None;
    }

    /// Hide the banner if its deadline has passed.
    pub fn tick(&mut self, now: Instant) {
        if self.banner.as_ref().is_some_and(|b| now >= b.expires_at) {
            self.banner = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_guard_resets_on_drop() {
        let ui = UiState::new();
        {
            let _outer = ui.loading().start();
            let _inner = ui.loading().start();
            assert!(ui.is_loading());
        }
        assert!(!ui.is_loading());
    }

    #[test]
    fn loading_guard_resets_during_unwind() {
        let indicator = LoadingIndicator::default();
        let observed = indicator.clone();
        let result = std::panic::catch_unwind(move || {
            let _guard = indicator.start();
            panic!("transport blew up");
        });
        assert!(result.is_err());
        assert!(!observed.is_loading());
    }

    #[test]
    fn banner_hides_after_five_seconds() {
        let clock = ManualClock::new();
        let mut ui = UiState::new();
        ui.show_error("db down", clock.now());

        clock.advance(Duration::from_millis(4_999));
        ui.tick(clock.now());
        assert_eq!(ui.error_message(), Some("db down"));

        clock.advance(Duration::from_millis(1));
        ui.tick(clock.now());
        assert_eq!(ui.error_message(), None);
    }

    #[test]
    fn newer_error_is_not_hidden_by_older_deadline() {
        let clock = ManualClock::new();
        let mut ui = UiState::new();
        ui.show_error("first", clock.now());

        clock.advance(Duration::from_secs(3));
        ui.show_error("second", clock.now());

        // Past the first banner's deadline.
        clock.advance(Duration::from_secs(2));
        ui.tick(clock.now());
        assert_eq!(ui.error_message(), Some("second"));

        clock.advance(Duration::from_secs(3));
        ui.tick(clock.now());
        assert_eq!(ui.error_message(), None);
    }

    #[test]
    fn hide_error_is_immediate() {
        let mut ui = UiState::new();
        ui.show_error("oops", Instant::now());
        ui.hide_error();
        assert_eq!(ui.error_message(), None);
    }
}
