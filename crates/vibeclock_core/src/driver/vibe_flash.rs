//! "What vibe is it?" flash overlay.
//!
//! # Responsibility
//! - Compose a random overlay message for theme changes and surprise flashes.
//! - Auto-dismiss each overlay after a fixed delay.
//! - Run the surprise scheduler, re-armed after every firing.
//!
//! # Invariants
//! - The first theme observed never triggers a flash; later changes do.
//! - Stopping the controller cancels the surprise and dismiss timers.

use crate::model::theme::Theme;
use crate::schedule::{DelayWindow, Scheduler, TimerHandle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Headline pool. Repeats weight the classic line.
pub const VIBE_MESSAGES: [&str; 8] = [
    "What vibe is it?",
    "What vibe is it?",
    "What vibe is it?",
    "Vibe check! ✨",
    "It's vibe o'clock somewhere.",
    "Time is a vibe.",
    "New vibe unlocked.",
    "Vibes transcend time zones.",
];

/// Tagline pool shown under the headline.
pub const SUB_MESSAGES: [&str; 6] = [
    "— Vibe O'Clock",
    "🌍 across all time zones",
    "⚡ powered by vibes",
    "✦ the clock never lies",
    "🎯 right here, right now",
    "🔮 the future is now",
];

const FLASH_HUE_MIN: f64 = 60.0;
const FLASH_HUE_MAX: f64 = 110.0;

/// Overlay timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashTiming {
    /// Visible time before auto-dismiss.
    pub dismiss_after: Duration,
    /// Delay range between surprise flashes.
    pub surprise_window: DelayWindow,
}

impl Default for FlashTiming {
    fn default() -> Self {
        Self {
            dismiss_after: Duration::from_millis(2_500),
            surprise_window: DelayWindow::new(
                Duration::from_millis(180_000),
                Duration::from_millis(420_000),
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Theme,
    Surprise,
}

/// Content of one flash.
#[derive(Debug, Clone, PartialEq)]
pub struct FlashOverlay {
    pub kind: FlashKind,
    pub message: &'static str,
    pub sub_message: &'static str,
    /// Theme-dependent accent colour.
    pub accent: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlashEvent {
    Shown(FlashOverlay),
    Dismissed,
}

/// Picks message, tagline, and accent hue for a flash.
pub fn compose_flash<R: Rng + ?Sized>(kind: FlashKind, theme: Theme, rng: &mut R) -> FlashOverlay {
    let message = VIBE_MESSAGES[rng.random_range(0..VIBE_MESSAGES.len())];
    let sub_message = SUB_MESSAGES[rng.random_range(0..SUB_MESSAGES.len())];
    let hue = rng.random_range(FLASH_HUE_MIN..FLASH_HUE_MAX);
    FlashOverlay {
        kind,
        message,
        sub_message,
        accent: theme.flash_color(hue),
    }
}

/// Detects theme changes, ignoring the initial observation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThemeWatch {
    last: Option<Theme>,
}

impl ThemeWatch {
    /// Records `theme`; `true` when it differs from a previous observation.
    pub fn observe(&mut self, theme: Theme) -> bool {
        let changed = self.last.is_some_and(|last| last != theme);
        self.last = Some(theme);
        changed
    }
}

type FlashSink = Arc<dyn Fn(FlashEvent) + Send + Sync>;

/// Owns the surprise scheduler and the dismiss timer of one overlay view.
pub struct VibeFlashController {
    scheduler: Scheduler,
    timing: FlashTiming,
    sink: FlashSink,
    theme: Arc<Mutex<Theme>>,
    watch: ThemeWatch,
    rng: StdRng,
    surprise: TimerHandle,
    dismiss: TimerHandle,
}

impl VibeFlashController {
    /// Starts surprise flashes with OS-seeded randomness.
    pub fn start<F>(scheduler: Scheduler, timing: FlashTiming, theme: Theme, sink: F) -> Self
    where
        F: Fn(FlashEvent) + Send + Sync + 'static,
    {
        Self::start_with_rng(scheduler, timing, theme, StdRng::from_os_rng(), sink)
    }

    /// Starts surprise flashes with a caller-provided generator.
    pub fn start_with_rng<F>(
        scheduler: Scheduler,
        timing: FlashTiming,
        theme: Theme,
        mut rng: StdRng,
        sink: F,
    ) -> Self
    where
        F: Fn(FlashEvent) + Send + Sync + 'static,
    {
        let sink: FlashSink = Arc::new(sink);
        let shared_theme = Arc::new(Mutex::new(theme));
        let delay_rng = StdRng::seed_from_u64(rng.random());
        let compose_rng = StdRng::seed_from_u64(rng.random());
        let surprise = spawn_surprise_loop(
            &scheduler,
            timing,
            Arc::clone(&shared_theme),
            (delay_rng, compose_rng),
            Arc::clone(&sink),
        );

        let mut watch = ThemeWatch::default();
        watch.observe(theme);

        Self {
            scheduler,
            timing,
            sink,
            theme: shared_theme,
            watch,
            rng,
            surprise,
            dismiss: TimerHandle::inert(),
        }
    }

    /// Reports the current theme; a change shows a theme flash.
    ///
    /// Returns `true` when a flash was shown.
    pub fn on_theme(&mut self, theme: Theme) -> bool {
        *self.theme.lock().unwrap_or_else(PoisonError::into_inner) = theme;
        if !self.watch.observe(theme) {
            return false;
        }
        self.show(FlashKind::Theme, theme);
        true
    }

    /// Shows a flash right away, restarting the dismiss timer.
    pub fn show(&mut self, kind: FlashKind, theme: Theme) {
        let overlay = compose_flash(kind, theme, &mut self.rng);
        (self.sink)(FlashEvent::Shown(overlay));

        let sink = Arc::clone(&self.sink);
        self.dismiss = self
            .scheduler
            .once(self.timing.dismiss_after, move || sink(FlashEvent::Dismissed));
    }

    /// Cancels every pending flash timer.
    pub fn stop(&mut self) {
        self.surprise.cancel();
        self.dismiss.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.surprise.is_active()
    }
}

fn spawn_surprise_loop(
    scheduler: &Scheduler,
    timing: FlashTiming,
    theme: Arc<Mutex<Theme>>,
    (delay_rng, mut compose_rng): (StdRng, StdRng),
    sink: FlashSink,
) -> TimerHandle {
    let dismisser = scheduler.clone();
    // Dropped with the loop task, which cancels any pending dismiss.
    let mut pending_dismiss = TimerHandle::inert();
    scheduler.repeat_randomized(timing.surprise_window, delay_rng, move || {
        let current = *theme.lock().unwrap_or_else(PoisonError::into_inner);
        sink(FlashEvent::Shown(compose_flash(
            FlashKind::Surprise,
            current,
            &mut compose_rng,
        )));
        let sink = Arc::clone(&sink);
        pending_dismiss.cancel();
        pending_dismiss = dismisser.once(timing.dismiss_after, move || sink(FlashEvent::Dismissed));
    })
}

#[cfg(test)]
mod tests {
    use super::{compose_flash, FlashKind, ThemeWatch, SUB_MESSAGES, VIBE_MESSAGES};
    use crate::model::theme::Theme;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn theme_watch_ignores_first_observation() {
        let mut watch = ThemeWatch::default();
        assert!(!watch.observe(Theme::Dark));
        assert!(!watch.observe(Theme::Dark));
        assert!(watch.observe(Theme::Light));
        assert!(watch.observe(Theme::Dark));
    }

    #[test]
    fn composed_flash_uses_known_messages_and_theme_colour() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..50 {
            let overlay = compose_flash(FlashKind::Surprise, Theme::Light, &mut rng);
            assert!(VIBE_MESSAGES.contains(&overlay.message));
            assert!(SUB_MESSAGES.contains(&overlay.sub_message));
            assert!(overlay.accent.starts_with("oklch(0.55 0.15 "));
        }
    }
}
