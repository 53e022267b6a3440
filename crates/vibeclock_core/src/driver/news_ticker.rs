//! Rotating headline ticker for one city card.

use crate::schedule::{Scheduler, TimerHandle};
use std::time::Duration;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};

/// Ticker cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewsTiming {
    /// Time between rotations.
    pub rotate_every: Duration,
    /// Fade-out before the next headline appears.
    pub fade: Duration,
}

impl Default for NewsTiming {
    fn default() -> Self {
        Self {
            rotate_every: Duration::from_secs(5),
            fade: Duration::from_millis(400),
        }
    }
}

/// Ticker output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewsEvent {
    /// Headline `index` starts fading out.
    FadeOut { index: usize },
    /// Headline `index` is now shown.
    Show { index: usize },
}

/// Cyclic headline cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewsRotation {
    len: usize,
    index: usize,
}

impl NewsRotation {
    /// `None` when there is nothing to rotate.
    pub fn new(len: usize) -> Option<Self> {
        (len > 0).then_some(Self { len, index: 0 })
    }

    pub fn current(&self) -> usize {
        self.index
    }

    /// Steps to the next headline, wrapping to the first.
    pub fn advance(&mut self) -> usize {
        self.index = (self.index + 1) % self.len;
        self.index
    }
}

/// Starts rotating `headline_count` headlines.
///
/// The fade-out fires every `rotate_every` from start; the next headline shows
/// `fade` later. Zero headlines schedule nothing.
pub fn start_news_ticker<F>(
    scheduler: &Scheduler,
    headline_count: usize,
    timing: NewsTiming,
    mut on_event: F,
) -> TimerHandle
where
    F: FnMut(NewsEvent) + Send + 'static,
{
    let Some(mut rotation) = NewsRotation::new(headline_count) else {
        return TimerHandle::inert();
    };
    let rotate_every = timing.rotate_every.max(crate::schedule::MIN_PERIOD);

    scheduler.spawn(move |flag| async move {
        let mut ticks = interval_at(Instant::now() + rotate_every, rotate_every);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticks.tick().await;
            if flag.is_cancelled() {
                break;
            }
            on_event(NewsEvent::FadeOut {
                index: rotation.current(),
            });

            sleep(timing.fade).await;
            if flag.is_cancelled() {
                break;
            }
            let index = rotation.advance();
            on_event(NewsEvent::Show { index });
        }
    })
}

#[cfg(test)]
mod tests {
    use super::NewsRotation;

    #[test]
    fn rotation_wraps_around() {
        let mut rotation = NewsRotation::new(3).unwrap();
        assert_eq!(rotation.current(), 0);
        assert_eq!(rotation.advance(), 1);
        assert_eq!(rotation.advance(), 2);
        assert_eq!(rotation.advance(), 0);
    }

    #[test]
    fn empty_rotation_is_none() {
        assert!(NewsRotation::new(0).is_none());
    }
}
