// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Entrance animation for line charts.
//!
//! The sequence starts the first time the chart is visible with data. The line is revealed
//! progressively, then the interval band and the overlays (labels, annotations, regression
//! line) fade in together. Time is supplied by the caller as a monotonic [`Duration`], so the
//! sequencer is independent of any animation runtime.

use core::time::Duration;

/// Line entrance animation setting.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum AnimateLine {
    /// Render everything immediately.
    Off,
    /// 5 s line reveal followed by a 0.5 s fade.
    #[default]
    Default,
    /// `n` s line reveal followed by an `n` s fade.
    Seconds(f64),
}

impl AnimateLine {
    /// `(path duration, fade duration)` in seconds.
    fn timing(self) -> (f64, f64) {
        match self {
            Self::Off => (0.0, 0.0),
            Self::Default => (5.0, 0.5),
            Self::Seconds(n) => (n.max(0.0), n.max(0.0)),
        }
    }
}

/// Animation phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnimationPhase {
    /// Waiting for the chart to become visible with data.
    #[default]
    NotStarted,
    /// The line is being revealed.
    PathDrawing,
    /// The band and overlays are fading in.
    BandsFading,
    /// Everything is fully shown.
    Done,
}

/// Animated properties at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationFrame {
    /// Current phase.
    pub phase: AnimationPhase,
    /// Revealed fraction of the line path, in `[0, 1]`.
    pub path_reveal: f64,
    /// Interval band opacity, in `[0, 1]`.
    pub band_opacity: f64,
    /// Opacity of labels, annotations and the regression line, in `[0, 1]`.
    pub overlay_opacity: f64,
}

impl AnimationFrame {
    /// Everything fully shown.
    pub const DONE: Self = Self {
        phase: AnimationPhase::Done,
        path_reveal: 1.0,
        band_opacity: 1.0,
        overlay_opacity: 1.0,
    };

    /// Nothing shown yet.
    pub const HIDDEN: Self = Self {
        phase: AnimationPhase::NotStarted,
        path_reveal: 0.0,
        band_opacity: 0.0,
        overlay_opacity: 0.0,
    };
}

/// Drives one chart's entrance animation.
#[derive(Clone, Debug, Default)]
pub struct AnimationSequencer {
    setting: AnimateLine,
    started_at: Option<Duration>,
}

impl AnimationSequencer {
    /// Creates a sequencer that has not started.
    pub fn new(setting: AnimateLine) -> Self {
        Self {
            setting,
            started_at: None,
        }
    }

    /// The animation setting.
    pub fn setting(&self) -> AnimateLine {
        self.setting
    }

    /// Reports a visibility observation.
    ///
    /// Starts the sequence the first time the chart is visible with data; later calls are
    /// ignored. Returns `true` if this call started it.
    pub fn notify_visible(&mut self, now: Duration, has_data: bool) -> bool {
        if self.started_at.is_some() || !has_data {
            return false;
        }
        tracing::debug!(setting = ?self.setting, "line animation started");
        self.started_at = Some(now);
        true
    }

    /// Returns `true` once the sequence has been started.
    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Animated properties at `now`.
    pub fn frame(&self, now: Duration) -> AnimationFrame {
        if self.setting == AnimateLine::Off {
            return AnimationFrame::DONE;
        }
        let Some(start) = self.started_at else {
            return AnimationFrame::HIDDEN;
        };
        let (path, fade) = self.setting.timing();
        let t = now.saturating_sub(start).as_secs_f64();

        let path_reveal = progress(t, 0.0, path);
        let fade_in = progress(t, path, fade);
        let phase = if t < path {
            AnimationPhase::PathDrawing
        } else if t < path + fade {
            AnimationPhase::BandsFading
        } else {
            AnimationPhase::Done
        };
        AnimationFrame {
            phase,
            path_reveal,
            band_opacity: fade_in,
            overlay_opacity: fade_in,
        }
    }
}

/// Linear progress of a transition starting at `delay` and lasting `duration`.
fn progress(t: f64, delay: f64, duration: f64) -> f64 {
    if t < delay {
        0.0
    } else if duration <= 0.0 {
        1.0
    } else {
        ((t - delay) / duration).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    #[test]
    fn default_sequence_draws_then_fades() {
        let mut seq = AnimationSequencer::new(AnimateLine::Default);
        assert_eq!(seq.frame(secs(1.0)), AnimationFrame::HIDDEN);
        assert!(seq.notify_visible(secs(10.0), true));

        let f = seq.frame(secs(12.5));
        assert_eq!(f.phase, AnimationPhase::PathDrawing);
        assert!((f.path_reveal - 0.5).abs() < 1e-9, "half way through the line");
        assert_eq!(f.band_opacity, 0.0);

        let f = seq.frame(secs(15.25));
        assert_eq!(f.phase, AnimationPhase::BandsFading);
        assert_eq!(f.path_reveal, 1.0);
        assert!((f.band_opacity - 0.5).abs() < 1e-9, "half way through the fade");
        assert_eq!(f.band_opacity, f.overlay_opacity);

        assert_eq!(seq.frame(secs(15.5)), AnimationFrame::DONE);
    }

    #[test]
    fn starts_only_once_and_only_with_data() {
        let mut seq = AnimationSequencer::new(AnimateLine::Seconds(2.0));
        assert!(!seq.notify_visible(secs(0.0), false));
        assert!(!seq.is_started());
        assert!(seq.notify_visible(secs(1.0), true));
        assert!(!seq.notify_visible(secs(50.0), true), "re-entry does not restart");
        assert_eq!(seq.frame(secs(2.0)).phase, AnimationPhase::PathDrawing);
        assert_eq!(seq.frame(secs(4.0)).phase, AnimationPhase::BandsFading);
        assert_eq!(seq.frame(secs(5.0)).phase, AnimationPhase::Done);
    }

    #[test]
    fn off_is_done_immediately() {
        let seq = AnimationSequencer::new(AnimateLine::Off);
        assert_eq!(seq.frame(Duration::ZERO), AnimationFrame::DONE);
    }

    #[test]
    fn zero_seconds_completes_on_start() {
        let mut seq = AnimationSequencer::new(AnimateLine::Seconds(0.0));
        seq.notify_visible(secs(3.0), true);
        assert_eq!(seq.frame(secs(3.0)), AnimationFrame::DONE);
    }
}
