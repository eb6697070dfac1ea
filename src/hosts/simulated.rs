use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use crate::hosts::Clocked;
use crate::ui::page::MediaSurface;

#[derive(Debug)]
struct SimState {
    paused: bool,
    current_time: f64,
    duration: f64,
    volume: f64,
    playback_rate: f64,
    last_update: Instant,
}

/// A media surface that plays nothing but keeps time like one.
///
/// The playhead advances with the wall clock at the playback rate while
/// playing and stops at the end of the media.
#[derive(Debug, Clone)]
pub struct SimulatedVideo {
    source: Rc<str>,
    state: Rc<RefCell<SimState>>,
}

impl SimulatedVideo {
    /// `duration` of `None` behaves like media whose metadata has not loaded.
    pub fn new(duration: Option<f64>) -> Self {
        Self::with_source("", duration)
    }

    pub fn with_source(source: &str, duration: Option<f64>) -> Self {
        Self {
            source: Rc::from(source),
            state: Rc::new(RefCell::new(SimState {
                paused: true,
                current_time: 0.0,
                duration: duration.unwrap_or(f64::NAN),
                volume: 1.0,
                playback_rate: 1.0,
                last_update: Instant::now(),
            })),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Marks the media's length as known.
    pub fn set_duration(&self, duration: f64) {
        self.state.borrow_mut().duration = duration;
    }

    /// Moves the playhead as if `seconds` of wall time had passed.
    pub fn advance_by(&self, seconds: f64) -> bool {
        let mut state = self.state.borrow_mut();
        if state.paused {
            return false;
        }
        let before = state.current_time;
        let mut next = before + seconds * state.playback_rate;
        if state.duration.is_finite() && next >= state.duration {
            next = state.duration;
            state.paused = true;
            tracing::debug!("Simulated playback of '{}' ended", self.source);
        }
        state.current_time = next.max(0.0);
        state.current_time != before
    }
}

impl Clocked for SimulatedVideo {
    fn advance(&self) -> bool {
        let elapsed = {
            let mut state = self.state.borrow_mut();
            let now = Instant::now();
            let elapsed = now.duration_since(state.last_update).as_secs_f64();
            state.last_update = now;
            elapsed
        };
        self.advance_by(elapsed)
    }
}

impl MediaSurface for SimulatedVideo {
    fn paused(&self) -> bool {
        self.state.borrow().paused
    }

    fn play(&self) {
        let mut state = self.state.borrow_mut();
        if state.duration.is_finite() && state.current_time >= state.duration {
            state.current_time = 0.0;
        }
        state.paused = false;
        state.last_update = Instant::now();
    }

    fn pause(&self) {
        self.state.borrow_mut().paused = true;
    }

    fn current_time(&self) -> f64 {
        self.state.borrow().current_time
    }

    fn set_current_time(&self, seconds: f64) {
        let mut state = self.state.borrow_mut();
        let upper = if state.duration.is_finite() {
            state.duration
        } else {
            f64::INFINITY
        };
        state.current_time = seconds.clamp(0.0, upper);
    }

    fn duration(&self) -> f64 {
        self.state.borrow().duration
    }

    fn volume(&self) -> f64 {
        self.state.borrow().volume
    }

    fn set_volume(&self, volume: f64) {
        self.state.borrow_mut().volume = volume.clamp(0.0, 1.0);
    }

    fn playback_rate(&self) -> f64 {
        self.state.borrow().playback_rate
    }

    fn set_playback_rate(&self, rate: f64) {
        self.state.borrow_mut().playback_rate = rate;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_follows_rate() {
        let video = SimulatedVideo::new(Some(60.0));
        assert!(!video.advance_by(1.0));
        video.play();
        video.set_playback_rate(2.0);
        assert!(video.advance_by(1.5));
        assert_eq!(video.current_time(), 3.0);
    }

    #[test]
    fn test_playback_stops_at_end() {
        let video = SimulatedVideo::new(Some(10.0));
        video.set_current_time(9.0);
        video.play();
        video.advance_by(5.0);
        assert_eq!(video.current_time(), 10.0);
        assert!(video.paused());
        // Playing again restarts from the top.
        video.play();
        assert_eq!(video.current_time(), 0.0);
    }

    #[test]
    fn test_seek_and_volume_are_clamped() {
        let video = SimulatedVideo::new(Some(30.0));
        video.set_current_time(-4.0);
        assert_eq!(video.current_time(), 0.0);
        video.set_current_time(45.0);
        assert_eq!(video.current_time(), 30.0);
        video.set_volume(1.3);
        assert_eq!(video.volume(), 1.0);
    }

    #[test]
    fn test_unknown_duration() {
        let video = SimulatedVideo::new(None);
        assert!(video.duration().is_nan());
        video.set_current_time(12.0);
        assert_eq!(video.current_time(), 12.0);
        video.set_duration(20.0);
        assert_eq!(video.duration(), 20.0);
    }
}
