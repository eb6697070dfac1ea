use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

use gst::prelude::*;
use gstreamer as gst;

use crate::hosts::Clocked;
use crate::types::error::PlayerError;
use crate::ui::page::MediaSurface;

/// A `playbin` pipeline driven as a media surface. Video is shown in the
/// sink's own window.
#[derive(Debug, Clone)]
pub struct GstVideo {
    playbin: gst::Element,
    rate: Rc<Cell<f64>>,
    last_position: Rc<Cell<f64>>,
}

// Helper function to convert a source to a URI for GStreamer
fn source_to_uri(source: &str) -> String {
    if source.contains("://") {
        return source.to_string();
    }
    let path = Path::new(source);
    let absolute = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let mut path = absolute.to_string_lossy().replace('\\', "/");
    if let Some(stripped) = path.strip_prefix("//?/") {
        path = stripped.to_string();
    }
    if path.starts_with('/') {
        format!("file://{}", path)
    } else {
        format!("file:///{}", path)
    }
}

impl GstVideo {
    pub fn open(source: &str) -> Result<Self, PlayerError> {
        gst::init().map_err(|e| PlayerError::Gstreamer(e.to_string()))?;
        let uri = source_to_uri(source);
        let playbin = gst::ElementFactory::make("playbin")
            .property("uri", uri.as_str())
            .build()
            .map_err(|e| PlayerError::Gstreamer(e.to_string()))?;
        playbin
            .set_state(gst::State::Paused)
            .map_err(|e| PlayerError::Gstreamer(e.to_string()))?;
        tracing::info!("Opened {uri} with playbin");
        Ok(Self {
            playbin,
            rate: Rc::new(Cell::new(1.0)),
            last_position: Rc::new(Cell::new(0.0)),
        })
    }

    fn set_state(&self, state: gst::State) {
        if let Err(err) = self.playbin.set_state(state) {
            tracing::warn!("playbin refused {state:?}: {err}");
        }
    }

    fn seek_to(&self, seconds: f64, rate: f64) {
        let position = gst::ClockTime::from_nseconds((seconds.max(0.0) * 1e9) as u64);
        let result = self.playbin.seek(
            rate,
            gst::SeekFlags::FLUSH | gst::SeekFlags::ACCURATE,
            gst::SeekType::Set,
            position,
            gst::SeekType::End,
            gst::ClockTime::ZERO,
        );
        if let Err(err) = result {
            tracing::warn!("Seek to {seconds}s at {rate}x failed: {err}");
        }
    }
}

impl MediaSurface for GstVideo {
    fn paused(&self) -> bool {
        self.playbin.current_state() != gst::State::Playing
    }

    fn play(&self) {
        self.set_state(gst::State::Playing);
    }

    fn pause(&self) {
        self.set_state(gst::State::Paused);
    }

    fn current_time(&self) -> f64 {
        self.playbin
            .query_position::<gst::ClockTime>()
            .map(|t| t.nseconds() as f64 / 1e9)
            .unwrap_or(0.0)
    }

    fn set_current_time(&self, seconds: f64) {
        self.seek_to(seconds, self.rate.get());
    }

    fn duration(&self) -> f64 {
        self.playbin
            .query_duration::<gst::ClockTime>()
            .map(|t| t.nseconds() as f64 / 1e9)
            .unwrap_or(f64::NAN)
    }

    fn volume(&self) -> f64 {
        self.playbin.property::<f64>("volume")
    }

    fn set_volume(&self, volume: f64) {
        self.playbin.set_property("volume", volume.clamp(0.0, 1.0));
    }

    fn playback_rate(&self) -> f64 {
        self.rate.get()
    }

    fn set_playback_rate(&self, rate: f64) {
        if rate <= 0.0 || !rate.is_finite() {
            tracing::debug!("playbin cannot play at {rate}x");
            return;
        }
        self.rate.set(rate);
        self.seek_to(self.current_time(), rate);
    }
}

impl Clocked for GstVideo {
    fn advance(&self) -> bool {
        let position = self.current_time();
        let changed = position != self.last_position.get();
        self.last_position.set(position);
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_to_uri_keeps_uris() {
        assert_eq!(
            source_to_uri("https://example.com/a.mp4"),
            "https://example.com/a.mp4"
        );
    }

    #[cfg(not(windows))]
    #[test]
    fn test_source_to_uri_absolute_path() {
        assert_eq!(
            source_to_uri("/nonexistent/clip.mp4"),
            "file:///nonexistent/clip.mp4"
        );
    }
}
