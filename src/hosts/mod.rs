//! Pages and media surfaces the widget can be mounted on.

use crate::ui::page::MediaSurface;

pub mod retained;
pub mod simulated;

#[cfg(not(target_arch = "wasm32"))]
pub mod egui_host;
#[cfg(feature = "gstreamer")]
pub mod gst_surface;
#[cfg(target_arch = "wasm32")]
pub mod web;

/// A surface polled by its host instead of pushing position notifications.
pub trait Clocked: MediaSurface {
    /// Catches the surface up with the wall clock. Returns whether the
    /// playback position changed since the previous call.
    fn advance(&self) -> bool;
}
