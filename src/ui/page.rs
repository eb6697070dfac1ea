use std::rc::Rc;

use crate::types::control::{ControlRole, Trigger};
use crate::types::error::PlayerError;
use crate::ui::template::Template;

/// Called with the pointer's horizontal offset inside the element, or 0 for
/// triggers that carry no pointer position.
pub type Listener = Rc<dyn Fn(f64)>;

/// The host's playable media element.
///
/// Handles are cheap shared references, so every method takes `&self`.
pub trait MediaSurface {
    fn paused(&self) -> bool;
    fn play(&self);
    fn pause(&self);
    fn current_time(&self) -> f64;
    fn set_current_time(&self, seconds: f64);
    /// `NaN` until the media's length is known.
    fn duration(&self) -> f64;
    fn volume(&self) -> f64;
    fn set_volume(&self, volume: f64);
    fn playback_rate(&self) -> f64;
    fn set_playback_rate(&self, rate: f64);
}

/// A rendered element the widget reads or writes.
pub trait Control {
    /// Laid-out width in pixels.
    fn width(&self) -> f64;
    fn set_text(&self, text: &str);
    fn set_style(&self, property: &str, value: &str);
}

/// Where the player is mounted.
pub trait Page {
    type Surface: MediaSurface;
    type Element: Control;

    /// Inserts `template` at the start of the element matched by `selector`.
    fn insert_template(&mut self, selector: &str, template: &Template) -> Result<(), PlayerError>;

    fn find_surface(&self, selector: &str) -> Option<Self::Surface>;

    fn find_control(&self, selector: &str, role: ControlRole) -> Option<Self::Element>;

    fn listen(&mut self, element: &Self::Element, trigger: Trigger, listener: Listener);
}
