//! Playback controls for an embedded media element.
//!
//! [`PlayerWidget`] renders a fixed control bar into a [`Page`], resolves a
//! handle for each control and binds a declarative event table that drives a
//! host-provided [`MediaSurface`].

pub mod hosts;
pub mod ops;
pub mod types;
pub mod ui;

pub use crate::ops::bindings::{Action, BINDINGS, Binding, InputEvent};
pub use crate::types::control::{ControlRole, Trigger};
pub use crate::types::error::PlayerError;
pub use crate::types::settings::{Settings, SettingsOverrides};
pub use crate::ui::page::{Control, Listener, MediaSurface, Page};
pub use crate::ui::template::Template;
pub use crate::ui::widget::{PlayerWidget, SharedWidget};
