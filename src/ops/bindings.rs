//! The complete event map of the player as data.
//!
//! Hosts attach one listener per row of [`BINDINGS`]; the widget looks the
//! row back up to decide what to do, so the table can be exercised without a
//! page at all.

use crate::ops::drag::DragControl;
use crate::types::control::{ControlRole, Trigger};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Toggle,
    UpdateProgress,
    Scrub,
    SetVolume,
    SetPlaybackRate,
    Press(DragControl),
    Release(DragControl),
    SkipForward,
    SkipBackward,
    /// Skip forward or back depending on which side of the threshold the
    /// pointer is.
    ZoneSkip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub trigger: Trigger,
    pub target: ControlRole,
    pub action: Action,
    /// Only act while this control's pointer is held.
    pub while_held: Option<DragControl>,
}

impl Binding {
    const fn on(trigger: Trigger, target: ControlRole, action: Action) -> Self {
        Binding {
            trigger,
            target,
            action,
            while_held: None,
        }
    }

    const fn held(self, control: DragControl) -> Self {
        Binding {
            while_held: Some(control),
            ..self
        }
    }

    pub fn matches(&self, trigger: Trigger, target: ControlRole) -> bool {
        self.trigger == trigger && self.target == target
    }
}

/// A trigger delivered to a control, with the pointer's horizontal offset
/// inside it. Non-pointer triggers carry an offset of 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputEvent {
    pub trigger: Trigger,
    pub target: ControlRole,
    pub offset_x: f64,
}

impl InputEvent {
    pub fn new(trigger: Trigger, target: ControlRole, offset_x: f64) -> Self {
        Self {
            trigger,
            target,
            offset_x,
        }
    }
}

use Action::*;
use ControlRole::*;
use Trigger::*;

pub const BINDINGS: &[Binding] = &[
    Binding::on(Click, Video, Action::Toggle),
    Binding::on(Click, ControlRole::Toggle, Action::Toggle),
    Binding::on(TimeUpdate, Video, UpdateProgress),
    Binding::on(Click, ProgressTrack, Scrub),
    Binding::on(PointerMove, ProgressTrack, Scrub).held(DragControl::Progress),
    Binding::on(PointerDown, ProgressTrack, Press(DragControl::Progress)),
    Binding::on(PointerUp, ProgressTrack, Release(DragControl::Progress)),
    Binding::on(Click, Volume, SetVolume),
    Binding::on(PointerMove, Volume, SetVolume).held(DragControl::Volume),
    Binding::on(PointerDown, Volume, Press(DragControl::Volume)),
    Binding::on(PointerUp, Volume, Release(DragControl::Volume)),
    Binding::on(Click, PlaybackRate, SetPlaybackRate),
    Binding::on(PointerMove, PlaybackRate, SetPlaybackRate).held(DragControl::Rate),
    Binding::on(PointerDown, PlaybackRate, Press(DragControl::Rate)),
    Binding::on(PointerUp, PlaybackRate, Release(DragControl::Rate)),
    Binding::on(Click, ControlRole::SkipForward, Action::SkipForward),
    Binding::on(Click, ControlRole::SkipBackward, Action::SkipBackward),
    Binding::on(DoubleClick, Viewer, ZoneSkip),
];

pub fn matching(trigger: Trigger, target: ControlRole) -> impl Iterator<Item = &'static Binding> {
    BINDINGS.iter().filter(move |b| b.matches(trigger, target))
}
