use crate::types::control::ControlRole;

/// Controls that seek or adjust while the pointer is held down on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragControl {
    Progress,
    Volume,
    Rate,
}

impl DragControl {
    pub fn for_role(role: ControlRole) -> Option<Self> {
        match role {
            ControlRole::ProgressTrack => Some(DragControl::Progress),
            ControlRole::Volume => Some(DragControl::Volume),
            ControlRole::PlaybackRate => Some(DragControl::Rate),
            _ => None,
        }
    }
}

/// Pointer-held flags, one per draggable control, so pressing on one
/// control never enables dragging on another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragState {
    progress: bool,
    volume: bool,
    rate: bool,
}

impl DragState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, control: DragControl) {
        *self.flag_mut(control) = true;
    }

    pub fn release(&mut self, control: DragControl) {
        *self.flag_mut(control) = false;
    }

    pub fn is_held(&self, control: DragControl) -> bool {
        match control {
            DragControl::Progress => self.progress,
            DragControl::Volume => self.volume,
            DragControl::Rate => self.rate,
        }
    }

    fn flag_mut(&mut self, control: DragControl) -> &mut bool {
        match control {
            DragControl::Progress => &mut self.progress,
            DragControl::Volume => &mut self.volume,
            DragControl::Rate => &mut self.rate,
        }
    }
}
