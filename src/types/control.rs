use std::fmt;

/// The part of the rendered player an element plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlRole {
    /// The outer `.player` block, target of double-click skipping.
    Viewer,
    /// The video element itself.
    Video,
    Toggle,
    ProgressTrack,
    ProgressFill,
    Volume,
    PlaybackRate,
    SkipForward,
    SkipBackward,
}

impl ControlRole {
    pub const ALL: [ControlRole; 9] = [
        ControlRole::Viewer,
        ControlRole::Video,
        ControlRole::Toggle,
        ControlRole::ProgressTrack,
        ControlRole::ProgressFill,
        ControlRole::Volume,
        ControlRole::PlaybackRate,
        ControlRole::SkipForward,
        ControlRole::SkipBackward,
    ];

    /// CSS selector locating this control inside a mounted player.
    pub fn selector(self) -> &'static str {
        match self {
            ControlRole::Viewer => ".player",
            ControlRole::Video => "video",
            ControlRole::Toggle => ".toggle",
            ControlRole::ProgressTrack => ".progress",
            ControlRole::ProgressFill => ".progress__filled",
            ControlRole::Volume => "input[name=\"volume\"]",
            ControlRole::PlaybackRate => "input[name=\"playbackRate\"]",
            ControlRole::SkipForward => ".player__button2",
            ControlRole::SkipBackward => ".player__button1",
        }
    }
}

impl fmt::Display for ControlRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ControlRole::Viewer => "viewer",
            ControlRole::Video => "video",
            ControlRole::Toggle => "toggle button",
            ControlRole::ProgressTrack => "progress track",
            ControlRole::ProgressFill => "progress fill",
            ControlRole::Volume => "volume slider",
            ControlRole::PlaybackRate => "playback rate slider",
            ControlRole::SkipForward => "skip forward button",
            ControlRole::SkipBackward => "skip backward button",
        };
        f.write_str(name)
    }
}

/// Input or media notifications the widget listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Click,
    DoubleClick,
    PointerDown,
    PointerUp,
    PointerMove,
    /// The media surface reported a new playback position.
    TimeUpdate,
}

impl Trigger {
    /// DOM event type name.
    pub fn event_name(self) -> &'static str {
        match self {
            Trigger::Click => "click",
            Trigger::DoubleClick => "dblclick",
            Trigger::PointerDown => "mousedown",
            Trigger::PointerUp => "mouseup",
            Trigger::PointerMove => "mousemove",
            Trigger::TimeUpdate => "timeupdate",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selectors_are_distinct() {
        let mut selectors: Vec<_> = ControlRole::ALL.iter().map(|r| r.selector()).collect();
        selectors.sort();
        selectors.dedup();
        assert_eq!(selectors.len(), ControlRole::ALL.len());
    }

    #[test]
    fn test_event_names_match_dom() {
        assert_eq!(Trigger::DoubleClick.event_name(), "dblclick");
        assert_eq!(Trigger::TimeUpdate.event_name(), "timeupdate");
    }
}
