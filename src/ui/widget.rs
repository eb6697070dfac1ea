use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::ops::bindings::{self, Action, BINDINGS, Binding, InputEvent};
use crate::ops::drag::DragState;
use crate::ops::mapping::{self, SkipDirection};
use crate::types::control::ControlRole;
use crate::types::error::PlayerError;
use crate::types::settings::{Settings, SettingsOverrides};
use crate::ui::page::{Control, MediaSurface, Page};
use crate::ui::template::{PAUSE_GLYPH, PLAY_GLYPH, Template};

/// A widget shared between the caller and the listeners it binds.
pub type SharedWidget<P> = Rc<RefCell<PlayerWidget<P>>>;

/// Handles resolved from the rendered markup.
struct Handles<P: Page> {
    surface: P::Surface,
    viewer: P::Element,
    video: P::Element,
    toggle: P::Element,
    progress: P::Element,
    progress_fill: P::Element,
    volume: P::Element,
    rate: P::Element,
    skip_next: P::Element,
    skip_prev: P::Element,
}

impl<P: Page> Handles<P> {
    fn resolve(page: &P, selector: &str) -> Result<Self, PlayerError> {
        let find = |role| {
            page.find_control(selector, role)
                .ok_or(PlayerError::MissingControl(role))
        };
        Ok(Handles {
            surface: page
                .find_surface(selector)
                .ok_or(PlayerError::MissingControl(ControlRole::Video))?,
            viewer: find(ControlRole::Viewer)?,
            video: find(ControlRole::Video)?,
            toggle: find(ControlRole::Toggle)?,
            progress: find(ControlRole::ProgressTrack)?,
            progress_fill: find(ControlRole::ProgressFill)?,
            volume: find(ControlRole::Volume)?,
            rate: find(ControlRole::PlaybackRate)?,
            skip_next: find(ControlRole::SkipForward)?,
            skip_prev: find(ControlRole::SkipBackward)?,
        })
    }

    fn element(&self, role: ControlRole) -> &P::Element {
        match role {
            ControlRole::Viewer => &self.viewer,
            ControlRole::Video => &self.video,
            ControlRole::Toggle => &self.toggle,
            ControlRole::ProgressTrack => &self.progress,
            ControlRole::ProgressFill => &self.progress_fill,
            ControlRole::Volume => &self.volume,
            ControlRole::PlaybackRate => &self.rate,
            ControlRole::SkipForward => &self.skip_next,
            ControlRole::SkipBackward => &self.skip_prev,
        }
    }
}

/// Playback controls attached to a media surface on a [`Page`].
pub struct PlayerWidget<P: Page> {
    settings: Settings,
    handles: Option<Handles<P>>,
    drag: DragState,
}

impl<P: Page + 'static> PlayerWidget<P> {
    pub fn new(overrides: SettingsOverrides) -> Self {
        Self::from_settings(Settings::with_overrides(overrides))
    }

    pub fn from_settings(settings: Settings) -> Self {
        Self {
            settings,
            handles: None,
            drag: DragState::new(),
        }
    }

    pub fn shared(self) -> SharedWidget<P> {
        Rc::new(RefCell::new(self))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_initialized(&self) -> bool {
        self.handles.is_some()
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    /// Renders the controls into the configured container, resolves every
    /// control and binds the event table.
    ///
    /// Must be called at most once: a second call renders and binds again.
    pub fn initialize(this: &SharedWidget<P>, page: &mut P) -> Result<(), PlayerError> {
        let result = Self::mount(this, page);
        if let Err(err) = &result {
            tracing::error!("Failed to initialize player: {err}");
        }
        result
    }

    fn mount(this: &SharedWidget<P>, page: &mut P) -> Result<(), PlayerError> {
        let container = {
            let mut widget = this.borrow_mut();
            widget.check_settings()?;
            if widget.is_initialized() {
                tracing::warn!(
                    "Player in '{}' is initialized again; controls will be duplicated",
                    widget.settings.container
                );
            }

            let container = widget.settings.container.clone();
            page.insert_template(&container, &Template::render(&widget.settings))?;

            let handles = Handles::resolve(page, &container)?;
            handles.surface.set_volume(widget.settings.volume);
            handles.surface.set_playback_rate(widget.settings.playback_rate);
            widget.handles = Some(handles);
            container
        };

        Self::bind_events(this, page);
        tracing::info!("Player mounted in '{container}'");
        Ok(())
    }

    fn check_settings(&self) -> Result<(), PlayerError> {
        if self.settings.source.is_empty() {
            return Err(PlayerError::MissingSource);
        }
        if self.settings.container.is_empty() {
            return Err(PlayerError::MissingContainer);
        }
        Ok(())
    }

    fn bind_events(this: &SharedWidget<P>, page: &mut P) {
        let widget = this.borrow();
        let Some(handles) = &widget.handles else {
            return;
        };
        for binding in BINDINGS {
            let weak: Weak<RefCell<Self>> = Rc::downgrade(this);
            page.listen(
                handles.element(binding.target),
                binding.trigger,
                Rc::new(move |offset_x: f64| {
                    if let Some(widget) = weak.upgrade() {
                        widget.borrow_mut().run(binding, offset_x);
                    }
                }),
            );
        }
        tracing::debug!("Bound {} player listeners", BINDINGS.len());
    }

    /// Runs every binding that matches `event`, as a page would after
    /// delivering it. Returns the actions that took effect.
    pub fn dispatch(&mut self, event: InputEvent) -> Vec<Action> {
        bindings::matching(event.trigger, event.target)
            .filter(|binding| self.run(binding, event.offset_x))
            .map(|binding| binding.action)
            .collect()
    }

    /// Performs one binding's action, honoring its pointer-held gate.
    pub fn run(&mut self, binding: &Binding, offset_x: f64) -> bool {
        if !self.is_initialized() {
            tracing::warn!("Ignoring {:?} before the player is initialized", binding.action);
            return false;
        }
        if let Some(control) = binding.while_held {
            if !self.drag.is_held(control) {
                return false;
            }
        }
        tracing::trace!("{:?} on {} at {offset_x}", binding.trigger, binding.target);
        match binding.action {
            Action::Toggle => self.toggle(),
            Action::UpdateProgress => self.update_progress(),
            Action::Scrub => self.scrub(offset_x),
            Action::SetVolume => self.set_volume_at(offset_x),
            Action::SetPlaybackRate => self.set_playback_rate_at(offset_x),
            Action::Press(control) => self.drag.press(control),
            Action::Release(control) => self.drag.release(control),
            Action::SkipForward => self.skip_forward(),
            Action::SkipBackward => self.skip_backward(),
            Action::ZoneSkip => self.zone_skip(offset_x),
        }
        true
    }

    /// Plays when paused, pauses when playing, and relabels the toggle.
    pub fn toggle(&mut self) {
        let Some(handles) = &self.handles else {
            return;
        };
        if handles.surface.paused() {
            handles.surface.play();
            handles.toggle.set_text(PAUSE_GLYPH);
        } else {
            handles.surface.pause();
            handles.toggle.set_text(PLAY_GLYPH);
        }
    }

    pub fn update_progress(&mut self) {
        let Some(handles) = &self.handles else {
            return;
        };
        let percent =
            mapping::progress_percent(handles.surface.current_time(), handles.surface.duration());
        handles
            .progress_fill
            .set_style("flex-basis", &format!("{percent}%"));
    }

    /// Seeks to the position under `offset_x` on the progress track.
    pub fn scrub(&mut self, offset_x: f64) {
        let Some(handles) = &self.handles else {
            return;
        };
        match mapping::seek_time(
            offset_x,
            handles.progress.width(),
            handles.surface.duration(),
        ) {
            Some(time) => handles.surface.set_current_time(time),
            None => tracing::debug!("Seek ignored: progress track or duration not known yet"),
        }
    }

    pub fn set_volume_at(&mut self, offset_x: f64) {
        let Some(handles) = &self.handles else {
            return;
        };
        match mapping::volume(offset_x, handles.volume.width()) {
            Some(volume) => handles.surface.set_volume(volume),
            None => tracing::debug!("Volume ignored: slider has no width"),
        }
    }

    pub fn set_playback_rate_at(&mut self, offset_x: f64) {
        let Some(handles) = &self.handles else {
            return;
        };
        match mapping::playback_rate(offset_x, handles.rate.width()) {
            Some(rate) => handles.surface.set_playback_rate(rate),
            None => tracing::debug!("Playback rate ignored: slider has no width"),
        }
    }

    pub fn skip_forward(&mut self) {
        self.skip_by(self.settings.skip_next);
    }

    pub fn skip_backward(&mut self) {
        self.skip_by(self.settings.skip_prev);
    }

    fn skip_by(&self, seconds: f64) {
        if let Some(handles) = &self.handles {
            handles
                .surface
                .set_current_time(handles.surface.current_time() + seconds);
        }
    }

    pub fn zone_skip(&mut self, offset_x: f64) {
        match mapping::zone(offset_x) {
            SkipDirection::Forward => self.skip_forward(),
            SkipDirection::Backward => self.skip_backward(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hosts::retained::RetainedPage;
    use crate::hosts::simulated::SimulatedVideo;
    use crate::ops::drag::DragControl;
    use crate::types::control::Trigger;

    const MOUNT: &str = ".myplayer";

    fn page() -> RetainedPage<SimulatedVideo> {
        RetainedPage::new(|source| SimulatedVideo::with_source(source, Some(120.0))).with_mount(MOUNT)
    }

    fn overrides() -> SettingsOverrides {
        SettingsOverrides {
            source: Some("video/mov_bbb.mp4".to_string()),
            ..Default::default()
        }
    }

    fn mounted() -> (SharedWidget<RetainedPage<SimulatedVideo>>, RetainedPage<SimulatedVideo>) {
        let mut page = page();
        let widget = PlayerWidget::new(overrides()).shared();
        PlayerWidget::initialize(&widget, &mut page).unwrap();
        page.element(MOUNT, ControlRole::ProgressTrack).unwrap().set_width(200.0);
        page.element(MOUNT, ControlRole::Volume).unwrap().set_width(100.0);
        page.element(MOUNT, ControlRole::PlaybackRate).unwrap().set_width(100.0);
        (widget, page)
    }

    fn surface(page: &RetainedPage<SimulatedVideo>) -> SimulatedVideo {
        page.surface(MOUNT).unwrap()
    }

    #[test]
    fn test_initialize_inserts_one_player() {
        let (widget, page) = mounted();
        assert!(widget.borrow().is_initialized());
        assert_eq!(page.instances(MOUNT).len(), 1);
        for role in ControlRole::ALL {
            assert!(page.element(MOUNT, role).is_some(), "{role}");
        }
        assert_eq!(surface(&page).source(), "video/mov_bbb.mp4");
    }

    #[test]
    fn test_missing_source_inserts_nothing() {
        let mut page = page();
        let widget = PlayerWidget::new(SettingsOverrides::default()).shared();
        let err = PlayerWidget::initialize(&widget, &mut page).unwrap_err();
        assert!(matches!(err, PlayerError::MissingSource));
        assert!(page.instances(MOUNT).is_empty());
        assert!(!widget.borrow().is_initialized());
    }

    #[test]
    fn test_missing_container_inserts_nothing() {
        let mut page = page();
        let widget = PlayerWidget::new(SettingsOverrides {
            container: Some(String::new()),
            ..overrides()
        })
        .shared();
        let err = PlayerWidget::initialize(&widget, &mut page).unwrap_err();
        assert!(matches!(err, PlayerError::MissingContainer));
        assert!(page.instances(MOUNT).is_empty());
    }

    #[test]
    fn test_unknown_container_is_reported() {
        let mut page = page();
        let widget = PlayerWidget::new(SettingsOverrides {
            container: Some("#nowhere".to_string()),
            ..overrides()
        })
        .shared();
        let err = PlayerWidget::initialize(&widget, &mut page).unwrap_err();
        assert!(matches!(err, PlayerError::ContainerNotFound(ref s) if s == "#nowhere"));
        assert!(!widget.borrow().is_initialized());
    }

    #[test]
    fn test_initial_volume_and_rate_reach_surface() {
        let mut page = page();
        let widget = PlayerWidget::new(SettingsOverrides {
            volume: Some(0.25),
            playback_rate: Some(1.5),
            ..overrides()
        })
        .shared();
        PlayerWidget::initialize(&widget, &mut page).unwrap();
        let video = surface(&page);
        assert_eq!(video.volume(), 0.25);
        assert_eq!(video.playback_rate(), 1.5);
        let volume = page.element(MOUNT, ControlRole::Volume).unwrap();
        assert_eq!(volume.attr("value").as_deref(), Some("0.25"));
    }

    #[test]
    fn test_toggle_pairs_return_to_paused() {
        let (widget, page) = mounted();
        let video = surface(&page);
        let toggle = page.element(MOUNT, ControlRole::Toggle).unwrap();
        assert_eq!(toggle.text(), PLAY_GLYPH);

        widget.borrow_mut().toggle();
        assert!(!video.paused());
        assert_eq!(toggle.text(), PAUSE_GLYPH);

        widget.borrow_mut().toggle();
        assert!(video.paused());
        assert_eq!(toggle.text(), PLAY_GLYPH);
    }

    #[test]
    fn test_clicking_video_or_button_toggles() {
        let (_widget, page) = mounted();
        let video = surface(&page);
        page.fire(MOUNT, ControlRole::Video, Trigger::Click, 10.0);
        assert!(!video.paused());
        page.fire(MOUNT, ControlRole::Toggle, Trigger::Click, 3.0);
        assert!(video.paused());
    }

    #[test]
    fn test_time_update_sets_fill_width() {
        let (_widget, page) = mounted();
        surface(&page).set_current_time(30.0);
        page.fire(MOUNT, ControlRole::Video, Trigger::TimeUpdate, 0.0);
        let fill = page.element(MOUNT, ControlRole::ProgressFill).unwrap();
        assert_eq!(fill.style("flex-basis").as_deref(), Some("25%"));
    }

    #[test]
    fn test_progress_with_unknown_duration_is_zero() {
        let mut page = RetainedPage::new(|source| SimulatedVideo::with_source(source, None))
            .with_mount(MOUNT);
        let widget = PlayerWidget::new(overrides()).shared();
        PlayerWidget::initialize(&widget, &mut page).unwrap();
        page.fire(MOUNT, ControlRole::Video, Trigger::TimeUpdate, 0.0);
        let fill = page.element(MOUNT, ControlRole::ProgressFill).unwrap();
        assert_eq!(fill.style("flex-basis").as_deref(), Some("0%"));
    }

    #[test]
    fn test_click_on_track_scrubs() {
        let (_widget, page) = mounted();
        page.fire(MOUNT, ControlRole::ProgressTrack, Trigger::Click, 50.0);
        assert_eq!(surface(&page).current_time(), 0.25 * 120.0);
    }

    #[test]
    fn test_drag_scrub_only_while_held() {
        let (widget, page) = mounted();
        let video = surface(&page);

        page.fire(MOUNT, ControlRole::ProgressTrack, Trigger::PointerMove, 100.0);
        assert_eq!(video.current_time(), 0.0);

        page.fire(MOUNT, ControlRole::ProgressTrack, Trigger::PointerDown, 100.0);
        assert!(widget.borrow().drag_state().is_held(DragControl::Progress));
        page.fire(MOUNT, ControlRole::ProgressTrack, Trigger::PointerMove, 100.0);
        assert_eq!(video.current_time(), 60.0);

        page.fire(MOUNT, ControlRole::ProgressTrack, Trigger::PointerUp, 100.0);
        page.fire(MOUNT, ControlRole::ProgressTrack, Trigger::PointerMove, 150.0);
        assert_eq!(video.current_time(), 60.0);
    }

    #[test]
    fn test_volume_click_and_drag() {
        let (_widget, page) = mounted();
        let video = surface(&page);
        page.fire(MOUNT, ControlRole::Volume, Trigger::Click, 40.0);
        assert_eq!(video.volume(), 0.4);

        page.fire(MOUNT, ControlRole::Volume, Trigger::PointerDown, 40.0);
        page.fire(MOUNT, ControlRole::Volume, Trigger::PointerMove, 70.0);
        assert_eq!(video.volume(), 0.7);
    }

    #[test]
    fn test_rate_click() {
        let (_widget, page) = mounted();
        page.fire(MOUNT, ControlRole::PlaybackRate, Trigger::Click, 50.0);
        assert_eq!(surface(&page).playback_rate(), 1.5);
    }

    #[test]
    fn test_rate_drag_only_while_held() {
        let (_widget, page) = mounted();
        let video = surface(&page);
        page.fire(MOUNT, ControlRole::PlaybackRate, Trigger::PointerMove, 80.0);
        assert_eq!(video.playback_rate(), 1.0);

        page.fire(MOUNT, ControlRole::PlaybackRate, Trigger::PointerDown, 50.0);
        page.fire(MOUNT, ControlRole::PlaybackRate, Trigger::PointerMove, 100.0);
        assert_eq!(video.playback_rate(), 3.0);

        page.fire(MOUNT, ControlRole::PlaybackRate, Trigger::PointerUp, 100.0);
        page.fire(MOUNT, ControlRole::PlaybackRate, Trigger::PointerMove, 50.0);
        assert_eq!(video.playback_rate(), 3.0);
    }

    #[test]
    fn test_second_initialize_duplicates_player() {
        let (widget, mut page) = mounted();
        PlayerWidget::initialize(&widget, &mut page).unwrap();
        assert_eq!(page.instances(MOUNT).len(), 2);
        assert_eq!(widget.borrow().settings().container, MOUNT);

        let newest = surface(&page);
        let toggle = page.element(MOUNT, ControlRole::Toggle).unwrap();
        assert_eq!(toggle.listener_count(), 1);
        page.fire(MOUNT, ControlRole::Toggle, Trigger::Click, 0.0);
        assert!(!newest.paused());
        assert_eq!(toggle.text(), PAUSE_GLYPH);
    }

    #[test]
    fn test_held_pointer_does_not_leak_across_controls() {
        let (_widget, page) = mounted();
        let video = surface(&page);
        page.fire(MOUNT, ControlRole::ProgressTrack, Trigger::PointerDown, 10.0);
        page.fire(MOUNT, ControlRole::Volume, Trigger::PointerMove, 20.0);
        page.fire(MOUNT, ControlRole::PlaybackRate, Trigger::PointerMove, 20.0);
        assert_eq!(video.volume(), 1.0);
        assert_eq!(video.playback_rate(), 1.0);
    }

    #[test]
    fn test_skip_buttons() {
        let (_widget, page) = mounted();
        let video = surface(&page);
        video.set_current_time(10.0);
        page.fire(MOUNT, ControlRole::SkipForward, Trigger::Click, 0.0);
        assert_eq!(video.current_time(), 12.0);

        video.set_current_time(10.0);
        page.fire(MOUNT, ControlRole::SkipBackward, Trigger::Click, 0.0);
        assert_eq!(video.current_time(), 8.0);
    }

    #[test]
    fn test_double_click_zones() {
        let (_widget, page) = mounted();
        let video = surface(&page);
        video.set_current_time(10.0);
        page.fire(MOUNT, ControlRole::Viewer, Trigger::DoubleClick, 150.0);
        assert_eq!(video.current_time(), 12.0);
        page.fire(MOUNT, ControlRole::Viewer, Trigger::DoubleClick, 50.0);
        assert_eq!(video.current_time(), 10.0);
    }

    #[test]
    fn test_dispatch_without_page_events() {
        let (widget, page) = mounted();
        let ran = widget
            .borrow_mut()
            .dispatch(InputEvent::new(Trigger::PointerMove, ControlRole::Volume, 30.0));
        assert!(ran.is_empty());

        let ran = widget
            .borrow_mut()
            .dispatch(InputEvent::new(Trigger::Click, ControlRole::Volume, 30.0));
        assert_eq!(ran, vec![Action::SetVolume]);
        assert_eq!(surface(&page).volume(), 0.3);
    }

    #[test]
    fn test_actions_before_initialize_do_nothing() {
        let mut widget: PlayerWidget<RetainedPage<SimulatedVideo>> = PlayerWidget::new(overrides());
        let ran = widget.dispatch(InputEvent::new(Trigger::PointerDown, ControlRole::Volume, 0.0));
        assert!(ran.is_empty());
        assert!(!widget.drag_state().is_held(DragControl::Volume));
    }

    #[test]
    fn test_unmeasured_slider_is_ignored() {
        let mut page = page();
        let widget = PlayerWidget::new(overrides()).shared();
        PlayerWidget::initialize(&widget, &mut page).unwrap();
        page.fire(MOUNT, ControlRole::Volume, Trigger::Click, 40.0);
        assert_eq!(surface(&page).volume(), 1.0);
    }
}
