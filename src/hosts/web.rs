//! Browser host: the player is rendered as HTML into the document and the
//! media surface is the page's `<video>` element.

use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, HtmlElement, HtmlVideoElement, MouseEvent};

use crate::ops::mapping;
use crate::types::control::{ControlRole, Trigger};
use crate::types::error::PlayerError;
use crate::types::settings::SettingsOverrides;
use crate::ui::page::{Control, Listener, MediaSurface, Page};
use crate::ui::template::Template;
use crate::ui::widget::{PlayerWidget, SharedWidget};

#[derive(Clone)]
pub struct WebVideo(HtmlVideoElement);

impl MediaSurface for WebVideo {
    fn paused(&self) -> bool {
        self.0.paused()
    }

    fn play(&self) {
        // Only a synchronous throw lands here. A blocked autoplay rejects the
        // returned promise instead, which the browser reports as unhandled.
        if let Err(err) = self.0.play() {
            tracing::warn!("play() failed: {err:?}");
        }
    }

    fn pause(&self) {
        if let Err(err) = self.0.pause() {
            tracing::warn!("pause() failed: {err:?}");
        }
    }

    fn current_time(&self) -> f64 {
        self.0.current_time()
    }

    fn set_current_time(&self, seconds: f64) {
        self.0.set_current_time(seconds);
    }

    fn duration(&self) -> f64 {
        self.0.duration()
    }

    fn volume(&self) -> f64 {
        self.0.volume()
    }

    fn set_volume(&self, volume: f64) {
        // Out-of-range volumes throw in the browser.
        self.0.set_volume(volume.clamp(0.0, 1.0));
    }

    fn playback_rate(&self) -> f64 {
        self.0.playback_rate()
    }

    fn set_playback_rate(&self, rate: f64) {
        // The setter throws on unsupported rates, and a throw would unwind
        // past the listener still holding the widget borrowed.
        if !mapping::browser_accepts_rate(rate) {
            tracing::debug!("Browser cannot play at {rate}x");
            return;
        }
        self.0.set_playback_rate(rate);
    }
}

#[derive(Clone)]
pub struct WebControl(HtmlElement);

impl Control for WebControl {
    fn width(&self) -> f64 {
        f64::from(self.0.offset_width())
    }

    fn set_text(&self, text: &str) {
        self.0.set_text_content(Some(text));
    }

    fn set_style(&self, property: &str, value: &str) {
        if let Err(err) = self.0.style().set_property(property, value) {
            tracing::warn!("Failed to set {property}: {err:?}");
        }
    }
}

pub struct WebPage {
    document: Document,
}

impl WebPage {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    pub fn from_window() -> Option<Self> {
        web_sys::window()?.document().map(Self::new)
    }

    fn container(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn query(&self, selector: &str, role: ControlRole) -> Option<Element> {
        self.container(selector)?
            .query_selector(role.selector())
            .ok()
            .flatten()
    }
}

impl Page for WebPage {
    type Surface = WebVideo;
    type Element = WebControl;

    fn insert_template(&mut self, selector: &str, template: &Template) -> Result<(), PlayerError> {
        let container = self
            .container(selector)
            .ok_or_else(|| PlayerError::ContainerNotFound(selector.to_string()))?;
        container
            .insert_adjacent_html("afterbegin", &template.to_html())
            .map_err(|_| PlayerError::ContainerNotFound(selector.to_string()))
    }

    fn find_surface(&self, selector: &str) -> Option<WebVideo> {
        self.query(selector, ControlRole::Video)?
            .dyn_into::<HtmlVideoElement>()
            .ok()
            .map(WebVideo)
    }

    fn find_control(&self, selector: &str, role: ControlRole) -> Option<WebControl> {
        self.query(selector, role)?
            .dyn_into::<HtmlElement>()
            .ok()
            .map(WebControl)
    }

    fn listen(&mut self, element: &WebControl, trigger: Trigger, listener: Listener) {
        let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let offset_x = event
                .dyn_ref::<MouseEvent>()
                .map_or(0.0, |mouse| f64::from(mouse.offset_x()));
            listener(offset_x);
        });
        if let Err(err) = element
            .0
            .add_event_listener_with_callback(trigger.event_name(), callback.as_ref().unchecked_ref())
        {
            tracing::warn!("Failed to listen for {}: {err:?}", trigger.event_name());
        }
        // Listeners live as long as the page.
        callback.forget();
    }
}

/// JavaScript entry point.
///
/// ```js
/// const player = new WebPlayer(JSON.stringify({ videoUrl: "video/mov_bbb.mp4", videoPlayerContainer: "body" }));
/// player.init();
/// ```
#[wasm_bindgen]
pub struct WebPlayer {
    widget: SharedWidget<WebPage>,
}

#[wasm_bindgen]
impl WebPlayer {
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: &str) -> Result<WebPlayer, JsValue> {
        let overrides = SettingsOverrides::from_json(settings_json)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        Ok(WebPlayer {
            widget: PlayerWidget::new(overrides).shared(),
        })
    }

    /// Renders and wires the player. Failures are written to the console.
    pub fn init(&self) {
        let Some(mut page) = WebPage::from_window() else {
            web_sys::console::error_1(&JsValue::from_str("No document to mount the player in"));
            return;
        };
        if let Err(err) = PlayerWidget::initialize(&self.widget, &mut page) {
            web_sys::console::error_1(&JsValue::from_str(&err.to_string()));
        }
    }

    pub fn toggle(&self) {
        self.widget.borrow_mut().toggle();
    }
}
