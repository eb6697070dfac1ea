use std::time::Duration;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Vec2};

use crate::hosts::Clocked;
use crate::hosts::retained::{RetainedElement, RetainedPage};
use crate::ops::mapping::MAX_PLAYBACK_RATE;
use crate::types::control::{ControlRole, Trigger};
use crate::types::error::PlayerError;
use crate::types::settings::Settings;
use crate::ui::page::MediaSurface;
use crate::ui::widget::{PlayerWidget, SharedWidget};

const SLIDER_SIZE: Vec2 = Vec2::new(100.0, 16.0);
const BUTTON_SIZE: Vec2 = Vec2::new(56.0, 24.0);
const ACCENT: Color32 = Color32::from_rgb(255, 200, 0);

/// Draws a player mounted on a [`RetainedPage`] and feeds egui pointer input
/// back to it as page events.
pub struct PlayerPanel<S: Clocked + Clone + 'static> {
    page: RetainedPage<S>,
    selector: String,
    // Listeners only hold weak references to the widget.
    widget: SharedWidget<RetainedPage<S>>,
}

impl<S: Clocked + Clone + 'static> PlayerPanel<S> {
    pub fn mount(mut page: RetainedPage<S>, settings: Settings) -> Result<Self, PlayerError> {
        let widget = PlayerWidget::from_settings(settings).shared();
        PlayerWidget::initialize(&widget, &mut page)?;
        let selector = widget.borrow().settings().container.clone();
        Ok(Self {
            page,
            selector,
            widget,
        })
    }

    pub fn widget(&self) -> &SharedWidget<RetainedPage<S>> {
        &self.widget
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        let Some(surface) = self.page.surface(&self.selector) else {
            ui.label(format!("No player mounted in '{}'", self.selector));
            return;
        };
        if surface.advance() {
            self.fire(ControlRole::Video, Trigger::TimeUpdate, 0.0);
        }
        if !surface.paused() {
            ui.ctx().request_repaint_after(Duration::from_millis(16));
        }

        let player = ui.vertical(|ui| {
            self.show_video(ui, &surface);
            ui.add_space(6.0);
            self.show_progress(ui);
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                self.show_button(ui, ControlRole::Toggle);
                ui.separator();
                self.show_slider(ui, ControlRole::Volume, surface.volume());
                ui.label(format!("vol {:.2}", surface.volume()));
                ui.separator();
                self.show_slider(
                    ui,
                    ControlRole::PlaybackRate,
                    surface.playback_rate() / MAX_PLAYBACK_RATE,
                );
                ui.label(format!("{:.2}×", surface.playback_rate()));
                ui.separator();
                self.show_button(ui, ControlRole::SkipBackward);
                self.show_button(ui, ControlRole::SkipForward);
            });
        });
        // The viewer is the whole player, controls bar included.
        let rect = player.response.rect;
        self.measure(ControlRole::Viewer, rect);
        let double_click = ui.input(|i| {
            i.pointer
                .button_double_clicked(egui::PointerButton::Primary)
                .then(|| i.pointer.interact_pos())
                .flatten()
        });
        if let Some(offset_x) = double_click.and_then(|pos| viewer_offset(rect, pos)) {
            self.fire(ControlRole::Viewer, Trigger::DoubleClick, offset_x);
        }
    }

    fn element(&self, role: ControlRole) -> Option<RetainedElement> {
        self.page.element(&self.selector, role)
    }

    fn fire(&self, role: ControlRole, trigger: Trigger, offset_x: f64) {
        self.page.fire(&self.selector, role, trigger, offset_x);
    }

    fn measure(&self, role: ControlRole, rect: Rect) {
        if let Some(element) = self.element(role) {
            element.set_width(f64::from(rect.width()));
        }
    }

    /// Translates press, move, release and click over `rect` into page events.
    fn route_pointer(&self, ui: &egui::Ui, role: ControlRole, rect: Rect, response: &egui::Response) {
        let offset = |pos: Pos2| f64::from(pos.x - rect.left());
        let (pressed, released, moving) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.is_moving(),
            )
        });
        if let Some(pos) = response.hover_pos() {
            if pressed {
                self.fire(role, Trigger::PointerDown, offset(pos));
            }
            if moving {
                self.fire(role, Trigger::PointerMove, offset(pos));
            }
            if released {
                self.fire(role, Trigger::PointerUp, offset(pos));
            }
        }
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.fire(role, Trigger::Click, offset(pos));
            }
        }
    }

    fn show_video(&self, ui: &mut egui::Ui, surface: &S) {
        let width = ui.available_width();
        let size = Vec2::new(width, (width * 9.0 / 16.0).min(360.0));
        let (rect, response) = ui.allocate_exact_size(size, Sense::click());
        let painter = ui.painter();
        painter.rect_filled(rect, 0.0, Color32::BLACK);
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            format!(
                "{} / {}",
                clock(surface.current_time()),
                clock(surface.duration())
            ),
            FontId::monospace(20.0),
            Color32::LIGHT_GRAY,
        );
        if let Some(source) = self
            .element(ControlRole::Video)
            .and_then(|video| video.attr("src"))
        {
            painter.text(
                rect.left_top() + Vec2::new(8.0, 8.0),
                Align2::LEFT_TOP,
                source,
                FontId::proportional(12.0),
                Color32::GRAY,
            );
        }
        self.measure(ControlRole::Video, rect);

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.fire(ControlRole::Video, Trigger::Click, f64::from(pos.x - rect.left()));
            }
        }
    }

    fn show_progress(&self, ui: &mut egui::Ui) {
        let size = Vec2::new(ui.available_width(), 12.0);
        let (rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());
        let percent = self
            .element(ControlRole::ProgressFill)
            .and_then(|fill| fill.style("flex-basis"))
            .and_then(|basis| basis.trim_end_matches('%').parse::<f32>().ok())
            .unwrap_or(0.0);
        let mut filled = rect;
        filled.set_width(rect.width() * (percent / 100.0).clamp(0.0, 1.0));

        let painter = ui.painter();
        painter.rect_filled(rect, 3.0, Color32::from_gray(60));
        painter.rect_filled(filled, 3.0, ACCENT);

        self.measure(ControlRole::ProgressTrack, rect);
        self.measure(ControlRole::ProgressFill, filled);
        self.route_pointer(ui, ControlRole::ProgressTrack, rect, &response);
    }

    fn show_button(&self, ui: &mut egui::Ui, role: ControlRole) {
        let Some(element) = self.element(role) else {
            return;
        };
        let (rect, response) = ui.allocate_exact_size(BUTTON_SIZE, Sense::click());
        let fill = if response.hovered() {
            Color32::from_gray(80)
        } else {
            Color32::from_gray(50)
        };
        let painter = ui.painter();
        painter.rect_filled(rect, 4.0, fill);
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            element.text(),
            FontId::proportional(14.0),
            Color32::WHITE,
        );
        element.set_width(f64::from(rect.width()));
        self.route_pointer(ui, role, rect, &response);
    }

    fn show_slider(&self, ui: &mut egui::Ui, role: ControlRole, fraction: f64) {
        let (rect, response) = ui.allocate_exact_size(SLIDER_SIZE, Sense::click_and_drag());
        let track = Rect::from_center_size(rect.center(), Vec2::new(rect.width(), 4.0));
        let knob_x = rect.left() + rect.width() * fraction.clamp(0.0, 1.0) as f32;

        let painter = ui.painter();
        painter.rect_filled(track, 2.0, Color32::from_gray(90));
        painter.circle_filled(Pos2::new(knob_x, rect.center().y), 6.0, ACCENT);

        self.measure(role, rect);
        self.route_pointer(ui, role, rect, &response);
    }
}

impl<S: Clocked + Clone + 'static> eframe::App for PlayerPanel<S> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show(ui);
        });
    }
}

/// Offset of `pos` from the left edge of the player, if it lies inside it.
fn viewer_offset(player: Rect, pos: Pos2) -> Option<f64> {
    player
        .contains(pos)
        .then(|| f64::from(pos.x - player.left()))
}

/// `m:ss`, or `--:--` while the time is unknown.
fn clock(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "--:--".to_string();
    }
    let total = seconds as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
