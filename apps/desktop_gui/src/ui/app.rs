//! The visible panel: transcript, input row, and the pointer plumbing that
//! feeds the window controller.

use ask_client::EventSink;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::{AskReply, PanelEvent};
use window_control::{Point, ResizeDirection, Size, WindowController, MIN_WIDTH};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{failure_copy, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;

const HEADER_HEIGHT: f32 = 36.0;
const INPUT_ROW_HEIGHT: f32 = 48.0;
const DEFAULT_PANEL_SIZE: egui::Vec2 = egui::Vec2::new(MIN_WIDTH, 520.0);
const DOCK_MARGIN: f32 = 24.0;
const EDGE_GRIP: f32 = 6.0;
const CORNER_GRIP: f32 = 14.0;

enum TranscriptEntry {
    Question(String),
    Answer(AskReply),
    Failure(String),
}

pub struct PanelApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    sink: EventSink,
    window: WindowController,
    open: bool,
    input: String,
    transcript: Vec<TranscriptEntry>,
    pending: bool,
    status: Option<String>,
}

impl PanelApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>, sink: EventSink) -> Self {
        (sink.as_ref())(&PanelEvent::Opened);
        Self {
            cmd_tx,
            ui_rx,
            sink,
            window: WindowController::new(),
            open: true,
            input: String::new(),
            transcript: Vec::new(),
            pending: false,
            status: None,
        }
    }

    fn drain_backend_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::ReplyReady(reply) => {
                    self.pending = false;
                    self.transcript.push(TranscriptEntry::Answer(reply));
                }
                UiEvent::AskFailed(err) => {
                    self.pending = false;
                    self.transcript
                        .push(TranscriptEntry::Failure(failure_copy(&err)));
                }
                UiEvent::BackendFailed(message) => {
                    self.pending = false;
                    self.status = Some(message);
                }
            }
        }
    }

    fn set_open(&mut self, open: bool) {
        if self.open == open {
            return;
        }
        self.open = open;
        (self.sink.as_ref())(if open {
            &PanelEvent::Opened
        } else {
            &PanelEvent::Closed
        });
    }

    fn send_query(&mut self, query: String) {
        let trimmed = query.trim().to_string();
        if trimmed.is_empty() || self.pending {
            return;
        }
        self.transcript
            .push(TranscriptEntry::Question(trimmed.clone()));
        self.pending = true;
        self.status = None;
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::Ask { query: trimmed },
            &mut self.status,
        );
    }

    fn panel_rect(&self, viewport: egui::Rect) -> egui::Rect {
        let frame = self.window.frame();
        let size = frame
            .size
            .map(|size| egui::vec2(size.width, size.height))
            .unwrap_or(DEFAULT_PANEL_SIZE);
        let pos = match frame.position {
            Some(point) => egui::pos2(point.x, point.y),
            // Default: docked to the bottom-right of the host viewport.
            None => egui::pos2(
                (viewport.right() - size.x - DOCK_MARGIN).max(0.0),
                (viewport.bottom() - size.y - DOCK_MARGIN).max(0.0),
            ),
        };
        egui::Rect::from_min_size(pos, size)
    }

    fn show_panel(&mut self, ctx: &egui::Context) {
        let viewport = ctx.screen_rect();
        let viewport_size = Size::new(viewport.width(), viewport.height());

        // Gesture moves are tracked globally, not just over the panel, so a
        // fast drag that leaves the panel's bounds keeps working. The
        // tracking is active only while a gesture is.
        if self.window.gesture_active() {
            if let Some(pointer) = ctx.pointer_latest_pos() {
                self.window
                    .pointer_moved(Point::new(pointer.x, pointer.y), viewport_size);
            }
            if ctx.input(|i| i.pointer.any_released()) {
                self.window.pointer_released();
            }
            ctx.request_repaint();
        }

        let rect = self.panel_rect(viewport);
        egui::Area::new(egui::Id::new("askdock_panel"))
            .order(egui::Order::Foreground)
            .fixed_pos(rect.min)
            .show(ctx, |ui| {
                egui::Frame::window(ui.style()).show(ui, |ui| {
                    ui.set_min_size(rect.size());
                    ui.set_max_size(rect.size());
                    self.show_header(ui, rect, viewport_size);
                    self.show_transcript(ui, rect);
                    if let Some(status) = self.status.clone() {
                        ui.colored_label(ui.visuals().warn_fg_color, status);
                    }
                    self.show_input_row(ui);
                });
                if !self.window.frame().maximized() {
                    self.show_resize_handles(ui, rect);
                }
            });
    }

    fn show_header(&mut self, ui: &mut egui::Ui, rect: egui::Rect, viewport_size: Size) {
        let header_rect =
            egui::Rect::from_min_size(ui.max_rect().min, egui::vec2(rect.width(), HEADER_HEIGHT));
        let response = ui.interact(
            header_rect,
            ui.make_persistent_id("panel_header_drag"),
            egui::Sense::click_and_drag(),
        );

        ui.painter().text(
            header_rect.left_center() + egui::vec2(8.0, 0.0),
            egui::Align2::LEFT_CENTER,
            "Ask anything",
            egui::FontId::proportional(15.0),
            ui.visuals().strong_text_color(),
        );

        let button_size = egui::vec2(24.0, 24.0);
        let close_rect = egui::Rect::from_min_size(
            egui::pos2(header_rect.right() - 30.0, header_rect.top() + 6.0),
            button_size,
        );
        let maximize_rect = close_rect.translate(egui::vec2(-28.0, 0.0));
        let maximize_clicked = ui
            .put(maximize_rect, egui::Button::new("⛶").frame(false))
            .on_hover_text("Toggle maximize")
            .clicked();
        let close_clicked = ui
            .put(close_rect, egui::Button::new("✕").frame(false))
            .on_hover_text("Close")
            .clicked();

        if response.drag_started() && !self.window.frame().maximized() {
            if let Some(pointer) = response.interact_pointer_pos() {
                let over_control =
                    close_rect.contains(pointer) || maximize_rect.contains(pointer);
                self.window.begin_drag(
                    Point::new(pointer.x, pointer.y),
                    to_control_rect(rect),
                    over_control,
                );
            }
        }

        if maximize_clicked {
            self.window.toggle_maximize(viewport_size);
        }
        if close_clicked {
            self.set_open(false);
        }
        ui.advance_cursor_after_rect(header_rect);
        ui.separator();
    }

    fn show_transcript(&mut self, ui: &mut egui::Ui, rect: egui::Rect) {
        let body_height = (rect.height() - HEADER_HEIGHT - INPUT_ROW_HEIGHT - 24.0).max(40.0);
        let mut followup_clicked: Option<String> = None;

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .max_height(body_height)
            .min_scrolled_height(body_height)
            .show(ui, |ui| {
                if self.transcript.is_empty() {
                    ui.add_space(8.0);
                    ui.label(
                        egui::RichText::new("Ask about pools, yields, or risks to get started.")
                            .weak(),
                    );
                }
                for entry in &self.transcript {
                    render_entry(ui, entry, &mut followup_clicked);
                }
                if self.pending {
                    ui.add_space(4.0);
                    ui.spinner();
                }
            });

        if let Some(query) = followup_clicked {
            self.send_query(query);
        }
    }

    fn show_input_row(&mut self, ui: &mut egui::Ui) {
        ui.separator();
        ui.horizontal(|ui| {
            let edit = egui::TextEdit::singleline(&mut self.input)
                .hint_text("Ask a question...")
                .desired_width(ui.available_width() - 76.0);
            let edit_response = ui.add(edit);
            let submitted =
                edit_response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            if self.pending {
                if ui.button("Cancel").clicked() {
                    dispatch_backend_command(
                        &self.cmd_tx,
                        BackendCommand::CancelAsk,
                        &mut self.status,
                    );
                }
            } else if ui.button("Send").clicked() || submitted {
                let query = std::mem::take(&mut self.input);
                self.send_query(query);
                edit_response.request_focus();
            }
        });
    }

    fn show_resize_handles(&mut self, ui: &mut egui::Ui, rect: egui::Rect) {
        // Corners come last so they win the overlap with the edges.
        let zones = resize_zones(rect);
        for (direction, zone, cursor) in zones {
            let response = ui.interact(
                zone,
                ui.make_persistent_id(("panel_resize", direction)),
                egui::Sense::drag(),
            );
            if response.hovered() || response.dragged() {
                ui.ctx().set_cursor_icon(cursor);
            }
            if response.drag_started() {
                if let Some(pointer) = response.interact_pointer_pos() {
                    self.window.begin_resize(
                        direction,
                        Point::new(pointer.x, pointer.y),
                        to_control_rect(rect),
                    );
                }
            }
        }
    }

    fn show_launcher(&mut self, ctx: &egui::Context) {
        egui::Area::new(egui::Id::new("askdock_launcher"))
            .order(egui::Order::Foreground)
            .anchor(
                egui::Align2::RIGHT_BOTTOM,
                egui::vec2(-DOCK_MARGIN, -DOCK_MARGIN),
            )
            .show(ctx, |ui| {
                if ui.button("💬  Ask").clicked() {
                    self.set_open(true);
                }
            });
    }
}

impl eframe::App for PanelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_backend_events();
        if self.pending {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.centered_and_justified(|ui| {
                ui.label(egui::RichText::new("Host application content").weak());
            });
        });

        if self.open {
            self.show_panel(ctx);
        } else {
            self.show_launcher(ctx);
        }
    }
}

fn render_entry(ui: &mut egui::Ui, entry: &TranscriptEntry, followup_clicked: &mut Option<String>) {
    ui.add_space(6.0);
    match entry {
        TranscriptEntry::Question(text) => {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                ui.label(egui::RichText::new(text).strong());
            });
        }
        TranscriptEntry::Answer(reply) => {
            ui.label(&reply.answer);
            if let Some(earnings) = &reply.earnings {
                egui::Frame::new()
                    .fill(ui.visuals().faint_bg_color)
                    .corner_radius(egui::CornerRadius::same(6))
                    .inner_margin(egui::Margin::same(8))
                    .show(ui, |ui| {
                        ui.label(format!(
                            "≈ ${:.2} / year (${:.2} / month) at {:.1}% APR",
                            earnings.yearly,
                            earnings.monthly,
                            earnings.apr_value * 100.0
                        ));
                        if let Some(updated) = &earnings.updated_at {
                            ui.label(
                                egui::RichText::new(format!("APR updated {updated}"))
                                    .weak()
                                    .small(),
                            );
                        }
                    });
            }
            if let Some(sources) = &reply.sources {
                for source in sources {
                    ui.hyperlink_to(&source.title, &source.url);
                }
            }
            if let Some(confidence) = reply.confidence {
                if confidence < 0.5 {
                    ui.label(
                        egui::RichText::new("Low confidence — double-check the sources.")
                            .weak()
                            .small(),
                    );
                }
            }
            if let Some(followups) = &reply.followups {
                ui.horizontal_wrapped(|ui| {
                    for followup in followups {
                        if ui.small_button(followup).clicked() {
                            *followup_clicked = Some(followup.clone());
                        }
                    }
                });
            }
        }
        TranscriptEntry::Failure(copy) => {
            ui.colored_label(ui.visuals().error_fg_color, copy);
        }
    }
}

fn to_control_rect(rect: egui::Rect) -> window_control::Rect {
    window_control::Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
}

fn resize_zones(rect: egui::Rect) -> [(ResizeDirection, egui::Rect, egui::CursorIcon); 8] {
    let inner = |left: f32, top: f32, width: f32, height: f32| {
        egui::Rect::from_min_size(egui::pos2(left, top), egui::vec2(width, height))
    };
    [
        (
            ResizeDirection::Left,
            inner(rect.left(), rect.top() + CORNER_GRIP, EDGE_GRIP, rect.height() - 2.0 * CORNER_GRIP),
            egui::CursorIcon::ResizeHorizontal,
        ),
        (
            ResizeDirection::Right,
            inner(rect.right() - EDGE_GRIP, rect.top() + CORNER_GRIP, EDGE_GRIP, rect.height() - 2.0 * CORNER_GRIP),
            egui::CursorIcon::ResizeHorizontal,
        ),
        (
            ResizeDirection::Top,
            inner(rect.left() + CORNER_GRIP, rect.top(), rect.width() - 2.0 * CORNER_GRIP, EDGE_GRIP),
            egui::CursorIcon::ResizeVertical,
        ),
        (
            ResizeDirection::Bottom,
            inner(rect.left() + CORNER_GRIP, rect.bottom() - EDGE_GRIP, rect.width() - 2.0 * CORNER_GRIP, EDGE_GRIP),
            egui::CursorIcon::ResizeVertical,
        ),
        (
            ResizeDirection::TopLeft,
            inner(rect.left(), rect.top(), CORNER_GRIP, CORNER_GRIP),
            egui::CursorIcon::ResizeNwSe,
        ),
        (
            ResizeDirection::TopRight,
            inner(rect.right() - CORNER_GRIP, rect.top(), CORNER_GRIP, CORNER_GRIP),
            egui::CursorIcon::ResizeNeSw,
        ),
        (
            ResizeDirection::BottomLeft,
            inner(rect.left(), rect.bottom() - CORNER_GRIP, CORNER_GRIP, CORNER_GRIP),
            egui::CursorIcon::ResizeNeSw,
        ),
        (
            ResizeDirection::BottomRight,
            inner(rect.right() - CORNER_GRIP, rect.bottom() - CORNER_GRIP, CORNER_GRIP, CORNER_GRIP),
            egui::CursorIcon::ResizeNwSe,
        ),
    ]
}
