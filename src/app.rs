//! Application shell
//!
//! The egui window: preview canvas, region-selection controls, and the
//! lookup-table CRUD panel. Everything here is presentation and input glue;
//! the pipeline, region editor, and store own the behavior.

use std::time::{Duration, Instant};

use anyhow::Result;
use eframe::egui;
use egui::{Color32, FontId, Pos2, Rect as UiRect, RichText, Stroke, Vec2};
use tracing::{error, info, warn};

use crate::capture::{CameraDevice, CameraSource};
use crate::config::AppConfig;
use crate::session::SessionState;
use crate::storage::{csv_import, LookupEntry, LookupStore};
use crate::vision::{Agreement, TickOutput, VisionPipeline};

/// Text colors for the overlay annotations.
const OVERLAY_TEXT: Color32 = Color32::from_rgb(0, 255, 0);
const MATCH_TEXT: Color32 = Color32::from_rgb(0, 0, 255);
const MISMATCH_TEXT: Color32 = Color32::from_rgb(255, 0, 0);
const SELECTION_OUTLINE: Color32 = Color32::RED;

/// State of the modal add-entry form.
#[derive(Debug, Default)]
struct AddEntryForm {
    barcode: String,
    text: String,
}

/// The main application window.
pub struct VeriscanApp {
    config: AppConfig,
    session: SessionState,
    store: LookupStore,
    pipeline: VisionPipeline,
    camera: Option<CameraSource>,
    cameras: Vec<CameraDevice>,
    /// Cached listing of the store, reloaded after every mutation
    entries: Vec<LookupEntry>,
    selected_entry: Option<usize>,
    /// Output of the most recent completed tick; kept across skipped ticks
    /// so the canvas does not flicker
    last_output: Option<TickOutput>,
    preview_texture: Option<egui::TextureHandle>,
    last_tick: Instant,
    add_form: Option<AddEntryForm>,
    status: Option<String>,
}

impl VeriscanApp {
    pub fn new(
        config: AppConfig,
        store: LookupStore,
        pipeline: VisionPipeline,
        camera: CameraSource,
        cameras: Vec<CameraDevice>,
    ) -> Result<Self> {
        let canvas = config.canvas();
        let camera_index = config.camera.index;
        let entries = store.list_all()?;
        Ok(Self {
            config,
            session: SessionState::new(canvas, camera_index),
            store,
            pipeline,
            camera: Some(camera),
            cameras,
            entries,
            selected_entry: None,
            last_output: None,
            preview_texture: None,
            last_tick: Instant::now() - Duration::from_secs(1),
            add_form: None,
            status: None,
        })
    }

    /// eframe options for the main window.
    pub fn options(config: &AppConfig) -> eframe::NativeOptions {
        let width = config.camera.canvas_width as f32 + 280.0;
        let height = (config.camera.canvas_height as f32 + 40.0).max(560.0);
        eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([width, height])
                .with_resizable(false)
                .with_title("veriscan"),
            ..Default::default()
        }
    }

    fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.config.ui.tick_interval_ms)
    }

    /// Run one pipeline tick if the session is live and the interval has
    /// elapsed. A `None` outcome (no frame) leaves the previous output and
    /// both regions untouched.
    fn maybe_tick(&mut self) {
        if !self.session.editor.is_live() {
            return;
        }
        if self.last_tick.elapsed() < self.tick_interval() {
            return;
        }
        self.last_tick = Instant::now();

        let Some(camera) = self.camera.as_mut() else {
            return;
        };
        let committed = self.session.editor.committed();
        match self.pipeline.tick(camera, committed, &self.store) {
            Ok(Some(output)) => {
                self.last_output = Some(output);
            }
            Ok(None) => {} // no frame: silent skip
            Err(e) => {
                error!(error = %e, "pipeline tick failed");
                self.status = Some(format!("Tick failed: {e}"));
            }
        }
    }

    fn reload_entries(&mut self) {
        match self.store.list_all() {
            Ok(entries) => {
                self.entries = entries;
                if self
                    .selected_entry
                    .is_some_and(|i| i >= self.entries.len())
                {
                    self.selected_entry = None;
                }
            }
            Err(e) => {
                error!(error = %e, "failed to list lookup entries");
                self.status = Some(format!("List failed: {e}"));
            }
        }
    }

    fn switch_camera(&mut self, index: u32) {
        if self.session.camera_index == index {
            return;
        }
        // Release the old handle before opening the new one
        self.camera = None;
        match CameraSource::open(index) {
            Ok(camera) => {
                self.camera = Some(camera);
                self.session.camera_index = index;
                self.status = None;
            }
            Err(e) => {
                error!(error = %e, index, "failed to switch camera");
                self.status = Some(format!("Camera {index} failed: {e}"));
            }
        }
    }

    fn import_csv(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV files", &["csv"])
            .pick_file()
        else {
            return;
        };
        let result = csv_import::read_entries(&path)
            .and_then(|entries| {
                let count = entries.len();
                self.store.upsert_batch(&entries)?;
                Ok(count)
            });
        match result {
            Ok(count) => {
                info!(count, path = %path.display(), "CSV imported");
                self.status = Some(format!("Imported {count} entries"));
                self.reload_entries();
            }
            Err(e) => {
                error!(error = %e, "CSV import failed");
                self.status = Some(format!("Import failed: {e}"));
            }
        }
    }

    fn delete_selected(&mut self) {
        let Some(index) = self.selected_entry else {
            return;
        };
        let Some(entry) = self.entries.get(index) else {
            return;
        };
        if let Err(e) = self.store.delete(&entry.barcode) {
            error!(error = %e, "delete failed");
            self.status = Some(format!("Delete failed: {e}"));
            return;
        }
        self.selected_entry = None;
        self.reload_entries();
    }

    /// Upload the latest frame to the GPU, reusing the texture when the
    /// dimensions have not changed.
    fn update_preview_texture(&mut self, ctx: &egui::Context) {
        let Some(output) = &self.last_output else {
            return;
        };
        let (w, h) = output.frame.dimensions();
        let color_image =
            egui::ColorImage::from_rgb([w as usize, h as usize], output.frame.as_raw());

        match &mut self.preview_texture {
            Some(texture) if texture.size() == [w as usize, h as usize] => {
                texture.set(color_image, egui::TextureOptions::LINEAR);
            }
            _ => {
                self.preview_texture = Some(ctx.load_texture(
                    "camera_preview",
                    color_image,
                    egui::TextureOptions::LINEAR,
                ));
            }
        }
    }

    fn render_canvas(&mut self, ui: &mut egui::Ui) {
        let canvas = self.session.editor.canvas();
        let size = Vec2::new(canvas.width() as f32, canvas.height() as f32);
        let (response, painter) = ui.allocate_painter(size, egui::Sense::click_and_drag());
        let origin = response.rect.min;

        // Pointer input only redefines the region while selecting; the
        // editor itself ignores it while live.
        if let Some(pos) = response.interact_pointer_pos() {
            let x = (pos.x - origin.x).round() as i32;
            let y = (pos.y - origin.y).round() as i32;
            if response.drag_started() {
                self.session.editor.pointer_press(x, y);
            } else if response.dragged() {
                self.session.editor.pointer_drag(x, y);
            }
        }

        // Composed frame from the last completed tick
        if let Some(texture) = &self.preview_texture {
            painter.image(
                texture.id(),
                UiRect::from_min_size(origin, size),
                UiRect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                Color32::WHITE,
            );
        } else {
            painter.rect_filled(response.rect, 0.0, Color32::BLACK);
            painter.text(
                response.rect.center(),
                egui::Align2::CENTER_CENTER,
                "Waiting for camera...",
                FontId::proportional(16.0),
                Color32::GRAY,
            );
        }

        // Text overlays from the last tick
        if let Some(output) = &self.last_output {
            if let Some(detection) = &output.barcode {
                let pos = origin
                    + Vec2::new(detection.bounds.left as f32, detection.bounds.top as f32 - 14.0);
                painter.text(
                    pos,
                    egui::Align2::LEFT_BOTTOM,
                    &detection.value,
                    FontId::monospace(14.0),
                    OVERLAY_TEXT,
                );
            }
            if let Some(text) = &output.ocr_text {
                let committed = self.session.editor.committed();
                let pos = origin + Vec2::new(committed.left as f32, committed.top as f32);
                painter.text(
                    pos,
                    egui::Align2::LEFT_TOP,
                    text,
                    FontId::monospace(18.0),
                    OVERLAY_TEXT,
                );
            }
            if let Some(verdict) = &output.verdict {
                let color = match verdict.agreement {
                    Agreement::Match => MATCH_TEXT,
                    Agreement::Mismatch => MISMATCH_TEXT,
                };
                painter.text(
                    origin,
                    egui::Align2::LEFT_TOP,
                    &verdict.expected,
                    FontId::monospace(18.0),
                    color,
                );
            }
        }

        // Selection outline always tracks the working region, so the user
        // sees the rectangle they are dragging while OCR still targets the
        // committed one.
        let working = self.session.editor.working();
        let outline = UiRect::from_min_max(
            origin + Vec2::new(working.left as f32, working.top as f32),
            origin + Vec2::new(working.right as f32, working.bottom as f32),
        );
        painter.rect_stroke(outline, 0.0, Stroke::new(1.5, SELECTION_OUTLINE));
    }

    fn render_side_panel(&mut self, ui: &mut egui::Ui) {
        let selecting = !self.session.editor.is_live();

        ui.horizontal(|ui| {
            ui.label("Camera");
            let mut selected = self.session.camera_index;
            egui::ComboBox::from_id_salt("camera_select")
                .selected_text(self.camera_label(selected))
                .show_ui(ui, |ui| {
                    for device in &self.cameras {
                        ui.selectable_value(
                            &mut selected,
                            device.index,
                            format!("{}: {}", device.index, device.name),
                        );
                    }
                });
            if selected != self.session.camera_index {
                self.switch_camera(selected);
            }
        });

        ui.add_space(8.0);
        ui.separator();

        if ui
            .add_enabled(!selecting, egui::Button::new("Select region"))
            .clicked()
        {
            self.session.editor.begin_selection();
        }
        if ui
            .add_enabled(selecting, egui::Button::new("Clear"))
            .clicked()
        {
            self.session.editor.clear();
        }
        if ui
            .add_enabled(selecting, egui::Button::new("Confirm"))
            .clicked()
        {
            self.session.editor.confirm();
            self.last_tick = Instant::now() - self.tick_interval();
        }
        if ui
            .add_enabled(selecting, egui::Button::new("Cancel"))
            .clicked()
        {
            self.session.editor.cancel();
            self.last_tick = Instant::now() - self.tick_interval();
        }

        ui.add_space(8.0);
        ui.separator();

        if ui.button("Import CSV").clicked() {
            self.import_csv();
        }
        if ui.button("Add").clicked() {
            self.add_form = Some(AddEntryForm::default());
        }
        if ui.button("Delete").clicked() {
            self.delete_selected();
        }

        ui.add_space(8.0);

        egui::ScrollArea::vertical()
            .max_height(ui.available_height() - 30.0)
            .show(ui, |ui| {
                if self.entries.is_empty() {
                    ui.label(RichText::new("No entries").italics().color(Color32::GRAY));
                }
                for (index, entry) in self.entries.iter().enumerate() {
                    let selected = self.selected_entry == Some(index);
                    let label = format!("{} - {}", entry.barcode, entry.text);
                    if ui.selectable_label(selected, label).clicked() {
                        self.selected_entry = if selected { None } else { Some(index) };
                    }
                }
            });

        if let Some(status) = &self.status {
            ui.separator();
            ui.label(RichText::new(status).color(Color32::YELLOW));
        }
    }

    fn render_add_form(&mut self, ctx: &egui::Context) {
        let Some(form) = &mut self.add_form else {
            return;
        };
        let mut submit = false;
        let mut close = false;

        egui::Window::new("Add entry")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                egui::Grid::new("add_entry_grid").num_columns(2).show(ui, |ui| {
                    ui.label("barcode");
                    ui.text_edit_singleline(&mut form.barcode);
                    ui.end_row();
                    ui.label("text");
                    ui.text_edit_singleline(&mut form.text);
                    ui.end_row();
                });

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        close = true;
                    }
                    // An empty barcode can never be added
                    let can_save = !form.barcode.trim().is_empty();
                    if ui.add_enabled(can_save, egui::Button::new("OK")).clicked() {
                        submit = true;
                    }
                });
            });

        if submit {
            let form = self.add_form.take().unwrap_or_default();
            let barcode = form.barcode.trim().to_string();
            match self.store.upsert(&barcode, form.text.trim()) {
                Ok(()) => self.reload_entries(),
                Err(e) => {
                    warn!(error = %e, "add entry failed");
                    self.status = Some(format!("Add failed: {e}"));
                }
            }
        } else if close {
            self.add_form = None;
        }
    }

    fn camera_label(&self, index: u32) -> String {
        self.cameras
            .iter()
            .find(|d| d.index == index)
            .map(|d| format!("{}: {}", d.index, d.name))
            .unwrap_or_else(|| index.to_string())
    }
}

impl eframe::App for VeriscanApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.maybe_tick();
        self.update_preview_texture(ctx);

        egui::SidePanel::right("controls")
            .exact_width(260.0)
            .show(ctx, |ui| {
                self.render_side_panel(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_canvas(ui);
        });

        self.render_add_form(ctx);

        // Re-arm the tick chain only while live; pausing for region
        // selection simply stops rescheduling.
        if self.session.editor.is_live() {
            ctx.request_repaint_after(self.tick_interval());
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // Release the camera handle before the process terminates
        self.camera = None;
        info!("shutdown complete");
    }
}
