// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Top-level egui application shell for building a font module.
//! Handles layout, form controls, and wiring to module generation.

pub mod components;

use eframe::egui;

use crate::mvu::{self, AppModel, Command, Msg};
use crate::ui::components::overrides;
use crate::utils::preferences::{JsonFileStore, MemoryStore, Preferences, default_store_path};

/// Stateful egui application for packaging font modules.
pub struct FontModApp {
    model: AppModel,
    inbox: Vec<Msg>,
    cmd_tx: crossbeam_channel::Sender<Command>,
    msg_rx: crossbeam_channel::Receiver<Msg>,
}

impl Default for FontModApp {
    fn default() -> Self {
        let path = default_store_path();
        let prefs = match &path {
            Some(path) => Preferences::load(&JsonFileStore::open(path)),
            None => {
                log::warn!("No config directory available; preferences will not be remembered");
                Preferences::load(&MemoryStore::default())
            }
        };
        Self::new(AppModel::from_preferences(prefs, path))
    }
}

impl FontModApp {
    /// Create the app around an existing session and start the command worker.
    ///
    /// A single worker runs commands in order, so at most one build is in flight.
    pub fn new(model: AppModel) -> Self {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded::<Command>();
        let (msg_tx, msg_rx) = crossbeam_channel::unbounded::<Msg>();

        std::thread::spawn(move || {
            for cmd in cmd_rx.iter() {
                let msg = mvu::run_command(cmd);
                let _ = msg_tx.send(msg);
            }
        });

        Self {
            model,
            inbox: Vec::new(),
            cmd_tx,
            msg_rx,
        }
    }
}

impl eframe::App for FontModApp {
    /// Drains worker results and applies queued messages before the frame is drawn.
    fn logic(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_spacing(ctx);

        // Pull messages produced by the command worker.
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.model.pending_commands = self.model.pending_commands.saturating_sub(1);
            self.inbox.push(msg);
        }

        // Process messages in the order they were produced.
        for msg in std::mem::take(&mut self.inbox) {
            let mut commands = Vec::new();
            mvu::update(&mut self.model, msg, &mut commands);
            for cmd in commands {
                if self.cmd_tx.send(cmd).is_ok() {
                    self.model.pending_commands += 1;
                }
            }
        }

        if self.model.pending_commands > 0 {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }

    /// Renders the panels; interactions are queued for the next `logic` pass.
    fn ui(&mut self, ui: &mut egui::Ui, _frame: &mut eframe::Frame) {
        let ctx = ui.ctx().clone();

        egui::Panel::top("top_bar").show_inside(ui, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading("Font Module Builder");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    self.render_theme_controls(ui);
                    if self.model.font.is_some() {
                        ui.separator();
                        self.render_generate_button(ui);
                    }
                });
            });
            ui.add_space(4.0);
        });

        self.render_error_modal(&ctx);

        egui::Panel::bottom("status_panel")
            .resizable(false)
            .show_inside(ui, |ui| {
                self.render_status(ui);
            });

        egui::CentralPanel::default().show_inside(ui, |ui| {
            ui.add_space(8.0);

            if self.model.font.is_none() {
                self.render_initial_upload(ui);
                return;
            }

            egui::ScrollArea::vertical().show(ui, |ui| {
                self.render_selected_font(ui);
                ui.add_space(12.0);

                self.render_meta_group(ui);
                ui.add_space(12.0);

                let msgs = overrides::view(ui, &self.model.overrides);
                self.inbox.extend(msgs.into_iter().map(Msg::Overrides));
                ui.add_space(8.0);
            });
        });

        if !self.inbox.is_empty() {
            ctx.request_repaint();
        }
    }
}

impl FontModApp {
    fn ensure_spacing(&self, ctx: &egui::Context) {
        ctx.style_mut(|style| {
            style.spacing.item_spacing = egui::vec2(6.0, 6.0);
        });
    }

    fn render_theme_controls(&mut self, ui: &mut egui::Ui) {
        ui.add_space(2.0);
        egui::widgets::global_theme_preference_switch(ui);
    }

    /// Empty state shown until a font is chosen.
    fn render_initial_upload(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(48.0);
            ui.label("Select a .ttf, .otf, .ttc or .otc file to get started.");
            ui.add_space(12.0);
            if ui
                .button(format!("{} Select font", egui_phosphor::regular::UPLOAD_SIMPLE))
                .clicked()
            {
                self.inbox.push(Msg::RequestPickFont);
            }
        });
    }

    fn render_selected_font(&mut self, ui: &mut egui::Ui) {
        let Some(font) = &self.model.font else {
            return;
        };
        let file_name = font.file_name.clone();
        let format = font.format.extension().to_uppercase();

        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(file_name).strong());
            ui.label(
                egui::RichText::new(format)
                    .small()
                    .color(egui::Color32::from_gray(110)),
            );
            if ui
                .button(egui_phosphor::regular::UPLOAD_SIMPLE)
                .on_hover_text("Choose another font")
                .clicked()
            {
                self.inbox.push(Msg::RequestPickFont);
            }
            if ui
                .button(egui_phosphor::regular::X)
                .on_hover_text("Start over")
                .clicked()
            {
                self.inbox.push(Msg::Reset);
            }
        });
    }

    /// Render the "Generate module" button and handle the save-file dialog interaction.
    ///
    /// Disabled while a build is running. The dialog is prefilled with `<id>.zip`.
    fn render_generate_button(&mut self, ui: &mut egui::Ui) {
        let button = egui::Button::new(format!(
            "{} Generate module",
            egui_phosphor::regular::FILE_ZIP
        ));

        if ui
            .add_enabled(self.model.can_generate(), button)
            .on_disabled_hover_text("A module is being generated")
            .clicked()
        {
            let dialog = rfd::FileDialog::new()
                .set_title("Save font module")
                .add_filter("Magisk module", &["zip"])
                .set_file_name(self.model.suggested_file_name());

            match dialog.save_file() {
                Some(path) => self.inbox.push(Msg::GenerateRequested(path)),
                None => self.inbox.push(Msg::GenerateCancelled),
            }
        }
    }

    /// Grouped metadata block; version and description sit behind "More options".
    fn render_meta_group(&mut self, ui: &mut egui::Ui) {
        let meta = self.model.metadata.clone();

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            egui::Grid::new("meta_grid")
                .num_columns(2)
                .spacing(egui::vec2(8.0, 10.0))
                .min_col_width(140.0)
                .show(ui, |ui| {
                    self.text_row(ui, "Module ID", &meta.id, "custom_font", Msg::IdChanged);
                    self.text_row(ui, "Name", &meta.name, "Custom Font", Msg::NameChanged);
                    self.text_row(ui, "Author", &meta.author, "Required", Msg::AuthorChanged);

                    ui.label("");
                    let label = if self.model.show_more_options {
                        format!("{} Less options", egui_phosphor::regular::CARET_UP)
                    } else {
                        format!("{} More options", egui_phosphor::regular::CARET_DOWN)
                    };
                    if ui.button(label).clicked() {
                        self.inbox.push(Msg::ToggleMoreOptions);
                    }
                    ui.end_row();

                    if self.model.show_more_options {
                        self.text_row(ui, "Version", &meta.version, "v1.0", Msg::VersionChanged);
                        self.text_row(
                            ui,
                            "Description",
                            &meta.description,
                            "Custom font module",
                            Msg::DescriptionChanged,
                        );
                    }
                });
        });
    }

    fn text_row(
        &mut self,
        ui: &mut egui::Ui,
        label: &str,
        value: &str,
        hint: &str,
        to_msg: fn(String) -> Msg,
    ) {
        ui.label(label);
        let mut text = value.to_string();
        if ui
            .add(egui::TextEdit::singleline(&mut text).hint_text(hint))
            .changed()
        {
            self.inbox.push(to_msg(text));
        }
        ui.end_row();
    }

    /// Render a simple modal window for error messages.
    fn render_error_modal(&mut self, ctx: &egui::Context) {
        if let Some(message) = self.model.error.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        self.inbox.push(Msg::DismissError);
                    }
                });
        }
    }

    /// Render latest status/error message when present.
    fn render_status(&self, ui: &mut egui::Ui) {
        if let Some(text) = &self.model.status {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(text).color(egui::Color32::from_gray(68)));
                if self.model.pending_commands > 0 {
                    ui.add(egui::Spinner::new().size(14.0));
                }
            });
        }
    }
}
