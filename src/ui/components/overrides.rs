// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Editable list of system font files to override, in MVU shape.

use eframe::egui;

use crate::models::overrides::OverrideList;

/// UI model for the override rows. Rows may be blank while being edited.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct OverridesModel {
    entries: Vec<String>,
}

/// Messages emitted by the overrides view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OverridesMsg {
    Add,
    Remove(usize),
    Edit { index: usize, value: String },
    RestoreDefaults,
}

/// User-facing feedback surfaced to the status bar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverridesEvent {
    pub message: String,
    pub is_error: bool,
}

impl OverridesModel {
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Snapshot the rows as a domain list.
    pub fn to_list(&self) -> OverrideList {
        OverrideList::new(self.entries.clone())
    }
}

/// Apply a message to the model. Returns a feedback event when relevant.
pub fn update(model: &mut OverridesModel, msg: OverridesMsg) -> Option<OverridesEvent> {
    match msg {
        OverridesMsg::Add => {
            model.entries.push(String::new());
            None
        }
        OverridesMsg::Remove(index) => {
            if index < model.entries.len() {
                model.entries.remove(index);
                return Some(OverridesEvent {
                    message: "Override removed".to_string(),
                    is_error: false,
                });
            }
            None
        }
        OverridesMsg::Edit { index, value } => {
            if let Some(slot) = model.entries.get_mut(index) {
                *slot = value;
            }
            None
        }
        OverridesMsg::RestoreDefaults => {
            model.entries = OverrideList::stock().entries().to_vec();
            Some(OverridesEvent {
                message: "Restored default Roboto overrides".to_string(),
                is_error: false,
            })
        }
    }
}

/// Render the override rows and return any messages triggered by user interaction.
pub fn view(ui: &mut egui::Ui, model: &OverridesModel) -> Vec<OverridesMsg> {
    let mut msgs = Vec::new();

    egui::CollapsingHeader::new("Fonts to override")
        .default_open(true)
        .show(ui, |ui| {
            ui.label(
                egui::RichText::new(
                    "Files under /system/fonts replaced by your font. Names without an extension get .ttf.",
                )
                .small()
                .color(egui::Color32::from_gray(110)),
            );
            ui.add_space(6.0);

            let entries = model.entries();
            if entries.is_empty() {
                ui.label(
                    egui::RichText::new("No overrides yet.")
                        .italics()
                        .color(egui::Color32::from_gray(110)),
                );
            }

            for (index, entry) in entries.iter().enumerate() {
                ui.horizontal(|ui| {
                    let mut value = entry.clone();
                    if ui
                        .add(
                            egui::TextEdit::singleline(&mut value)
                                .hint_text("e.g. Roboto-Regular.ttf")
                                .desired_width(260.0),
                        )
                        .changed()
                    {
                        msgs.push(OverridesMsg::Edit { index, value });
                    }

                    if ui
                        .button(
                            egui::RichText::new(egui_phosphor::regular::TRASH_SIMPLE)
                                .color(egui::Color32::from_gray(140)),
                        )
                        .on_hover_text("Remove")
                        .clicked()
                    {
                        msgs.push(OverridesMsg::Remove(index));
                    }
                });
            }

            ui.add_space(6.0);
            ui.horizontal(|ui| {
                if ui
                    .button(format!("{} Add override", egui_phosphor::regular::PLUS))
                    .clicked()
                {
                    msgs.push(OverridesMsg::Add);
                }
                if ui
                    .button(format!(
                        "{} Restore defaults",
                        egui_phosphor::regular::ARROW_COUNTER_CLOCKWISE
                    ))
                    .clicked()
                {
                    msgs.push(OverridesMsg::RestoreDefaults);
                }
            });
        });

    msgs
}
