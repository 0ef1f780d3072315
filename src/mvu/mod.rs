// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Root Model-View-Update kernel wiring session state, messages, and commands.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::logic::error::BuildError;
use crate::logic::identity::derive_identity;
use crate::logic::module::{archive_file_name, build_module, target_file_names};
use crate::models::font::{FontFormat, UploadedFont};
use crate::models::metadata::ModuleMetadata;
use crate::models::overrides::OverrideList;
use crate::ui::components::overrides::{self, OverridesModel, OverridesMsg};
use crate::utils::preferences::{JsonFileStore, Preferences};

/// Session state for one font module.
#[derive(Debug, Default)]
pub struct AppModel {
    /// Font chosen for this session, if any.
    pub font: Option<UploadedFont>,
    /// Editable `module.prop` fields.
    pub metadata: ModuleMetadata,
    /// Override rows editor state.
    pub overrides: OverridesModel,
    /// Whether version and description inputs are shown.
    pub show_more_options: bool,
    /// Preferences file; `None` disables persistence.
    pub preferences_path: Option<PathBuf>,
    /// A build is in flight.
    pub building: bool,
    /// Latest status message to display.
    pub status: Option<String>,
    /// Latest error message to display in modal.
    pub error: Option<String>,
    /// Count of queued background commands.
    pub pending_commands: usize,
}

impl AppModel {
    /// Start a session from remembered preferences.
    pub fn from_preferences(prefs: Preferences, preferences_path: Option<PathBuf>) -> Self {
        Self {
            metadata: ModuleMetadata {
                author: prefs.author,
                ..Default::default()
            },
            overrides: OverridesModel::new(prefs.overrides),
            preferences_path,
            ..Default::default()
        }
    }

    /// Suggested archive name for the save dialog.
    pub fn suggested_file_name(&self) -> String {
        archive_file_name(&self.metadata.with_defaults().id)
    }

    /// Whether the generate action is currently allowed.
    pub fn can_generate(&self) -> bool {
        self.font.is_some() && !self.building
    }
}

/// Application messages routed through the update function.
#[derive(Debug)]
pub enum Msg {
    RequestPickFont,
    FontPicked(Option<PathBuf>),
    Reset,
    IdChanged(String),
    NameChanged(String),
    AuthorChanged(String),
    VersionChanged(String),
    DescriptionChanged(String),
    ToggleMoreOptions,
    Overrides(OverridesMsg),
    GenerateRequested(PathBuf),
    GenerateCancelled,
    ModuleGenerated(Result<Generated, String>),
    PreferencesSaved(Result<(), String>),
    DismissError,
}

/// Commands represent side-effects executed off the UI thread.
#[derive(Debug)]
pub enum Command {
    PickFont,
    BuildModule(BuildPayload),
    SavePreferences { path: PathBuf, prefs: Preferences },
}

/// Captured, validated data for one build.
#[derive(Clone, Debug)]
pub struct BuildPayload {
    /// Destination archive path.
    pub output: PathBuf,
    pub font: UploadedFont,
    pub metadata: ModuleMetadata,
    pub overrides: OverrideList,
}

/// Outcome of a successful build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Generated {
    pub output: PathBuf,
    pub font_count: usize,
    /// Author and cleaned overrides to remember for the next session.
    pub preferences: Preferences,
}

/// Update the session model and enqueue commands.
pub fn update(model: &mut AppModel, msg: Msg, cmds: &mut Vec<Command>) {
    match msg {
        Msg::RequestPickFont => cmds.push(Command::PickFont),
        Msg::FontPicked(None) => {}
        Msg::FontPicked(Some(path)) => select_font(model, path),
        Msg::Reset => {
            model.font = None;
            model.metadata = ModuleMetadata {
                author: std::mem::take(&mut model.metadata.author),
                ..Default::default()
            };
            model.error = None;
            model.status = Some("Ready for a new font.".into());
        }
        Msg::IdChanged(text) => model.metadata.id = text,
        Msg::NameChanged(text) => model.metadata.name = text,
        Msg::AuthorChanged(text) => model.metadata.author = text,
        Msg::VersionChanged(text) => model.metadata.version = text,
        Msg::DescriptionChanged(text) => model.metadata.description = text,
        Msg::ToggleMoreOptions => model.show_more_options = !model.show_more_options,
        Msg::Overrides(m) => {
            if let Some(event) = overrides::update(&mut model.overrides, m) {
                surface_event(model, event.message, event.is_error);
            }
        }
        Msg::DismissError => model.error = None,
        Msg::GenerateRequested(output) => {
            if model.building {
                log::debug!("Ignoring generate request while a build is running");
                return;
            }
            match validate_for_build(model, output) {
                Ok(payload) => {
                    model.building = true;
                    surface_event(model, "Generating module...".into(), false);
                    cmds.push(Command::BuildModule(payload));
                }
                Err(err) => surface_event(model, err, true),
            }
        }
        Msg::GenerateCancelled => surface_event(model, "Generation cancelled.".to_string(), false),
        Msg::ModuleGenerated(result) => {
            model.building = false;
            match result {
                Ok(generated) => {
                    surface_event(
                        model,
                        format!(
                            "Module generated: {} ({} font file(s))",
                            generated.output.display(),
                            generated.font_count
                        ),
                        false,
                    );
                    if let Some(path) = model.preferences_path.clone() {
                        cmds.push(Command::SavePreferences {
                            path,
                            prefs: generated.preferences,
                        });
                    }
                }
                Err(err) => surface_event(model, format!("Error: {err}"), true),
            }
        }
        Msg::PreferencesSaved(Ok(())) => {}
        Msg::PreferencesSaved(Err(err)) => {
            log::warn!("Failed to save preferences: {err}");
        }
    }
}

/// Execute a command and return the resulting message.
pub fn run_command(cmd: Command) -> Msg {
    match cmd {
        Command::PickFont => {
            let file = rfd::FileDialog::new()
                .set_title("Select font file")
                .add_filter("Font", &FontFormat::EXTENSIONS)
                .pick_file();
            Msg::FontPicked(file)
        }
        Command::BuildModule(payload) => {
            Msg::ModuleGenerated(build_and_write(&payload).map_err(|err| format!("{err:#}")))
        }
        Command::SavePreferences { path, prefs } => {
            Msg::PreferencesSaved(save_preferences(&path, &prefs).map_err(|err| format!("{err:#}")))
        }
    }
}

/// Read the font, assemble the module in memory, then write it in one go.
fn build_and_write(payload: &BuildPayload) -> Result<Generated> {
    let bytes = payload.font.read_bytes()?;
    let archive = build_module(&bytes, &payload.metadata, &payload.overrides).inspect_err(|err| {
        if err.is_input_error() {
            log::warn!("Rejected module build: {err}");
        } else {
            log::error!("Module build failed: {err}");
        }
    })?;
    archive.write_to(&payload.output)?;

    log::info!(
        "Wrote {} to {:?} with {} font file(s) from {} ({})",
        archive.file_name(),
        payload.output,
        archive.font_count(),
        payload.font.file_name,
        payload.font.format.extension()
    );

    Ok(Generated {
        output: payload.output.clone(),
        font_count: archive.font_count(),
        preferences: Preferences {
            author: payload.metadata.author.trim().to_string(),
            overrides: payload.overrides.cleaned(),
        },
    })
}

fn save_preferences(path: &Path, prefs: &Preferences) -> Result<()> {
    let mut store = JsonFileStore::open(path);
    prefs.store(&mut store)
}

/// Validate the extension and, on success, replace the session font and seed id and name.
fn select_font(model: &mut AppModel, path: PathBuf) {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    match derive_identity(&file_name) {
        Ok(derived) => {
            log::info!("Selected font {:?}", path);
            model.metadata.id = derived.module_id;
            model.metadata.name = derived.display_name;
            model.font = Some(UploadedFont::new(path, file_name.clone(), derived.format));
            surface_event(model, format!("Selected font: {file_name}"), false);
        }
        Err(err) => surface_event(model, err.to_string(), true),
    }
}

/// Update status/error fields consistently for user feedback.
fn surface_event(model: &mut AppModel, message: String, is_error: bool) {
    if is_error {
        model.error = Some(message.clone());
    }
    model.status = Some(message);
}

/// Validate session state and build the payload required for one build.
///
/// Missing targets and a blank author are caught here, before any bytes are
/// read; `build_module` repeats those checks for the queued build.
fn validate_for_build(model: &AppModel, output: PathBuf) -> Result<BuildPayload, String> {
    let font = model
        .font
        .clone()
        .ok_or_else(|| "Please select a font file first.".to_string())?;

    let overrides = model.overrides.to_list();
    target_file_names(&overrides).map_err(|err| err.to_string())?;

    if model.metadata.author.trim().is_empty() {
        return Err(BuildError::MissingAuthor.to_string());
    }

    Ok(BuildPayload {
        output,
        font,
        metadata: model.metadata.clone(),
        overrides,
    })
}
