// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Module metadata as entered by the user, plus the fallbacks applied at build time.

pub const DEFAULT_ID: &str = "custom_font";
pub const DEFAULT_NAME: &str = "Custom Font";
pub const DEFAULT_VERSION: &str = "v1.0";
pub const DEFAULT_DESCRIPTION: &str = "Custom font module";

/// Editable `module.prop` fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModuleMetadata {
    pub id: String,
    pub name: String,
    pub author: String,
    pub version: String,
    pub description: String,
}

impl ModuleMetadata {
    /// Trim every field and fill blank ones with their defaults.
    ///
    /// The author is trimmed but never defaulted; callers decide how to treat a blank author.
    pub fn with_defaults(&self) -> Self {
        Self {
            id: or_default(&self.id, DEFAULT_ID),
            name: or_default(&self.name, DEFAULT_NAME),
            author: self.author.trim().to_string(),
            version: or_default(&self.version, DEFAULT_VERSION),
            description: or_default(&self.description, DEFAULT_DESCRIPTION),
        }
    }
}

fn or_default(value: &str, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}
