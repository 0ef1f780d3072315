// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Derive a display name and module id from an uploaded font filename.

use crate::logic::error::BuildError;
use crate::models::font::FontFormat;
use crate::models::metadata::DEFAULT_ID;

/// Values pre-filled into the metadata form after an upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DerivedIdentity {
    pub display_name: String,
    pub module_id: String,
    pub format: FontFormat,
}

/// Validate the upload extension and derive `(display name, module id)`.
///
/// # Errors
///
/// Returns [`BuildError::UnsupportedFormat`] when the extension is not one of
/// `ttf`, `otf`, `ttc` or `otc` (case-insensitive).
pub fn derive_identity(file_name: &str) -> Result<DerivedIdentity, BuildError> {
    let format = FontFormat::from_file_name(file_name)
        .ok_or_else(|| BuildError::UnsupportedFormat(file_name.to_string()))?;
    let base = strip_extension(file_name);

    Ok(DerivedIdentity {
        display_name: format_name(base),
        module_id: format_id(file_name),
        format,
    })
}

/// Drop the text after the last `.` together with the dot.
pub fn strip_extension(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((base, _)) => base,
        None => file_name,
    }
}

/// Title-case a base name split on `-` and `_`.
///
/// `"my_font-file"` becomes `"My Font File"`. Empty segments are skipped.
pub fn format_name(base: &str) -> String {
    base.split(['-', '_'])
        .filter(|segment| !segment.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Module id for a filename: the base name passed through [`sanitize_id`].
pub fn format_id(file_name: &str) -> String {
    sanitize_id(strip_extension(file_name))
}

/// Lowercase and replace everything outside `[a-z0-9._-]` with `_`.
///
/// Whitespace is replaced like any other character, so `" Inter "` becomes
/// `"_inter_"`. Only an empty input falls back to `custom_font`.
pub fn sanitize_id(value: &str) -> String {
    let out: String = value
        .to_lowercase()
        .chars()
        .map(|ch| {
            if ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '.' | '_' | '-') {
                ch
            } else {
                '_'
            }
        })
        .collect();

    if out.is_empty() {
        DEFAULT_ID.to_string()
    } else {
        out
    }
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
