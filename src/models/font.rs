// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Uploaded font domain model and the extension allow list (UI-agnostic).

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Font container formats accepted for upload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontFormat {
    Ttf,
    Otf,
    Ttc,
    Otc,
}

impl FontFormat {
    /// Every accepted format, in the order shown in file dialogs.
    pub const ALL: [FontFormat; 4] = [
        FontFormat::Ttf,
        FontFormat::Otf,
        FontFormat::Ttc,
        FontFormat::Otc,
    ];

    /// Allowed extensions, as used by the file picker filter.
    pub const EXTENSIONS: [&'static str; 4] = ["ttf", "otf", "ttc", "otc"];

    /// Lowercase extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            FontFormat::Ttf => "ttf",
            FontFormat::Otf => "otf",
            FontFormat::Ttc => "ttc",
            FontFormat::Otc => "otc",
        }
    }

    /// Match a filename suffix against the allow list, ignoring case.
    ///
    /// Only the text after the last `.` counts; a name without a dot never matches.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        Self::ALL
            .into_iter()
            .find(|format| ext.eq_ignore_ascii_case(format.extension()))
    }
}

/// Font chosen by the user for the current session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadedFont {
    pub path: PathBuf,
    pub file_name: String,
    pub format: FontFormat,
}

impl UploadedFont {
    pub fn new(path: PathBuf, file_name: String, format: FontFormat) -> Self {
        Self {
            path,
            file_name,
            format,
        }
    }

    /// Read the whole font into memory.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be opened or fully read.
    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        fs::read(&self.path)
            .with_context(|| format!("Failed to read font file {:?}", self.path))
    }
}
