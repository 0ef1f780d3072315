// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Typed failures for font upload and module assembly.

use thiserror::Error;

/// Errors raised while deriving identifiers or building a module archive.
///
/// Every variant is recoverable: the session surfaces the message and the user may retry.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Upload extension outside the font allow list.
    #[error("Unsupported font format: {0}. Please choose a .ttf, .otf, .ttc or .otc file.")]
    UnsupportedFormat(String),

    /// Override list was empty after dropping blank entries.
    #[error("Add at least one font file to override.")]
    NoTargets,

    /// Author field was blank.
    #[error("Please enter an author.")]
    MissingAuthor,

    /// Override entry that would resolve outside `system/fonts`.
    #[error("Invalid override target: {0}")]
    InvalidTarget(String),

    /// Font file had no content.
    #[error("The selected font file is empty.")]
    EmptyFont,

    #[error("Failed to assemble archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("I/O error while assembling archive: {0}")]
    Io(#[from] std::io::Error),
}

impl BuildError {
    /// Whether the failure comes from user input rather than the environment.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, BuildError::Archive(_) | BuildError::Io(_))
    }
}
