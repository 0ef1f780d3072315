// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Domain layer: pure data types shared between UI and archive logic.

pub mod font;
pub mod metadata;
pub mod overrides;
