// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Pure module-building logic, free of UI concerns.

pub mod error;
pub mod identity;
pub mod module;
