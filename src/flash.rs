// SPDX-License-Identifier: GPL-3.0-only

//! Flash mode selection
//!
//! The host shows a flash button whose title cycles through user-facing
//! labels. Labels are resolved here into the mode handed to the capture
//! backend; anything unrecognized falls back to automatic.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Flash operating mode forwarded to the capture backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlashMode {
    /// Backend decides per shot based on scene light
    #[default]
    Auto,
    /// Flash fires on every capture
    On,
    /// Flash never fires
    Off,
}

impl FlashMode {
    pub const ALL: [FlashMode; 3] = [FlashMode::Auto, FlashMode::On, FlashMode::Off];

    /// Resolve a flash button label. Total: unknown labels yield [`FlashMode::Auto`].
    pub fn resolve(label: &str) -> Self {
        match label {
            "ON" => FlashMode::On,
            "OFF" => FlashMode::Off,
            _ => FlashMode::Auto,
        }
    }

    /// Label shown on the flash button for this mode
    pub fn label(self) -> &'static str {
        match self {
            FlashMode::Auto => "AUTO",
            FlashMode::On => "ON",
            FlashMode::Off => "OFF",
        }
    }

    /// Cycle to the next mode: Auto -> On -> Off -> Auto
    pub fn next(self) -> Self {
        match self {
            FlashMode::Auto => FlashMode::On,
            FlashMode::On => FlashMode::Off,
            FlashMode::Off => FlashMode::Auto,
        }
    }
}

impl fmt::Display for FlashMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
