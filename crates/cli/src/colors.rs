// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal colors for status output.
//!
//! Respects environment variables:
//! - `NO_COLOR=1`: Disables colors
//! - `COLOR=1`: Forces colors even without TTY

use std::io::IsTerminal;

use crate::env;

/// ANSI 256-color codes.
pub mod codes {
    /// Healthy state: green
    pub const GOOD: u8 = 71;
    /// Failed state: red
    pub const BAD: u8 = 167;
    /// Secondary details: medium grey
    pub const CONTEXT: u8 = 245;
}

/// Check if colors should be enabled based on TTY and environment variables.
pub fn should_colorize() -> bool {
    if env::no_color() {
        return false;
    }
    if env::force_color() {
        return true;
    }
    std::io::stdout().is_terminal()
}

const RESET: &str = "\x1b[0m";

fn paint(code: u8, text: &str) -> String {
    format!("\x1b[38;5;{code}m{text}{RESET}")
}

/// Paints text when `enabled`, returns it unchanged otherwise.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub const fn new(enabled: bool) -> Self {
        Palette { enabled }
    }

    /// Colors only when writing to a terminal that accepts them.
    pub fn detect() -> Self {
        Palette::new(should_colorize())
    }

    pub fn good(&self, text: &str) -> String {
        self.apply(codes::GOOD, text)
    }

    pub fn bad(&self, text: &str) -> String {
        self.apply(codes::BAD, text)
    }

    pub fn context(&self, text: &str) -> String {
        self.apply(codes::CONTEXT, text)
    }

    fn apply(&self, code: u8, text: &str) -> String {
        if self.enabled {
            paint(code, text)
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
#[path = "colors_tests.rs"]
mod tests;
