//! Console rendering for the front-deploy binary
//!
//! - `theme` - Colors, icons and borders (all glyphs come from here)
//! - `terminal` / `context` - Capability detection and per-run output settings
//! - `primitives`, `widgets`, `blocks` - Building blocks, smallest first
//! - `views` - Whole screens and the console event sink
//! - `error` - Top-level error formatting

pub mod blocks;
pub mod context;
pub mod error;
pub mod primitives;
pub mod terminal;
pub mod theme;
pub mod views;
pub mod widgets;
