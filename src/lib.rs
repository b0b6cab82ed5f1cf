//! Pill-shaped progress indicator driven by an external scroll signal.
//!
//! The stroke fills along a rounded-rectangle path as progress advances, a
//! marker eases along behind it, colours shift across four bands, and the
//! day/distance label crossfades when the day changes.

pub mod app;
pub mod config;
pub mod features;
pub mod gfx;
pub mod scheduler;
