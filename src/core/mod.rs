//! Core loop logic – strip geometry, wrapping, progress, easing and input.
//!
//! Nothing in this module depends on any TUI or rendering crate.  Output
//! goes through [`render::StripRenderer`] and per-frame work through
//! [`scheduler::FrameScheduler`], so every loop can be stepped by hand.

pub mod boundary;
pub mod controller;
pub mod geometry;
pub mod input;
pub mod motion;
pub mod progress;
pub mod render;
pub mod scheduler;
