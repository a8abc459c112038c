//! Application orchestration: state, event reading, and input mapping.

pub mod event;
pub mod handler;
pub mod state;
