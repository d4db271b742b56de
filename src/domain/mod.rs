//! Domain Layer
//!
//! Core business entity definitions

pub mod appointment;
pub mod chat;

pub use appointment::*;
pub use chat::*;
