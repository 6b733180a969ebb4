// src/core/mod.rs

pub mod boundary;
pub mod overlay;
pub mod registry;
pub mod script;
pub mod session;
pub mod types;
