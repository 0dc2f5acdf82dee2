// src/services/mod.rs

pub mod identity;
pub mod pipeline;
pub mod sequencer;
