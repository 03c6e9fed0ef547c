//! Utilities shared by the Stagesync binaries and their tests.

pub mod logger;
pub mod time;
