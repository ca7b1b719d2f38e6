pub mod args;
pub mod config;
pub mod encoder;
pub mod error;
pub mod format;
pub mod gpu;
pub mod logging;
pub mod probe;
pub mod reencode;
pub mod tools;
