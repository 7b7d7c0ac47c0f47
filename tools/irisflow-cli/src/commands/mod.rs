pub mod analyze;
pub mod config;
pub mod info;
pub mod stream;
pub mod synth;
pub mod validate;
