pub mod commands;
pub mod stream;
