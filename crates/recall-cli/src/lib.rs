//! Interactive front end for the recall assistant

pub mod config;
pub mod handlers;
pub mod knowledge;
pub mod state;
