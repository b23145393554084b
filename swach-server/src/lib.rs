pub mod commands;
pub mod http;
pub mod seed;
pub mod state;
