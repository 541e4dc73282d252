pub mod api;
pub mod cli;
pub mod session;
pub mod tui;
