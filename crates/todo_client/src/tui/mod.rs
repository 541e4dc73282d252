mod app;
mod forms;
mod input;
mod runner;
mod ui;

pub use app::{App, Banner, BannerKind, Command, DeleteTarget, Outcome, Screen, StatusFilter};
pub use forms::validate_registration;
pub use runner::{perform, run};
