pub mod app;
pub mod domain;
pub mod infra;
pub mod ui;

pub fn init() {
    infra::logging::init();
}
