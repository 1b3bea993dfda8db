//! Runs in its own process: installs a foreign logger before ours.

use log::{LevelFilter, Log, Metadata, Record};
use panoview_core::init_with_level;

struct Silent;

impl Log for Silent {
    fn enabled(&self, _: &Metadata) -> bool {
        false
    }
    fn log(&self, _: &Record) {}
    fn flush(&self) {}
}

static SILENT: Silent = Silent;

#[test]
fn init_keeps_failing_while_another_logger_is_installed() {
    log::set_logger(&SILENT).expect("foreign logger");
    assert!(init_with_level(LevelFilter::Info).is_err());
    assert!(init_with_level(LevelFilter::Debug).is_err());
}
