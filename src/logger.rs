use log::Level;

/// Sink for the progress messages emitted during a fetch.
///
/// Implementations must not fail: a broken sink never aborts a fetch.
pub trait FetchLog {
    fn log(&self, level: Level, message: &str);
}

/// Forwards every message to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogCrate;

impl FetchLog for LogCrate {
    fn log(&self, level: Level, message: &str) {
        log::log!(target: "ado_mirror", level, "{}", message);
    }
}
