use log::info;
use std::fmt::{Debug, Formatter};

type WriterCallback = dyn Fn(&str) + Send + Sync;

/// Sink for operator-facing messages (progress, SQL, warnings).
///
/// The default writer forwards every message to the `log` facade.
pub struct OutputWriter {
    callback: Box<WriterCallback>,
}

impl OutputWriter {
    pub fn new(callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Self {
            callback: Box::new(callback),
        }
    }

    pub fn write<S: AsRef<str>>(&self, message: S) {
        (self.callback)(message.as_ref());
    }
}

impl Default for OutputWriter {
    fn default() -> Self {
        Self::new(|message| info!(target: "creed::migrations", "{}", message))
    }
}

impl Debug for OutputWriter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputWriter").finish()
    }
}
