mod connection;

pub use connection::{ConnectionEvent, MockConnection};
pub use migrations::*;

use crate::OutputWriter;
use std::sync::{Arc, Mutex};

/// Output writer collecting every message.
pub fn capture_output() -> (OutputWriter, Arc<Mutex<Vec<String>>>) {
    let _ = env_logger::builder().is_test(true).try_init();

    let messages = Arc::new(Mutex::new(vec![]));
    let sink = messages.clone();
    let writer = OutputWriter::new(move |message| sink.lock().unwrap().push(message.to_string()));

    (writer, messages)
}
