//! Sinks for recoverable decode failures.

use tracing::warn;

use crate::error::Error;

/// Receives every recoverable failure met while decoding, in stream order.
pub trait ErrorReporter {
    fn report(&mut self, error: Error);
}

impl ErrorReporter for Vec<Error> {
    fn report(&mut self, error: Error) {
        self.push(error);
    }
}

/// Logs each failure at warn level and counts them.
#[derive(Debug, Default)]
pub struct TracingReporter {
    reported: usize,
}

impl TracingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reported(&self) -> usize {
        self.reported
    }
}

impl ErrorReporter for TracingReporter {
    fn report(&mut self, error: Error) {
        self.reported += 1;
        warn!(error = %error, "skipped loadout content while decoding");
    }
}
