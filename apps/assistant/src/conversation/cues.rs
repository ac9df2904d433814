use std::io::Write;

use tracing::debug;

/// Audible notifications fired on lifecycle transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Sent,
    Received,
}

/// Fire-and-forget sink for cues. Implementations must not block and must
/// swallow their own failures.
pub trait CueSink: Send + Sync {
    fn play(&self, cue: Cue);
}

/// Rings the terminal bell on stderr.
pub struct TerminalBell;

impl CueSink for TerminalBell {
    fn play(&self, cue: Cue) {
        debug!("Cue: {cue:?}");
        let mut stderr = std::io::stderr();
        let _ = stderr.write_all(b"\x07").and_then(|_| stderr.flush());
    }
}
