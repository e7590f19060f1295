use std::fmt;

/// Elapsed-time counter for a quiz attempt.
///
/// The timer holds whole seconds and is advanced by an external
/// once-per-second signal; it does no scheduling of its own. The host is
/// expected to deliver ticks only while the quiz is in progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuizTimer {
    elapsed_seconds: u64,
}

impl QuizTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set elapsed time back to zero.
    pub fn reset(&mut self) {
        self.elapsed_seconds = 0;
    }

    /// Advance elapsed time by exactly one second.
    pub fn tick(&mut self) {
        self.elapsed_seconds += 1;
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// Render as zero-padded `MM:SS`.
    ///
    /// Minutes widen past two digits instead of wrapping, so an attempt
    /// longer than 99 minutes renders as e.g. `120:07`.
    #[must_use]
    pub fn format(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for QuizTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = self.elapsed_seconds / 60;
        let seconds = self.elapsed_seconds % 60;
        write!(f, "{minutes:02}:{seconds:02}")
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
