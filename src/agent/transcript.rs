//! Display seam for the interactive transcript

/// Receives everything the user should see while a turn runs
///
/// Tool calls are reported by name only; their arguments never reach the
/// transcript.
pub trait TranscriptSink {
    /// Incremental model text, shown as soon as it arrives
    fn text(&mut self, text: &str);

    /// A tool is about to run
    fn tool_call(&mut self, name: &str);

    /// The current model invocation has finished streaming
    fn response_end(&mut self) {}
}

/// A sink that shows nothing
#[derive(Debug, Default)]
pub struct NullTranscript;

impl TranscriptSink for NullTranscript {
    fn text(&mut self, _text: &str) {}

    fn tool_call(&mut self, _name: &str) {}
}
