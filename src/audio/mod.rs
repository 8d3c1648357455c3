//! Audio input: speech-to-text ahead of the chat loop.

mod helpers;
pub mod openai;
pub mod transcription;

pub use openai::OpenAiTranscriber;
pub use transcription::Transcriber;
