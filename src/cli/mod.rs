//! Command-line arguments for the `colloquy` binary.

use std::path::PathBuf;

use clap::Parser;

use crate::types::ReasoningEffort;

/// Ask an agent one question from the terminal.
#[derive(Parser, Debug)]
#[command(name = "colloquy", version, about = "Chat with an OpenAI-compatible model")]
pub struct Cli {
    /// System instructions
    #[arg(short, long)]
    pub instructions: Option<String>,

    /// Chain-of-thought prompt, repeatable and sent in order
    #[arg(short, long = "thought")]
    pub thoughts: Vec<String>,

    /// Image to attach to the prompt
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Audio file to transcribe and use instead of PROMPT
    #[arg(long)]
    pub audio: Option<PathBuf>,

    /// Reasoning effort (low, medium, high)
    #[arg(long)]
    pub reasoning_effort: Option<ReasoningEffort>,

    /// Completion model, overriding COLLOQUY_COMPLETIONS_MODEL
    #[arg(short, long)]
    pub model: Option<String>,

    /// User prompt
    #[arg(required_unless_present = "audio")]
    pub prompt: Option<String>,
}

/// Guess a MIME type from a file extension.
pub fn mime_for_path(path: &std::path::Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "mp3" => "audio/mpeg",
        "m4a" | "mp4" => "audio/mp4",
        "wav" => "audio/wav",
        "webm" => "audio/webm",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn parses_repeated_thoughts() {
        let cli = Cli::try_parse_from([
            "colloquy",
            "--thought",
            "List the facts.",
            "--thought",
            "Check them.",
            "--reasoning-effort",
            "high",
            "Is water wet?",
        ])
        .unwrap();
        assert_eq!(cli.thoughts, ["List the facts.", "Check them."]);
        assert_eq!(cli.reasoning_effort, Some(ReasoningEffort::High));
        assert_eq!(cli.prompt.as_deref(), Some("Is water wet?"));
    }

    #[test]
    fn audio_replaces_prompt() {
        let cli = Cli::try_parse_from(["colloquy", "--audio", "q.wav"]).unwrap();
        assert!(cli.prompt.is_none());
        assert!(Cli::try_parse_from(["colloquy"]).is_err());
    }

    #[test]
    fn mime_from_extension() {
        assert_eq!(mime_for_path(Path::new("a/b.JPG")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("clip.wav")), "audio/wav");
        assert_eq!(mime_for_path(Path::new("notes")), "application/octet-stream");
    }
}
