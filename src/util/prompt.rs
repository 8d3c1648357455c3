//! Prompt files stored next to the code that uses them.

use std::path::Path;

use crate::error::Result;

/// Read the prompt `name` from the directory containing `anchor`.
///
/// `anchor` is usually a file path such as a module's own source file or a
/// config file, so prompts can live beside it:
///
/// ```no_run
/// let instructions = colloquy::util::prompt::load_prompt("agents/triage.toml", "system.md")?;
/// # Ok::<(), colloquy::error::ColloquyError>(())
/// ```
pub fn load_prompt(anchor: impl AsRef<Path>, name: impl AsRef<Path>) -> Result<String> {
    let dir = anchor.as_ref().parent().unwrap_or_else(|| Path::new(""));
    Ok(std::fs::read_to_string(dir.join(name))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ColloquyError;

    #[test]
    fn reads_sibling_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("system.md"), "You are terse.").unwrap();
        let anchor = dir.path().join("agent.toml");

        assert_eq!(load_prompt(&anchor, "system.md").unwrap(), "You are terse.");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_prompt(dir.path().join("agent.toml"), "nope.md").unwrap_err();
        assert!(matches!(err, ColloquyError::Io(_)));
    }
}
