//! Candidate list loading

use std::path::Path;

use crate::error::{NameCheckError, Result};
use crate::invalid_input;

/// Parse one username per line, trimming whitespace and dropping blank lines
pub fn parse_candidates(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Load candidates from a text file
pub fn load_candidates(path: &Path) -> Result<Vec<String>> {
    if path.as_os_str().is_empty() {
        return Err(invalid_input!("No username file selected"));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        NameCheckError::io(e.to_string(), Some(path.to_string_lossy().to_string()))
    })?;

    let candidates = parse_candidates(&content);
    tracing::info!(
        path = %path.display(),
        candidates = candidates.len(),
        "Loaded candidates"
    );
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_trims_and_skips_blanks() {
        let names = parse_candidates("  alice \n\n\tbob\r\n   \ncarol");
        assert_eq!(names, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "octocat").unwrap();
        writeln!(file).unwrap();
        writeln!(file, " hubot ").unwrap();

        let names = load_candidates(file.path()).unwrap();
        assert_eq!(names, vec!["octocat", "hubot"]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");
        let err = load_candidates(&missing).unwrap_err();
        assert!(matches!(err, NameCheckError::Io { path: Some(_), .. }));
    }

    #[test]
    fn test_empty_path_is_invalid_input() {
        let err = load_candidates(Path::new("")).unwrap_err();
        assert!(matches!(err, NameCheckError::InvalidInput { .. }));
    }
}
