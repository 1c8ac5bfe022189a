//! Script text loaded for presentation

use std::io::Read;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Text shown on the prompter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    text: String,
    source: Option<PathBuf>,
}

impl Script {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: normalize(&text.into()),
            source: None,
        }
    }

    /// Read a UTF-8 text file
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let text = String::from_utf8(bytes).map_err(|_| {
            Error::Script(format!("{} is not a UTF-8 text file", path.display()))
        })?;
        tracing::debug!(path = %path.display(), bytes = text.len(), "Loaded script");
        Ok(Self {
            text: normalize(&text),
            source: Some(path.to_path_buf()),
        })
    }

    /// Read the whole script from a reader (stdin)
    pub fn from_reader(mut reader: impl Read) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let text = String::from_utf8(bytes)
            .map_err(|_| Error::Script("input is not UTF-8 text".to_string()))?;
        Ok(Self::new(text))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// True when there is nothing but whitespace to present
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// File name used in the status bar
    pub fn title(&self) -> String {
        self.source
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "stdin".to_string())
    }
}

// CRLF and lone CR become LF, tabs become four spaces
fn normalize(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n").replace('\t', "    ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_line_endings() {
        let script = Script::new("one\r\ntwo\rthree\tfour");
        assert_eq!(script.text(), "one\ntwo\nthree    four");
    }

    #[test]
    fn test_blank_script() {
        assert!(Script::new("  \n\t \n").is_blank());
        assert!(!Script::new("hello").is_blank());
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("talk.txt");
        std::fs::write(&path, "Good evening.\n").unwrap();

        let script = Script::load(&path).unwrap();
        assert_eq!(script.text(), "Good evening.\n");
        assert_eq!(script.title(), "talk.txt");
        assert_eq!(script.source(), Some(path.as_path()));
    }

    #[test]
    fn test_load_rejects_binary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x80]).unwrap();

        let err = Script::load(&path).unwrap_err();
        assert!(matches!(err, Error::Script(_)));
    }

    #[test]
    fn test_from_reader() {
        let script = Script::from_reader("line\r\n".as_bytes()).unwrap();
        assert_eq!(script.text(), "line\n");
        assert_eq!(script.title(), "stdin");
    }
}
