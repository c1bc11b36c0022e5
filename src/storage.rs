//! Script persistence: plain-text load/save for the cue script file.

use std::io;
use std::path::{Path, PathBuf};

/// File name used when neither the CLI nor the config names a script.
pub const DEFAULT_SCRIPT_FILE: &str = "notes.txt";

/// Default script path, relative to the working directory.
pub fn default_script_path() -> PathBuf {
    PathBuf::from(DEFAULT_SCRIPT_FILE)
}

/// Load script text. A missing file is an empty script, not an error.
pub fn load_script(path: &Path) -> Result<String, io::Error> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::info!("{} not found, starting with an empty script", path.display());
            Ok(String::new())
        }
        Err(e) => Err(e),
    }
}

/// Save script text, creating parent directories as needed.
pub fn save_script(path: &Path, text: &str) -> Result<(), io::Error> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn load_nonexistent_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let text = load_script(&dir.path().join("missing.txt")).unwrap();
        assert!(text.is_empty());
    }

    #[test]
    fn save_and_load_round_trip() {
        let file = NamedTempFile::new().unwrap();
        let text = "# intro\n0,60\n1,64;1,67\n";
        save_script(file.path(), text).unwrap();
        assert_eq!(load_script(file.path()).unwrap(), text);
    }

    #[test]
    fn save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("show").join("act1").join("cues.txt");
        save_script(&path, "0,60").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn load_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_script(dir.path()).is_err());
    }

    #[test]
    fn default_path_is_notes_txt() {
        assert_eq!(default_script_path(), PathBuf::from("notes.txt"));
    }
}
