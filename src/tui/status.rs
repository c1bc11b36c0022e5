//! Status bar: position, output, parse health and save state.

use super::layout::AppMode;

/// Whether the editor text matches the file on disk.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveStatus {
    Saved,
    Modified,
    Error(String),
    /// No script path; nothing to save to.
    Detached,
}

/// Status information for the TUI status bar.
#[derive(Debug, Clone)]
pub struct StatusInfo {
    pub mode: AppMode,
    /// 1-based index of the sounding step.
    pub position: Option<usize>,
    pub output: Option<String>,
    pub diagnostics: usize,
    pub save: SaveStatus,
}

impl StatusInfo {
    /// Format the position as "step 3/12", or "--/12" before the first cue.
    pub fn position_display(&self, total: usize) -> String {
        match self.position {
            Some(step) => format!("step {step}/{total}"),
            None => format!("step --/{total}"),
        }
    }

    pub fn output_display(&self) -> &str {
        self.output.as_deref().unwrap_or("NO MIDI")
    }

    pub fn diagnostics_display(&self) -> String {
        match self.diagnostics {
            0 => "OK".to_string(),
            1 => "1 problem".to_string(),
            n => format!("{n} problems"),
        }
    }

    pub fn save_display(&self) -> &str {
        match self.save {
            SaveStatus::Saved => "saved",
            SaveStatus::Modified => "modified",
            SaveStatus::Error(_) => "SAVE FAILED",
            SaveStatus::Detached => "",
        }
    }
}

impl Default for StatusInfo {
    fn default() -> Self {
        Self {
            mode: AppMode::default(),
            position: None,
            output: None,
            diagnostics: 0,
            save: SaveStatus::Detached,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_display_format() {
        let status = StatusInfo {
            position: Some(3),
            ..Default::default()
        };
        assert_eq!(status.position_display(12), "step 3/12");
        assert_eq!(StatusInfo::default().position_display(4), "step --/4");
    }

    #[test]
    fn output_display() {
        assert_eq!(StatusInfo::default().output_display(), "NO MIDI");
        let status = StatusInfo {
            output: Some("CueLab Free".to_string()),
            ..Default::default()
        };
        assert_eq!(status.output_display(), "CueLab Free");
    }

    #[test]
    fn diagnostics_display() {
        let mut status = StatusInfo::default();
        assert_eq!(status.diagnostics_display(), "OK");
        status.diagnostics = 1;
        assert_eq!(status.diagnostics_display(), "1 problem");
        status.diagnostics = 4;
        assert_eq!(status.diagnostics_display(), "4 problems");
    }

    #[test]
    fn save_display() {
        let status = StatusInfo {
            save: SaveStatus::Error("disk full".into()),
            ..Default::default()
        };
        assert_eq!(status.save_display(), "SAVE FAILED");
    }
}
