//! Application modes.

/// Perform mode sends keys to navigation; Edit mode sends them to the script editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    Edit,
    #[default]
    Perform,
}

impl AppMode {
    /// Toggle between Edit and Perform.
    pub fn toggle(self) -> Self {
        match self {
            Self::Edit => Self::Perform,
            Self::Perform => Self::Edit,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Edit => "EDIT",
            Self::Perform => "PERFORM",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_toggle() {
        assert_eq!(AppMode::Edit.toggle(), AppMode::Perform);
        assert_eq!(AppMode::Perform.toggle(), AppMode::Edit);
    }

    #[test]
    fn starts_in_perform() {
        assert_eq!(AppMode::default(), AppMode::Perform);
        assert_eq!(AppMode::default().label(), "PERFORM");
    }
}
