//! Parse cache: re-parses only when the script text actually changes.

use super::parser::{parse, Parsed};

#[derive(Debug, Clone, Default)]
pub struct ScriptCache {
    source: Option<String>,
    parsed: Parsed,
}

impl ScriptCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parsed result for `text`, reusing the previous parse if the text is unchanged.
    pub fn get(&mut self, text: &str) -> &Parsed {
        if self.source.as_deref() != Some(text) {
            self.parsed = parse(text);
            self.source = Some(text.to_string());
        }
        &self.parsed
    }

    /// Whether `text` differs from the last parsed source.
    pub fn is_stale(&self, text: &str) -> bool {
        self.source.as_deref() != Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_get_parses() {
        let mut cache = ScriptCache::new();
        assert!(cache.is_stale("0,60"));
        assert_eq!(cache.get("0,60").script.len(), 1);
        assert!(!cache.is_stale("0,60"));
    }

    #[test]
    fn changed_text_reparses() {
        let mut cache = ScriptCache::new();
        cache.get("0,60");
        assert_eq!(cache.get("0,60\n0,61").script.len(), 2);
    }

    #[test]
    fn cached_result_matches_fresh_parse() {
        let text = "# a\nbad\n0,60\n# tail";
        let mut cache = ScriptCache::new();
        cache.get(text);
        assert_eq!(cache.get(text), &parse(text));
    }

    #[test]
    fn empty_text_is_stale_until_parsed() {
        let mut cache = ScriptCache::new();
        assert!(cache.is_stale(""));
        assert!(cache.get("").script.is_empty());
        assert!(!cache.is_stale(""));
    }
}
