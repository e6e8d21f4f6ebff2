use crate::config::default_text_types;
use crate::error::{ConfigError, Result};
use regex::{Regex, RegexBuilder};

/// Decides whether a response body is a text page worth counting as html.
pub trait ContentClassifier {
    fn is_text(&self, content_type: Option<&str>) -> bool;
}

/// Classifier matching the media type against a case-insensitive pattern.
#[derive(Debug, Clone)]
pub struct TextTypes {
    pattern: Regex,
}

impl TextTypes {
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| ConfigError::InvalidValue(format!("Invalid text_types pattern: {}", e)))?;
        Ok(Self { pattern })
    }
}

impl Default for TextTypes {
    fn default() -> Self {
        Self::new(&default_text_types()).expect("default text_types pattern compiles")
    }
}

impl ContentClassifier for TextTypes {
    fn is_text(&self, content_type: Option<&str>) -> bool {
        // parameters such as `; charset=utf-8` are not part of the media type
        content_type
            .and_then(|ct| ct.split(';').next())
            .map(str::trim)
            .filter(|media| !media.is_empty())
            .is_some_and(|media| self.pattern.is_match(media))
    }
}

impl<F> ContentClassifier for F
where
    F: Fn(Option<&str>) -> bool,
{
    fn is_text(&self, content_type: Option<&str>) -> bool {
        self(content_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_accepts_text_and_markup() {
        let classifier = TextTypes::default();
        for ct in [
            "text/html",
            "text/plain",
            "TEXT/HTML; charset=UTF-8",
            "application/xhtml+xml",
            "application/xml",
            "application/json",
            "application/javascript",
            "application/atom+xml",
        ] {
            assert!(classifier.is_text(Some(ct)), "{ct} should be text");
        }
    }

    #[test]
    fn default_rejects_binary_and_missing() {
        let classifier = TextTypes::default();
        for ct in ["image/png", "application/pdf", "application/octet-stream", "", " ; charset=utf-8"] {
            assert!(!classifier.is_text(Some(ct)), "{ct} should not be text");
        }
        assert!(!classifier.is_text(None));
    }

    #[test]
    fn custom_pattern_narrows_classification() {
        let classifier = TextTypes::new("^text/html$").unwrap();
        assert!(classifier.is_text(Some("text/html")));
        assert!(!classifier.is_text(Some("text/plain")));
    }

    #[test]
    fn invalid_pattern_is_config_error() {
        assert!(TextTypes::new("(text").is_err());
    }

    #[test]
    fn closures_classify_too() {
        let everything = |_: Option<&str>| true;
        assert!(everything.is_text(None));
    }
}
