//! Load and output settings

use serde::{Deserialize, Serialize};

/// Settings applied when loading and serializing a document.
///
/// Missing fields take their defaults when deserialized, so a config file
/// only needs to name what it changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Keep whitespace-only text nodes between elements. Off by default:
    /// such nodes are dropped at load time.
    pub preserve_whitespace: bool,
    /// Indent serialized markup
    pub format_output: bool,
}

impl Options {
    pub fn preserve_whitespace(mut self, preserve: bool) -> Self {
        self.preserve_whitespace = preserve;
        self
    }

    pub fn format_output(mut self, format: bool) -> Self {
        self.format_output = format;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_strip_and_compact() {
        let options = Options::default();
        assert!(!options.preserve_whitespace);
        assert!(!options.format_output);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let options: Options = serde_json::from_str(r#"{"format_output": true}"#).unwrap();
        assert_eq!(options, Options::default().format_output(true));
    }
}
