//! Delimited splitting that never splits inside a placeholder
//!
//! `"{{Random: a, b}}, c"` splits on commas into two segments, not four: the
//! comma inside the placeholder's argument list is part of the placeholder.
//! Plain strings take a cheap substring-split fast path.

use serde::{Deserialize, Serialize};

use crate::lexer::START_PATTERN;
use crate::parser::{parse_str, LexToken};

/// Options for [`split_values_with`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitOptions {
    /// Delimiter to split on.
    pub delimiter: String,
    /// Drop empty segments from the output.
    pub ignore_empty: bool,
    /// Trim surrounding whitespace off each segment.
    pub trim: bool,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
            ignore_empty: true,
            trim: true,
        }
    }
}

/// Split on commas, respecting placeholders, with the default options.
pub fn split_values(raw: &str) -> Vec<String> {
    split_values_with(raw, &SplitOptions::default())
}

/// Split `raw` on a delimiter without ever splitting inside a placeholder's
/// argument list.
///
/// A string whose placeholders fail to parse is treated as plain literal
/// text and split directly, per the policy that malformed fields degrade to
/// literals rather than aborting their siblings.
pub fn split_values_with(raw: &str, options: &SplitOptions) -> Vec<String> {
    let delimiter = options.delimiter.as_str();

    // Fast paths: nothing to split on, or no placeholder can be affected.
    if delimiter.is_empty() || !raw.contains(delimiter) {
        return finalize([raw.to_string()], options);
    }
    if !raw.contains(START_PATTERN) {
        return finalize(raw.split(delimiter).map(str::to_string), options);
    }

    let tokens = match parse_str(raw, false, false) {
        Ok(tokens) => tokens,
        Err(error) => {
            tracing::warn!(%error, "splitting malformed token string as plain text");
            return finalize(raw.split(delimiter).map(str::to_string), options);
        }
    };

    let mut segments = Vec::new();
    let mut current = String::new();
    for token in &tokens {
        match token {
            LexToken::Literal(text) => {
                let mut pieces = text.split(delimiter);
                if let Some(first) = pieces.next() {
                    current.push_str(first);
                }
                for piece in pieces {
                    segments.push(std::mem::take(&mut current));
                    current.push_str(piece);
                }
            }
            // Placeholders are re-serialized whole into the current segment.
            LexToken::Placeholder(_) => current.push_str(&token.to_string()),
        }
    }
    segments.push(current);

    finalize(segments, options)
}

fn finalize(segments: impl IntoIterator<Item = String>, options: &SplitOptions) -> Vec<String> {
    segments
        .into_iter()
        .map(|segment| {
            if options.trim {
                segment.trim().to_string()
            } else {
                segment
            }
        })
        .filter(|segment| !options.ignore_empty || !segment.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_delimiter_returns_whole_string() {
        assert_eq!(split_values("  spring  "), vec!["spring"]);
    }

    #[test]
    fn plain_string_splits_directly() {
        assert_eq!(split_values("a, b, c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn never_splits_inside_a_placeholder() {
        assert_eq!(
            split_values("{{Random: a, b}}, c"),
            vec!["{{Random: a, b}}", "c"]
        );
    }

    #[test]
    fn splits_between_placeholders() {
        assert_eq!(
            split_values("{{A}}, {{B: x, y}}, tail"),
            vec!["{{A}}", "{{B: x, y}}", "tail"]
        );
    }

    #[test]
    fn nested_placeholders_stay_whole() {
        assert_eq!(
            split_values("{{A: {{B: x, y}} }}, c"),
            vec!["{{A: {{B: x, y}}}}", "c"]
        );
    }

    #[test]
    fn ignore_empty_drops_blank_segments() {
        assert_eq!(split_values("a,, ,b"), vec!["a", "b"]);
    }

    #[test]
    fn keep_empty_and_untrimmed_when_asked() {
        let options = SplitOptions {
            ignore_empty: false,
            trim: false,
            ..Default::default()
        };
        assert_eq!(split_values_with("a,, b", &options), vec!["a", "", " b"]);
    }

    #[test]
    fn custom_delimiter() {
        let options = SplitOptions {
            delimiter: "/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            split_values_with("{{Path: a/b}}/c", &options),
            vec!["{{Path: a/b}}", "c"]
        );
    }

    #[test]
    fn malformed_placeholder_falls_back_to_plain_split() {
        assert_eq!(split_values("{{broken, c"), vec!["{{broken", "c"]);
    }

    #[test]
    fn empty_delimiter_yields_single_segment() {
        let options = SplitOptions {
            delimiter: String::new(),
            ..Default::default()
        };
        assert_eq!(split_values_with("a, b", &options), vec!["a, b"]);
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: SplitOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, SplitOptions::default());

        let options: SplitOptions =
            serde_json::from_str(r#"{"delimiter": ";", "trim": false}"#).unwrap();
        assert_eq!(options.delimiter, ";");
        assert!(!options.trim);
        assert!(options.ignore_empty);
    }
}
