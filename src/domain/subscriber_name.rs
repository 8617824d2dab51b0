use std::fmt::Display;

use unicode_segmentation::UnicodeSegmentation;

const MAX_GRAPHEMES: usize = 256;

#[derive(Debug, Clone)]
pub struct SubscriberName(String);

impl SubscriberName {
    pub fn parse(s: String) -> Result<Self, String> {
        let is_empty_or_whitespace = s.trim().is_empty();
        let is_too_long = s.graphemes(true).count() > MAX_GRAPHEMES;

        if is_empty_or_whitespace || is_too_long {
            return Err(format!("'{}' is not a valid subscriber name", s));
        }

        Ok(Self(s))
    }

    /// Lowercases the name and capitalises the first letter of every
    /// whitespace-delimited word. Whitespace is kept as typed.
    pub fn title_cased(&self) -> String {
        let mut result = String::with_capacity(self.0.len());
        let mut at_word_start = true;

        for c in self.0.chars() {
            if c.is_whitespace() {
                result.push(c);
                at_word_start = true;
            } else if at_word_start {
                result.extend(c.to_uppercase());
                at_word_start = false;
            } else {
                result.extend(c.to_lowercase());
            }
        }

        result
    }
}

impl Display for SubscriberName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SubscriberName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
