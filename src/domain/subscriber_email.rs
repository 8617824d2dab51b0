use std::fmt::Display;

use validator::validate_email;

#[derive(Debug, Clone)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    /// The domain must contain a dot with text on both sides, and no
    /// whitespace is allowed anywhere, padding included.
    pub fn parse(s: String) -> Result<Self, String> {
        let has_whitespace = s.chars().any(char::is_whitespace);

        match !has_whitespace && has_dotted_domain(&s) && validate_email(s.as_str()) {
            true => Ok(Self(s)),
            false => Err(format!("{} is not a valid subscriber email", s)),
        }
    }
}

fn has_dotted_domain(email: &str) -> bool {
    let Some((_, domain)) = email.rsplit_once('@') else {
        return false;
    };

    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

impl Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
