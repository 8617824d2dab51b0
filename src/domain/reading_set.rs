use std::collections::HashMap;

use serde::Deserialize;

use crate::domain::ZodiacSign;

/// Snapshot of the readings published by the reading service, one text per
/// sign.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "HashMap<String, serde_json::Value>")]
pub struct ReadingSet(HashMap<ZodiacSign, String>);

impl ReadingSet {
    /// Blank readings are treated as missing.
    pub fn reading_for(&self, sign: ZodiacSign) -> Option<&str> {
        self.0
            .get(&sign)
            .map(String::as_str)
            .filter(|reading| !reading.trim().is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<(ZodiacSign, String)> for ReadingSet {
    fn from_iter<T: IntoIterator<Item = (ZodiacSign, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

// Stored records carry extra keys (ids, timestamps) next to the signs.
impl From<HashMap<String, serde_json::Value>> for ReadingSet {
    fn from(record: HashMap<String, serde_json::Value>) -> Self {
        record
            .into_iter()
            .filter_map(|(key, value)| {
                let sign = key.parse::<ZodiacSign>().ok()?;
                match value {
                    serde_json::Value::String(reading) => Some((sign, reading)),
                    _ => None,
                }
            })
            .collect()
    }
}
