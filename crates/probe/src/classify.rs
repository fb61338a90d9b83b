use std::fmt;
use std::str::FromStr;

use crate::pattern::{BULK_PATTERN, STREAMING_PATTERN};

/// How a client delivered its upload, judged from the body the server received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// The body is exactly [`STREAMING_PATTERN`].
    Streaming,
    /// The body starts with [`BULK_PATTERN`].
    Bulk,
    /// Anything else, including an empty body.
    Malformed,
}

impl Classification {
    pub fn classify(body: &[u8]) -> Self {
        if body == STREAMING_PATTERN {
            Classification::Streaming
        } else if body.starts_with(&BULK_PATTERN) {
            Classification::Bulk
        } else {
            Classification::Malformed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Streaming => "streaming",
            Classification::Bulk => "bulk",
            Classification::Malformed => "malformed",
        }
    }

    /// The sentence reported to the operator.
    pub fn verdict(&self) -> &'static str {
        match self {
            Classification::Streaming => "The client is streaming their uploads.",
            Classification::Bulk => "The client is *not* streaming their uploads.",
            Classification::Malformed => "There was a general problem with the client's uploads.",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown classification: {0}")]
pub struct UnknownClassification(String);

impl FromStr for Classification {
    type Err = UnknownClassification;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "streaming" => Ok(Classification::Streaming),
            "bulk" => Ok(Classification::Bulk),
            "malformed" => Ok(Classification::Malformed),
            other => Err(UnknownClassification(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streaming_body() {
        assert_eq!(Classification::classify(&STREAMING_PATTERN), Classification::Streaming);
    }

    #[test]
    fn bulk_body() {
        assert_eq!(Classification::classify(&BULK_PATTERN), Classification::Bulk);

        let mut padded = vec![0u8; 512];
        padded[..4].copy_from_slice(&BULK_PATTERN);
        assert_eq!(Classification::classify(&padded), Classification::Bulk);
    }

    #[test]
    fn streaming_pattern_with_trailing_bytes_is_bulk() {
        let mut body = STREAMING_PATTERN.to_vec();
        body.push(5);
        assert_eq!(Classification::classify(&body), Classification::Bulk);
    }

    #[test]
    fn malformed_bodies() {
        assert_eq!(Classification::classify(&[]), Classification::Malformed);
        assert_eq!(Classification::classify(&[1, 0, 0]), Classification::Malformed);
        assert_eq!(Classification::classify(&[0xFF, 0, 0, 0]), Classification::Malformed);
        assert_eq!(Classification::classify(&STREAMING_PATTERN[4..]), Classification::Malformed);
    }

    #[test]
    fn classify_is_pure() {
        let body = [0xFF, 0, 0, 0, 2, 0, 0, 0];
        assert_eq!(Classification::classify(&body), Classification::classify(&body));
    }

    #[test]
    fn names_round_trip() {
        for classification in [Classification::Streaming, Classification::Bulk, Classification::Malformed] {
            assert_eq!(classification.to_string().parse::<Classification>(), Ok(classification));
        }
        assert!("chunky".parse::<Classification>().is_err());
    }

    #[test]
    fn verdicts() {
        assert_eq!(Classification::Bulk.verdict(), "The client is *not* streaming their uploads.");
    }
}
