//! Cache key under which a single record is mirrored.

use crate::domain::RecordId;

/// Namespace prefix shared by every record cache entry.
pub const RECORD_CACHE_PREFIX: &str = "record";

/// Deterministic cache key `record:<id>` for one record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordCacheKey(String);

impl RecordCacheKey {
    /// Key for the given record identifier.
    pub fn for_record(id: RecordId) -> Self {
        Self(format!("{RECORD_CACHE_PREFIX}:{id}"))
    }

    /// Borrow the underlying key as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for RecordCacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for RecordCacheKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, "record:1")]
    #[case(42, "record:42")]
    #[case(9_000_000_001, "record:9000000001")]
    fn key_uses_decimal_identifier(#[case] id: i64, #[case] expected: &str) {
        let key = RecordCacheKey::for_record(RecordId::new(id));
        assert_eq!(key.as_str(), expected);
        assert_eq!(key.to_string(), expected);
    }
}
