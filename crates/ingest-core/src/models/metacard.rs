use std::fmt;

use uuid::Uuid;

/// Opaque blob-store key a metacard is filed under.
///
/// 128 random bits rendered as 32 lowercase hex digits with no separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoredMetacardKey(String);

impl StoredMetacardKey {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoredMetacardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
