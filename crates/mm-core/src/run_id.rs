use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub const RUN_ID_LEN: usize = 8;

/// Short token namespacing one generation run on disk
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(String);

impl RunId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("run id must be 8 hex characters, got {0:?}")]
pub struct InvalidRunId(pub String);

impl FromStr for RunId {
    type Err = InvalidRunId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == RUN_ID_LEN && s.bytes().all(|b| b.is_ascii_hexdigit()) {
            Ok(Self(s.to_ascii_lowercase()))
        } else {
            Err(InvalidRunId(s.to_string()))
        }
    }
}

/// Source of run ids (swappable for deterministic ids in tests)
pub trait RunIdProvider: Send + Sync {
    fn next_id(&self) -> RunId;
}

/// First eight hex digits of a random UUID v4
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidRunIds;

impl RunIdProvider for UuidRunIds {
    fn next_id(&self) -> RunId {
        let simple = Uuid::new_v4().simple().to_string();
        RunId(simple[..RUN_ID_LEN].to_string())
    }
}
