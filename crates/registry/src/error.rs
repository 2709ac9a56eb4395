use crate::catalog::EntityKind;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{kind} with id '{id}' already exists")]
    Conflict { kind: EntityKind, id: String },
    #[error("{kind} '{id}' not found")]
    NotFound { kind: EntityKind, id: String },
    #[error("invalid {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
    #[error(transparent)]
    Storage(#[from] roster_storage::Error),
    #[error("malformed {kind} record: {source}")]
    Malformed {
        kind: EntityKind,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    #[must_use]
    pub fn conflict(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::Conflict {
            kind,
            id: id.into(),
        }
    }

    #[must_use]
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    #[must_use]
    pub fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::Invalid { field, reason }
    }

    #[must_use]
    pub fn malformed(kind: EntityKind, source: serde_json::Error) -> Self {
        Self::Malformed { kind, source }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
