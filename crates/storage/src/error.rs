#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("storage backend `{backend}` is not initialized")]
    NotInitialized { backend: &'static str },
}

impl Error {
    #[must_use]
    pub fn not_initialized(backend: &'static str) -> Self {
        Self::NotInitialized { backend }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
