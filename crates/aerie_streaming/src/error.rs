//! # Dispatch Errors

use aerie_procedural::TerrainError;
use thiserror::Error;

/// Errors raised by the chunk dispatcher.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The seed or terrain configuration was rejected.
    #[error("terrain setup failed: {0}")]
    Terrain(#[from] TerrainError),

    /// A worker thread could not be started.
    #[error("failed to spawn chunk worker: {0}")]
    WorkerSpawn(String),

    /// The dispatcher no longer accepts requests.
    #[error("dispatcher has shut down")]
    ShutDown,
}

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terrain_error_converts() {
        let err: DispatchError = TerrainError::NonFiniteSeed.into();
        assert!(matches!(err, DispatchError::Terrain(TerrainError::NonFiniteSeed)));
        assert!(err.to_string().starts_with("terrain setup failed"));
    }
}
