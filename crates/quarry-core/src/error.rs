// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! Error types shared by every asset subsystem.

use crate::asset::{AssetHandle, AssetType};
use std::path::PathBuf;

/// Errors that can occur while cataloging, loading, saving or caching assets.
///
/// `Io`, `NotFound`, `Format` and `Decode` are surfaced to the immediate caller.
/// `UnsupportedType` and `ConsistencyViolation` describe programming or
/// configuration mistakes; the subsystems that detect them abort with the
/// formatted error as diagnostic instead of returning it.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// A filesystem entry could not be created, read, written or removed.
    #[error("I/O error at '{}': {source}", path.display())]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The handle is not present in the catalog.
    #[error("asset {0} is not in the catalog")]
    NotFound(AssetHandle),

    /// No serializer strategy is registered for this asset type.
    #[error("no serializer registered for asset type {0}")]
    UnsupportedType(AssetType),

    /// A registered strategy refuses the requested operation.
    #[error("{asset_type} assets do not support {operation}")]
    Unsupported {
        /// The asset type whose strategy refused.
        asset_type: AssetType,
        /// The refused operation, e.g. `"save"`.
        operation: &'static str,
    },

    /// The catalog asked to drop a handle the loaded-asset table refused to release.
    #[error("asset {handle} is still held by the loaded-asset table and cannot be removed")]
    ConsistencyViolation {
        /// The handle that could not be released.
        handle: AssetHandle,
    },

    /// A text document (registry, config, descriptor) could not be parsed or emitted.
    #[error("failed to parse '{}': {reason}", path.display())]
    Format {
        /// The offending document.
        path: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// An asset or artifact payload could not be decoded.
    #[error("failed to decode '{}': {reason}", path.display())]
    Decode {
        /// The offending file.
        path: PathBuf,
        /// Description of the decode failure.
        reason: String,
    },
}

impl AssetError {
    /// Builds an [`AssetError::Io`] for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Builds an [`AssetError::Format`] for `path`.
    pub fn format(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Format {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Builds an [`AssetError::Decode`] for `path`.
    pub fn decode(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Decode {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Convenience alias used across the asset crates.
pub type AssetResult<T> = Result<T, AssetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display() {
        let err = AssetError::io(
            "assets/AssetRegistry.yaml",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("AssetRegistry.yaml"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn not_found_display() {
        let err = AssetError::NotFound(AssetHandle::from_raw(42));
        assert_eq!(err.to_string(), "asset 42 is not in the catalog");
    }

    #[test]
    fn unsupported_display_names_operation() {
        let err = AssetError::Unsupported {
            asset_type: AssetType::Texture,
            operation: "save",
        };
        assert_eq!(err.to_string(), "Texture assets do not support save");
    }

    #[test]
    fn consistency_violation_display() {
        let err = AssetError::ConsistencyViolation {
            handle: AssetHandle::from_raw(7),
        };
        assert!(err.to_string().contains("asset 7 is still held"));
    }
}
