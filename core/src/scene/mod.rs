//! In-memory model of a scene file and the operations that move assets between scenes.
//!
//! A scene file is a single JSON object. Two of its top-level fields are understood by
//! this crate; everything else is carried through untouched.
//!
//! *   **`assets`:** an ordered list of [`AssetRecord`]s. Each record has an `id` (a UUID,
//!     unique within the file), a `name` (the key users copy and look up assets by) and a
//!     `typeId` (a UUID naming the asset kind, see [`AssetKind`]).
//! *   **`assetHierarchy`:** a tree of [`HierarchyNode`]s. Inner nodes are groups keyed by a
//!     free-form label; leaves are keyed by the `id` of the asset they place in the group.
//!     A key is treated as an asset reference iff it is a hyphenated UUID (see
//!     [`is_asset_id`]).
//!
//! The list of group labels leading from the root to an asset's leaf is its
//! [`HierarchyPath`]. It is never stored, only derived by a depth-first walk of the tree.
//!
//! # Copying
//!
//! [`SceneDocument::copy_asset`] appends a deep copy of a record to another document,
//! renaming it if the name is already taken there (see [`unique_name`]), and rebuilds the
//! record's group path in the target tree, reusing groups that already exist by label.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use scenecopy_core::scene::SceneDocument;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = SceneDocument::open("left.json").await?;
//!     let mut target = SceneDocument::open("right.json").await?;
//!
//!     for entry in source.list_assets() {
//!         println!("{} {} {}", entry.kind, entry.name, entry.hierarchy);
//!     }
//!
//!     if source.copy_asset("Camera", &mut target) {
//!         target.save().await?;
//!     }
//!     Ok(())
//! }
//! ```

pub use self::asset::{AssetEntry, AssetKind, AssetRecord, UNNAMED_ASSET};
pub use self::document::{CopiedAsset, SceneDocument};
pub use self::hierarchy::{is_asset_id, HierarchyNode, HierarchyPath};
pub use self::naming::unique_name;

mod asset;
mod document;
mod hierarchy;
mod naming;

use std::path::PathBuf;
use thiserror::Error;

/// Top-level key holding the asset list.
pub const ASSETS_KEY: &str = "assets";
/// Top-level key holding the group tree.
pub const HIERARCHY_KEY: &str = "assetHierarchy";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected scene layout in {path}: {reason}")]
    Layout { path: PathBuf, reason: String },

    #[error("{path} nests arrays and objects more than {limit} levels deep")]
    TooDeep { path: PathBuf, limit: usize },
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("Failed to serialize scene: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CopyError {
    #[error("Asset not found: {0}")]
    AssetNotFound(String),
}
