pub mod persistence;
pub mod scene;
pub mod session;

pub use scene::{AssetEntry, AssetKind, AssetRecord, CopiedAsset, HierarchyNode, HierarchyPath, SceneDocument};
pub use session::{CopyReport, Session, SessionError, Side};
