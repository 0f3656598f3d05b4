//! Two scene documents side by side, with the selection and batch-copy rules a front-end
//! drives them through.
//!
//! Selections are keyed by asset `id` rather than by display row, so they stay valid no
//! matter how a front-end redraws its lists.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::scene::{CopiedAsset, LoadError, SaveError, SceneDocument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No scene loaded on the {0} side")]
    SceneNotLoaded(Side),

    #[error("No assets selected on the {0} side")]
    NothingSelected(Side),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Save(#[from] SaveError),
}

/// Outcome of [`Session::copy_selected`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    pub copied: Vec<CopiedAsset>,
    /// Selected ids that could not be copied.
    pub failed: Vec<String>,
    /// Whether the target was written to disk. Only happens when nothing failed.
    pub saved: bool,
}

impl CopyReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Default)]
struct Pane {
    document: Option<SceneDocument>,
    selection: BTreeSet<String>,
}

#[derive(Debug, Default)]
pub struct Session {
    left: Pane,
    right: Pane,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    fn pane(&self, side: Side) -> &Pane {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    fn pane_mut(&mut self, side: Side) -> &mut Pane {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Loads the scene at `path` into `side`, replacing whatever was there and clearing the
    /// side's selection. On failure the side is left as it was.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub async fn load(&mut self, side: Side, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let document = SceneDocument::open(path).await?;
        let pane = self.pane_mut(side);
        pane.document = Some(document);
        pane.selection.clear();
        debug!("Scene loaded");
        Ok(())
    }

    /// Puts an already constructed document on `side`, clearing the side's selection.
    pub fn set_document(&mut self, side: Side, document: SceneDocument) {
        let pane = self.pane_mut(side);
        pane.document = Some(document);
        pane.selection.clear();
    }

    pub fn document(&self, side: Side) -> Option<&SceneDocument> {
        self.pane(side).document.as_ref()
    }

    /// Selected asset ids on `side`.
    pub fn selection(&self, side: Side) -> &BTreeSet<String> {
        &self.pane(side).selection
    }

    /// Flips the selection state of asset `id` on `side` and returns whether it is now
    /// selected. Ids that are not in the side's document are ignored.
    pub fn toggle(&mut self, side: Side, id: &str) -> bool {
        let pane = self.pane_mut(side);
        let known = pane.document.as_ref()
            .is_some_and(|doc| doc.asset_by_id(id).is_some());
        if !known {
            debug!(%side, id, "Ignoring selection of unknown asset");
            return false;
        }
        if pane.selection.remove(id) {
            false
        } else {
            pane.selection.insert(id.to_string());
            true
        }
    }

    pub fn clear_selection(&mut self, side: Side) {
        self.pane_mut(side).selection.clear();
    }

    /// Copies every asset selected on `from` into the other side, in the source document's
    /// asset order.
    ///
    /// The target is saved only if every copy succeeded, after which the source selection
    /// is cleared. Failed copies leave the assets that did copy in the target's memory.
    #[instrument(skip(self))]
    pub async fn copy_selected(&mut self, from: Side) -> Result<CopyReport, SessionError> {
        let to = from.opposite();
        if self.pane(to).document.is_none() {
            return Err(SessionError::SceneNotLoaded(to));
        }
        if self.pane(from).selection.is_empty() {
            return Err(SessionError::NothingSelected(from));
        }

        let (source_pane, target_pane) = match from {
            Side::Left => (&mut self.left, &mut self.right),
            Side::Right => (&mut self.right, &mut self.left),
        };
        let source = source_pane.document.as_ref().ok_or(SessionError::SceneNotLoaded(from))?;
        let Some(target) = target_pane.document.as_mut() else {
            return Err(SessionError::SceneNotLoaded(to));
        };

        // Walk the document rather than the set so copies land in a predictable order.
        let mut ordered: Vec<&str> = Vec::new();
        for asset in source.assets() {
            if let Some(id) = asset.id() {
                if source_pane.selection.contains(id) && !ordered.contains(&id) {
                    ordered.push(id);
                }
            }
        }

        let mut report = CopyReport::default();
        for id in source_pane.selection.iter().filter(|id| !ordered.contains(&id.as_str())) {
            warn!(id = id.as_str(), "Selected asset no longer exists");
            report.failed.push(id.clone());
        }
        for id in ordered {
            match source.copy_asset_by_id(id, target) {
                Ok(copied) => report.copied.push(copied),
                Err(e) => {
                    warn!("Could not copy asset: {}", e);
                    report.failed.push(id.to_string());
                }
            }
        }

        if !report.is_success() {
            warn!(failed = report.failed.len(), "Some assets could not be copied, target not saved");
            return Ok(report);
        }

        target.save().await?;
        report.saved = target.path().is_some();
        source_pane.selection.clear();
        info!(copied = report.copied.len(), %from, %to, "Assets copied");
        Ok(report)
    }
}
