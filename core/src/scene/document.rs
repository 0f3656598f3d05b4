use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::persistence;
use crate::scene::asset::UNNAMED_ASSET;
use crate::scene::{
    unique_name, AssetEntry, AssetRecord, CopyError, HierarchyNode, HierarchyPath, LoadError, SaveError,
    ASSETS_KEY, HIERARCHY_KEY,
};

/// A scene file held in memory, optionally tied to the path it is saved to.
///
/// A document is either loaded from disk ([`SceneDocument::open`]) or starts out empty, in
/// which case it can only serve as the target of a copy until something is copied into it.
#[derive(Debug, Clone, Default)]
pub struct SceneDocument {
    path: Option<PathBuf>,
    data: Option<SceneData>,
}

/// Result of a successful copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopiedAsset {
    /// Name of the record in the source document.
    pub source_name: String,
    /// Name given to the copy in the target document.
    pub name: String,
    pub id: Option<String>,
    /// Group path rebuilt in the target, if the asset was placed in a group.
    pub hierarchy: Option<HierarchyPath>,
}

impl SceneDocument {
    /// An empty document with no path. Saving it does nothing.
    pub fn empty() -> Self {
        SceneDocument::default()
    }

    /// An empty document that will be written to `path` on [`SceneDocument::save`].
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        SceneDocument { path: Some(path.into()), data: None }
    }

    /// Loads the scene file at `path`.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref().to_path_buf();
        let value = persistence::read_json(&path).await?;
        let data = SceneData::from_value(value)
            .map_err(|e| LoadError::Layout { path: path.clone(), reason: e.to_string() })?;

        debug!(assets = data.asset_count(), "Scene opened successfully");
        Ok(SceneDocument { path: Some(path), data: Some(data) })
    }

    /// Builds a document from an already parsed JSON value, without a path.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        Ok(SceneDocument { path: None, data: Some(SceneData::from_value(value)?) })
    }

    pub fn has_document(&self) -> bool {
        self.data.is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The asset records in file order.
    pub fn assets(&self) -> &[AssetRecord] {
        self.data.as_ref()
            .and_then(|data| data.assets.as_deref())
            .unwrap_or_default()
    }

    pub fn hierarchy(&self) -> Option<&HierarchyNode> {
        self.data.as_ref()?.hierarchy.as_ref()
    }

    /// Returns the first asset called `name`.
    pub fn asset_by_name(&self, name: &str) -> Option<&AssetRecord> {
        self.assets().iter().find(|asset| asset.name() == Some(name))
    }

    /// Returns the first asset whose `id` is `id`.
    pub fn asset_by_id(&self, id: &str) -> Option<&AssetRecord> {
        self.assets().iter().find(|asset| asset.id() == Some(id))
    }

    /// Returns the group path of the asset `id`, or `None` if no leaf refers to it.
    pub fn hierarchy_path(&self, id: &str) -> Option<HierarchyPath> {
        self.hierarchy()?.find_path(id)
    }

    /// Lists every asset in file order together with its kind and group path.
    pub fn list_assets(&self) -> Vec<AssetEntry> {
        let assets = self.assets();
        if assets.is_empty() {
            return Vec::new();
        }
        let paths = self.hierarchy()
            .map(HierarchyNode::path_map)
            .unwrap_or_default();

        assets.iter()
            .map(|asset| {
                let id = asset.id().unwrap_or_default();
                AssetEntry {
                    id: id.to_string(),
                    kind: asset.kind(),
                    name: asset.name().unwrap_or(UNNAMED_ASSET).to_string(),
                    hierarchy: paths.get(id).cloned().unwrap_or_default(),
                }
            })
            .collect()
    }

    /// Copies the first asset called `name` into `target`. Returns false if there is no
    /// such asset, in which case `target` is left untouched.
    ///
    /// See [`SceneDocument::try_copy_asset`].
    pub fn copy_asset(&self, name: &str, target: &mut SceneDocument) -> bool {
        self.try_copy_asset(name, target).is_ok()
    }

    /// Copies the first asset called `name` into `target`.
    ///
    /// The copy keeps its `id` and `typeId` and every other field, is renamed if `target`
    /// already has an asset with that name, and is appended to `target`'s asset list. If the
    /// asset sits inside a group here, the same chain of groups is created in `target`
    /// (reusing groups that already exist by label) and a leaf for the asset's id is added
    /// to the innermost group unless one is already there.
    pub fn try_copy_asset(&self, name: &str, target: &mut SceneDocument) -> Result<CopiedAsset, CopyError> {
        let record = self.asset_by_name(name).ok_or_else(|| {
            debug!(asset = name, "Asset to copy not found");
            CopyError::AssetNotFound(name.to_string())
        })?;
        Ok(self.copy_record(record, target))
    }

    /// Same as [`SceneDocument::try_copy_asset`], selecting the asset by `id` instead.
    pub fn copy_asset_by_id(&self, id: &str, target: &mut SceneDocument) -> Result<CopiedAsset, CopyError> {
        let record = self.asset_by_id(id).ok_or_else(|| {
            debug!(asset = id, "Asset to copy not found");
            CopyError::AssetNotFound(id.to_string())
        })?;
        Ok(self.copy_record(record, target))
    }

    fn copy_record(&self, record: &AssetRecord, target: &mut SceneDocument) -> CopiedAsset {
        let source_name = record.name().unwrap_or(UNNAMED_ASSET);
        let data = target.data.get_or_insert_with(SceneData::default);
        let assets = data.assets.get_or_insert_with(Vec::new);

        let name = {
            let existing: HashSet<&str> = assets.iter()
                .map(|asset| asset.name().unwrap_or_default())
                .collect();
            unique_name(source_name, &existing)
        };

        let mut copy = record.clone();
        copy.set_name(name.clone());
        assets.push(copy);
        debug!(source = source_name, copy = %name, "Asset appended to target");

        let id = record.id();
        let hierarchy = id
            .and_then(|id| self.hierarchy_path(id))
            .filter(|path| !path.is_empty());

        if let (Some(id), Some(path)) = (id, hierarchy.as_ref()) {
            let group = data.hierarchy
                .get_or_insert_with(HierarchyNode::root)
                .ensure_path(path);
            if group.insert_leaf(id) {
                debug!(id, path = %path, "Hierarchy leaf added");
            } else {
                debug!(id, path = %path, "Hierarchy leaf already present");
            }
        }

        CopiedAsset {
            source_name: source_name.to_string(),
            name,
            id: id.map(str::to_string),
            hierarchy,
        }
    }

    /// Encodes the document in the on-disk format.
    pub fn to_json(&self) -> Result<Vec<u8>, SaveError> {
        match &self.data {
            Some(data) => persistence::to_compact_json(data),
            None => persistence::to_compact_json(&Map::new()),
        }
    }

    /// Writes the document back to its path. Does nothing if it has no path.
    #[instrument(skip(self), fields(path = ?self.path))]
    pub async fn save(&self) -> Result<(), SaveError> {
        let Some(path) = &self.path else {
            debug!("Document has no path, nothing to save");
            return Ok(());
        };
        match &self.data {
            Some(data) => persistence::write_json(path, data).await,
            None => persistence::write_json(path, &Map::new()).await,
        }
    }
}

/// Parsed contents of a scene file.
///
/// `fields` keeps every top-level entry in file order. The entries for the asset list and
/// the hierarchy are left as `null` placeholders once parsed; the typed values are written
/// back into those positions on serialization.
#[derive(Debug, Clone, Default, PartialEq)]
struct SceneData {
    fields: Map<String, Value>,
    assets: Option<Vec<AssetRecord>>,
    hierarchy: Option<HierarchyNode>,
}

impl SceneData {
    fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let Value::Object(mut fields) = value else {
            return Err(serde::de::Error::custom("top level is not a JSON object"));
        };
        let assets = take_field(&mut fields, ASSETS_KEY)?;
        let hierarchy = take_field(&mut fields, HIERARCHY_KEY)?;
        Ok(SceneData { fields, assets, hierarchy })
    }

    fn asset_count(&self) -> usize {
        self.assets.as_ref().map_or(0, Vec::len)
    }
}

/// Parses `fields[key]` in place, leaving `null` behind. Absent and `null` fields yield `None`.
fn take_field<T: serde::de::DeserializeOwned>(fields: &mut Map<String, Value>, key: &str) -> Result<Option<T>, serde_json::Error> {
    match fields.get_mut(key) {
        None | Some(Value::Null) => Ok(None),
        Some(slot) => serde_json::from_value(slot.take())
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("invalid `{key}`: {e}"))),
    }
}

impl Serialize for SceneData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in &self.fields {
            match key.as_str() {
                ASSETS_KEY if self.assets.is_some() => map.serialize_entry(key, &self.assets)?,
                HIERARCHY_KEY if self.hierarchy.is_some() => map.serialize_entry(key, &self.hierarchy)?,
                _ => map.serialize_entry(key, value)?,
            }
        }
        // Sections created by a copy go last.
        if self.assets.is_some() && !self.fields.contains_key(ASSETS_KEY) {
            map.serialize_entry(ASSETS_KEY, &self.assets)?;
        }
        if self.hierarchy.is_some() && !self.fields.contains_key(HIERARCHY_KEY) {
            map.serialize_entry(HIERARCHY_KEY, &self.hierarchy)?;
        }
        map.end()
    }
}
