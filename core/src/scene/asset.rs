use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::{uuid, Uuid};

use super::HierarchyPath;

const CAMERA_TYPE_ID: Uuid = uuid!("6a05ecf3-1501-4cab-b9d7-84131b881a29");
const PROP_TYPE_ID: Uuid = uuid!("945f0112-8ebe-4c5e-bda2-700925489a57");

/// Display name used for records that carry no `name` field.
pub const UNNAMED_ASSET: &str = "Unknown";

/// Coarse classification of an asset, derived from its `typeId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Camera,
    Prop,
    Other,
}

impl AssetKind {
    /// Classifies a `typeId`. Unknown or malformed ids classify as [`AssetKind::Other`].
    pub fn from_type_id(type_id: &str) -> Self {
        match Uuid::try_parse(type_id) {
            Ok(id) if id == CAMERA_TYPE_ID => AssetKind::Camera,
            Ok(id) if id == PROP_TYPE_ID => AssetKind::Prop,
            _ => AssetKind::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AssetKind::Camera => "Camera",
            AssetKind::Prop => "Prop",
            AssetKind::Other => "Other",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const ID_KEY: &str = "id";
const NAME_KEY: &str = "name";
const TYPE_ID_KEY: &str = "typeId";

/// One entry of a scene's `assets` list.
///
/// Only `id`, `name` and `typeId` are interpreted, and only when they hold strings. The
/// record keeps every field exactly as read, in file order, so that it survives a
/// load/save cycle unchanged. Renaming a copy rewrites `name` in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRecord {
    fields: Map<String, Value>,
}

impl AssetRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, type_id: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(ID_KEY.to_string(), Value::String(id.into()));
        fields.insert(NAME_KEY.to_string(), Value::String(name.into()));
        fields.insert(TYPE_ID_KEY.to_string(), Value::String(type_id.into()));
        AssetRecord { fields }
    }

    /// Adds or replaces a field. Builder-style, mostly useful for fixtures.
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.text(ID_KEY)
    }

    pub fn name(&self) -> Option<&str> {
        self.text(NAME_KEY)
    }

    pub fn type_id(&self) -> Option<&str> {
        self.text(TYPE_ID_KEY)
    }

    pub fn kind(&self) -> AssetKind {
        self.type_id()
            .map(AssetKind::from_type_id)
            .unwrap_or(AssetKind::Other)
    }

    /// Returns a field by key, as stored in the file.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Sets `name`, keeping the field's position if the record already has one.
    pub(crate) fn set_name(&mut self, name: String) {
        self.fields.insert(NAME_KEY.to_string(), Value::String(name));
    }
}

/// A row of [`SceneDocument::list_assets`](super::SceneDocument::list_assets).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    /// The record's `id`, or an empty string if it has none.
    pub id: String,
    pub kind: AssetKind,
    /// The record's `name`, or [`UNNAMED_ASSET`] if it has none.
    pub name: String,
    pub hierarchy: HierarchyPath,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_from_known_type_ids() {
        assert_eq!(AssetKind::from_type_id("6a05ecf3-1501-4cab-b9d7-84131b881a29"), AssetKind::Camera);
        assert_eq!(AssetKind::from_type_id("6A05ECF3-1501-4CAB-B9D7-84131B881A29"), AssetKind::Camera);
        assert_eq!(AssetKind::from_type_id("945f0112-8ebe-4c5e-bda2-700925489a57"), AssetKind::Prop);
        assert_eq!(AssetKind::from_type_id("00000000-0000-0000-0000-000000000000"), AssetKind::Other);
        assert_eq!(AssetKind::from_type_id("camera"), AssetKind::Other);
        assert_eq!(AssetKind::from_type_id(""), AssetKind::Other);
    }

    #[test]
    fn record_without_type_id_is_other() {
        let record: AssetRecord = serde_json::from_value(json!({"id": "x", "name": "n"})).unwrap();
        assert_eq!(record.kind(), AssetKind::Other);
        assert_eq!(record.type_id(), None);
    }

    #[test]
    fn unknown_fields_are_preserved_in_order() {
        let input = r#"{"id":"a","name":"Cam","typeId":"t","enabled":true,"data":{"z":1,"a":[1.5,"x"]}}"#;
        let record: AssetRecord = serde_json::from_str(input).unwrap();
        assert_eq!(record.field("enabled"), Some(&json!(true)));
        assert_eq!(serde_json::to_string(&record).unwrap(), input);
    }

    #[test]
    fn absent_fields_are_not_invented_on_write() {
        let input = r#"{"name":"Loose"}"#;
        let record: AssetRecord = serde_json::from_str(input).unwrap();
        assert_eq!(record.id(), None);
        assert_eq!(serde_json::to_string(&record).unwrap(), input);
    }

    #[test]
    fn key_order_and_nulls_survive() {
        let input = r#"{"name":"A","enabled":true,"typeId":"t","id":null}"#;
        let record: AssetRecord = serde_json::from_str(input).unwrap();
        assert_eq!(record.id(), None);
        assert_eq!(record.field("id"), Some(&Value::Null));
        assert_eq!(serde_json::to_string(&record).unwrap(), input);
    }

    #[test]
    fn rename_keeps_field_position() {
        let mut record: AssetRecord = serde_json::from_str(r#"{"typeId":"t","name":null,"id":"x"}"#).unwrap();
        assert_eq!(record.name(), None);
        record.set_name("B".to_string());
        assert_eq!(serde_json::to_string(&record).unwrap(), r#"{"typeId":"t","name":"B","id":"x"}"#);

        let mut nameless: AssetRecord = serde_json::from_str(r#"{"id":"y"}"#).unwrap();
        nameless.set_name("Unknown".to_string());
        assert_eq!(serde_json::to_string(&nameless).unwrap(), r#"{"id":"y","name":"Unknown"}"#);
    }

    #[test]
    fn non_string_known_fields_are_not_interpreted() {
        let record: AssetRecord = serde_json::from_value(json!({"id": 7, "name": ["x"], "typeId": null})).unwrap();
        assert_eq!(record.id(), None);
        assert_eq!(record.name(), None);
        assert_eq!(record.kind(), AssetKind::Other);
    }
}
