use std::collections::HashMap;
use std::fmt;
use std::ops::ControlFlow;

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Returns true if `key` is a hyphenated UUID (8-4-4-4-12 hex digits, any case).
///
/// Keys of this form in the group tree refer to assets; any other non-empty key is a
/// group label.
pub fn is_asset_id(key: &str) -> bool {
    // Restricting the length rules out the simple, braced and URN forms `Uuid` also accepts.
    key.len() == 36 && Uuid::try_parse(key).is_ok()
}

const COLLAPSED_KEY: &str = "collapsed";
const KEY_KEY: &str = "key";
const CHILDREN_KEY: &str = "children";

/// A node of the `assetHierarchy` tree. Each node owns its children.
///
/// `fields` holds the node's entries as read, in file order; the `children` entry is left
/// as a `null` placeholder and the typed children are written back into that slot. Nodes
/// built here carry `collapsed`, `key` and `children` in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyNode {
    fields: Map<String, Value>,
    children: Option<Vec<HierarchyNode>>,
}

impl HierarchyNode {
    /// An empty tree root, as written for scenes that had no hierarchy.
    pub fn root() -> Self {
        HierarchyNode::group("")
    }

    pub fn group(label: impl Into<String>) -> Self {
        HierarchyNode::built(label.into(), Some(Vec::new()))
    }

    pub fn leaf(asset_id: impl Into<String>) -> Self {
        HierarchyNode::built(asset_id.into(), None)
    }

    fn built(key: String, children: Option<Vec<HierarchyNode>>) -> Self {
        let mut fields = Map::new();
        fields.insert(COLLAPSED_KEY.to_string(), Value::Bool(false));
        fields.insert(KEY_KEY.to_string(), Value::String(key));
        fields.insert(CHILDREN_KEY.to_string(), Value::Null);
        HierarchyNode { fields, children }
    }

    fn from_fields(mut fields: Map<String, Value>) -> Result<Self, serde_json::Error> {
        let children = match fields.get_mut(CHILDREN_KEY) {
            None | Some(Value::Null) => None,
            Some(slot) => Some(serde_json::from_value(slot.take())?),
        };
        Ok(HierarchyNode { fields, children })
    }

    /// The node's label or asset id. Missing or non-string keys read as empty.
    pub fn key(&self) -> &str {
        self.fields.get(KEY_KEY).and_then(Value::as_str).unwrap_or_default()
    }

    pub fn is_collapsed(&self) -> bool {
        self.fields.get(COLLAPSED_KEY).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Returns a field by key, as stored in the file. `children` reads as `null`.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Builder-style helper for assembling trees.
    pub fn with_child(mut self, child: HierarchyNode) -> Self {
        self.children.get_or_insert_with(Vec::new).push(child);
        self
    }

    pub fn children(&self) -> &[HierarchyNode] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Maps every asset id referenced below this node to its group path.
    ///
    /// If an id is referenced more than once, the first occurrence in depth-first
    /// pre-order wins, which agrees with [`HierarchyNode::find_path`].
    pub fn path_map(&self) -> HashMap<String, HierarchyPath> {
        let mut map = HashMap::new();
        self.walk::<()>(|id, path| {
            map.entry(id.to_string())
                .or_insert_with(|| HierarchyPath::new(path.iter().copied()));
            ControlFlow::Continue(())
        });
        map
    }

    /// Returns the group path of the first leaf keyed by `asset_id`, or `None` if there is
    /// no such leaf. A leaf placed directly under the root yields an empty path.
    pub fn find_path(&self, asset_id: &str) -> Option<HierarchyPath> {
        self.walk(|id, path| {
            if id == asset_id {
                ControlFlow::Break(HierarchyPath::new(path.iter().copied()))
            } else {
                ControlFlow::Continue(())
            }
        })
    }

    /// Walks the tree below `self` depth-first, calling `visit` for every asset-id key with
    /// the group labels leading to it. The node's own key is not part of any path.
    ///
    /// Uses an explicit stack so that deeply nested input cannot exhaust the call stack.
    fn walk<'a, B>(&'a self, mut visit: impl FnMut(&'a str, &[&'a str]) -> ControlFlow<B>) -> Option<B> {
        let mut path: Vec<&'a str> = Vec::new();
        let mut stack: Vec<(&'a HierarchyNode, usize)> =
            self.children().iter().rev().map(|child| (child, 0)).collect();

        while let Some((node, depth)) = stack.pop() {
            path.truncate(depth);
            let key = node.key();
            if is_asset_id(key) {
                if let ControlFlow::Break(found) = visit(key, &path) {
                    return Some(found);
                }
            } else if !key.is_empty() {
                path.push(key);
            }
            let depth = path.len();
            stack.extend(node.children().iter().rev().map(|child| (child, depth)));
        }
        None
    }

    /// Makes sure the groups named by `path` exist below this node, creating only the
    /// missing ones, and returns the innermost group.
    ///
    /// An existing child is reused when its key equals the label exactly.
    pub(crate) fn ensure_path(&mut self, path: &HierarchyPath) -> &mut HierarchyNode {
        let mut current = self;
        for label in path.labels() {
            let children = current.children.get_or_insert_with(Vec::new);
            let index = match children.iter().position(|child| child.key() == label.as_str()) {
                Some(index) => index,
                None => {
                    children.push(HierarchyNode::group(label.clone()));
                    children.len() - 1
                }
            };
            current = &mut children[index];
        }
        current
    }

    /// Appends a leaf for `asset_id` unless a direct child already has that key.
    /// Returns whether a leaf was added.
    pub(crate) fn insert_leaf(&mut self, asset_id: &str) -> bool {
        let children = self.children.get_or_insert_with(Vec::new);
        if children.iter().any(|child| child.key() == asset_id) {
            return false;
        }
        children.push(HierarchyNode::leaf(asset_id));
        true
    }
}

impl<'de> Deserialize<'de> for HierarchyNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = Map::deserialize(deserializer)?;
        HierarchyNode::from_fields(fields).map_err(de::Error::custom)
    }
}

impl Serialize for HierarchyNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in &self.fields {
            if key == CHILDREN_KEY {
                map.serialize_entry(key, &self.children)?;
            } else {
                map.serialize_entry(key, value)?;
            }
        }
        // Children added to a node that had no `children` entry.
        if self.children.is_some() && !self.fields.contains_key(CHILDREN_KEY) {
            map.serialize_entry(CHILDREN_KEY, &self.children)?;
        }
        map.end()
    }
}

/// Ordered group labels from the hierarchy root to the group directly containing an asset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct HierarchyPath(Vec<String>);

impl HierarchyPath {
    pub fn new<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Self {
        HierarchyPath(labels.into_iter().map(Into::into).collect())
    }

    pub fn labels(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Renders the labels joined by `/`, or nothing for an empty path.
impl fmt::Display for HierarchyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}
