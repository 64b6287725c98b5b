use crate::tree::{self, Tree, Value};

pub const DEFAULT_UI_TYPE: &str = "custom";
pub const DEFAULT_SOURCE_POSITION: &str = "right";
pub const DEFAULT_TARGET_POSITION: &str = "left";

/// Canvas coordinates of a node.
///
/// Whole-number coordinates are written as integers, fractional ones as floats.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn from_tree(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let coordinate = |key: &str| map.get(key).and_then(Value::as_f64).unwrap_or(0.0);
        Some(Self::new(coordinate("x"), coordinate("y")))
    }

    fn to_tree(self) -> Value {
        let mut map = Tree::new();
        map.insert("x".into(), tree::number(self.x));
        map.insert("y".into(), tree::number(self.y));
        Value::Object(map)
    }
}

/// Fields every node carries regardless of its kind.
///
/// Reading is lenient: a value of the wrong kind leaves the field at its default, matching
/// how the editor that produces these documents treats them.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeBase {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Top-level `type`; a shape tag for the editor, independent of `data.type`.
    pub ui_type: String,
    pub position: Position,
    pub position_absolute: Option<Position>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub source_position: String,
    pub target_position: String,
    pub selected: bool,
    pub parent_id: Option<String>,
    /// `"parent"` keeps the node inside its parent's bounds while dragging.
    pub extent: Option<String>,
    pub z_index: Option<i64>,
    pub selectable: Option<bool>,
    pub draggable: Option<bool>,
}

impl Default for NodeBase {
    fn default() -> Self {
        Self::new("", "")
    }
}

impl NodeBase {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            ui_type: DEFAULT_UI_TYPE.to_string(),
            position: Position::default(),
            position_absolute: None,
            width: None,
            height: None,
            source_position: DEFAULT_SOURCE_POSITION.to_string(),
            target_position: DEFAULT_TARGET_POSITION.to_string(),
            selected: false,
            parent_id: None,
            extent: None,
            z_index: None,
            selectable: None,
            draggable: None,
        }
    }

    pub(crate) fn from_tree(node: &Tree, default_title: &str) -> Self {
        let empty = Tree::new();
        let data = tree::opt_map(node, "data").unwrap_or(&empty);

        Self {
            id: tree::str_or(node, "id", ""),
            title: tree::str_or(data, "title", default_title),
            description: tree::str_or(data, "desc", ""),
            ui_type: tree::str_or(node, "type", DEFAULT_UI_TYPE),
            position: node
                .get("position")
                .and_then(Position::from_tree)
                .unwrap_or_default(),
            position_absolute: node.get("positionAbsolute").and_then(Position::from_tree),
            width: tree::opt_i64(node, "width"),
            height: tree::opt_i64(node, "height"),
            source_position: tree::str_or(node, "sourcePosition", DEFAULT_SOURCE_POSITION),
            target_position: tree::str_or(node, "targetPosition", DEFAULT_TARGET_POSITION),
            selected: tree::bool_or(node, "selected", false),
            parent_id: tree::opt_str(node, "parentId"),
            extent: tree::opt_str(node, "extent"),
            z_index: tree::opt_i64(node, "zIndex"),
            selectable: tree::opt_bool(node, "selectable"),
            draggable: tree::opt_bool(node, "draggable"),
        }
    }

    /// The part of `data` every node writes before its payload.
    pub(crate) fn data_header(&self, node_type: &str) -> Tree {
        let mut data = Tree::new();
        data.insert("type".into(), node_type.into());
        data.insert("title".into(), self.title.clone().into());
        data.insert("desc".into(), self.description.clone().into());
        data.insert("selected".into(), self.selected.into());
        data
    }

    /// Wraps a finished `data` map in the node envelope.
    pub(crate) fn to_tree(&self, data: Tree) -> Value {
        let mut node = Tree::new();
        node.insert("id".into(), self.id.clone().into());
        node.insert("type".into(), self.ui_type.clone().into());
        node.insert("position".into(), self.position.to_tree());
        node.insert("data".into(), Value::Object(data));

        if let Some(position) = self.position_absolute {
            node.insert("positionAbsolute".into(), position.to_tree());
        }
        if let Some(width) = self.width {
            node.insert("width".into(), width.into());
        }
        if let Some(height) = self.height {
            node.insert("height".into(), height.into());
        }
        if let Some(parent_id) = &self.parent_id {
            node.insert("parentId".into(), parent_id.clone().into());
        }
        if let Some(extent) = &self.extent {
            node.insert("extent".into(), extent.clone().into());
        }
        if let Some(z_index) = self.z_index {
            node.insert("zIndex".into(), z_index.into());
        }
        if let Some(selectable) = self.selectable {
            node.insert("selectable".into(), selectable.into());
        }
        if let Some(draggable) = self.draggable {
            node.insert("draggable".into(), draggable.into());
        }

        if self.source_position != DEFAULT_SOURCE_POSITION {
            node.insert("sourcePosition".into(), self.source_position.clone().into());
        }
        if self.target_position != DEFAULT_TARGET_POSITION {
            node.insert("targetPosition".into(), self.target_position.clone().into());
        }
        if self.selected {
            node.insert("selected".into(), true.into());
        }

        Value::Object(node)
    }
}
