use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in scene units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Bounds {
            x,
            y,
            width: self.max_x().max(other.max_x()) - x,
            height: self.max_y().max(other.max_y()) - y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridGeometry {
    pub cell_width: f64,
    pub cell_height: f64,
}

impl GridGeometry {
    pub fn new(cell_width: f64, cell_height: f64) -> Self {
        Self {
            cell_width,
            cell_height,
        }
    }

    /// Both dimensions strictly positive and finite.
    pub fn is_valid(&self) -> bool {
        self.cell_width > 0.0
            && self.cell_height > 0.0
            && self.cell_width.is_finite()
            && self.cell_height.is_finite()
    }
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self::new(150.0, 150.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Layer {
    Map,
    Grid,
    Drawing,
    Prop,
    Mount,
    Character,
    Attachment,
    Note,
    Text,
    Ruler,
    Fog,
    Pointer,
    PostProcess,
    Control,
    Popover,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub value: String,
    pub size: f64,
    pub font: String,
    pub align: TextAlign,
    pub color: String,
    pub bold: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemKind {
    Text,
}

/// Declarative text item handed to the host for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub text: TextContent,
    pub position: Vec2,
    pub layer: Layer,
    pub locked: bool,
}

fn default_item_kind() -> String {
    "SHAPE".to_string()
}

/// An item as returned by the host. `size` is the item's extent from
/// `position`, used for bounding-box queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneItem {
    pub id: String,
    #[serde(rename = "type", default = "default_item_kind")]
    pub kind: String,
    #[serde(default)]
    pub position: Vec2,
    #[serde(default)]
    pub size: Vec2,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<Layer>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextContent>,
}

impl SceneItem {
    pub fn shape(id: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            id: id.into(),
            kind: default_item_kind(),
            position: Vec2::new(bounds.x, bounds.y),
            size: Vec2::new(bounds.width, bounds.height),
            layer: None,
            locked: false,
            text: None,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.position.x, self.position.y, self.size.x, self.size.y)
    }
}

impl From<LabelItem> for SceneItem {
    fn from(item: LabelItem) -> Self {
        Self {
            id: item.id,
            kind: "TEXT".to_string(),
            position: item.position,
            size: Vec2::default(),
            layer: Some(item.layer),
            locked: item.locked,
            text: Some(item.text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("scene service error: {0}")]
    Backend(String),
    #[error("no bounds for an empty selection")]
    EmptySelection,
    #[error("unknown item ids: {}", .0.join(", "))]
    UnknownItems(Vec<String>),
    #[error("item ids already in scene: {}", .0.join(", "))]
    DuplicateItems(Vec<String>),
}

/// The host's scene service. Each call is one request/response round trip;
/// `add_items` and `delete_items` apply their whole batch or nothing.
#[async_trait]
pub trait SceneStore: Send + Sync {
    async fn get_items(&self) -> Result<Vec<SceneItem>, StoreError>;
    async fn get_item_bounds(&self, ids: &[String]) -> Result<Bounds, StoreError>;
    async fn get_grid(&self) -> Result<GridGeometry, StoreError>;
    async fn add_items(&self, items: Vec<LabelItem>) -> Result<(), StoreError>;
    async fn delete_items(&self, ids: Vec<String>) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: SceneStore + ?Sized> SceneStore for Arc<T> {
    async fn get_items(&self) -> Result<Vec<SceneItem>, StoreError> {
        (**self).get_items().await
    }

    async fn get_item_bounds(&self, ids: &[String]) -> Result<Bounds, StoreError> {
        (**self).get_item_bounds(ids).await
    }

    async fn get_grid(&self) -> Result<GridGeometry, StoreError> {
        (**self).get_grid().await
    }

    async fn add_items(&self, items: Vec<LabelItem>) -> Result<(), StoreError> {
        (**self).add_items(items).await
    }

    async fn delete_items(&self, ids: Vec<String>) -> Result<(), StoreError> {
        (**self).delete_items(ids).await
    }
}

/// Serialized scene: grid geometry plus items in host order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDocument {
    #[serde(default)]
    pub grid: GridGeometry,
    #[serde(default)]
    pub items: Vec<SceneItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    GetItems,
    GetItemBounds,
    GetGrid,
    AddItems,
    DeleteItems,
}

/// A store call as observed by [`MemoryScene`], with its batch size where
/// one applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreCall {
    pub op: StoreOp,
    pub count: usize,
}

/// In-process [`SceneStore`] backed by a [`SceneDocument`].
#[derive(Debug, Default)]
pub struct MemoryScene {
    document: Mutex<SceneDocument>,
    calls: Mutex<Vec<StoreCall>>,
    failing: Mutex<Option<StoreOp>>,
}

impl MemoryScene {
    pub fn new(grid: GridGeometry) -> Self {
        Self::from_document(SceneDocument {
            grid,
            items: Vec::new(),
        })
    }

    pub fn from_document(document: SceneDocument) -> Self {
        Self {
            document: Mutex::new(document),
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(None),
        }
    }

    pub fn from_json(input: &str) -> serde_json::Result<Self> {
        Ok(Self::from_document(serde_json::from_str(input)?))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&*self.document.lock())
    }

    pub fn document(&self) -> SceneDocument {
        self.document.lock().clone()
    }

    pub fn items(&self) -> Vec<SceneItem> {
        self.document.lock().items.clone()
    }

    pub fn insert(&self, item: SceneItem) {
        self.document.lock().items.push(item);
    }

    pub fn set_grid(&self, grid: GridGeometry) {
        self.document.lock().grid = grid;
    }

    /// Make every later call of `op` fail with a backend error.
    pub fn fail_on(&self, op: StoreOp) {
        *self.failing.lock() = Some(op);
    }

    pub fn clear_failure(&self) {
        *self.failing.lock() = None;
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().clone()
    }

    fn record(&self, op: StoreOp, count: usize) -> Result<(), StoreError> {
        self.calls.lock().push(StoreCall { op, count });
        if *self.failing.lock() == Some(op) {
            return Err(StoreError::Backend(format!("{op:?} unavailable")));
        }
        Ok(())
    }
}

#[async_trait]
impl SceneStore for MemoryScene {
    async fn get_items(&self) -> Result<Vec<SceneItem>, StoreError> {
        self.record(StoreOp::GetItems, 0)?;
        Ok(self.items())
    }

    async fn get_item_bounds(&self, ids: &[String]) -> Result<Bounds, StoreError> {
        self.record(StoreOp::GetItemBounds, ids.len())?;
        let document = self.document.lock();
        let mut unknown = Vec::new();
        let mut bounds: Option<Bounds> = None;
        for id in ids {
            match document.items.iter().find(|item| &item.id == id) {
                Some(item) => {
                    let item_bounds = item.bounds();
                    bounds = Some(match bounds {
                        Some(acc) => acc.union(&item_bounds),
                        None => item_bounds,
                    });
                }
                None => unknown.push(id.clone()),
            }
        }
        if !unknown.is_empty() {
            return Err(StoreError::UnknownItems(unknown));
        }
        bounds.ok_or(StoreError::EmptySelection)
    }

    async fn get_grid(&self) -> Result<GridGeometry, StoreError> {
        self.record(StoreOp::GetGrid, 0)?;
        Ok(self.document.lock().grid)
    }

    async fn add_items(&self, items: Vec<LabelItem>) -> Result<(), StoreError> {
        self.record(StoreOp::AddItems, items.len())?;
        let mut document = self.document.lock();
        let mut seen: HashSet<&str> = document.items.iter().map(|item| item.id.as_str()).collect();
        let duplicates: Vec<String> = items
            .iter()
            .filter(|item| !seen.insert(item.id.as_str()))
            .map(|item| item.id.clone())
            .collect();
        if !duplicates.is_empty() {
            return Err(StoreError::DuplicateItems(duplicates));
        }
        document.items.extend(items.into_iter().map(SceneItem::from));
        Ok(())
    }

    async fn delete_items(&self, ids: Vec<String>) -> Result<(), StoreError> {
        self.record(StoreOp::DeleteItems, ids.len())?;
        let mut document = self.document.lock();
        let unknown: Vec<String> = ids
            .iter()
            .filter(|id| !document.items.iter().any(|item| &item.id == *id))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(StoreError::UnknownItems(unknown));
        }
        let doomed: HashSet<&str> = ids.iter().map(String::as_str).collect();
        document.items.retain(|item| !doomed.contains(item.id.as_str()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    fn label(id: &str, x: f64, y: f64) -> LabelItem {
        LabelItem {
            id: id.to_string(),
            kind: ItemKind::Text,
            text: TextContent {
                value: id.to_string(),
                size: 16.0,
                font: "Roboto".to_string(),
                align: TextAlign::Center,
                color: "#888888".to_string(),
                bold: true,
            },
            position: Vec2::new(x, y),
            layer: Layer::Map,
            locked: true,
        }
    }

    #[test]
    fn union_covers_both_rectangles() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(-5.0, 20.0, 10.0, 5.0);
        assert_eq!(a.union(&b), Bounds::new(-5.0, 0.0, 15.0, 25.0));
    }

    #[test]
    fn grid_validity() {
        assert!(GridGeometry::new(100.0, 50.0).is_valid());
        assert!(!GridGeometry::new(0.0, 50.0).is_valid());
        assert!(!GridGeometry::new(100.0, -1.0).is_valid());
        assert!(!GridGeometry::new(f64::NAN, 10.0).is_valid());
        assert!(!GridGeometry::new(f64::INFINITY, 10.0).is_valid());
    }

    #[test]
    fn label_item_serializes_in_host_shape() {
        let value = serde_json::to_value(label("GRID_LABEL_A1", 50.0, 50.0)).unwrap();
        assert_eq!(value["type"], "TEXT");
        assert_eq!(value["layer"], "MAP");
        assert_eq!(value["text"]["align"], "CENTER");
        assert_eq!(value["position"]["x"], 50.0);
        assert_eq!(value["locked"], true);
    }

    #[test]
    fn item_bounds_cover_selection() {
        let scene = MemoryScene::new(GridGeometry::default());
        scene.insert(SceneItem::shape("map", Bounds::new(0.0, 0.0, 300.0, 200.0)));
        scene.insert(SceneItem::shape("token", Bounds::new(250.0, 150.0, 100.0, 100.0)));
        let ids = vec!["map".to_string(), "token".to_string()];
        let bounds = block_on(scene.get_item_bounds(&ids)).unwrap();
        assert_eq!(bounds, Bounds::new(0.0, 0.0, 350.0, 250.0));

        let missing = block_on(scene.get_item_bounds(&["ghost".to_string()]));
        assert_eq!(missing, Err(StoreError::UnknownItems(vec!["ghost".to_string()])));
        assert_eq!(block_on(scene.get_item_bounds(&[])), Err(StoreError::EmptySelection));
    }

    #[test]
    fn add_rejects_duplicates_atomically() {
        let scene = MemoryScene::new(GridGeometry::default());
        block_on(scene.add_items(vec![label("a", 0.0, 0.0)])).unwrap();
        let result = block_on(scene.add_items(vec![label("b", 0.0, 0.0), label("a", 1.0, 1.0)]));
        assert_eq!(result, Err(StoreError::DuplicateItems(vec!["a".to_string()])));
        assert_eq!(scene.items().len(), 1);
    }

    #[test]
    fn delete_rejects_unknown_atomically() {
        let scene = MemoryScene::new(GridGeometry::default());
        block_on(scene.add_items(vec![label("a", 0.0, 0.0), label("b", 0.0, 0.0)])).unwrap();
        let result = block_on(scene.delete_items(vec!["a".to_string(), "zz".to_string()]));
        assert_eq!(result, Err(StoreError::UnknownItems(vec!["zz".to_string()])));
        assert_eq!(scene.items().len(), 2);
        block_on(scene.delete_items(vec!["a".to_string()])).unwrap();
        assert_eq!(scene.items()[0].id, "b");
    }

    #[test]
    fn injected_failure_is_recorded() {
        let scene = MemoryScene::new(GridGeometry::default());
        scene.fail_on(StoreOp::GetGrid);
        assert!(matches!(block_on(scene.get_grid()), Err(StoreError::Backend(_))));
        assert_eq!(
            scene.calls(),
            vec![StoreCall {
                op: StoreOp::GetGrid,
                count: 0
            }]
        );
        scene.clear_failure();
        assert!(block_on(scene.get_grid()).is_ok());
    }

    #[test]
    fn document_round_trips_through_json() {
        let input = r#"{
            "grid": { "cellWidth": 70, "cellHeight": 70 },
            "items": [ { "id": "map", "position": { "x": 0, "y": 0 }, "size": { "x": 700, "y": 350 } } ]
        }"#;
        let scene = MemoryScene::from_json(input).unwrap();
        assert_eq!(scene.document().grid, GridGeometry::new(70.0, 70.0));
        assert_eq!(scene.items()[0].kind, "SHAPE");
        let again = MemoryScene::from_json(&scene.to_json().unwrap()).unwrap();
        assert_eq!(again.document(), scene.document());
    }
}
