//! In-memory document host
//!
//! A [`DocumentHost`] backed by a node table behind a `parking_lot` lock.
//! Documents are described with nested [`NodeSpec`] values, which is also
//! the JSON shape the CLI reads and writes.
//!
//! Font handling mirrors a real canvas: text edits require every font on
//! the node to be loaded first via [`DocumentHost::ensure_font_available`].

use crate::error::DocumentError;
use crate::host::{DocumentHost, DocumentTree};
use crate::node::{Bounds, Color, FontDescriptor, NodeId, NodeInfo, NodeKind, Point, TextFacet};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Serializable description of a node subtree
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Id assigned by the document (ignored on input)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NodeId>,
    /// Structural kind
    #[serde(default)]
    pub kind: NodeKind,
    /// Layer name
    #[serde(default)]
    pub name: String,
    /// Visible characters; presence gives the node its text facet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters: Option<String>,
    /// Fonts used by `characters`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fonts: Vec<FontDescriptor>,
    /// Position and size
    #[serde(default)]
    pub bounds: Bounds,
    /// Solid fill, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Color>,
    /// Children; presence gives the node its children facet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NodeSpec>>,
}

impl NodeSpec {
    fn container(kind: NodeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            children: Some(Vec::new()),
            ..Self::default()
        }
    }

    /// Page node
    #[must_use]
    pub fn page(name: impl Into<String>) -> Self {
        Self::container(NodeKind::Page, name)
    }

    /// Frame node
    #[must_use]
    pub fn frame(name: impl Into<String>) -> Self {
        Self::container(NodeKind::Frame, name)
    }

    /// Group node
    #[must_use]
    pub fn group(name: impl Into<String>) -> Self {
        Self::container(NodeKind::Group, name)
    }

    /// Component node
    #[must_use]
    pub fn component(name: impl Into<String>) -> Self {
        Self::container(NodeKind::Component, name)
    }

    /// Text node using Inter Regular
    #[must_use]
    pub fn text(name: impl Into<String>, characters: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Text,
            name: name.into(),
            characters: Some(characters.into()),
            fonts: vec![FontDescriptor::inter_regular()],
            ..Self::default()
        }
    }

    /// Node with no capabilities (shape, image)
    #[must_use]
    pub fn shape(name: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Other,
            name: name.into(),
            ..Self::default()
        }
    }

    /// With children
    #[must_use]
    pub fn with_children(mut self, children: Vec<NodeSpec>) -> Self {
        self.children = Some(children);
        self
    }

    /// With bounds
    #[must_use]
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// With fonts
    #[must_use]
    pub fn with_fonts(mut self, fonts: Vec<FontDescriptor>) -> Self {
        self.fonts = fonts;
        self
    }
}

#[derive(Debug, Clone)]
struct NodeRecord {
    kind: NodeKind,
    name: String,
    characters: Option<String>,
    fonts: Vec<FontDescriptor>,
    bounds: Bounds,
    fill: Option<Color>,
    parent: Option<NodeId>,
    children: Option<Vec<NodeId>>,
}

#[derive(Debug)]
struct Inner {
    nodes: HashMap<NodeId, NodeRecord>,
    next_id: u64,
    root: NodeId,
    selection: Vec<NodeId>,
    focused: Vec<NodeId>,
    viewport_center: Point,
    /// `None` means every font can be loaded
    installed_fonts: Option<HashSet<FontDescriptor>>,
    loaded_fonts: HashSet<FontDescriptor>,
}

impl Inner {
    fn allocate(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn record(&self, node: NodeId) -> Result<&NodeRecord, DocumentError> {
        self.nodes.get(&node).ok_or(DocumentError::NodeNotFound(node))
    }

    fn record_mut(&mut self, node: NodeId) -> Result<&mut NodeRecord, DocumentError> {
        self.nodes
            .get_mut(&node)
            .ok_or(DocumentError::NodeNotFound(node))
    }

    /// Insert a spec subtree; returns the new subtree root
    fn insert_spec(&mut self, spec: &NodeSpec, parent: Option<NodeId>) -> NodeId {
        let id = self.allocate();
        self.nodes.insert(
            id,
            NodeRecord {
                kind: spec.kind,
                name: spec.name.clone(),
                characters: spec.characters.clone(),
                fonts: spec.fonts.clone(),
                bounds: spec.bounds,
                fill: spec.fill,
                parent,
                children: spec.children.as_ref().map(|_| Vec::new()),
            },
        );
        if let Some(children) = &spec.children {
            let ids: Vec<NodeId> = children
                .iter()
                .map(|child| self.insert_spec(child, Some(id)))
                .collect();
            if let Some(record) = self.nodes.get_mut(&id) {
                record.children = Some(ids);
            }
        }
        id
    }

    fn export(&self, node: NodeId) -> Option<NodeSpec> {
        let record = self.nodes.get(&node)?;
        Some(NodeSpec {
            id: Some(node),
            kind: record.kind,
            name: record.name.clone(),
            characters: record.characters.clone(),
            fonts: record.fonts.clone(),
            bounds: record.bounds,
            fill: record.fill,
            children: record
                .children
                .as_ref()
                .map(|ids| ids.iter().filter_map(|&c| self.export(c)).collect()),
        })
    }

    fn is_ancestor(&self, candidate: NodeId, mut node: NodeId) -> bool {
        loop {
            if candidate == node {
                return true;
            }
            match self.nodes.get(&node).and_then(|r| r.parent) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    fn detach(&mut self, node: NodeId) {
        let parent = self.nodes.get(&node).and_then(|r| r.parent);
        if let Some(parent) = parent {
            if let Some(children) = self
                .nodes
                .get_mut(&parent)
                .and_then(|r| r.children.as_mut())
            {
                children.retain(|&c| c != node);
            }
        }
        if let Some(record) = self.nodes.get_mut(&node) {
            record.parent = None;
        }
    }

    fn require_loaded(&self, node: NodeId, fonts: &[FontDescriptor]) -> Result<(), DocumentError> {
        match fonts.iter().find(|f| !self.loaded_fonts.contains(*f)) {
            Some(font) => Err(DocumentError::FontNotLoaded {
                node,
                font: font.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// In-memory [`DocumentHost`]
#[derive(Debug)]
pub struct MemoryDocument {
    inner: RwLock<Inner>,
}

impl MemoryDocument {
    /// Empty document with a single page root
    #[must_use]
    pub fn new() -> Self {
        Self::from_spec(NodeSpec::page("Page 1"))
    }

    /// Build a document whose root is `spec`
    #[must_use]
    pub fn from_spec(spec: NodeSpec) -> Self {
        let mut inner = Inner {
            nodes: HashMap::new(),
            next_id: 1,
            root: NodeId(0),
            selection: Vec::new(),
            focused: Vec::new(),
            viewport_center: Point::default(),
            installed_fonts: None,
            loaded_fonts: HashSet::new(),
        };
        inner.root = inner.insert_spec(&spec, None);
        Self {
            inner: RwLock::new(inner),
        }
    }

    /// Parse a [`NodeSpec`] JSON document
    ///
    /// # Errors
    /// Returns the JSON error when the input is not a node spec.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let spec: NodeSpec = serde_json::from_str(json)?;
        Ok(Self::from_spec(spec))
    }

    /// Restrict loadable fonts to `fonts`
    #[must_use]
    pub fn with_installed_fonts(self, fonts: impl IntoIterator<Item = FontDescriptor>) -> Self {
        self.inner.write().installed_fonts = Some(fonts.into_iter().collect());
        self
    }

    /// Insert a subtree as the last child of `parent`
    ///
    /// # Errors
    /// [`DocumentError::NodeNotFound`] or [`DocumentError::NotContainer`].
    pub fn insert(&self, parent: NodeId, spec: &NodeSpec) -> Result<NodeId, DocumentError> {
        let mut inner = self.inner.write();
        if inner.record(parent)?.children.is_none() {
            return Err(DocumentError::NotContainer(parent));
        }
        let id = inner.insert_spec(spec, Some(parent));
        if let Some(children) = inner.record_mut(parent)?.children.as_mut() {
            children.push(id);
        }
        Ok(id)
    }

    /// Select nodes without going through the async host API
    pub fn select(&self, nodes: &[NodeId]) {
        self.inner.write().selection = nodes.to_vec();
    }

    /// First node in document order named `name`
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        let inner = self.inner.read();
        let mut stack = vec![inner.root];
        while let Some(node) = stack.pop() {
            let record = inner.nodes.get(&node)?;
            if record.name == name {
                return Some(node);
            }
            if let Some(children) = &record.children {
                stack.extend(children.iter().rev().copied());
            }
        }
        None
    }

    /// Snapshot the whole document as a spec tree
    #[must_use]
    pub fn to_spec(&self) -> NodeSpec {
        let inner = self.inner.read();
        inner.export(inner.root).unwrap_or_default()
    }

    /// Pretty JSON of [`MemoryDocument::to_spec`]
    ///
    /// # Errors
    /// Returns the JSON error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.to_spec())
    }

    /// Fill currently applied to `node`
    #[must_use]
    pub fn fill(&self, node: NodeId) -> Option<Color> {
        self.inner.read().nodes.get(&node).and_then(|r| r.fill)
    }

    /// Nodes most recently passed to `focus_view`
    #[must_use]
    pub fn focused(&self) -> Vec<NodeId> {
        self.inner.read().focused.clone()
    }

    /// Fonts loaded so far
    #[must_use]
    pub fn loaded_fonts(&self) -> HashSet<FontDescriptor> {
        self.inner.read().loaded_fonts.clone()
    }

    /// Number of nodes, attached or not
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.inner.read().nodes.len()
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentTree for MemoryDocument {
    fn info(&self, node: NodeId) -> Option<NodeInfo> {
        let inner = self.inner.read();
        inner.nodes.get(&node).map(|r| NodeInfo {
            id: node,
            kind: r.kind,
            name: r.name.clone(),
            bounds: r.bounds,
            parent: r.parent,
        })
    }

    fn text(&self, node: NodeId) -> Option<TextFacet> {
        let inner = self.inner.read();
        let record = inner.nodes.get(&node)?;
        record.characters.as_ref().map(|characters| TextFacet {
            characters: characters.clone(),
            label: record.name.clone(),
            fonts: record.fonts.clone(),
        })
    }

    fn children(&self, node: NodeId) -> Option<Vec<NodeId>> {
        self.inner.read().nodes.get(&node)?.children.clone()
    }

    fn contains(&self, node: NodeId) -> bool {
        self.inner.read().nodes.contains_key(&node)
    }
}

#[async_trait]
impl DocumentHost for MemoryDocument {
    fn root(&self) -> NodeId {
        self.inner.read().root
    }

    async fn current_selection(&self) -> Vec<NodeId> {
        self.inner.read().selection.clone()
    }

    async fn create_text_node(&self, text: &str) -> Result<NodeId, DocumentError> {
        let mut inner = self.inner.write();
        let font = FontDescriptor::inter_regular();
        let root = inner.root;
        let id = inner.allocate();
        inner.require_loaded(id, std::slice::from_ref(&font))?;
        inner.nodes.insert(
            id,
            NodeRecord {
                kind: NodeKind::Text,
                name: text.to_string(),
                characters: Some(text.to_string()),
                fonts: vec![font],
                bounds: Bounds::new(0.0, 0.0, 8.0 * text.chars().count() as f64, 20.0),
                fill: None,
                parent: Some(root),
                children: None,
            },
        );
        if let Some(children) = inner.record_mut(root)?.children.as_mut() {
            children.push(id);
        }
        Ok(id)
    }

    async fn clone_node(&self, node: NodeId) -> Result<NodeId, DocumentError> {
        let mut inner = self.inner.write();
        let spec = inner.export(node).ok_or(DocumentError::NodeNotFound(node))?;
        Ok(inner.insert_spec(&spec, None))
    }

    async fn append_child(&self, parent: NodeId, node: NodeId) -> Result<(), DocumentError> {
        let mut inner = self.inner.write();
        inner.record(node)?;
        if inner.record(parent)?.children.is_none() {
            return Err(DocumentError::NotContainer(parent));
        }
        if inner.is_ancestor(node, parent) {
            return Err(DocumentError::InvalidHierarchy {
                parent,
                child: node,
            });
        }
        inner.detach(node);
        inner.record_mut(node)?.parent = Some(parent);
        if let Some(children) = inner.record_mut(parent)?.children.as_mut() {
            children.push(node);
        }
        Ok(())
    }

    async fn set_selection(&self, nodes: &[NodeId]) -> Result<(), DocumentError> {
        let mut inner = self.inner.write();
        for &node in nodes {
            inner.record(node)?;
        }
        inner.selection = nodes.to_vec();
        Ok(())
    }

    async fn focus_view(&self, nodes: &[NodeId]) -> Result<(), DocumentError> {
        let mut inner = self.inner.write();
        let mut first: Option<Bounds> = None;
        for &node in nodes {
            let bounds = inner.record(node)?.bounds;
            first.get_or_insert(bounds);
        }
        if let Some(bounds) = first {
            inner.viewport_center = bounds.center();
        }
        inner.focused = nodes.to_vec();
        Ok(())
    }

    async fn ensure_font_available(&self, font: &FontDescriptor) -> Result<(), DocumentError> {
        let mut inner = self.inner.write();
        let installed = inner
            .installed_fonts
            .as_ref()
            .map_or(true, |fonts| fonts.contains(font));
        if !installed {
            return Err(DocumentError::FontUnavailable(font.clone()));
        }
        inner.loaded_fonts.insert(font.clone());
        Ok(())
    }

    async fn set_fill(&self, node: NodeId, color: Color) -> Result<(), DocumentError> {
        self.inner.write().record_mut(node)?.fill = Some(color);
        Ok(())
    }

    async fn set_name(&self, node: NodeId, name: &str) -> Result<(), DocumentError> {
        self.inner.write().record_mut(node)?.name = name.to_string();
        Ok(())
    }

    async fn set_position(&self, node: NodeId, position: Point) -> Result<(), DocumentError> {
        let mut inner = self.inner.write();
        let record = inner.record_mut(node)?;
        record.bounds.x = position.x;
        record.bounds.y = position.y;
        Ok(())
    }

    async fn set_text(&self, node: NodeId, text: &str) -> Result<(), DocumentError> {
        let mut inner = self.inner.write();
        let fonts = inner.record(node)?.fonts.clone();
        if inner.record(node)?.characters.is_none() {
            return Err(DocumentError::NotText(node));
        }
        inner.require_loaded(node, &fonts)?;
        inner.record_mut(node)?.characters = Some(text.to_string());
        Ok(())
    }

    async fn set_font(&self, node: NodeId, font: &FontDescriptor) -> Result<(), DocumentError> {
        let mut inner = self.inner.write();
        if inner.record(node)?.characters.is_none() {
            return Err(DocumentError::NotText(node));
        }
        inner.require_loaded(node, std::slice::from_ref(font))?;
        inner.record_mut(node)?.fonts = vec![font.clone()];
        Ok(())
    }

    async fn viewport_center(&self) -> Point {
        self.inner.read().viewport_center
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::{collect_text_leaves, TraversalLimits};
    use pretty_assertions::assert_eq;

    fn card() -> MemoryDocument {
        MemoryDocument::from_spec(NodeSpec::page("Page").with_children(vec![
            NodeSpec::frame("Card")
                .with_bounds(Bounds::new(10.0, 10.0, 200.0, 80.0))
                .with_children(vec![
                    NodeSpec::text("{{Content}}", "Hello"),
                    NodeSpec::group("Actions").with_children(vec![
                        NodeSpec::text("Primary", "Submit"),
                        NodeSpec::shape("Divider"),
                    ]),
                ]),
        ]))
    }

    #[test]
    fn text_label_is_layer_name() {
        let doc = card();
        let node = doc.find_by_name("{{Content}}").unwrap();
        let facet = doc.text(node).unwrap();
        assert_eq!(facet.characters, "Hello");
        assert_eq!(facet.label, "{{Content}}");
    }

    #[test]
    fn shape_has_no_capabilities() {
        let doc = card();
        let divider = doc.find_by_name("Divider").unwrap();
        assert!(doc.text(divider).is_none());
        assert!(doc.children(divider).is_none());
    }

    #[tokio::test]
    async fn clone_is_deep_and_detached() {
        let doc = card();
        let card_id = doc.find_by_name("Card").unwrap();
        let before = doc.node_count();

        let copy = doc.clone_node(card_id).await.unwrap();
        // Card subtree: Card, text, Actions, Primary, Divider
        assert_eq!(doc.node_count(), before + 5);
        assert_eq!(doc.info(copy).unwrap().parent, None);

        let original = collect_text_leaves(&doc, card_id, TraversalLimits::default()).unwrap();
        let cloned = collect_text_leaves(&doc, copy, TraversalLimits::default()).unwrap();
        assert_eq!(original.len(), cloned.len());
        assert!(original.iter().all(|id| !cloned.contains(id)));
    }

    #[tokio::test]
    async fn append_child_rejects_cycles() {
        let doc = card();
        let card_id = doc.find_by_name("Card").unwrap();
        let actions = doc.find_by_name("Actions").unwrap();
        let err = doc.append_child(actions, card_id).await.unwrap_err();
        assert!(matches!(err, DocumentError::InvalidHierarchy { .. }));
    }

    #[tokio::test]
    async fn append_child_moves_node() {
        let doc = card();
        let root = doc.root();
        let actions = doc.find_by_name("Actions").unwrap();
        doc.append_child(root, actions).await.unwrap();

        let card_id = doc.find_by_name("Card").unwrap();
        assert!(!doc.children(card_id).unwrap().contains(&actions));
        assert_eq!(doc.children(root).unwrap().last(), Some(&actions));
        assert_eq!(doc.info(actions).unwrap().parent, Some(root));
    }

    #[tokio::test]
    async fn set_text_requires_loaded_font() {
        let doc = card();
        let node = doc.find_by_name("Primary").unwrap();

        let err = doc.set_text(node, "Confirm").await.unwrap_err();
        assert!(matches!(err, DocumentError::FontNotLoaded { .. }));

        doc.ensure_font_available(&FontDescriptor::inter_regular())
            .await
            .unwrap();
        doc.set_text(node, "Confirm").await.unwrap();
        assert_eq!(doc.text(node).unwrap().characters, "Confirm");
    }

    #[tokio::test]
    async fn uninstalled_font_is_unavailable() {
        let doc = card().with_installed_fonts([FontDescriptor::inter_regular()]);
        let err = doc
            .ensure_font_available(&FontDescriptor::new("Brand Sans", "Bold"))
            .await
            .unwrap_err();
        assert!(matches!(err, DocumentError::FontUnavailable(_)));
    }

    #[tokio::test]
    async fn json_roundtrip_keeps_fill() {
        let doc = card();
        let node = doc.find_by_name("Primary").unwrap();
        doc.set_fill(node, Color::RED).await.unwrap();

        let json = doc.to_json().unwrap();
        let reloaded = MemoryDocument::from_json(&json).unwrap();
        let node = reloaded.find_by_name("Primary").unwrap();
        assert_eq!(reloaded.fill(node), Some(Color::RED));
    }
}
