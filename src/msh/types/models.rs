//! Core data structures for a parsed mesh.
//!
//! This module defines the unified data model every format generation is
//! parsed into:
//! - [`Mesh`], the root aggregate with header metadata and summary counts
//! - [`NodeEntity`] / [`Node`], nodes grouped by geometric entity
//! - [`ElementEntity`] / [`Element`], elements grouped by entity and type
//!
//! Entities keep their members in insertion (file) order, so iteration is
//! deterministic regardless of the source format.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use super::version::MshVersion;

/// Node and element identifier as written in the file.
pub type Tag = u64;

/// Key of a node entity: `(dimension, entity tag)`.
pub type NodeEntityKey = (u8, i32);

/// Key of an element entity: `(dimension, entity tag, element type)`.
pub type ElementEntityKey = (u8, i32, u32);

/// A map that iterates in first-insertion order.
///
/// Re-inserting an existing key replaces the value in place and keeps its
/// original position.
#[derive(Debug, Clone)]
pub(crate) struct InsertionMap<K, V> {
    entries: Vec<V>,
    index: HashMap<K, usize>,
}

impl<K: Eq + Hash, V> InsertionMap<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.index.get(&key) {
            Some(&slot) => Some(std::mem::replace(&mut self.entries[slot], value)),
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(value);
                None
            }
        }
    }

    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(|&slot| &self.entries[slot])
    }

    /// Returns the value for `key`, inserting `make()` first if it is absent.
    pub(crate) fn get_or_insert_with(&mut self, key: K, make: impl FnOnce() -> V) -> &mut V {
        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => {
                let slot = self.entries.len();
                self.entries.push(make());
                self.index.insert(key, slot);
                slot
            }
        };
        &mut self.entries[slot]
    }

    pub(crate) fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    pub(crate) fn values(&self) -> std::slice::Iter<'_, V> {
        self.entries.iter()
    }

    pub(crate) fn into_values(self) -> std::vec::IntoIter<V> {
        self.entries.into_iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<K: Eq + Hash, V> Default for InsertionMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// A single mesh node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub tag: Tag,
    /// `(x, y, z)`; `z` is `0.0` for planar meshes but always present.
    pub coordinates: [f64; 3],
}

impl Node {
    pub fn new(tag: Tag, coordinates: [f64; 3]) -> Self {
        Self { tag, coordinates }
    }
}

/// A single mesh element.
///
/// The arity of `connectivity` is fixed by the owning entity's element type;
/// the parser trusts the record and does not check it.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: Tag,
    pub connectivity: Vec<Tag>,
}

impl Element {
    pub fn new(tag: Tag, connectivity: Vec<Tag>) -> Self {
        Self { tag, connectivity }
    }
}

/// Nodes sharing one geometric entity.
#[derive(Debug, Clone)]
pub struct NodeEntity {
    dimension: u8,
    tag: i32,
    parametric_coordinates: usize,
    declared_nodes: usize,
    nodes: InsertionMap<Tag, Node>,
}

impl NodeEntity {
    pub fn new(dimension: u8, tag: i32, parametric_coordinates: usize, declared_nodes: usize) -> Self {
        Self {
            dimension,
            tag,
            parametric_coordinates,
            declared_nodes,
            nodes: InsertionMap::new(),
        }
    }

    pub fn dimension(&self) -> u8 {
        self.dimension
    }

    pub fn tag(&self) -> i32 {
        self.tag
    }

    pub fn key(&self) -> NodeEntityKey {
        (self.dimension, self.tag)
    }

    /// Number of parametric coordinates stored per node (0 if none).
    pub fn number_of_parametric_coordinates(&self) -> usize {
        self.parametric_coordinates
    }

    /// Node count declared by the file for this entity.
    pub fn number_of_nodes(&self) -> usize {
        self.declared_nodes
    }

    /// Nodes in the order they were read.
    pub fn nodes(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.values()
    }

    pub fn node(&self, tag: Tag) -> Option<&Node> {
        self.nodes.get(&tag)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 0
    }

    pub(crate) fn add_node(&mut self, node: Node) {
        self.nodes.insert(node.tag, node);
    }
}

impl fmt::Display for NodeEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "---- Node entity # {} ----", self.tag)?;
        writeln!(f, "Dimension: {}", self.dimension)?;
        writeln!(f, "Parametric coordinates: {}", self.parametric_coordinates)?;
        writeln!(f, "Number of nodes: {}", self.declared_nodes)
    }
}

/// Elements sharing one entity and one element type.
#[derive(Debug, Clone)]
pub struct ElementEntity {
    dimension: u8,
    tag: i32,
    element_type: u32,
    declared_elements: usize,
    elements: InsertionMap<Tag, Element>,
}

impl ElementEntity {
    pub fn new(dimension: u8, tag: i32, element_type: u32, declared_elements: usize) -> Self {
        Self {
            dimension,
            tag,
            element_type,
            declared_elements,
            elements: InsertionMap::new(),
        }
    }

    pub fn dimension(&self) -> u8 {
        self.dimension
    }

    pub fn tag(&self) -> i32 {
        self.tag
    }

    /// Gmsh element-type code (2 = triangle, 3 = quadrangle, ...).
    pub fn element_type(&self) -> u32 {
        self.element_type
    }

    pub fn key(&self) -> ElementEntityKey {
        (self.dimension, self.tag, self.element_type)
    }

    /// Element count declared by the file (or counted, for synthesized entities).
    pub fn number_of_elements(&self) -> usize {
        self.declared_elements
    }

    pub fn elements(&self) -> std::slice::Iter<'_, Element> {
        self.elements.values()
    }

    pub fn element(&self, tag: Tag) -> Option<&Element> {
        self.elements.get(&tag)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.len() == 0
    }

    pub(crate) fn add_element(&mut self, element: Element) {
        self.elements.insert(element.tag, element);
    }

    pub(crate) fn set_number_of_elements(&mut self, count: usize) {
        self.declared_elements = count;
    }
}

impl fmt::Display for ElementEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "---- Element entity # {} ----", self.tag)?;
        writeln!(f, "Dimension: {}", self.dimension)?;
        writeln!(f, "Element type: {}", self.element_type)?;
        writeln!(f, "Number of elements: {}", self.declared_elements)
    }
}

/// Declared (or observed) count and tag range of nodes or elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagSummary {
    pub count: usize,
    pub min_tag: Tag,
    pub max_tag: Tag,
}

impl TagSummary {
    pub fn new(count: usize, min_tag: Tag, max_tag: Tag) -> Self {
        Self { count, min_tag, max_tag }
    }
}

/// Header fields of a `$MeshFormat` section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshFormat {
    pub version: MshVersion,
    /// The version exactly as the decimal in the file, e.g. `2.2`.
    pub version_number: f64,
    pub ascii: bool,
    /// Bytes per floating point value; `None` when the format has no header.
    pub precision: Option<usize>,
}

/// A parsed mesh: header metadata, summary counts and entity maps.
///
/// Created empty by the parser, filled in section by section, and handed to
/// the caller read-only once parsing finishes.
#[derive(Debug, Clone)]
pub struct Mesh {
    name: String,
    format: Option<MeshFormat>,
    nodes: TagSummary,
    elements: TagSummary,
    declared_node_entities: usize,
    declared_element_entities: usize,
    node_entities: InsertionMap<NodeEntityKey, NodeEntity>,
    element_entities: InsertionMap<ElementEntityKey, ElementEntity>,
}

impl Mesh {
    pub const DEFAULT_NAME: &'static str = "newmesh";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            format: None,
            nodes: TagSummary::default(),
            elements: TagSummary::default(),
            declared_node_entities: 0,
            declared_element_entities: 0,
            node_entities: InsertionMap::new(),
            element_entities: InsertionMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn format(&self) -> Option<&MeshFormat> {
        self.format.as_ref()
    }

    /// The resolved format version; `None` if no header was seen.
    pub fn version(&self) -> Option<MshVersion> {
        self.format.map(|f| f.version)
    }

    pub fn version_number(&self) -> Option<f64> {
        self.format.map(|f| f.version_number)
    }

    pub fn is_ascii(&self) -> bool {
        self.format.is_some_and(|f| f.ascii)
    }

    pub fn precision(&self) -> Option<usize> {
        self.format.and_then(|f| f.precision)
    }

    pub fn node_summary(&self) -> TagSummary {
        self.nodes
    }

    pub fn element_summary(&self) -> TagSummary {
        self.elements
    }

    pub fn number_of_nodes(&self) -> usize {
        self.nodes.count
    }

    pub fn min_node_tag(&self) -> Tag {
        self.nodes.min_tag
    }

    pub fn max_node_tag(&self) -> Tag {
        self.nodes.max_tag
    }

    pub fn number_of_elements(&self) -> usize {
        self.elements.count
    }

    pub fn min_element_tag(&self) -> Tag {
        self.elements.min_tag
    }

    pub fn max_element_tag(&self) -> Tag {
        self.elements.max_tag
    }

    /// Node entity count as declared by the `$Nodes` header.
    pub fn number_of_node_entities(&self) -> usize {
        self.declared_node_entities
    }

    /// Element entity count as declared by the `$Elements` header.
    pub fn number_of_element_entities(&self) -> usize {
        self.declared_element_entities
    }

    pub fn node_entities(&self) -> std::slice::Iter<'_, NodeEntity> {
        self.node_entities.values()
    }

    pub fn element_entities(&self) -> std::slice::Iter<'_, ElementEntity> {
        self.element_entities.values()
    }

    pub fn has_node_entity(&self, dimension: u8, tag: i32) -> bool {
        self.node_entities.contains_key(&(dimension, tag))
    }

    pub fn node_entity(&self, dimension: u8, tag: i32) -> Option<&NodeEntity> {
        self.node_entities.get(&(dimension, tag))
    }

    pub fn has_element_entity(&self, dimension: u8, tag: i32, element_type: u32) -> bool {
        self.element_entities.contains_key(&(dimension, tag, element_type))
    }

    pub fn element_entity(&self, dimension: u8, tag: i32, element_type: u32) -> Option<&ElementEntity> {
        self.element_entities.get(&(dimension, tag, element_type))
    }

    pub(crate) fn set_format(&mut self, format: MeshFormat) {
        self.format = Some(format);
    }

    pub(crate) fn set_node_summary(&mut self, summary: TagSummary, entities: usize) {
        self.nodes = summary;
        self.declared_node_entities = entities;
    }

    pub(crate) fn set_element_summary(&mut self, summary: TagSummary, entities: usize) {
        self.elements = summary;
        self.declared_element_entities = entities;
    }

    pub(crate) fn add_node_entity(&mut self, entity: NodeEntity) {
        self.node_entities.insert(entity.key(), entity);
    }

    pub(crate) fn add_element_entity(&mut self, entity: ElementEntity) {
        self.element_entities.insert(entity.key(), entity);
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NAME)
    }
}

impl fmt::Display for Mesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mesh name: {}", self.name)?;
        match self.format {
            Some(format) => {
                writeln!(f, "Mesh version: {}", format.version)?;
                writeln!(f, "ASCII: {}", format.ascii)?;
                if let Some(precision) = format.precision {
                    writeln!(f, "Precision: {}", precision)?;
                }
            }
            None => writeln!(f, "Mesh version: unknown")?,
        }
        writeln!(f, "Number of nodes: {}", self.nodes.count)?;
        writeln!(f, "Minimum node tag: {}", self.nodes.min_tag)?;
        writeln!(f, "Maximum node tag: {}", self.nodes.max_tag)?;
        writeln!(f, "Number of node entities: {}", self.declared_node_entities)?;
        writeln!(f, "Number of elements: {}", self.elements.count)?;
        writeln!(f, "Minimum element tag: {}", self.elements.min_tag)?;
        writeln!(f, "Maximum element tag: {}", self.elements.max_tag)?;
        writeln!(f, "Number of element entities: {}", self.declared_element_entities)
    }
}
