//! Shared helpers for the legacy (1.x and 2.x) section parsers.
//!
//! Neither legacy generation groups records by entity, so both read flat
//! node and element lists and synthesize entities from them. The helpers
//! here do that synthesis and track the tag ranges the files do not declare.

use std::io::BufRead;
use log::{debug, trace};

use crate::msh::types::error::Result;
use crate::msh::types::models::{
    Element, ElementEntity, ElementEntityKey, InsertionMap, Mesh, Node, NodeEntity, Tag, TagSummary,
};
use crate::msh::utils::LineReader;

/// Dimension of a Gmsh element type.
///
/// Unknown codes fall back to 3.
pub fn element_dimension(element_type: u32) -> u8 {
    match element_type {
        // point
        15 => 0,
        // lines
        1 | 8 | 26 | 27 | 28 => 1,
        // triangles and quadrangles
        2 | 3 | 9 | 10 | 16 | 20..=25 => 2,
        // tetrahedra, hexahedra, prisms, pyramids
        4..=7 | 11..=14 | 17..=19 | 29..=31 | 92 | 93 => 3,
        _ => 3,
    }
}

/// Running minimum and maximum of the tags seen in a section.
#[derive(Debug, Default, Clone, Copy)]
pub struct TagRange {
    bounds: Option<(Tag, Tag)>,
}

impl TagRange {
    pub fn observe(&mut self, tag: Tag) {
        self.bounds = Some(match self.bounds {
            Some((min, max)) => (min.min(tag), max.max(tag)),
            None => (tag, tag),
        });
    }

    /// Summary with the given count; both tags are 0 if nothing was observed.
    pub fn summary(&self, count: usize) -> TagSummary {
        let (min, max) = self.bounds.unwrap_or((0, 0));
        TagSummary::new(count, min, max)
    }
}

/// Reads a flat node list into a single synthesized entity.
///
/// ```text
/// <node-count>
/// <tag> <x> <y> <z>      (node-count lines, any tag order)
/// ```
pub fn parse_flat_nodes<R: BufRead>(
    reader: &mut LineReader<R>,
    mesh: &mut Mesh,
    section: &'static str,
    entity_dimension: u8,
    entity_tag: i32,
) -> Result<()> {
    let count: usize = reader.read_single(section, "node count")?;
    debug!("{}: {} nodes", section, count);

    let mut entity = NodeEntity::new(entity_dimension, entity_tag, 0, count);
    let mut range = TagRange::default();

    for _ in 0..count {
        let mut fields = reader.fields(section, "node record")?;
        let tag: Tag = fields.next("node tag")?;
        let x: f64 = fields.next("x coordinate")?;
        let y: f64 = fields.next("y coordinate")?;
        let z: f64 = fields.next("z coordinate")?;
        fields.finish()?;

        trace!("node {} at ({}, {}, {})", tag, x, y, z);
        range.observe(tag);
        entity.add_node(Node::new(tag, [x, y, z]));
    }

    mesh.set_node_summary(range.summary(count), 1);
    mesh.add_node_entity(entity);
    Ok(())
}

/// Groups flat element records into entities keyed by
/// `(dimension, entity tag, element type)`.
///
/// Entities are created on first encounter and keep first-encounter order.
#[derive(Debug, Default)]
pub struct ElementGroups {
    groups: InsertionMap<ElementEntityKey, ElementEntity>,
    range: TagRange,
}

impl ElementGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entity_tag: i32, element_type: u32, element: Element) {
        let dimension = element_dimension(element_type);
        let key = (dimension, entity_tag, element_type);
        self.range.observe(element.tag);

        let entity = self.groups.get_or_insert_with(key, || {
            trace!("new element entity {:?}", key);
            ElementEntity::new(dimension, entity_tag, element_type, 0)
        });
        entity.set_number_of_elements(entity.number_of_elements() + 1);
        entity.add_element(element);
    }

    /// Moves the synthesized entities and their summary into `mesh`.
    pub fn commit(self, mesh: &mut Mesh, declared: usize) {
        debug!("{} elements grouped into {} entities", declared, self.groups.len());
        mesh.set_element_summary(self.range.summary(declared), self.groups.len());
        for entity in self.groups.into_values() {
            mesh.add_element_entity(entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn dimension_table() {
        assert_eq!(element_dimension(15), 0);
        assert_eq!(element_dimension(1), 1);
        assert_eq!(element_dimension(27), 1);
        assert_eq!(element_dimension(2), 2);
        assert_eq!(element_dimension(3), 2);
        assert_eq!(element_dimension(22), 2);
        assert_eq!(element_dimension(4), 3);
        assert_eq!(element_dimension(5), 3);
        assert_eq!(element_dimension(93), 3);
        // unknown codes
        assert_eq!(element_dimension(0), 3);
        assert_eq!(element_dimension(140), 3);
    }

    #[test]
    fn tag_range_tracks_unordered_tags() {
        let mut range = TagRange::default();
        assert_eq!(range.summary(0), TagSummary::new(0, 0, 0));
        for tag in [7, 3, 12, 5] {
            range.observe(tag);
        }
        assert_eq!(range.summary(4), TagSummary::new(4, 3, 12));
    }

    #[test]
    fn groups_keep_first_encounter_order() {
        let mut groups = ElementGroups::new();
        groups.push(5, 3, Element::new(1, vec![1, 2, 3, 4]));
        groups.push(2, 1, Element::new(2, vec![1, 2]));
        groups.push(5, 3, Element::new(3, vec![2, 5, 6, 3]));

        let mut mesh = Mesh::default();
        groups.commit(&mut mesh, 3);

        let keys: Vec<_> = mesh.element_entities().map(|e| e.key()).collect();
        assert_eq!(keys, vec![(2, 5, 3), (1, 2, 1)]);
        let quads = mesh.element_entity(2, 5, 3).unwrap();
        assert_eq!(quads.number_of_elements(), 2);
        let tags: Vec<_> = quads.elements().map(|e| e.tag).collect();
        assert_eq!(tags, vec![1, 3]);
        assert_eq!(mesh.element_summary(), TagSummary::new(3, 1, 3));
        assert_eq!(mesh.number_of_element_entities(), 2);
    }

    #[test]
    fn flat_nodes_compute_observed_range() {
        let text = "3\n10 0 0 0\n2 1 0 0\n5 1 1 0\n";
        let mut reader = LineReader::new(Cursor::new(text));
        let mut mesh = Mesh::default();
        parse_flat_nodes(&mut reader, &mut mesh, "$Nodes", 3, 1).unwrap();
        assert_eq!(mesh.node_summary(), TagSummary::new(3, 2, 10));
        let entity = mesh.node_entity(3, 1).unwrap();
        let tags: Vec<_> = entity.nodes().map(|n| n.tag).collect();
        assert_eq!(tags, vec![10, 2, 5]);
    }
}
