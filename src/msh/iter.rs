//! Flattening iterators over a parsed [`Mesh`].
//!
//! Entities keep their members in file order, and both iterators walk the
//! entities in file order too:
//!
//! 1. [`NodeIter`] - every [`Node`] of every node entity
//! 2. [`ElementIter`] - every [`Element`], paired with its owning entity as
//!    an [`ElementRef`] so the element type and dimension stay reachable
//!
//! # Example
//! ```no_run
//! # let mesh = msh_reader::parse("plate.msh").unwrap();
//! for element in mesh.elements() {
//!     println!("{} (type {}): {:?}", element.tag(), element.element_type(), element.connectivity());
//! }
//! ```

use std::slice;

use super::types::models::{Element, ElementEntity, Mesh, Node, NodeEntity, Tag};

impl Mesh {
    /// Iterates over all nodes, entity by entity.
    pub fn nodes(&self) -> NodeIter<'_> {
        NodeIter::new(self)
    }

    /// Iterates over all elements, entity by entity.
    pub fn elements(&self) -> ElementIter<'_> {
        ElementIter::new(self)
    }
}

/// Iterator over every node of a mesh.
///
/// Created by [`Mesh::nodes`].
#[derive(Debug, Clone)]
pub struct NodeIter<'a> {
    entities: slice::Iter<'a, NodeEntity>,
    current: slice::Iter<'a, Node>,
}

impl<'a> NodeIter<'a> {
    fn new(mesh: &'a Mesh) -> Self {
        Self {
            entities: mesh.node_entities(),
            current: slice::Iter::default(),
        }
    }
}

impl<'a> Iterator for NodeIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(node) = self.current.next() {
                return Some(node);
            }
            self.current = self.entities.next()?.nodes();
        }
    }
}

/// An element together with the entity that owns it.
#[derive(Debug, Clone, Copy)]
pub struct ElementRef<'a> {
    pub entity: &'a ElementEntity,
    pub element: &'a Element,
}

impl<'a> ElementRef<'a> {
    pub fn tag(&self) -> Tag {
        self.element.tag
    }

    pub fn connectivity(&self) -> &'a [Tag] {
        &self.element.connectivity
    }

    pub fn element_type(&self) -> u32 {
        self.entity.element_type()
    }

    pub fn dimension(&self) -> u8 {
        self.entity.dimension()
    }

    pub fn entity_tag(&self) -> i32 {
        self.entity.tag()
    }
}

/// Iterator over every element of a mesh.
///
/// Created by [`Mesh::elements`].
#[derive(Debug, Clone)]
pub struct ElementIter<'a> {
    entities: slice::Iter<'a, ElementEntity>,
    current: Option<(&'a ElementEntity, slice::Iter<'a, Element>)>,
}

impl<'a> ElementIter<'a> {
    fn new(mesh: &'a Mesh) -> Self {
        Self {
            entities: mesh.element_entities(),
            current: None,
        }
    }
}

impl<'a> Iterator for ElementIter<'a> {
    type Item = ElementRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((entity, elements)) = self.current.as_mut()
                && let Some(element) = elements.next()
            {
                return Some(ElementRef { entity: *entity, element });
            }
            let entity = self.entities.next()?;
            self.current = Some((entity, entity.elements()));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    const TEXT: &str = "$MeshFormat
4.1 0 8
$EndMeshFormat
$Nodes
2 3 1 3
0 1 0 1
1
0 0 0
1 2 0 2
3
2
1 0 0
0.5 0 0
$EndNodes
$Elements
2 3 1 3
1 2 1 2
1 1 3
2 3 2
0 1 15 1
3 1
$EndElements
";

    #[test]
    fn nodes_follow_file_order() {
        let mesh = crate::parse_stream(Cursor::new(TEXT)).unwrap();
        let tags: Vec<_> = mesh.nodes().map(|n| n.tag).collect();
        assert_eq!(tags, vec![1, 3, 2]);
        assert_eq!(mesh.nodes().count(), mesh.number_of_nodes());
    }

    #[test]
    fn elements_carry_their_entity() {
        let mesh = crate::parse_stream(Cursor::new(TEXT)).unwrap();
        let items: Vec<_> = mesh
            .elements()
            .map(|e| (e.tag(), e.element_type(), e.dimension(), e.entity_tag()))
            .collect();
        assert_eq!(items, vec![(1, 1, 1, 2), (2, 1, 1, 2), (3, 15, 0, 1)]);
        let last = mesh.elements().last().unwrap();
        assert_eq!(last.connectivity(), &[1]);
    }

    #[test]
    fn empty_mesh_yields_nothing() {
        let mesh = crate::msh::Mesh::default();
        assert_eq!(mesh.nodes().count(), 0);
        assert_eq!(mesh.elements().count(), 0);
    }
}
