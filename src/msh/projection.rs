//! Read-only 2D projections of a mesh, in the shape plotting code wants.
//!
//! Each projection keeps only the nodes its cells reference and renumbers
//! them `0..n` in file order; cells are lists of those indices. Only the `x`
//! and `y` coordinates are kept.

use std::collections::{HashMap, HashSet};
use log::debug;

use super::iter::ElementRef;
use super::types::error::{MshError, Result};
use super::types::models::{Mesh, Tag};

/// Gmsh element-type code of a 3-node triangle.
pub const TRIANGLE: u32 = 2;
/// Gmsh element-type code of a 4-node quadrangle.
pub const QUADRANGLE: u32 = 3;

/// Nodes and cells of one element type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanarMesh {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub cells: Vec<Vec<usize>>,
}

/// Triangles and quadrangles sharing one node numbering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Elements2d {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub triangles: Vec<Vec<usize>>,
    pub quads: Vec<Vec<usize>>,
}

/// All 2D triangles of `mesh`.
///
/// # Errors
/// [`MshError::UnknownNode`] if a triangle references a node no entity defines.
pub fn triangles(mesh: &Mesh) -> Result<PlanarMesh> {
    single(mesh, TRIANGLE)
}

/// All 2D quadrangles of `mesh`.
///
/// # Errors
/// [`MshError::UnknownNode`] if a quadrangle references a node no entity defines.
pub fn quads(mesh: &Mesh) -> Result<PlanarMesh> {
    single(mesh, QUADRANGLE)
}

/// All 2D triangles and quadrangles of `mesh`, split by type.
pub fn elements_2d(mesh: &Mesh) -> Result<Elements2d> {
    let (x, y, mut cells) = project(mesh, &[TRIANGLE, QUADRANGLE])?;
    let quads = cells.pop().unwrap_or_default();
    let triangles = cells.pop().unwrap_or_default();
    Ok(Elements2d { x, y, triangles, quads })
}

fn single(mesh: &Mesh, element_type: u32) -> Result<PlanarMesh> {
    let (x, y, mut cells) = project(mesh, &[element_type])?;
    Ok(PlanarMesh {
        x,
        y,
        cells: cells.pop().unwrap_or_default(),
    })
}

type Projected = (Vec<f64>, Vec<f64>, Vec<Vec<Vec<usize>>>);

/// Projects the 2D elements of each type in `element_types`; the returned
/// cell groups follow the order of `element_types`.
fn project(mesh: &Mesh, element_types: &[u32]) -> Result<Projected> {
    let selected: Vec<Vec<ElementRef<'_>>> = element_types
        .iter()
        .map(|&element_type| {
            mesh.elements()
                .filter(|e| e.dimension() == 2 && e.element_type() == element_type)
                .collect()
        })
        .collect();

    let referenced: HashSet<Tag> = selected
        .iter()
        .flatten()
        .flat_map(|e| e.connectivity().iter().copied())
        .collect();

    let mut index: HashMap<Tag, usize> = HashMap::with_capacity(referenced.len());
    let mut x = Vec::with_capacity(referenced.len());
    let mut y = Vec::with_capacity(referenced.len());
    for node in mesh.nodes() {
        if referenced.contains(&node.tag) && !index.contains_key(&node.tag) {
            index.insert(node.tag, x.len());
            x.push(node.coordinates[0]);
            y.push(node.coordinates[1]);
        }
    }

    let cells = selected
        .iter()
        .map(|group| {
            group
                .iter()
                .map(|element| {
                    element
                        .connectivity()
                        .iter()
                        .map(|node| {
                            index.get(node).copied().ok_or(MshError::UnknownNode {
                                element: element.tag(),
                                node: *node,
                            })
                        })
                        .collect::<Result<Vec<usize>>>()
                })
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    debug!("Projected {} nodes for element types {:?}", x.len(), element_types);
    Ok((x, y, cells))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn mesh(text: &str) -> Mesh {
        crate::parse_stream(Cursor::new(text.to_string())).unwrap()
    }

    const MIXED: &str = "$MeshFormat
2.2 0 8
$EndMeshFormat
$Nodes
5
10 0 0 0
20 1 0 0
30 1 1 0
40 0 1 0
50 2 0.5 0
$EndNodes
$Elements
3
1 3 2 0 1 10 20 30 40
2 2 2 0 1 20 50 30
3 1 2 0 2 10 20
$EndElements
";

    #[test]
    fn mixed_mesh_is_split_by_type() {
        let data = elements_2d(&mesh(MIXED)).unwrap();
        assert_eq!(data.x, vec![0.0, 1.0, 1.0, 0.0, 2.0]);
        assert_eq!(data.y, vec![0.0, 0.0, 1.0, 1.0, 0.5]);
        assert_eq!(data.quads, vec![vec![0, 1, 2, 3]]);
        assert_eq!(data.triangles, vec![vec![1, 4, 2]]);
    }

    #[test]
    fn unreferenced_nodes_are_dropped() {
        let tri = triangles(&mesh(MIXED)).unwrap();
        assert_eq!(tri.x, vec![1.0, 1.0, 2.0]);
        assert_eq!(tri.cells, vec![vec![0, 2, 1]]);
    }

    #[test]
    fn dangling_node_reference_fails() {
        let text = MIXED.replace("2 2 2 0 1 20 50 30", "2 2 2 0 1 20 60 30");
        assert!(matches!(
            triangles(&mesh(&text)),
            Err(MshError::UnknownNode { element: 2, node: 60 })
        ));
    }

    #[test]
    fn empty_mesh_projects_to_nothing() {
        assert_eq!(quads(&Mesh::default()).unwrap(), PlanarMesh::default());
    }
}
