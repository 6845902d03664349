//! Parser for MSH format generation 4.x.
//!
//! 4.x files group nodes and elements in entity blocks, so entities are
//! taken from the file as-is rather than synthesized.

use std::io::BufRead;
use log::{debug, info, trace};

use crate::msh::types::error::Result;
use crate::msh::types::models::{Element, ElementEntity, Mesh, Node, NodeEntity, Tag, TagSummary};
use crate::msh::utils::{Fields, LineReader};
use super::SectionGrammar;

const NODES: &str = "$Nodes";
const ELEMENTS: &str = "$Elements";

/// Section grammar of MSH 4.0 and 4.1.
#[derive(Debug)]
pub struct V4Sections;

impl SectionGrammar for V4Sections {
    const NAME: &'static str = "MSH 4.x";
    const NODES: &'static str = NODES;
    const END_NODES: &'static str = "$EndNodes";
    const ELEMENTS: &'static str = ELEMENTS;
    const END_ELEMENTS: &'static str = "$EndElements";

    fn parse_nodes<R: BufRead>(reader: &mut LineReader<R>, mesh: &mut Mesh) -> Result<()> {
        parse_nodes(reader, mesh)
    }

    fn parse_elements<R: BufRead>(reader: &mut LineReader<R>, mesh: &mut Mesh) -> Result<()> {
        parse_elements(reader, mesh)
    }
}

/// `<entity-count> <total-count> <min-tag> <max-tag>`, shared by both sections.
fn read_section_header<R: BufRead>(
    reader: &mut LineReader<R>,
    section: &'static str,
) -> Result<(usize, TagSummary)> {
    let mut fields = reader.fields(section, "section header")?;
    let entities: usize = fields.next("entity block count")?;
    let count: usize = fields.next("total count")?;
    let min_tag: Tag = fields.next("minimum tag")?;
    let max_tag: Tag = fields.next("maximum tag")?;
    fields.finish()?;
    Ok((entities, TagSummary::new(count, min_tag, max_tag)))
}

fn read_dimension(fields: &mut Fields<'_>) -> Result<u8> {
    let dimension: u8 = fields.next("entity dimension")?;
    if dimension > 3 {
        return Err(fields.malformed(format!("entity dimension {} is not in 0..=3", dimension)));
    }
    Ok(dimension)
}

/// Parses a 4.x `$Nodes` section.
///
/// # Section Structure
/// ```text
/// <entity-count> <node-count> <min-tag> <max-tag>
/// <dim> <entity-tag> <parametric> <n>      (per entity block)
/// <tag>                                    (n lines)
/// <x> <y> <z> [<u> [<v> [<w>]]]            (n lines, same order as the tags)
/// ```
pub fn parse_nodes<R: BufRead>(reader: &mut LineReader<R>, mesh: &mut Mesh) -> Result<()> {
    let (entity_count, summary) = read_section_header(reader, NODES)?;
    info!(
        "Parsing {} entity blocks with {} nodes (tags {}..={})",
        entity_count, summary.count, summary.min_tag, summary.max_tag
    );
    mesh.set_node_summary(summary, entity_count);

    for block in 0..entity_count {
        let mut fields = reader.fields(NODES, "node entity block header")?;
        let dimension = read_dimension(&mut fields)?;
        let entity_tag: i32 = fields.next("entity tag")?;
        let parametric: usize = fields.next("parametric coordinate count")?;
        let count: usize = fields.next("block node count")?;
        fields.finish()?;
        debug!(
            "Node block {}: entity ({}, {}), {} nodes, {} parametric",
            block, dimension, entity_tag, count, parametric
        );

        // All tags of the block come before any of its coordinates. The
        // buffer grows with the lines read, not with the declared count.
        let mut tags = Vec::new();
        for _ in 0..count {
            tags.push(reader.read_single::<Tag>(NODES, "node tag")?);
        }

        let mut entity = NodeEntity::new(dimension, entity_tag, parametric, count);
        for tag in tags {
            let mut fields = reader.fields(NODES, "node coordinates")?;
            let x: f64 = fields.next("x coordinate")?;
            let y: f64 = fields.next("y coordinate")?;
            let z: f64 = fields.next("z coordinate")?;
            if parametric == 0 {
                fields.finish()?;
            } else {
                fields.rest::<f64>("parametric coordinate")?;
            }
            trace!("node {} at ({}, {}, {})", tag, x, y, z);
            entity.add_node(Node::new(tag, [x, y, z]));
        }
        mesh.add_node_entity(entity);
    }
    Ok(())
}

/// Parses a 4.x `$Elements` section.
///
/// # Section Structure
/// ```text
/// <entity-count> <element-count> <min-tag> <max-tag>
/// <dim> <entity-tag> <element-type> <n>    (per entity block)
/// <tag> <node-tag>...                      (n lines)
/// ```
pub fn parse_elements<R: BufRead>(reader: &mut LineReader<R>, mesh: &mut Mesh) -> Result<()> {
    let (entity_count, summary) = read_section_header(reader, ELEMENTS)?;
    info!(
        "Parsing {} entity blocks with {} elements (tags {}..={})",
        entity_count, summary.count, summary.min_tag, summary.max_tag
    );
    mesh.set_element_summary(summary, entity_count);

    for block in 0..entity_count {
        let mut fields = reader.fields(ELEMENTS, "element entity block header")?;
        let dimension = read_dimension(&mut fields)?;
        let entity_tag: i32 = fields.next("entity tag")?;
        let element_type: u32 = fields.next("element type")?;
        let count: usize = fields.next("block element count")?;
        fields.finish()?;
        debug!(
            "Element block {}: entity ({}, {}), type {}, {} elements",
            block, dimension, entity_tag, element_type, count
        );

        let mut entity = ElementEntity::new(dimension, entity_tag, element_type, count);
        for _ in 0..count {
            let mut fields = reader.fields(ELEMENTS, "element record")?;
            let tag: Tag = fields.next("element tag")?;
            let connectivity: Vec<Tag> = fields.rest("node tag")?;
            if connectivity.is_empty() {
                return Err(fields.malformed(format!("element {} has no node tags", tag)));
            }
            trace!("element {}: {:?}", tag, connectivity);
            entity.add_element(Element::new(tag, connectivity));
        }
        mesh.add_element_entity(entity);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msh::types::error::MshError;
    use std::io::Cursor;

    const NODES_BODY: &str = "1 6 1 6
2 1 0 6
1
2
3
4
5
6
0. 0. 0.
1. 0. 0.
1. 1. 0.
0. 1. 0.
2. 0. 0.
2. 1. 0.
";

    fn run(
        parse: fn(&mut LineReader<Cursor<&'static str>>, &mut Mesh) -> Result<()>,
        text: &'static str,
    ) -> (Result<()>, Mesh) {
        let mut mesh = Mesh::default();
        let mut reader = LineReader::new(Cursor::new(text));
        (parse(&mut reader, &mut mesh), mesh)
    }

    #[test]
    fn nodes_are_assigned_positionally() {
        let (result, mesh) = run(parse_nodes, NODES_BODY);
        result.unwrap();

        assert_eq!(mesh.number_of_nodes(), 6);
        assert_eq!(mesh.min_node_tag(), 1);
        assert_eq!(mesh.max_node_tag(), 6);
        assert_eq!(mesh.number_of_node_entities(), 1);
        assert!(mesh.has_node_entity(2, 1));

        let entity = mesh.node_entity(2, 1).unwrap();
        assert_eq!(entity.number_of_parametric_coordinates(), 0);
        assert_eq!(entity.number_of_nodes(), 6);
        assert_eq!(entity.node(1).unwrap().coordinates, [0.0, 0.0, 0.0]);
        assert_eq!(entity.node(3).unwrap().coordinates, [1.0, 1.0, 0.0]);
        assert_eq!(entity.node(6).unwrap().coordinates, [2.0, 1.0, 0.0]);
    }

    #[test]
    fn parametric_values_are_ignored() {
        let text = "1 2 7 8\n1 4 1 2\n8\n7\n0 0 0 0.5\n1 0 0 0.25\n";
        let (result, mesh) = run(parse_nodes, text);
        result.unwrap();
        let entity = mesh.node_entity(1, 4).unwrap();
        let tags: Vec<_> = entity.nodes().map(|n| n.tag).collect();
        assert_eq!(tags, vec![8, 7]);
        assert_eq!(entity.node(7).unwrap().coordinates, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn extra_coordinates_without_parametric_flag_fail() {
        let text = "1 1 1 1\n0 1 0 1\n1\n0 0 0 9\n";
        let (result, _) = run(parse_nodes, text);
        assert!(matches!(result, Err(MshError::MalformedSection { line: 4, .. })));
    }

    #[test]
    fn header_with_trailing_comment_fails() {
        let text = "1 6 1 6          1 entity bloc, 6 nodes total\n";
        let (result, _) = run(parse_nodes, text);
        assert!(matches!(
            result,
            Err(MshError::MalformedSection { section: "$Nodes", line: 1, .. })
        ));
    }

    #[test]
    fn truncated_block_reports_end_of_input() {
        let text = "1 6 1 6\n2 1 0 6\n1\n2\n";
        let (result, _) = run(parse_nodes, text);
        assert!(matches!(
            result,
            Err(MshError::UnexpectedEndOfInput { section: "$Nodes", .. })
        ));
    }

    #[test]
    fn oversized_block_count_runs_out_of_input() {
        let text = "1 1 1 1\n0 1 0 18446744073709551615\n1\n";
        let (result, _) = run(parse_nodes, text);
        assert!(matches!(
            result,
            Err(MshError::UnexpectedEndOfInput { section: "$Nodes", .. })
        ));
    }

    #[test]
    fn element_blocks_become_entities() {
        let text = "2 3 1 3\n2 1 3 2\n1 1 2 3 4\n2 2 5 6 3\n1 7 1 1\n3 1 2\n";
        let (result, mesh) = run(parse_elements, text);
        result.unwrap();

        assert_eq!(mesh.number_of_elements(), 3);
        assert_eq!(mesh.number_of_element_entities(), 2);
        let quads = mesh.element_entity(2, 1, 3).unwrap();
        assert_eq!(quads.number_of_elements(), 2);
        assert_eq!(quads.element(2).unwrap().connectivity, vec![2, 5, 6, 3]);
        let lines = mesh.element_entity(1, 7, 1).unwrap();
        assert_eq!(lines.element(3).unwrap().connectivity, vec![1, 2]);
    }

    #[test]
    fn element_without_nodes_fails() {
        let text = "1 1 1 1\n2 1 3 1\n1\n";
        let (result, _) = run(parse_elements, text);
        assert!(matches!(result, Err(MshError::MalformedSection { line: 3, .. })));
    }
}
