//! Parser for MSH format generation 2.x.
//!
//! # Section Structure
//! ```text
//! $Nodes
//! <node-count>
//! <tag> <x> <y> <z>
//! $EndNodes
//! $Elements
//! <element-count>
//! <tag> <type> <ntags> <tag-1> ... <tag-ntags> <node-tag>...
//! $EndElements
//! ```
//!
//! The second tag of an element record is its elementary entity; records
//! with fewer than two tags belong to entity 1. All nodes land in one
//! synthesized volume entity `(3, 1)`.

use std::io::BufRead;
use log::{debug, trace};

use crate::msh::types::error::Result;
use crate::msh::types::models::{Element, Mesh, Tag};
use crate::msh::utils::LineReader;
use super::common::{self, ElementGroups};
use super::SectionGrammar;

const NODES: &str = "$Nodes";
const ELEMENTS: &str = "$Elements";

const NODE_ENTITY_DIMENSION: u8 = 3;
const NODE_ENTITY_TAG: i32 = 1;
const DEFAULT_ENTITY_TAG: i32 = 1;

/// Section grammar of MSH 2.0, 2.1 and 2.2.
#[derive(Debug)]
pub struct V2Sections;

impl SectionGrammar for V2Sections {
    const NAME: &'static str = "MSH 2.x";
    const NODES: &'static str = NODES;
    const END_NODES: &'static str = "$EndNodes";
    const ELEMENTS: &'static str = ELEMENTS;
    const END_ELEMENTS: &'static str = "$EndElements";

    fn parse_nodes<R: BufRead>(reader: &mut LineReader<R>, mesh: &mut Mesh) -> Result<()> {
        common::parse_flat_nodes(reader, mesh, NODES, NODE_ENTITY_DIMENSION, NODE_ENTITY_TAG)
    }

    fn parse_elements<R: BufRead>(reader: &mut LineReader<R>, mesh: &mut Mesh) -> Result<()> {
        parse_elements(reader, mesh)
    }
}

pub fn parse_elements<R: BufRead>(reader: &mut LineReader<R>, mesh: &mut Mesh) -> Result<()> {
    let count: usize = reader.read_single(ELEMENTS, "element count")?;
    debug!("{}: {} elements", ELEMENTS, count);

    let mut groups = ElementGroups::new();
    for _ in 0..count {
        let mut fields = reader.fields(ELEMENTS, "element record")?;
        let tag: Tag = fields.next("element tag")?;
        let element_type: u32 = fields.next("element type")?;
        let tag_count: usize = fields.next("tag count")?;
        let tags: Vec<i64> = fields.take(tag_count, "element tag value")?;
        let connectivity: Vec<Tag> = fields.rest("node tag")?;
        if connectivity.is_empty() {
            return Err(fields.malformed(format!("element {} has no node tags", tag)));
        }

        let entity_tag = match tags.get(1) {
            Some(&entity) => i32::try_from(entity)
                .map_err(|_| fields.malformed(format!("entity tag {} out of range", entity)))?,
            None => DEFAULT_ENTITY_TAG,
        };
        trace!("element {} type {} entity {}: {:?}", tag, element_type, entity_tag, connectivity);
        groups.push(entity_tag, element_type, Element::new(tag, connectivity));
    }

    groups.commit(mesh, count);
    Ok(())
}
