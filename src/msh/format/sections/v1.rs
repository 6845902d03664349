//! Parser for the legacy MSH 1.0 format.
//!
//! 1.0 files have no header; the first `$NOD` line identifies them.
//!
//! # Section Structure
//! ```text
//! $NOD
//! <node-count>
//! <tag> <x> <y> <z>
//! $ENDNOD
//! $ELM
//! <element-count>
//! <tag> <type> <reg-phys> <reg-elem> <node-count> <node-tag>...
//! $ENDELM
//! ```

use std::io::BufRead;
use log::{debug, trace};

use crate::msh::types::error::Result;
use crate::msh::types::models::{Element, Mesh, Tag};
use crate::msh::utils::LineReader;
use super::common::{self, ElementGroups};
use super::SectionGrammar;

const NODES: &str = "$NOD";
const ELEMENTS: &str = "$ELM";

const NODE_ENTITY_DIMENSION: u8 = 2;
const NODE_ENTITY_TAG: i32 = 1;

/// Section grammar of MSH 1.0.
#[derive(Debug)]
pub struct V1Sections;

impl SectionGrammar for V1Sections {
    const NAME: &'static str = "MSH 1.0";
    const NODES: &'static str = NODES;
    const END_NODES: &'static str = "$ENDNOD";
    const ELEMENTS: &'static str = ELEMENTS;
    const END_ELEMENTS: &'static str = "$ENDELM";

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
        // physical region, not kept
        let _physical: i64 = fields.next("physical region")?;
        let entity_tag: i32 = fields.next("elementary region")?;
        let node_count: usize = fields.next("node count")?;
        let connectivity: Vec<Tag> = fields.take(node_count, "node tag")?;
        fields.finish()?;

        trace!("element {} type {} region {}: {:?}", tag, element_type, entity_tag, connectivity);
        groups.push(entity_tag, element_type, Element::new(tag, connectivity));
    }

    groups.commit(mesh, count);
    Ok(())
}
