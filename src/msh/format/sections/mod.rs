//! # Section Parsing Dispatcher
//!
//! Each MSH generation names and lays out its `Nodes` and `Elements`
//! sections differently. A [`SectionGrammar`] bundles one generation's
//! markers with its two section parsers; [`SectionFamily`] picks the grammar
//! once the header has been read and routes every later section through it.
//!
//! | family | nodes              | elements               |
//! |--------|--------------------|------------------------|
//! | 1.x    | `$NOD`/`$ENDNOD`   | `$ELM`/`$ENDELM`       |
//! | 2.x    | `$Nodes`/`$EndNodes` | `$Elements`/`$EndElements` |
//! | 4.x    | `$Nodes`/`$EndNodes` | `$Elements`/`$EndElements` |

use std::io::BufRead;

use crate::msh::types::error::Result;
use crate::msh::types::models::Mesh;
use crate::msh::types::version::SectionFamily;
use crate::msh::utils::LineReader;

pub mod common;
pub mod v1;
pub mod v2;
pub mod v4;

pub use v1::V1Sections;
pub use v2::V2Sections;
pub use v4::V4Sections;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Nodes,
    Elements,
}

/// A section marker recognised by the active grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub marker: &'static str,
    pub end: &'static str,
}

/// Markers and section parsers of one MSH generation.
///
/// Parsers receive the reader positioned just after the start marker and
/// must leave it just before the end marker.
pub trait SectionGrammar {
    /// A short name used for logging.
    const NAME: &'static str;

    const NODES: &'static str;
    const END_NODES: &'static str;
    const ELEMENTS: &'static str;
    const END_ELEMENTS: &'static str;

    fn parse_nodes<R: BufRead>(reader: &mut LineReader<R>, mesh: &mut Mesh) -> Result<()>;

    fn parse_elements<R: BufRead>(reader: &mut LineReader<R>, mesh: &mut Mesh) -> Result<()>;

    fn section(line: &str) -> Option<Section> {
        if line == Self::NODES {
            Some(Section {
                kind: SectionKind::Nodes,
                marker: Self::NODES,
                end: Self::END_NODES,
            })
        } else if line == Self::ELEMENTS {
            Some(Section {
                kind: SectionKind::Elements,
                marker: Self::ELEMENTS,
                end: Self::END_ELEMENTS,
            })
        } else {
            None
        }
    }

    fn parse<R: BufRead>(kind: SectionKind, reader: &mut LineReader<R>, mesh: &mut Mesh) -> Result<()> {
        match kind {
            SectionKind::Nodes => Self::parse_nodes(reader, mesh),
            SectionKind::Elements => Self::parse_elements(reader, mesh),
        }
    }
}

impl SectionFamily {
    /// A short name used for logging.
    pub fn name(&self) -> &'static str {
        match self {
            SectionFamily::V1 => V1Sections::NAME,
            SectionFamily::V2 => V2Sections::NAME,
            SectionFamily::V4 => V4Sections::NAME,
        }
    }

    /// Looks up a marker line in this family's grammar.
    pub fn section(&self, line: &str) -> Option<Section> {
        match self {
            SectionFamily::V1 => V1Sections::section(line),
            SectionFamily::V2 => V2Sections::section(line),
            SectionFamily::V4 => V4Sections::section(line),
        }
    }

    /// Runs this family's parser for `kind` against `mesh`.
    pub fn parse<R: BufRead>(&self, kind: SectionKind, reader: &mut LineReader<R>, mesh: &mut Mesh) -> Result<()> {
        match self {
            SectionFamily::V1 => V1Sections::parse(kind, reader, mesh),
            SectionFamily::V2 => V2Sections::parse(kind, reader, mesh),
            SectionFamily::V4 => V4Sections::parse(kind, reader, mesh),
        }
    }
}
