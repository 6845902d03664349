//! Core MSH parsing module.
//!
//! # Layers
//!
//! - [`types`]: data model, errors and the format-version registry
//! - [`utils`]: line and field readers shared by every section parser
//! - [`format`]: the header and per-generation section parsers
//! - [`reader`]: the dispatcher driving a parse from start to finish
//! - [`iter`] and [`projection`]: read-only views of a parsed [`Mesh`]

pub mod format;
pub mod iter;
pub mod projection;
pub mod reader;
pub mod types;
pub mod utils;

pub use iter::{ElementIter, ElementRef, NodeIter};
pub use projection::{elements_2d, quads, triangles, Elements2d, PlanarMesh};
pub use reader::{parse, parse_stream, MeshParser, ParseOptions};
pub use types::error::{MshError, Result};
pub use types::models::{
    Element, ElementEntity, ElementEntityKey, Mesh, MeshFormat, Node, NodeEntity, NodeEntityKey, Tag,
    TagSummary,
};
pub use types::version::{MshVersion, SectionFamily};
