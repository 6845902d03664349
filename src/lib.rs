//! # msh-reader
//!
//! A reader for Gmsh mesh files (`.msh`) in the ASCII encoding.
//! Supports format generations 1.0, 2.x (2.0, 2.1, 2.2) and 4.x (4.0, 4.1).
//!
//! All generations are parsed into the same [`Mesh`] model: nodes and
//! elements grouped into entities, with header metadata and tag summaries.
//!
//! **Note:** Binary `.msh` files and data sections (`$NodeData`,
//! `$ElementData`, ...) are not decoded; the latter are skipped.
//!
//! ```no_run
//! let mesh = msh_reader::parse("plate.msh").unwrap();
//! println!("{} nodes, {} elements", mesh.number_of_nodes(), mesh.number_of_elements());
//! ```
pub mod msh;

// Re-export the main types for convenience
pub use msh::{
    parse,
    parse_stream,
    MeshParser,
    MshError,
    MshVersion,
    ParseOptions,
    Result,
    types::models::{
        Element,
        ElementEntity,
        Mesh,
        Node,
        NodeEntity,
        TagSummary,
    },
};
