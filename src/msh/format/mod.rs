//! File format parsing layer for MSH mesh files.
//!
//! This module sits between the raw line stream and the dispatcher in
//! [`reader`](crate::msh::reader).
//!
//! # Module Organization
//!
//! - [`header`]: Parses the `$MeshFormat` header that picks the generation
//! - [`sections`]: Node and element section parsers for each generation
//!
//! # Architecture
//!
//! ```text
//! File Structure (2.x / 4.x):       1.0:
//! ┌──────────────────┐              ┌──────────────────┐
//! │  $MeshFormat     │ ← header     │  $NOD            │ ← header::legacy
//! ├──────────────────┤              │  (nodes)         │   + v1 nodes
//! │  $Nodes          │ ← v2 / v4    ├──────────────────┤
//! ├──────────────────┤              │  $ELM            │ ← v1 elements
//! │  $Elements       │ ← v2 / v4    └──────────────────┘
//! ├──────────────────┤
//! │  $NodeData, ...  │ ← skipped
//! └──────────────────┘
//! ```

pub mod header;
pub mod sections;
