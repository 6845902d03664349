//! `$MeshFormat` header parsing.
//!
//! # Header Structure
//! ```text
//! $MeshFormat
//! <version> <file-type> <data-size>      e.g. "4.1 0 8"
//! $EndMeshFormat
//! ```
//!
//! Only generations 2.x and 4.x carry this section; 1.0 files start
//! directly with `$NOD`.

use std::io::BufRead;
use log::{debug, info};

use crate::msh::types::error::{MshError, Result};
use crate::msh::types::models::{Mesh, MeshFormat};
use crate::msh::types::version::{self, MshVersion};
use crate::msh::utils::LineReader;

pub const SECTION: &str = "$MeshFormat";
pub const END: &str = "$EndMeshFormat";

/// `file-type` value for ASCII files.
const FILE_TYPE_ASCII: i64 = 0;

/// Parses the header line, records it on `mesh` and returns the resolved version.
///
/// Fails with [`MshError::MalformedVersion`], [`MshError::UnrecognizedVersion`]
/// or [`MshError::UnsupportedVersion`] from the registry, and with
/// [`MshError::UnsupportedEncoding`] for binary files.
pub fn parse<R: BufRead>(reader: &mut LineReader<R>, mesh: &mut Mesh) -> Result<MshVersion> {
    let mut fields = reader.fields(SECTION, "version, file type and data size")?;
    let version_text: String = fields.next("version")?;
    let file_type: i64 = fields.next("file type")?;
    let data_size: usize = fields.next("data size")?;
    fields.finish()?;

    let version = version::validate(&version_text)?;
    debug!("Header version text '{}' resolved to {:?}", version_text, version);

    if file_type != FILE_TYPE_ASCII {
        return Err(MshError::UnsupportedEncoding(file_type));
    }

    let version_number = version_text
        .parse::<f64>()
        .unwrap_or_else(|_| version.number());

    mesh.set_format(MeshFormat {
        version,
        version_number,
        ascii: true,
        precision: Some(data_size),
    });

    info!(
        "Header parsed: version={}, ascii=true, data size={} bytes",
        version, data_size
    );
    Ok(version)
}

/// Records the implicit header of a legacy 1.0 file.
pub fn legacy(mesh: &mut Mesh) -> MshVersion {
    let version = MshVersion::V1_0;
    mesh.set_format(MeshFormat {
        version,
        version_number: version.number(),
        ascii: true,
        precision: None,
    });
    info!("No {} header, legacy $NOD section found: assuming version {}", SECTION, version);
    version
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse_str(text: &str) -> (Result<MshVersion>, Mesh) {
        let mut mesh = Mesh::default();
        let mut reader = LineReader::new(Cursor::new(text.to_string()));
        (parse(&mut reader, &mut mesh), mesh)
    }

    #[test]
    fn parses_ascii_header() {
        let (version, mesh) = parse_str("4.1 0 8\n");
        assert_eq!(version.unwrap(), MshVersion::V4_1);
        assert_eq!(mesh.version(), Some(MshVersion::V4_1));
        assert_eq!(mesh.version_number(), Some(4.1));
        assert!(mesh.is_ascii());
        assert_eq!(mesh.precision(), Some(8));
    }

    #[test]
    fn binary_files_fail_fast() {
        let (version, mesh) = parse_str("2.2 1 8\n");
        assert!(matches!(version, Err(MshError::UnsupportedEncoding(1))));
        assert!(mesh.version().is_none());
    }

    #[test]
    fn version_errors_propagate() {
        assert!(matches!(parse_str("abc 0 8\n").0, Err(MshError::MalformedVersion(_))));
        assert!(matches!(
            parse_str("3.0 0 8\n").0,
            Err(MshError::UnrecognizedVersion { major: 3, minor: 0 })
        ));
        assert!(matches!(parse_str("4.1 0\n").0, Err(MshError::MalformedSection { .. })));
    }

    #[test]
    fn legacy_header_has_no_precision() {
        let mut mesh = Mesh::default();
        assert_eq!(legacy(&mut mesh), MshVersion::V1_0);
        assert_eq!(mesh.version_number(), Some(1.0));
        assert_eq!(mesh.precision(), None);
    }
}
