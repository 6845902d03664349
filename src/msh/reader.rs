//! The section-by-section scan that turns an MSH stream into a [`Mesh`].
//!
//! ```text
//!   AwaitingHeader --$MeshFormat--> header::parse --+
//!        |                                          |
//!        +------------$NOD--> header::legacy -------+--> VersionKnown(family)
//!                                                          |
//!          $Nodes/$Elements/$NOD/$ELM --> family parser <--+
//!          any other $Section         --> skipped to $EndSection
//!                                                          |
//!                                           end of input --> Done
//! ```
//!
//! The header picks one [`SectionFamily`] for the whole parse. Every error
//! is fatal: it is logged together with the active section marker and
//! returned unchanged.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;
use log::{debug, error, info, trace, warn};

use super::format::header;
use super::format::sections::Section;
use super::types::error::{MshError, Result};
use super::types::models::Mesh;
use super::types::version::SectionFamily;
use super::utils::LineReader;

/// Marker of the legacy 1.0 node section, which doubles as its header.
const LEGACY_NODES: &str = "$NOD";

/// Options controlling a parse.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Display name of the mesh. [`MeshParser::parse`] falls back to the path,
    /// [`MeshParser::parse_stream`] to [`Mesh::DEFAULT_NAME`].
    pub name: Option<String>,
    /// Require each parsed section to be closed by its end marker
    /// (`$EndNodes`, `$ENDELM`, ...). When off, end markers are skipped
    /// like any other line.
    pub require_section_end: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            name: None,
            require_section_end: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingHeader,
    VersionKnown(SectionFamily),
    Done,
}

/// Parser for ASCII MSH files of generations 1.0, 2.x and 4.x.
///
/// A parser holds only its options; every call builds a fresh [`Mesh`], so
/// one parser can be reused for any number of inputs.
#[derive(Debug, Clone, Default)]
pub struct MeshParser {
    options: ParseOptions,
}

impl MeshParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Opens `path` and parses it.
    ///
    /// # Errors
    /// [`MshError::FileNotFound`] if `path` does not exist, otherwise any
    /// error of [`parse_stream`](Self::parse_stream).
    pub fn parse(&self, path: impl AsRef<Path>) -> Result<Mesh> {
        let path = path.as_ref();
        info!("Opening mesh file: {}", path.display());
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => MshError::FileNotFound(path.to_path_buf()),
            _ => MshError::Io(e),
        })?;
        let name = self
            .options
            .name
            .clone()
            .unwrap_or_else(|| path.display().to_string());
        self.read(BufReader::new(file), name)
    }

    /// Parses a complete MSH text stream.
    pub fn parse_stream<R: BufRead>(&self, input: R) -> Result<Mesh> {
        let name = self
            .options
            .name
            .clone()
            .unwrap_or_else(|| Mesh::DEFAULT_NAME.to_string());
        self.read(input, name)
    }

    fn read<R: BufRead>(&self, input: R, name: String) -> Result<Mesh> {
        info!("Parsing mesh '{}'", name);
        let mut mesh = Mesh::new(name);
        let mut reader = LineReader::new(input);
        let mut state = State::AwaitingHeader;

        while state != State::Done {
            let Some(line) = reader.next_line()? else {
                state = State::Done;
                continue;
            };
            if !line.starts_with('$') {
                continue;
            }
            let marker = line.to_string();

            state = match state {
                State::AwaitingHeader => self.await_header(&marker, &mut reader, &mut mesh)?,
                State::VersionKnown(family) => {
                    self.dispatch(family, &marker, &mut reader, &mut mesh)?;
                    state
                }
                State::Done => State::Done,
            };
        }

        if mesh.version().is_none() {
            warn!("No {} or {} section found in '{}'", header::SECTION, LEGACY_NODES, mesh.name());
        }
        info!(
            "Finished parsing '{}': {} nodes in {} entities, {} elements in {} entities",
            mesh.name(),
            mesh.number_of_nodes(),
            mesh.number_of_node_entities(),
            mesh.number_of_elements(),
            mesh.number_of_element_entities()
        );
        Ok(mesh)
    }

    /// Handles a marker seen before the format is known.
    fn await_header<R: BufRead>(
        &self,
        marker: &str,
        reader: &mut LineReader<R>,
        mesh: &mut Mesh,
    ) -> Result<State> {
        match marker {
            header::SECTION => {
                let version = annotate(header::SECTION, header::parse(reader, mesh))?;
                self.expect_end(reader, header::SECTION, header::END)?;
                let family = version.family();
                info!("Detected MSH {} ({} sections)", version, family.name());
                Ok(State::VersionKnown(family))
            }
            LEGACY_NODES => {
                let family = header::legacy(mesh).family();
                if let Some(section) = family.section(marker) {
                    self.run_section(family, section, reader, mesh)?;
                }
                Ok(State::VersionKnown(family))
            }
            _ => {
                trace!("Skipping {} before the format header", marker);
                Ok(State::AwaitingHeader)
            }
        }
    }

    /// Handles a marker once the section family is known.
    fn dispatch<R: BufRead>(
        &self,
        family: SectionFamily,
        marker: &str,
        reader: &mut LineReader<R>,
        mesh: &mut Mesh,
    ) -> Result<()> {
        if let Some(section) = family.section(marker) {
            return self.run_section(family, section, reader, mesh);
        }
        if is_end_marker(marker) {
            trace!("Ignoring stray {}", marker);
            return Ok(());
        }
        if marker == header::SECTION {
            warn!("Repeated {} section ignored", header::SECTION);
        }
        skip_section(marker, reader)
    }

    fn run_section<R: BufRead>(
        &self,
        family: SectionFamily,
        section: Section,
        reader: &mut LineReader<R>,
        mesh: &mut Mesh,
    ) -> Result<()> {
        debug!("Parsing {} at line {}", section.marker, reader.line_number());
        annotate(section.marker, family.parse(section.kind, reader, mesh))?;
        self.expect_end(reader, section.marker, section.end)
    }

    fn expect_end<R: BufRead>(
        &self,
        reader: &mut LineReader<R>,
        section: &'static str,
        end: &'static str,
    ) -> Result<()> {
        if !self.options.require_section_end {
            return Ok(());
        }
        annotate(section, check_end(reader, section, end))
    }
}

fn check_end<R: BufRead>(reader: &mut LineReader<R>, section: &'static str, end: &'static str) -> Result<()> {
    let found = reader.expect_line(section, end)?;
    if found == end {
        return Ok(());
    }
    let reason = format!("expected {} but found '{}'", end, found);
    Err(MshError::MalformedSection {
        section,
        line: reader.line_number(),
        reason,
    })
}

/// Logs a failed section with its marker and passes the error through.
fn annotate<T>(marker: &str, result: Result<T>) -> Result<T> {
    result.inspect_err(|e| error!("Unable to parse section {}: {}", marker, e))
}

fn is_end_marker(marker: &str) -> bool {
    marker
        .get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("$End"))
}

/// Skips an unrecognized section up to its `$End<Name>` line.
///
/// The end marker is matched case-insensitively so that both `$EndFoo` and
/// `$ENDFOO` close `$Foo`. Running out of input here is not an error.
fn skip_section<R: BufRead>(marker: &str, reader: &mut LineReader<R>) -> Result<()> {
    let end = format!("$End{}", &marker[1..]);
    let start = reader.line_number();
    debug!("Skipping {} at line {}", marker, start);
    while let Some(line) = reader.next_line()? {
        if line.eq_ignore_ascii_case(&end) {
            trace!("Skipped {} lines of {}", reader.line_number() - start, marker);
            return Ok(());
        }
    }
    warn!("Input ended inside {} (opened at line {})", marker, start);
    Ok(())
}

/// Parses the mesh file at `path` with default options.
///
/// The mesh is named after the path.
pub fn parse(path: impl AsRef<Path>) -> Result<Mesh> {
    MeshParser::new().parse(path)
}

/// Parses an MSH text stream with default options.
pub fn parse_stream(input: impl BufRead) -> Result<Mesh> {
    MeshParser::new().parse_stream(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msh::types::version::MshVersion;
    use std::io::Cursor;

    fn parse_str(text: &str) -> Result<Mesh> {
        parse_stream(Cursor::new(text.to_string()))
    }

    const V22: &str = "$MeshFormat
2.2 0 8
$EndMeshFormat
$PhysicalNames
1
2 1 \"surface\"
$EndPhysicalNames
$Nodes
4
1 0 0 0
2 1 0 0
3 1 1 0
4 0 1 0
$EndNodes
$Elements
2
1 2 2 1 1 1 2 3
2 2 2 1 1 1 3 4
$EndElements
";

    #[test]
    fn parses_v22_with_opaque_sections() {
        let mesh = parse_str(V22).unwrap();
        assert_eq!(mesh.version(), Some(MshVersion::V2_2));
        assert_eq!(mesh.name(), Mesh::DEFAULT_NAME);
        assert_eq!(mesh.number_of_nodes(), 4);
        assert_eq!(mesh.number_of_elements(), 2);
        let triangles = mesh.element_entity(2, 1, 2).unwrap();
        assert_eq!(triangles.number_of_elements(), 2);
    }

    #[test]
    fn legacy_nod_starts_a_v1_parse() {
        let text = "$NOD\n2\n1 0 0 0\n2 1 0 0\n$ENDNOD\n$ELM\n1\n1 1 0 3 2 1 2\n$ENDELM\n";
        let mesh = parse_str(text).unwrap();
        assert_eq!(mesh.version(), Some(MshVersion::V1_0));
        assert!(mesh.has_node_entity(2, 1));
        assert!(mesh.has_element_entity(1, 3, 1));
    }

    #[test]
    fn lines_before_the_header_are_ignored() {
        let text = format!("$Comments\n$Nodes\n$EndComments\n{}", V22);
        let mesh = parse_str(&text).unwrap();
        assert_eq!(mesh.number_of_nodes(), 4);
    }

    #[test]
    fn missing_end_marker_is_malformed() {
        let text = V22.replace("$EndNodes\n", "");
        assert!(matches!(
            parse_str(&text),
            Err(MshError::MalformedSection { section: "$Nodes", line: 14, .. })
        ));

        let lenient = MeshParser::with_options(ParseOptions {
            require_section_end: false,
            ..ParseOptions::default()
        });
        let mesh = lenient.parse_stream(Cursor::new(text)).unwrap();
        assert_eq!(mesh.number_of_elements(), 2);
    }

    #[test]
    fn unterminated_opaque_section_ends_the_parse() {
        let text = format!("{}$NodeData\n1\n\"t\"\n", V22);
        let mesh = parse_str(&text).unwrap();
        assert_eq!(mesh.number_of_nodes(), 4);
    }

    #[test]
    fn section_errors_abort() {
        let text = V22.replace("2 1 0 0\n", "2 1 0\n");
        assert!(matches!(
            parse_str(&text),
            Err(MshError::MalformedSection { section: "$Nodes", line: 11, .. })
        ));
        let text = V22.replace("$EndElements\n", "");
        let truncated = text.replace("2 2 2 1 1 1 3 4\n", "");
        assert!(matches!(
            parse_str(&truncated),
            Err(MshError::UnexpectedEndOfInput { section: "$Elements", .. })
        ));
    }

    #[test]
    fn header_errors_abort() {
        assert!(matches!(
            parse_str("$MeshFormat\n2.2 1 8\n$EndMeshFormat\n"),
            Err(MshError::UnsupportedEncoding(1))
        ));
        assert!(matches!(
            parse_str("$MeshFormat\n99.9 0 8\n$EndMeshFormat\n"),
            Err(MshError::UnrecognizedVersion { major: 99, minor: 9 })
        ));
    }

    #[test]
    fn version_4_0_uses_the_entity_block_grammar() {
        let text = "$MeshFormat\n4.0 0 8\n$EndMeshFormat\n$Nodes\n1 2 3 4\n1 5 0 2\n3\n4\n0 0 0\n1 0 0\n$EndNodes\n$Elements\n1 1 9 9\n1 5 1 1\n9 3 4\n$EndElements\n";
        let mesh = parse_str(text).unwrap();
        assert_eq!(mesh.version(), Some(MshVersion::V4_0));
        assert_eq!(mesh.node_summary().count, 2);
        assert_eq!(
            mesh.node_entity(1, 5).unwrap().node(4).unwrap().coordinates,
            [1.0, 0.0, 0.0]
        );
        assert_eq!(
            mesh.element_entity(1, 5, 1).unwrap().element(9).unwrap().connectivity,
            vec![3, 4]
        );
    }

    #[test]
    fn repeated_header_is_skipped() {
        let text = V22.replacen(
            "$Nodes\n",
            "$MeshFormat\n4.1 0 8\n$EndMeshFormat\n$Nodes\n",
            1,
        );
        let mesh = parse_str(&text).unwrap();
        assert_eq!(mesh.version(), Some(MshVersion::V2_2));
        assert_eq!(mesh.number_of_nodes(), 4);
        assert_eq!(mesh.number_of_elements(), 2);
        assert!(mesh.has_element_entity(2, 1, 2));
    }

    #[test]
    fn empty_input_gives_an_empty_mesh() {
        let mesh = parse_str("").unwrap();
        assert!(mesh.version().is_none());
        assert_eq!(mesh.number_of_nodes(), 0);
        assert_eq!(mesh.node_entities().count(), 0);
    }

    #[test]
    fn custom_name_is_used() {
        let parser = MeshParser::with_options(ParseOptions {
            name: Some("plate".to_string()),
            ..ParseOptions::default()
        });
        assert_eq!(parser.parse_stream(Cursor::new(V22)).unwrap().name(), "plate");
    }
}
