//! Map parser
//!
//! Single pass over the source:
//!
//! ```text
//! header ──► record loop ──► end of stream
//!   │            │
//!   ▼            ▼
//! Format     per-line reject ──► DiagnosticSink
//! ```
//!
//! Only an unreadable source or a bad header fails the load. Every other
//! problem rejects one line and parsing continues with the next.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::config::MapConfig;
use crate::diagnostics::{Diagnostic, DiagnosticSink, LoadReport};
use crate::document::SceneDocument;
use crate::error::{MapError, MapResult, RecordError};
use crate::grammar::{self, Record, RecordKind, SEPARATOR};

/// First line of every map file
pub const MAP_HEADER: &str = "[RENGINE MAP FORMAT V1.0]";

/// Prefix of a full-line comment
pub const COMMENT_PREFIX: &str = "//";

/// Map file parser
#[derive(Debug, Clone, Default)]
pub struct SceneParser {
    config: MapConfig,
}

impl SceneParser {
    /// Create a parser with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with a custom configuration
    pub fn with_config(config: MapConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Load a map file into `doc`
    ///
    /// If the file cannot be opened the document is left untouched. Otherwise
    /// `doc.nodes` is cleared first and the remaining fields are overwritten by
    /// whatever records the file holds.
    pub fn load_file(
        &self,
        path: impl AsRef<Path>,
        doc: &mut SceneDocument,
        sink: &mut dyn DiagnosticSink,
    ) -> MapResult<LoadReport> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| MapError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;

        log::debug!("Loading map {}", path.display());
        self.parse_reader(BufReader::new(file), doc, sink)
    }

    /// Parse map text held in memory
    pub fn parse_str(
        &self,
        text: &str,
        doc: &mut SceneDocument,
        sink: &mut dyn DiagnosticSink,
    ) -> MapResult<LoadReport> {
        self.parse_reader(text.as_bytes(), doc, sink)
    }

    /// Parse map text from a reader
    pub fn parse_reader<R: BufRead>(
        &self,
        mut reader: R,
        doc: &mut SceneDocument,
        sink: &mut dyn DiagnosticSink,
    ) -> MapResult<LoadReport> {
        doc.nodes.clear();

        let mut report = LoadReport::default();
        let mut buf = Vec::new();

        let header = self.next_line(&mut reader, &mut buf)?.unwrap_or_default();
        report.lines_read += 1;
        if header != MAP_HEADER {
            log::error!("Invalid file format");
            return Err(MapError::Format {
                expected: MAP_HEADER,
                found: header,
            });
        }

        while let Some(line) = self.next_line(&mut reader, &mut buf)? {
            report.lines_read += 1;

            if is_ignored(&line) {
                report.lines_ignored += 1;
                continue;
            }

            match self.parse_line(&line, doc) {
                Ok(record) => {
                    commit(doc, record);
                    report.records_committed += 1;
                }
                Err(error) => {
                    report.lines_skipped += 1;
                    sink.report(Diagnostic::new(report.lines_read, line, error));
                }
            }
        }

        log::debug!("Map loaded: {}", report);
        Ok(report)
    }

    /// Read one line without its terminator, `None` at end of stream
    ///
    /// Invalid UTF-8 is replaced rather than failing the load; the affected
    /// line is then rejected by the usual field checks.
    fn next_line<R: BufRead>(&self, reader: &mut R, buf: &mut Vec<u8>) -> MapResult<Option<String>> {
        buf.clear();
        if reader.read_until(b'\n', buf)? == 0 {
            return Ok(None);
        }

        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        if self.config.accept_crlf && buf.last() == Some(&b'\r') {
            buf.pop();
        }

        Ok(Some(String::from_utf8_lossy(buf).into_owned()))
    }

    /// Turn one record line into a record without touching the document
    fn parse_line(&self, line: &str, doc: &SceneDocument) -> Result<Record, RecordError> {
        let tokens = tokenize(line);
        let spec = grammar::lookup(tokens[0]);
        spec.check_arity(&tokens)?;

        // Capacity is checked before any coercion work
        if spec.kind == RecordKind::PointLight && doc.point_lights.len() >= self.config.point_lights_max {
            return Err(RecordError::Capacity {
                max: self.config.point_lights_max,
            });
        }

        spec.read(&tokens)
    }
}

/// Check if a line is skipped without being reported
///
/// Lines shorter than two bytes and full-line `//` comments are ignored.
pub fn is_ignored(line: &str) -> bool {
    line.len() < 2 || line.starts_with(COMMENT_PREFIX)
}

/// Split a line into tokens on `,` without trimming
///
/// A trailing separator does not start an extra empty token, so
/// `"a,b,"` yields `["a", "b"]`. Always yields at least one token.
pub fn tokenize(line: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = line.split(SEPARATOR).collect();
    if tokens.len() > 1 && line.ends_with(SEPARATOR) {
        tokens.pop();
    }
    tokens
}

/// Store a record: singletons are overwritten, sequences appended
fn commit(doc: &mut SceneDocument, record: Record) {
    match record {
        Record::Camera(camera) => {
            log::debug!(
                "Loaded camera: position {:?}, rotation {:?}, fov {}",
                camera.position, camera.rotation, camera.fov
            );
            doc.camera = Some(camera);
        }
        Record::Sky(color) => {
            log::debug!("Loaded sky color: {:?}", color);
            doc.sky_color = Some(color);
        }
        Record::DirectionalLight(light) => {
            log::debug!(
                "Loaded directional light: direction {:?}, ambient {:?}, diffuse {:?}, specular {:?}",
                light.direction, light.ambient, light.diffuse, light.specular
            );
            doc.directional_light = Some(light);
        }
        Record::PointLight(light) => {
            log::debug!(
                "Loaded point light {}: position {:?}, attenuation {:?}",
                doc.point_lights.len(),
                light.position,
                light.attenuation
            );
            doc.point_lights.push(light);
        }
        Record::Node(node) => {
            log::debug!(
                "Loaded node \"{}\": position {:?}, rotation {:?}, scale {:?}, shininess {}, distort {}",
                node.mesh, node.position, node.rotation, node.scale, node.shininess, node.distort
            );
            doc.nodes.push(node);
        }
    }
}
