//! # rengine_map - REngine Map Format
//!
//! Loads `.rem` scene files into a [`SceneDocument`] and writes documents back
//! out. The format is flat text, one record per line:
//!
//! ```text
//! [RENGINE MAP FORMAT V1.0]
//! // full-line comment
//! sky,0.1,0.2,0.3
//! camera,0,1,5,0,180,0,60
//! pointlight,0,2,0,1,0.09,0.032,0.1,0.1,0.1,0.8,0.8,0.8,1,1,1
//! cube,1,2,3,0,0,0,1,1,1,32,true,textures/crate.png,textures/crate_spec.png
//! ```
//!
//! ## Architecture
//!
//! ```text
//! source ──► SceneParser ──► grammar::lookup ──► RecordSpec::read ──► SceneDocument
//!                 │                                    │
//!                 ▼                                    ▼
//!           DiagnosticSink ◄──────────────── RecordError (line skipped)
//!
//! SceneDocument ──► SceneSerializer ──► Record::write ──► destination
//! ```
//!
//! Loading is best effort: malformed lines are reported and skipped, and only
//! an unreadable source or a wrong header fails the call.

pub mod coercion;
pub mod config;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod grammar;
pub mod parser;
pub mod serializer;

pub use config::MapConfig;
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink, LoadReport, LogSink, NullSink};
pub use document::{
    Attenuation, Camera, DirectionalLight, MeshFactory, MeshKind, PointLight, SceneDocument,
    SceneNode, POINT_LIGHTS_MAX,
};
pub use error::{MapError, MapResult, RecordError};
pub use parser::{SceneParser, MAP_HEADER};
pub use serializer::SceneSerializer;

use std::path::Path;

/// Conventional map file extension
pub const MAP_EXTENSION: &str = "rem";

/// Boolean front end used by the engine
///
/// Errors are logged and reduced to `false`; rejected lines go to the log.
/// Use [`SceneParser`] and [`SceneSerializer`] directly for reports and
/// structured errors.
pub struct SceneLoader;

impl SceneLoader {
    /// Load `path` into `doc`
    ///
    /// Returns `false` only when the file cannot be opened or has a wrong
    /// header. `doc.nodes` is cleared before populating; the other fields are
    /// overwritten in place, not reset.
    pub fn load(path: impl AsRef<Path>, doc: &mut SceneDocument) -> bool {
        Self::try_load(path, doc, &mut LogSink).is_ok()
    }

    /// Load `path` into `doc`, reporting rejected lines to `sink`
    pub fn try_load(
        path: impl AsRef<Path>,
        doc: &mut SceneDocument,
        sink: &mut dyn DiagnosticSink,
    ) -> MapResult<LoadReport> {
        let path = path.as_ref();
        SceneParser::new().load_file(path, doc, sink).map_err(|e| {
            log::error!("Failed to load map {}: {}", path.display(), e);
            e
        })
    }

    /// Save `doc` to `path` in canonical form
    ///
    /// Returns `false` if the destination cannot be written.
    pub fn save(path: impl AsRef<Path>, doc: &SceneDocument) -> bool {
        Self::try_save(path, doc).is_ok()
    }

    /// Save `doc` to `path`, returning the structured error on failure
    pub fn try_save(path: impl AsRef<Path>, doc: &SceneDocument) -> MapResult<()> {
        let path = path.as_ref();
        SceneSerializer::new().save_file(path, doc).map_err(|e| {
            log::error!("Failed to save map {}: {}", path.display(), e);
            e
        })
    }
}

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::MapConfig;
    pub use crate::diagnostics::{Diagnostic, DiagnosticSink, LoadReport};
    pub use crate::document::{MeshFactory, MeshKind, SceneDocument, SceneNode};
    pub use crate::error::{MapError, MapResult};
    pub use crate::parser::SceneParser;
    pub use crate::serializer::SceneSerializer;
    pub use crate::SceneLoader;
}
