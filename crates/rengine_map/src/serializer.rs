//! Map serializer
//!
//! Writes a [`SceneDocument`] in canonical form: the header, then `sky`,
//! `dirlight` and `camera` when assigned, then every point light and every
//! node in document order. Reading the output back yields an equal document.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::config::MapConfig;
use crate::document::SceneDocument;
use crate::error::{MapError, MapResult};
use crate::grammar::Record;
use crate::parser::MAP_HEADER;

/// Map file writer
#[derive(Debug, Clone, Default)]
pub struct SceneSerializer {
    config: MapConfig,
}

impl SceneSerializer {
    /// Create a serializer with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a serializer with a custom configuration
    pub fn with_config(config: MapConfig) -> Self {
        Self { config }
    }

    /// Render every line of `doc`, header first
    ///
    /// Nothing is produced if any record cannot be represented.
    pub fn lines(&self, doc: &SceneDocument) -> MapResult<Vec<String>> {
        if doc.point_lights.len() > self.config.point_lights_max {
            log::warn!(
                "Document holds {} point lights; only the first {} will load back",
                doc.point_lights.len(),
                self.config.point_lights_max
            );
        }

        let singletons = [
            doc.sky_color.map(Record::Sky),
            doc.directional_light.map(Record::DirectionalLight),
            doc.camera.map(Record::Camera),
        ];

        let mut lines = Vec::with_capacity(1 + doc.record_count());
        lines.push(MAP_HEADER.to_string());
        for record in singletons.into_iter().flatten() {
            lines.push(record.write()?);
        }
        for light in &doc.point_lights {
            lines.push(Record::PointLight(*light).write()?);
        }
        for node in &doc.nodes {
            lines.push(Record::Node(node.clone()).write()?);
        }

        Ok(lines)
    }

    /// Render `doc` as map text, one `\n`-terminated line per record
    pub fn to_string(&self, doc: &SceneDocument) -> MapResult<String> {
        let mut text = String::new();
        for line in self.lines(doc)? {
            text.push_str(&line);
            text.push('\n');
        }
        Ok(text)
    }

    /// Write `doc` to a writer
    pub fn write_to<W: Write>(&self, mut writer: W, doc: &SceneDocument) -> MapResult<()> {
        let text = self.to_string(doc)?;
        writer.write_all(text.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Write `doc` to a file, replacing its contents
    ///
    /// The document is rendered before the file is opened, so an
    /// unrepresentable field leaves an existing file untouched.
    pub fn save_file(&self, path: impl AsRef<Path>, doc: &SceneDocument) -> MapResult<()> {
        let path = path.as_ref();
        let text = self.to_string(doc)?;

        let file = File::create(path).map_err(|source| MapError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;

        let mut writer = BufWriter::new(file);
        writer.write_all(text.as_bytes())?;
        writer.flush()?;

        log::debug!("Saved map {} ({} records)", path.display(), doc.record_count());
        Ok(())
    }
}
