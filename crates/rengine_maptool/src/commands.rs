//! Tool commands
//!
//! Each command writes its normal output to `out` and returns an [`Outcome`];
//! fatal problems come back as [`ToolError`].

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use rengine_map::{
    Diagnostic, DiagnosticSink, LoadReport, LogSink, SceneDocument, SceneParser, SceneSerializer,
};

use crate::config::ToolConfig;
use crate::ToolError;

/// Result of a command that ran to completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to complain about
    Clean,
    /// Lines were skipped and strict mode is on
    Lossy,
    /// A fatal error ended the command
    Failed,
}

impl Outcome {
    fn from_report(report: &LoadReport, config: &ToolConfig) -> Self {
        if config.strict && !report.is_clean() {
            Self::Lossy
        } else {
            Self::Clean
        }
    }

    /// Process exit code
    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Clean => ExitCode::SUCCESS,
            Self::Failed => ExitCode::from(1),
            Self::Lossy => ExitCode::from(2),
        }
    }
}

/// A loaded map with everything the loader had to say about it
struct Loaded {
    doc: SceneDocument,
    report: LoadReport,
    diagnostics: Vec<Diagnostic>,
}

fn load(path: &Path, config: &ToolConfig) -> Result<Loaded, ToolError> {
    let mut doc = SceneDocument::new();
    let mut diagnostics = Vec::new();

    let report = {
        let mut sink = |d: Diagnostic| {
            if config.log_diagnostics {
                LogSink.report(d.clone());
            }
            diagnostics.push(d);
        };
        SceneParser::with_config(config.map_config()).load_file(path, &mut doc, &mut sink)?
    };

    Ok(Loaded {
        doc,
        report,
        diagnostics,
    })
}

/// Load a map and list every rejected line
pub fn check(path: &Path, config: &ToolConfig, out: &mut dyn Write) -> Result<Outcome, ToolError> {
    let loaded = load(path, config)?;

    for diagnostic in &loaded.diagnostics {
        writeln!(out, "{}: {}", path.display(), diagnostic)?;
    }
    writeln!(out, "{}: {}", path.display(), loaded.report)?;

    Ok(Outcome::from_report(&loaded.report, config))
}

/// Rewrite a map in canonical form
///
/// In strict mode a map with skipped lines is left alone, since rewriting it
/// would drop those lines for good.
pub fn fmt(
    input: &Path,
    output: Option<&Path>,
    config: &ToolConfig,
    out: &mut dyn Write,
) -> Result<Outcome, ToolError> {
    let loaded = load(input, config)?;
    let outcome = Outcome::from_report(&loaded.report, config);

    for diagnostic in &loaded.diagnostics {
        writeln!(out, "{}: dropping {}", input.display(), diagnostic)?;
    }
    if outcome == Outcome::Lossy {
        writeln!(out, "{}: not rewritten (strict mode)", input.display())?;
        return Ok(outcome);
    }

    let target = output.unwrap_or(input);
    SceneSerializer::with_config(config.map_config()).save_file(target, &loaded.doc)?;
    writeln!(
        out,
        "{} -> {}: {} records",
        input.display(),
        target.display(),
        loaded.doc.record_count()
    )?;

    Ok(outcome)
}

/// Print the loaded document, as text or JSON
pub fn dump(path: &Path, json: bool, config: &ToolConfig, out: &mut dyn Write) -> Result<Outcome, ToolError> {
    let loaded = load(path, config)?;
    let doc = &loaded.doc;

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(doc)?)?;
        return Ok(Outcome::from_report(&loaded.report, config));
    }

    if let Some(sky) = doc.sky_color {
        writeln!(out, "sky        {:?}", sky)?;
    }
    if let Some(camera) = doc.camera {
        writeln!(
            out,
            "camera     position {:?} front {:?} fov {}",
            camera.position,
            camera.front(),
            camera.fov
        )?;
    }
    if let Some(light) = doc.directional_light {
        writeln!(out, "dirlight   direction {:?}", light.direction)?;
    }
    for (i, light) in doc.point_lights.iter().enumerate() {
        writeln!(
            out,
            "pointlight {} position {:?} attenuation ({}, {}, {})",
            i,
            light.position,
            light.attenuation.constant,
            light.attenuation.linear,
            light.attenuation.quadratic
        )?;
    }
    for (i, node) in doc.nodes.iter().enumerate() {
        writeln!(
            out,
            "{:<10} {} position {:?} scale {:?} texture {}",
            node.mesh.keyword(),
            i,
            node.position,
            node.scale,
            node.texture_path.as_deref().unwrap_or("-")
        )?;
    }
    writeln!(out, "{}", loaded.report)?;

    Ok(Outcome::from_report(&loaded.report, config))
}
