//! Record grammar
//!
//! One [`RecordSpec`] per record keyword describes the field layout of a line.
//! The same layout drives both directions: [`RecordSpec::read`] coerces tokens
//! into a [`Record`] and [`Record::write`] renders a record back into a line.
//!
//! ```text
//! keyword , required fields ... , optional tail ...
//!    0    ,  1 ..= fields.len()  , ...
//! ```
//!
//! Keywords other than the light and camera records fall through to the mesh
//! node layout, where the mesh type check rejects them. This keeps the
//! "incorrect amount of parameters" and "incorrect mesh type" reports distinct.

use glam::Vec3;

use crate::coercion::{self, CoercionError, FieldKind};
use crate::document::{Attenuation, Camera, DirectionalLight, MeshKind, PointLight, SceneNode};
use crate::error::{MapError, RecordError};

/// Token separator
pub const SEPARATOR: char = ',';

/// Kind of record a layout produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Camera,
    Sky,
    DirectionalLight,
    PointLight,
    MeshNode,
}

/// A named, typed position in a record layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSlot {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSlot {
    const fn float(name: &'static str) -> Self {
        Self { name, kind: FieldKind::Float }
    }

    const fn boolean(name: &'static str) -> Self {
        Self { name, kind: FieldKind::Bool }
    }

    const fn string(name: &'static str) -> Self {
        Self { name, kind: FieldKind::Str }
    }
}

/// Layout of one record keyword
#[derive(Debug)]
pub struct RecordSpec {
    pub kind: RecordKind,
    /// Keywords written for this layout (mesh nodes accept any mesh keyword)
    pub keywords: &'static [&'static str],
    /// Required fields after the keyword
    pub fields: &'static [FieldSlot],
    /// Fields that may follow the required ones, in order
    pub optional_tail: &'static [FieldSlot],
}

const CAMERA_FIELDS: &[FieldSlot] = &[
    FieldSlot::float("position.x"),
    FieldSlot::float("position.y"),
    FieldSlot::float("position.z"),
    FieldSlot::float("rotation.x"),
    FieldSlot::float("rotation.y"),
    FieldSlot::float("rotation.z"),
    FieldSlot::float("fov"),
];

const SKY_FIELDS: &[FieldSlot] = &[
    FieldSlot::float("color.x"),
    FieldSlot::float("color.y"),
    FieldSlot::float("color.z"),
];

const DIRLIGHT_FIELDS: &[FieldSlot] = &[
    FieldSlot::float("direction.x"),
    FieldSlot::float("direction.y"),
    FieldSlot::float("direction.z"),
    FieldSlot::float("ambient.x"),
    FieldSlot::float("ambient.y"),
    FieldSlot::float("ambient.z"),
    FieldSlot::float("diffuse.x"),
    FieldSlot::float("diffuse.y"),
    FieldSlot::float("diffuse.z"),
    FieldSlot::float("specular.x"),
    FieldSlot::float("specular.y"),
    FieldSlot::float("specular.z"),
];

const POINTLIGHT_FIELDS: &[FieldSlot] = &[
    FieldSlot::float("position.x"),
    FieldSlot::float("position.y"),
    FieldSlot::float("position.z"),
    FieldSlot::float("constant"),
    FieldSlot::float("linear"),
    FieldSlot::float("quadratic"),
    FieldSlot::float("ambient.x"),
    FieldSlot::float("ambient.y"),
    FieldSlot::float("ambient.z"),
    FieldSlot::float("diffuse.x"),
    FieldSlot::float("diffuse.y"),
    FieldSlot::float("diffuse.z"),
    FieldSlot::float("specular.x"),
    FieldSlot::float("specular.y"),
    FieldSlot::float("specular.z"),
];

const NODE_FIELDS: &[FieldSlot] = &[
    FieldSlot::float("position.x"),
    FieldSlot::float("position.y"),
    FieldSlot::float("position.z"),
    FieldSlot::float("rotation.x"),
    FieldSlot::float("rotation.y"),
    FieldSlot::float("rotation.z"),
    FieldSlot::float("scale.x"),
    FieldSlot::float("scale.y"),
    FieldSlot::float("scale.z"),
    FieldSlot::float("shininess"),
];

const NODE_TAIL: &[FieldSlot] = &[
    FieldSlot::boolean("distort"),
    FieldSlot::string("texture"),
    FieldSlot::string("specular_map"),
];

/// `camera` record
pub static CAMERA: RecordSpec = RecordSpec {
    kind: RecordKind::Camera,
    keywords: &["camera"],
    fields: CAMERA_FIELDS,
    optional_tail: &[],
};

/// `sky` record
pub static SKY: RecordSpec = RecordSpec {
    kind: RecordKind::Sky,
    keywords: &["sky"],
    fields: SKY_FIELDS,
    optional_tail: &[],
};

/// `dirlight` record
pub static DIRLIGHT: RecordSpec = RecordSpec {
    kind: RecordKind::DirectionalLight,
    keywords: &["dirlight"],
    fields: DIRLIGHT_FIELDS,
    optional_tail: &[],
};

/// `pointlight` record
pub static POINTLIGHT: RecordSpec = RecordSpec {
    kind: RecordKind::PointLight,
    keywords: &["pointlight"],
    fields: POINTLIGHT_FIELDS,
    optional_tail: &[],
};

/// Mesh node records (`cube`, `sphere`)
pub static MESH_NODE: RecordSpec = RecordSpec {
    kind: RecordKind::MeshNode,
    keywords: &["cube", "sphere"],
    fields: NODE_FIELDS,
    optional_tail: NODE_TAIL,
};

/// Layouts with a dedicated keyword; everything else is a mesh node
static KEYED: [&RecordSpec; 4] = [&CAMERA, &SKY, &DIRLIGHT, &POINTLIGHT];

/// Find the layout for a record keyword
pub fn lookup(keyword: &str) -> &'static RecordSpec {
    KEYED
        .iter()
        .copied()
        .find(|spec| spec.keywords.contains(&keyword))
        .unwrap_or(&MESH_NODE)
}

impl RecordSpec {
    /// Minimum token count, keyword included
    pub fn min_tokens(&self) -> usize {
        1 + self.fields.len()
    }

    /// Maximum meaningful token count; extra tokens are ignored
    pub fn max_tokens(&self) -> usize {
        self.min_tokens() + self.optional_tail.len()
    }

    /// Slot at field index `index` (0 is the first field after the keyword)
    pub fn slot(&self, index: usize) -> Option<&FieldSlot> {
        self.fields.iter().chain(self.optional_tail).nth(index)
    }

    /// Reject token lists shorter than the layout requires
    pub fn check_arity(&self, tokens: &[&str]) -> Result<(), RecordError> {
        if tokens.len() < self.min_tokens() {
            return Err(RecordError::ParameterCount {
                keyword: tokens.first().copied().unwrap_or_default().to_string(),
                found: tokens.len(),
                required: self.min_tokens(),
            });
        }
        Ok(())
    }

    /// Coerce a tokenized line into a record
    ///
    /// Either every field coerces or nothing is produced.
    pub fn read(&'static self, tokens: &[&str]) -> Result<Record, RecordError> {
        self.check_arity(tokens)?;

        let mut cursor = TokenCursor::new(self, tokens);
        let record = match self.kind {
            RecordKind::Camera => Record::Camera(Camera {
                position: cursor.vec3()?,
                rotation: cursor.vec3()?,
                fov: cursor.float()?,
            }),
            RecordKind::Sky => Record::Sky(cursor.vec3()?),
            RecordKind::DirectionalLight => Record::DirectionalLight(DirectionalLight {
                direction: cursor.vec3()?,
                ambient: cursor.vec3()?,
                diffuse: cursor.vec3()?,
                specular: cursor.vec3()?,
            }),
            RecordKind::PointLight => Record::PointLight(PointLight {
                position: cursor.vec3()?,
                attenuation: Attenuation {
                    constant: cursor.float()?,
                    linear: cursor.float()?,
                    quadratic: cursor.float()?,
                },
                ambient: cursor.vec3()?,
                diffuse: cursor.vec3()?,
                specular: cursor.vec3()?,
            }),
            RecordKind::MeshNode => {
                // Mesh kind resolves before any field is touched
                let keyword = tokens.first().copied().unwrap_or_default();
                let mesh = MeshKind::from_keyword(keyword).ok_or_else(|| RecordError::MeshType {
                    keyword: keyword.to_string(),
                })?;
                Record::Node(SceneNode {
                    mesh,
                    position: cursor.vec3()?,
                    rotation: cursor.vec3()?,
                    scale: cursor.vec3()?,
                    shininess: cursor.float()?,
                    distort: cursor.optional_bool(false),
                    texture_path: cursor.optional_path(),
                    specular_path: cursor.optional_path(),
                })
            }
        };

        Ok(record)
    }
}

/// Walks the tokens of one line in layout order
pub struct TokenCursor<'a> {
    spec: &'static RecordSpec,
    tokens: &'a [&'a str],
    /// Index of the next field (0 is the first token after the keyword)
    field: usize,
}

impl<'a> TokenCursor<'a> {
    /// Create a cursor over a tokenized line (keyword at index 0)
    pub fn new(spec: &'static RecordSpec, tokens: &'a [&'a str]) -> Self {
        Self { spec, tokens, field: 0 }
    }

    fn next_slot(&mut self, kind: FieldKind) -> (&'static str, Option<&'a str>) {
        let name = match self.spec.slot(self.field) {
            Some(slot) => {
                debug_assert_eq!(slot.kind, kind, "layout mismatch at '{}'", slot.name);
                slot.name
            }
            None => "<extra>",
        };
        let token = self.tokens.get(self.field + 1).copied();
        self.field += 1;
        (name, token)
    }

    /// Next field as a float
    pub fn float(&mut self) -> Result<f32, CoercionError> {
        let (name, token) = self.next_slot(FieldKind::Float);
        coercion::coerce_float(name, token.unwrap_or_default())
    }

    /// Next three fields as a vector
    pub fn vec3(&mut self) -> Result<Vec3, CoercionError> {
        Ok(Vec3::new(self.float()?, self.float()?, self.float()?))
    }

    /// Next field as a bool, `default` when the line ends before it
    pub fn optional_bool(&mut self, default: bool) -> bool {
        let (_, token) = self.next_slot(FieldKind::Bool);
        token.map(coercion::coerce_bool).unwrap_or(default)
    }

    /// Next field as a path; absent and empty tokens both mean "none"
    pub fn optional_path(&mut self) -> Option<String> {
        let (_, token) = self.next_slot(FieldKind::Str);
        token.filter(|t| !t.is_empty()).map(coercion::coerce_str)
    }
}

// ============================================================================
// Records
// ============================================================================

/// A fully coerced line
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Camera(Camera),
    Sky(Vec3),
    DirectionalLight(DirectionalLight),
    PointLight(PointLight),
    Node(SceneNode),
}

impl Record {
    /// Layout this record is written with
    pub fn spec(&self) -> &'static RecordSpec {
        match self {
            Self::Camera(_) => &CAMERA,
            Self::Sky(_) => &SKY,
            Self::DirectionalLight(_) => &DIRLIGHT,
            Self::PointLight(_) => &POINTLIGHT,
            Self::Node(_) => &MESH_NODE,
        }
    }

    /// Keyword that starts this record's line
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Node(node) => node.mesh.keyword(),
            _ => self.spec().keywords[0],
        }
    }

    /// Render the record as one line (no terminator)
    pub fn write(&self) -> Result<String, MapError> {
        let mut w = RecordWriter::new(self.spec(), self.keyword());
        match self {
            Self::Camera(camera) => {
                w.vec3(camera.position);
                w.vec3(camera.rotation);
                w.float(camera.fov);
            }
            Self::Sky(color) => w.vec3(*color),
            Self::DirectionalLight(light) => {
                w.vec3(light.direction);
                w.vec3(light.ambient);
                w.vec3(light.diffuse);
                w.vec3(light.specular);
            }
            Self::PointLight(light) => {
                w.vec3(light.position);
                w.float(light.attenuation.constant);
                w.float(light.attenuation.linear);
                w.float(light.attenuation.quadratic);
                w.vec3(light.ambient);
                w.vec3(light.diffuse);
                w.vec3(light.specular);
            }
            Self::Node(node) => {
                w.vec3(node.position);
                w.vec3(node.rotation);
                w.vec3(node.scale);
                w.float(node.shininess);
                w.boolean(node.distort);

                let texture = node.texture_path.as_deref().filter(|p| !p.is_empty());
                let specular = node.specular_path.as_deref().filter(|p| !p.is_empty());
                if texture.is_some() || specular.is_some() {
                    w.string(texture.unwrap_or_default())?;
                }
                if let Some(specular) = specular {
                    w.string(specular)?;
                }
            }
        }
        Ok(w.finish())
    }
}

/// Builds one record line in layout order
pub struct RecordWriter {
    spec: &'static RecordSpec,
    line: String,
    field: usize,
}

impl RecordWriter {
    /// Start a line with `keyword`
    pub fn new(spec: &'static RecordSpec, keyword: &str) -> Self {
        Self {
            spec,
            line: keyword.to_string(),
            field: 0,
        }
    }

    fn push(&mut self, kind: FieldKind, text: &str) {
        if let Some(slot) = self.spec.slot(self.field) {
            debug_assert_eq!(slot.kind, kind, "layout mismatch at '{}'", slot.name);
        }
        self.line.push(SEPARATOR);
        self.line.push_str(text);
        self.field += 1;
    }

    /// Append a float field
    pub fn float(&mut self, value: f32) {
        self.push(FieldKind::Float, &coercion::format_float(value));
    }

    /// Append three float fields
    pub fn vec3(&mut self, value: Vec3) {
        self.float(value.x);
        self.float(value.y);
        self.float(value.z);
    }

    /// Append a bool field
    pub fn boolean(&mut self, value: bool) {
        self.push(FieldKind::Bool, coercion::format_bool(value));
    }

    /// Append a string field
    ///
    /// Strings holding the separator or a line break cannot be read back.
    pub fn string(&mut self, value: &str) -> Result<(), MapError> {
        if value.contains([SEPARATOR, '\n', '\r']) {
            let field = self.spec.slot(self.field).map(|s| s.name).unwrap_or("<extra>");
            return Err(MapError::Unrepresentable {
                field,
                value: value.to_string(),
            });
        }
        self.push(FieldKind::Str, value);
        Ok(())
    }

    /// Finish the line
    pub fn finish(self) -> String {
        debug_assert!(self.field >= self.spec.fields.len());
        debug_assert!(self.field <= self.spec.fields.len() + self.spec.optional_tail.len());
        self.line
    }
}
