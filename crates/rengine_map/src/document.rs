//! Scene document
//!
//! The in-memory result of loading a map file. Every type here is plain data:
//! the document never owns GPU resources or generated geometry. Nodes carry a
//! [`MeshKind`] tag that the renderer resolves through a [`MeshFactory`].

use glam::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default capacity of [`SceneDocument::point_lights`]
pub const POINT_LIGHTS_MAX: usize = 32;

/// Segment count (stacks, sectors) of the high resolution sphere
pub const SPHERE_HI_RES_SEGMENTS: (u32, u32) = (40, 40);

// ============================================================================
// Camera
// ============================================================================

/// Camera record
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Camera {
    /// World position
    pub position: Vec3,
    /// Euler rotation in degrees
    pub rotation: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
}

impl Camera {
    /// Smallest field of view a renderer should accept
    pub const FOV_MIN: f32 = 1.0;
    /// Largest field of view a renderer should accept
    pub const FOV_MAX: f32 = 179.0;

    /// Create a new camera
    pub fn new(position: Vec3, rotation: Vec3, fov: f32) -> Self {
        Self { position, rotation, fov }
    }

    /// Viewing direction derived from the pitch (x) and yaw (y) rotation
    pub fn front(&self) -> Vec3 {
        let pitch = self.rotation.x.to_radians();
        let yaw = self.rotation.y.to_radians();
        Vec3::new(yaw.sin(), pitch.sin(), yaw.cos())
    }

    /// Up vector derived from the roll (z) rotation
    pub fn up(&self) -> Vec3 {
        let roll = self.rotation.z.to_radians();
        Vec3::new(roll.sin(), roll.cos(), 0.0)
    }

    /// Field of view limited to [`Camera::FOV_MIN`]..=[`Camera::FOV_MAX`]
    pub fn clamped_fov(&self) -> f32 {
        if self.fov.is_nan() {
            return Self::FOV_MIN;
        }
        self.fov.clamp(Self::FOV_MIN, Self::FOV_MAX)
    }
}

// ============================================================================
// Lights
// ============================================================================

/// Directional light record
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

/// Distance attenuation terms of a point light
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Attenuation {
    /// Create attenuation terms
    pub fn new(constant: f32, linear: f32, quadratic: f32) -> Self {
        Self { constant, linear, quadratic }
    }

    /// Attenuation factor at `distance`
    pub fn factor(&self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }
}

/// Point light record
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointLight {
    pub position: Vec3,
    pub attenuation: Attenuation,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

// ============================================================================
// Nodes
// ============================================================================

/// Closed set of mesh generators a node can refer to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MeshKind {
    /// Unit cube
    Cube,
    /// UV sphere tessellated with [`SPHERE_HI_RES_SEGMENTS`]
    SphereHiRes,
}

impl MeshKind {
    /// All mesh kinds, in keyword order
    pub const ALL: [MeshKind; 2] = [MeshKind::Cube, MeshKind::SphereHiRes];

    /// Record keyword naming this mesh kind
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Cube => "cube",
            Self::SphereHiRes => "sphere",
        }
    }

    /// Resolve a record keyword (case-sensitive)
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.keyword() == keyword)
    }

    /// Tessellation requested from the geometry generator, if it takes one
    pub fn tessellation(&self) -> Option<(u32, u32)> {
        match self {
            Self::Cube => None,
            Self::SphereHiRes => Some(SPHERE_HI_RES_SEGMENTS),
        }
    }
}

impl std::fmt::Display for MeshKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Geometry source implemented by the render subsystem
///
/// The loader only stores [`MeshKind`] tags; meshes are built when the
/// renderer asks for them.
pub trait MeshFactory {
    /// Handle type produced by the factory
    type Mesh;

    /// Build the geometry for `kind`
    fn create_mesh(&mut self, kind: MeshKind) -> Self::Mesh;
}

impl<M, F: FnMut(MeshKind) -> M> MeshFactory for F {
    type Mesh = M;

    fn create_mesh(&mut self, kind: MeshKind) -> M {
        self(kind)
    }
}

/// A renderable node
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SceneNode {
    pub mesh: MeshKind,
    pub position: Vec3,
    /// Euler rotation in degrees
    pub rotation: Vec3,
    pub scale: Vec3,
    pub shininess: f32,
    pub distort: bool,
    pub texture_path: Option<String>,
    pub specular_path: Option<String>,
}

impl SceneNode {
    /// Create an untextured node with unit scale at the origin
    pub fn new(mesh: MeshKind) -> Self {
        Self {
            mesh,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            shininess: 0.0,
            distort: false,
            texture_path: None,
            specular_path: None,
        }
    }

    /// Set the position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set the rotation (degrees)
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Set the specular shininess exponent
    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess;
        self
    }

    /// Enable or disable vertex distortion
    pub fn with_distort(mut self, distort: bool) -> Self {
        self.distort = distort;
        self
    }

    /// Set the diffuse texture path
    pub fn with_texture(mut self, path: impl Into<String>) -> Self {
        self.texture_path = Some(path.into());
        self
    }

    /// Set the specular map path
    pub fn with_specular_map(mut self, path: impl Into<String>) -> Self {
        self.specular_path = Some(path.into());
        self
    }
}

// ============================================================================
// Document
// ============================================================================

/// Root of a loaded scene
///
/// Singleton records (`camera`, `sky_color`, `directional_light`) are `None`
/// until a record assigns them, so an explicitly zeroed light is still written
/// back out by the serializer.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SceneDocument {
    pub camera: Option<Camera>,
    pub sky_color: Option<Vec3>,
    pub directional_light: Option<DirectionalLight>,
    pub point_lights: Vec<PointLight>,
    pub nodes: Vec<SceneNode>,
}

impl SceneDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Background color, black when no `sky` record was loaded
    pub fn sky_color_or_default(&self) -> Vec3 {
        self.sky_color.unwrap_or(Vec3::ZERO)
    }

    /// Camera, zeroed when no `camera` record was loaded
    pub fn camera_or_default(&self) -> Camera {
        self.camera.unwrap_or_default()
    }

    /// Directional light, zeroed when no `dirlight` record was loaded
    pub fn directional_light_or_default(&self) -> DirectionalLight {
        self.directional_light.unwrap_or_default()
    }

    /// Check if the document holds no records at all
    pub fn is_empty(&self) -> bool {
        self.camera.is_none()
            && self.sky_color.is_none()
            && self.directional_light.is_none()
            && self.point_lights.is_empty()
            && self.nodes.is_empty()
    }

    /// Number of records the document would serialize to
    pub fn record_count(&self) -> usize {
        usize::from(self.camera.is_some())
            + usize::from(self.sky_color.is_some())
            + usize::from(self.directional_light.is_some())
            + self.point_lights.len()
            + self.nodes.len()
    }

    /// Build geometry for every node, in node order
    pub fn instantiate_meshes<F: MeshFactory>(&self, factory: &mut F) -> Vec<F::Mesh> {
        self.nodes.iter().map(|node| factory.create_mesh(node.mesh)).collect()
    }
}
