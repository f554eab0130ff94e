//! # Scene
//!
//! The scene graph seen by the viewer: displayable objects plus the lights
//! attached by the asset loader. Objects are addressed through [`ObjectId`]
//! so input handling can hold a reference to "the displayed object" without
//! borrowing the scene.

use cgmath::{Euler, Matrix4, Rad, Vector3, Zero};

use super::geometry::GeometryData;

/// Index of an object inside its [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(usize);

/// Position, Euler rotation and scale of a scene object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Euler<Rad<f32>>,
    pub scale: Vector3<f32>,
}

impl Transform {
    pub fn at(position: Vector3<f32>) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Composes the model matrix, T * R * S
    pub fn matrix(&self) -> Matrix4<f32> {
        let t = Matrix4::from_translation(self.position);
        let r = Matrix4::from(self.rotation);
        let s = Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        t * r * s
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Euler::new(Rad(0.0), Rad(0.0), Rad(0.0)),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

/// The displayed 3D entity
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    pub geometry: GeometryData,
    pub transform: Transform,
    /// RGB base color, used when the model carries no material
    pub color: [f32; 3],
    pub is_placeholder: bool,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, geometry: GeometryData) -> Self {
        Self {
            name: name.into(),
            geometry,
            transform: Transform::default(),
            color: [0.8, 0.8, 0.8],
            is_placeholder: false,
        }
    }

    /// Adds to the current Euler rotation. No clamping or wrapping.
    pub fn rotate_by(&mut self, pitch: Rad<f32>, yaw: Rad<f32>) {
        self.transform.rotation.x = self.transform.rotation.x + pitch;
        self.transform.rotation.y = self.transform.rotation.y + yaw;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    Ambient,
    Directional { direction: Vector3<f32> },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: [f32; 3],
    pub intensity: f32,
}

impl Light {
    pub fn ambient(color: [f32; 3], intensity: f32) -> Self {
        Self {
            kind: LightKind::Ambient,
            color,
            intensity,
        }
    }

    pub fn directional(direction: Vector3<f32>, color: [f32; 3], intensity: f32) -> Self {
        Self {
            kind: LightKind::Directional { direction },
            color,
            intensity,
        }
    }
}

/// Objects and lights handed to the rendering engine each frame
#[derive(Debug, Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
    lights: Vec<Light>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_object(&mut self, object: SceneObject) -> ObjectId {
        self.objects.push(object);
        ObjectId(self.objects.len() - 1)
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id.0)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(id.0)
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}
