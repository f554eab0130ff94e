//! Perspective camera whose world transform is either placed by the host
//! (inline viewing) or overwritten each frame from a device pose (immersive
//! presentation).

use cgmath::{Deg, Matrix4, PerspectiveFov, Rad, SquareMatrix, Vector3};

pub struct PerspectiveCamera {
    pub fov: Deg<f32>,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    world: Matrix4<f32>,
}

impl PerspectiveCamera {
    pub fn new(fov: Deg<f32>, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov,
            aspect,
            near,
            far,
            world: Matrix4::identity(),
        }
    }

    pub fn set_position(&mut self, position: Vector3<f32>) {
        self.world = Matrix4::from_translation(position);
    }

    pub fn position(&self) -> Vector3<f32> {
        self.world.w.truncate()
    }

    /// Updates the aspect ratio after the output surface changed size.
    /// Zero-sized surfaces keep the previous aspect.
    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    /// Replaces the world transform with a column-major 4x4 matrix, the
    /// layout immersive platforms report poses in.
    pub fn set_world_matrix(&mut self, m: &[f32; 16]) {
        self.world = Matrix4::new(
            m[0], m[1], m[2], m[3], m[4], m[5], m[6], m[7], m[8], m[9], m[10], m[11], m[12],
            m[13], m[14], m[15],
        );
    }

    pub fn set_world(&mut self, world: Matrix4<f32>) {
        self.world = world;
    }

    pub fn world_matrix(&self) -> Matrix4<f32> {
        self.world
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.world.invert().unwrap_or_else(Matrix4::identity)
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        PerspectiveFov {
            fovy: Rad::from(self.fov),
            aspect: self.aspect,
            near: self.near,
            far: self.far,
        }
        .into()
    }

    pub fn view_projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_updates_aspect() {
        let mut camera = PerspectiveCamera::new(Deg(75.0), 1.0, 0.1, 1000.0);
        camera.resize_projection(1600, 800);
        assert_eq!(camera.aspect, 2.0);

        camera.resize_projection(0, 800);
        assert_eq!(camera.aspect, 2.0);
    }

    #[test]
    fn test_world_matrix_from_pose_array() {
        let mut camera = PerspectiveCamera::new(Deg(75.0), 1.0, 0.1, 1000.0);
        camera.set_position(Vector3::new(0.0, 0.0, 5.0));

        let mut pose = [0.0; 16];
        pose[0] = 1.0;
        pose[5] = 1.0;
        pose[10] = 1.0;
        pose[15] = 1.0;
        pose[12] = 1.5;
        pose[13] = -2.0;
        pose[14] = 0.25;
        camera.set_world_matrix(&pose);

        assert_eq!(camera.position(), Vector3::new(1.5, -2.0, 0.25));
        let world = camera.world_matrix();
        let world: &[f32; 16] = world.as_ref();
        assert_eq!(world, &pose);
    }
}
