use crate::math::OPENGL_TO_WGPU_MATRIX;

/// Orthographic camera over the window in logical pixels, origin top-left,
/// y pointing down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub width: f32,
    pub height: f32,
}

impl Camera {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn build_view_projection_matrix(&self) -> cgmath::Matrix4<f32> {
        let proj = cgmath::ortho(0.0, self.width, self.height, 0.0, -1.0, 1.0);
        OPENGL_TO_WGPU_MATRIX * proj
    }
}

/// Camera matrix as uploaded to the uniform buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_proj: cgmath::Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera) {
        self.view_proj = camera.build_view_projection_matrix().into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector4;

    fn project(camera: &Camera, x: f32, y: f32) -> Vector4<f32> {
        camera.build_view_projection_matrix() * Vector4::new(x, y, 0.0, 1.0)
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_corners_map_to_clip_space() {
        let camera = Camera::new(754.0, 540.0);

        let top_left = project(&camera, 0.0, 0.0);
        assert!(close(top_left.x, -1.0) && close(top_left.y, 1.0));

        let bottom_right = project(&camera, 754.0, 540.0);
        assert!(close(bottom_right.x, 1.0) && close(bottom_right.y, -1.0));

        let centre = project(&camera, 377.0, 270.0);
        assert!(close(centre.x, 0.0) && close(centre.y, 0.0));
        assert!(close(centre.z, 0.5));
    }

    #[test]
    fn test_uniform_tracks_camera() {
        let camera = Camera::new(100.0, 50.0);
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera);
        let expected: [[f32; 4]; 4] = camera.build_view_projection_matrix().into();
        assert_eq!(uniform.view_proj, expected);
    }
}
