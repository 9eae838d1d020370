//! Camera and the slow cosmetic motion applied every frame.

use glam::{Mat4, Vec3};

/// Fixed point the orbiting camera keeps looking at.
pub const LOOK_AT: Vec3 = Vec3::new(0.0, 0.15, 0.0);

const ORBIT_RATE: f32 = 0.22;
const ORBIT_RADIUS: f32 = 0.18;
const CAMERA_HEIGHT: f32 = 0.4;
const CAMERA_DISTANCE: f32 = 3.05;

#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, CAMERA_HEIGHT, 3.1),
            target: LOOK_AT,
            up: Vec3::Y,
            aspect,
            fovy_radians: 45f32.to_radians(),
            znear: 0.05,
            zfar: 50.0,
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Move the eye along the slow sinusoidal orbit for elapsed time `t`.
    pub fn orbit(&mut self, t: f32) {
        self.eye.x = (t * ORBIT_RATE).sin() * ORBIT_RADIUS;
        self.eye.z = CAMERA_DISTANCE + (t * ORBIT_RATE).cos() * ORBIT_RADIUS;
    }
}

/// Slow spin of the particle cloud.
pub fn cloud_spin(t: f32) -> f32 {
    t * 0.12
}

/// The starfield drifts the opposite way, slower.
pub fn star_spin(t: f32) -> f32 {
    -t * 0.02
}
