//! Mouse-driven orbit controls with per-frame damping.

use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use super::orbit_camera::OrbitCamera;

/// Velocities below this are treated as settled.
const REST_VELOCITY: f32 = 1e-5;

pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    /// Fraction of angular velocity shed per frame. 0 disables damping.
    pub damping_factor: f32,
    is_mouse_pressed: bool,
    is_shift_held: bool,
    yaw_velocity: f32,
    pitch_velocity: f32,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.01,
            damping_factor: 0.1,
            is_mouse_pressed: false,
            is_shift_held: false,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
        }
    }

    pub fn process_events(
        &mut self,
        event: &DeviceEvent,
        window: &Window,
        camera: &mut OrbitCamera,
    ) {
        match event {
            DeviceEvent::Button {
                button: 0, // Left mouse button
                state,
            } => {
                self.is_mouse_pressed = *state == ElementState::Pressed;
            }
            DeviceEvent::MouseWheel { delta, .. } => {
                let scroll_amount = -match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => {
                        *scroll as f32
                    }
                };
                camera.add_distance(scroll_amount * self.zoom_speed);
                window.request_redraw();
            }
            DeviceEvent::MouseMotion { delta } => {
                if self.is_mouse_pressed {
                    if self.is_shift_held {
                        camera.pan((
                            -delta.0 as f32 * self.pan_speed,
                            delta.1 as f32 * self.pan_speed,
                        ));
                    } else {
                        // Drag feeds angular velocity; `update` applies and
                        // decays it so the orbit coasts to a stop.
                        self.yaw_velocity -= delta.0 as f32 * self.rotate_speed;
                        self.pitch_velocity += delta.1 as f32 * self.rotate_speed;
                    }
                    window.request_redraw();
                }
            }
            _ => (),
        }
    }

    pub fn process_keyed_events(&mut self, event: &KeyEvent) {
        if let KeyEvent {
            physical_key: PhysicalKey::Code(KeyCode::ShiftLeft | KeyCode::ShiftRight),
            state,
            ..
        } = event
        {
            self.is_shift_held = *state == ElementState::Pressed;
        }
    }

    /// Advances the damping state one frame. Returns true while the camera
    /// is still coasting.
    pub fn update(&mut self, camera: &mut OrbitCamera) -> bool {
        if self.yaw_velocity.abs() < REST_VELOCITY && self.pitch_velocity.abs() < REST_VELOCITY {
            self.yaw_velocity = 0.0;
            self.pitch_velocity = 0.0;
            return false;
        }

        camera.add_yaw(self.yaw_velocity);
        camera.add_pitch(self.pitch_velocity);

        let retain = 1.0 - self.damping_factor;
        self.yaw_velocity *= retain;
        self.pitch_velocity *= retain;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Vector3, Zero};

    #[test]
    fn damping_decays_velocity_to_rest() {
        let mut controller = CameraController::new(0.005, 0.1);
        let mut camera = OrbitCamera::new(5.0, 0.0, 0.0, Vector3::zero(), 1.0);
        controller.yaw_velocity = 0.1;

        let mut frames = 0;
        while controller.update(&mut camera) {
            frames += 1;
            assert!(frames < 1000, "damping never settled");
        }

        assert_eq!(controller.yaw_velocity, 0.0);
        assert!(camera.yaw > 0.0);
    }

    #[test]
    fn update_is_idle_without_input() {
        let mut controller = CameraController::new(0.005, 0.1);
        let mut camera = OrbitCamera::new(5.0, 0.0, 0.0, Vector3::zero(), 1.0);
        let yaw = camera.yaw;

        assert!(!controller.update(&mut camera));
        assert_eq!(camera.yaw, yaw);
    }
}
