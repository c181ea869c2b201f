//! Scene state: the camera and the single active model slot.

use std::f32::consts::FRAC_PI_4;

use cgmath::Rad;

use crate::gfx::camera::camera_utils::CameraManager;

use super::model::Model;

/// Fixed increment applied by each rotate command.
pub const ROTATE_STEP: Rad<f32> = Rad(FRAC_PI_4);

/// The viewer scene.
///
/// Holds at most one model at a time; attaching a replacement detaches and
/// drops the previous one in the same step, so a render frame never sees a
/// half-swapped scene.
pub struct Scene {
    pub camera_manager: CameraManager,
    model: Option<Model>,
}

impl Scene {
    pub fn new(camera_manager: CameraManager) -> Self {
        Self {
            camera_manager,
            model: None,
        }
    }

    /// Recomputes camera matrices. Called once per frame.
    pub fn update(&mut self) {
        self.camera_manager.camera.update_view_proj();
    }

    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Installs `model` as the active model, dropping any previous one.
    pub fn attach_model(&mut self, model: Model) {
        if let Some(old) = self.model.replace(model) {
            log::debug!("replaced model \"{}\"", old.name);
        }
    }

    /// Removes and returns the active model, leaving the scene empty.
    pub fn detach_model(&mut self) -> Option<Model> {
        self.model.take()
    }

    /// Rotates the active model a quarter-π about its local X axis.
    /// No-op when no model is loaded.
    pub fn rotate_model_x(&mut self) {
        if let Some(model) = self.model.as_mut() {
            model.rotate_x(ROTATE_STEP);
        }
    }

    /// Rotates the active model a quarter-π about its local Y axis.
    /// No-op when no model is loaded.
    pub fn rotate_model_y(&mut self) {
        if let Some(model) = self.model.as_mut() {
            model.rotate_y(ROTATE_STEP);
        }
    }

    /// Rotates the active model a quarter-π about its local Z axis.
    /// No-op when no model is loaded.
    pub fn rotate_model_z(&mut self) {
        if let Some(model) = self.model.as_mut() {
            model.rotate_z(ROTATE_STEP);
        }
    }

    /// Syncs the model transform uniform to the GPU when it changed.
    pub fn sync_transforms(&mut self, queue: &wgpu::Queue) {
        if let Some(model) = self.model.as_mut() {
            model.update_transform(queue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::{camera_controller::CameraController, orbit_camera::OrbitCamera};
    use crate::gfx::scene::model::Mesh;
    use approx::assert_relative_eq;
    use cgmath::{Vector3, Zero};

    fn empty_scene() -> Scene {
        let camera = OrbitCamera::new(5.0, 0.0, 0.0, Vector3::zero(), 1.0);
        let controller = CameraController::new(0.005, 0.1);
        Scene::new(CameraManager::new(camera, controller))
    }

    fn test_model() -> Model {
        let mesh = Mesh::new(
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
            vec![0, 1, 2],
        );
        Model::new("test".into(), vec![mesh])
    }

    #[test]
    fn rotate_commands_are_noops_without_model() {
        let mut scene = empty_scene();
        let eye_before = scene.camera_manager.camera.eye;
        let distance_before = scene.camera_manager.camera.distance;

        scene.rotate_model_x();
        scene.rotate_model_y();
        scene.rotate_model_z();

        assert!(!scene.has_model());
        assert_eq!(scene.camera_manager.camera.eye, eye_before);
        assert_eq!(scene.camera_manager.camera.distance, distance_before);
    }

    #[test]
    fn rotate_commands_step_by_quarter_pi() {
        let mut scene = empty_scene();
        scene.attach_model(test_model());

        scene.rotate_model_y();
        assert_relative_eq!(
            scene.model().unwrap().rotation.y,
            FRAC_PI_4,
            epsilon = 1e-6
        );

        scene.rotate_model_y();
        assert_relative_eq!(
            scene.model().unwrap().rotation.y,
            2.0 * FRAC_PI_4,
            epsilon = 1e-6
        );
    }

    #[test]
    fn attach_replaces_previous_model() {
        let mut scene = empty_scene();
        scene.attach_model(test_model());
        let mut replacement = test_model();
        replacement.name = "second".into();

        scene.attach_model(replacement);

        assert_eq!(scene.model().unwrap().name, "second");
    }

    #[test]
    fn detach_empties_the_slot() {
        let mut scene = empty_scene();
        scene.attach_model(test_model());

        let detached = scene.detach_model();

        assert!(detached.is_some());
        assert!(!scene.has_model());
        assert!(scene.detach_model().is_none());
    }
}
