//! Camera auto-framing for newly loaded models.
//!
//! Given a model of arbitrary extent, computes the orbit-camera distance
//! that fits the whole model inside the vertical field of view, re-centers
//! the model on the world origin so the rotate commands pivot around its
//! visual center, and bounds the zoom-out range.

use cgmath::{InnerSpace, Rad, Vector3, Zero};

use super::camera::orbit_camera::OrbitCamera;
use super::scene::model::Model;

/// Axis-aligned bounding box over a set of points.
///
/// Recomputed on every load; never stored on the model itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl BoundingBox {
    /// An empty box, the identity for [`BoundingBox::extend`].
    pub fn empty() -> Self {
        Self {
            min: Vector3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Vector3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vector3<f32>>) -> Self {
        let mut bounds = Self::empty();
        for point in points {
            bounds.extend(point);
        }
        bounds
    }

    pub fn extend(&mut self, point: Vector3<f32>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    /// True if no point has been added yet.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    pub fn center(&self) -> Vector3<f32> {
        if self.is_empty() {
            return Vector3::zero();
        }
        (self.min + self.max) / 2.0
    }

    /// Euclidean length of the box diagonal. Zero for empty or
    /// single-point boxes.
    pub fn diagonal(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        (self.max - self.min).magnitude()
    }
}

/// Minimal camera distance that fits a bounding-box diagonal inside the
/// vertical field of view, scaled by the framing margin.
///
/// `fovy` must lie in `(0, PI)`, which the perspective projection already
/// requires, so `tan(fovy / 2)` is strictly positive and the division is
/// always defined. A zero diagonal (degenerate model) yields distance zero
/// rather than an error.
pub fn fitting_distance(diagonal: f32, fovy: Rad<f32>, margin: f32) -> f32 {
    margin * diagonal / (2.0 * (fovy.0 / 2.0).tan())
}

/// Frames `model` in `camera`: re-centers the model on the origin and moves
/// the camera onto the +Z axis at the fitting distance.
///
/// The bounding box is taken in world space, with the model's current
/// transform applied. Re-centering an already-centered model is a no-op.
/// The orbit zoom-out bound is set to twice the framing distance so the
/// model cannot shrink to an indistinguishable speck.
pub fn frame_model(model: &mut Model, camera: &mut OrbitCamera, margin: f32) {
    let bounds = model.world_bounds();
    let center = bounds.center();
    model.translate(-center);

    let distance = fitting_distance(bounds.diagonal(), camera.fovy, margin);

    camera.target = Vector3::zero();
    camera.pitch = 0.0;
    camera.yaw = 0.0;
    camera.bounds.max_distance = Some(distance * 2.0);
    camera.set_distance(distance);

    log::debug!(
        "framed model: diagonal {:.3}, camera distance {:.3}",
        bounds.diagonal(),
        distance
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::model::{Mesh, Model};
    use approx::assert_relative_eq;
    use cgmath::Deg;

    fn unit_cube_model() -> Model {
        // Corners (-1,-1,-1)..(1,1,1), two triangles are enough for bounds.
        let positions = vec![
            -1.0, -1.0, -1.0, //
            1.0, 1.0, 1.0, //
            1.0, -1.0, -1.0, //
            -1.0, 1.0, 1.0,
        ];
        let normals = vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0];
        let indices = vec![0, 1, 2, 0, 3, 1];
        Model::new("cube".into(), vec![Mesh::new(positions, normals, indices)])
    }

    #[test]
    fn bounding_box_from_points() {
        let bounds = BoundingBox::from_points([
            Vector3::new(-1.0, 2.0, 0.5),
            Vector3::new(3.0, -4.0, 0.0),
            Vector3::new(0.0, 0.0, -2.0),
        ]);
        assert_eq!(bounds.min, Vector3::new(-1.0, -4.0, -2.0));
        assert_eq!(bounds.max, Vector3::new(3.0, 2.0, 0.5));
        assert_eq!(bounds.center(), Vector3::new(1.0, -1.0, -0.75));
    }

    #[test]
    fn empty_box_is_degenerate() {
        let bounds = BoundingBox::empty();
        assert!(bounds.is_empty());
        assert_eq!(bounds.diagonal(), 0.0);
        assert_eq!(bounds.center(), Vector3::zero());
    }

    #[test]
    fn single_point_box_has_zero_diagonal() {
        let bounds = BoundingBox::from_points([Vector3::new(4.0, -1.0, 2.0)]);
        assert!(!bounds.is_empty());
        assert_eq!(bounds.diagonal(), 0.0);
        assert_eq!(bounds.center(), Vector3::new(4.0, -1.0, 2.0));
    }

    #[test]
    fn fitting_distance_matches_formula() {
        // Cube (-1,-1,-1)..(1,1,1): diagonal 2*sqrt(3), fov 75 deg, margin 1.5.
        let diagonal = 2.0 * 3.0_f32.sqrt();
        let fovy: Rad<f32> = Deg(75.0).into();
        let distance = fitting_distance(diagonal, fovy, 1.5);
        let expected = 1.5 * diagonal / (2.0 * (fovy.0 / 2.0).tan());
        assert_relative_eq!(distance, expected);
        assert_relative_eq!(distance, 3.386, epsilon = 1e-3);
    }

    #[test]
    fn fitting_distance_monotonicity() {
        let fov: Rad<f32> = Deg(60.0).into();
        let wider: Rad<f32> = Deg(90.0).into();
        // Increasing in diagonal and margin.
        assert!(fitting_distance(2.0, fov, 1.5) > fitting_distance(1.0, fov, 1.5));
        assert!(fitting_distance(1.0, fov, 2.0) > fitting_distance(1.0, fov, 1.5));
        // Decreasing in field of view.
        assert!(fitting_distance(1.0, wider, 1.5) < fitting_distance(1.0, fov, 1.5));
    }

    #[test]
    fn fitting_distance_zero_for_degenerate() {
        let fovy: Rad<f32> = Deg(75.0).into();
        assert_eq!(fitting_distance(0.0, fovy, 1.5), 0.0);
    }

    #[test]
    fn frame_model_centers_and_positions_camera() {
        let mut model = unit_cube_model();
        // Shift the model away from the origin first.
        model.translate(Vector3::new(5.0, -2.0, 1.0));
        let mut camera = OrbitCamera::new(5.0, 0.0, 0.0, Vector3::zero(), 1.0);
        camera.fovy = Deg(75.0).into();

        frame_model(&mut model, &mut camera, 1.5);

        // Bounding-box center moved back to the origin.
        let recentered = model.world_bounds();
        assert_relative_eq!(recentered.center().x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(recentered.center().y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(recentered.center().z, 0.0, epsilon = 1e-5);

        // Camera sits on the +Z axis at the fitting distance.
        assert_relative_eq!(camera.distance, 3.386, epsilon = 1e-3);
        assert_relative_eq!(camera.eye.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(camera.eye.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(camera.eye.z, camera.distance, epsilon = 1e-4);
        assert_eq!(camera.target, Vector3::zero());
        assert_eq!(camera.bounds.max_distance, Some(camera.distance * 2.0));
    }

    #[test]
    fn recentering_is_idempotent() {
        let mut model = unit_cube_model();
        let mut camera = OrbitCamera::new(5.0, 0.0, 0.0, Vector3::zero(), 1.0);

        frame_model(&mut model, &mut camera, 1.5);
        let position = model.position;
        frame_model(&mut model, &mut camera, 1.5);

        assert_relative_eq!(model.position.x, position.x, epsilon = 1e-5);
        assert_relative_eq!(model.position.y, position.y, epsilon = 1e-5);
        assert_relative_eq!(model.position.z, position.z, epsilon = 1e-5);
    }

    #[test]
    fn degenerate_model_frames_at_zero_distance() {
        let mesh = Mesh::new(vec![2.0, 3.0, 4.0], vec![0.0, 1.0, 0.0], vec![0]);
        let mut model = Model::new("point".into(), vec![mesh]);
        let mut camera = OrbitCamera::new(5.0, 0.0, 0.0, Vector3::zero(), 1.0);

        frame_model(&mut model, &mut camera, 1.5);

        assert_eq!(camera.distance, 0.0);
        // The single point itself is recentered onto the origin.
        assert_relative_eq!(model.world_bounds().center().x, 0.0, epsilon = 1e-5);
    }
}
