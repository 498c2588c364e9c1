use nalgebra::Vector3;

/// A position and velocity in the primary body's inertial frame.
///
/// This is always derived from an [OrbitalState](super::OrbitalState) and is
/// not meant to be held onto across ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartesianState {
    position: Vector3<f64>,
    velocity: Vector3<f64>,
}

impl CartesianState {
    pub fn new(position: Vector3<f64>, velocity: Vector3<f64>) -> Self {
        CartesianState { position, velocity }
    }

    pub fn position(&self) -> Vector3<f64> {
        self.position
    }

    pub fn velocity(&self) -> Vector3<f64> {
        self.velocity
    }

    pub fn radius(&self) -> f64 {
        self.position.norm()
    }

    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }

    /// Specific angular momentum, r x v
    pub fn angular_momentum(&self) -> Vector3<f64> {
        self.position.cross(&self.velocity)
    }

    pub fn specific_energy(&self, mu: f64) -> f64 {
        // KE = 1/2 v^2, PE = - mu/r
        self.velocity.norm_squared() / 2.0 - mu / self.radius()
    }

    pub fn is_finite(&self) -> bool {
        self.position.iter().chain(self.velocity.iter()).all(|x| x.is_finite())
    }
}
