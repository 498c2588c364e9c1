use nalgebra::Vector3;

use super::{CartesianState, OrbitalState};
use crate::math::geometry::perifocal_to_inertial;

/// Position and velocity of the satellite in its perifocal frame: the orbit
/// lies in the xy plane and x points towards periapsis.
pub fn perifocal_state(state: &OrbitalState, mu: f64) -> CartesianState {
    let a = state.semi_major_axis();
    let ecc = state.eccentricity();
    let (sin_nu, cos_nu) = state.true_anomaly().sin_cos();

    let slr = a * (1.0 - ecc * ecc);
    let radius = slr / (1.0 + ecc * cos_nu);
    let h = (mu * slr).sqrt();

    // Radial and tangential components of the velocity
    let v_r = mu * ecc * sin_nu / h;
    let v_t = mu * (1.0 + ecc * cos_nu) / h;

    let position = Vector3::new(radius * cos_nu, radius * sin_nu, 0.0);
    let velocity = Vector3::new(
        v_r * cos_nu - v_t * sin_nu,
        v_r * sin_nu + v_t * cos_nu,
        0.0,
    );

    CartesianState::new(position, velocity)
}

/// Converts orbital elements into a position and velocity around the primary.
///
/// Does not fail, but the velocity blows up as `a(1 - e^2)` approaches zero;
/// keeping `e` away from 1 is the perturbation engine's job.
pub fn to_cartesian(state: &OrbitalState, mu: f64) -> CartesianState {
    let native = perifocal_state(state, mu);

    // Position and velocity must go through the exact same rotation
    let rotation = perifocal_to_inertial(
        state.inclination(),
        state.long_asc_node(),
        state.arg_periapsis(),
    );

    CartesianState::new(
        rotation * native.position(),
        rotation * native.velocity(),
    )
}
