use super::{ElementDelta, EphemerisSample, PerturbationSource};
use crate::astro::{HasMass, OrbitalState, PointMass};
use crate::consts::{EARTH_J2, EARTH_RADIUS};

/// Secular drift of the node and periapsis caused by the primary's equatorial bulge.
///
/// Uses the first-order J2 rates, so only Ω and ω move:
///   dΩ/dt = -3/2 n J2 (R/p)^2 cos(i)
///   dω/dt =  3/4 n J2 (R/p)^2 (5 cos^2(i) - 1)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OblatenessSource {
    j2: f64,
    body_radius: f64,
}

impl OblatenessSource {
    pub fn new(j2: f64, body_radius: f64) -> Self {
        OblatenessSource { j2, body_radius }
    }

    pub fn earth() -> Self {
        Self::new(EARTH_J2, EARTH_RADIUS)
    }

    /// Returns (dΩ/dt, dω/dt) in rad/s.
    pub fn secular_rates(&self, state: &OrbitalState, primary_mass: f64) -> (f64, f64) {
        let a = state.semi_major_axis();
        let mu = PointMass::with_mass(primary_mass).mu();
        let n = (mu / a.powi(3)).sqrt();
        let cos_i = state.inclination().cos();

        let factor = n * self.j2 * (self.body_radius / state.semilatus_rectum()).powi(2);
        (
            -1.5 * factor * cos_i,
            0.75 * factor * (5.0 * cos_i * cos_i - 1.0),
        )
    }
}

impl PerturbationSource for OblatenessSource {
    fn name(&self) -> &str {
        "oblateness"
    }

    fn compute_adjustment(
        &self,
        state: &OrbitalState,
        primary_mass: f64,
        _perturber: &EphemerisSample,
        dt: f64,
    ) -> ElementDelta {
        // Below the surface the expansion means nothing
        if primary_mass <= 0.0 || state.periapsis() <= self.body_radius {
            return ElementDelta::zero();
        }

        let (node_rate, periapsis_rate) = self.secular_rates(state, primary_mass);
        ElementDelta {
            long_asc_node: node_rate * dt,
            arg_periapsis: periapsis_rate * dt,
            ..ElementDelta::zero()
        }
    }
}
