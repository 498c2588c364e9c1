use std::f64::consts::PI;

use thiserror::Error;

use super::{HasMass, PointMass};
use crate::math::anomaly;
use crate::math::root_finding::RootFindingError;
use crate::perturbation::ElementDelta;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ElementError {
    #[error("semi-major axis must be positive, got {0} m")]
    InvalidSemiMajorAxis(f64),
    #[error("eccentricity must lie in [0, 1), got {0}")]
    InvalidEccentricity(f64),
    #[error("primary mass must be positive, got {0} kg")]
    InvalidPrimaryMass(f64),
    #[error("{element} is not finite")]
    NonFinite { element: &'static str },
}

/// The classical orbital elements of a satellite on a closed orbit, plus the
/// mass of the body it orbits.
///
/// Angles are in radians and are never normalized; anything that consumes them
/// goes through `sin`/`cos`. Lengths are in meters.
///
/// Invariant: `a > 0` and `0 <= e < 1`. Only [OrbitalState::new] and the
/// perturbation engine can change the shape of the orbit, and both keep it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalState {
    semi_major_axis: f64,
    eccentricity: f64,
    inclination: f64,
    long_asc_node: f64,
    arg_periapsis: f64,
    true_anomaly: f64,
    primary_mass: f64,
}

impl OrbitalState {
    pub fn new(
        a: f64,
        ecc: f64,
        incl: f64,
        lan: f64,
        argp: f64,
        true_anomaly: f64,
        primary_mass: f64,
    ) -> Result<Self, ElementError> {
        let state = OrbitalState {
            semi_major_axis: a,
            eccentricity: ecc,
            inclination: incl,
            long_asc_node: lan,
            arg_periapsis: argp,
            true_anomaly,
            primary_mass,
        };
        state.validate()?;
        Ok(state)
    }

    /// Checks the invariants on the elements.
    pub fn validate(&self) -> Result<(), ElementError> {
        let fields = [
            ("semi-major axis", self.semi_major_axis),
            ("eccentricity", self.eccentricity),
            ("inclination", self.inclination),
            ("longitude of ascending node", self.long_asc_node),
            ("argument of periapsis", self.arg_periapsis),
            ("true anomaly", self.true_anomaly),
            ("primary mass", self.primary_mass),
        ];
        if let Some((element, _)) = fields.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ElementError::NonFinite { element: *element });
        }

        if self.semi_major_axis <= 0.0 {
            return Err(ElementError::InvalidSemiMajorAxis(self.semi_major_axis));
        }
        if !(0.0..1.0).contains(&self.eccentricity) {
            return Err(ElementError::InvalidEccentricity(self.eccentricity));
        }
        if self.primary_mass <= 0.0 {
            return Err(ElementError::InvalidPrimaryMass(self.primary_mass));
        }
        Ok(())
    }

    // -- Orbital elements --

    pub fn semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    pub fn inclination(&self) -> f64 {
        self.inclination
    }

    pub fn long_asc_node(&self) -> f64 {
        self.long_asc_node
    }

    pub fn arg_periapsis(&self) -> f64 {
        self.arg_periapsis
    }

    pub fn true_anomaly(&self) -> f64 {
        self.true_anomaly
    }

    pub fn primary_mass(&self) -> f64 {
        self.primary_mass
    }

    pub fn primary(&self) -> PointMass {
        PointMass::with_mass(self.primary_mass)
    }

    // -- Geometric characteristics --

    pub fn semilatus_rectum(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity * self.eccentricity)
    }

    pub fn periapsis(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity)
    }

    pub fn apoapsis(&self) -> f64 {
        self.semi_major_axis * (1.0 + self.eccentricity)
    }

    /// Distance from the primary at the current true anomaly.
    pub fn radius(&self) -> f64 {
        self.semilatus_rectum() / (1.0 + self.eccentricity * self.true_anomaly.cos())
    }

    // -- Physical characteristics --

    pub fn mu(&self) -> f64 {
        self.primary().mu()
    }

    pub fn mean_motion(&self) -> f64 {
        (self.mu() / self.semi_major_axis.powi(3)).sqrt()
    }

    pub fn period(&self) -> f64 {
        2.0 * PI / self.mean_motion()
    }

    pub fn angular_momentum(&self) -> f64 {
        (self.mu() * self.semilatus_rectum()).sqrt()
    }

    pub fn specific_energy(&self) -> f64 {
        -self.mu() / (2.0 * self.semi_major_axis)
    }

    /// Moves the satellite along its (unperturbed) orbit by `dt` seconds.
    ///
    /// The mean anomaly advances linearly; the new true anomaly comes from
    /// solving Kepler's equation. The result lies in (-pi, pi].
    pub fn advance_anomaly(&mut self, dt: f64) -> Result<(), RootFindingError> {
        let ecc = self.eccentricity;
        let mean_anomaly = anomaly::true_to_mean(self.true_anomaly, ecc);
        let mean_anomaly = (mean_anomaly + self.mean_motion() * dt).rem_euclid(2.0 * PI);
        self.true_anomaly = anomaly::mean_to_true(mean_anomaly, ecc)?;
        Ok(())
    }

    // -- Mutation, reserved for the perturbation engine --

    pub(crate) fn apply_delta(&mut self, delta: &ElementDelta) {
        self.long_asc_node += delta.long_asc_node;
        self.arg_periapsis += delta.arg_periapsis;
        self.eccentricity += delta.eccentricity;
        self.inclination += delta.inclination;
        self.semi_major_axis += delta.semi_major_axis;
    }

    /// Pulls `e` back into `[0, max_eccentricity)` and `a` up to `min_semi_major_axis`.
    /// Returns whether anything had to move.
    pub(crate) fn clamp_shape(&mut self, max_eccentricity: f64, min_semi_major_axis: f64) -> bool {
        let mut clamped = false;

        let ecc_ceiling = max_eccentricity * (1.0 - f64::EPSILON);
        if self.eccentricity < 0.0 {
            self.eccentricity = 0.0;
            clamped = true;
        } else if self.eccentricity > ecc_ceiling {
            self.eccentricity = ecc_ceiling;
            clamped = true;
        }

        if self.semi_major_axis < min_semi_major_axis {
            self.semi_major_axis = min_semi_major_axis;
            clamped = true;
        }

        clamped
    }
}
