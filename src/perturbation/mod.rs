//! Small, closed-form nudges to the orbital elements from outside influences.
//!
//! Each [PerturbationSource] looks at the current [OrbitalState] and returns an
//! [ElementDelta] without touching the state itself. The [PerturbationEngine]
//! sums the deltas of every source for the tick and is the only thing that
//! writes them back.

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use nalgebra::Vector3;
use thiserror::Error;

use crate::astro::OrbitalState;

mod engine;
mod oblateness;
mod third_body;

pub use engine::{EngineConfig, PerturbationEngine};
pub use oblateness::OblatenessSource;
pub use third_body::{ElementCoefficients, ThirdBodyConfig, ThirdBodySource};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PerturbationError {
    #[error("perturber is {separation:.0} m away, closer than the {minimum:.0} m minimum")]
    DegenerateGeometry { separation: f64, minimum: f64 },
    #[error("{source_name} produced a non-finite adjustment: {delta:?}")]
    NonFiniteResult {
        source_name: String,
        delta: ElementDelta,
    },
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Where an external body is at the current tick, in meters from the primary.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EphemerisSample {
    position: Vector3<f64>,
}

impl EphemerisSample {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self::from_position(Vector3::new(x, y, z))
    }

    pub fn from_position(position: Vector3<f64>) -> Self {
        EphemerisSample { position }
    }

    pub fn position(&self) -> Vector3<f64> {
        self.position
    }
}

/// Signed increments to the orbital elements, radians and meters.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ElementDelta {
    pub long_asc_node: f64,
    pub arg_periapsis: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub semi_major_axis: f64,
}

impl ElementDelta {
    pub fn zero() -> Self {
        Self::default()
    }

    fn components(&self) -> [f64; 5] {
        [
            self.long_asc_node,
            self.arg_periapsis,
            self.eccentricity,
            self.inclination,
            self.semi_major_axis,
        ]
    }

    pub fn is_zero(&self) -> bool {
        self.components().iter().all(|x| *x == 0.0)
    }

    pub fn is_finite(&self) -> bool {
        self.components().iter().all(|x| x.is_finite())
    }

    /// Shrinks the shape-changing parts of this delta so that applying it
    /// alone to `state` can't take `e` out of [0, 1) or `a` to zero.
    ///
    /// Non-finite deltas come back unchanged, so the engine still sees and
    /// discards them.
    pub fn bounded_for(mut self, state: &OrbitalState) -> Self {
        if !self.is_finite() {
            return self;
        }
        let ecc = state.eccentricity();
        // Go at most halfway to e = 1, or at most halve a
        self.eccentricity = self.eccentricity.max(-ecc).min((1.0 - ecc) / 2.0);
        self.semi_major_axis = self.semi_major_axis.max(-state.semi_major_axis() / 2.0);
        self
    }
}

impl Add for ElementDelta {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        ElementDelta {
            long_asc_node: self.long_asc_node + other.long_asc_node,
            arg_periapsis: self.arg_periapsis + other.arg_periapsis,
            eccentricity: self.eccentricity + other.eccentricity,
            inclination: self.inclination + other.inclination,
            semi_major_axis: self.semi_major_axis + other.semi_major_axis,
        }
    }
}

impl AddAssign for ElementDelta {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sum for ElementDelta {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

/// Something that disturbs a Keplerian orbit.
///
/// Implementations must be stateless: the same inputs always give the same
/// delta, and nothing is mutated. `perturber` is the position of whatever
/// body drives the source; sources that aren't driven by a body ignore it.
pub trait PerturbationSource: Send + Sync {
    fn name(&self) -> &str;

    fn compute_adjustment(
        &self,
        state: &OrbitalState,
        primary_mass: f64,
        perturber: &EphemerisSample,
        dt: f64,
    ) -> ElementDelta;
}
