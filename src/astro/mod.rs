//! Keplerian orbit description for a single satellite.
//!
//! The important types in this module are:
//! - [OrbitalState], the classical-element record that perturbation sources
//!   nudge every tick
//! - [CartesianState], a position and velocity derived from it on demand
//!   by [to_cartesian]

mod elements;
mod state;
mod transform;

// Newton's gravitational constant, in N m^2 / kg^2
pub const NEWTON_G: f64 = 6.6743015e-11;

pub use elements::{ElementError, OrbitalState};
pub use state::CartesianState;
pub use transform::{perifocal_state, to_cartesian};

/// A point mass with no other physical properties.
///
/// Useful for satisfying a [HasMass] trait bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMass(f64);

/// A trait indicating this object can be used in physical computations that
/// require a massive body.
pub trait HasMass {
    /// The mass of this object, in kg
    fn mass(&self) -> f64;

    /// The standard gravitational parameter of this object
    fn mu(&self) -> f64 {
        NEWTON_G * self.mass()
    }
}

impl PointMass {
    pub fn with_mass(mass: f64) -> Self {
        Self(mass)
    }

    pub fn with_mu(mu: f64) -> Self {
        Self(mu / NEWTON_G)
    }
}

impl HasMass for PointMass {
    fn mass(&self) -> f64 {
        self.0
    }
}

impl<T> HasMass for &T
where
    T: HasMass,
{
    fn mass(&self) -> f64 {
        (*self).mass()
    }
}
