//! Perturbed Keplerian orbits for a single satellite.
//!
//! A host drives two entry points once per tick: [advance_orbit] nudges the
//! orbital elements with every active perturbation, and [project_to_cartesian]
//! turns them into a position and velocity for whoever needs to draw them.

pub mod astro;
pub mod consts;
pub mod math;
pub mod perturbation;

#[cfg(test)]
mod testing_utils;

use astro::{CartesianState, OrbitalState};
use perturbation::{EngineConfig, EphemerisSample, PerturbationEngine, PerturbationSource};

static DEFAULT_ENGINE: PerturbationEngine = PerturbationEngine::new(EngineConfig::DEFAULT);

/// The engine used by [advance_orbit]. It is shared by the whole process, so
/// its diagnostics add up every caller's ticks.
pub fn default_engine() -> &'static PerturbationEngine {
    &DEFAULT_ENGINE
}

/// Applies one tick of perturbations to `state`, using the default engine limits.
pub fn advance_orbit(
    state: &mut OrbitalState,
    dt: f64,
    perturbers: &[(&dyn PerturbationSource, EphemerisSample)],
) {
    advance_orbit_with(&DEFAULT_ENGINE, state, dt, perturbers)
}

/// Same as [advance_orbit], but on an engine the host owns, with its own
/// limits and its own discard counter.
pub fn advance_orbit_with(
    engine: &PerturbationEngine,
    state: &mut OrbitalState,
    dt: f64,
    perturbers: &[(&dyn PerturbationSource, EphemerisSample)],
) {
    engine.step(state, dt, perturbers)
}

/// Position and velocity of the satellite around the primary.
pub fn project_to_cartesian(state: &OrbitalState, mu: f64) -> CartesianState {
    astro::to_cartesian(state, mu)
}
