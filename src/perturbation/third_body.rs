use log::trace;
use nalgebra::Vector3;

use super::{ElementDelta, EphemerisSample, PerturbationError, PerturbationSource};
use crate::astro::{to_cartesian, HasMass, OrbitalState, PointMass};
use crate::consts::{ASTRONOMICAL_UNIT, LUNAR_DISTANCE, MOON_MASS, SUN_MASS};

// Steps longer than this get no extra attenuation
const REFERENCE_STEP: f64 = 1.0;

/// Per-element weights applied on top of the source's strength.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementCoefficients {
    pub long_asc_node: f64,
    pub arg_periapsis: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub semi_major_axis: f64,
}

impl ElementCoefficients {
    pub fn scaled(&self, factor: f64) -> Self {
        ElementCoefficients {
            long_asc_node: self.long_asc_node * factor,
            arg_periapsis: self.arg_periapsis * factor,
            eccentricity: self.eccentricity * factor,
            inclination: self.inclination * factor,
            semi_major_axis: self.semi_major_axis * factor,
        }
    }
}

const LUNAR_COEFFICIENTS: ElementCoefficients = ElementCoefficients {
    long_asc_node: 1e-3,
    arg_periapsis: 1e-3,
    eccentricity: 1e-6,
    inclination: 1e-6,
    semi_major_axis: 1e2,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ThirdBodyConfig {
    pub name: String,
    /// Mass of the perturbing body, kg
    pub perturber_mass: f64,
    /// Nominal distance between the primary and the perturbing body, m
    pub reference_distance: f64,
    pub scale_constant: f64,
    pub min_proximity: f64,
    pub max_proximity: f64,
    pub coefficients: ElementCoefficients,
    /// Below these separations the source switches itself off
    pub min_satellite_separation: f64,
    pub min_primary_separation: f64,
}

impl ThirdBodyConfig {
    pub fn lunar() -> Self {
        ThirdBodyConfig {
            name: "lunar".to_owned(),
            perturber_mass: MOON_MASS,
            reference_distance: LUNAR_DISTANCE,
            scale_constant: 1e-3,
            min_proximity: 0.1,
            max_proximity: 10.0,
            coefficients: LUNAR_COEFFICIENTS,
            min_satellite_separation: 1e7,
            min_primary_separation: 1e8,
        }
    }

    /// The Sun is far heavier but far weaker in effect, so both the scale and
    /// the coefficients are a thousand times smaller than the Moon's.
    pub fn solar() -> Self {
        ThirdBodyConfig {
            name: "solar".to_owned(),
            perturber_mass: SUN_MASS,
            reference_distance: ASTRONOMICAL_UNIT,
            scale_constant: 1e-6,
            coefficients: LUNAR_COEFFICIENTS.scaled(1e-3),
            ..Self::lunar()
        }
    }
}

/// Perturbation from a distant massive body, like the Sun or the Moon.
///
/// This is an order-of-magnitude stand-in, not a real perturbation theory:
/// the strength scales with the mass ratio, how far out the satellite is and
/// how close the perturber is, and each element gets its own shape function.
#[derive(Debug, Clone)]
pub struct ThirdBodySource {
    config: ThirdBodyConfig,
}

impl ThirdBodySource {
    pub fn new(config: ThirdBodyConfig) -> Self {
        ThirdBodySource { config }
    }

    pub fn solar() -> Self {
        Self::new(ThirdBodyConfig::solar())
    }

    pub fn lunar() -> Self {
        Self::new(ThirdBodyConfig::lunar())
    }

    pub fn config(&self) -> &ThirdBodyConfig {
        &self.config
    }

    /// Overall strength of the perturbation, before any time scaling.
    ///
    /// Fails when the perturber is too close to either the satellite or the
    /// primary, since the inverse distances blow up there.
    pub fn strength(
        &self,
        satellite: &Vector3<f64>,
        perturber: &Vector3<f64>,
        primary_mass: f64,
    ) -> Result<f64, PerturbationError> {
        let config = &self.config;

        let to_perturber = (perturber - satellite).norm();
        if to_perturber < config.min_satellite_separation {
            return Err(PerturbationError::DegenerateGeometry {
                separation: to_perturber,
                minimum: config.min_satellite_separation,
            });
        }

        let from_primary = perturber.norm();
        if from_primary < config.min_primary_separation {
            return Err(PerturbationError::DegenerateGeometry {
                separation: from_primary,
                minimum: config.min_primary_separation,
            });
        }

        let mass_ratio = config.perturber_mass / primary_mass;
        let distance_ratio = satellite.norm() / config.reference_distance;
        let proximity = (config.reference_distance / to_perturber)
            .max(config.min_proximity)
            .min(config.max_proximity);

        Ok(mass_ratio * distance_ratio * proximity * config.scale_constant)
    }
}

impl PerturbationSource for ThirdBodySource {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn compute_adjustment(
        &self,
        state: &OrbitalState,
        primary_mass: f64,
        perturber: &EphemerisSample,
        dt: f64,
    ) -> ElementDelta {
        if primary_mass <= 0.0 {
            return ElementDelta::zero();
        }

        let mu = PointMass::with_mass(primary_mass).mu();
        let satellite = to_cartesian(state, mu).position();
        let strength = match self.strength(&satellite, &perturber.position(), primary_mass) {
            Ok(strength) => strength,
            Err(err) => {
                trace!("{} perturbation skipped: {}", self.config.name, err);
                return ElementDelta::zero();
            }
        };

        let time_scale = (dt.abs() / REFERENCE_STEP).min(1.0);
        let factor = strength * time_scale * dt;

        let coeffs = &self.config.coefficients;
        let ecc = state.eccentricity();
        let nu = state.true_anomaly();

        ElementDelta {
            long_asc_node: factor * coeffs.long_asc_node * state.inclination().cos(),
            arg_periapsis: factor * coeffs.arg_periapsis * (1.0 - ecc * ecc),
            eccentricity: factor * coeffs.eccentricity * (2.0 * nu).cos(),
            inclination: factor * coeffs.inclination * nu.sin(),
            semi_major_axis: factor * coeffs.semi_major_axis * (2.0 * nu).sin(),
        }
        .bounded_for(state)
    }
}
