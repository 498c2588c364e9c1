use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, warn};

use super::{ElementDelta, EphemerisSample, PerturbationError, PerturbationSource};
use crate::astro::OrbitalState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Eccentricity is always kept strictly below this
    pub max_eccentricity: f64,
    /// Floor for the semi-major axis, in meters
    pub min_semi_major_axis: f64,
}

impl EngineConfig {
    pub const DEFAULT: EngineConfig = EngineConfig {
        max_eccentricity: 0.999,
        min_semi_major_axis: 1.0,
    };

    pub fn new(max_eccentricity: f64, min_semi_major_axis: f64) -> Result<Self, PerturbationError> {
        if !(max_eccentricity > 0.0 && max_eccentricity < 1.0) {
            return Err(PerturbationError::InvalidConfig(
                "max eccentricity must lie strictly between 0 and 1",
            ));
        }
        if !(min_semi_major_axis > 0.0 && min_semi_major_axis.is_finite()) {
            return Err(PerturbationError::InvalidConfig(
                "min semi-major axis must be positive and finite",
            ));
        }
        Ok(EngineConfig {
            max_eccentricity,
            min_semi_major_axis,
        })
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Applies the combined effect of several perturbation sources to an orbit,
/// one tick at a time.
///
/// The engine holds no per-orbit state, so one engine can step any number of
/// independent orbits, from any number of threads. The only thing it keeps
/// track of is how many contributions it had to throw away.
#[derive(Debug)]
pub struct PerturbationEngine {
    config: EngineConfig,
    discarded: AtomicU64,
}

impl PerturbationEngine {
    pub const fn new(config: EngineConfig) -> Self {
        PerturbationEngine {
            config,
            discarded: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of source contributions dropped so far for being non-finite.
    ///
    /// When the contributions are finite on their own but their sum, or the
    /// orbit they produce, is not, every one of them counts as dropped.
    pub fn discarded_contributions(&self) -> u64 {
        self.discarded.load(Ordering::Relaxed)
    }

    /// Advances `state` by one tick of length `dt`.
    ///
    /// Every source is evaluated against the state as it was at the start of
    /// the tick, so the order of `sources` does not matter. A source that
    /// returns NaN or infinity is ignored for this tick. If the surviving
    /// contributions overflow together, the whole tick is skipped.
    pub fn step(
        &self,
        state: &mut OrbitalState,
        dt: f64,
        sources: &[(&dyn PerturbationSource, EphemerisSample)],
    ) {
        let primary_mass = state.primary_mass();

        let mut total = ElementDelta::zero();
        let mut accepted = 0;
        for (source, perturber) in sources {
            let delta = source.compute_adjustment(state, primary_mass, perturber, dt);
            match vet(*source, delta) {
                Ok(delta) => {
                    total += delta;
                    accepted += 1;
                }
                Err(err) => self.discard(1, &err),
            }
        }

        if total.is_zero() {
            return;
        }

        let mut next = *state;
        next.apply_delta(&total);
        let clamped = next.clamp_shape(self.config.max_eccentricity, self.config.min_semi_major_axis);
        if let Err(err) = next.validate() {
            self.discard(accepted, &err);
            return;
        }

        if clamped {
            debug!(
                "clamped orbit shape to a = {} m, e = {}",
                next.semi_major_axis(),
                next.eccentricity()
            );
        }
        *state = next;
    }

    // Only the first discard gets a warning; a source that stays broken would
    // otherwise log on every tick.
    fn discard(&self, count: u64, err: &dyn std::error::Error) {
        let previous = self.discarded.fetch_add(count, Ordering::Relaxed);
        if previous == 0 {
            warn!("discarding contribution: {} (further discards logged at debug)", err);
        } else {
            debug!("discarding contribution: {}", err);
        }
    }
}

impl Default for PerturbationEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

fn vet(source: &dyn PerturbationSource, delta: ElementDelta) -> Result<ElementDelta, PerturbationError> {
    if delta.is_finite() {
        Ok(delta)
    } else {
        Err(PerturbationError::NonFiniteResult {
            source_name: source.name().to_owned(),
            delta,
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::consts::{ASTRONOMICAL_UNIT, EARTH_MASS, LUNAR_DISTANCE};
    use crate::perturbation::{OblatenessSource, ThirdBodySource};

    /// Always hands back the same delta.
    struct Fixed(ElementDelta);

    impl PerturbationSource for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn compute_adjustment(
            &self,
            _state: &OrbitalState,
            _primary_mass: f64,
            _perturber: &EphemerisSample,
            _dt: f64,
        ) -> ElementDelta {
            self.0
        }
    }

    fn leo() -> OrbitalState {
        OrbitalState::new(7_000_000.0, 0.01, 0.9, 0.0, 0.0, 0.0, EARTH_MASS).unwrap()
    }

    fn pump(eccentricity: f64) -> Fixed {
        Fixed(ElementDelta {
            eccentricity,
            ..ElementDelta::zero()
        })
    }

    #[test]
    fn test_config_validation() {
        assert!(EngineConfig::new(0.9, 10.0).is_ok());
        assert!(EngineConfig::new(1.0, 10.0).is_err());
        assert!(EngineConfig::new(0.0, 10.0).is_err());
        assert!(EngineConfig::new(f64::NAN, 10.0).is_err());
        assert!(EngineConfig::new(0.9, 0.0).is_err());
        assert_eq!(EngineConfig::default(), EngineConfig::new(0.999, 1.0).unwrap());
    }

    #[test]
    fn test_zero_perturbation_is_identity() {
        let engine = PerturbationEngine::default();
        let zero = Fixed(ElementDelta::zero());
        let negative_zero = Fixed(ElementDelta {
            semi_major_axis: -0.0,
            ..ElementDelta::zero()
        });

        let original = OrbitalState::new(7e6, 0.01, -0.0, 0.0, -0.0, 0.0, EARTH_MASS).unwrap();
        let mut state = original;
        for _ in 0..100 {
            engine.step(
                &mut state,
                1.0,
                &[
                    (&zero, EphemerisSample::default()),
                    (&negative_zero, EphemerisSample::default()),
                ],
            );
        }
        assert_eq!(
            format!("{:?}", state),
            format!("{:?}", original),
        );
        assert_eq!(state.inclination().to_bits(), original.inclination().to_bits());
        assert_eq!(state.arg_periapsis().to_bits(), original.arg_periapsis().to_bits());

        // No sources at all is the same thing
        engine.step(&mut state, 1.0, &[]);
        assert_eq!(state, original);
    }

    #[test]
    fn test_deltas_are_summed() {
        let engine = PerturbationEngine::default();
        let a = Fixed(ElementDelta {
            long_asc_node: 0.01,
            semi_major_axis: 10.0,
            ..ElementDelta::zero()
        });
        let b = Fixed(ElementDelta {
            long_asc_node: 0.02,
            inclination: -0.1,
            ..ElementDelta::zero()
        });

        let mut state = leo();
        engine.step(&mut state, 1.0, &[(&a, EphemerisSample::default()), (&b, EphemerisSample::default())]);
        assert_relative_eq!(state.long_asc_node(), 0.03);
        assert_relative_eq!(state.inclination(), 0.8);
        assert_relative_eq!(state.semi_major_axis(), 7_000_010.0);
        assert_eq!(state.eccentricity(), 0.01);
    }

    #[test]
    fn test_order_independence() {
        let engine = PerturbationEngine::default();
        let sun = ThirdBodySource::solar();
        let moon = ThirdBodySource::lunar();
        let j2 = OblatenessSource::earth();

        let sun_at = EphemerisSample::new(ASTRONOMICAL_UNIT, 0.0, 0.0);
        let moon_at = EphemerisSample::new(0.0, LUNAR_DISTANCE, 0.0);

        let mut forward = OrbitalState::new(7e6, 0.05, 0.9, 0.0, 0.0, 0.7, EARTH_MASS).unwrap();
        let mut backward = forward;
        for _ in 0..10 {
            engine.step(
                &mut forward,
                30.0,
                &[(&sun, sun_at), (&moon, moon_at), (&j2, EphemerisSample::default())],
            );
            engine.step(
                &mut backward,
                30.0,
                &[(&j2, EphemerisSample::default()), (&moon, moon_at), (&sun, sun_at)],
            );
        }

        assert_relative_eq!(forward.long_asc_node(), backward.long_asc_node(), max_relative = 1e-12);
        assert_relative_eq!(forward.arg_periapsis(), backward.arg_periapsis(), max_relative = 1e-12);
        assert_relative_eq!(forward.semi_major_axis(), backward.semi_major_axis(), max_relative = 1e-12);
        assert_relative_eq!(forward.eccentricity(), backward.eccentricity(), max_relative = 1e-12);
        assert_relative_eq!(forward.inclination(), backward.inclination(), max_relative = 1e-12);
    }

    #[test]
    fn test_eccentricity_never_reaches_limit() {
        let engine = PerturbationEngine::default();
        let source = pump(0.3);

        let mut state = leo();
        for _ in 0..1000 {
            engine.step(&mut state, 1.0, &[(&source, EphemerisSample::default())]);
            assert!(state.eccentricity() < engine.config().max_eccentricity);
            assert!(state.validate().is_ok());
        }

        // And it doesn't go negative either
        let source = pump(-5.0);
        engine.step(&mut state, 1.0, &[(&source, EphemerisSample::default())]);
        assert_eq!(state.eccentricity(), 0.0);
    }

    #[test]
    fn test_semi_major_axis_floor() {
        let engine = PerturbationEngine::new(EngineConfig::new(0.9, 1000.0).unwrap());
        let shrink = Fixed(ElementDelta {
            semi_major_axis: -1e9,
            ..ElementDelta::zero()
        });

        let mut state = leo();
        engine.step(&mut state, 1.0, &[(&shrink, EphemerisSample::default())]);
        assert_eq!(state.semi_major_axis(), 1000.0);
    }

    #[test]
    fn test_non_finite_contributions_are_discarded() {
        let engine = PerturbationEngine::default();
        let broken = Fixed(ElementDelta {
            inclination: f64::NAN,
            long_asc_node: 0.5,
            ..ElementDelta::zero()
        });
        let exploding = Fixed(ElementDelta {
            semi_major_axis: f64::INFINITY,
            ..ElementDelta::zero()
        });
        let good = Fixed(ElementDelta {
            long_asc_node: 0.25,
            ..ElementDelta::zero()
        });

        let mut state = leo();
        engine.step(
            &mut state,
            1.0,
            &[
                (&broken, EphemerisSample::default()),
                (&good, EphemerisSample::default()),
                (&exploding, EphemerisSample::default()),
            ],
        );

        // Only the good source made it through
        assert_eq!(state.long_asc_node(), 0.25);
        assert_eq!(state.inclination(), 0.9);
        assert_eq!(state.semi_major_axis(), 7_000_000.0);
        assert_eq!(engine.discarded_contributions(), 2);
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_overflowing_sum_skips_the_tick() {
        let engine = PerturbationEngine::default();
        let huge = Fixed(ElementDelta {
            semi_major_axis: 1e308,
            inclination: 1e308,
            ..ElementDelta::zero()
        });

        let original = leo();
        let mut state = original;
        engine.step(
            &mut state,
            1.0,
            &[(&huge, EphemerisSample::default()), (&huge, EphemerisSample::default())],
        );

        assert_eq!(state, original);
        assert!(state.validate().is_ok());
        assert_eq!(engine.discarded_contributions(), 2);

        // A single huge contribution still fits in an f64
        engine.step(&mut state, 1.0, &[(&huge, EphemerisSample::default())]);
        assert!(state.validate().is_ok());
        assert_relative_eq!(state.semi_major_axis(), 1e308);
        assert_eq!(engine.discarded_contributions(), 2);
    }

    #[test]
    fn test_discards_keep_counting() {
        let engine = PerturbationEngine::default();
        let broken = Fixed(ElementDelta {
            eccentricity: f64::NAN,
            ..ElementDelta::zero()
        });

        let original = leo();
        let mut state = original;
        for _ in 0..25 {
            engine.step(&mut state, 1.0, &[(&broken, EphemerisSample::default())]);
        }
        assert_eq!(state, original);
        assert_eq!(engine.discarded_contributions(), 25);
    }
}
