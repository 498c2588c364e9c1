//! Conversions between the true, eccentric and mean anomalies of an elliptic orbit.

use super::root_finding::{newton_plus_bisection, RootFindingError};

pub fn mean_to_eccentric(mean_anomaly: f64, e: f64) -> Result<f64, RootFindingError> {
    debug_assert!((0.0..1.0).contains(&e));

    // This doesn't have a closed form, so let's do some rootfinding.
    // Since |E - M| = e |sin E| <= e, the root is always within e of M.
    let kepler = |x: f64| (x - e * x.sin() - mean_anomaly, 1.0 - e * x.cos());
    newton_plus_bisection(kepler, mean_anomaly - e, mean_anomaly + e, 100)
}

pub fn eccentric_to_mean(eccentric_anomaly: f64, e: f64) -> f64 {
    eccentric_anomaly - e * eccentric_anomaly.sin()
}

#[inline]
fn eccentric_factor(e: f64) -> f64 {
    ((1.0 - e) / (1.0 + e)).sqrt()
}

pub fn eccentric_to_true(eccentric_anomaly: f64, e: f64) -> f64 {
    // We have that tan(E/2) = sqrt((1-e)/(1+e)) * tan(theta/2)
    let tan_half_ecc = (eccentric_anomaly / 2.0).tan();
    let tan_half_theta = tan_half_ecc / eccentric_factor(e);
    2.0 * tan_half_theta.atan()
}

pub fn true_to_eccentric(true_anomaly: f64, e: f64) -> f64 {
    let tan_half_theta = (true_anomaly / 2.0).tan();
    let tan_half_ecc = tan_half_theta * eccentric_factor(e);
    2.0 * tan_half_ecc.atan()
}

pub fn mean_to_true(mean_anomaly: f64, e: f64) -> Result<f64, RootFindingError> {
    Ok(eccentric_to_true(mean_to_eccentric(mean_anomaly, e)?, e))
}

pub fn true_to_mean(true_anomaly: f64, e: f64) -> f64 {
    eccentric_to_mean(true_to_eccentric(true_anomaly, e), e)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_circular_orbit() {
        // All three anomalies agree when e = 0
        for theta in [0.0, 0.5, 2.0, -3.0] {
            assert_relative_eq!(true_to_mean(theta, 0.0), theta, max_relative = 1e-15);
            assert_relative_eq!(mean_to_true(theta, 0.0).unwrap(), theta, max_relative = 1e-15);
        }
    }

    #[test]
    fn test_kepler_equation() {
        for e in [0.1, 0.5, 0.9, 0.999] {
            for mean in [0.1, 1.0, 3.0, 5.5, 20.0] {
                let ecc = mean_to_eccentric(mean, e).unwrap();
                assert_relative_eq!(ecc - e * ecc.sin(), mean, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn test_round_trip_with_wrapping() {
        let e = 0.4;
        // Results come back in (-pi, pi], so compare on the circle
        for theta in [0.3, 2.9, 4.0, -1.0, 9.0] {
            let mean = true_to_mean(theta, e);
            let back = mean_to_true(mean, e).unwrap();
            assert_relative_eq!(back.cos(), theta.cos(), epsilon = 1e-12);
            assert_relative_eq!(back.sin(), theta.sin(), epsilon = 1e-12);
        }

        // Apsides stay put
        assert_relative_eq!(true_to_mean(0.0, e), 0.0);
        assert_relative_eq!(mean_to_true(PI, e).unwrap().abs(), PI, max_relative = 1e-12);
    }
}
