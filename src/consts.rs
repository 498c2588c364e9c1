use std::f64::consts::PI;

// Nominal values (IAU 2015 / WGS-84)
pub const EARTH_MASS: f64 = 5.9722e24;
pub const EARTH_MU: f64 = 3.986004418e14;
pub const EARTH_RADIUS: f64 = 6_378_137.0;
pub const EARTH_J2: f64 = 1.082_626_68e-3;

pub const SUN_MASS: f64 = 1.988_47e30;
pub const MOON_MASS: f64 = 7.342e22;

pub const ASTRONOMICAL_UNIT: f64 = 149_597_870_700.0;
pub const LUNAR_DISTANCE: f64 = 384_400_000.0;

pub const SIDEREAL_YEAR: f64 = 365.256_363 * 86_400.0;
pub const SIDEREAL_MONTH: f64 = 27.321_661 * 86_400.0;

pub fn get_circular_velocity(radius: f64, mu: f64) -> f64 {
    (mu / radius).sqrt()
}

pub fn get_period(a: f64, mu: f64) -> f64 {
    (4.0 * PI * PI * a.powi(3) / mu).sqrt()
}
