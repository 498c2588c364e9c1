use nalgebra::{Rotation3, Vector3};

/// Rotation of the (x, y) pair by `angle`, i.e. around the z-axis.
pub fn rotate_xy(v: &Vector3<f64>, angle: f64) -> Vector3<f64> {
    let (sin, cos) = angle.sin_cos();
    Vector3::new(cos * v.x - sin * v.y, sin * v.x + cos * v.y, v.z)
}

/// Rotation of the (y, z) pair by `angle`, i.e. around the x-axis.
pub fn rotate_yz(v: &Vector3<f64>, angle: f64) -> Vector3<f64> {
    let (sin, cos) = angle.sin_cos();
    Vector3::new(v.x, cos * v.y - sin * v.z, sin * v.y + cos * v.z)
}

/// Returns the rotation taking the perifocal frame (orbit in the xy plane,
/// periapsis along x) to the primary's inertial frame.
pub fn perifocal_to_inertial(incl: f64, lan: f64, argp: f64) -> Rotation3<f64> {
    // First, we rotate around z until the periapsis is at argp away from the
    // x-axis (which will now be the ascending node). We then rotate around x to
    // get the inclination, and then one final turn around z to get the correct
    // longitude of the AN. The order is not interchangeable.
    Rotation3::from_axis_angle(&Vector3::z_axis(), lan)
        * Rotation3::from_axis_angle(&Vector3::x_axis(), incl)
        * Rotation3::from_axis_angle(&Vector3::z_axis(), argp)
}
