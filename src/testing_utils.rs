use nalgebra::Vector3;

// We'll count this as a success if the difference between the vectors is small,
// relative to the length of the expected vector.
pub fn assert_vectors_close(expected: &Vector3<f64>, actual: &Vector3<f64>, tolerance: f64) {
    let difference = actual - expected;
    if difference.norm() >= tolerance * expected.norm() {
        panic!(
            "Vectors were not as close as expected!\n
            Expected: {}\n
            Received: {}\n
            Difference: {}\n
            Relative difference: {:e}",
            expected,
            actual,
            difference,
            difference.norm() / expected.norm(),
        );
    }
}
