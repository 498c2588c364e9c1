use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RootFindingError {
    #[error("hit max iterations ({iterations}) when trying to find a root in [{lo}, {hi}]")]
    NoConvergence { iterations: usize, lo: f64, hi: f64 },
}

// Adapted from `rtsafe` in http://www.grad.hr/nastava/gs/prg/NumericalRecipesinC.pdf
//
// `lo` and `hi` must bracket a root: f must have opposite signs (or vanish) at them.
#[allow(clippy::float_cmp)]
pub fn newton_plus_bisection(
    f_and_f_prime: impl Fn(f64) -> (f64, f64),
    lo: f64,
    hi: f64,
    num_iterations: usize,
) -> Result<f64, RootFindingError> {
    let (mut lo, mut hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };

    // Initial setup: we guess right in the middle of the bracket. Also, we need to
    // determine which way f is oriented.
    let mut guess = (lo + hi) / 2.0;
    let lo_is_neg = f_and_f_prime(lo).0 < 0.0;

    for _ in 0..num_iterations {
        let (f, f_prime) = f_and_f_prime(guess);
        if f == 0.0 {
            return Ok(guess);
        }

        // Update the bracket
        if (f < 0.0) == lo_is_neg {
            lo = guess;
        } else {
            hi = guess;
        }

        // If the bracket is too small, return
        let midpoint = (lo + hi) / 2.0;
        if midpoint == lo || midpoint == hi {
            return Ok(guess);
        }

        // What's our next guess? Let's try one from Newton's method, unless it
        // leaves the bracket, in which case we bisect.
        let newton_guess = guess - f / f_prime;
        if lo < newton_guess && newton_guess < hi {
            if (newton_guess - guess).abs() <= f64::EPSILON * guess.abs().max(1.0) {
                return Ok(newton_guess);
            }
            guess = newton_guess;
        } else {
            guess = midpoint;
        }
    }

    Err(RootFindingError::NoConvergence {
        iterations: num_iterations,
        lo,
        hi,
    })
}
