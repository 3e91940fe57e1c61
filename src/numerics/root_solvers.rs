//! Scalar root finding for bracketed problems

use crate::error::{CombustionError, Result};

/// Finds a root of `f` inside `[a, b]` using the Illinois variant of false position.
///
/// `f(a)` and `f(b)` must have opposite signs. Iterations stop once the new estimate moves less
/// than `tol` (relative) or the bracket collapses. `f` may fail; its error is returned unchanged.
///
/// # Examples
/// ```
/// use cog_flame::numerics::root_solvers::illinois;
/// let root = illinois(|x: f64| Ok(x * x - 2.0), 0.0, 2.0, 1e-12, 100).unwrap();
/// assert!((root - 2f64.sqrt()).abs() < 1e-9);
/// ```
pub fn illinois<F>(mut f: F, a: f64, b: f64, tol: f64, max_iter: usize) -> Result<f64>
where
    F: FnMut(f64) -> Result<f64>,
{
    let (mut a, mut b) = (a, b);
    let mut fa = f(a)?;
    if fa == 0.0 {
        return Ok(a);
    }
    let mut fb = f(b)?;
    if fb == 0.0 {
        return Ok(b);
    }
    if fa.signum() == fb.signum() {
        return Err(CombustionError::Convergence {
            solver: "illinois",
            message: format!("root is not bracketed: f({}) = {}, f({}) = {}", a, fa, b, fb),
        });
    }

    let mut side = 0;
    let mut previous = f64::NAN;
    for _ in 0..max_iter {
        let c = (a * fb - b * fa) / (fb - fa);
        let fc = f(c)?;
        if !fc.is_finite() {
            return Err(CombustionError::Convergence {
                solver: "illinois",
                message: format!("function is not finite at {}", c),
            });
        }
        if fc == 0.0 || (c - previous).abs() <= tol * c.abs() || (b - a).abs() <= tol * c.abs() {
            return Ok(c);
        }
        previous = c;

        if fc.signum() == fb.signum() {
            b = c;
            fb = fc;
            if side == -1 {
                fa *= 0.5;
            }
            side = -1;
        } else {
            a = c;
            fa = fc;
            if side == 1 {
                fb *= 0.5;
            }
            side = 1;
        }
    }
    Err(CombustionError::Convergence {
        solver: "illinois",
        message: format!("no root found in {} iterations, last bracket [{}, {}]", max_iter, a, b),
    })
}
