//! Scalar numeric helpers

/// Sign of a value with a tolerance band around zero
///
/// Returns `1` above `|eqt|`, `-1` below `-|eqt|`, and `0` inside the band.
///
/// ```rust
/// # use spectrace_utils::sign_eqt;
/// assert_eq!(sign_eqt(1.0e-3, 1.0e-6), 1);
/// assert_eq!(sign_eqt(-1.0e-3, 1.0e-6), -1);
/// assert_eq!(sign_eqt(1.0e-9, 1.0e-6), 0);
/// ```
pub fn sign_eqt(x: f64, eqt: f64) -> i32 {
    let tol = eqt.abs();
    if x > tol {
        1
    } else if x < -tol {
        -1
    } else {
        0
    }
}

/// Nearest integer, with halves rounded up
///
/// ```rust
/// # use spectrace_utils::nint;
/// assert_eq!(nint(2.5), 3);
/// assert_eq!(nint(-2.5), -2);
/// assert_eq!(nint(7.49), 7);
/// ```
pub fn nint(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

/// Number of decimal digits needed to print `i`
///
/// ```rust
/// # use spectrace_utils::ndigits;
/// assert_eq!(ndigits(0), 1);
/// assert_eq!(ndigits(9), 1);
/// assert_eq!(ndigits(10), 2);
/// assert_eq!(ndigits(12345), 5);
/// ```
pub fn ndigits(i: usize) -> usize {
    let mut digits = 1;
    let mut k = i / 10;
    while k > 0 {
        digits += 1;
        k /= 10;
    }
    digits
}

/// Real roots of a quadratic, ordered `x1 >= x2`
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Quadratic {
    /// Number of distinct real roots (0, 1 or 2)
    pub nroots: usize,
    /// Larger root
    pub x1: f64,
    /// Smaller root
    pub x2: f64,
}

/// Solve `a x² + b x + c = 0` without catastrophic cancellation
///
/// Coefficients within `tol` of zero are treated as zero. A degenerate `a`
/// falls back to the linear solution, and a discriminant within `tol` of zero
/// is reported as a single (double) root.
///
/// ```rust
/// # use spectrace_utils::solve_quadratic;
/// let q = solve_quadratic(1.0, -3.0, 2.0, 1.0e-20);
/// assert_eq!(q.nroots, 2);
/// assert_eq!((q.x1, q.x2), (2.0, 1.0));
///
/// // no real roots
/// assert_eq!(solve_quadratic(1.0, 0.0, 1.0, 1.0e-20).nroots, 0);
/// ```
pub fn solve_quadratic(a: f64, b: f64, c: f64, tol: f64) -> Quadratic {
    let mut rv = Quadratic::default();

    if sign_eqt(a, tol) == 0 {
        if sign_eqt(b, tol) != 0 {
            rv.nroots = 1;
            rv.x1 = -c / b;
            rv.x2 = rv.x1;
        }
        return rv;
    }

    let mut d = b * b - 4.0 * a * c;
    if sign_eqt(d, tol) == 0 {
        d = 0.0;
    }
    if d < 0.0 {
        return rv;
    }

    if sign_eqt(b, tol) == 0 {
        rv.x1 = (-c / a).sqrt();
        rv.x2 = -rv.x1;
    } else {
        let q = -0.5 * (b + f64::from(sign_eqt(b, tol)) * d.sqrt());
        rv.x1 = q / a;
        rv.x2 = c / q;
    }

    if rv.x1 < rv.x2 {
        std::mem::swap(&mut rv.x1, &mut rv.x2);
    }

    rv.nroots = if d <= tol { 1 } else { 2 };
    rv
}

/// Index `i < n` for which `f(i)` is closest to `x`, by exhaustive search
///
/// The evaluation may fail, in which case the error is returned as soon as it
/// is seen. Returns `0` when `n <= 1` without calling `f`.
///
/// ```rust
/// # use spectrace_utils::nearest_exhaustive;
/// let v = [5.0, 1.0, 3.0];
/// let i = nearest_exhaustive(2.9, v.len(), |i| Ok::<f64, ()>(v[i]));
/// assert_eq!(i, Ok(2));
/// ```
pub fn nearest_exhaustive<E, F>(x: f64, n: usize, mut f: F) -> Result<usize, E>
where
    F: FnMut(usize) -> Result<f64, E>,
{
    if n <= 1 {
        return Ok(0);
    }

    let mut imin = 0;
    let mut dmin = (f(0)? - x).abs();
    for i in 1..n {
        let diff = (f(i)? - x).abs();
        if diff < dmin {
            dmin = diff;
            imin = i;
        }
    }
    Ok(imin)
}

/// Blackbody specific intensity in W/cm²/sr/eV
///
/// Both the photon energy `hv` and the temperature `tev` are in eV. A
/// non-positive temperature emits nothing.
///
/// ```rust
/// # use spectrace_utils::planckian;
/// assert_eq!(planckian(100.0, 0.0), 0.0);
/// assert!(planckian(100.0, 50.0) > planckian(100.0, 25.0));
/// ```
pub fn planckian(hv: f64, tev: f64) -> f64 {
    const F: f64 = 5040.367;
    if tev <= 0.0 {
        return 0.0;
    }
    F * hv.powi(3) / ((hv / tev).exp() - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quadratic_linear_fallback() {
        let q = solve_quadratic(0.0, 2.0, -4.0, 1.0e-20);
        assert_eq!(q.nroots, 1);
        assert_eq!(q.x1, 2.0);
        assert_eq!(q.x2, 2.0);

        let q = solve_quadratic(0.0, 0.0, 1.0, 1.0e-20);
        assert_eq!(q.nroots, 0);
    }

    #[test]
    fn quadratic_double_root() {
        let q = solve_quadratic(1.0, -2.0, 1.0, 1.0e-20);
        assert_eq!(q.nroots, 1);
        assert_eq!(q.x1, 1.0);
        assert_eq!(q.x2, 1.0);
    }

    #[test]
    fn quadratic_symmetric_roots() {
        // b == 0 takes the square root branch
        let q = solve_quadratic(1.0, 0.0, -9.0, 1.0e-20);
        assert_eq!(q.nroots, 2);
        assert_eq!(q.x1, 3.0);
        assert_eq!(q.x2, -3.0);
    }

    #[test]
    fn quadratic_small_root_is_accurate() {
        // naive formula loses the small root entirely
        let q = solve_quadratic(1.0, -1.0e8, 1.0, 1.0e-20);
        assert_eq!(q.nroots, 2);
        assert!((q.x2 - 1.0e-8).abs() < 1.0e-20);
        assert!((q.x1 - 1.0e8).abs() < 1.0e-6);
    }

    #[test]
    fn exhaustive_search_propagates_errors() {
        let result = nearest_exhaustive(0.0, 3, |i| if i == 1 { Err("bad") } else { Ok(1.0) });
        assert_eq!(result, Err("bad"));
    }

    #[test]
    fn exhaustive_search_prefers_first_tie() {
        let v = [1.0, -1.0, 1.0];
        assert_eq!(nearest_exhaustive(0.0, 3, |i| Ok::<f64, ()>(v[i])), Ok(0));
    }
}
