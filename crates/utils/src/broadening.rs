//! Instrumental broadening of tabulated spectra

// crate modules
use crate::error::{Error, Result};
use crate::slice_ext::SliceExt;

/// Number of extrapolated points added to each side of the grid
const EDGE_POINTS: usize = 50;

/// Normalised Gaussian distribution
///
/// ```rust
/// # use spectrace_utils::gaussian;
/// let peak = gaussian(0.0, 0.0, 1.0);
/// assert!((peak - 0.3989422804014327).abs() < 1e-15);
/// ```
pub fn gaussian(x: f64, mu: f64, sigma: f64) -> f64 {
    let y = (x - mu) / sigma;
    (-y * y / 2.0).exp() / sigma / std::f64::consts::TAU.sqrt()
}

/// Trapezoidal integral of `y` over the full extent of the grid `x`
///
/// ```rust
/// # use spectrace_utils::integrate_trapezoid;
/// let x = [0.0, 1.0, 2.0];
/// let y = [0.0, 1.0, 2.0];
/// assert_eq!(integrate_trapezoid(&x, &y).unwrap(), 2.0);
/// ```
pub fn integrate_trapezoid(x: &[f64], y: &[f64]) -> Result<f64> {
    check_lengths(x, y)?;
    Ok(x.windows(2)
        .zip(y.windows(2))
        .map(|(xw, yw)| (xw[1] - xw[0]) * (yw[1] + yw[0]))
        .sum::<f64>()
        / 2.0)
}

/// Convolve a tabulated spectrum with a normalised Gaussian of width `fwhm`
///
/// The result is on the same grid as the input. When the grid cannot resolve
/// the requested width (`fwhm <= 1.5 * min spacing`) the spectrum is returned
/// unchanged.
///
/// The spectrum is extended by 50 points on each side, spaced by a tenth of
/// the Gaussian sigma, using linear extrapolation of the end points
/// (logarithmic in `y` when every value is positive) so that the edges do not
/// fall off artificially.
///
/// ```rust
/// # use spectrace_utils::convolve_gaussian;
/// let hv = [1.0, 2.0, 3.0];
/// let y = [4.0, 5.0, 6.0];
///
/// // too narrow to resolve
/// assert_eq!(convolve_gaussian(1.0, &hv, &y).unwrap(), y.to_vec());
/// ```
pub fn convolve_gaussian(fwhm: f64, x: &[f64], y: &[f64]) -> Result<Vec<f64>> {
    check_lengths(x, y)?;
    let dxmin = x.min_spacing()?;
    if fwhm <= 1.5 * dxmin {
        return Ok(y.to_vec());
    }

    let log_y = y.iter().all(|v| *v > 0.0);
    let sigma = fwhm * 0.5 / (2.0 * std::f64::consts::LN_2).sqrt();
    let ds = sigma / 10.0;
    let n = x.len();

    let mut xext = Vec::with_capacity(n + 2 * EDGE_POINTS);
    let mut yext = Vec::with_capacity(n + 2 * EDGE_POINTS);

    // left of the original grid
    for j in 0..EDGE_POINTS {
        let xj = x[0] - ds * (EDGE_POINTS - j) as f64;
        xext.push(xj);
        yext.push(extrapolate(xj, (x[0], y[0]), (x[1], y[1]), log_y));
    }

    xext.extend_from_slice(x);
    yext.extend_from_slice(y);

    // right of the original grid
    for j in 1..=EDGE_POINTS {
        let xj = x[n - 1] + ds * j as f64;
        xext.push(xj);
        yext.push(extrapolate(
            xj,
            (x[n - 2], y[n - 2]),
            (x[n - 1], y[n - 1]),
            log_y,
        ));
    }

    x.iter()
        .map(|xi| {
            let integrand = xext
                .iter()
                .zip(yext.iter())
                .map(|(xj, yj)| yj * gaussian(*xi, *xj, sigma))
                .collect::<Vec<f64>>();
            integrate_trapezoid(&xext, &integrand)
        })
        .collect()
}

/// Straight-line fit through two points, optionally in log(y)
fn extrapolate(x: f64, (x1, y1): (f64, f64), (x2, y2): (f64, f64), log_y: bool) -> f64 {
    let line = |y1: f64, y2: f64| y1 + (x - x1) * (y2 - y1) / (x2 - x1);
    if log_y {
        line(y1.ln(), y2.ln()).exp()
    } else {
        line(y1, y2)
    }
}

fn check_lengths(x: &[f64], y: &[f64]) -> Result<()> {
    if x.len() != y.len() {
        return Err(Error::MismatchedLengths {
            abscissa: x.len(),
            ordinate: y.len(),
        });
    }
    if x.len() < 2 {
        return Err(Error::BelowMinimumSliceLength {
            length: x.len(),
            minimum_required: 2,
        });
    }
    if let Some(index) = x.windows(2).position(|w| w[1] <= w[0]) {
        return Err(Error::NonIncreasingGrid { index: index + 1 });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_spectrum_stays_flat() {
        let hv = (0..200).map(|i| 100.0 + i as f64).collect::<Vec<f64>>();
        let y = vec![3.0; hv.len()];
        let broadened = convolve_gaussian(5.0, &hv, &y).unwrap();

        // well away from the change in spacing at the extrapolated edges
        for v in &broadened[30..170] {
            assert!((v - 3.0).abs() < 1e-6, "{v}");
        }
    }

    #[test]
    fn line_is_spread_and_conserved() {
        let hv = (0..401).map(|i| i as f64 * 0.5).collect::<Vec<f64>>();
        let mut y = vec![0.0; hv.len()];
        y[200] = 2.0;

        let before = integrate_trapezoid(&hv, &y).unwrap();
        let broadened = convolve_gaussian(10.0, &hv, &y).unwrap();
        let after = integrate_trapezoid(&hv, &broadened).unwrap();

        assert!(broadened[200] < y[200]);
        assert!(broadened[190] > 0.0);
        assert!((before - after).abs() / before < 1e-3);
    }

    #[test]
    fn mismatched_grids_are_rejected() {
        assert_eq!(
            convolve_gaussian(1.0, &[1.0, 2.0], &[1.0]),
            Err(Error::MismatchedLengths {
                abscissa: 2,
                ordinate: 1
            })
        );
        assert_eq!(
            integrate_trapezoid(&[1.0, 1.0], &[1.0, 1.0]),
            Err(Error::NonIncreasingGrid { index: 1 })
        );
    }
}
