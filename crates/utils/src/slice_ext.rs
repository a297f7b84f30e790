use crate::error::{Error, Result};

/// Extends functionality for slices of float arrays
pub trait SliceExt<T> {
    /// Find the minimum value in float arrays
    ///
    /// Only provides the minimum value from a collection of valid numbers. Any
    /// NAN values, infinite values, or empty slices will return an error.
    ///
    /// ```rust
    /// # use spectrace_utils::SliceExt;
    /// # use spectrace_utils::Error;
    /// assert_eq!([1.1, 0.5, 2.2].try_min(), Ok(0.5));
    /// assert_eq!([1.1, f64::NAN, 2.2].try_min(), Err(Error::SliceContainsUndefinedValues));
    /// assert_eq!(Vec::<f64>::new().try_min(), Err(Error::SliceContainsNoValues));
    /// ```
    ///
    /// Uses `total_cmp` to always produce an ordering in accordance to the
    /// totalOrder predicate of IEEE 754 (2008 revision).
    fn try_min(&self) -> Result<T>;

    /// Find the maximum value in float arrays
    ///
    /// ```rust
    /// # use spectrace_utils::SliceExt;
    /// # use spectrace_utils::Error;
    /// assert_eq!([1.1, 0.5, 2.2].try_max(), Ok(2.2));
    /// assert_eq!([1.1, f64::INFINITY].try_max(), Err(Error::SliceContainsUndefinedValues));
    /// ```
    fn try_max(&self) -> Result<T>;

    /// Smallest absolute spacing between neighbouring values
    ///
    /// ```rust
    /// # use spectrace_utils::SliceExt;
    /// assert_eq!([1.0, 2.0, 2.5, 4.0].min_spacing(), Ok(0.5));
    /// assert!([1.0].min_spacing().is_err());
    /// ```
    fn min_spacing(&self) -> Result<T>;

    /// Index of the value nearest to `value` in an increasing table
    ///
    /// Values beyond either end clamp to the first or last index. Exactly
    /// half way between two entries resolves to the lower index. Empty and
    /// single-valued tables always give `0`.
    ///
    /// ```rust
    /// # use spectrace_utils::SliceExt;
    /// let grid = [10.0, 20.0, 40.0, 80.0];
    /// assert_eq!(grid.nearest_index(-5.0), 0);
    /// assert_eq!(grid.nearest_index(14.0), 0);
    /// assert_eq!(grid.nearest_index(15.0), 0);
    /// assert_eq!(grid.nearest_index(31.0), 2);
    /// assert_eq!(grid.nearest_index(1000.0), 3);
    /// ```
    fn nearest_index(&self, value: T) -> usize;
}

impl SliceExt<f64> for [f64] {
    fn try_min(&self) -> Result<f64> {
        if self.iter().any(|v| !v.is_finite()) {
            return Err(Error::SliceContainsUndefinedValues);
        };

        self.iter()
            .min_by(|a, b| a.total_cmp(b))
            .copied()
            .ok_or(Error::SliceContainsNoValues)
    }

    fn try_max(&self) -> Result<f64> {
        if self.iter().any(|v| !v.is_finite()) {
            return Err(Error::SliceContainsUndefinedValues);
        };

        self.iter()
            .max_by(|a, b| a.total_cmp(b))
            .copied()
            .ok_or(Error::SliceContainsNoValues)
    }

    fn min_spacing(&self) -> Result<f64> {
        if self.len() < 2 {
            return Err(Error::BelowMinimumSliceLength {
                length: self.len(),
                minimum_required: 2,
            });
        }

        self.windows(2)
            .map(|w| (w[1] - w[0]).abs())
            .collect::<Vec<f64>>()
            .try_min()
    }

    fn nearest_index(&self, value: f64) -> usize {
        let n = self.len();
        if n <= 1 || value <= self[0] {
            return 0;
        }

        let imax = n - 1;
        if value >= self[imax] {
            return imax;
        }

        // first index with a table value strictly above the target, which is
        // guaranteed to be in 1..=imax by the checks above
        let jp1 = self.partition_point(|v| *v <= value);
        let j = jp1 - 1;

        if self[jp1] - value < value - self[j] {
            jp1
        } else {
            j
        }
    }
}
