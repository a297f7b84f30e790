use crate::f;

/// Extends primitives with more specific formatting options
pub trait ValueExt {
    /// Better scientific number formatting
    ///
    /// The default is not very consistent for scientific in particular, so this
    /// allows easy definition.
    ///
    /// Works for anything that can be represented as scientific using the
    /// `LowerExp` trait, which is pretty much every numerical primitive.
    ///
    /// ```rust
    /// # use spectrace_utils::ValueExt;
    /// assert_eq!((-1.0_f64).sci(5, 2), "-1.00000e+00".to_string());
    /// assert_eq!(2.5e-12_f64.sci(6, 2), "2.500000e-12".to_string());
    /// ```
    fn sci(&self, precision: usize, exp_pad: usize) -> String;

    /// Fixed-width column used for every value written to spectrum files
    ///
    /// ```rust
    /// # use spectrace_utils::ValueExt;
    /// assert_eq!(1.0_f64.column(), "   1.000000e+00".to_string());
    /// assert_eq!(1.0_f64.column().len(), 15);
    /// ```
    fn column(&self) -> String {
        f!("{:>15}", self.sci(6, 2))
    }
}

impl<T: std::fmt::LowerExp> ValueExt for T {
    fn sci(&self, precision: usize, exp_pad: usize) -> String {
        let mut num = f!("{:.precision$e}", &self, precision = precision);
        // `LowerExp` output always contains an exponent marker
        let split = num.find('e').unwrap_or(num.len());
        let exp = num.split_off(split);
        let (sign, exp) = match exp.strip_prefix("e-") {
            Some(exp) => ('-', exp),
            None => ('+', exp.get(1..).unwrap_or("0")),
        };
        num.push_str(&f!("e{}{:0>pad$}", sign, exp, pad = exp_pad));
        num
    }
}

/// Extends indices with the padded labels used in file names and headers
pub trait IndexExt {
    /// Zero-padded to `width`, for file names
    ///
    /// ```rust
    /// # use spectrace_utils::IndexExt;
    /// assert_eq!(7_usize.padded(3), "007");
    /// assert_eq!(1234_usize.padded(3), "1234");
    /// ```
    fn padded(&self, width: usize) -> String;

    /// Right-aligned with spaces to `width`, for headers
    ///
    /// ```rust
    /// # use spectrace_utils::IndexExt;
    /// assert_eq!(7_usize.aligned(3), "  7");
    /// ```
    fn aligned(&self, width: usize) -> String;
}

impl IndexExt for usize {
    fn padded(&self, width: usize) -> String {
        f!("{self:0>width$}")
    }

    fn aligned(&self, width: usize) -> String {
        f!("{self:>width$}")
    }
}
