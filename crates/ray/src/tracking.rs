//! Spectra written after every zone a ray crosses

// crate modules
use crate::error::Result;
use crate::writer::write_spectrum;

// spectrace modules
use spectrace_utils::{f, ndigits, IndexExt, ValueExt};

/// Running state for writing the partial spectrum of a ray zone by zone
///
/// File `iz` of a ray is `<froot>_iz<iz>.txt`, with `iz` zero padded to the
/// number of digits of the crossing count. Its header is the header root with
/// the label appended to the first line, followed by the distance travelled
/// so far and the zone just crossed.
///
/// ```rust
/// # use spectrace_ray::Tracking;
/// let mut tracking = Tracking::new("out/det-yp_ix0_iy0", "det-yp_ix0_iy0\ntime 0");
/// tracking.set_crossings(12);
///
/// assert_eq!(tracking.file_name(3), "out/det-yp_ix0_iy0_iz03.txt");
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Tracking {
    froot: String,
    hroot: String,
    width: usize,
    iz: usize,
    distance: f64,
}

impl Tracking {
    /// New tracking state from the file root and header root
    pub fn new(froot: impl Into<String>, hroot: impl Into<String>) -> Self {
        Self {
            froot: froot.into(),
            hroot: hroot.into(),
            width: 1,
            ..Default::default()
        }
    }

    /// Size the crossing labels for a path of `crossings` zones
    pub fn set_crossings(&mut self, crossings: usize) {
        self.width = ndigits(crossings);
    }

    /// Index of the next file to be written
    pub fn index(&self) -> usize {
        self.iz
    }

    /// Distance travelled so far in cm
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// File name of crossing `iz`
    pub fn file_name(&self, iz: usize) -> String {
        f!("{}_iz{}.txt", self.froot, iz.padded(self.width))
    }

    /// Header of the next file, after crossing zone `zone_id`
    ///
    /// `zone_width` is the number of digits of the zone count of the mesh.
    pub fn header(&self, zone_id: usize, zone_width: usize) -> String {
        let label = f!("iz{}", self.iz.padded(self.width));
        let mut header = match self.hroot.split_once('\n') {
            Some((first, rest)) => f!("{first}_{label}\n{rest}"),
            None => f!("{}_{label}", self.hroot),
        };
        header.push_str(&f!(
            "\niz {}{} cm",
            self.iz.aligned(self.width),
            self.distance.column()
        ));
        header.push_str(&f!("\nZoneID {}", zone_id.aligned(zone_width)));
        header.push_str("\ndata in W/cm2/sr/eV");
        header
    }

    /// Advance by a chord of length `ct` through `zone_id` and write `y`
    pub(crate) fn record(
        &mut self,
        ct: f64,
        zone_id: usize,
        zone_width: usize,
        y: &[f64],
    ) -> Result<()> {
        self.distance += ct;
        write_spectrum(
            self.file_name(self.iz),
            &self.header(zone_id, zone_width),
            y,
        )?;
        self.iz += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_labels_first_line() {
        let mut tracking = Tracking::new("root", "name\ntime 0\npatch 1");
        tracking.set_crossings(5);
        tracking.distance = 2.0;

        let expected = "name_iz0\ntime 0\npatch 1\niz 0   2.000000e+00 cm\nZoneID  7\ndata in W/cm2/sr/eV";
        assert_eq!(tracking.header(7, 2), expected);
    }

    #[test]
    fn single_line_header_root() {
        let tracking = Tracking::new("root", "name");
        assert!(tracking.header(1, 1).starts_with("name_iz0\niz 0"));
    }
}
