//! Photon energy grid files

// crate modules
use crate::error::Result;

// spectrace modules
use spectrace_utils::constants::INT_WIDTH;
use spectrace_utils::{IndexExt, ValueExt};

// standard library
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write photon energies in the layout of a database grid file
///
/// The file can be read back as the photon energy grid of a reduced
/// database.
pub fn write_hv_grid<P: AsRef<Path>>(path: P, hv: &[f64]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write!(
        writer,
        "\n Number of bits:\n{}\n\n Number of grid points:\n{}\n\n Grid points:\n",
        0_usize.aligned(INT_WIDTH + 1),
        hv.len().aligned(INT_WIDTH + 1)
    )?;
    for (i, e) in hv.iter().enumerate() {
        writeln!(writer, "{}  {}", i.aligned(INT_WIDTH + 1), e.column())?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_layout() {
        let path = std::env::temp_dir().join("spectrace-detector-hv_grid.txt");
        write_hv_grid(&path, &[1.0, 2.0]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines[1], " Number of bits:");
        assert_eq!(lines[2], "           0");
        assert_eq!(lines[5], "           2");
        assert_eq!(lines[7], " Grid points:");
        assert_eq!(lines[8], "           0     1.000000e+00");
        assert_eq!(lines.len(), 10);
    }
}
