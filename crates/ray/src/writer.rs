//! Plain text spectrum files

// crate modules
use crate::error::Result;

// spectrace modules
use spectrace_utils::ValueExt;

// standard library
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write a header block followed by one value per line
///
/// Values use the fixed 15-character scientific column shared by every
/// output file.
///
/// ```rust, no_run
/// # use spectrace_ray::write_spectrum;
/// write_spectrum("det-backlighter.txt", "det-backlighter\ndata in W/cm2/sr/eV", &[1.0, 2.0]).unwrap();
/// ```
pub fn write_spectrum<P: AsRef<Path>>(path: P, header: &str, values: &[f64]) -> Result<()> {
    let mut writer = init_writer(path)?;
    writeln!(writer, "{header}")?;
    for value in values {
        writeln!(writer, "{}", value.column())?;
    }
    writer.flush()?;
    Ok(())
}

/// Initialise a writer from anything that can be turned into a path
fn init_writer<P: AsRef<Path>>(path: P) -> Result<BufWriter<File>> {
    let file = File::create(path)?;
    Ok(BufWriter::new(file))
}
