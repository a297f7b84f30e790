//! Result and Error types for spectrace-material

/// Type alias for `Result<T, material::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `spectrace-material`
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    Io(#[from] std::io::Error),

    /// Failure to read or write JSON
    #[error("failed serde JSON operation")]
    Json(#[from] serde_json::Error),

    /// Failure in a shared numeric utility
    #[error("numeric utility failed: {0}")]
    Utils(#[from] spectrace_utils::Error),

    /// Material name missing from the table
    #[error("material \"{0}\" is not present in the table")]
    MaterialNotFound(String),

    /// No tabulated state for a material at the given grid point
    #[error("no state for \"{handle}\" at te[{ite}] tr[{itr}] ne[{ine}]")]
    StateNotFound {
        handle: String,
        ite: usize,
        itr: usize,
        ine: usize,
    },

    /// A database grid has no points
    #[error("database grid \"{0}\" is empty")]
    EmptyGrid(&'static str),

    /// Spectrum length does not match the photon energy grid
    #[error("{quantity} spectrum of \"{handle}\" has {found} values, expected {expected}")]
    SpectrumLengthMismatch {
        handle: String,
        quantity: &'static str,
        expected: usize,
        found: usize,
    },

    /// No photon energies fall within the requested range
    #[error("no photon energies between {hvmin} and {hvmax} eV")]
    EmptyEnergyRange { hvmin: f64, hvmax: f64 },

    /// Requested energy indices fall outside the photon energy grid
    #[error("energy indices {jmin}..={jmax} outside grid of {nhv} points")]
    EnergyIndexOutOfRange { jmin: usize, jmax: usize, nhv: usize },

    /// Material and abundance lists of different lengths
    #[error("{materials} materials but {fractions} abundances")]
    MismatchedAbundances { materials: usize, fractions: usize },
}
