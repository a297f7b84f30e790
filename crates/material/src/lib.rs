//! Material tables and spectral databases
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod database;
mod error;
mod spectra;
mod table;

#[doc(inline)]
pub use database::{Database, Grids, NeSearch, State};

#[doc(inline)]
pub use spectra::{Component, Spectra};

#[doc(inline)]
pub use table::{Element, Table};

#[doc(inline)]
pub use error::{Error, Result};
