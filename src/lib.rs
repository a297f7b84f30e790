//! `spectrace` is a modular set of libraries for tracing rays through zoned
//! meshes and building synthetic spectral diagnostics
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of spectrace crates.
#[doc(inline)]
pub use spectrace_geometry as geometry;

#[doc(inline)]
pub use spectrace_utils as utils;

#[cfg(feature = "detector")]
#[cfg_attr(docsrs, doc(cfg(feature = "detector")))]
#[doc(inline)]
pub use spectrace_detector as detector;

#[cfg(feature = "material")]
#[cfg_attr(docsrs, doc(cfg(feature = "material")))]
#[doc(inline)]
pub use spectrace_material as material;

#[cfg(feature = "mesh")]
#[cfg_attr(docsrs, doc(cfg(feature = "mesh")))]
#[doc(inline)]
pub use spectrace_mesh as mesh;

#[cfg(feature = "ray")]
#[cfg_attr(docsrs, doc(cfg(feature = "ray")))]
#[doc(inline)]
pub use spectrace_ray as ray;
