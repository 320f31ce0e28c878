//! Wavefront-level matrix-multiply-accumulate primitives.
//!
//! `wavemma` maps logical matrix tiles onto the lanes of a fixed-size
//! wavefront (32 or 64 lanes) and provides the load/store and
//! multiply-accumulate operations needed for tiled GEMM. All tile shapes,
//! element types, data layouts and vector widths are compile-time constants;
//! an incompatible combination fails to build rather than producing a
//! runtime error.
//!
//! The crate is organized around four pieces:
//! - [`io_traits::IoTraits`] computes per-lane transaction counts from a
//!   tile shape and vector width,
//! - the [`layout`] generators decide which element each lane touches at
//!   each iteration,
//! - the opaque [`io`] primitives move vector-width chunks between memory
//!   and per-lane registers,
//! - the [`cross_lane`] operations redistribute already-loaded values
//!   between lanes without going through memory.
//!
//! [`fragment::Fragment`] ties these together into a cooperative-matrix API.

pub mod config;
pub mod cross_lane;
pub mod element;
pub mod fragment;
pub mod io;
pub mod io_traits;
pub mod layout;
pub mod mapping;
pub mod mma;

#[doc(inline)]
pub use self::{
    config::{ConfigError, DataType, TileConfig},
    element::Element,
    fragment::{Accumulator, Fragment, MatrixA, MatrixB},
    io_traits::{IoShape, IoTraits},
    layout::{ColMajor, DataLayout, MatrixLayout, RowMajor},
    mma::mma_sync,
};
/// Re-export of half-precision floating point types
/// from the `half` crate.
pub use half::{bf16, f16};
