//! # SpineMap Library
//!
//! The `spinemap` library maps between an idealized, straightened body model
//! of an elongated organism and microscopy frames in which the body is curved.
//! A sampled backbone (the body axis as found in a frame) is turned into a
//! smooth curve, traced at pixel resolution, and then used either to place
//! model landmarks (e.g. neuron somata) into the frame or to straighten the
//! frame along the body.
//!
//! ## Overview of Modules
//!
//! - **`backbone`**: `BackbonePoint` and the ordered `Backbone` sequence, with
//!   reversal and canonical orientation.
//!
//! - **`backbone_format`**: Reading TSV and JSON backbone files through an
//!   explicit `BackboneFormat`, and writing TSV.
//!
//! - **`spline`**: The interpolating cubic spline used for each image axis.
//!
//! - **`curve_fitter`**: Arc-length parameterization of the backbone and the
//!   per-axis spline fit, producing a `FittedCurve`.
//!
//! - **`curve_tracer`**: Samples the fitted curve at unit-pixel steps into
//!   `TracedPoint`s carrying positions and unit tangents.
//!
//! - **`pose`**: `PoseInfo` (zoom, shift, angle), projection of model points
//!   and their placement on the traced spine.
//!
//! - **`model_points`**: `ModelPoint` and the neuron JSON loader.
//!
//! - **`frame`**: A single-channel `Frame` with bilinear point interpolation.
//!
//! - **`restack`**: Straightening of a frame along the traced spine.
//!
//! - **`spine`**: Runs fit and trace once and serves both consumers.
//!
//! - **`error`**: The `SpineError` type shared by all of the above.

pub mod backbone;
pub mod backbone_format;
pub mod curve_fitter;
pub mod curve_tracer;
pub mod error;
pub mod frame;
pub mod model_points;
pub mod pose;
pub mod restack;
pub mod spine;
pub mod spline;

pub use error::SpineError;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
