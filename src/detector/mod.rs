//! Retinal analysis detector orchestrating the single-image pipeline.
//!
//! Overview
//! - Decodes the photograph (or accepts an already decoded [`RawImage`]) and
//!   records its geometry.
//! - Refuses to go further when no classifier is loaded, reporting the image
//!   metadata with the error.
//! - Enhances the image, normalizes `enhanced_color` into the classifier
//!   input tensor, and classifies it.
//! - Calibrates the raw distribution, flags ambiguity on the raw margin, and
//!   composes the diagnosis text.
//!
//! Modules
//! - [`params`] – knobs fixed at construction.
//! - `pipeline` – the [`RetinaDetector`] implementation.
//!
//! Key Ideas
//! - The detector is immutable after construction and `Send + Sync`; every
//!   analysis allocates its own buffers, so one instance serves concurrent
//!   callers.
//! - Every failure becomes an error record. `analyze_*` never returns `Err`.
//!
//! [`RawImage`]: crate::image::RawImage

pub mod params;
mod pipeline;

pub use params::{DetectorParams, DEFAULT_MODEL_VERSION};
pub use pipeline::RetinaDetector;
