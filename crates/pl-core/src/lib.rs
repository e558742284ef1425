//! Foundational primitives for centerline stroke extraction.
//!
//! ## Grids
//! Raster artifacts (occupancy mask, distance field, skeleton) share the
//! [`Image`] type. `x` is the column, `y` the row, and row 0 is the bottom of
//! the sheet, so pixel `(x, y)` maps to millimeters without a flip.
//!
//! ## Binary Images
//! Masks are `Image<u8>` read with threshold `> 0` and written as `0` / `255`.
//!
//! ## Pixel Adjacency
//! [`adjacency`] numbers the 8 directions and defines when two set pixels are
//! linked. The skeletonizer and the tracer share it.
//!
//! ## Millimeter Space
//! [`Sheet`] carries the drawing area and pixel pitch and maps pixel centers
//! to [`Point2`]. Strokes are polylines of such points.

pub mod adjacency;
mod error;
mod geom;
mod image;
mod sheet;

pub use error::Error;
pub use geom::{Bounds, Point2, Stroke, Vec2};
pub use image::{CLEAR, Image, ImageView, SET};
pub use sheet::Sheet;
