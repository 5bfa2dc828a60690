//! # voroplane
//!
//! `voroplane` is a Rust library for planar Voronoi diagrams, designed to be used in Rust
//! as well as compiled to WebAssembly (WASM). Diagrams are built with Fortune's sweep and
//! clipped to an axis-aligned rectangle.
//!
//! ## Features
//!
//! - **Exact cells**: every site gets its edges, neighbours and polygon, plus flags telling
//!   whether it lies on one of its own edges or corners.
//! - **Border edges**: optionally the rectangle's sides are emitted as edges, closing every cell.
//! - **Relaxation**: Lloyd iterations with parallel centroid computation.
//! - **WASM-first**: Built with `wasm-bindgen` for seamless integration with JavaScript and TypeScript.
//!
//! ## Example
//!
//! See the `demos/` directory for SVG plotting.
//!
//! ## Main Interface
//!
//! [`tessellate_once`] is the pure entry point. [`VoronoiPlane`] keeps sites and the last
//! diagram together and adds random sites, relaxation and nearest-site queries.

mod beach_line;
mod bounds;
mod cell;
mod clipper;
mod diagram;
mod edge;
mod error;
mod event_queue;
mod grid;
mod plane;
mod point;
mod predicates;
mod site;
mod sweep;
pub mod wasm;

pub use bounds::BoundingBox;
pub use clipper::BorderEdgeGeneration;
pub use edge::Edge;
pub use error::{Error, Result};
pub use plane::{DuplicateSitePolicy, TessellationOptions, VoronoiPlane, tessellate_all, tessellate_once};
pub use point::{EPSILON, Point, PointBorderLocation};
pub use site::Site;
