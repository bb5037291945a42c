//! Bounding volume hierarchy over static triangle sets, built with the
//! surface area heuristic and spatial splits (SBVH).
//!
//! ```no_run
//! use glam::vec3;
//! use sbvh::{BuildOptions, Bvh, Ray, Triangle};
//!
//! let triangles = [Triangle::new(
//!     vec3(-1.0, -1.0, 0.0),
//!     vec3(1.0, -1.0, 0.0),
//!     vec3(0.0, 1.0, 0.0),
//! )];
//!
//! let bvh = Bvh::from_triangles(&triangles, &BuildOptions::default())?;
//! let ray = Ray::new(vec3(0.0, 0.0, -5.0), vec3(0.0, 0.0, 1.0));
//!
//! assert!(bvh.closest_hit(&ray, f32::INFINITY).is_some());
//! # Ok::<(), sbvh::BuildError>(())
//! ```

mod axis;
mod bounding_box;
mod box_bvh;
mod builder;
mod bvh;
mod error;
mod flatten;
mod hit;
mod metrics;
mod node;
mod options;
mod printer;
mod ray;
mod stack;
mod stats;
mod triangle;

pub use self::axis::*;
pub use self::bounding_box::*;
pub use self::box_bvh::*;
pub use self::bvh::*;
pub use self::error::*;
pub use self::hit::*;
pub use self::node::*;
pub use self::options::*;
pub use self::printer::*;
pub use self::ray::*;
pub use self::stack::*;
pub use self::stats::*;
pub use self::triangle::*;

/// Capacity of the traversal stack; trees are never built deeper than this.
pub const BVH_STACK_SIZE: usize = 64;
