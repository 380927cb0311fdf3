/// Set of functions to compute [convex hulls](https://en.wikipedia.org/wiki/Convex_hull)
pub mod convex_hull;

mod d_transformation;

/// Set of traits representing various geometric properties & operations
pub mod geo_traits;

/// Set of geometric primitives - atomic building blocks for the geometry module
pub mod primitives;

/// Set of functions to modify geometric shapes
pub mod shape_modification;

mod transformation;

#[doc(inline)]
pub use d_transformation::DTransformation;

#[doc(inline)]
pub use transformation::Transformation;
