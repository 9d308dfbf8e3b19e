//! # groovecut core
//!
//! Core types shared by the groovecut crates: cylindrical/cartesian geometry,
//! the engraving path model and input errors.

pub mod error;
pub mod geometry;
pub mod path;

pub use error::InputError;
pub use geometry::{
    cart_to_cyl, cyl_to_cart, distance_cart, distance_cyl, midpoint, CartPoint, CylPoint,
};
pub use path::{EngravingPath, PathPoint, SurfaceKind};
