//! Basic numerical concepts used throughout the program

#![allow(missing_docs)]

// Floating-point precision is configured here
#[cfg(feature = "f32")]
pub type Float = f32;
#[cfg(feature = "f32")]
pub use std::f32 as floats;
#[cfg(not(feature = "f32"))]
pub type Float = f64;
#[cfg(not(feature = "f32"))]
pub use std::f64 as floats;
pub type Complex = num_complex::Complex<Float>;

/// Mathematical functions which prefix_num_ops does not provide
pub mod functions {
    use super::{Complex, Float};

    /// Square of a real number
    pub fn sqr(x: Float) -> Float {
        x * x
    }

    /// Squared modulus of a complex number
    pub fn norm_sqr(z: Complex) -> Float {
        z.norm_sqr()
    }
}
