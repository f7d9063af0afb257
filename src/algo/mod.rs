//! Mesh processing algorithms.
//!
//! - **Smoothing**: cotangent-weighted Laplacian and Taubin (λ|μ) smoothing
//!
//! Long-running algorithms accept a [`Progress`] callback.

mod progress;
pub mod smooth;

pub use progress::Progress;
