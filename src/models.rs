//! Public models.
//!
//! Each model lives in its own module with an internal `core` submodule that
//! holds the computation. `core` is not part of the public API; the model
//! module re-exports the types callers need and implements
//! [`twine_core::Model`] as a thin adapter over the core entry point.

pub mod lithography;
