//! # Focus Cliff
//!
//! Focus stability evaluation for thermally loaded EUV substrate supports,
//! built as [Twine](https://github.com/isentropic-dev/twine) models.
//!
//! Non-uniform azimuthal support stiffness amplifies thermal warpage into
//! focus drift. Amplification is mild below a critical stiffness ratio and
//! explodes at it; this crate quantifies how close a machine configuration
//! sits to that cliff and whether its focus budget survives.
//!
//! ## Crate layout
//!
//! - [`models`]: Domain-specific [`twine_core::Model`] implementations.
//! - [`support`]: Supporting utilities used by models.
//! - [`cli`]: The `focus-audit` command, exposed for embedding and tests.
//!
//! ## Utility code lifecycle
//!
//! Modules in [`support`] are part of the public API because they're useful,
//! but their APIs are not stable. Model-specific helpers start in a model's
//! internal `core` module and only move to [`support`] once more than one
//! model needs them.

pub mod cli;
pub mod models;
pub mod support;
