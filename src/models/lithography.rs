//! Lithography models.
//!
//! This module contains models of thermally loaded EUV optics and their
//! supports, starting with focus stability under azimuthal stiffness variation.

pub mod focus;
