//! Core 2-D substrate growth simulation library.
//!
//! A discrete-space growth simulation that builds a planar subdivision from
//! many independently moving growth fronts: edges tipped with a moving
//! particle that compete for territory on a raster grid, split each other
//! on collision, spawn new fronts stochastically, and periodically close
//! off completed polygonal regions.
//!
//! Main components:
//! - [`particle`] — growth-tip particles ("boids").
//! - [`edge`] — half-edge pairs and the handles linking them.
//! - [`polygon`] — closed regions extracted from the mesh.
//! - [`grid`] — the rasterized ownership grid used as the collision index.
//! - [`config`] — simulation parameters and validation.
//! - [`system`] — the substrate system driving the whole simulation.
//! - [`types`] — shared ID aliases.

pub mod config;
pub mod edge;
pub mod grid;
pub mod particle;
pub mod polygon;
pub mod system;
pub mod types;
