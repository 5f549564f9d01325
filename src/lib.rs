//! ShapeNet
//!
//! Umbrella crate for the ShapeNet point-cloud workspace. The loader and the
//! archive builder live in `shapenet-data`; the command-line driver is
//! `shapenet-convert`. Runnable demos are under `demos/`.

pub use shapenet_data::*;
