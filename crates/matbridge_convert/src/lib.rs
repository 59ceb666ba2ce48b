// SPDX-License-Identifier: MIT OR Apache-2.0
//! Material conversion for matbridge.
//!
//! A conversion reads a source shading graph, infers which nodes play the
//! base color, alpha, normal and emission roles, and rebuilds the graph for
//! a target rendering model:
//! - [`TargetModel::PathTraced`]: plain principled PBR with a transparent mix
//! - [`TargetModel::Toon`]: lighting ramp into a matte principled shader,
//!   mask alpha
//! - [`TargetModel::ToonUnlit`]: lighting ramp into an emission shader
//!
//! ## Pipeline
//!
//! [`infer_roles`] walks the source graph with bounded upstream traces and
//! returns an owned [`RoleResult`]. [`synthesize`] clears the target graph and
//! builds it from the roles alone. [`ConversionRun`] applies both to every
//! material slot in scope, caching one target per source material.

pub mod config;
pub mod convert;
pub mod error;
pub mod infer;
pub mod roles;
pub mod synth;
pub mod trace;

#[cfg(test)]
mod test_support;

pub use config::{
    AlphaBlendPolicy, AlphaHeuristics, ConversionOptions, InferenceConfig, Scope, SynthesisConfig,
    TargetModel, ToonRamp,
};
pub use convert::{convert_scene, ConversionReport, ConversionRun};
pub use error::ConvertError;
pub use infer::{infer_roles, RoleInference};
pub use roles::{AlphaSource, EmissionSource, ImageSource, NormalSource, RoleResult};
pub use synth::{synthesize, AlphaWiring, SynthesisSummary};
pub use trace::{find_upstream_image, UpstreamTrace};
