//! vantage is a library of composable coordinate-space transforms for GPU
//! visuals.
//!
//! Every transform exposes a host-side numeric mapping (`map`/`imap` on f64
//! points) and an equivalent WGSL fragment for GPU-side evaluation, and the
//! two agree within floating-point tolerance. Transforms compose with the
//! `*` operator (right-to-left application, `a * b` applies `b` first) into
//! flattened chains with an explicit [`simplify`] pass, and a per-drawable
//! [`TransformSystem`] binds a chain to the coordinate systems it bridges,
//! remapping the outermost stage in place on viewport resize.
//!
//! # Design constraints
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Pure evaluation**: `map`/`imap` are deterministic, never block, and
//!   never perform IO; out-of-domain input resolves to documented total
//!   fallbacks rather than panics.
//! - **Single rendering thread**: shared transform handles are `Rc`-based;
//!   the intentional aliasing used for viewport reconfiguration is not a
//!   concurrency mechanism.
//!
//! # Getting started
//!
//! ```
//! use glam::{DVec2, DVec3};
//! use vantage::{STTransform, PolarTransform, TransformRef};
//!
//! let chain = TransformRef::new(STTransform::xy(
//!     DVec2::new(400.0, 400.0),
//!     DVec2::new(600.0, 300.0),
//! )) * TransformRef::new(PolarTransform);
//! let mapped = chain.map(DVec3::new(0.0, 1.0, 0.0));
//! assert!((mapped.x - 1000.0).abs() < 1e-9);
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;
mod shader;
mod system;
mod transform;

pub use foundation::core::{Canvas, DMat4, DVec2, DVec3, Viewport};
pub use foundation::error::{VantageError, VantageResult};
pub use shader::assemble::{
    ComposedShader, NamedUniform, assemble_forward, assemble_inverse, refresh_uniforms,
};
pub use shader::template::{MapDirection, ShaderTemplate, UniformParam, UniformValue};
pub use system::registry::{CoordSpace, TransformSystem};
pub use transform::base::{Shared, Transform, TransformRef, compose};
pub use transform::chain::{ChainTransform, simplify};
pub use transform::linear::{AffineTransform, IdentityTransform, STTransform};
pub use transform::nonlinear::{InvPolarTransform, LogTransform, PolarTransform};
