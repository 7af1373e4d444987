use glam::DVec3;

use crate::foundation::error::{VantageError, VantageResult};
use crate::shader::template::{self, MapDirection, ShaderTemplate, UniformValue};
use crate::transform::base::{Transform, TransformRef};

/// Per-axis signed-base logarithm.
///
/// Base semantics per axis:
///
/// - `0`: identity passthrough,
/// - `b > 0`: sign-preserving log `sign(x) * log_b(1 + |x|)`,
/// - `b < 0`: the inverse exponential `sign(x) * (|b|^|x| - 1)`.
///
/// The sign-preserving formula is total on all reals: negative input never
/// raises, unlike a naive logarithm. Because the base sign encodes
/// direction, the inverse of a log transform is the log transform with the
/// negated base vector.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LogTransform {
    base: DVec3,
}

impl LogTransform {
    /// Build from a per-axis base vector. Base magnitudes of exactly 1 are
    /// rejected: `ln|b| = 0` would collapse the axis.
    pub fn new(base: DVec3) -> VantageResult<Self> {
        if base.x.abs() == 1.0 || base.y.abs() == 1.0 || base.z.abs() == 1.0 {
            return Err(VantageError::validation(
                "log base magnitude must not be 1",
            ));
        }
        Ok(Self { base })
    }

    /// Current per-axis base vector.
    pub fn base(&self) -> DVec3 {
        self.base
    }
}

fn log_axis(x: f64, base: f64) -> f64 {
    if base == 0.0 {
        x
    } else if base > 0.0 {
        x.signum() * (1.0 + x.abs()).ln() / base.ln()
    } else {
        x.signum() * ((-base).powf(x.abs()) - 1.0)
    }
}

impl Transform for LogTransform {
    fn name(&self) -> &'static str {
        "log"
    }

    fn map(&self, p: DVec3) -> DVec3 {
        DVec3::new(
            log_axis(p.x, self.base.x),
            log_axis(p.y, self.base.y),
            log_axis(p.z, self.base.z),
        )
    }

    fn imap(&self, p: DVec3) -> VantageResult<DVec3> {
        Ok(Self { base: -self.base }.map(p))
    }

    fn inverse(&self) -> VantageResult<TransformRef> {
        Ok(TransformRef::new(Self { base: -self.base }))
    }

    fn shader_map(&self) -> Option<ShaderTemplate> {
        Some(template::LOG)
    }

    fn shader_imap(&self) -> Option<ShaderTemplate> {
        Some(template::LOG)
    }

    fn shader_uniforms(&self, direction: MapDirection) -> VantageResult<Vec<UniformValue>> {
        let base = match direction {
            MapDirection::Forward => self.base,
            MapDirection::Inverse => -self.base,
        };
        Ok(vec![UniformValue::from_dvec3(base)])
    }
}

/// Maps polar `(theta, r, z)` to Cartesian `(r * cos(theta), r * sin(theta), z)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PolarTransform;

impl Transform for PolarTransform {
    fn name(&self) -> &'static str {
        "polar"
    }

    fn map(&self, p: DVec3) -> DVec3 {
        DVec3::new(p.y * p.x.cos(), p.y * p.x.sin(), p.z)
    }

    fn imap(&self, p: DVec3) -> VantageResult<DVec3> {
        Ok(InvPolarTransform.map(p))
    }

    fn inverse(&self) -> VantageResult<TransformRef> {
        Ok(TransformRef::new(InvPolarTransform))
    }

    fn shader_map(&self) -> Option<ShaderTemplate> {
        Some(template::POLAR)
    }

    fn shader_imap(&self) -> Option<ShaderTemplate> {
        Some(template::POLAR_INV)
    }
}

/// Maps Cartesian `(x, y, z)` to polar `(atan2(y, x), hypot(x, y), z)`.
///
/// The paired inverse of [`PolarTransform`]. `atan2(0, 0)` is 0 by
/// convention, so the origin maps to `(0, 0, z)` without error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct InvPolarTransform;

impl Transform for InvPolarTransform {
    fn name(&self) -> &'static str {
        "polar_inv"
    }

    fn map(&self, p: DVec3) -> DVec3 {
        DVec3::new(p.y.atan2(p.x), p.x.hypot(p.y), p.z)
    }

    fn imap(&self, p: DVec3) -> VantageResult<DVec3> {
        Ok(PolarTransform.map(p))
    }

    fn inverse(&self) -> VantageResult<TransformRef> {
        Ok(TransformRef::new(PolarTransform))
    }

    fn shader_map(&self) -> Option<ShaderTemplate> {
        Some(template::POLAR_INV)
    }

    fn shader_imap(&self) -> Option<ShaderTemplate> {
        Some(template::POLAR)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/nonlinear.rs"]
mod tests;
