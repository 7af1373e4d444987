use glam::{DMat4, DVec2, DVec3};

use crate::foundation::error::{VantageError, VantageResult};
use crate::shader::template::{self, MapDirection, ShaderTemplate, UniformValue};
use crate::transform::base::{Transform, TransformRef};

/// Identity mapping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IdentityTransform;

impl Transform for IdentityTransform {
    fn name(&self) -> &'static str {
        "identity"
    }

    fn map(&self, p: DVec3) -> DVec3 {
        p
    }

    fn imap(&self, p: DVec3) -> VantageResult<DVec3> {
        Ok(p)
    }

    fn is_linear(&self) -> bool {
        true
    }

    fn as_affine(&self) -> Option<DMat4> {
        Some(DMat4::IDENTITY)
    }

    fn as_scale_translate(&self) -> Option<(DVec3, DVec3)> {
        Some((DVec3::ONE, DVec3::ZERO))
    }

    fn inverse(&self) -> VantageResult<TransformRef> {
        Ok(TransformRef::new(*self))
    }

    fn shader_map(&self) -> Option<ShaderTemplate> {
        Some(template::IDENTITY)
    }

    fn shader_imap(&self) -> Option<ShaderTemplate> {
        Some(template::IDENTITY)
    }
}

/// Per-axis scale followed by translation: `x -> x * s + t`.
///
/// The restricted, cheaper-to-compose special case of
/// [`AffineTransform`]. Zero scale components are representable but make
/// the transform non-invertible.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct STTransform {
    scale: DVec3,
    translate: DVec3,
}

impl Default for STTransform {
    fn default() -> Self {
        Self {
            scale: DVec3::ONE,
            translate: DVec3::ZERO,
        }
    }
}

impl STTransform {
    /// Build from per-axis scale and translation.
    pub fn new(scale: DVec3, translate: DVec3) -> Self {
        Self { scale, translate }
    }

    /// 2D convenience constructor; z is left untouched.
    pub fn xy(scale: DVec2, translate: DVec2) -> Self {
        Self {
            scale: scale.extend(1.0),
            translate: translate.extend(0.0),
        }
    }

    /// Current per-axis scale.
    pub fn scale(&self) -> DVec3 {
        self.scale
    }

    /// Current translation.
    pub fn translate(&self) -> DVec3 {
        self.translate
    }

    /// Replace the per-axis scale.
    pub fn set_scale(&mut self, scale: DVec3) {
        self.scale = scale;
    }

    /// Replace the translation.
    pub fn set_translate(&mut self, translate: DVec3) {
        self.translate = translate;
    }

    /// Scale by `factor` keeping the mapped point `center` fixed.
    pub fn zoom(&mut self, factor: DVec3, center: DVec3) {
        self.scale *= factor;
        self.translate = center - (center - self.translate) * factor;
    }

    /// Shift the translation by `offset`.
    pub fn move_by(&mut self, offset: DVec3) {
        self.translate += offset;
    }

    fn inverse_params(&self) -> VantageResult<(DVec3, DVec3)> {
        if self.scale.x == 0.0 || self.scale.y == 0.0 || self.scale.z == 0.0 {
            return Err(VantageError::non_invertible(
                "st scale has a zero component",
            ));
        }
        let inv_scale = self.scale.recip();
        Ok((inv_scale, -self.translate * inv_scale))
    }
}

impl Transform for STTransform {
    fn name(&self) -> &'static str {
        "st"
    }

    fn map(&self, p: DVec3) -> DVec3 {
        p * self.scale + self.translate
    }

    fn imap(&self, p: DVec3) -> VantageResult<DVec3> {
        let (inv_scale, inv_translate) = self.inverse_params()?;
        Ok(p * inv_scale + inv_translate)
    }

    fn is_linear(&self) -> bool {
        true
    }

    fn as_affine(&self) -> Option<DMat4> {
        Some(DMat4::from_translation(self.translate) * DMat4::from_scale(self.scale))
    }

    fn as_scale_translate(&self) -> Option<(DVec3, DVec3)> {
        Some((self.scale, self.translate))
    }

    fn inverse(&self) -> VantageResult<TransformRef> {
        let (scale, translate) = self.inverse_params()?;
        Ok(TransformRef::new(Self { scale, translate }))
    }

    fn shader_map(&self) -> Option<ShaderTemplate> {
        Some(template::ST)
    }

    fn shader_imap(&self) -> Option<ShaderTemplate> {
        Some(template::ST)
    }

    fn shader_uniforms(&self, direction: MapDirection) -> VantageResult<Vec<UniformValue>> {
        let (scale, translate) = match direction {
            MapDirection::Forward => (self.scale, self.translate),
            MapDirection::Inverse => self.inverse_params()?,
        };
        Ok(vec![
            UniformValue::from_dvec3(scale),
            UniformValue::from_dvec3(translate),
        ])
    }
}

/// Full affine transform backed by a homogeneous 4x4 matrix.
///
/// Matrices are expected to be affine (bottom row `0 0 0 1`); both the host
/// and shader paths apply the homogeneous divide, so the two agree exactly,
/// and a degenerate w yields non-finite components rather than an error.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AffineTransform {
    matrix: DMat4,
}

impl AffineTransform {
    /// Identity matrix transform.
    pub fn new() -> Self {
        Self {
            matrix: DMat4::IDENTITY,
        }
    }

    /// Adopt an existing matrix.
    pub fn from_matrix(matrix: DMat4) -> Self {
        Self { matrix }
    }

    /// Current matrix.
    pub fn matrix(&self) -> DMat4 {
        self.matrix
    }

    /// Reset to identity.
    pub fn reset(&mut self) {
        self.matrix = DMat4::IDENTITY;
    }

    /// Rotate by `angle_rad` around `axis`, applied after the current
    /// mapping. A zero axis is a no-op.
    pub fn rotate(&mut self, angle_rad: f64, axis: DVec3) {
        let axis = axis.normalize_or_zero();
        if axis == DVec3::ZERO {
            return;
        }
        self.matrix = DMat4::from_axis_angle(axis, angle_rad) * self.matrix;
    }

    /// Scale per axis, applied after the current mapping.
    pub fn scale(&mut self, factor: DVec3) {
        self.matrix = DMat4::from_scale(factor) * self.matrix;
    }

    /// Translate, applied after the current mapping.
    pub fn translate(&mut self, offset: DVec3) {
        self.matrix = DMat4::from_translation(offset) * self.matrix;
    }

    fn checked_inverse(&self) -> VantageResult<DMat4> {
        let det = self.matrix.determinant();
        if det == 0.0 || !det.is_finite() {
            return Err(VantageError::non_invertible("affine matrix is singular"));
        }
        Ok(self.matrix.inverse())
    }
}

impl Transform for AffineTransform {
    fn name(&self) -> &'static str {
        "affine"
    }

    fn map(&self, p: DVec3) -> DVec3 {
        self.matrix.project_point3(p)
    }

    fn imap(&self, p: DVec3) -> VantageResult<DVec3> {
        Ok(self.checked_inverse()?.project_point3(p))
    }

    fn is_linear(&self) -> bool {
        true
    }

    fn as_affine(&self) -> Option<DMat4> {
        Some(self.matrix)
    }

    fn inverse(&self) -> VantageResult<TransformRef> {
        Ok(TransformRef::new(Self {
            matrix: self.checked_inverse()?,
        }))
    }

    fn shader_map(&self) -> Option<ShaderTemplate> {
        Some(template::AFFINE)
    }

    fn shader_imap(&self) -> Option<ShaderTemplate> {
        Some(template::AFFINE)
    }

    fn shader_uniforms(&self, direction: MapDirection) -> VantageResult<Vec<UniformValue>> {
        let matrix = match direction {
            MapDirection::Forward => self.matrix,
            MapDirection::Inverse => self.checked_inverse()?,
        };
        Ok(vec![UniformValue::from_dmat4(matrix)])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/linear.rs"]
mod tests;
