use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::ops::Mul;
use std::rc::Rc;

use glam::{DMat4, DVec2, DVec3};

use crate::foundation::error::{VantageError, VantageResult};
use crate::shader::template::{MapDirection, ShaderTemplate, UniformValue};
use crate::transform::chain::ChainTransform;
use crate::transform::linear::{AffineTransform, STTransform};

/// Contract every coordinate transform satisfies.
///
/// A transform is a pure mapping between two coordinate spaces with a
/// defined (possibly failing) inverse, an equivalent WGSL fragment for
/// GPU-side evaluation, and capability probes that drive composition and
/// simplification. Implementations must keep `map` total on the documented
/// domain: out-of-domain input resolves to a documented fallback or a
/// non-finite value, never a panic.
pub trait Transform: fmt::Debug {
    /// Short diagnostic tag used in error messages ("st", "polar", ...).
    fn name(&self) -> &'static str;

    /// Forward-map one point.
    fn map(&self, p: DVec3) -> DVec3;

    /// Inverse-map one point. Fails with
    /// [`NonInvertible`](VantageError::NonInvertible) when current
    /// parameters are singular.
    fn imap(&self, p: DVec3) -> VantageResult<DVec3>;

    /// Whether this transform is affine (matrix plus translation).
    /// Linear transforms compose by exact matrix product.
    fn is_linear(&self) -> bool {
        false
    }

    /// The exact matrix of a linear transform, `None` for nonlinear ones.
    fn as_affine(&self) -> Option<DMat4> {
        None
    }

    /// Scale/translate decomposition for the ST-representable family,
    /// enabling the cheap ST-by-ST composition fast path.
    fn as_scale_translate(&self) -> Option<(DVec3, DVec3)> {
        None
    }

    /// Child stages of a composite transform, outermost first.
    fn stages(&self) -> Option<Vec<TransformRef>> {
        None
    }

    /// The paired inverse transform, whose `map` equals this transform's
    /// `imap`. Defaults to non-invertible; invertible transforms return
    /// their algebraic pair (ST with reciprocal scale, Log with negated
    /// base, Polar/InvPolar, ...).
    fn inverse(&self) -> VantageResult<TransformRef> {
        Err(VantageError::non_invertible(format!(
            "{} declares no inverse",
            self.name()
        )))
    }

    /// WGSL fragment implementing `map`, when GPU evaluation is supported.
    fn shader_map(&self) -> Option<ShaderTemplate> {
        None
    }

    /// WGSL fragment implementing `imap`, when GPU evaluation is supported.
    fn shader_imap(&self) -> Option<ShaderTemplate> {
        None
    }

    /// Current parameter values for the fragment in the given direction,
    /// in the fragment's declared parameter order. Inverse-direction values
    /// fail for singular parameters.
    fn shader_uniforms(&self, direction: MapDirection) -> VantageResult<Vec<UniformValue>> {
        let _ = direction;
        Ok(Vec::new())
    }
}

/// Shared, type-erased handle to a transform.
///
/// Clones alias the same underlying object: mutating parameters through a
/// typed [`Shared`] handle is visible to every chain holding a clone. This
/// aliasing is the mechanism viewport reconfiguration relies on and is
/// intentional; handles are single-thread only (`Rc`), matching the
/// one-rendering-thread model.
#[derive(Clone)]
pub struct TransformRef {
    inner: Rc<RefCell<dyn Transform>>,
}

impl TransformRef {
    /// Wrap a transform in a fresh shared handle.
    pub fn new<T: Transform + 'static>(transform: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(transform)),
        }
    }

    pub(crate) fn from_cell(inner: Rc<RefCell<dyn Transform>>) -> Self {
        Self { inner }
    }

    /// Whether two handles alias the same underlying transform object.
    pub fn same_object(&self, other: &TransformRef) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Forward-map one point.
    pub fn map(&self, p: DVec3) -> DVec3 {
        self.inner.borrow().map(p)
    }

    /// Inverse-map one point.
    pub fn imap(&self, p: DVec3) -> VantageResult<DVec3> {
        self.inner.borrow().imap(p)
    }

    /// Forward-map a 2D point at z = 0.
    pub fn map_xy(&self, p: DVec2) -> DVec2 {
        self.map(p.extend(0.0)).truncate()
    }

    /// Inverse-map a 2D point at z = 0.
    pub fn imap_xy(&self, p: DVec2) -> VantageResult<DVec2> {
        Ok(self.imap(p.extend(0.0))?.truncate())
    }

    /// Forward-map a batch of points.
    pub fn map_many(&self, points: &[DVec3]) -> Vec<DVec3> {
        let t = self.inner.borrow();
        points.iter().map(|&p| t.map(p)).collect()
    }

    /// Inverse-map a batch of points.
    pub fn imap_many(&self, points: &[DVec3]) -> VantageResult<Vec<DVec3>> {
        let t = self.inner.borrow();
        points.iter().map(|&p| t.imap(p)).collect()
    }

    /// See [`Transform::name`].
    pub fn name(&self) -> &'static str {
        self.inner.borrow().name()
    }

    /// See [`Transform::is_linear`].
    pub fn is_linear(&self) -> bool {
        self.inner.borrow().is_linear()
    }

    /// See [`Transform::as_affine`].
    pub fn as_affine(&self) -> Option<DMat4> {
        self.inner.borrow().as_affine()
    }

    /// See [`Transform::as_scale_translate`].
    pub fn as_scale_translate(&self) -> Option<(DVec3, DVec3)> {
        self.inner.borrow().as_scale_translate()
    }

    /// See [`Transform::stages`].
    pub fn stages(&self) -> Option<Vec<TransformRef>> {
        self.inner.borrow().stages()
    }

    /// See [`Transform::inverse`].
    pub fn inverse(&self) -> VantageResult<TransformRef> {
        self.inner.borrow().inverse()
    }

    /// See [`Transform::shader_map`].
    pub fn shader_map(&self) -> Option<ShaderTemplate> {
        self.inner.borrow().shader_map()
    }

    /// See [`Transform::shader_imap`].
    pub fn shader_imap(&self) -> Option<ShaderTemplate> {
        self.inner.borrow().shader_imap()
    }

    /// See [`Transform::shader_uniforms`].
    pub fn shader_uniforms(&self, direction: MapDirection) -> VantageResult<Vec<UniformValue>> {
        self.inner.borrow().shader_uniforms(direction)
    }

    /// Simplified equivalent of this transform; see
    /// [`simplify`](crate::simplify).
    pub fn simplified(&self) -> TransformRef {
        crate::transform::chain::simplify(self)
    }

    /// Apply `self` first, then `outer`. Fluent alternative to the `*`
    /// operator (which reads `outer * inner`).
    pub fn then(&self, outer: &TransformRef) -> TransformRef {
        compose(outer, self)
    }
}

impl fmt::Debug for TransformRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.borrow().fmt(f)
    }
}

/// Typed shared handle to a transform, for in-place parameter mutation.
///
/// [`handle`](Self::handle) produces erased [`TransformRef`] aliases of the
/// same cell; clones of a `Shared` alias it too. Mutations through
/// [`borrow_mut`](Self::borrow_mut) are observed by every alias on its next
/// evaluation.
pub struct Shared<T: Transform + 'static> {
    cell: Rc<RefCell<T>>,
}

impl<T: Transform + 'static> Shared<T> {
    /// Move a transform into a fresh shared cell.
    pub fn new(transform: T) -> Self {
        Self {
            cell: Rc::new(RefCell::new(transform)),
        }
    }

    /// Erased alias of the same underlying transform.
    pub fn handle(&self) -> TransformRef {
        let inner: Rc<RefCell<dyn Transform>> = self.cell.clone();
        TransformRef::from_cell(inner)
    }

    /// Immutably borrow the transform.
    pub fn borrow(&self) -> Ref<'_, T> {
        self.cell.borrow()
    }

    /// Mutably borrow the transform to update parameters in place.
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.cell.borrow_mut()
    }
}

impl<T: Transform + 'static> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T: Transform + 'static> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.cell.borrow().fmt(f)
    }
}

/// Compose two transforms: the result applies `inner` first, then `outer`.
///
/// ST-representable operands compose directly into a new [`STTransform`];
/// linear operands collapse into one [`AffineTransform`] by matrix product;
/// anything else becomes a flattened [`ChainTransform`]. Collapsed results
/// copy parameter values and no longer alias the operands; build a
/// [`ChainTransform`] directly when a stage must stay mutable in place.
pub fn compose(outer: &TransformRef, inner: &TransformRef) -> TransformRef {
    if let (Some((s1, t1)), Some((s2, t2))) =
        (outer.as_scale_translate(), inner.as_scale_translate())
    {
        return TransformRef::new(STTransform::new(s1 * s2, s1 * t2 + t1));
    }
    if let (Some(m1), Some(m2)) = (outer.as_affine(), inner.as_affine()) {
        return TransformRef::new(AffineTransform::from_matrix(m1 * m2));
    }
    TransformRef::new(ChainTransform::new(vec![outer.clone(), inner.clone()]))
}

impl Mul for TransformRef {
    type Output = TransformRef;

    fn mul(self, rhs: TransformRef) -> TransformRef {
        compose(&self, &rhs)
    }
}

impl Mul for &TransformRef {
    type Output = TransformRef;

    fn mul(self, rhs: &TransformRef) -> TransformRef {
        compose(self, rhs)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/base.rs"]
mod tests;
