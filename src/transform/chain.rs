use glam::{DMat4, DVec3};

use crate::foundation::error::{VantageError, VantageResult};
use crate::transform::base::{Transform, TransformRef, compose};
use crate::transform::linear::IdentityTransform;

/// Ordered sequence of transforms, outermost (applied last) first.
///
/// `ChainTransform::new(vec![a, b, c])` evaluates `a(b(c(x)))`, matching
/// the `a * b * c` composition convention. Construction flattens nested
/// chains, so a chain never directly contains another chain, but performs
/// no collapsing: stages keep their object identity, and in-place
/// parameter mutation through a shared stage handle stays visible. Use
/// [`simplify`] for the collapsing pass.
#[derive(Debug)]
pub struct ChainTransform {
    stages: Vec<TransformRef>,
}

impl ChainTransform {
    /// Build a chain from stages in composition order, flattening any
    /// stage that is itself a chain.
    pub fn new(stages: Vec<TransformRef>) -> Self {
        let mut flat = Vec::with_capacity(stages.len());
        for stage in stages {
            match stage.stages() {
                Some(children) => flat.extend(children),
                None => flat.push(stage),
            }
        }
        Self { stages: flat }
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the chain has no stages (the identity chain).
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl Transform for ChainTransform {
    fn name(&self) -> &'static str {
        "chain"
    }

    fn map(&self, p: DVec3) -> DVec3 {
        self.stages.iter().rev().fold(p, |acc, stage| stage.map(acc))
    }

    fn imap(&self, p: DVec3) -> VantageResult<DVec3> {
        let mut acc = p;
        for (position, stage) in self.stages.iter().enumerate() {
            acc = stage.imap(acc).map_err(|err| {
                VantageError::non_invertible(format!(
                    "chain stage {position} ({}): {err}",
                    stage.name()
                ))
            })?;
        }
        Ok(acc)
    }

    fn is_linear(&self) -> bool {
        self.stages.iter().all(TransformRef::is_linear)
    }

    fn as_affine(&self) -> Option<DMat4> {
        self.stages
            .iter()
            .try_fold(DMat4::IDENTITY, |acc, stage| Some(acc * stage.as_affine()?))
    }

    fn as_scale_translate(&self) -> Option<(DVec3, DVec3)> {
        self.stages
            .iter()
            .rev()
            .try_fold((DVec3::ONE, DVec3::ZERO), |(s2, t2), stage| {
                let (s1, t1) = stage.as_scale_translate()?;
                Some((s1 * s2, s1 * t2 + t1))
            })
    }

    fn stages(&self) -> Option<Vec<TransformRef>> {
        Some(self.stages.clone())
    }

    fn inverse(&self) -> VantageResult<TransformRef> {
        let mut inverted = Vec::with_capacity(self.stages.len());
        for (position, stage) in self.stages.iter().enumerate().rev() {
            let inverse = stage.inverse().map_err(|err| {
                VantageError::non_invertible(format!(
                    "chain stage {position} ({}): {err}",
                    stage.name()
                ))
            })?;
            inverted.push(inverse);
        }
        Ok(TransformRef::new(Self::new(inverted)))
    }
}

/// Collapse adjacent linear stages and strip exact identity stages.
///
/// Pure and idempotent: the input (and every stage it aliases) is left
/// untouched, collapsed stages are fresh values. An empty result
/// normalizes to [`IdentityTransform`], a single surviving stage is
/// returned as itself. Non-chain transforms simplify to themselves.
pub fn simplify(transform: &TransformRef) -> TransformRef {
    let Some(stages) = transform.stages() else {
        return transform.clone();
    };

    let mut out: Vec<TransformRef> = Vec::new();
    for stage in stages {
        let merged = match out.last() {
            Some(prev) if prev.is_linear() && stage.is_linear() => Some(compose(prev, &stage)),
            _ => None,
        };
        match merged {
            Some(merged) => {
                out.pop();
                out.push(merged);
            }
            None => out.push(stage),
        }
    }
    out.retain(|stage| !is_identity(stage));

    tracing::debug!(stages = out.len(), "simplified transform chain");
    match out.len() {
        0 => TransformRef::new(IdentityTransform),
        1 => out.swap_remove(0),
        _ => TransformRef::new(ChainTransform::new(out)),
    }
}

fn is_identity(stage: &TransformRef) -> bool {
    stage.as_scale_translate() == Some((DVec3::ONE, DVec3::ZERO))
        || stage.as_affine() == Some(DMat4::IDENTITY)
}

#[cfg(test)]
#[path = "../../tests/unit/transform/chain.rs"]
mod tests;
