use super::*;
use glam::{DVec2, DVec3};

use crate::transform::base::compose;
use crate::transform::linear::{IdentityTransform, STTransform};
use crate::transform::nonlinear::PolarTransform;

fn assert_close(a: DVec3, b: DVec3) {
    assert!((a - b).length() < 1e-9, "{a:?} != {b:?}");
}

fn st(scale: DVec2, translate: DVec2) -> TransformRef {
    TransformRef::new(STTransform::xy(scale, translate))
}

/// Adds a sine wave to y for a wavy effect; the user-extension example.
#[derive(Debug)]
struct SineTransform;

impl Transform for SineTransform {
    fn name(&self) -> &'static str {
        "sine"
    }

    fn map(&self, p: DVec3) -> DVec3 {
        DVec3::new(p.x, p.y + p.x.sin(), p.z)
    }

    fn imap(&self, p: DVec3) -> VantageResult<DVec3> {
        Ok(DVec3::new(p.x, p.y - p.x.sin(), p.z))
    }

    fn inverse(&self) -> VantageResult<TransformRef> {
        Ok(TransformRef::new(InvSineTransform))
    }
}

#[derive(Debug)]
struct InvSineTransform;

impl Transform for InvSineTransform {
    fn name(&self) -> &'static str {
        "sine_inv"
    }

    fn map(&self, p: DVec3) -> DVec3 {
        DVec3::new(p.x, p.y - p.x.sin(), p.z)
    }

    fn imap(&self, p: DVec3) -> VantageResult<DVec3> {
        Ok(DVec3::new(p.x, p.y + p.x.sin(), p.z))
    }

    fn inverse(&self) -> VantageResult<TransformRef> {
        Ok(TransformRef::new(SineTransform))
    }
}

#[test]
fn chain_evaluates_right_to_left() {
    let chain = st(DVec2::new(30.0, 30.0), DVec2::new(600.0, 600.0))
        * TransformRef::new(SineTransform)
        * st(DVec2::new(0.1, 0.1), DVec2::new(-5.0, -5.0));

    // Staged by hand, innermost first.
    let after_inner = DVec3::new(-5.0, -5.0, 0.0);
    let after_sine = DVec3::new(after_inner.x, after_inner.y + after_inner.x.sin(), 0.0);
    let expected = DVec3::new(
        600.0 + 30.0 * after_sine.x,
        600.0 + 30.0 * after_sine.y,
        0.0,
    );
    assert_close(chain.map(DVec3::ZERO), expected);
    assert_close(chain.imap(expected).unwrap(), DVec3::ZERO);
}

#[test]
fn chains_never_nest() {
    let inner_chain = st(DVec2::ONE, DVec2::new(1.0, 0.0)) * TransformRef::new(SineTransform);
    let outer_chain = TransformRef::new(PolarTransform) * inner_chain;
    let stages = outer_chain.stages().unwrap();
    assert_eq!(stages.len(), 3);
    assert!(stages.iter().all(|stage| stage.stages().is_none()));
}

#[test]
fn chain_new_preserves_stage_identity() {
    let shared = st(DVec2::new(2.0, 2.0), DVec2::ZERO);
    let chain = TransformRef::new(ChainTransform::new(vec![
        shared.clone(),
        TransformRef::new(SineTransform),
    ]));
    assert!(chain.stages().unwrap()[0].same_object(&shared));
}

#[test]
fn all_linear_chain_reports_affine_product() {
    let a = st(DVec2::new(2.0, 2.0), DVec2::new(1.0, 0.0));
    let b = st(DVec2::new(0.5, 4.0), DVec2::new(0.0, -2.0));
    let chain = TransformRef::new(ChainTransform::new(vec![a.clone(), b.clone()]));
    assert!(chain.is_linear());
    assert_eq!(
        chain.as_affine().unwrap(),
        a.as_affine().unwrap() * b.as_affine().unwrap()
    );
}

#[test]
fn chain_imap_reports_failing_stage_position() {
    let chain = TransformRef::new(ChainTransform::new(vec![
        st(DVec2::new(2.0, 2.0), DVec2::ZERO),
        st(DVec2::new(0.0, 1.0), DVec2::ZERO),
        TransformRef::new(SineTransform),
    ]));
    let err = chain.imap(DVec3::ZERO).unwrap_err();
    assert!(err.to_string().contains("chain stage 1 (st)"), "{err}");
}

#[test]
fn chain_inverse_reverses_and_inverts() {
    let chain = st(DVec2::new(3.0, 3.0), DVec2::new(1.0, 2.0))
        * TransformRef::new(SineTransform)
        * st(DVec2::new(0.5, 0.5), DVec2::ZERO);
    let inverse = chain.inverse().unwrap();
    let p = DVec3::new(0.25, -1.5, 0.0);
    assert_close(inverse.map(chain.map(p)), p);
    assert_close(chain.map(inverse.map(p)), p);
}

#[test]
fn sine_double_inverse_behaves_identically() {
    let sine = TransformRef::new(SineTransform);
    let twice = sine.inverse().unwrap().inverse().unwrap();
    for p in [DVec3::ZERO, DVec3::new(1.3, -0.5, 2.0)] {
        assert_close(twice.map(p), sine.map(p));
        assert_close(twice.imap(p).unwrap(), sine.imap(p).unwrap());
    }
}

#[test]
fn simplify_collapses_adjacent_linear_runs() {
    let chain = TransformRef::new(ChainTransform::new(vec![
        st(DVec2::new(2.0, 2.0), DVec2::ZERO),
        st(DVec2::new(1.0, 1.0), DVec2::new(3.0, 0.0)),
        TransformRef::new(SineTransform),
        st(DVec2::new(0.5, 0.5), DVec2::ZERO),
    ]));
    let simplified = simplify(&chain);
    let stages = simplified.stages().unwrap();
    assert_eq!(stages.len(), 3);
    assert!(stages[0].is_linear());
    assert_eq!(stages[1].name(), "sine");

    let p = DVec3::new(0.7, -0.2, 0.0);
    assert_close(simplified.map(p), chain.map(p));
}

#[test]
fn simplify_is_idempotent() {
    let chain = TransformRef::new(ChainTransform::new(vec![
        st(DVec2::new(2.0, 2.0), DVec2::ZERO),
        st(DVec2::new(0.5, 0.5), DVec2::ZERO),
        TransformRef::new(SineTransform),
        st(DVec2::new(4.0, 1.0), DVec2::new(-1.0, 0.0)),
        TransformRef::new(IdentityTransform),
    ]));
    let once = simplify(&chain);
    let twice = simplify(&once);
    assert_eq!(format!("{once:?}"), format!("{twice:?}"));
    let p = DVec3::new(1.1, 2.2, 0.0);
    assert_close(once.map(p), twice.map(p));
}

#[test]
fn simplify_normalizes_degenerate_chains() {
    // Mutually cancelling STs collapse to the identity.
    let cancelling = TransformRef::new(ChainTransform::new(vec![
        st(DVec2::new(2.0, 2.0), DVec2::ZERO),
        st(DVec2::new(0.5, 0.5), DVec2::ZERO),
    ]));
    assert_eq!(simplify(&cancelling).name(), "identity");

    // A single surviving stage is returned as itself, not a chain.
    let single = TransformRef::new(ChainTransform::new(vec![TransformRef::new(SineTransform)]));
    assert_eq!(simplify(&single).name(), "sine");
    assert!(simplify(&single).stages().is_none());

    // Non-chain transforms simplify to themselves.
    let sine = TransformRef::new(SineTransform);
    assert!(simplify(&sine).same_object(&sine));
}

#[test]
fn simplify_leaves_the_input_untouched() {
    let shared = st(DVec2::new(2.0, 2.0), DVec2::ZERO);
    let chain = TransformRef::new(ChainTransform::new(vec![
        shared.clone(),
        st(DVec2::new(3.0, 3.0), DVec2::ZERO),
    ]));
    let _ = simplify(&chain);
    assert_eq!(chain.stages().unwrap().len(), 2);
    assert!(chain.stages().unwrap()[0].same_object(&shared));
}

#[test]
fn composing_with_identity_simplifies_away() {
    let sine = TransformRef::new(SineTransform);
    let chain = TransformRef::new(IdentityTransform) * sine;
    let simplified = simplify(&chain);
    assert_eq!(simplified.name(), "sine");
}
