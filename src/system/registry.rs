use glam::DVec3;

use crate::foundation::core::{Canvas, Viewport};
use crate::foundation::error::VantageResult;
use crate::transform::base::{Shared, TransformRef};
use crate::transform::chain::ChainTransform;
use crate::transform::linear::{IdentityTransform, STTransform};

/// Coordinate spaces bridged by a drawable's transform stack, innermost
/// first.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum CoordSpace {
    /// The drawable's own (object) space.
    Visual,
    /// Shared document space.
    Document,
    /// Canvas space in logical pixels.
    Canvas,
    /// Render space (normalized device coordinates).
    Render,
}

impl CoordSpace {
    fn index(self) -> usize {
        match self {
            Self::Visual => 0,
            Self::Document => 1,
            Self::Canvas => 2,
            Self::Render => 3,
        }
    }
}

/// Per-drawable container mapping transform chains to the coordinate
/// systems they bridge.
///
/// A system stacks three segments: the user-supplied visual -> document
/// chain, a document -> canvas transform (identity unless set), and the
/// canvas -> render [`STTransform`] it owns. The windowing system calls
/// [`configure`](Self::configure) on resize; only the canvas -> render
/// stage is mutated, in place, so chains built earlier (and other
/// drawables aliasing the same outer transform via
/// [`share_canvas_transform`](Self::share_canvas_transform)) observe the
/// new viewport on their next evaluation.
#[derive(Debug)]
pub struct TransformSystem {
    visual_to_document: TransformRef,
    document_to_canvas: TransformRef,
    canvas_to_render: Shared<STTransform>,
    canvas: Option<Canvas>,
    viewport: Option<Viewport>,
}

impl TransformSystem {
    /// New system around a visual -> document chain, with identity
    /// document -> canvas and canvas -> render stages until configured.
    pub fn new(visual_to_document: TransformRef) -> Self {
        Self {
            visual_to_document,
            document_to_canvas: TransformRef::new(IdentityTransform),
            canvas_to_render: Shared::new(STTransform::default()),
            canvas: None,
            viewport: None,
        }
    }

    /// The visual -> document chain.
    pub fn visual_to_document(&self) -> TransformRef {
        self.visual_to_document.clone()
    }

    /// Replace the visual -> document chain.
    pub fn set_visual_to_document(&mut self, transform: TransformRef) {
        self.visual_to_document = transform;
    }

    /// The document -> canvas transform.
    pub fn document_to_canvas(&self) -> TransformRef {
        self.document_to_canvas.clone()
    }

    /// Replace the document -> canvas transform.
    pub fn set_document_to_canvas(&mut self, transform: TransformRef) {
        self.document_to_canvas = transform;
    }

    /// Typed handle to the canvas -> render transform, for aliasing it
    /// across drawables that follow the same viewport.
    pub fn share_canvas_transform(&self) -> Shared<STTransform> {
        self.canvas_to_render.clone()
    }

    /// Adopt another drawable's canvas -> render transform.
    pub fn set_canvas_transform(&mut self, transform: Shared<STTransform>) {
        self.canvas_to_render = transform;
    }

    /// Canvas geometry from the last [`configure`](Self::configure) call.
    pub fn canvas(&self) -> Option<Canvas> {
        self.canvas
    }

    /// Viewport from the last [`configure`](Self::configure) call.
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Reconfigure for a new canvas/viewport, mutating the canvas -> render
    /// transform in place: device pixels map to normalized device
    /// coordinates with y flipped (top-left pixel to (-1, 1)). All other
    /// stages are untouched.
    #[tracing::instrument(skip(self))]
    pub fn configure(&mut self, canvas: Canvas, viewport: Viewport) {
        let w = f64::from(viewport.width);
        let h = f64::from(viewport.height);
        let x = f64::from(viewport.x);
        let y = f64::from(viewport.y);
        let mut st = self.canvas_to_render.borrow_mut();
        st.set_scale(DVec3::new(2.0 / w, -2.0 / h, 1.0));
        st.set_translate(DVec3::new(-1.0 - 2.0 * x / w, 1.0 + 2.0 * y / h, 0.0));
        drop(st);
        self.canvas = Some(canvas);
        self.viewport = Some(viewport);
    }

    /// The full visual -> render chain.
    ///
    /// Built structurally (no collapsing), so later `configure` calls stay
    /// visible through the shared outer stage.
    pub fn full_transform(&self) -> TransformRef {
        TransformRef::new(ChainTransform::new(vec![
            self.canvas_to_render.handle(),
            self.document_to_canvas.clone(),
            self.visual_to_document.clone(),
        ]))
    }

    /// Transform bridging `from` to `to`. Reversed spans are served via
    /// [`inverse`](TransformRef::inverse) and fail when a segment is not
    /// invertible.
    pub fn get_transform(&self, from: CoordSpace, to: CoordSpace) -> VantageResult<TransformRef> {
        let (lo, hi) = (from.index(), to.index());
        if lo == hi {
            return Ok(TransformRef::new(IdentityTransform));
        }
        if lo > hi {
            return self.get_transform(to, from)?.inverse();
        }

        // Segments innermost first: visual->document, document->canvas,
        // canvas->render.
        let segments = [
            self.visual_to_document.clone(),
            self.document_to_canvas.clone(),
            self.canvas_to_render.handle(),
        ];
        let mut span: Vec<TransformRef> = segments[lo..hi].iter().cloned().collect();
        span.reverse();
        if span.len() == 1 {
            return Ok(span.swap_remove(0));
        }
        Ok(TransformRef::new(ChainTransform::new(span)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/system/registry.rs"]
mod tests;
