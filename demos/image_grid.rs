//! Four image drawables, each with a composed transform chain: a sine warp,
//! a rotated 3D affine, a log-scaled axis, and a polar wrap. Prints where
//! probe points land after each chain and the WGSL module a GPU backend
//! would compile for the warped image.

use glam::{DVec2, DVec3};

use vantage::{
    AffineTransform, Canvas, LogTransform, MapDirection, PolarTransform, STTransform,
    ShaderTemplate, Transform, TransformRef, TransformSystem, VantageResult, Viewport,
    assemble_forward, refresh_uniforms,
};

/// Adds a sine wave to the y value for a wavy effect.
#[derive(Debug)]
struct SineTransform;

const SINE_MAP: ShaderTemplate = ShaderTemplate {
    func: "tf_sine",
    source: "\
fn tf_sine(pos: vec4<f32>) -> vec4<f32> {
    return vec4<f32>(pos.x, pos.y + sin(pos.x), pos.z, pos.w);
}",
    params: &[],
};

const SINE_IMAP: ShaderTemplate = ShaderTemplate {
    func: "tf_sine_inv",
    source: "\
fn tf_sine_inv(pos: vec4<f32>) -> vec4<f32> {
    return vec4<f32>(pos.x, pos.y - sin(pos.x), pos.z, pos.w);
}",
    params: &[],
};

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

    fn shader_map(&self) -> Option<ShaderTemplate> {
        Some(SINE_MAP)
    }

    fn shader_imap(&self) -> Option<ShaderTemplate> {
        Some(SINE_IMAP)
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

    fn shader_map(&self) -> Option<ShaderTemplate> {
        Some(SINE_IMAP)
    }

    fn shader_imap(&self) -> Option<ShaderTemplate> {
        Some(SINE_MAP)
    }
}

const IMAGE_SIZE: f64 = 512.0;

fn st(scale: (f64, f64), translate: (f64, f64)) -> TransformRef {
    TransformRef::new(STTransform::xy(
        DVec2::new(scale.0, scale.1),
        DVec2::new(translate.0, translate.1),
    ))
}

/// Normalize the source image to a standard 100x100 box.
fn base_transform() -> TransformRef {
    let s = 100.0 / IMAGE_SIZE;
    let t = 0.5 * (100.0 - IMAGE_SIZE * s);
    st((s, s), (t, t))
}

fn build_chains() -> anyhow::Result<Vec<(&'static str, TransformRef)>> {
    let base = base_transform();

    let warped = st((30.0, 30.0), (600.0, 600.0))
        * TransformRef::new(SineTransform)
        * st((0.1, 0.1), (-5.0, -5.0))
        * base.clone();

    let mut tr = AffineTransform::new();
    tr.rotate(30f64.to_radians(), DVec3::Z);
    tr.rotate(40f64.to_radians(), DVec3::Y);
    tr.scale(DVec3::new(3.0, 3.0, 1.0));
    let rotated = st((1.0, 1.0), (200.0, 600.0))
        * TransformRef::new(tr)
        * st((1.0, 1.0), (-50.0, -50.0))
        * base.clone();

    let log_scaled = st((3.0, -150.0), (200.0, 100.0))
        * TransformRef::new(LogTransform::new(DVec3::new(0.0, 2.0, 0.0))?)
        * st((1.0, -0.01), (-50.0, 1.3))
        * base.clone();

    let pi = std::f64::consts::PI;
    let polar = st((400.0, 400.0), (600.0, 300.0))
        * TransformRef::new(PolarTransform)
        * st((pi / 200.0, 0.005), (-3.0 * pi / 4.0, 0.1))
        * base;

    Ok(vec![
        ("sine-warped", warped),
        ("rotated", rotated),
        ("log-scaled", log_scaled),
        ("polar", polar),
    ])
}

fn main() {
    tracing_subscriber::fmt().init();
    if let Err(e) = try_main() {
        eprintln!("{e:?}");
        std::process::exit(1);
    }
}

fn try_main() -> anyhow::Result<()> {
    let canvas = Canvas::new(800, 800)?;
    let viewport = Viewport::new(0, 0, 800, 800)?;

    let mut systems: Vec<(&str, TransformSystem)> = build_chains()?
        .into_iter()
        .map(|(label, chain)| (label, TransformSystem::new(chain)))
        .collect();
    for (_, sys) in &mut systems {
        sys.configure(canvas, viewport);
    }

    let corners = [
        DVec3::ZERO,
        DVec3::new(IMAGE_SIZE, 0.0, 0.0),
        DVec3::new(IMAGE_SIZE, IMAGE_SIZE, 0.0),
        DVec3::new(0.0, IMAGE_SIZE, 0.0),
    ];
    for (label, sys) in &systems {
        let document = sys.visual_to_document();
        let full = sys.full_transform();
        println!("{label}:");
        for corner in corners {
            let doc = document.map(corner);
            let ndc = full.map(corner);
            println!(
                "  ({:6.1}, {:6.1}) -> document ({:8.2}, {:8.2}) -> ndc ({:6.3}, {:6.3})",
                corner.x, corner.y, doc.x, doc.y, ndc.x, ndc.y
            );
        }
    }

    // The module a GPU backend would compile for the warped image.
    let (_, warped_sys) = &systems[0];
    let shader = assemble_forward(&warped_sys.full_transform(), "visual_to_render")?;
    println!("\n--- {} ---\n{}", shader.entry, shader.source);
    for uniform in &shader.uniforms {
        println!("uniform {} = {:?}", uniform.name, uniform.value);
    }

    // On resize only the uniforms move; the source is compiled once.
    for (_, sys) in &mut systems {
        sys.configure(Canvas::new(1024, 768)?, Viewport::new(0, 0, 1024, 768)?);
    }
    let (_, warped_sys) = &systems[0];
    let refreshed = refresh_uniforms(&warped_sys.full_transform(), MapDirection::Forward)?;
    println!("\nafter resize:");
    for uniform in &refreshed {
        println!("uniform {} = {:?}", uniform.name, uniform.value);
    }

    Ok(())
}
