use glam::{DMat4, DVec3};

/// Which mapping of a transform a shader fragment or uniform set serves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MapDirection {
    /// The forward `map` direction.
    Forward,
    /// The inverse `imap` direction.
    Inverse,
}

/// Uniform parameter a shader fragment expects after the point argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UniformParam {
    /// Parameter name, unique within the fragment.
    pub name: &'static str,
    /// WGSL type, e.g. `vec3<f32>`.
    pub ty: &'static str,
}

/// WGSL source fragment implementing one transform variant.
///
/// Fragment text is static metadata keyed by the variant, not per-instance
/// state: current parameter values are passed as uniforms, so a backend can
/// cache the compiled module by source and only re-upload uniforms when
/// parameters change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShaderTemplate {
    /// Name of the function `source` declares.
    pub func: &'static str,
    /// Complete WGSL function definition.
    pub source: &'static str,
    /// Uniform parameters in call order.
    pub params: &'static [UniformParam],
}

/// A uniform value snapshot, in GPU precision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    /// A `vec3<f32>` value.
    Vec3([f32; 3]),
    /// A column-major `mat4x4<f32>` value.
    Mat4([[f32; 4]; 4]),
}

impl UniformValue {
    /// The WGSL type of this value.
    pub fn wgsl_ty(&self) -> &'static str {
        match self {
            Self::Vec3(_) => "vec3<f32>",
            Self::Mat4(_) => "mat4x4<f32>",
        }
    }

    /// Narrow a host-precision vector to a uniform value.
    pub fn from_dvec3(v: DVec3) -> Self {
        Self::Vec3(v.as_vec3().to_array())
    }

    /// Narrow a host-precision matrix to a uniform value.
    pub fn from_dmat4(m: DMat4) -> Self {
        Self::Mat4(m.as_mat4().to_cols_array_2d())
    }
}

/// Identity passthrough.
pub const IDENTITY: ShaderTemplate = ShaderTemplate {
    func: "tf_identity",
    source: "\
fn tf_identity(pos: vec4<f32>) -> vec4<f32> {
    return pos;
}",
    params: &[],
};

/// Scale-translate. The inverse direction reuses this fragment with
/// reciprocal scale and negated, rescaled translation uniforms.
pub const ST: ShaderTemplate = ShaderTemplate {
    func: "tf_st",
    source: "\
fn tf_st(pos: vec4<f32>, scale: vec3<f32>, translate: vec3<f32>) -> vec4<f32> {
    return vec4<f32>(pos.xyz * scale + translate, pos.w);
}",
    params: &[
        UniformParam {
            name: "scale",
            ty: "vec3<f32>",
        },
        UniformParam {
            name: "translate",
            ty: "vec3<f32>",
        },
    ],
};

/// Homogeneous matrix transform. The inverse direction reuses this fragment
/// with the inverted matrix uniform.
pub const AFFINE: ShaderTemplate = ShaderTemplate {
    func: "tf_affine",
    source: "\
fn tf_affine(pos: vec4<f32>, m: mat4x4<f32>) -> vec4<f32> {
    let q = m * pos;
    return vec4<f32>(q.xyz / q.w, 1.0);
}",
    params: &[UniformParam {
        name: "m",
        ty: "mat4x4<f32>",
    }],
};

/// Signed-base per-axis logarithm. Axes with base 0 pass through; negative
/// bases select the inverse exponential, so the inverse direction reuses
/// this fragment with a negated base uniform.
pub const LOG: ShaderTemplate = ShaderTemplate {
    func: "tf_log",
    source: "\
fn tf_log(pos: vec4<f32>, base: vec3<f32>) -> vec4<f32> {
    let b = abs(base);
    let lg = sign(pos.xyz) * (log(abs(pos.xyz) + 1.0) / log(b));
    let ex = sign(pos.xyz) * (pow(b, abs(pos.xyz)) - 1.0);
    var res = select(lg, ex, base < vec3<f32>(0.0));
    res = select(res, pos.xyz, base == vec3<f32>(0.0));
    return vec4<f32>(res, pos.w);
}",
    params: &[UniformParam {
        name: "base",
        ty: "vec3<f32>",
    }],
};

/// Polar `(theta, r)` to Cartesian `(x, y)`.
pub const POLAR: ShaderTemplate = ShaderTemplate {
    func: "tf_polar",
    source: "\
fn tf_polar(pos: vec4<f32>) -> vec4<f32> {
    return vec4<f32>(pos.y * cos(pos.x), pos.y * sin(pos.x), pos.z, pos.w);
}",
    params: &[],
};

/// Cartesian `(x, y)` to polar `(theta, r)`; `atan2(0, 0)` is 0, so the
/// origin maps without error.
pub const POLAR_INV: ShaderTemplate = ShaderTemplate {
    func: "tf_polar_inv",
    source: "\
fn tf_polar_inv(pos: vec4<f32>) -> vec4<f32> {
    return vec4<f32>(atan2(pos.y, pos.x), length(pos.xy), pos.z, pos.w);
}",
    params: &[],
};
