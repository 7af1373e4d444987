use std::fmt::Write as _;

use crate::foundation::error::{VantageError, VantageResult};
use crate::shader::template::{MapDirection, ShaderTemplate, UniformValue};
use crate::transform::base::TransformRef;

/// A uniform slot of an assembled module, in declaration order.
#[derive(Clone, Debug, PartialEq)]
pub struct NamedUniform {
    /// Field name inside the module's parameter block.
    pub name: String,
    /// Value snapshot to upload.
    pub value: UniformValue,
}

/// A compilable WGSL module implementing a transform chain.
///
/// The module declares the deduplicated per-variant fragments, one uniform
/// parameter block at `@group(0) @binding(0)` (omitted when no stage takes
/// parameters), and an entry function `fn <entry>(pos: vec4<f32>) ->
/// vec4<f32>` calling the stages in evaluation order. Source text depends
/// only on the chain's structure; when parameters change (viewport resize),
/// re-upload [`refresh_uniforms`] without recompiling.
#[derive(Clone, Debug)]
pub struct ComposedShader {
    /// Entry function name.
    pub entry: String,
    /// Complete WGSL module source.
    pub source: String,
    /// Uniform values in parameter-block declaration order.
    pub uniforms: Vec<NamedUniform>,
}

/// Assemble the WGSL module evaluating `transform`'s forward map.
#[tracing::instrument(skip(transform))]
pub fn assemble_forward(transform: &TransformRef, entry: &str) -> VantageResult<ComposedShader> {
    assemble(transform, entry, MapDirection::Forward)
}

/// Assemble the WGSL module evaluating `transform`'s inverse map.
///
/// Fails when any stage lacks an inverse fragment or has singular
/// parameters.
#[tracing::instrument(skip(transform))]
pub fn assemble_inverse(transform: &TransformRef, entry: &str) -> VantageResult<ComposedShader> {
    assemble(transform, entry, MapDirection::Inverse)
}

/// Re-snapshot the uniform values of a previously assembled module.
///
/// Names and ordering match what [`assemble_forward`]/[`assemble_inverse`]
/// reported for the same transform and direction.
pub fn refresh_uniforms(
    transform: &TransformRef,
    direction: MapDirection,
) -> VantageResult<Vec<NamedUniform>> {
    let stages = eval_order(transform, direction);
    let mut uniforms = Vec::new();
    for (index, stage) in stages.iter().enumerate() {
        let template = stage_template(index, stage, direction)?;
        collect_stage_uniforms(index, stage, template, direction, &mut uniforms)?;
    }
    Ok(uniforms)
}

fn assemble(
    transform: &TransformRef,
    entry: &str,
    direction: MapDirection,
) -> VantageResult<ComposedShader> {
    validate_entry(entry)?;

    let stages = eval_order(transform, direction);
    let mut fragments: Vec<ShaderTemplate> = Vec::new();
    let mut calls: Vec<String> = Vec::new();
    let mut uniforms: Vec<NamedUniform> = Vec::new();

    for (index, stage) in stages.iter().enumerate() {
        let template = stage_template(index, stage, direction)?;
        if template.func == entry {
            return Err(VantageError::shader(format!(
                "entry `{entry}` collides with fragment function `{}`",
                template.func
            )));
        }
        match fragments.iter().find(|seen| seen.func == template.func) {
            Some(seen) if seen.source != template.source => {
                return Err(VantageError::shader(format!(
                    "conflicting fragments for function `{}`",
                    template.func
                )));
            }
            Some(_) => {}
            None => fragments.push(template),
        }

        let first_uniform = uniforms.len();
        collect_stage_uniforms(index, stage, template, direction, &mut uniforms)?;

        let mut call = format!("p = {}(p", template.func);
        for uniform in &uniforms[first_uniform..] {
            let _ = write!(call, ", {entry}_u.{}", uniform.name);
        }
        call.push_str(");");
        calls.push(call);
    }

    let mut source = String::new();
    for fragment in &fragments {
        source.push_str(fragment.source.trim_end());
        source.push_str("\n\n");
    }
    if !uniforms.is_empty() {
        let _ = writeln!(source, "struct {entry}_params {{");
        for uniform in &uniforms {
            let _ = writeln!(source, "    {}: {},", uniform.name, uniform.value.wgsl_ty());
        }
        source.push_str("}\n\n");
        let _ = writeln!(
            source,
            "@group(0) @binding(0) var<uniform> {entry}_u: {entry}_params;"
        );
        source.push('\n');
    }
    let _ = writeln!(source, "fn {entry}(pos: vec4<f32>) -> vec4<f32> {{");
    source.push_str("    var p = pos;\n");
    for call in &calls {
        let _ = writeln!(source, "    {call}");
    }
    source.push_str("    return p;\n}\n");

    tracing::debug!(
        stages = stages.len(),
        uniforms = uniforms.len(),
        "assembled transform shader"
    );
    Ok(ComposedShader {
        entry: entry.to_owned(),
        source,
        uniforms,
    })
}

/// Stages in evaluation order for the given direction: innermost first for
/// the forward map, outermost first for the inverse map.
fn eval_order(transform: &TransformRef, direction: MapDirection) -> Vec<TransformRef> {
    let mut stages = transform
        .stages()
        .unwrap_or_else(|| vec![transform.clone()]);
    if direction == MapDirection::Forward {
        stages.reverse();
    }
    stages
}

fn stage_template(
    index: usize,
    stage: &TransformRef,
    direction: MapDirection,
) -> VantageResult<ShaderTemplate> {
    let template = match direction {
        MapDirection::Forward => stage.shader_map(),
        MapDirection::Inverse => stage.shader_imap(),
    };
    template.ok_or_else(|| {
        VantageError::shader(format!(
            "stage {index} ({}) has no {} shader fragment",
            stage.name(),
            match direction {
                MapDirection::Forward => "forward",
                MapDirection::Inverse => "inverse",
            }
        ))
    })
}

fn collect_stage_uniforms(
    index: usize,
    stage: &TransformRef,
    template: ShaderTemplate,
    direction: MapDirection,
    uniforms: &mut Vec<NamedUniform>,
) -> VantageResult<()> {
    let values = stage.shader_uniforms(direction)?;
    if values.len() != template.params.len() {
        return Err(VantageError::shader(format!(
            "stage {index} ({}) supplied {} uniforms for {} fragment parameters",
            stage.name(),
            values.len(),
            template.params.len()
        )));
    }
    for (param, value) in template.params.iter().zip(values) {
        if value.wgsl_ty() != param.ty {
            return Err(VantageError::shader(format!(
                "stage {index} ({}) uniform `{}` is {}, fragment expects {}",
                stage.name(),
                param.name,
                value.wgsl_ty(),
                param.ty
            )));
        }
        uniforms.push(NamedUniform {
            name: format!("s{index}_{}", param.name),
            value,
        });
    }
    Ok(())
}

fn validate_entry(entry: &str) -> VantageResult<()> {
    let mut chars = entry.chars();
    let head_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !head_ok || !entry.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(VantageError::shader(format!(
            "entry `{entry}` is not a valid WGSL identifier"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/shader/assemble.rs"]
mod tests;
