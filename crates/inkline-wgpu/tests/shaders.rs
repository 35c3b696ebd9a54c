use inkline::{GlyphVertex, JointPolylineVertex, SimplePolylineVertex};
use inkline_wgpu::{shaders, SurfaceUniform, VertexLayout, STYLE_UNIFORM_SIZE};
use naga::valid::{Capabilities, ValidationFlags, Validator};

fn parse(source: &str) -> naga::Module {
    naga::front::wgsl::parse_str(source)
        .unwrap_or_else(|err| panic!("{}", err.emit_to_string(source)))
}

fn validate(source: &str) -> naga::Module {
    let module = parse(source);
    Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .unwrap_or_else(|err| panic!("{err:?}"));
    module
}

fn entry_points(module: &naga::Module) -> Vec<(String, naga::ShaderStage)> {
    module
        .entry_points
        .iter()
        .map(|ep| (ep.name.clone(), ep.stage))
        .collect()
}

fn global_size(module: &naga::Module, name: &str) -> u32 {
    let (_, global) = module
        .global_variables
        .iter()
        .find(|(_, var)| var.name.as_deref() == Some(name))
        .unwrap_or_else(|| panic!("no global named {name}"));
    module.types[global.ty].inner.size(module.to_ctx())
}

fn collect_locations(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
    out: &mut Vec<u32>,
) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => out.push(*location),
        Some(naga::Binding::BuiltIn(_)) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect_locations(module, member.ty, member.binding.as_ref(), out);
                }
            }
        }
    }
}

/// Input locations consumed by `vs_main`, sorted.
fn vertex_input_locations(module: &naga::Module) -> Vec<u32> {
    let entry = module
        .entry_points
        .iter()
        .find(|ep| ep.name == "vs_main")
        .expect("vs_main");
    let mut locations = Vec::new();
    for argument in &entry.function.arguments {
        collect_locations(module, argument.ty, argument.binding.as_ref(), &mut locations);
    }
    locations.sort_unstable();
    locations
}

fn layout_locations<T: VertexLayout>() -> Vec<u32> {
    let mut locations: Vec<u32> = T::desc()
        .attributes
        .iter()
        .map(|attribute| attribute.shader_location)
        .collect();
    locations.sort_unstable();
    locations
}

#[test]
fn test_glyph_shader_validates() {
    let module = validate(shaders::GLYPH);
    let entries = entry_points(&module);

    assert!(entries.contains(&("vs_main".into(), naga::ShaderStage::Vertex)));
    assert!(entries.contains(&("fs_grayscale".into(), naga::ShaderStage::Fragment)));
    assert!(entries.contains(&("fs_subpixel".into(), naga::ShaderStage::Fragment)));
}

#[test]
fn test_line_shaders_validate() {
    for source in [shaders::JOINT_LINE, shaders::SIMPLE_LINE] {
        let module = validate(source);
        let entries = entry_points(&module);
        assert!(entries.contains(&("vs_main".into(), naga::ShaderStage::Vertex)));
        assert!(entries.contains(&("fs_main".into(), naga::ShaderStage::Fragment)));
    }
}

#[test]
fn test_glyph_fragments_write_two_blend_sources() {
    let module = parse(shaders::GLYPH);
    for name in ["fs_grayscale", "fs_subpixel"] {
        let entry = module
            .entry_points
            .iter()
            .find(|ep| ep.name == name)
            .expect("fragment entry point");
        let result = entry.function.result.as_ref().expect("fragment output");
        let naga::TypeInner::Struct { members, .. } = &module.types[result.ty].inner else {
            panic!("{name} must return a struct");
        };

        let blend_sources: Vec<Option<u32>> = members
            .iter()
            .map(|member| match member.binding {
                Some(naga::Binding::Location {
                    location: 0,
                    blend_src,
                    ..
                }) => blend_src,
                _ => None,
            })
            .collect();
        assert_eq!(blend_sources, vec![Some(0), Some(1)]);
    }
}

#[test]
fn test_uniform_structs_match_host_layout() {
    for source in [shaders::GLYPH, shaders::JOINT_LINE, shaders::SIMPLE_LINE] {
        let module = parse(source);
        assert_eq!(
            global_size(&module, "surface") as usize,
            std::mem::size_of::<SurfaceUniform>()
        );
        assert_eq!(global_size(&module, "style") as u64, STYLE_UNIFORM_SIZE);
    }
}

#[test]
fn test_vertex_inputs_match_buffer_layouts() {
    assert_eq!(
        vertex_input_locations(&parse(shaders::GLYPH)),
        layout_locations::<GlyphVertex>()
    );
    assert_eq!(
        vertex_input_locations(&parse(shaders::JOINT_LINE)),
        layout_locations::<JointPolylineVertex>()
    );
    assert_eq!(
        vertex_input_locations(&parse(shaders::SIMPLE_LINE)),
        layout_locations::<SimplePolylineVertex>()
    );
}
