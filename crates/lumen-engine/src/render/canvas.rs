use wgpu::util::DeviceExt;

use crate::coords::Viewport;
use crate::program::{BootstrapError, Program, ShaderStage};
use crate::render::{RenderCtx, RenderTarget};

use super::quad::{QuadVertex, QUAD_VERTEX_COUNT, QUAD_VERTICES};
use super::uniforms::UniformSet;

/// GPU side of a linked program: pipeline, quad buffer and one uniform
/// buffer per declared uniform, all bound in group 0.
pub struct CanvasRenderer {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    quad_vbo: wgpu::Buffer,
    uniform_buffers: Vec<wgpu::Buffer>,
}

impl CanvasRenderer {
    /// Creates the pipeline for `program` and uploads the quad.
    ///
    /// `program` must be linked and `uniforms` built from its uniform table;
    /// buffers are created in the same order the set iterates. Anything the
    /// device still rejects is returned as a link failure.
    pub fn new(
        ctx: &RenderCtx<'_>,
        program: &Program,
        uniforms: &UniformSet,
    ) -> Result<Self, BootstrapError> {
        if !program.is_linked() {
            return Err(BootstrapError::NotLinked);
        }

        let scope = ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let module = |stage: ShaderStage| {
            let source = program.stage(stage).map(|s| s.source()).unwrap_or_default();
            ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(match stage {
                    ShaderStage::Vertex => "lumen vertex shader",
                    ShaderStage::Fragment => "lumen fragment shader",
                }),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            })
        };
        let vs = module(ShaderStage::Vertex);
        let fs = module(ShaderStage::Fragment);

        let layout_entries: Vec<wgpu::BindGroupLayoutEntry> = uniforms
            .iter()
            .map(|(loc, _)| {
                let mut visibility = wgpu::ShaderStages::NONE;
                if loc.vertex {
                    visibility |= wgpu::ShaderStages::VERTEX;
                }
                if loc.fragment {
                    visibility |= wgpu::ShaderStages::FRAGMENT;
                }
                wgpu::BindGroupLayoutEntry {
                    binding: loc.binding,
                    visibility,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: std::num::NonZeroU64::new(loc.size),
                    },
                    count: None,
                }
            })
            .collect();

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("lumen uniforms bgl"),
                    entries: &layout_entries,
                });

        let uniform_buffers: Vec<wgpu::Buffer> = uniforms
            .iter()
            .map(|(loc, _)| {
                ctx.device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some(loc.name.as_str()),
                    size: uniform_buffer_size(loc.size),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                })
            })
            .collect();

        let bind_entries: Vec<wgpu::BindGroupEntry> = uniforms
            .iter()
            .zip(&uniform_buffers)
            .map(|((loc, _), buf)| wgpu::BindGroupEntry {
                binding: loc.binding,
                resource: buf.as_entire_binding(),
            })
            .collect();

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lumen uniforms bind group"),
            layout: &bind_group_layout,
            entries: &bind_entries,
        });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("lumen canvas pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    immediate_size: 0,
                });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("lumen canvas pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vs,
                entry_point: Some(ShaderStage::Vertex.entry_point()),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs,
                entry_point: Some(ShaderStage::Fragment.entry_point()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(scope.pop()) {
            return Err(device_rejected(&err));
        }

        let quad_vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lumen quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        log::info!(
            "canvas pipeline ready ({} uniform buffer(s), {:?})",
            uniform_buffers.len(),
            ctx.surface_format
        );

        Ok(Self {
            pipeline,
            bind_group,
            quad_vbo,
            uniform_buffers,
        })
    }

    /// Pushes every uniform and draws the quad once into `viewport`.
    pub fn draw(
        &self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        uniforms: &UniformSet,
        viewport: Viewport,
    ) {
        if !viewport.is_valid() {
            return;
        }

        for ((_, value), buf) in uniforms.iter().zip(&self.uniform_buffers) {
            let bytes = value.as_bytes();
            if !bytes.is_empty() {
                ctx.queue.write_buffer(buf, 0, bytes);
            }
        }

        let mut rpass = target.clear_pass("lumen canvas pass", wgpu::Color::BLACK);
        rpass.set_pipeline(&self.pipeline);
        rpass.set_viewport(viewport.x, viewport.y, viewport.width, viewport.height, 0.0, 1.0);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.quad_vbo.slice(..));
        rpass.draw(0..QUAD_VERTEX_COUNT, 0..1);
    }
}

fn device_rejected(err: &wgpu::Error) -> BootstrapError {
    BootstrapError::Link(format!("device rejected the program: {err}"))
}

/// Uniform buffers are allocated in 16-byte steps, never empty.
fn uniform_buffer_size(declared: u64) -> u64 {
    declared.max(1).next_multiple_of(16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_buffers_round_up_to_sixteen() {
        assert_eq!(uniform_buffer_size(0), 16);
        assert_eq!(uniform_buffer_size(4), 16);
        assert_eq!(uniform_buffer_size(8), 16);
        assert_eq!(uniform_buffer_size(48), 48);
        assert_eq!(uniform_buffer_size(52), 64);
    }
}
