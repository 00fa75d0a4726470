use std::collections::HashMap;

use morphfield_engine::render::common::{
    QuadVertex, create_quad_buffers, quad_primitive_state, uniform_min_binding_size,
};
use morphfield_engine::render::OffscreenTarget;

use crate::error::FieldError;
use crate::shapes::ShapeId;

use super::shape_set::{GpuShapeSet, PARTICLE_TEXTURE_FORMAT, unfilterable_texture_entry};
use super::uniforms::PositionUniforms;

/// Render-to-texture pass that writes the current particle positions.
///
/// Each tick draws one quad over the whole `size × size` target, blending
/// shape A into shape B by the transition progress. The target is fully
/// overwritten, so it is never cleared or read back.
pub struct PositionPass {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    quad_vbo: wgpu::Buffer,
    quad_ibo: wgpu::Buffer,
    target: OffscreenTarget,

    /// One bind group per (A, B) pair seen so far; shape textures never change.
    bind_groups: HashMap<(ShapeId, ShapeId), wgpu::BindGroup>,
}

impl PositionPass {
    pub fn new(device: &wgpu::Device, shapes: &GpuShapeSet) -> Result<Self, FieldError> {
        let size = shapes.size();
        let target = OffscreenTarget::new(
            device,
            "morphfield current positions",
            size,
            size,
            PARTICLE_TEXTURE_FORMAT,
        )?;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("morphfield position update shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/position_update.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("morphfield position update bgl"),
            entries: &[
                unfilterable_texture_entry(0, wgpu::ShaderStages::FRAGMENT),
                unfilterable_texture_entry(1, wgpu::ShaderStages::FRAGMENT),
                unfilterable_texture_entry(2, wgpu::ShaderStages::FRAGMENT),
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: uniform_min_binding_size::<PositionUniforms>(),
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("morphfield position update pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("morphfield position update pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: PARTICLE_TEXTURE_FORMAT,
                    // Float32 targets are not blendable; the pass overwrites.
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: quad_primitive_state(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("morphfield position update ubo"),
            size: std::mem::size_of::<PositionUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let (quad_vbo, quad_ibo) = create_quad_buffers(device, "morphfield position update");

        Ok(Self {
            pipeline,
            bind_group_layout,
            uniform_buffer,
            quad_vbo,
            quad_ibo,
            target,
            bind_groups: HashMap::new(),
        })
    }

    /// The texture the particle pass reads positions from.
    pub fn output(&self) -> &wgpu::TextureView {
        self.target.view()
    }

    pub fn size(&self) -> u32 {
        self.target.size().0
    }

    /// Records one tick into `encoder`.
    ///
    /// Fails without recording anything when either shape has no texture.
    pub fn encode(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        shapes: &GpuShapeSet,
        pair: (ShapeId, ShapeId),
        uniforms: &PositionUniforms,
    ) -> Result<(), FieldError> {
        self.ensure_bind_group(device, shapes, pair)?;
        let Some(bind_group) = self.bind_groups.get(&pair) else {
            return Err(FieldError::ShapeUnavailable(pair.0));
        };

        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("morphfield position update pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.target.view(),
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, self.quad_vbo.slice(..));
        rpass.set_index_buffer(self.quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..6, 0, 0..1);

        Ok(())
    }

    fn ensure_bind_group(
        &mut self,
        device: &wgpu::Device,
        shapes: &GpuShapeSet,
        pair: (ShapeId, ShapeId),
    ) -> Result<(), FieldError> {
        if self.bind_groups.contains_key(&pair) {
            return Ok(());
        }

        let (a, b) = (shapes.shape(pair.0)?, shapes.shape(pair.1)?);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("morphfield positions {} -> {}", pair.0, pair.1)),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(a.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(b.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(shapes.random().view()),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: self.uniform_buffer.as_entire_binding(),
                },
            ],
        });

        log::debug!("created position bind group for {} -> {}", pair.0, pair.1);
        self.bind_groups.insert(pair, bind_group);
        Ok(())
    }
}
