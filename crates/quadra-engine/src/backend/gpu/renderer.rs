use std::ops::Range;
use std::rc::Rc;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::coords::Viewport;
use crate::error::LoadError;
use crate::image::{DecodedImage, TextureOrigin};
use crate::paint::Color;
use crate::quad::{ResolvedQuad, Vertex, QUAD_INDICES};
use crate::shapes::{Shape, Topology};

use super::{Gpu, SurfaceErrorAction};

/// Uploaded image.
pub struct GpuTexture {
    // Kept so the allocation is tied to this handle; drawing only needs the bind group.
    _texture: wgpu::Texture,
    bind_group: Rc<wgpu::BindGroup>,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ShapeVertex {
    pos: [f32; 2],
    color: [f32; 4],
}

impl ShapeVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ShapeVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

const QUAD_ATTRS: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x4];

fn quad_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &QUAD_ATTRS,
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum ShapePipeline {
    Lines,
    Triangles,
}

/// One recorded draw, replayed in order at present time.
enum DrawOp {
    Shapes {
        pipeline: ShapePipeline,
        vertices: Range<u32>,
    },
    Quad {
        bind_group: Rc<wgpu::BindGroup>,
        first_index: u32,
    },
}

/// Growable GPU buffer (power-of-two capacity, 64 bytes minimum).
struct DynamicBuffer {
    label: &'static str,
    usage: wgpu::BufferUsages,
    buffer: Option<wgpu::Buffer>,
    capacity: u64,
}

impl DynamicBuffer {
    fn new(label: &'static str, usage: wgpu::BufferUsages) -> Self {
        Self {
            label,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            buffer: None,
            capacity: 0,
        }
    }

    fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, bytes: &[u8]) -> Option<&wgpu::Buffer> {
        if bytes.is_empty() {
            return None;
        }
        let needed = bytes.len() as u64;
        if self.buffer.is_none() || self.capacity < needed {
            let capacity = needed.next_power_of_two().max(64);
            self.buffer = Some(device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(self.label),
                size: capacity,
                usage: self.usage,
                mapped_at_creation: false,
            }));
            self.capacity = capacity;
        }
        let buffer = self.buffer.as_ref()?;
        queue.write_buffer(buffer, 0, bytes);
        Some(buffer)
    }
}

/// Records one frame of shapes and quads and submits them in a single pass.
pub struct Renderer {
    line_pipeline: wgpu::RenderPipeline,
    triangle_pipeline: wgpu::RenderPipeline,
    quad_pipeline: wgpu::RenderPipeline,
    quad_bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    texture_format: wgpu::TextureFormat,

    clear: wgpu::Color,
    shape_vertices: Vec<ShapeVertex>,
    quad_vertices: Vec<Vertex>,
    quad_indices: Vec<u32>,
    ops: Vec<DrawOp>,

    shape_vbo: DynamicBuffer,
    quad_vbo: DynamicBuffer,
    quad_ibo: DynamicBuffer,
}

impl Renderer {
    pub fn new(gpu: &Gpu<'_>) -> Self {
        let device = gpu.device();
        let surface_format = gpu.surface_format();

        // Images follow the surface: raw bytes on a linear surface, decoded on an sRGB one.
        let texture_format = if surface_format.is_srgb() {
            wgpu::TextureFormat::Rgba8UnormSrgb
        } else {
            wgpu::TextureFormat::Rgba8Unorm
        };

        let shape_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quadra shape shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/shape.wgsl").into()),
        });
        let quad_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quadra quad shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/quad.wgsl").into()),
        });

        let shape_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("quadra shape pipeline layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let quad_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("quadra quad bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let quad_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("quadra quad pipeline layout"),
            bind_group_layouts: &[&quad_bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = |label: &str,
                        layout: &wgpu::PipelineLayout,
                        shader: &wgpu::ShaderModule,
                        buffer: wgpu::VertexBufferLayout<'static>,
                        topology: wgpu::PrimitiveTopology| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(layout),
                vertex: wgpu::VertexState {
                    module: shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[buffer],
                },
                fragment: Some(wgpu::FragmentState {
                    module: shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
        };

        let line_pipeline = pipeline(
            "quadra line pipeline",
            &shape_layout,
            &shape_shader,
            ShapeVertex::layout(),
            wgpu::PrimitiveTopology::LineList,
        );
        let triangle_pipeline = pipeline(
            "quadra triangle pipeline",
            &shape_layout,
            &shape_shader,
            ShapeVertex::layout(),
            wgpu::PrimitiveTopology::TriangleList,
        );
        let quad_pipeline = pipeline(
            "quadra quad pipeline",
            &quad_layout,
            &quad_shader,
            quad_vertex_layout(),
            wgpu::PrimitiveTopology::TriangleList,
        );

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("quadra image sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            line_pipeline,
            triangle_pipeline,
            quad_pipeline,
            quad_bind_group_layout,
            sampler,
            texture_format,
            clear: wgpu::Color::BLACK,
            shape_vertices: Vec::new(),
            quad_vertices: Vec::new(),
            quad_indices: Vec::new(),
            ops: Vec::new(),
            shape_vbo: DynamicBuffer::new("quadra shape vbo", wgpu::BufferUsages::VERTEX),
            quad_vbo: DynamicBuffer::new("quadra quad vbo", wgpu::BufferUsages::VERTEX),
            quad_ibo: DynamicBuffer::new("quadra quad ibo", wgpu::BufferUsages::INDEX),
        }
    }

    pub fn create_texture(&self, gpu: &Gpu<'_>, image: &DecodedImage) -> Result<GpuTexture, LoadError> {
        let upload_err = |reason: String| LoadError::Upload {
            path: image.label.clone(),
            reason,
        };

        let max = gpu.device().limits().max_texture_dimension_2d;
        if image.width == 0 || image.height == 0 || image.width > max || image.height > max {
            return Err(upload_err(format!(
                "{}x{} is outside the supported 1..={max} texture size",
                image.width, image.height
            )));
        }
        debug_assert_eq!(image.origin, TextureOrigin::BottomLeft);

        let label = image.label.display().to_string();
        let texture = gpu.device().create_texture_with_data(
            gpu.queue(),
            &wgpu::TextureDescriptor {
                label: Some(&label),
                size: wgpu::Extent3d {
                    width: image.width,
                    height: image.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: self.texture_format,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &image.rgba,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = gpu.device().create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("quadra image bind group"),
            layout: &self.quad_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        Ok(GpuTexture {
            _texture: texture,
            bind_group: Rc::new(bind_group),
        })
    }

    pub fn clear(&mut self, color: Color) {
        self.clear = wgpu::Color {
            r: color.r as f64,
            g: color.g as f64,
            b: color.b as f64,
            a: color.a as f64,
        };
        self.discard();
    }

    pub fn push_shape(&mut self, shape: &Shape, color: Color, viewport: Viewport) {
        let (topology, points) = shape.mesh().flattened();
        if points.is_empty() {
            return;
        }
        let pipeline = match topology {
            Topology::LineList => ShapePipeline::Lines,
            _ => ShapePipeline::Triangles,
        };

        let start = self.shape_vertices.len() as u32;
        let color = color.to_array();
        self.shape_vertices.extend(points.into_iter().map(|p| ShapeVertex {
            pos: viewport.to_ndc(p),
            color,
        }));
        let end = self.shape_vertices.len() as u32;

        // Adjacent shapes on the same pipeline share a draw call.
        if let Some(DrawOp::Shapes { pipeline: last, vertices }) = self.ops.last_mut() {
            if *last == pipeline && vertices.end == start {
                vertices.end = end;
                return;
            }
        }
        self.ops.push(DrawOp::Shapes { pipeline, vertices: start..end });
    }

    pub fn push_quad(&mut self, texture: &GpuTexture, quad: &ResolvedQuad, viewport: Viewport) {
        let base = self.quad_vertices.len() as u32;
        let first_index = self.quad_indices.len() as u32;
        self.quad_vertices
            .extend_from_slice(&quad.vertices(viewport, TextureOrigin::BottomLeft));
        self.quad_indices.extend(QUAD_INDICES.iter().map(|i| base + i));
        self.ops.push(DrawOp::Quad {
            bind_group: Rc::clone(&texture.bind_group),
            first_index,
        });
    }

    /// Submits the recorded frame and resets for the next one.
    ///
    /// On a surface error the frame is dropped and the recovery action is returned.
    pub fn render(&mut self, gpu: &mut Gpu<'_>) -> Result<(), SurfaceErrorAction> {
        let mut frame = match gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                log::warn!("surface error: {err}");
                self.discard();
                return Err(gpu.handle_surface_error(err));
            }
        };

        let device = gpu.device();
        let queue = gpu.queue();
        let shape_vbo = self
            .shape_vbo
            .upload(device, queue, bytemuck::cast_slice(&self.shape_vertices));
        let quad_vbo = self
            .quad_vbo
            .upload(device, queue, bytemuck::cast_slice(&self.quad_vertices));
        let quad_ibo = self
            .quad_ibo
            .upload(device, queue, bytemuck::cast_slice(&self.quad_indices));

        {
            let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("quadra frame pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            for op in &self.ops {
                match op {
                    DrawOp::Shapes { pipeline, vertices } => {
                        let Some(vbo) = shape_vbo else { continue };
                        rpass.set_pipeline(match pipeline {
                            ShapePipeline::Lines => &self.line_pipeline,
                            ShapePipeline::Triangles => &self.triangle_pipeline,
                        });
                        rpass.set_vertex_buffer(0, vbo.slice(..));
                        rpass.draw(vertices.clone(), 0..1);
                    }
                    DrawOp::Quad { bind_group, first_index } => {
                        let (Some(vbo), Some(ibo)) = (quad_vbo, quad_ibo) else { continue };
                        rpass.set_pipeline(&self.quad_pipeline);
                        rpass.set_bind_group(0, bind_group.as_ref(), &[]);
                        rpass.set_vertex_buffer(0, vbo.slice(..));
                        rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);
                        rpass.draw_indexed(*first_index..*first_index + 6, 0, 0..1);
                    }
                }
            }
        }

        gpu.submit(frame);
        self.discard();
        Ok(())
    }

    /// Drops everything recorded since the last submit.
    pub fn discard(&mut self) {
        self.shape_vertices.clear();
        self.quad_vertices.clear();
        self.quad_indices.clear();
        self.ops.clear();
    }
}
