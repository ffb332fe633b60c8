//! Frame renderer: strokes → offscreen canvas → drawable.
//!
//! Pipeline state is created once; per frame every drawable stroke gets a
//! fresh vertex buffer and one `LineStrip` draw, then the canvas target is
//! blitted onto the drawable the engine presents.

mod brush;
mod plan;
mod snapshot;
mod target;

pub use brush::BrushImage;
pub use plan::{plan_frame, FramePlan, StrokeDraw};
pub use snapshot::{RasterImage, SnapshotError};

use anyhow::{Context, Result};
use artifex_engine::coords::Extent;
use artifex_engine::paint::Color;
use artifex_engine::render::{
    compile_wgsl, premul_alpha_blend, viewport_ubo_min_binding_size, RenderCtx, RenderTarget,
    ViewportUniform,
};
use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::geometry::StrokeVertex;
use crate::stroke::Stroke;
use target::{CanvasTarget, CANVAS_FORMAT};

/// Colors the canvas is drawn with.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CanvasStyle {
    pub background: Color,
    pub stroke: Color,
}

impl Default for CanvasStyle {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            stroke: Color::BLACK,
        }
    }
}

/// What one [`FrameRenderer::render`] call drew.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameStats {
    pub strokes: usize,
    pub draw_calls: usize,
    pub vertices: usize,
}

impl From<&FramePlan> for FrameStats {
    fn from(plan: &FramePlan) -> Self {
        Self {
            strokes: plan.strokes,
            draw_calls: plan.draws.len(),
            vertices: plan.vertex_count(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct StyleUniform {
    color: [f32; 4],
    brush_size: [f32; 2],
    _pad: [f32; 2],
}

pub struct FrameRenderer {
    style: CanvasStyle,
    brush_size: Extent,

    stroke_pipeline: wgpu::RenderPipeline,
    stroke_bind_group: wgpu::BindGroup,
    viewport_ubo: wgpu::Buffer,
    style_ubo: wgpu::Buffer,

    blit_shader: wgpu::ShaderModule,
    blit_bgl: wgpu::BindGroupLayout,
    blit_sampler: wgpu::Sampler,
    blit_format: wgpu::TextureFormat,
    blit_pipeline: wgpu::RenderPipeline,
    blit_bind_group: Option<wgpu::BindGroup>,

    canvas: Option<CanvasTarget>,
    has_frame: bool,
}

impl FrameRenderer {
    /// Compiles the shaders and builds all pipeline state.
    ///
    /// Errors here are fatal: there is nothing to draw with.
    pub fn new(ctx: &RenderCtx<'_>, style: CanvasStyle, brush: &BrushImage) -> Result<Self> {
        let device = ctx.device;

        let stroke_shader = compile_wgsl(device, "artifex stroke shader", include_str!("shaders/stroke.wgsl"))
            .context("stroke pipeline")?;
        let blit_shader = compile_wgsl(device, "artifex blit shader", include_str!("shaders/blit.wgsl"))
            .context("blit pipeline")?;

        // ── stroke pipeline ───────────────────────────────────────────────

        let stroke_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("artifex stroke bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: Some(viewport_ubo_min_binding_size()),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<StyleUniform>() as u64,
                        ),
                    },
                    count: None,
                },
                texture_entry(2),
                sampler_entry(3),
            ],
        });

        let stroke_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("artifex stroke pipeline layout"),
            bind_group_layouts: &[&stroke_bgl],
            immediate_size: 0,
        });

        let stroke_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("artifex stroke pipeline"),
            layout: Some(&stroke_layout),
            vertex: wgpu::VertexState {
                module: &stroke_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[StrokeVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &stroke_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: CANVAS_FORMAT,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineStrip,
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

        let viewport_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("artifex stroke viewport ubo"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let style_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("artifex stroke style ubo"),
            size: std::mem::size_of::<StyleUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let brush_texture = brush.upload(device, ctx.queue);
        let brush_view = brush_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let brush_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("artifex brush sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let stroke_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("artifex stroke bind group"),
            layout: &stroke_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: viewport_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: style_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&brush_view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&brush_sampler),
                },
            ],
        });

        // ── blit pipeline ─────────────────────────────────────────────────

        let blit_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("artifex blit bgl"),
            entries: &[texture_entry(0), sampler_entry(1)],
        });
        let blit_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("artifex blit sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let blit_pipeline = create_blit_pipeline(device, &blit_shader, &blit_bgl, ctx.surface_format);

        let renderer = Self {
            style,
            brush_size: brush.extent(),
            stroke_pipeline,
            stroke_bind_group,
            viewport_ubo,
            style_ubo,
            blit_shader,
            blit_bgl,
            blit_sampler,
            blit_format: ctx.surface_format,
            blit_pipeline,
            blit_bind_group: None,
            canvas: None,
            has_frame: false,
        };
        renderer.write_style(ctx.queue);

        log::info!(
            "frame renderer ready (surface {:?}, brush {}x{})",
            ctx.surface_format,
            renderer.brush_size.width,
            renderer.brush_size.height
        );
        Ok(renderer)
    }

    #[inline]
    pub fn style(&self) -> CanvasStyle {
        self.style
    }

    pub fn set_style(&mut self, queue: &wgpu::Queue, style: CanvasStyle) {
        self.style = style;
        self.write_style(queue);
    }

    /// True once a frame has been rendered into the canvas target.
    #[inline]
    pub fn has_frame(&self) -> bool {
        self.has_frame
    }

    /// Draws `strokes` (in order) into the canvas target and blits it to `target`.
    pub fn render<'s>(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        strokes: impl IntoIterator<Item = &'s Stroke>,
    ) -> FrameStats {
        if ctx.target_size.is_empty() {
            return FrameStats::default();
        }

        self.ensure_canvas(ctx);
        self.ensure_blit(ctx);

        let plan = plan_frame(strokes, ctx.viewport, ctx.target_viewport());

        let u = ViewportUniform::new(ctx.target_size.width as f32, ctx.target_size.height as f32);
        ctx.queue.write_buffer(&self.viewport_ubo, 0, bytemuck::bytes_of(&u));

        // Per-frame buffers; dropped at the end of this call.
        let vertex_buffers: Vec<(wgpu::Buffer, u32)> = plan
            .draws
            .iter()
            .map(|draw| {
                let vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("artifex stroke vbo"),
                    contents: bytemuck::cast_slice(&draw.vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                (vbo, draw.vertices.len() as u32)
            })
            .collect();

        let Some(canvas) = self.canvas.as_ref() else {
            return FrameStats::default();
        };
        let Some(blit_bind_group) = self.blit_bind_group.as_ref() else {
            return FrameStats::default();
        };

        let background = self.style.background.for_target(CANVAS_FORMAT);
        {
            let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("artifex stroke pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: canvas.view(),
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(background.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(&self.stroke_pipeline);
            rpass.set_bind_group(0, &self.stroke_bind_group, &[]);
            for (vbo, count) in &vertex_buffers {
                rpass.set_vertex_buffer(0, vbo.slice(..));
                rpass.draw(0..*count, 0..1);
            }
        }

        {
            let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("artifex blit pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(&self.blit_pipeline);
            rpass.set_bind_group(0, blit_bind_group, &[]);
            rpass.draw(0..3, 0..1);
        }

        self.has_frame = true;
        FrameStats::from(&plan)
    }

    /// Reads back the last rendered frame.
    ///
    /// Returns `None` before the first frame or when the readback fails.
    pub fn snapshot(&self, device: &wgpu::Device, queue: &wgpu::Queue) -> Option<RasterImage> {
        match self.try_snapshot(device, queue) {
            Ok(image) => Some(image),
            Err(SnapshotError::NoFrame) => {
                log::debug!("snapshot requested before the first frame");
                None
            }
            Err(e) => {
                log::warn!("snapshot failed: {e}");
                None
            }
        }
    }

    pub fn try_snapshot(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> Result<RasterImage, SnapshotError> {
        match self.canvas.as_ref() {
            Some(canvas) if self.has_frame => snapshot::read_back(device, queue, canvas),
            _ => Err(SnapshotError::NoFrame),
        }
    }

    fn write_style(&self, queue: &wgpu::Queue) {
        let u = StyleUniform {
            color: self.style.stroke.for_target(CANVAS_FORMAT).to_array(),
            brush_size: [
                self.brush_size.width.max(1) as f32,
                self.brush_size.height.max(1) as f32,
            ],
            _pad: [0.0; 2],
        };
        queue.write_buffer(&self.style_ubo, 0, bytemuck::bytes_of(&u));
    }

    fn ensure_canvas(&mut self, ctx: &RenderCtx<'_>) {
        if self.canvas.as_ref().is_some_and(|c| c.size() == ctx.target_size) {
            return;
        }
        self.canvas = Some(CanvasTarget::new(ctx.device, ctx.target_size));
        self.blit_bind_group = None;
        // The old contents are gone; nothing to snapshot until the next frame.
        self.has_frame = false;
    }

    fn ensure_blit(&mut self, ctx: &RenderCtx<'_>) {
        if self.blit_format != ctx.surface_format {
            self.blit_pipeline =
                create_blit_pipeline(ctx.device, &self.blit_shader, &self.blit_bgl, ctx.surface_format);
            self.blit_format = ctx.surface_format;
            self.blit_bind_group = None;
        }
        if self.blit_bind_group.is_some() {
            return;
        }
        let Some(canvas) = self.canvas.as_ref() else { return };

        let view = canvas.blit_view(ctx.surface_format);
        self.blit_bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("artifex blit bind group"),
            layout: &self.blit_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.blit_sampler),
                },
            ],
        }));
    }
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

fn create_blit_pipeline(
    device: &wgpu::Device,
    shader: &wgpu::ShaderModule,
    bgl: &wgpu::BindGroupLayout,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("artifex blit pipeline layout"),
        bind_group_layouts: &[bgl],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("artifex blit pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::Point;

    #[test]
    fn stats_count_draws_and_vertices() {
        let strokes = [
            Stroke::from_points([Point::new(0.0, 0.0), Point::new(1.0, 1.0)]),
            Stroke::new(Point::new(5.0, 5.0)),
            Stroke::from_points([Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(1.0, 1.0)]),
        ];
        let vp = artifex_engine::coords::Viewport::new(10.0, 10.0);
        let stats = FrameStats::from(&plan_frame(&strokes, vp, vp));
        assert_eq!(
            stats,
            FrameStats {
                strokes: 3,
                draw_calls: 2,
                vertices: 5
            }
        );
    }

    #[test]
    fn style_uniform_is_std140_sized() {
        assert_eq!(std::mem::size_of::<StyleUniform>(), 32);
    }

    #[test]
    fn default_style_is_black_on_white() {
        let style = CanvasStyle::default();
        assert_eq!(style.background, Color::WHITE);
        assert_eq!(style.stroke, Color::BLACK);
    }
}
