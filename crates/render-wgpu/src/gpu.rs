use crate::mesh::{Vertex, sphere_mesh};
use crate::shaders;
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use shellplanet_common::{MAX_SHELL_COUNT, MIN_SHELL_COUNT};
use shellplanet_render::{FrameUniforms, ShellDraw, ShellSink, shell_draws, submit_shells};
use wgpu::util::DeviceExt;

const SPHERE_STACKS: u32 = 64;
const SPHERE_SECTORS: u32 = 128;

/// Frame-level uniform block. Matches `Frame` in the shell shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct FrameBlock {
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
    camera_time: [f32; 4],
    base_density: [f32; 4],
    tip_thickness: [f32; 4],
    water_radius: [f32; 4],
    terrain: [f32; 4],
    misc: [f32; 4],
}

impl FrameBlock {
    fn from_uniforms(frame: &FrameUniforms) -> Self {
        let s = &frame.shells;
        let eye = frame.camera.position();
        let [br, bg, bb] = s.base_color;
        let [tr, tg, tb] = s.tip_color;
        let [wr, wg, wb] = s.water_color;
        Self {
            view: frame.view.to_cols_array_2d(),
            proj: frame.projection.to_cols_array_2d(),
            camera_time: [eye.x, eye.y, eye.z, frame.time],
            base_density: [br, bg, bb, s.density],
            tip_thickness: [tr, tg, tb, s.shell_thickness],
            water_radius: [wr, wg, wb, s.planet_radius],
            terrain: [
                s.terrain_frequency,
                s.terrain_octaves as f32,
                s.terrain_seed,
                s.sea_level,
            ],
            misc: [s.wind_strength, s.shell_count as f32, 0.0, 0.0],
        }
    }
}

/// Per-shell uniform block. Matches `Shell` in the shell shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct ShellBlock {
    params: [f32; 4],
}

/// Byte distance between shell slots in the dynamic uniform buffer.
fn shell_slot_stride(min_alignment: u32) -> u32 {
    let size = std::mem::size_of::<ShellBlock>() as u32;
    size.div_ceil(min_alignment) * min_alignment
}

/// Lay out one `ShellBlock` per shell at `index * stride`.
fn pack_shell_blocks(count: u32, stride: u32) -> Vec<u8> {
    let mut bytes = vec![0u8; (count * stride) as usize];
    for ShellDraw { index, height } in shell_draws(count) {
        let block = ShellBlock {
            params: [height, index as f32, 0.0, 0.0],
        };
        let at = (index * stride) as usize;
        bytes[at..at + std::mem::size_of::<ShellBlock>()]
            .copy_from_slice(bytemuck::bytes_of(&block));
    }
    bytes
}

/// Binds each shell's uniform slot and issues its draw call.
struct ShellPassSink<'a, 'pass> {
    pass: &'a mut wgpu::RenderPass<'pass>,
    shell_bind_group: &'a wgpu::BindGroup,
    stride: u32,
    index_count: u32,
}

impl ShellSink for ShellPassSink<'_, '_> {
    fn draw_shell(&mut self, draw: ShellDraw) {
        self.pass
            .set_bind_group(1, self.shell_bind_group, &[draw.index * self.stride]);
        self.pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// wgpu shell renderer.
pub struct WgpuRenderer {
    fill_pipeline: wgpu::RenderPipeline,
    line_pipeline: Option<wgpu::RenderPipeline>,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    shell_buffer: wgpu::Buffer,
    shell_bind_group: wgpu::BindGroup,
    shell_stride: u32,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    depth_texture: wgpu::TextureView,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("frame_uniform_buffer"),
            contents: bytemuck::bytes_of(&FrameBlock {
                view: Mat4::IDENTITY.to_cols_array_2d(),
                proj: Mat4::IDENTITY.to_cols_array_2d(),
                ..Zeroable::zeroed()
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let shell_stride = shell_slot_stride(device.limits().min_uniform_buffer_offset_alignment);
        let shell_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("shell_uniform_buffer"),
            size: (MAX_SHELL_COUNT as u64) * shell_stride as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let shell_block_size = wgpu::BufferSize::new(std::mem::size_of::<ShellBlock>() as u64);
        let shell_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("shell_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: shell_block_size,
                },
                count: None,
            }],
        });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let shell_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("shell_bind_group"),
            layout: &shell_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &shell_buffer,
                    offset: 0,
                    size: shell_block_size,
                }),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("shell_pipeline_layout"),
            bind_group_layouts: &[&frame_layout, &shell_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shell_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SHELL_SHADER.into()),
        });

        let fill_pipeline = create_shell_pipeline(
            device,
            &pipeline_layout,
            &shader,
            surface_format,
            wgpu::PolygonMode::Fill,
        );
        let line_pipeline = if device.features().contains(wgpu::Features::POLYGON_MODE_LINE) {
            Some(create_shell_pipeline(
                device,
                &pipeline_layout,
                &shader,
                surface_format,
                wgpu::PolygonMode::Line,
            ))
        } else {
            tracing::warn!("adapter lacks POLYGON_MODE_LINE; wireframe toggle disabled");
            None
        };

        let (vertices, indices) = sphere_mesh(SPHERE_STACKS, SPHERE_SECTORS);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sphere_vertex_buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sphere_index_buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let index_count = indices.len() as u32;

        let depth_texture = Self::create_depth_texture(device, width, height);

        Self {
            fill_pipeline,
            line_pipeline,
            frame_buffer,
            frame_bind_group,
            shell_buffer,
            shell_bind_group,
            shell_stride,
            vertex_buffer,
            index_buffer,
            index_count,
            depth_texture,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn supports_wireframe(&self) -> bool {
        self.line_pipeline.is_some()
    }

    /// Render one frame: the shell stack, outermost shell first.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        frame: &FrameUniforms,
    ) {
        let shell_count = frame
            .shells
            .shell_count
            .clamp(MIN_SHELL_COUNT, MAX_SHELL_COUNT);

        queue.write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::bytes_of(&FrameBlock::from_uniforms(frame)),
        );
        queue.write_buffer(
            &self.shell_buffer,
            0,
            &pack_shell_blocks(shell_count, self.shell_stride),
        );

        let pipeline = match (&self.line_pipeline, frame.wireframe) {
            (Some(line), true) => line,
            _ => &self.fill_pipeline,
        };

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("shell_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("shell_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.1,
                            g: 0.1,
                            b: 0.1,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

            let mut sink = ShellPassSink {
                pass: &mut pass,
                shell_bind_group: &self.shell_bind_group,
                stride: self.shell_stride,
                index_count: self.index_count,
            };
            submit_shells(shell_count, &mut sink);
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

fn create_shell_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    surface_format: wgpu::TextureFormat,
    polygon_mode: wgpu::PolygonMode,
) -> wgpu::RenderPipeline {
    let label = match polygon_mode {
        wgpu::PolygonMode::Line => "shell_pipeline_line",
        _ => "shell_pipeline_fill",
    };
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Vertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![
                    0 => Float32x3,
                    1 => Float32x3,
                ],
            }],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: Some(wgpu::Face::Back),
            polygon_mode,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth32Float,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}
