use bytemuck::{Pod, Zeroable};
use std::f32::consts::{PI, TAU};

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub(crate) struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Generate a unit UV sphere. Triangles wind counter-clockwise seen from outside.
pub(crate) fn sphere_mesh(stacks: u32, sectors: u32) -> (Vec<Vertex>, Vec<u32>) {
    let mut vertices = Vec::with_capacity(((stacks + 1) * (sectors + 1)) as usize);
    for i in 0..=stacks {
        let phi = PI * i as f32 / stacks as f32;
        let (sin_phi, cos_phi) = phi.sin_cos();
        for j in 0..=sectors {
            let theta = TAU * j as f32 / sectors as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();
            let p = [sin_phi * cos_theta, cos_phi, sin_phi * sin_theta];
            vertices.push(Vertex {
                position: p,
                normal: p,
            });
        }
    }

    let row = sectors + 1;
    let mut indices = Vec::with_capacity((stacks * sectors * 6) as usize);
    for i in 0..stacks {
        for j in 0..sectors {
            let a = i * row + j;
            let b = a + row;
            let c = a + 1;
            let d = b + 1;
            indices.extend_from_slice(&[a, c, b, c, d, b]);
        }
    }
    (vertices, indices)
}
