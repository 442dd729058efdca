//! The static full-screen quad.

use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub pos: [f32; 2], // NDC
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![
        crate::program::QUAD_POSITION_LOCATION => Float32x2
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub const QUAD_VERTEX_COUNT: u32 = 6;

/// Two triangles covering `[-1, 1] x [-1, 1]`, drawn without an index buffer.
pub const QUAD_VERTICES: [QuadVertex; QUAD_VERTEX_COUNT as usize] = [
    QuadVertex { pos: [-1.0, 1.0] },
    QuadVertex { pos: [-1.0, -1.0] },
    QuadVertex { pos: [1.0, -1.0] },
    QuadVertex { pos: [-1.0, 1.0] },
    QuadVertex { pos: [1.0, 1.0] },
    QuadVertex { pos: [1.0, -1.0] },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_area(t: &[QuadVertex]) -> f32 {
        let [a, b, c] = [t[0].pos, t[1].pos, t[2].pos];
        0.5 * ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1]))
    }

    #[test]
    fn six_vertices_two_triangles() {
        assert_eq!(QUAD_VERTICES.len(), 6);
        assert_eq!(QUAD_VERTICES.chunks_exact(3).count(), 2);
    }

    #[test]
    fn vertices_sit_on_the_ndc_corners() {
        for v in QUAD_VERTICES {
            assert!(v.pos.iter().all(|c| c.abs() == 1.0));
        }
        for corner in [[-1.0, -1.0], [-1.0, 1.0], [1.0, -1.0], [1.0, 1.0]] {
            assert!(QUAD_VERTICES.iter().any(|v| v.pos == corner));
        }
    }

    #[test]
    fn triangle_areas_sum_to_the_square() {
        let areas: Vec<f32> = QUAD_VERTICES.chunks_exact(3).map(signed_area).map(f32::abs).collect();
        assert_eq!(areas, vec![2.0, 2.0]);
        // Each triangle is half of the 2x2 square; together they cover it.
        assert_eq!(areas.iter().sum::<f32>(), 4.0);
    }

    #[test]
    fn byte_layout_is_tightly_packed() {
        let bytes: &[u8] = bytemuck::cast_slice(&QUAD_VERTICES);
        assert_eq!(bytes.len(), 6 * 2 * 4);
        assert_eq!(QuadVertex::layout().array_stride, 8);
    }
}
