//! Continuous tube meshing.
//!
//! Every segment becomes a ring of vertices at its end, stitched to the ring
//! it continues from. Ring axes are carried forward by parallel transport so
//! the polygon does not twist along curved branches. Where the heading
//! changes, a zero-length pivot ring at the segment start bridges the bend.

use arbor_lsystem::{Anchor, Emitter, Segment, TurtleState};
use arbor_math::RingFrame;
use glam::Vec3;

use crate::gradient::HeightGradient;

/// Vertices per ring.
pub const DEFAULT_RADIAL_SEGMENTS: u32 = 8;

/// Vertex count at which meshing stops.
pub const DEFAULT_MAX_VERTICES: usize = 10_000_000;

/// Cosine between consecutive headings below which a pivot ring is inserted.
pub const PIVOT_ALIGNMENT: f32 = 0.999;

/// Interleaved vertex for GPU upload.
///
/// Layout (24 bytes total):
///   - `[0..12]`  position `[f32; 3]`
///   - `[12..24]` color `[f32; 3]`, linear RGB
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TubeVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

static_assertions::assert_eq_size!(TubeVertex, [u8; 24]);

/// Flat buffers for the tube mesh.
///
/// `positions` and `colors` hold three floats per vertex; `indices` hold three
/// entries per triangle, each referring to an already-appended vertex.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TubeMesh {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
    pub indices: Vec<u32>,
    radial_segments: u32,
    rings: usize,
    pivots: usize,
}

impl TubeMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Rings emitted, root and pivot rings included.
    pub fn ring_count(&self) -> usize {
        self.rings
    }

    /// Zero-length rings inserted at bends.
    pub fn pivot_count(&self) -> usize {
        self.pivots
    }

    pub fn radial_segments(&self) -> u32 {
        self.radial_segments
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position of vertex `index`.
    pub fn position(&self, index: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[index * 3..index * 3 + 3])
    }

    /// Recomputes every vertex color from its height.
    pub fn recolor(&mut self, gradient: &HeightGradient) {
        self.colors.clear();
        self.colors.reserve(self.positions.len());
        for p in self.positions.chunks_exact(3) {
            self.colors.extend_from_slice(&gradient.color_at(p[1]));
        }
    }

    /// Interleaved vertex buffer. Vertices without a color yet are black.
    pub fn vertices(&self) -> Vec<TubeVertex> {
        (0..self.vertex_count())
            .map(|i| {
                let mut color = [0.0; 3];
                if let Some(c) = self.colors.get(i * 3..i * 3 + 3) {
                    color.copy_from_slice(c);
                }
                TubeVertex {
                    position: self.position(i).to_array(),
                    color,
                }
            })
            .collect()
    }

    /// Index data as bytes for GPU upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// [`Emitter`] that builds a [`TubeMesh`].
///
/// Anchors are ring indices.
#[derive(Debug)]
pub struct TubeBuilder {
    mesh: TubeMesh,
    frames: Vec<RingFrame>,
    max_vertices: usize,
}

impl TubeBuilder {
    pub fn new(radial_segments: u32, max_vertices: usize) -> Self {
        Self {
            mesh: TubeMesh {
                radial_segments: radial_segments.max(3),
                ..Default::default()
            },
            frames: Vec::new(),
            max_vertices,
        }
    }

    /// Ring frame behind `anchor`.
    pub fn frame(&self, anchor: Anchor) -> Option<&RingFrame> {
        self.frames.get(anchor.0 as usize)
    }

    pub fn finish(self) -> TubeMesh {
        log::debug!(
            "Tube mesh: {} rings, {} vertices, {} triangles",
            self.mesh.ring_count(),
            self.mesh.vertex_count(),
            self.mesh.triangle_count()
        );
        self.mesh
    }

    fn push_ring(&mut self, center: Vec3, radius: f32, frame: RingFrame) -> Anchor {
        let n = self.mesh.radial_segments;
        for j in 0..n {
            let p = center + frame.radial(j, n) * radius;
            self.mesh.positions.extend_from_slice(&p.to_array());
        }
        let anchor = Anchor(self.frames.len() as u32);
        self.frames.push(frame);
        self.mesh.rings += 1;
        anchor
    }

    /// Two triangles per radial edge between consecutive rings.
    fn connect(&mut self, from: Anchor, to: Anchor) {
        let n = self.mesh.radial_segments;
        let r1 = from.0 * n;
        let r2 = to.0 * n;
        for j in 0..n {
            let next = (j + 1) % n;
            let (a, b) = (r1 + j, r1 + next);
            let (c, d) = (r2 + j, r2 + next);
            self.mesh.indices.extend_from_slice(&[a, d, c, a, b, d]);
        }
    }
}

impl Default for TubeBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_RADIAL_SEGMENTS, DEFAULT_MAX_VERTICES)
    }
}

impl Emitter for TubeBuilder {
    fn begin(&mut self, state: &TurtleState) -> Option<Anchor> {
        Some(self.push_ring(
            state.position,
            state.width * 0.5,
            RingFrame::initial(state.orientation),
        ))
    }

    fn emit(&mut self, segment: &Segment, from: Option<Anchor>) -> Option<Anchor> {
        let forward = segment.forward();
        let mut from = match from.filter(|a| self.frame(*a).is_some()) {
            Some(anchor) => anchor,
            None => self.push_ring(
                segment.start,
                segment.start_width * 0.5,
                RingFrame::initial(segment.orientation),
            ),
        };

        let prev = self.frames[from.0 as usize];
        if !prev.is_aligned_with(forward, PIVOT_ALIGNMENT) {
            let pivot = self.push_ring(
                segment.start,
                segment.start_width * 0.5,
                prev.transported(forward),
            );
            self.connect(from, pivot);
            self.mesh.pivots += 1;
            from = pivot;
        }

        let frame = self.frames[from.0 as usize].transported(forward);
        let end = self.push_ring(segment.end, segment.width * 0.5, frame);
        self.connect(from, end);
        Some(end)
    }

    fn saturated(&self) -> bool {
        self.mesh.vertex_count() >= self.max_vertices
    }
}
