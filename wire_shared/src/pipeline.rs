//! Per-frame projection pipeline.
//!
//! A frame is a pure function of the current scene: every model vertex is
//! carried through the perspective and perspective-to-parallel transforms,
//! edges are paired into segments, segments are clipped against the
//! canonical volume, and survivors are mapped to the viewport and divided
//! by `w` on the way to the drawing surface.
//!
//! Single-threaded and stateless across frames; per-frame cost is linear in
//! vertex and edge-segment counts.

use anyhow::Result;
use tracing::debug;

use crate::clip::{clip_line, LineSegment};
use crate::math::{Mat4, Vec2, Vec4};
use crate::scene::Scene;
use crate::transform;

/// A 2D pixel-space segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment2D {
    pub a: Vec2,
    pub b: Vec2,
}

/// Sink for projected segments.
///
/// Implementors stroke each segment and mark both endpoints with a small
/// fixed-size square.
pub trait DrawSurface: Send + Sync {
    fn begin_frame(&mut self) {}
    fn draw_line(&mut self, a: Vec2, b: Vec2);
    fn end_frame(&mut self) {}
}

/// No-op surface for headless runs.
#[derive(Default)]
pub struct NullSurface;

impl DrawSurface for NullSurface {
    fn draw_line(&mut self, _a: Vec2, _b: Vec2) {}
}

/// Captures segments; used by tests and by rasterizing frontends.
#[derive(Default)]
pub struct RecordingSurface {
    pub segments: Vec<Segment2D>,
}

impl DrawSurface for RecordingSurface {
    fn begin_frame(&mut self) {
        self.segments.clear();
    }

    fn draw_line(&mut self, a: Vec2, b: Vec2) {
        self.segments.push(Segment2D { a, b });
    }
}

/// Counters for one rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub models: usize,
    pub segments_in: usize,
    pub segments_drawn: usize,
    /// Drawn after trimming against the view volume.
    pub segments_clipped: usize,
    pub segments_rejected: usize,
}

/// Renders one frame of the scene onto `surface`.
///
/// Fails only when the view parameters cannot produce a perspective
/// transform; the surface is untouched in that case, so the caller keeps
/// its previous frame.
pub fn render_frame(
    scene: &Scene,
    width: u32,
    height: u32,
    surface: &mut dyn DrawSurface,
) -> Result<FrameStats> {
    let view = &scene.view;
    let persp = transform::perspective(view.prp, view.srp, view.vup, view.clip)?;
    // One matrix-vector multiply per vertex instead of two.
    let to_canonical = transform::mper() * persp;
    let vp = transform::viewport(width, height);
    let z_min = transform::z_min(view.clip);

    let mut stats = FrameStats {
        models: scene.models.len(),
        ..Default::default()
    };

    surface.begin_frame();
    for model in &scene.models {
        let composed = to_canonical * model.transform;
        let verts: Vec<Vec4> = model.vertices.iter().map(|&v| composed * v).collect();

        for edge in &model.edges {
            for pair in edge.windows(2) {
                stats.segments_in += 1;
                let seg = LineSegment::new(verts[pair[0]], verts[pair[1]]);
                match clip_line(seg, z_min) {
                    Some(clipped) => {
                        if clipped != seg {
                            stats.segments_clipped += 1;
                        }
                        surface.draw_line(project(vp, clipped.a), project(vp, clipped.b));
                        stats.segments_drawn += 1;
                    }
                    None => stats.segments_rejected += 1,
                }
            }
        }
    }
    surface.end_frame();

    debug!(
        models = stats.models,
        drawn = stats.segments_drawn,
        clipped = stats.segments_clipped,
        rejected = stats.segments_rejected,
        "frame rendered"
    );
    Ok(stats)
}

/// Viewport mapping plus the perspective division.
fn project(vp: Mat4, v: Vec4) -> Vec2 {
    let p = vp * v;
    Vec2::new(p.x / p.w, p.y / p.w)
}
