//! Line clipping against the canonical perspective view volume.
//!
//! Outcode (Cohen-Sutherland) classification generalized to a perspective
//! frustum: the side planes are `x = ±z` and `y = ±z` (the volume narrows
//! with depth), the far plane is `z = -1`, and the near plane is
//! `z = z_min`. Points are classified in homogeneous pre-divide space at
//! their own depth.
//!
//! Clipping never fails: a segment comes back trimmed, unchanged, or as
//! `None` when the view volume excludes it entirely.

use bitflags::bitflags;

use crate::math::{Vec4, FLOAT_EPSILON};

bitflags! {
    /// Frustum boundary planes a point violates.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Outcode: u8 {
        const LEFT = 32;
        const RIGHT = 16;
        const BOTTOM = 8;
        const TOP = 4;
        const FAR = 2;
        const NEAR = 1;
    }
}

/// Plane order tried when trimming an outside endpoint.
const PLANE_ORDER: [Outcode; 6] = [
    Outcode::TOP,
    Outcode::BOTTOM,
    Outcode::RIGHT,
    Outcode::LEFT,
    Outcode::NEAR,
    Outcode::FAR,
];

/// A line segment in canonical-volume coordinates. Built per edge-adjacent
/// vertex pair and consumed by [`clip_line`]; never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub a: Vec4,
    pub b: Vec4,
}

impl LineSegment {
    pub const fn new(a: Vec4, b: Vec4) -> Self {
        Self { a, b }
    }
}

/// Classifies a point against the canonical frustum at its own depth.
///
/// The per-axis tests are mutually exclusive, so a boundary-grazing point
/// gets exactly one classification regardless of evaluation order.
pub fn outcode(v: Vec4, z_min: f32) -> Outcode {
    let mut code = Outcode::empty();
    if v.x < v.z - FLOAT_EPSILON {
        code |= Outcode::LEFT;
    } else if v.x > -v.z + FLOAT_EPSILON {
        code |= Outcode::RIGHT;
    }
    if v.y < v.z - FLOAT_EPSILON {
        code |= Outcode::BOTTOM;
    } else if v.y > -v.z + FLOAT_EPSILON {
        code |= Outcode::TOP;
    }
    if v.z < -1.0 - FLOAT_EPSILON {
        code |= Outcode::FAR;
    } else if v.z > z_min + FLOAT_EPSILON {
        code |= Outcode::NEAR;
    }
    code
}

/// Parametric intersection of the segment with one frustum plane, measured
/// from `from` toward `to`.
///
/// Returns `None` when the segment runs parallel to the plane or crosses it
/// outside the segment's own extent; both mean "does not cross here".
fn intersect(plane: Outcode, from: Vec4, to: Vec4, z_min: f32) -> Option<f32> {
    let (dx, dy, dz) = (to.x - from.x, to.y - from.y, to.z - from.z);
    let (num, den) = if plane == Outcode::TOP {
        (from.y + from.z, -dy - dz)
    } else if plane == Outcode::BOTTOM {
        (-from.y + from.z, dy - dz)
    } else if plane == Outcode::RIGHT {
        (from.x + from.z, -dx - dz)
    } else if plane == Outcode::LEFT {
        (-from.x + from.z, dx - dz)
    } else if plane == Outcode::NEAR {
        (from.z - z_min, -dz)
    } else {
        (-from.z - 1.0, dz)
    };
    if den.abs() < FLOAT_EPSILON {
        return None;
    }
    let t = num / den;
    if !(-FLOAT_EPSILON..=1.0 + FLOAT_EPSILON).contains(&t) {
        return None;
    }
    Some(t.clamp(0.0, 1.0))
}

/// Clips a segment against the canonical view volume.
///
/// Trivial accept when both outcodes are empty; trivial reject when the
/// outcodes share a violated plane; otherwise an outside endpoint is moved
/// to its first crossable violated plane (in [`PLANE_ORDER`]) and the test
/// repeats. Every successful trim lands the endpoint on a boundary, which
/// strictly shrinks its violated-plane set, so the loop terminates well
/// inside the iteration cap.
pub fn clip_line(line: LineSegment, z_min: f32) -> Option<LineSegment> {
    let LineSegment { mut a, mut b } = line;
    let mut out_a = outcode(a, z_min);
    let mut out_b = outcode(b, z_min);

    for _ in 0..12 {
        if (out_a | out_b).is_empty() {
            return Some(LineSegment { a, b });
        }
        if !(out_a & out_b).is_empty() {
            return None;
        }

        let trimming_a = !out_a.is_empty();
        let (out, from, to) = if trimming_a { (out_a, a, b) } else { (out_b, b, a) };

        let mut trimmed = false;
        for plane in PLANE_ORDER {
            if !out.contains(plane) {
                continue;
            }
            if let Some(t) = intersect(plane, from, to, z_min) {
                let p = from.lerp(to, t);
                if trimming_a {
                    a = p;
                    out_a = outcode(a, z_min);
                } else {
                    b = p;
                    out_b = outcode(b, z_min);
                }
                trimmed = true;
                break;
            }
        }
        if !trimmed {
            // No violated plane crosses within the segment: the line misses
            // the volume on this side.
            return None;
        }
    }
    None
}
