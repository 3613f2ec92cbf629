//! Transform builders.
//!
//! Pure functions producing 4x4 matrices; each call returns a fresh value.
//!
//! The perspective path follows the classical normalizing pipeline:
//! translate the eye to the origin, rotate the view basis onto the world
//! axes, shear the clip-window center onto the -z axis, then scale the view
//! volume into the canonical frustum `|x| <= |z|`, `|y| <= |z|`,
//! `z in [-1, z_min]` with the far plane at `z = -1`.

use anyhow::{bail, Result};

use crate::math::{Mat4, Vec3, FLOAT_EPSILON};

pub fn identity() -> Mat4 {
    Mat4::IDENTITY
}

pub fn translate(tx: f32, ty: f32, tz: f32) -> Mat4 {
    Mat4::from_rows([
        [1.0, 0.0, 0.0, tx],
        [0.0, 1.0, 0.0, ty],
        [0.0, 0.0, 1.0, tz],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

pub fn scale(sx: f32, sy: f32, sz: f32) -> Mat4 {
    Mat4::from_rows([
        [sx, 0.0, 0.0, 0.0],
        [0.0, sy, 0.0, 0.0],
        [0.0, 0.0, sz, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Right-handed rotation about the x-axis, `theta` in radians.
pub fn rotate_x(theta: f32) -> Mat4 {
    let (s, c) = theta.sin_cos();
    Mat4::from_rows([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, c, -s, 0.0],
        [0.0, s, c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Right-handed rotation about the y-axis, `theta` in radians.
pub fn rotate_y(theta: f32) -> Mat4 {
    let (s, c) = theta.sin_cos();
    Mat4::from_rows([
        [c, 0.0, s, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [-s, 0.0, c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Right-handed rotation about the z-axis, `theta` in radians.
pub fn rotate_z(theta: f32) -> Mat4 {
    let (s, c) = theta.sin_cos();
    Mat4::from_rows([
        [c, -s, 0.0, 0.0],
        [s, c, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Shear parallel to the xy-plane: x and y pick up multiples of z.
pub fn shear_xy(shx: f32, shy: f32) -> Mat4 {
    Mat4::from_rows([
        [1.0, 0.0, shx, 0.0],
        [0.0, 1.0, shy, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Canonical near-plane depth for a clip window: `-near / far`.
pub fn z_min(clip: [f32; 4]) -> f32 {
    -(clip[2] / clip[3])
}

/// Orthonormal view basis (u, v, n) for an eye at `prp` looking at `srp`.
///
/// `n` points from the scene toward the eye; `u` and `v` complete a
/// right-handed frame with `v` in the half-plane of `vup`.
pub fn view_basis(prp: Vec3, srp: Vec3, vup: Vec3) -> Result<(Vec3, Vec3, Vec3)> {
    let Some(n) = (prp - srp).try_normalize() else {
        bail!("projection and scene reference points coincide");
    };
    let Some(u) = vup.cross(n).try_normalize() else {
        bail!("view-up vector is zero or parallel to the view direction");
    };
    let v = n.cross(u);
    Ok((u, v, n))
}

/// World-to-canonical perspective transform for a camera described by eye
/// position `prp`, look-at point `srp`, up vector `vup`, and clip window
/// `[umin, umax, near, far]` (a square window on the near plane).
///
/// Composition order is `scale * shear * rotate * translate`; the rightmost
/// factor applies to a vertex first.
pub fn perspective(prp: Vec3, srp: Vec3, vup: Vec3, clip: [f32; 4]) -> Result<Mat4> {
    let [c0, c1, near, far] = clip;
    if (near - far).abs() <= FLOAT_EPSILON {
        bail!("clip window near and far planes coincide");
    }
    if near <= 0.0 || far <= near {
        bail!("clip window must satisfy 0 < near < far");
    }
    if (c1 - c0).abs() <= FLOAT_EPSILON {
        bail!("clip window has zero extent");
    }

    let t = translate(-prp.x, -prp.y, -prp.z);

    let (u, v, n) = view_basis(prp, srp, vup)?;
    let r = Mat4::from_rows([
        [u.x, u.y, u.z, 0.0],
        [v.x, v.y, v.z, 0.0],
        [n.x, n.y, n.z, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);

    // Window center lies at (cw, cw, -near) after the rotate; shear it onto
    // the -z axis.
    let cw = (c0 + c1) / 2.0;
    let sh = shear_xy(cw / near, cw / near);

    let sxy = 2.0 * near / ((c1 - c0) * far);
    let s = scale(sxy, sxy, 1.0 / far);

    Ok(Mat4::concat(&[s, sh, r, t]))
}

/// Perspective-to-parallel matrix: projects canonical-frustum points toward
/// the plane `z = -1`. The last row makes the output `w` carry `-z`, so the
/// later division by `w` completes the perspective.
pub fn mper() -> Mat4 {
    Mat4::from_rows([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, -1.0, 0.0],
    ])
}

/// Maps the projected square `[-1, 1] x [-1, 1]` to pixel coordinates with
/// math y-up: `(-1, -1)` lands on `(0, 0)` and `(1, 1)` on
/// `(width, height)`. Raster surfaces with a top-left origin flip rows at
/// presentation time.
pub fn viewport(width: u32, height: u32) -> Mat4 {
    let (w, h) = (width as f32, height as f32);
    Mat4::from_rows([
        [w / 2.0, 0.0, 0.0, w / 2.0],
        [0.0, h / 2.0, 0.0, h / 2.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec4;

    const VIEW: (Vec3, Vec3, Vec3, [f32; 4]) = (
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        [-1.0, 1.0, 1.0, 100.0],
    );

    #[test]
    fn translate_moves_a_point() {
        let p = translate(1.0, -2.0, 3.0).mul_point(Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(p, Vec4::new(2.0, -1.0, 4.0, 1.0));
    }

    #[test]
    fn rotate_z_quarter_turn() {
        let p = rotate_z(std::f32::consts::FRAC_PI_2).mul_point(Vec3::new(1.0, 0.0, 0.0));
        assert!(p.x.abs() < 1e-6);
        assert!((p.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn shear_adds_z_multiples() {
        let p = shear_xy(2.0, -1.0).mul_point(Vec3::new(1.0, 1.0, 3.0));
        assert_eq!(p, Vec4::new(7.0, -2.0, 3.0, 1.0));
    }

    #[test]
    fn perspective_maps_eye_to_origin() {
        let (prp, srp, vup, clip) = VIEW;
        let m = perspective(prp, srp, vup, clip).unwrap();
        let eye = m.mul_point(prp);
        assert!(eye.x.abs() < 1e-6 && eye.y.abs() < 1e-6 && eye.z.abs() < 1e-6);
        assert!((eye.w - 1.0).abs() < 1e-6);
    }

    #[test]
    fn perspective_maps_view_axis_onto_z() {
        let (prp, srp, vup, clip) = VIEW;
        let m = perspective(prp, srp, vup, clip).unwrap();
        // Any point on the PRP -> SRP line lands on the z-axis.
        for t in [0.25, 1.0, 30.0] {
            let p = prp + (srp - prp) * t;
            let mapped = m.mul_point(p);
            assert!(mapped.x.abs() < 1e-5, "x off axis at t={t}");
            assert!(mapped.y.abs() < 1e-5, "y off axis at t={t}");
        }
    }

    #[test]
    fn perspective_normalizes_near_and_far() {
        let (prp, srp, vup, clip) = VIEW;
        let m = perspective(prp, srp, vup, clip).unwrap();
        // SRP sits on the near plane for this view (|prp - srp| == near).
        let near_pt = m.mul_point(srp);
        assert!((near_pt.z - z_min(clip)).abs() < 1e-6);
        // A point at the far-plane distance along the view axis maps to -1.
        let far_pt = m.mul_point(Vec3::new(0.0, 0.0, 1.0 - clip[3]));
        assert!((far_pt.z + 1.0).abs() < 1e-6);
    }

    #[test]
    fn perspective_rejects_degenerate_views() {
        let (prp, _, vup, clip) = VIEW;
        assert!(perspective(prp, prp, vup, clip).is_err());
        assert!(perspective(prp, Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), clip).is_err());
        assert!(perspective(prp, Vec3::ZERO, vup, [-1.0, 1.0, 5.0, 5.0]).is_err());
    }

    #[test]
    fn mper_carries_negated_z_in_w() {
        let v = mper() * Vec4::new(0.5, -0.5, -0.8, 1.0);
        assert_eq!(v.w, 0.8);
        assert_eq!(v.truncate(), Vec3::new(0.5, -0.5, -0.8));
    }

    #[test]
    fn viewport_corner_and_center_mapping() {
        let vp = viewport(640, 480);
        let corner = vp * Vec4::new(1.0, 1.0, -1.0, 1.0);
        assert_eq!((corner.x, corner.y), (640.0, 480.0));
        let origin = vp * Vec4::new(-1.0, -1.0, -1.0, 1.0);
        assert_eq!((origin.x, origin.y), (0.0, 0.0));
        let center = vp * Vec4::new(0.0, 0.0, -1.0, 1.0);
        assert_eq!((center.x, center.y), (320.0, 240.0));
    }
}
