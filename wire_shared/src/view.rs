//! View parameters and camera motion.
//!
//! `ViewParams` owns everything the perspective builder needs: eye position
//! (PRP), look-at point (SRP), up vector (VUP), and the clip window
//! `[umin, umax, near, far]`. Motion operations are pure: each takes the
//! current parameters and returns an updated copy, so all camera state lives
//! in the owning scene.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::math::{Vec3, FLOAT_EPSILON};
use crate::transform;

/// Camera description for a scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewParams {
    /// Projection reference point (eye position).
    pub prp: Vec3,
    /// Scene reference point (look-at target).
    pub srp: Vec3,
    /// View-up vector; need not be unit length.
    pub vup: Vec3,
    /// Clip window `[umin, umax, near, far]`.
    pub clip: [f32; 4],
}

impl ViewParams {
    /// Checks every invariant the perspective builder relies on. A scene
    /// update must pass this before it replaces the previous scene.
    pub fn validate(&self) -> Result<()> {
        let [c0, c1, near, far] = self.clip;
        if (near - far).abs() <= FLOAT_EPSILON {
            bail!("clip window near and far planes coincide");
        }
        if near <= 0.0 || far <= near {
            bail!("clip window must satisfy 0 < near < far");
        }
        if (c1 - c0).abs() <= FLOAT_EPSILON {
            bail!("clip window has zero extent");
        }
        // Errors out on a zero view direction or a degenerate up vector.
        self.uvn()?;
        Ok(())
    }

    /// Orthonormal view basis (u, v, n) for the current parameters.
    pub fn uvn(&self) -> Result<(Vec3, Vec3, Vec3)> {
        transform::view_basis(self.prp, self.srp, self.vup)
    }

    fn shifted(&self, delta: Vec3) -> Self {
        Self {
            prp: self.prp + delta,
            srp: self.srp + delta,
            ..*self
        }
    }

    /// Steps the camera left along its own horizontal axis.
    pub fn moved_left(&self, step: f32) -> Result<Self> {
        let (u, _, _) = self.uvn()?;
        Ok(self.shifted(u * -step))
    }

    /// Steps the camera right along its own horizontal axis.
    pub fn moved_right(&self, step: f32) -> Result<Self> {
        let (u, _, _) = self.uvn()?;
        Ok(self.shifted(u * step))
    }

    /// Steps the camera toward the scene along the view axis.
    pub fn moved_forward(&self, step: f32) -> Result<Self> {
        let (_, _, n) = self.uvn()?;
        Ok(self.shifted(n * -step))
    }

    /// Steps the camera away from the scene along the view axis.
    pub fn moved_backward(&self, step: f32) -> Result<Self> {
        let (_, _, n) = self.uvn()?;
        Ok(self.shifted(n * step))
    }

    /// Swings the look-at point left about the camera's vertical axis.
    pub fn turned_left(&self, theta: f32) -> Result<Self> {
        self.turned(theta)
    }

    /// Swings the look-at point right about the camera's vertical axis.
    pub fn turned_right(&self, theta: f32) -> Result<Self> {
        self.turned(-theta)
    }

    fn turned(&self, theta: f32) -> Result<Self> {
        let (_, v, _) = self.uvn()?;
        let dir = self.srp - self.prp;
        Ok(Self {
            srp: self.prp + dir.rotated_about(v, theta),
            ..*self
        })
    }
}
