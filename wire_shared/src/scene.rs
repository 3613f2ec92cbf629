//! Scene descriptors and model normalization.
//!
//! The scene descriptor is the sole external data contract: a view block
//! plus a list of model descriptions. `Scene::from_descriptor` validates
//! the view and expands every model into the uniform in-memory form
//! (homogeneous vertices + edge polylines) before anything is replaced, so
//! a bad descriptor never clobbers a working scene.
//!
//! Procedural shapes use fixed parametric formulas; normalizing the same
//! input twice yields bit-identical vertex and edge lists.

use std::collections::HashMap;
use std::f32::consts::{PI, TAU};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::math::{Mat4, Vec3, Vec4};
use crate::transform;
use crate::view::ViewParams;

/// Rotation axis for model animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Per-model spin: revolutions per second about an axis through the model
/// center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub axis: Axis,
    pub rps: f32,
}

/// Raw view block of a scene descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSpec {
    pub prp: [f32; 3],
    pub srp: [f32; 3],
    pub vup: [f32; 3],
    pub clip: [f32; 4],
}

impl From<&ViewSpec> for ViewParams {
    fn from(spec: &ViewSpec) -> Self {
        let v = |a: [f32; 3]| Vec3::new(a[0], a[1], a[2]);
        Self {
            prp: v(spec.prp),
            srp: v(spec.srp),
            vup: v(spec.vup),
            clip: spec.clip,
        }
    }
}

/// Raw model description, tagged by shape kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ModelSpec {
    Generic {
        vertices: Vec<[f32; 3]>,
        edges: Vec<Vec<usize>>,
        #[serde(default)]
        animation: Option<Animation>,
    },
    Cube {
        center: [f32; 3],
        width: f32,
        height: f32,
        depth: f32,
        #[serde(default)]
        animation: Option<Animation>,
    },
    Cylinder {
        center: [f32; 3],
        radius: f32,
        height: f32,
        sides: u32,
        #[serde(default)]
        animation: Option<Animation>,
    },
    Sphere {
        center: [f32; 3],
        radius: f32,
        slices: u32,
        stacks: u32,
        #[serde(default)]
        animation: Option<Animation>,
    },
    Cone {
        center: [f32; 3],
        radius: f32,
        height: f32,
        sides: u32,
        #[serde(default)]
        animation: Option<Animation>,
    },
    /// Open extension point; carries named attributes but no drawable
    /// geometry.
    Custom {
        center: [f32; 3],
        #[serde(default)]
        animation: Option<Animation>,
        #[serde(flatten)]
        attrs: HashMap<String, Value>,
    },
}

/// Shape tag of a normalized model.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelKind {
    Generic,
    Cube,
    Cylinder,
    Sphere,
    Cone,
    Custom { attrs: HashMap<String, Value> },
}

/// Normalized model: homogeneous vertices (`w = 1`) plus edge polylines.
/// Each edge is a run of vertex indices; consecutive pairs draw as
/// segments. Read-only during a frame; rebuilt wholesale on scene updates.
#[derive(Debug, Clone)]
pub struct Model {
    pub kind: ModelKind,
    pub vertices: Vec<Vec4>,
    pub edges: Vec<Vec<usize>>,
    pub center: Vec3,
    /// Per-frame model transform; identity unless animated.
    pub transform: Mat4,
    pub animation: Option<Animation>,
}

/// Full scene descriptor (external contract).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescriptor {
    pub view: ViewSpec,
    pub models: Vec<ModelSpec>,
}

impl SceneDescriptor {
    /// Parses a descriptor from JSON.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}

/// Normalized scene state consumed by the pipeline.
#[derive(Debug, Clone)]
pub struct Scene {
    pub view: ViewParams,
    pub models: Vec<Model>,
}

impl Scene {
    /// Validates and normalizes a descriptor. Errors leave the caller's
    /// current scene untouched.
    pub fn from_descriptor(desc: &SceneDescriptor) -> Result<Self> {
        let view = ViewParams::from(&desc.view);
        view.validate().context("invalid view parameters")?;

        let mut models = Vec::with_capacity(desc.models.len());
        for (i, spec) in desc.models.iter().enumerate() {
            let model = Model::from_spec(spec).with_context(|| format!("model {i}"))?;
            models.push(model);
        }

        debug!(models = models.len(), "scene normalized");
        Ok(Self { view, models })
    }

    /// Recomputes animated model transforms for an elapsed time in
    /// seconds. Pure in `elapsed_secs`: the same input always produces the
    /// same transforms.
    pub fn update_transforms(&mut self, elapsed_secs: f32) {
        for model in &mut self.models {
            if let Some(anim) = model.animation {
                model.transform = spin_transform(model.center, anim, elapsed_secs);
            }
        }
    }
}

/// Rotation of `2*pi*rps*elapsed` about `anim.axis` through `center`.
fn spin_transform(center: Vec3, anim: Animation, elapsed_secs: f32) -> Mat4 {
    let theta = TAU * anim.rps * elapsed_secs;
    let rot = match anim.axis {
        Axis::X => transform::rotate_x(theta),
        Axis::Y => transform::rotate_y(theta),
        Axis::Z => transform::rotate_z(theta),
    };
    Mat4::concat(&[
        transform::translate(center.x, center.y, center.z),
        rot,
        transform::translate(-center.x, -center.y, -center.z),
    ])
}

impl Model {
    pub fn from_spec(spec: &ModelSpec) -> Result<Self> {
        match spec {
            ModelSpec::Generic {
                vertices,
                edges,
                animation,
            } => generic_model(vertices, edges, *animation),
            ModelSpec::Cube {
                center,
                width,
                height,
                depth,
                animation,
            } => cube_model(*center, *width, *height, *depth, *animation),
            ModelSpec::Cylinder {
                center,
                radius,
                height,
                sides,
                animation,
            } => cylinder_model(*center, *radius, *height, *sides, *animation),
            ModelSpec::Sphere {
                center,
                radius,
                slices,
                stacks,
                animation,
            } => sphere_model(*center, *radius, *slices, *stacks, *animation),
            ModelSpec::Cone {
                center,
                radius,
                height,
                sides,
                animation,
            } => cone_model(*center, *radius, *height, *sides, *animation),
            ModelSpec::Custom {
                center,
                animation,
                attrs,
            } => Ok(Model {
                kind: ModelKind::Custom {
                    attrs: attrs.clone(),
                },
                vertices: Vec::new(),
                edges: Vec::new(),
                center: Vec3::new(center[0], center[1], center[2]),
                transform: Mat4::IDENTITY,
                animation: *animation,
            }),
        }
    }

    /// Number of drawable segments across all edge polylines.
    pub fn segment_count(&self) -> usize {
        self.edges.iter().map(|e| e.len().saturating_sub(1)).sum()
    }
}

fn point(x: f32, y: f32, z: f32) -> Vec4 {
    Vec4::new(x, y, z, 1.0)
}

fn generic_model(
    raw_vertices: &[[f32; 3]],
    raw_edges: &[Vec<usize>],
    animation: Option<Animation>,
) -> Result<Model> {
    let vertices: Vec<Vec4> = raw_vertices
        .iter()
        .map(|v| point(v[0], v[1], v[2]))
        .collect();

    for (i, edge) in raw_edges.iter().enumerate() {
        if edge.len() < 2 {
            bail!("edge {i} has fewer than 2 indices");
        }
        if let Some(&bad) = edge.iter().find(|&&idx| idx >= vertices.len()) {
            bail!(
                "edge {i} references vertex {bad}, but the model has {} vertices",
                vertices.len()
            );
        }
    }

    // Centroid stands in for an authored center on raw meshes.
    let center = if vertices.is_empty() {
        Vec3::ZERO
    } else {
        let sum = vertices
            .iter()
            .fold(Vec3::ZERO, |acc, v| acc + v.truncate());
        sum.scale(1.0 / vertices.len() as f32)
    };

    Ok(Model {
        kind: ModelKind::Generic,
        vertices,
        edges: raw_edges.to_vec(),
        center,
        transform: Mat4::IDENTITY,
        animation,
    })
}

fn cube_model(
    center: [f32; 3],
    width: f32,
    height: f32,
    depth: f32,
    animation: Option<Animation>,
) -> Result<Model> {
    if width <= 0.0 || height <= 0.0 || depth <= 0.0 {
        bail!("cube dimensions must be positive");
    }
    let [cx, cy, cz] = center;
    let (hw, hh, hd) = (width / 2.0, height / 2.0, depth / 2.0);

    // Two z-parallel faces, front first, each wound from the top-left
    // corner.
    let mut vertices = Vec::with_capacity(8);
    for s in [1.0f32, -1.0] {
        vertices.push(point(cx - hw, cy + hh, cz + s * hd));
        vertices.push(point(cx + hw, cy + hh, cz + s * hd));
        vertices.push(point(cx + hw, cy - hh, cz + s * hd));
        vertices.push(point(cx - hw, cy - hh, cz + s * hd));
    }

    let edges = vec![
        vec![0, 1, 2, 3, 0],
        vec![4, 5, 6, 7, 4],
        vec![0, 4],
        vec![1, 5],
        vec![2, 6],
        vec![3, 7],
    ];

    Ok(Model {
        kind: ModelKind::Cube,
        vertices,
        edges,
        center: Vec3::new(cx, cy, cz),
        transform: Mat4::IDENTITY,
        animation,
    })
}

fn cylinder_model(
    center: [f32; 3],
    radius: f32,
    height: f32,
    sides: u32,
    animation: Option<Animation>,
) -> Result<Model> {
    if radius <= 0.0 || height <= 0.0 {
        bail!("cylinder radius and height must be positive");
    }
    if sides < 3 {
        bail!("cylinder needs at least 3 sides");
    }
    let [cx, cy, cz] = center;
    let sides = sides as usize;

    let mut vertices = Vec::with_capacity(sides * 2);
    for half in [-1.0f32, 1.0] {
        for j in 0..sides {
            let angle = (j as f32 / sides as f32) * TAU;
            vertices.push(point(
                cx + radius * angle.cos(),
                cy + half * height / 2.0,
                cz + radius * angle.sin(),
            ));
        }
    }

    let mut edges = Vec::with_capacity(sides * 3);
    for j in 0..sides {
        let next = (j + 1) % sides;
        edges.push(vec![j, next]); // bottom ring
        edges.push(vec![j + sides, next + sides]); // top ring
        edges.push(vec![j, j + sides]); // strut
    }

    Ok(Model {
        kind: ModelKind::Cylinder,
        vertices,
        edges,
        center: Vec3::new(cx, cy, cz),
        transform: Mat4::IDENTITY,
        animation,
    })
}

fn sphere_model(
    center: [f32; 3],
    radius: f32,
    slices: u32,
    stacks: u32,
    animation: Option<Animation>,
) -> Result<Model> {
    if radius <= 0.0 {
        bail!("sphere radius must be positive");
    }
    if slices < 2 || stacks < 3 {
        bail!("sphere needs at least 2 slices and 3 stacks");
    }
    let [cx, cy, cz] = center;
    let (slices, stacks) = (slices as usize, stacks as usize);

    // Latitude rings from the top pole down; each ring holds `stacks`
    // points around the y-axis.
    let mut vertices = Vec::with_capacity((slices + 1) * stacks);
    for j in 0..=slices {
        let polar = (j as f32 / slices as f32) * PI;
        let ring_radius = radius * polar.sin();
        let y = cy + radius * polar.cos();
        for k in 0..stacks {
            let azimuth = (k as f32 / stacks as f32) * TAU;
            vertices.push(point(
                cx + ring_radius * azimuth.cos(),
                y,
                cz + ring_radius * azimuth.sin(),
            ));
        }
    }

    let mut edges = Vec::with_capacity(slices * stacks * 2);
    for j in 0..slices {
        for k in 0..stacks {
            let current = j * stacks + k;
            edges.push(vec![current, (j + 1) * stacks + k]); // meridian
            edges.push(vec![current, j * stacks + (k + 1) % stacks]); // parallel
        }
    }

    Ok(Model {
        kind: ModelKind::Sphere,
        vertices,
        edges,
        center: Vec3::new(cx, cy, cz),
        transform: Mat4::IDENTITY,
        animation,
    })
}

fn cone_model(
    center: [f32; 3],
    radius: f32,
    height: f32,
    sides: u32,
    animation: Option<Animation>,
) -> Result<Model> {
    if radius <= 0.0 || height <= 0.0 {
        bail!("cone radius and height must be positive");
    }
    if sides < 3 {
        bail!("cone needs at least 3 sides");
    }
    let [cx, cy, cz] = center;
    let sides = sides as usize;

    // Apex first, then the base ring.
    let mut vertices = Vec::with_capacity(sides + 1);
    vertices.push(point(cx, cy + height / 2.0, cz));
    for j in 0..sides {
        let angle = (j as f32 / sides as f32) * TAU;
        vertices.push(point(
            cx + radius * angle.cos(),
            cy - height / 2.0,
            cz + radius * angle.sin(),
        ));
    }

    let mut edges = Vec::with_capacity(sides * 2);
    for j in 1..=sides {
        edges.push(vec![0, j]); // spoke
    }
    for j in 1..sides {
        edges.push(vec![j, j + 1]); // base ring
    }
    edges.push(vec![sides, 1]);

    Ok(Model {
        kind: ModelKind::Cone,
        vertices,
        edges,
        center: Vec3::new(cx, cy, cz),
        transform: Mat4::IDENTITY,
        animation,
    })
}
