//! Viewer application state and console commands.
//!
//! Owns the current scene and configuration. Every command returns its
//! console output as lines; failed scene updates report the error and keep
//! the previous scene and frame intact.

use std::fs;

use anyhow::{Context, Result};
use tracing::info;

use wire_shared::config::RendererConfig;
use wire_shared::pipeline::{render_frame, FrameStats};
use wire_shared::scene::{Scene, SceneDescriptor};

use crate::ascii::AsciiSurface;

const HELP: &[&str] = &[
    "Commands:",
    "  load <path>        - Load a scene descriptor (JSON) and render it",
    "  frame              - Re-render the current scene",
    "  left / right       - Step the camera sideways",
    "  forward / back     - Step the camera along the view axis",
    "  turn-left / turn-right - Swing the look-at point",
    "  animate <seconds>  - Step the animation loop and show the last frame",
    "  status             - Show view parameters and frame counters",
    "  quit               - Exit",
];

pub struct ViewerApp {
    config: RendererConfig,
    surface: AsciiSurface,
    scene: Option<Scene>,
    elapsed: f32,
    last_stats: Option<FrameStats>,
}

impl ViewerApp {
    pub fn new(config: RendererConfig) -> Self {
        let surface = AsciiSurface::new(config.width, config.height);
        Self {
            config,
            surface,
            scene: None,
            elapsed: 0.0,
            last_stats: None,
        }
    }

    /// Executes one console command line and returns its output.
    pub fn exec(&mut self, line: &str) -> Result<Vec<String>> {
        let mut parts = line.split_whitespace();
        let Some(cmd) = parts.next() else {
            return Ok(Vec::new());
        };
        match cmd {
            "load" => {
                let path = parts.next().context("usage: load <path>")?;
                self.load_scene_file(path)
            }
            "frame" => self.render(),
            "left" | "right" | "forward" | "back" | "turn-left" | "turn-right" => {
                self.motion(cmd)
            }
            "animate" => {
                let secs: f32 = parts
                    .next()
                    .unwrap_or("1")
                    .parse()
                    .context("usage: animate <seconds>")?;
                self.animate(secs)
            }
            "status" => Ok(self.status()),
            "help" => Ok(HELP.iter().map(|s| s.to_string()).collect()),
            other => Ok(vec![format!("Unknown command: {other}")]),
        }
    }

    pub fn load_scene_file(&mut self, path: &str) -> Result<Vec<String>> {
        let text = fs::read_to_string(path).with_context(|| format!("read {path}"))?;
        self.load_scene_str(&text)
    }

    /// Replaces the scene only after the descriptor validates in full.
    pub fn load_scene_str(&mut self, json: &str) -> Result<Vec<String>> {
        let desc = SceneDescriptor::from_json_str(json).context("parse scene descriptor")?;
        let scene = Scene::from_descriptor(&desc)?;
        info!(models = scene.models.len(), "scene loaded");
        self.scene = Some(scene);
        self.elapsed = 0.0;
        self.render()
    }

    fn motion(&mut self, cmd: &str) -> Result<Vec<String>> {
        let (move_step, turn_step) = (self.config.move_step, self.config.turn_step);
        let scene = self.scene.as_mut().context("no scene loaded")?;
        let view = scene.view;
        let updated = match cmd {
            "left" => view.moved_left(move_step)?,
            "right" => view.moved_right(move_step)?,
            "forward" => view.moved_forward(move_step)?,
            "back" => view.moved_backward(move_step)?,
            "turn-left" => view.turned_left(turn_step)?,
            _ => view.turned_right(turn_step)?,
        };
        // A step that would land the eye on the look-at point (or otherwise
        // break the view invariants) is refused, keeping the current view.
        updated.validate()?;
        scene.view = updated;
        self.render()
    }

    /// Cooperative animation loop: fixed-step frames, each completing
    /// before the next is produced. Only the final frame is printed.
    fn animate(&mut self, secs: f32) -> Result<Vec<String>> {
        let frames = ((secs * self.config.frame_hz as f32).ceil() as u32).max(1);
        let dt = 1.0 / self.config.frame_hz as f32;

        for _ in 0..frames {
            self.elapsed += dt;
            let scene = self.scene.as_mut().context("no scene loaded")?;
            scene.update_transforms(self.elapsed);
            let stats = render_frame(scene, self.config.width, self.config.height, &mut self.surface)?;
            self.last_stats = Some(stats);
        }

        let mut out = self.present();
        out.push(format!(
            "advanced {frames} frames ({:.2} s at {} Hz)",
            frames as f32 * dt,
            self.config.frame_hz
        ));
        Ok(out)
    }

    fn render(&mut self) -> Result<Vec<String>> {
        let scene = self.scene.as_ref().context("no scene loaded")?;
        let stats = render_frame(scene, self.config.width, self.config.height, &mut self.surface)?;
        self.last_stats = Some(stats);
        Ok(self.present())
    }

    fn present(&self) -> Vec<String> {
        let mut out = self.surface.rows();
        if let Some(stats) = self.last_stats {
            out.push(format!(
                "{} drawn, {} clipped, {} rejected of {} segments",
                stats.segments_drawn,
                stats.segments_clipped,
                stats.segments_rejected,
                stats.segments_in
            ));
        }
        out
    }

    fn status(&self) -> Vec<String> {
        let mut out = Vec::new();
        match &self.scene {
            Some(scene) => {
                let v = &scene.view;
                out.push(format!(
                    "prp ({:.2}, {:.2}, {:.2})  srp ({:.2}, {:.2}, {:.2})",
                    v.prp.x, v.prp.y, v.prp.z, v.srp.x, v.srp.y, v.srp.z
                ));
                out.push(format!(
                    "clip [{:.2}, {:.2}, {:.2}, {:.2}]  models {}",
                    v.clip[0],
                    v.clip[1],
                    v.clip[2],
                    v.clip[3],
                    scene.models.len()
                ));
                if let Some(stats) = self.last_stats {
                    out.push(format!(
                        "last frame: {} drawn, {} rejected",
                        stats.segments_drawn, stats.segments_rejected
                    ));
                }
            }
            None => out.push("no scene loaded".to_string()),
        }
        out
    }
}
