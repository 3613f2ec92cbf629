//! Standalone viewer binary.
//!
//! Usage:
//!   cargo run -p wire_viewer -- [--scene scenes/demo.json] [--width 100] [--height 40]
//!
//! Reads console commands from stdin and prints rendered frames as ASCII
//! grids. Type `help` for the command list.

use std::env;
use std::io::{BufRead, Write};

use tracing::info;
use wire_shared::config::RendererConfig;
use wire_viewer::ViewerApp;

fn parse_args() -> (RendererConfig, Option<String>) {
    let mut cfg = RendererConfig::default();
    let mut scene = None;
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--scene" if i + 1 < args.len() => {
                scene = Some(args[i + 1].clone());
                i += 2;
            }
            "--width" if i + 1 < args.len() => {
                if let Ok(w) = args[i + 1].parse() {
                    cfg.width = w;
                }
                i += 2;
            }
            "--height" if i + 1 < args.len() => {
                if let Ok(h) = args[i + 1].parse() {
                    cfg.height = h;
                }
                i += 2;
            }
            _ => i += 1,
        }
    }
    (cfg, scene)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let (cfg, scene_path) = parse_args();
    info!(width = cfg.width, height = cfg.height, "Starting viewer");

    let mut app = ViewerApp::new(cfg);
    if let Some(path) = scene_path {
        match app.load_scene_file(&path) {
            Ok(lines) => {
                for line in lines {
                    println!("{line}");
                }
            }
            Err(e) => println!("Error: {e:#}"),
        }
    }

    println!("Type 'help' for commands, 'quit' to exit.");
    println!();

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    loop {
        print!("] ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line == "quit" {
            break;
        }
        match app.exec(line) {
            Ok(output) => {
                for line in output {
                    println!("{line}");
                }
            }
            Err(e) => println!("Error: {e:#}"),
        }
    }

    Ok(())
}
