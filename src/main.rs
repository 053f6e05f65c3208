//! Kiln - glTF scene importer
//!
//! Loads a `.gltf`/`.glb` file, merges each mesh's primitives, compiles its
//! materials into shader graphs and reports what was built.

mod settings;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use kiln_assets::Document;
use kiln_scene::{import_document, ImportReport, SceneBuilder};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use settings::{LogSettings, Settings};

#[derive(Debug, Parser)]
#[command(name = "kiln", version, about = "Import a glTF file into a node-based scene")]
struct Cli {
    /// glTF or GLB file to import
    file: PathBuf,

    /// Settings file to use instead of the per-user one
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write the built scene as JSON
    #[arg(long, value_name = "PATH")]
    dump: Option<PathBuf>,

    /// Skip shader graph compilation
    #[arg(long)]
    no_shading: bool,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    /// Save the effective settings back to the settings file
    #[arg(long)]
    write_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Settings pick the log level, so they are read before logging starts
    // and reported right after.
    let loaded = Settings::load(cli.config.as_deref());
    let level = match (&loaded, cli.verbose) {
        (_, true) => "debug".to_owned(),
        (Ok(Some(settings)), false) => settings.log.level.clone(),
        _ => LogSettings::default().level,
    };
    init_logging(&level)?;

    let mut settings = match loaded {
        Ok(Some(settings)) => {
            info!(
                "Loaded settings from {:?}",
                Settings::path(cli.config.as_deref()).unwrap_or_default()
            );
            settings
        }
        Ok(None) => {
            info!("No settings file found, using defaults");
            Settings::default()
        }
        Err(e) => {
            warn!("{:#}, using defaults", e);
            Settings::default()
        }
    };
    if cli.no_shading {
        settings.import.import_shading = false;
    }
    if cli.write_config {
        settings.save(cli.config.as_deref())?;
    }

    let document = Document::open(&cli.file)
        .with_context(|| format!("Failed to load {:?}", cli.file))?;
    let (scene, report) = import_document(&document, settings.import);
    summarize(&document, &scene, &report);

    if let Some(path) = &cli.dump {
        let json = serde_json::to_string_pretty(&scene).context("Failed to serialize scene")?;
        fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))?;
        info!("Wrote scene to {:?}", path);
    }

    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("Invalid log level '{}'", level))?;
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;
    Ok(())
}

fn summarize(document: &Document, scene: &SceneBuilder, report: &ImportReport) {
    if let Some(path) = document.source_path() {
        info!(
            "Imported '{}': {}/{} meshes, {} materials compiled from {}",
            path.display(),
            report.imported.len(),
            document.mesh_count(),
            scene.materials().len(),
            document.material_count()
        );
    }
    for (name, id) in &report.imported {
        let Some(mesh) = scene.mesh(*id) else {
            continue;
        };
        let object = &mesh.object;
        let shaded = mesh.slot_materials.iter().flatten().count();
        info!(
            "{}: {} vertices, {} faces, {} UV layers, {} shape keys, {}/{} materials shaded{}",
            name,
            object.geometry.vertex_count(),
            object.geometry.face_count(),
            object.uv_layers.len(),
            object.shape_keys.len(),
            shaded,
            object.material_slots.len(),
            if object.has_vertex_colors() { ", vertex colors" } else { "" }
        );
    }
    for name in &report.empty {
        info!("{}: no primitives", name);
    }
    for (name, error) in &report.failed_meshes {
        warn!("{}: failed: {}", name, error);
    }
    for material in scene.materials() {
        if !material.broken_images.is_empty() {
            warn!(
                "Material '{}': {} missing image(s)",
                material.name,
                material.broken_images.len()
            );
        }
    }
}
