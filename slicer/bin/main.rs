use std::{
    io::{stdout, Write},
    thread,
    time::Instant,
};

use anyhow::Result;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

use common::misc::human_duration;
use slicer::{plan, slicer::Slicer, transform::TransformOp};
use zip_format::ZipExporter;

mod args;
mod gcode;
mod mesh_import;

use args::Args;

fn main() -> Result<()> {
    let filter = filter::Targets::new()
        .with_default(LevelFilter::OFF)
        .with_target("slicer", LevelFilter::INFO)
        .with_target("zip_format", LevelFilter::INFO);
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let settings = args.settings()?;

    let mut mesh = mesh_import::load_mesh(&args.mesh)?;
    println!(
        "Loaded `{}`. {{ triangles: {} }}",
        args.mesh.file_name().unwrap_or_default().to_string_lossy(),
        mesh.triangle_count()
    );

    if let Some(scale) = args.scale {
        mesh.transform_mut().push(TransformOp::Scale(scale));
    }
    if let Some(rotation) = args.rotation {
        mesh.transform_mut()
            .push(TransformOp::Rotate(rotation.map(f32::to_radians)));
    }
    if let Some(position) = args.position {
        mesh.transform_mut().push(TransformOp::Translate(position));
    }

    // Center the model and rest it on the build plate
    mesh.place_on_platform();

    let estimate = plan::estimate(&mesh, &settings)?;
    println!(
        "Estimate: {} layers, {:.1} min print, {:.1} ml resin (${:.2})",
        estimate.layer_count, estimate.print_time, estimate.resin_volume, estimate.cost
    );

    // Slice on another thread, the layers themselves fan out over the
    // thread pool.
    let now = Instant::now();
    let slicer = Slicer::new(settings.clone(), mesh)?;
    let progress = slicer.progress();
    let handle = thread::spawn(move || slicer.slice());

    let mut completed = 0;
    while completed < progress.total() {
        completed = progress.wait();
        print!(
            "\rLayer: {}/{}, {:.1}%",
            completed,
            progress.total(),
            completed as f32 / progress.total() as f32 * 100.0
        );
        stdout().flush()?;
    }
    println!();

    let result = handle.join().unwrap()?;

    ZipExporter::new(&gcode::BasicGcode).export(&result, &settings, &args.output, |percent| {
        print!("\rExporting: {percent}%");
        let _ = stdout().flush();
    })?;
    println!();

    println!("Done. Elapsed: {}", human_duration(now.elapsed()));
    Ok(())
}
