use std::{
    env, fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::warn;
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

use common::{config::PrinterSettings, misc::random_string, slice::SliceResult};

use crate::{gcode::GcodeFormatter, metadata};

/// Assembles a slicing result into a zip archive on disk. Everything is
/// staged in a temporary directory and only promoted to the destination
/// once the archive is complete, a failed export leaves no partial file.
pub struct ZipExporter<'a> {
    gcode: &'a dyn GcodeFormatter,
}

impl<'a> ZipExporter<'a> {
    pub fn new(gcode: &'a dyn GcodeFormatter) -> Self {
        Self { gcode }
    }

    /// Writes the archive to `output`. `progress` receives integer percent
    /// values, nondecreasing from 0 to 100, after every layer and at
    /// completion.
    pub fn export(
        &self,
        result: &SliceResult,
        settings: &PrinterSettings,
        output: &Path,
        mut progress: impl FnMut(u8),
    ) -> Result<()> {
        let staging = env::temp_dir().join(format!("slice_export_{}", random_string(12)));
        fs::create_dir_all(&staging).context("creating staging directory")?;

        let outcome = self.export_to_staging(result, settings, output, &staging, &mut progress);

        // Cleanup is best effort, a failure here must never mask the
        // export outcome.
        if let Err(error) = fs::remove_dir_all(&staging) {
            warn!("failed to clean up staging directory: {error}");
        }

        outcome
    }

    fn export_to_staging(
        &self,
        result: &SliceResult,
        settings: &PrinterSettings,
        output: &Path,
        staging: &Path,
        progress: &mut dyn FnMut(u8),
    ) -> Result<()> {
        progress(0);

        let gcode_path = staging.join("output.gcode");
        fs::write(&gcode_path, self.gcode.format(result, settings))
            .context("writing machine program")?;

        let layer_dir = staging.join("layers");
        fs::create_dir_all(&layer_dir).context("creating layer directory")?;

        let total = result.layers.len();
        let mut layer_paths = Vec::with_capacity(total);
        for (i, layer) in result.layers.iter().enumerate() {
            let name = format!("layer_{:05}.png", layer.number);
            let path = layer_dir.join(&name);
            fs::write(&path, &layer.image)
                .with_context(|| format!("writing layer image {name}"))?;
            layer_paths.push((format!("layers/{name}"), path));

            progress(((i + 1) * 100 / total.max(1)) as u8);
        }

        let metadata_path = staging.join("metadata.txt");
        fs::write(&metadata_path, metadata::report(result, settings))
            .context("writing metadata report")?;

        let archive = staging.join("archive.zip");
        write_archive(&archive, &gcode_path, &metadata_path, &layer_paths)
            .context("packaging archive")?;
        promote(&archive, output).context("promoting archive")?;

        progress(100);
        Ok(())
    }
}

fn write_archive(
    archive: &Path,
    gcode: &Path,
    metadata: &Path,
    layers: &[(String, PathBuf)],
) -> Result<()> {
    let file = fs::File::create(archive)?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    writer.start_file("output.gcode", options)?;
    writer.write_all(&fs::read(gcode)?)?;

    writer.start_file("metadata.txt", options)?;
    writer.write_all(&fs::read(metadata)?)?;

    for (name, path) in layers {
        writer.start_file(name, options)?;
        writer.write_all(&fs::read(path)?)?;
    }

    writer.finish()?;
    Ok(())
}

/// Moves the finished archive into place, replacing any previous file.
/// Falls back to copying when the destination is on another filesystem.
fn promote(archive: &Path, output: &Path) -> Result<()> {
    if output.exists() {
        fs::remove_file(output)?;
    }

    if fs::rename(archive, output).is_err() {
        fs::copy(archive, output)?;
    }

    Ok(())
}
