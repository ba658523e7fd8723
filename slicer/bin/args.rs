use std::{path::PathBuf, str::FromStr};

use anyhow::{Context, Result};
use clap::Parser;
use nalgebra::{ArrayStorage, Const, Matrix, Scalar, Vector3, U1};
use num_traits::Zero;

use common::{config::PrinterSettings, profile::ProfileStore};

#[derive(Debug, Parser)]
/// Slices a triangle mesh into a zip archive of layer exposure masks.
pub struct Args {
    /// Path to a .stl or .obj file.
    pub mesh: PathBuf,

    /// File to save the sliced archive to (.zip).
    pub output: PathBuf,

    #[arg(long)]
    /// Printer profile to load (.json). The built-in default profile is
    /// used when omitted.
    pub profile: Option<PathBuf>,

    #[arg(long)]
    /// Layer thickness in mm, overrides the profile.
    pub layer_thickness: Option<f32>,
    #[arg(long)]
    /// Layer exposure time in seconds, overrides the profile.
    pub exposure_time: Option<f32>,
    #[arg(long)]
    /// Bottom layer exposure time in seconds, overrides the profile.
    pub bottom_exposure_time: Option<f32>,
    #[arg(long)]
    /// Number of bottom layers, overrides the profile.
    pub bottom_layers: Option<u32>,
    #[arg(long, value_parser = vector_value_parser::<f32, 3>)]
    /// Build volume in mm, overrides the profile.
    pub build_volume: Option<Vector3<f32>>,
    #[arg(long)]
    /// Resin price per liter, overrides the profile.
    pub resin_price: Option<f32>,

    #[arg(long, value_parser = vector_value_parser::<f32, 3>)]
    /// Scale of the model along the X, Y, and Z axes.
    pub scale: Option<Vector3<f32>>,
    #[arg(long, value_parser = vector_value_parser::<f32, 3>)]
    /// Rotation of the model in degrees, pitch, roll, yaw.
    pub rotation: Option<Vector3<f32>>,
    #[arg(long, value_parser = vector_value_parser::<f32, 3>)]
    /// Translation applied to the model in mm.
    pub position: Option<Vector3<f32>>,
}

impl Args {
    /// Resolves the effective settings: profile file if given, then any
    /// command line overrides on top.
    pub fn settings(&self) -> Result<PrinterSettings> {
        let mut settings = match &self.profile {
            Some(path) => ProfileStore::load_profile(path)
                .with_context(|| format!("loading profile {}", path.display()))?,
            None => PrinterSettings::default(),
        };

        if let Some(thickness) = self.layer_thickness {
            settings.layer_thickness = thickness;
        }
        if let Some(exposure) = self.exposure_time {
            settings.exposure_time = exposure;
        }
        if let Some(exposure) = self.bottom_exposure_time {
            settings.bottom_exposure_time = exposure;
        }
        if let Some(layers) = self.bottom_layers {
            settings.bottom_layers = layers;
        }
        if let Some(volume) = self.build_volume {
            settings.build_volume = volume;
        }
        if let Some(price) = self.resin_price {
            settings.resin_price_per_liter = price;
        }

        Ok(settings)
    }
}

fn vector_value_parser<T, const N: usize>(
    raw: &str,
) -> Result<Matrix<T, Const<N>, U1, ArrayStorage<T, N, 1>>>
where
    T: FromStr + Scalar + Zero,
    T::Err: Send + Sync + std::error::Error,
{
    let mut vec = Matrix::<T, Const<N>, U1, ArrayStorage<T, N, 1>>::zeros();

    let mut parts = raw.splitn(N, ',');
    for i in 0..N {
        let element = parts.next().context("Missing vector element")?.trim();
        vec[i] = element
            .parse()
            .context("Can't convert element from string")?;
    }

    Ok(vec)
}
