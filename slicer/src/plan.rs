use common::{config::PrinterSettings, slice::PrintEstimate};

use crate::{error::SliceError, mesh::Mesh};

/// Hard ceiling on the layer count, guarding against pathological
/// thickness settings producing unbounded work.
pub const LAYER_LIMIT: u32 = 10_000;

/// Fraction of the bounding volume assumed solid by the resin estimate.
const HOLLOW_FACTOR: f32 = 0.4;

/// Timing and exposure for one planned layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerPlan {
    /// 1-based layer number.
    pub number: u32,
    /// Height of the cut plane in mm.
    pub z: f32,
    pub exposure_time: f32,
    pub bottom: bool,
}

/// Validates every slicing precondition and returns the layer count.
/// Checked in order: model height against the build volume, layer
/// thickness, then the layer count ceiling. Fails before any layer work.
pub fn layer_count(mesh: &Mesh, settings: &PrinterSettings) -> Result<u32, SliceError> {
    let height = mesh.height();
    if height > settings.build_volume.z {
        return Err(SliceError::ModelTooTall {
            height,
            limit: settings.build_volume.z,
        });
    }

    if settings.layer_thickness <= 0.0 {
        return Err(SliceError::InvalidLayerThickness);
    }

    if height <= 0.0 {
        return Ok(0);
    }

    let count = (height / settings.layer_thickness).ceil() as u32;
    if count > LAYER_LIMIT {
        return Err(SliceError::TooManyLayers(count));
    }

    Ok(count)
}

/// Lays out every layer's Z height, exposure time and bottom flag.
pub fn plan_layers(mesh: &Mesh, settings: &PrinterSettings) -> Result<Vec<LayerPlan>, SliceError> {
    let count = layer_count(mesh, settings)?;

    Ok((0..count)
        .map(|i| LayerPlan {
            number: i + 1,
            z: i as f32 * settings.layer_thickness,
            exposure_time: settings.layer_exposure(i),
            bottom: settings.is_bottom_layer(i),
        })
        .collect())
}

/// Platform movement time per layer in seconds: lift, retract, plus the
/// fixed lift sequence overhead. Speeds are configured in mm/min.
pub fn movement_time(settings: &PrinterSettings) -> f32 {
    let lift = settings.lift_height / (settings.lift_speed / 60.0);
    let retract = settings.lift_height / (settings.retract_speed / 60.0);
    lift + retract + settings.lift_sequence_time
}

/// Aggregates print statistics from the layer plan alone. Does not
/// rasterize anything, so it runs in linear time over the mesh.
pub fn estimate(mesh: &Mesh, settings: &PrinterSettings) -> Result<PrintEstimate, SliceError> {
    let plans = plan_layers(mesh, settings)?;

    let total_exposure_time = plans.iter().map(|l| l.exposure_time).sum::<f32>();
    let total_lift_time = plans.len() as f32 * movement_time(settings);
    let print_time = (total_exposure_time + total_lift_time) / 60.0;

    let height = mesh.height();
    let resin_volume = resin_volume(mesh, height);
    let cost = resin_volume * settings.resin_price_per_liter / 1000.0;

    Ok(PrintEstimate {
        model_height: height,
        layer_count: plans.len() as u32,
        total_exposure_time,
        total_lift_time,
        print_time,
        resin_volume,
        cost,
    })
}

/// Coarse resin estimate in ml: XY bounding-box base area times height
/// over three (pyramid volume), scaled by the hollow factor. A placeholder
/// policy, not a mesh volume integral.
fn resin_volume(mesh: &Mesh, height: f32) -> f32 {
    let Some((min, max)) = mesh.bounds() else {
        return 0.0;
    };

    let base_area = (max.x - min.x) * (max.y - min.y);
    base_area * height / 3.0 * HOLLOW_FACTOR
}

#[cfg(test)]
mod test {
    use common::config::PrinterSettings;
    use nalgebra::Vector3;

    use super::{estimate, layer_count, movement_time, plan_layers};
    use crate::{error::SliceError, mesh::Mesh, test_mesh};

    fn settings() -> PrinterSettings {
        PrinterSettings {
            layer_thickness: 1.0,
            exposure_time: 1.0,
            bottom_exposure_time: 5.0,
            bottom_layers: 3,
            build_volume: Vector3::new(20.0, 20.0, 50.0),
            lift_height: 5.0,
            lift_speed: 50.0,
            retract_speed: 100.0,
            lift_sequence_time: 2.0,
            resin_price_per_liter: 50.0,
            ..Default::default()
        }
    }

    #[test]
    fn layer_count_is_ceiling_of_height_over_thickness() {
        let mesh = test_mesh::cube(10.0);
        assert_eq!(layer_count(&mesh, &settings()).unwrap(), 10);

        let thicker = PrinterSettings {
            layer_thickness: 3.0,
            ..settings()
        };
        assert_eq!(layer_count(&mesh, &thicker).unwrap(), 4);
    }

    #[test]
    fn layers_are_numbered_and_spaced() {
        let plans = plan_layers(&test_mesh::cube(10.0), &settings()).unwrap();
        assert_eq!(plans.len(), 10);

        for (i, plan) in plans.iter().enumerate() {
            assert_eq!(plan.number, i as u32 + 1);
            assert_eq!(plan.z, i as f32);
        }

        assert!(plans[0].bottom && plans[2].bottom && !plans[3].bottom);
        assert_eq!(plans[0].exposure_time, 5.0);
        assert_eq!(plans[9].exposure_time, 1.0);
    }

    #[test]
    fn too_tall_models_are_rejected_with_measurements() {
        let config = PrinterSettings {
            build_volume: Vector3::new(20.0, 20.0, 5.0),
            ..settings()
        };

        let error = layer_count(&test_mesh::cube(10.0), &config).unwrap_err();
        assert!(matches!(error, SliceError::ModelTooTall { .. }));

        let message = error.to_string();
        assert!(message.contains("10.00"), "{message}");
        assert!(message.contains('5'), "{message}");
    }

    #[test]
    fn non_positive_thickness_is_rejected_for_any_mesh() {
        let config = PrinterSettings {
            layer_thickness: 0.0,
            ..settings()
        };

        assert!(matches!(
            layer_count(&test_mesh::cube(10.0), &config),
            Err(SliceError::InvalidLayerThickness)
        ));
        assert!(matches!(
            layer_count(&Mesh::new(Vec::new()), &config),
            Err(SliceError::InvalidLayerThickness)
        ));
    }

    #[test]
    fn absurd_layer_counts_are_rejected() {
        let config = PrinterSettings {
            layer_thickness: 0.0001,
            ..settings()
        };

        match layer_count(&test_mesh::cube(10.0), &config) {
            Err(SliceError::TooManyLayers(count)) => assert!(count > 10_000),
            other => panic!("expected TooManyLayers, got {other:?}"),
        }
    }

    #[test]
    fn empty_mesh_plans_no_layers() {
        let mesh = Mesh::new(Vec::new());
        assert_eq!(layer_count(&mesh, &settings()).unwrap(), 0);

        let totals = estimate(&mesh, &settings()).unwrap();
        assert_eq!(totals.layer_count, 0);
        assert_eq!(totals.resin_volume, 0.0);
    }

    #[test]
    fn movement_time_converts_speeds_to_seconds() {
        // 5mm at 50mm/min up, 5mm at 100mm/min down, 2s overhead.
        let time = movement_time(&settings());
        assert!((time - 11.0).abs() < 1e-4, "{time}");
    }

    #[test]
    fn estimate_aggregates_layer_times() {
        let result = estimate(&test_mesh::cube(10.0), &settings()).unwrap();

        assert_eq!(result.layer_count, 10);
        assert_eq!(result.model_height, 10.0);
        // 3 bottom layers at 5s, 7 at 1s.
        assert!((result.total_exposure_time - 22.0).abs() < 1e-3);
        assert!((result.total_lift_time - 110.0).abs() < 1e-3);
        assert!((result.print_time - 2.2).abs() < 1e-3);
    }

    #[test]
    fn resin_estimate_uses_the_pyramid_heuristic() {
        let result = estimate(&test_mesh::cube(10.0), &settings()).unwrap();

        // 10x10 base times 10 high, over 3, at 40% solid.
        let expected = 10.0 * 10.0 * 10.0 / 3.0 * 0.4;
        assert!((result.resin_volume - expected).abs() < 1e-2);
        assert!((result.cost - expected * 50.0 / 1000.0).abs() < 1e-3);
    }

    #[test]
    fn cost_scales_linearly_with_resin_price() {
        let base = estimate(&test_mesh::cube(10.0), &settings()).unwrap();

        let doubled = PrinterSettings {
            resin_price_per_liter: 100.0,
            ..settings()
        };
        let result = estimate(&test_mesh::cube(10.0), &doubled).unwrap();

        assert!((result.cost - base.cost * 2.0).abs() < 1e-3);
        assert_eq!(result.resin_volume, base.resin_volume);
    }
}
