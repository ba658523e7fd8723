use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Full settings record for one printer profile. Cloned into every slicing
/// operation, never mutated while a slice is in flight.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PrinterSettings {
    /// Name the profile is stored under. Persistence only, the engine
    /// never reads it.
    pub profile_name: String,
    pub notes: String,

    /// Layer thickness in mm. Must be greater than zero for any slicing
    /// operation.
    pub layer_thickness: f32,
    /// Exposure time for regular layers in seconds.
    pub exposure_time: f32,
    /// Exposure time for the first `bottom_layers` layers in seconds.
    pub bottom_exposure_time: f32,
    /// Number of extended-exposure layers at the bottom of the print.
    pub bottom_layers: u32,

    /// Size of the build volume along X, Y and Z in mm.
    pub build_volume: Vector3<f32>,

    /// Distance the platform lifts off the film between layers, in mm.
    pub lift_height: f32,
    /// Lift speed in mm/min.
    pub lift_speed: f32,
    /// Retract (move down) speed in mm/min.
    pub retract_speed: f32,
    /// Fixed overhead per lift sequence in seconds.
    pub lift_sequence_time: f32,

    /// Carried for profile compatibility. The rasterizer is binary and
    /// ignores it.
    pub anti_aliasing: bool,
    pub resin_price_per_liter: f32,
}

impl PrinterSettings {
    /// Whether the given 0-based layer index is a bottom layer.
    pub fn is_bottom_layer(&self, index: u32) -> bool {
        index < self.bottom_layers
    }

    /// Exposure time for the given 0-based layer index.
    pub fn layer_exposure(&self, index: u32) -> f32 {
        if self.is_bottom_layer(index) {
            self.bottom_exposure_time
        } else {
            self.exposure_time
        }
    }
}

impl Default for PrinterSettings {
    fn default() -> Self {
        Self {
            profile_name: "default".into(),
            notes: String::new(),

            layer_thickness: 0.025,
            exposure_time: 1.0,
            bottom_exposure_time: 5.0,
            bottom_layers: 3,

            build_volume: Vector3::new(14.515, 8.165, 25.0),

            lift_height: 5.0,
            lift_speed: 50.0,
            retract_speed: 100.0,
            lift_sequence_time: 2.0,

            anti_aliasing: true,
            resin_price_per_liter: 0.0,
        }
    }
}

#[cfg(test)]
mod test {
    use super::PrinterSettings;

    #[test]
    fn bottom_layers_use_bottom_exposure() {
        let settings = PrinterSettings {
            bottom_layers: 3,
            exposure_time: 1.5,
            bottom_exposure_time: 6.0,
            ..Default::default()
        };

        assert!(settings.is_bottom_layer(0));
        assert!(settings.is_bottom_layer(2));
        assert!(!settings.is_bottom_layer(3));

        assert_eq!(settings.layer_exposure(0), 6.0);
        assert_eq!(settings.layer_exposure(3), 1.5);
    }
}
