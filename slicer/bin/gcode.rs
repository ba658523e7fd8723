use common::{config::PrinterSettings, slice::SliceResult};
use zip_format::gcode::GcodeFormatter;

/// Minimal mask-printer program: per layer, display the layer image, cure
/// for the exposure time, then run the lift sequence.
pub struct BasicGcode;

impl GcodeFormatter for BasicGcode {
    fn format(&self, result: &SliceResult, settings: &PrinterSettings) -> String {
        let mut out = String::new();
        let mut line = |text: String| {
            out.push_str(&text);
            out.push('\n');
        };

        line(";Generated by slicer".into());
        line(format!(";Layers: {}", result.total_layers));
        line(format!(";Layer thickness: {}mm", settings.layer_thickness));
        line("G21 ;millimeter units".into());
        line("G90 ;absolute positioning".into());
        line("G28 Z0 ;home platform".into());

        for layer in &result.layers {
            line(format!(";LAYER {}", layer.number));
            line(format!("M6054 \"layers/layer_{:05}.png\"", layer.number));
            line(format!("G4 P{:.0} ;cure", layer.exposure_time * 1000.0));
            line(format!(
                "G1 Z{:.3} F{:.0} ;lift",
                layer.z + settings.lift_height,
                settings.lift_speed
            ));
            line(format!(
                "G1 Z{:.3} F{:.0} ;retract",
                layer.z + settings.layer_thickness,
                settings.retract_speed
            ));
        }

        line(";END".into());
        line(format!(
            "G1 Z{:.3} F{:.0}",
            settings.build_volume.z, settings.lift_speed
        ));
        line("M18 ;release motors".into());

        out
    }
}
