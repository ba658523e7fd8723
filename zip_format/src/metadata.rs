use chrono::Local;

use common::{config::PrinterSettings, slice::SliceResult};

/// Renders the human-readable metadata report included in every archive.
/// Monospace-formatted, two-space indented sections.
pub fn report(result: &SliceResult, settings: &PrinterSettings) -> String {
    let mut out = String::new();
    let mut line = |text: String| {
        out.push_str(&text);
        out.push('\n');
    };

    line("Slice Export Metadata".into());
    line("=====================".into());
    line(String::new());
    line(format!(
        "Export Date: {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    line(format!("Profile Name: {}", settings.profile_name));
    line(String::new());

    line("Print Statistics:".into());
    line(format!("  Total Layers: {}", result.total_layers));
    line(format!(
        "  Print Time: {:.1} minutes ({:.1} hours)",
        result.print_time,
        result.print_time / 60.0
    ));
    line(format!(
        "  Total Exposure Time: {:.0} seconds",
        result.total_exposure_time
    ));
    line(format!(
        "  Total Lift Time: {:.0} seconds",
        result.total_lift_time
    ));
    line(format!(
        "  Estimated Resin Volume: {:.1} ml",
        result.resin_volume
    ));
    line(format!("  Estimated Cost: ${:.2}", result.cost));
    line(String::new());

    line("Printer Settings:".into());
    line(format!(
        "  Build Volume: {} x {} x {} mm",
        settings.build_volume.x, settings.build_volume.y, settings.build_volume.z
    ));
    line(format!("  Layer Thickness: {} mm", settings.layer_thickness));
    line(format!("  Exposure Time: {} s", settings.exposure_time));
    line(format!(
        "  Bottom Exposure Time: {} s",
        settings.bottom_exposure_time
    ));
    line(format!("  Bottom Layers: {}", settings.bottom_layers));
    line(format!("  Lift Height: {} mm", settings.lift_height));
    line(format!("  Lift Speed: {} mm/min", settings.lift_speed));
    line(format!("  Retract Speed: {} mm/min", settings.retract_speed));
    line(format!(
        "  Lift Sequence Time: {} s",
        settings.lift_sequence_time
    ));
    line(format!("  Anti-Aliasing: {}", settings.anti_aliasing));
    line(format!(
        "  Resin Price: ${} per liter",
        settings.resin_price_per_liter
    ));
    line(String::new());

    if let (Some(first), Some(last)) = (result.layers.first(), result.layers.last()) {
        line("Layer Information:".into());
        line(format!("  First Layer Z: {:.3} mm", first.z));
        line(format!("  Last Layer Z: {:.3} mm", last.z));
        line(String::new());
    }

    line("Files:".into());
    line("  output.gcode - machine program for the print".into());
    line(format!(
        "  layers/ - {} PNG images (layer_00001.png to layer_{:05}.png)",
        result.total_layers, result.total_layers
    ));

    out
}
