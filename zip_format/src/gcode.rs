use common::{config::PrinterSettings, slice::SliceResult};

/// Produces the textual machine program embedded in the archive. The
/// archive itself does not interpret the text, callers plug in whatever
/// dialect their printer firmware consumes.
pub trait GcodeFormatter {
    fn format(&self, result: &SliceResult, settings: &PrinterSettings) -> String;
}
