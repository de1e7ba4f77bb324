use flexi_logger::{DeferredNow, style};
use log::Record;

/// `LEVEL target: message`, level colored.
pub fn cli_format(
    w: &mut dyn std::io::Write,
    _now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    let level = record.level();
    write!(
        w,
        "{} {}: {}",
        style(level).paint(format!("{level:<5}")),
        record.target(),
        record.args()
    )
}
