pub mod formats;

use flexi_logger::{Logger, LoggerHandle};

use crate::Error;

/// Logs go to stderr so stdout only carries the conversation.
pub fn init() -> Result<LoggerHandle, Error> {
    let handle = Logger::try_with_env_or_str("warn")?
        .format(formats::cli_format)
        .log_to_stderr()
        .start()?;

    Ok(handle)
}
