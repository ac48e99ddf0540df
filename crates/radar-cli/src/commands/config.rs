use radar_config::RadarConfig;

use crate::cli::{GlobalFlags, OutputFormat};
use crate::output::output;

/// Handle `radar config`.
///
/// `raw` prints TOML that can be saved as `radar.toml` as-is.
pub fn handle(config: &RadarConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    match flags.format {
        OutputFormat::Raw => {
            print!("{}", toml::to_string_pretty(config)?);
            Ok(())
        }
        OutputFormat::Json | OutputFormat::Table => output(config, flags.format),
    }
}
