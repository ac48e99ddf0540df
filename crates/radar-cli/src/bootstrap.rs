use anyhow::Context;
use radar_config::RadarConfig;
use radar_store::Warehouse;

/// Open the configured warehouse. Fails early when `store.path` is unset.
pub fn open_warehouse(config: &RadarConfig) -> anyhow::Result<Warehouse> {
    let store = config.require_store()?;
    Warehouse::open(&store.path)
        .with_context(|| format!("failed to open warehouse at '{}'", store.path))
}
