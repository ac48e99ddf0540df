//! `.env` loading. Kept in its own test binary because `dotenvy` writes to
//! the process environment and nothing restores it afterwards.

use figment::Jail;
use pretty_assertions::assert_eq;
use radar_config::RadarConfig;

#[test]
fn dotenv_file_feeds_env_layer() {
    Jail::expect_with(|jail| {
        jail.create_file(
            ".env",
            "RADAR_STORE__PATH=dotenv.duckdb\nRADAR_GENERAL__DEFAULT_LIMIT=30\n",
        )?;

        let config = RadarConfig::load_with_dotenv().expect("config loads");

        assert_eq!(config.store.path, "dotenv.duckdb");
        assert_eq!(config.general.default_limit, 30);
        Ok(())
    });
}
