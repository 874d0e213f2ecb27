use routine_builder::config::DEFAULT_CATALOG;
use routine_builder::{CatalogSource, Config};
use std::path::PathBuf;

#[test]
fn test_default_store_lives_under_home_directory() {
    if std::env::var_os("ROUTINE_STORE").is_some() {
        return;
    }

    let config = Config::from_env();
    let expected = dirs::home_dir().map(|home| home.join(".routine_builder").join("store.json"));
    assert_eq!(config.store_path, expected);
}

#[test]
fn test_default_catalog_is_local_file() {
    if std::env::var_os("ROUTINE_CATALOG").is_some() {
        return;
    }

    let config = Config::from_env();
    assert_eq!(config.catalog, CatalogSource::File(PathBuf::from(DEFAULT_CATALOG)));
}
