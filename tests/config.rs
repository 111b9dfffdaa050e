// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fs;
use std::sync::Arc;

use tasklog::context::TaskId;
use tasklog::{Attributes, BoxError, Level, RouterConfig, RouterError, collaborators::ErrorStore};
use tempfile::TempDir;

#[derive(Debug)]
struct NullStore;

impl ErrorStore for NullStore {
    fn append_error(&self, _message: &str, _task_id: TaskId) -> Result<(), BoxError> {
        Ok(())
    }
}

#[test]
fn router_from_config_file() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("logging.toml");
    fs::write(
        &config_path,
        format!(
            "root = {:?}\nlevel = \"warning\"\nsinks = [\"cuckoo.log\", \"database\"]\n",
            temp.path().display().to_string()
        ),
    )
    .unwrap();

    let config = RouterConfig::load(&config_path).unwrap();
    let router = config.build_router(Some(Arc::new(NullStore))).unwrap();
    assert_eq!(router.sink_names(), ["cuckoo.log", "database"]);

    router
        .log(Level::Info, "t", "filtered", &[], Attributes::default())
        .unwrap();
    router
        .log(Level::Warning, "t", "kept", &[], Attributes::default())
        .unwrap();

    let contents = fs::read_to_string(temp.path().join("log/cuckoo.log")).unwrap();
    assert!(!contents.contains("filtered"));
    assert!(contents.contains("WARNING: kept"));
}

#[test]
fn unreadable_config_is_config_io() {
    let temp = TempDir::new().unwrap();
    assert!(matches!(
        RouterConfig::load(temp.path().join("missing.toml")),
        Err(RouterError::ConfigIo { .. })
    ));
}
