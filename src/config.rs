// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router configuration loaded from TOML.
//!
//! ```toml
//! root = "/srv/cuckoo"
//! level = "debug"
//! sinks = ["cuckoo.log", "console", "task"]
//! color = false
//! ```
//!
//! Every key is optional. A missing `sinks` list initializes the full
//! topology.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

use crate::Level;
use crate::collaborators::ErrorStore;
use crate::error::RouterError;
use crate::router::{Router, SinkKind};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouterConfig {
    /// Working-directory root that log paths are resolved under.
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default)]
    pub level: Level,
    /// Names of the sinks to initialize, in dispatch order.
    #[serde(default = "default_sinks")]
    pub sinks: Vec<String>,
    /// Overrides terminal detection for console colors.
    #[serde(default)]
    pub color: Option<bool>,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_sinks() -> Vec<String> {
    SinkKind::ALL.iter().map(|kind| kind.name().to_string()).collect()
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            level: Level::default(),
            sinks: default_sinks(),
            color: None,
        }
    }
}

impl RouterConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, RouterError> {
        let config: RouterConfig = toml::from_str(text)?;
        config.sink_kinds()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RouterError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| RouterError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// The configured sinks, rejecting any name outside the standard topology.
    pub fn sink_kinds(&self) -> Result<Vec<SinkKind>, RouterError> {
        self.sinks.iter().map(|name| name.parse()).collect()
    }

    /**
    Builds a router and initializes every configured sink.

    `error_store` is required only when `database` is among the sinks.
    */
    pub fn build_router(
        &self,
        error_store: Option<Arc<dyn ErrorStore>>,
    ) -> Result<Router, RouterError> {
        let kinds = self.sink_kinds()?;
        let mut builder = Router::builder().root(&self.root).level(self.level);
        if let Some(store) = error_store {
            builder = builder.error_store(store);
        }
        if let Some(color) = self.color {
            builder = builder.color(color);
        }
        let router = builder.build();
        for kind in kinds {
            router.init_kind(kind)?;
        }
        Ok(router)
    }
}
