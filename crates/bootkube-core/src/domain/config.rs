//! BootstrapConfig - 起動設定と検証
//!
//! 設定は TOML ファイルまたは CLI フラグから作られ、構築時に一度だけ検証されます。
//! 検証後の値は `ResolvedConfig` として unit の組み立てに使われ、以後変更されません。

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use super::assets::AssetLayout;
use super::errors::ConstructionError;

/// Shared deadline for asset creation and pod readiness.
pub const DEFAULT_ASSET_TIMEOUT: Duration = Duration::from_secs(10 * 60);

const DEFAULT_KUBECTL: &str = "kubectl";

/// Raw bootstrap configuration, as read from a file or flags.
///
/// ```toml
/// asset_dir = "/opt/bootkube/assets"
/// etcd_server = "http://127.0.0.1:2379"
/// asset_timeout_secs = 600
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapConfig {
    pub asset_dir: PathBuf,

    /// Coordination store (etcd) used by the control plane.
    #[serde(alias = "coordination_endpoint")]
    pub etcd_server: String,

    /// Read and written as whole seconds (`asset_timeout_secs`).
    #[serde(
        rename = "asset_timeout_secs",
        default = "default_asset_timeout",
        with = "duration_secs"
    )]
    pub asset_timeout: Duration,

    /// kubectl used by the default asset creator and pod waiter.
    #[serde(default = "default_kubectl")]
    pub kubectl: PathBuf,

    /// Directory holding the control-plane binaries. `None` means `$PATH` lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary_dir: Option<PathBuf>,
}

fn default_asset_timeout() -> Duration {
    DEFAULT_ASSET_TIMEOUT
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    /// Sub-second parts round up so a non-zero timeout never becomes zero.
    pub fn serialize<S: Serializer>(timeout: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let secs = timeout.as_secs();
        let secs = if timeout.subsec_nanos() > 0 {
            secs.saturating_add(1)
        } else {
            secs
        };
        serializer.serialize_u64(secs)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

fn default_kubectl() -> PathBuf {
    PathBuf::from(DEFAULT_KUBECTL)
}

impl BootstrapConfig {
    pub fn new(asset_dir: impl Into<PathBuf>, etcd_server: impl Into<String>) -> Self {
        Self {
            asset_dir: asset_dir.into(),
            etcd_server: etcd_server.into(),
            asset_timeout: default_asset_timeout(),
            kubectl: default_kubectl(),
            binary_dir: None,
        }
    }

    pub fn with_asset_timeout(mut self, timeout: Duration) -> Self {
        self.asset_timeout = timeout;
        self
    }

    pub fn asset_timeout(&self) -> Duration {
        self.asset_timeout
    }

    /// Check the configuration and derive the values every unit is built from.
    pub fn resolve(&self) -> Result<ResolvedConfig, ConstructionError> {
        if self.asset_dir.as_os_str().is_empty() {
            return Err(ConstructionError::EmptyAssetDir);
        }
        let asset_dir = self
            .asset_dir
            .to_str()
            .ok_or_else(|| ConstructionError::NonUtf8AssetDir(self.asset_dir.clone()))?
            .to_string();

        let etcd_server =
            Url::parse(&self.etcd_server).map_err(|source| ConstructionError::InvalidEndpoint {
                endpoint: self.etcd_server.clone(),
                source,
            })?;
        if etcd_server.host_str().is_none_or(str::is_empty) {
            return Err(ConstructionError::EndpointWithoutHost(
                self.etcd_server.clone(),
            ));
        }

        let asset_timeout = self.asset_timeout();
        if asset_timeout.is_zero() {
            return Err(ConstructionError::ZeroTimeout);
        }

        Ok(ResolvedConfig {
            layout: AssetLayout::new(&self.asset_dir),
            asset_dir,
            etcd_server,
            asset_timeout,
            kubectl: self.kubectl.clone(),
            binary_dir: self.binary_dir.clone(),
        })
    }
}

/// Validated, immutable view of a `BootstrapConfig`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    asset_dir: String,
    layout: AssetLayout,
    etcd_server: Url,
    asset_timeout: Duration,
    kubectl: PathBuf,
    binary_dir: Option<PathBuf>,
}

impl ResolvedConfig {
    pub fn asset_dir(&self) -> &str {
        &self.asset_dir
    }

    pub fn layout(&self) -> &AssetLayout {
        &self.layout
    }

    pub fn etcd_server(&self) -> &Url {
        &self.etcd_server
    }

    pub fn asset_timeout(&self) -> Duration {
        self.asset_timeout
    }

    pub fn kubectl(&self) -> &Path {
        &self.kubectl
    }

    /// Full path of a control-plane binary, honouring `binary_dir`.
    pub fn binary(&self, name: &str) -> PathBuf {
        match &self.binary_dir {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }
}

/// Load a `BootstrapConfig` from a TOML file.
///
/// The file is only parsed here; validation happens when the bootstrap is built.
pub fn load_config(path: &Path) -> Result<BootstrapConfig, ConstructionError> {
    let content = fs::read_to_string(path).map_err(|source| ConstructionError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConstructionError::ParseConfig {
        path: path.to_path_buf(),
        source,
    })
}
