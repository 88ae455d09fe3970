//! Asset paths - asset ディレクトリ配下の固定パス
//!
//! 証明書やマニフェストの生成自体はこの crate の責務ではありません。
//! ここでは生成済みの asset をどこから読むかだけを定義します。

use std::path::PathBuf;

pub const ASSET_PATH_CA_CERT: &str = "tls/ca.crt";
pub const ASSET_PATH_API_SERVER_KEY: &str = "tls/apiserver.key";
pub const ASSET_PATH_API_SERVER_CERT: &str = "tls/apiserver.crt";
pub const ASSET_PATH_SERVICE_ACCOUNT_PRIV_KEY: &str = "tls/service-account.key";
pub const ASSET_PATH_SERVICE_ACCOUNT_PUB_KEY: &str = "tls/service-account.pub";
pub const ASSET_PATH_MANIFESTS: &str = "manifests";

/// Resolves the fixed asset layout against an asset directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLayout {
    root: PathBuf,
}

impl AssetLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn ca_cert(&self) -> PathBuf {
        self.root.join(ASSET_PATH_CA_CERT)
    }

    pub fn api_server_key(&self) -> PathBuf {
        self.root.join(ASSET_PATH_API_SERVER_KEY)
    }

    pub fn api_server_cert(&self) -> PathBuf {
        self.root.join(ASSET_PATH_API_SERVER_CERT)
    }

    pub fn service_account_private_key(&self) -> PathBuf {
        self.root.join(ASSET_PATH_SERVICE_ACCOUNT_PRIV_KEY)
    }

    pub fn service_account_public_key(&self) -> PathBuf {
        self.root.join(ASSET_PATH_SERVICE_ACCOUNT_PUB_KEY)
    }

    pub fn manifests(&self) -> PathBuf {
        self.root.join(ASSET_PATH_MANIFESTS)
    }
}
