//! Control plane - 起動する component と待機対象 pod の固定セット
//!
//! 各 component のフラグはここで一度だけ組み立てられます。
//! フラグの意味を解釈するのは起動される側で、この crate はそのまま渡すだけです。

use std::path::{Path, PathBuf};

use super::config::ResolvedConfig;
use super::errors::ConstructionError;
use super::unit::UnitName;

pub const API_SERVER: &str = "kube-apiserver";
pub const CONTROLLER_MANAGER: &str = "kube-controller-manager";
pub const SCHEDULER: &str = "kube-scheduler";
pub const KUBELET: &str = "kubelet";

/// Workloads that must be running before the self-hosted control plane can take over.
pub const REQUIRED_PODS: [&str; 4] = [KUBELET, API_SERVER, SCHEDULER, CONTROLLER_MANAGER];

/// The temporary API server listens insecurely on 8081 instead of 8080, so a
/// self-hosted API server on the same machine can take the standard ports
/// once this process is gone.
pub const INSECURE_API_ADDR: &str = "http://127.0.0.1:8081";

const SERVICE_CLUSTER_IP_RANGE: &str = "10.3.0.0/24";

/// What the launcher needs to start one control-plane binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSettings {
    pub name: UnitName,
    pub binary: PathBuf,
    pub args: Vec<String>,
}

impl ComponentSettings {
    pub fn new(name: &str, binary: PathBuf, args: Vec<String>) -> Self {
        Self {
            name: UnitName::new(name),
            binary,
            args,
        }
    }

    /// Value of `--flag=value`, if present.
    pub fn flag(&self, flag: &str) -> Option<&str> {
        let prefix = format!("--{flag}=");
        self.args.iter().find_map(|arg| arg.strip_prefix(prefix.as_str()))
    }
}

fn path_arg(flag: &str, path: &Path) -> Result<String, ConstructionError> {
    let value = path
        .to_str()
        .ok_or_else(|| ConstructionError::NonUtf8AssetDir(path.to_path_buf()))?;
    Ok(format!("--{flag}={value}"))
}

/// Build the settings of every long-running control-plane component.
///
/// Order: API server, controller manager, scheduler.
pub fn control_plane(config: &ResolvedConfig) -> Result<Vec<ComponentSettings>, ConstructionError> {
    let layout = config.layout();

    let api_server = ComponentSettings::new(
        API_SERVER,
        config.binary(API_SERVER),
        vec![
            "--bind-address=0.0.0.0".to_string(),
            "--secure-port=886".to_string(),
            "--insecure-port=8081".to_string(),
            "--allow-privileged=true".to_string(),
            path_arg("tls-private-key-file", &layout.api_server_key())?,
            path_arg("tls-cert-file", &layout.api_server_cert())?,
            path_arg("client-ca-file", &layout.ca_cert())?,
            format!("--etcd-servers={}", config.etcd_server()),
            format!("--service-cluster-ip-range={SERVICE_CLUSTER_IP_RANGE}"),
            path_arg("service-account-key-file", &layout.service_account_public_key())?,
            "--admission-control=ServiceAccount".to_string(),
            "--runtime-config=extensions/v1beta1/deployments=true,extensions/v1beta1/daemonsets=true"
                .to_string(),
        ],
    );

    let controller_manager = ComponentSettings::new(
        CONTROLLER_MANAGER,
        config.binary(CONTROLLER_MANAGER),
        vec![
            format!("--master={INSECURE_API_ADDR}"),
            path_arg(
                "service-account-private-key-file",
                &layout.service_account_private_key(),
            )?,
            path_arg("root-ca-file", &layout.ca_cert())?,
            "--leader-elect=true".to_string(),
        ],
    );

    let scheduler = ComponentSettings::new(
        SCHEDULER,
        config.binary(SCHEDULER),
        vec![
            format!("--master={INSECURE_API_ADDR}"),
            "--leader-elect=true".to_string(),
        ],
    );

    Ok(vec![api_server, controller_manager, scheduler])
}
