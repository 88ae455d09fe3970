//! Domain model (config, unit names, outcomes, errors, ...).
//!
//! ここには I/O を含めません。起動・待機・集約は `app`、外部連携は `ports`/`impls` に置きます。

pub mod assets;
pub mod config;
pub mod control_plane;
pub mod errors;
pub mod ids;
pub mod outcome;
pub mod unit;

pub use self::assets::AssetLayout;
pub use self::config::{BootstrapConfig, DEFAULT_ASSET_TIMEOUT, ResolvedConfig, load_config};
pub use self::control_plane::{ComponentSettings, INSECURE_API_ADDR, REQUIRED_PODS, control_plane};
pub use self::errors::{ConstructionError, UnitError};
pub use self::ids::BootstrapId;
pub use self::outcome::Outcome;
pub use self::unit::{UnitKind, UnitName};
