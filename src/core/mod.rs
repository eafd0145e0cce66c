pub mod distro;
pub mod types;

pub use distro::{DistroDetector, Distribution, OsReleaseDetector};
pub use types::{
    BackendKind, Family, InstallOptions, Package, RemoveOptions, Repository, SearchOptions,
    UpdateOptions,
};
