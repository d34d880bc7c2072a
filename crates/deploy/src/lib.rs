//! vestvault-deploy - Deployment library for the Vesting/Vault contract pair.
//!
//! This crate deploys a Vesting contract, a Vault contract bound to it, and
//! grants the Vault admin role to the deploying account.

pub mod abi;
pub mod artifact;
pub mod network;
pub mod roles;
pub mod rpc;
pub mod traits;
pub mod vault;

mod builder;
pub use builder::{DeployerBuilder, default_outdata, network_name_from_url};

mod deployer;
pub use deployer::{
    CONFIG_FILENAME, ContractsConfig, DEFAULT_ARTIFACTS_DIR, DEFAULT_RPC_URL, Deployer,
    NetworkConfig, write_summary,
};

mod record;
pub use record::{DeploymentRecord, RECORD_FILENAME};

mod steps;
pub use steps::{AdminRoleGrant, GrantedRole, VaultDeployment, VestingDeployment};

pub use artifact::{ContractArtifact, DeploymentTarget};
pub use network::{ChainNetwork, DeployedContract, RpcNetwork, TxReceipt, TxRequest, TxSettings};
pub use roles::{ADMIN_ROLE, RoleGrant, RoleId};
pub use traits::{DeploymentResult, Pipeline, RunPipeline, StandardPipeline};
pub use vault::{VaultClient, VestingSchedule};
