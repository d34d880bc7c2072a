//! Trait-based pipeline architecture for Vesting/Vault deployment.
//!
//! This module provides a trait-based approach to running deployment steps in a type-safe manner.
//! The deployment process follows a fixed stage order: Vesting -> Vault -> Roles.
//!
//! # Example
//!
//! ```no_run
//! use vestvault_deploy::{AdminRoleGrant, ContractArtifact, Pipeline, VaultDeployment, VestingDeployment};
//!
//! # fn example(vesting: ContractArtifact, vault: ContractArtifact) {
//! let pipeline = Pipeline::new(VestingDeployment::new(vesting))
//!     .then(VaultDeployment::new(vault))
//!     .then(AdminRoleGrant);
//! # }
//! ```

mod context;
mod deployer;
mod runner;
mod service;
mod stages;
mod standard;

pub use context::{RolesContext, VaultContext, VestingContext};
pub use deployer::{End, Pipeline};
pub use runner::{DeploymentResult, RunPipeline};
pub use service::DeploymentStep;
pub use stages::{DeploymentStage, NextStage, RolesStage, VaultStage, VestingStage};
pub use standard::StandardPipeline;
