//! Core step trait for the deployment pipeline.

use std::future::Future;

use anyhow::Result;
use super::stages::DeploymentStage;
use crate::network::ChainNetwork;

/// A single step of the deployment pipeline.
///
/// A step consumes its configuration and a stage-specific context and produces
/// an output that later steps depend on. The `Stage` associated type
/// determines where in the pipeline the step can be placed.
///
/// # Type Parameters
/// - `Stage`: The deployment stage this step belongs to
/// - `Output`: What the step hands to the next stages
/// - `Context`: Stage-specific context, borrowing the network `N`
pub trait DeploymentStep: Clone + Send + Sync + 'static {
    /// The deployment stage this step belongs to.
    type Stage: DeploymentStage;

    /// The result produced by running the step.
    type Output: Send + 'static;

    /// The context type required to run the step.
    type Context<'a, N>
    where
        Self: 'a,
        N: ChainNetwork + 'a;

    /// The name of this step for logging/identification.
    const STEP_NAME: &'static str;

    /// Run the step against the network carried by `ctx`.
    fn run<'a, N>(
        self,
        ctx: Self::Context<'a, N>,
    ) -> impl Future<Output = Result<Self::Output>> + Send + 'a
    where
        Self: 'a,
        N: ChainNetwork + 'a;
}
