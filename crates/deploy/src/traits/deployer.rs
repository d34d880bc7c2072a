//! Recursive pipeline chain type.

use super::service::DeploymentStep;
use super::stages::NextStage;

/// Terminal marker for the end of a pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct End;

/// A node in the deployment pipeline.
///
/// `S` is the step to run, `Next` is the rest of the chain.
/// The chain encodes deployment order through the type system.
#[derive(Debug, Clone)]
pub struct Pipeline<S, Next = End>
where
    S: DeploymentStep,
{
    /// The step configuration for this stage.
    pub step: S,
    /// The rest of the pipeline.
    pub next: Next,
}

impl<S> Pipeline<S, End>
where
    S: DeploymentStep,
{
    /// Create a new pipeline with a single step.
    pub fn new(step: S) -> Self {
        Self { step, next: End }
    }

    /// Chain another step after this one.
    ///
    /// The next step must belong to the subsequent stage.
    pub fn then<S2>(self, step: S2) -> Pipeline<S, Pipeline<S2, End>>
    where
        S2: DeploymentStep,
        S::Stage: NextStage<Next = S2::Stage>,
    {
        Pipeline {
            step: self.step,
            next: Pipeline::new(step),
        }
    }
}

impl<S, S2> Pipeline<S, Pipeline<S2, End>>
where
    S: DeploymentStep,
    S2: DeploymentStep,
{
    /// Chain another step after this one.
    pub fn then<S3>(self, step: S3) -> Pipeline<S, Pipeline<S2, Pipeline<S3, End>>>
    where
        S3: DeploymentStep,
        S2::Stage: NextStage<Next = S3::Stage>,
    {
        Pipeline {
            step: self.step,
            next: Pipeline {
                step: self.next.step,
                next: Pipeline::new(step),
            },
        }
    }
}
