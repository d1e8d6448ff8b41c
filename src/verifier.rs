// Verifier module: drives one verification attempt.
//
// load artifacts -> encode words per the call layout -> invoke the endpoint.
// The endpoint is a capability (`VerifyEndpoint`) so the pipeline does not
// care whether it talks to a JSON-RPC node or to an in-process double.
// Nothing here retries: a failed call is reported as-is.
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactStore;
use crate::codec::EncodedWords;
use crate::error::{Failure, Result, VerifierError};
use crate::layout::CallLayout;
use crate::types::ArgumentSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallMode {
    /// Ask for a gas estimate only; nothing is committed.
    Estimate,
    /// Run `verify` and read back its boolean result.
    Execute,
}

impl std::str::FromStr for CallMode {
    type Err = VerifierError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "estimate" => Ok(CallMode::Estimate),
            "execute" => Ok(CallMode::Execute),
            other => Err(VerifierError::InvalidConfig(format!(
                "Unknown call mode: {} (expected estimate or execute)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    Verdict(bool),
    GasEstimate(u64),
}

impl VerificationOutcome {
    pub fn accepted(&self) -> Option<bool> {
        match self {
            VerificationOutcome::Verdict(accepted) => Some(*accepted),
            VerificationOutcome::GasEstimate(_) => None,
        }
    }

    pub fn gas_estimate(&self) -> Option<u64> {
        match self {
            VerificationOutcome::GasEstimate(gas) => Some(*gas),
            VerificationOutcome::Verdict(_) => None,
        }
    }

    /// Treat a `false` verdict as a hard failure.
    pub fn ensure_accepted(self) -> Result<Self> {
        match self {
            VerificationOutcome::Verdict(false) => {
                Err(VerifierError::VerificationFailed(Failure::Rejected))
            }
            outcome => Ok(outcome),
        }
    }
}

/// A deployed verifier exposing `verify(uint256[], ...)`.
///
/// Both methods take the same positional arguments. A call that would revert
/// must fail in both modes with [`VerifierError::VerificationFailed`].
pub trait VerifyEndpoint: Send + Sync {
    fn execute(&self, args: &[EncodedWords]) -> impl Future<Output = Result<bool>> + Send;

    fn estimate(&self, args: &[EncodedWords]) -> impl Future<Output = Result<u64>> + Send;

    /// Human-readable target, e.g. the contract address and node URL.
    fn describe(&self) -> String;
}

pub struct VerificationInvoker<E> {
    endpoint: E,
}

impl<E: VerifyEndpoint> VerificationInvoker<E> {
    pub fn new(endpoint: E) -> Self {
        Self { endpoint }
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    pub async fn invoke(
        &self,
        mode: CallMode,
        args: Vec<EncodedWords>,
    ) -> Result<VerificationOutcome> {
        let total_words: usize = args.iter().map(Vec::len).sum();
        tracing::info!(
            "Invoking verify mode={:?} args={} words={} endpoint={}",
            mode,
            args.len(),
            total_words,
            self.endpoint.describe()
        );

        let outcome = match mode {
            CallMode::Execute => self
                .endpoint
                .execute(&args)
                .await
                .map(VerificationOutcome::Verdict),
            CallMode::Estimate => self
                .endpoint
                .estimate(&args)
                .await
                .map(VerificationOutcome::GasEstimate),
        };

        match &outcome {
            Ok(VerificationOutcome::Verdict(accepted)) => {
                tracing::info!("Verification result: accepted={}", accepted)
            }
            Ok(VerificationOutcome::GasEstimate(gas)) => {
                tracing::info!("Verification gas estimate: {}", gas)
            }
            Err(e) => tracing::warn!("Verification call failed: {}", e),
        }

        outcome
    }
}

/// What one attempt sent and what came back.
#[derive(Debug, Clone)]
pub struct VerificationReport {
    pub mode: CallMode,
    pub layout: String,
    pub arguments: Vec<ArgumentSummary>,
    pub outcome: VerificationOutcome,
}

/// Artifact directory + call layout + endpoint.
pub struct Verifier<E> {
    store: ArtifactStore,
    layout: CallLayout,
    invoker: VerificationInvoker<E>,
}

impl<E: VerifyEndpoint> Verifier<E> {
    pub fn new(store: ArtifactStore, layout: CallLayout, endpoint: E) -> Self {
        Self {
            store,
            layout,
            invoker: VerificationInvoker::new(endpoint),
        }
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub fn layout(&self) -> &CallLayout {
        &self.layout
    }

    pub fn endpoint(&self) -> &E {
        self.invoker.endpoint()
    }

    pub async fn verify_artifacts(&self, mode: CallMode) -> Result<VerificationReport> {
        self.verify_with_layout(mode, &self.layout).await
    }

    /// Run one attempt with a layout other than the configured one.
    pub async fn verify_with_layout(
        &self,
        mode: CallMode,
        layout: &CallLayout,
    ) -> Result<VerificationReport> {
        let artifacts = self.store.load_set(&layout.artifacts())?;
        let args = layout.encode_args(&artifacts)?;

        let arguments = layout
            .args()
            .iter()
            .zip(&args)
            .map(|(spec, words)| ArgumentSummary {
                artifact: spec.artifact,
                order: spec.order,
                words: words.len(),
            })
            .collect();

        let outcome = self.invoker.invoke(mode, args).await?;

        Ok(VerificationReport {
            mode,
            layout: layout.to_string(),
            arguments,
            outcome,
        })
    }
}
