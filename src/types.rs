use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactKind;
use crate::codec::ByteOrder;
use crate::verifier::{CallMode, VerificationReport};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub mode: CallMode,
    /// Preset name or explicit `artifact:order` list; the configured layout when absent.
    #[serde(default)]
    pub layout: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentSummary {
    pub artifact: ArtifactKind,
    pub order: ByteOrder,
    pub words: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub mode: CallMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_estimate: Option<u64>,
    pub layout: String,
    pub arguments: Vec<ArgumentSummary>,
}

impl From<VerificationReport> for VerifyResponse {
    fn from(report: VerificationReport) -> Self {
        Self {
            mode: report.mode,
            accepted: report.outcome.accepted(),
            gas_estimate: report.outcome.gas_estimate(),
            layout: report.layout,
            arguments: report.arguments,
        }
    }
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactInfo {
    pub name: String,
    pub file: String,
    pub present: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_aligned: Option<bool>,
    /// Set when the path exists but cannot be used as an artifact.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ArtifactsResponse {
    pub directory: String,
    pub artifacts: Vec<ArtifactInfo>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub endpoint: String,
    pub layout: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}
