//! Positional argument layout of the on-chain `verify` call.
//!
//! Each argument names the artifact it is built from and the byte order used
//! to cut that artifact into words. Verifier contracts generated at different
//! times disagree on the byte order of individual arguments, so the layout is
//! always spelled out and never guessed.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::artifact::{ArtifactKind, ProofArtifactSet};
use crate::codec::{self, ByteOrder, EncodedWords};
use crate::error::{Result, VerifierError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArgumentSpec {
    pub artifact: ArtifactKind,
    pub order: ByteOrder,
}

impl ArgumentSpec {
    pub const fn new(artifact: ArtifactKind, order: ByteOrder) -> Self {
        Self { artifact, order }
    }
}

impl fmt::Display for ArgumentSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.artifact, self.order)
    }
}

impl FromStr for ArgumentSpec {
    type Err = VerifierError;

    fn from_str(s: &str) -> Result<Self> {
        let (artifact, order) = s.split_once(':').ok_or_else(|| {
            VerifierError::InvalidConfig(format!(
                "Argument '{}' must look like <artifact>:<be|le>",
                s.trim()
            ))
        })?;
        Ok(Self {
            artifact: artifact.parse()?,
            order: order.parse()?,
        })
    }
}

/// Named layouts seen in practice.
pub const PRESETS: [(&str, &[ArgumentSpec]); 3] = [
    (
        "mixed",
        &[
            ArgumentSpec::new(ArtifactKind::Proof, ByteOrder::BigEndian),
            ArgumentSpec::new(ArtifactKind::FinalPair, ByteOrder::LittleEndian),
        ],
    ),
    (
        "little",
        &[
            ArgumentSpec::new(ArtifactKind::Proof, ByteOrder::LittleEndian),
            ArgumentSpec::new(ArtifactKind::FinalPair, ByteOrder::LittleEndian),
        ],
    ),
    (
        "instances",
        &[
            ArgumentSpec::new(ArtifactKind::Proof, ByteOrder::BigEndian),
            ArgumentSpec::new(ArtifactKind::Instances, ByteOrder::BigEndian),
        ],
    ),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallLayout {
    args: Vec<ArgumentSpec>,
}

impl CallLayout {
    pub fn new(args: Vec<ArgumentSpec>) -> Result<Self> {
        if args.is_empty() {
            return Err(VerifierError::InvalidConfig(
                "Call layout needs at least one argument".to_string(),
            ));
        }
        Ok(Self { args })
    }

    /// Look up one of the [`PRESETS`] by name.
    pub fn preset(name: &str) -> Option<Self> {
        PRESETS
            .iter()
            .find(|(preset, _)| *preset == name)
            .map(|(_, args)| Self {
                args: args.to_vec(),
            })
    }

    /// Proof big-endian, final pair little-endian.
    pub fn mixed() -> Self {
        Self {
            args: PRESETS[0].1.to_vec(),
        }
    }

    pub fn args(&self) -> &[ArgumentSpec] {
        &self.args
    }

    /// Artifacts this layout needs, in argument order.
    pub fn artifacts(&self) -> Vec<ArtifactKind> {
        self.args.iter().map(|a| a.artifact).collect()
    }

    /// Encode every argument under its own byte order.
    pub fn encode_args(&self, artifacts: &ProofArtifactSet) -> Result<Vec<EncodedWords>> {
        self.args
            .iter()
            .map(|arg| -> Result<EncodedWords> {
                let bytes = artifacts.get(arg.artifact).ok_or_else(|| {
                    VerifierError::InvalidConfig(format!(
                        "Artifact {} was not loaded",
                        arg.artifact
                    ))
                })?;
                let words = codec::encode(bytes, arg.order).inspect_err(|_| {
                    tracing::warn!(
                        "Artifact {} is {} bytes, not a whole number of words",
                        arg.artifact,
                        bytes.len()
                    );
                })?;
                tracing::debug!("Encoded {} as {} {} words", arg.artifact, words.len(), arg.order);
                Ok(words)
            })
            .collect()
    }
}

impl fmt::Display for CallLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.args.iter().map(|a| a.to_string()).collect();
        f.write_str(&parts.join(","))
    }
}

impl FromStr for CallLayout {
    type Err = VerifierError;

    /// Accepts a preset name (`mixed`) or a list (`proof:be,final_pair:le`).
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(layout) = CallLayout::preset(s) {
            return Ok(layout);
        }
        if !s.contains(':') {
            return Err(VerifierError::InvalidConfig(format!(
                "Unknown call layout preset: {}",
                s
            )));
        }
        let args = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(|part| part.parse::<ArgumentSpec>())
            .collect::<Result<Vec<ArgumentSpec>>>()?;
        CallLayout::new(args)
    }
}
