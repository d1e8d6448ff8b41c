use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;

use crate::codec::WORD_BYTES;
use crate::error::{Result, VerifierError};
use crate::types::ArtifactInfo;

/// The artifact files written by the proof generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Proof,
    Instances,
    InstanceCommitments,
    FinalPair,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::Proof,
        ArtifactKind::Instances,
        ArtifactKind::InstanceCommitments,
        ArtifactKind::FinalPair,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ArtifactKind::Proof => "proof",
            ArtifactKind::Instances => "instances",
            ArtifactKind::InstanceCommitments => "instance_commitments",
            ArtifactKind::FinalPair => "final_pair",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ArtifactKind {
    type Err = VerifierError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        ArtifactKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| VerifierError::InvalidConfig(format!("Unknown artifact: {}", s)))
    }
}

/// Read an artifact file in full.
///
/// Every call goes to disk; nothing is cached.
pub fn load_artifact(path: &Path) -> Result<Vec<u8>> {
    let bytes = std::fs::read(path).map_err(|source| VerifierError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!("Loaded artifact {}: {} bytes", path.display(), bytes.len());

    Ok(bytes)
}

/// Raw artifact bytes keyed by kind.
#[derive(Debug, Default, Clone)]
pub struct ProofArtifactSet {
    buffers: BTreeMap<ArtifactKind, Vec<u8>>,
}

impl ProofArtifactSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: ArtifactKind, bytes: Vec<u8>) {
        self.buffers.insert(kind, bytes);
    }

    pub fn get(&self, kind: ArtifactKind) -> Option<&[u8]> {
        self.buffers.get(&kind).map(|b| b.as_slice())
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}

/// A directory of artifact files.
///
/// Default layout:
/// ```text
/// artifacts_dir/
///   <prefix>proof.data
///   <prefix>instances.data
///   <prefix>instance_commitments.data
///   <prefix>final_pair.data
/// ```
///
/// Generators that pick their own names (`verify_circuit_instance.data`,
/// `verify_circuit_proof_be.data`) are mapped with [`ArtifactStore::with_file`].
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
    prefix: String,
    files: BTreeMap<ArtifactKind, String>,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            files: BTreeMap::new(),
        }
    }

    /// Read `kind` from `file` (relative to the directory), ignoring the prefix.
    pub fn with_file(mut self, kind: ArtifactKind, file: impl Into<String>) -> Self {
        self.files.insert(kind, file.into());
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, kind: ArtifactKind) -> PathBuf {
        match self.files.get(&kind) {
            Some(file) => self.dir.join(file),
            None => self.dir.join(format!("{}{}.data", self.prefix, kind.name())),
        }
    }

    pub fn load(&self, kind: ArtifactKind) -> Result<Vec<u8>> {
        load_artifact(&self.path_for(kind))
    }

    /// Load each requested artifact once. The first failure aborts the set.
    pub fn load_set(&self, kinds: &[ArtifactKind]) -> Result<ProofArtifactSet> {
        let mut set = ProofArtifactSet::new();
        for kind in kinds {
            if set.get(*kind).is_some() {
                continue;
            }
            set.insert(*kind, self.load(*kind)?);
        }

        tracing::info!(
            "Loaded {} artifacts from {}",
            set.len(),
            self.dir.display()
        );

        Ok(set)
    }

    /// Report which artifacts exist and whether their sizes decode cleanly.
    pub fn inventory(&self) -> Vec<ArtifactInfo> {
        ArtifactKind::ALL
            .iter()
            .map(|kind| {
                let path = self.path_for(*kind);
                let (bytes, error) = match std::fs::metadata(&path) {
                    Ok(meta) if meta.is_file() => (Some(meta.len()), None),
                    Ok(_) => (None, Some("not a regular file".to_string())),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => (None, None),
                    Err(e) => {
                        tracing::warn!("Cannot stat artifact {}: {}", path.display(), e);
                        (None, Some(e.to_string()))
                    }
                };
                ArtifactInfo {
                    name: kind.name().to_string(),
                    file: path.display().to_string(),
                    present: bytes.is_some(),
                    bytes,
                    word_aligned: bytes.map(|len| len % WORD_BYTES as u64 == 0),
                    error,
                }
            })
            .collect()
    }
}
