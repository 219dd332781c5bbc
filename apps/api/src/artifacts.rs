//! On-disk persistence of a trained model bundle.
//!
//! Layout under the models directory:
//!
//! ```text
//! CURRENT                     bundle id of the live bundle
//! bundles/<bundle_id>/
//!     manifest.json
//!     education_encoder.json  ... one JSON envelope per artifact
//! ```
//!
//! A bundle is written into a staging directory, renamed into `bundles/`, and
//! only then published by atomically replacing `CURRENT`. Readers follow
//! `CURRENT` alone, so they see either the previous complete bundle or the new
//! complete bundle, never a mix.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::inference::ModelBundle;
use crate::ml::features::FittedFeatureEncoder;
use crate::ml::MlError;

const CURRENT_POINTER: &str = "CURRENT";
const BUNDLES_DIR: &str = "bundles";
const MANIFEST_FILE: &str = "manifest.json";
const STAGING_PREFIX: &str = ".staging-";

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("no trained model bundle under {0}")]
    NoBundle(PathBuf),

    #[error("malformed CURRENT pointer: {0}")]
    BadPointer(String),

    #[error("artifact '{0}' is missing")]
    Missing(&'static str),

    #[error("artifact '{artifact}' belongs to bundle {found}, expected {expected}")]
    BundleMismatch {
        artifact: &'static str,
        expected: Uuid,
        found: Uuid,
    },

    #[error("artifacts are inconsistent: {0}")]
    Inconsistent(#[from] MlError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error in '{artifact}': {source}")]
    Serialization {
        artifact: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// The seven persisted artifacts. Every one must be present to load a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    EducationEncoder,
    InterestEncoder,
    ExperienceScaler,
    TargetEncoder,
    CareerModel,
    SkillReadinessModel,
    TextVectorizer,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 7] = [
        ArtifactKind::EducationEncoder,
        ArtifactKind::InterestEncoder,
        ArtifactKind::ExperienceScaler,
        ArtifactKind::TargetEncoder,
        ArtifactKind::CareerModel,
        ArtifactKind::SkillReadinessModel,
        ArtifactKind::TextVectorizer,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ArtifactKind::EducationEncoder => "education_encoder",
            ArtifactKind::InterestEncoder => "interest_encoder",
            ArtifactKind::ExperienceScaler => "experience_scaler",
            ArtifactKind::TargetEncoder => "target_encoder",
            ArtifactKind::CareerModel => "career_model",
            ArtifactKind::SkillReadinessModel => "skill_readiness_model",
            ArtifactKind::TextVectorizer => "text_vectorizer",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.name())
    }
}

/// Identity and shape of one training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleManifest {
    pub bundle_id: Uuid,
    pub trained_at: DateTime<Utc>,
    pub skill_vocabulary: Vec<String>,
    pub feature_width: usize,
    pub roles: Vec<String>,
}

impl BundleManifest {
    pub fn new(skill_vocabulary: Vec<String>, feature_width: usize, roles: Vec<String>) -> Self {
        Self {
            bundle_id: Uuid::new_v4(),
            trained_at: Utc::now(),
            skill_vocabulary,
            feature_width,
            roles,
        }
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    bundle_id: Uuid,
    artifact: &'a str,
    payload: &'a T,
}

#[derive(Deserialize)]
struct Envelope<T> {
    bundle_id: Uuid,
    artifact: String,
    payload: T,
}

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn bundle_dir(&self, id: Uuid) -> PathBuf {
        self.root.join(BUNDLES_DIR).join(id.to_string())
    }

    /// Writes `bundle` and publishes it as the current bundle.
    pub fn save(&self, bundle: &ModelBundle) -> Result<PathBuf, ArtifactError> {
        let id = bundle.manifest().bundle_id;
        fs::create_dir_all(self.root.join(BUNDLES_DIR))?;
        self.sweep_stale_staging();

        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(&self.root)?;
        write_json(&staging.path().join(MANIFEST_FILE), "manifest", bundle.manifest())?;

        let encoder = bundle.encoder();
        write_artifact(staging.path(), id, ArtifactKind::EducationEncoder, encoder.education())?;
        write_artifact(staging.path(), id, ArtifactKind::InterestEncoder, encoder.interest())?;
        write_artifact(staging.path(), id, ArtifactKind::ExperienceScaler, encoder.experience())?;
        write_artifact(staging.path(), id, ArtifactKind::TargetEncoder, bundle.targets())?;
        write_artifact(staging.path(), id, ArtifactKind::CareerModel, bundle.career())?;
        write_artifact(staging.path(), id, ArtifactKind::SkillReadinessModel, bundle.skills())?;
        write_artifact(staging.path(), id, ArtifactKind::TextVectorizer, bundle.vectorizer())?;

        let final_dir = self.bundle_dir(id);
        // After the rename the TempDir guard points at nothing; its cleanup is a no-op.
        fs::rename(staging.path(), &final_dir)?;

        let mut pointer = tempfile::NamedTempFile::new_in(&self.root)?;
        pointer.write_all(id.to_string().as_bytes())?;
        pointer.as_file().sync_all()?;
        pointer
            .persist(self.root.join(CURRENT_POINTER))
            .map_err(|e| ArtifactError::Io(e.error))?;

        info!(bundle_id = %id, path = %final_dir.display(), "model bundle published");
        self.prune_superseded(id);
        Ok(final_dir)
    }

    /// Bundle id named by `CURRENT`, if any.
    pub fn current_bundle_id(&self) -> Result<Option<Uuid>, ArtifactError> {
        let path = self.root.join(CURRENT_POINTER);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path)?;
        let id = raw
            .trim()
            .parse::<Uuid>()
            .map_err(|_| ArtifactError::BadPointer(raw.trim().to_string()))?;
        Ok(Some(id))
    }

    /// Loads the current bundle. Any missing or foreign artifact fails the load.
    pub fn load(&self) -> Result<ModelBundle, ArtifactError> {
        let id = self
            .current_bundle_id()?
            .ok_or_else(|| ArtifactError::NoBundle(self.root.clone()))?;
        let dir = self.bundle_dir(id);
        if !dir.is_dir() {
            return Err(ArtifactError::NoBundle(dir));
        }

        let manifest: BundleManifest = read_json(&dir.join(MANIFEST_FILE), "manifest")?;
        if manifest.bundle_id != id {
            return Err(ArtifactError::BundleMismatch {
                artifact: "manifest",
                expected: id,
                found: manifest.bundle_id,
            });
        }

        let encoder = FittedFeatureEncoder::from_parts(
            read_artifact(&dir, id, ArtifactKind::EducationEncoder)?,
            read_artifact(&dir, id, ArtifactKind::InterestEncoder)?,
            read_artifact(&dir, id, ArtifactKind::ExperienceScaler)?,
            manifest.skill_vocabulary.clone(),
        );
        let bundle = ModelBundle::assemble(
            manifest,
            encoder,
            read_artifact(&dir, id, ArtifactKind::TargetEncoder)?,
            read_artifact(&dir, id, ArtifactKind::CareerModel)?,
            read_artifact(&dir, id, ArtifactKind::SkillReadinessModel)?,
            read_artifact(&dir, id, ArtifactKind::TextVectorizer)?,
        )?;

        info!(bundle_id = %id, "model bundle loaded");
        Ok(bundle)
    }

    /// Best effort: removes staging directories left behind by an interrupted save.
    fn sweep_stale_staging(&self) {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "could not list staging directories");
                return;
            }
        };
        for entry in entries.flatten() {
            let is_staging = entry.file_name().to_string_lossy().starts_with(STAGING_PREFIX);
            if !is_staging || !entry.path().is_dir() {
                continue;
            }
            match fs::remove_dir_all(entry.path()) {
                Ok(()) => info!(path = %entry.path().display(), "removed stale staging directory"),
                Err(e) => {
                    warn!(path = %entry.path().display(), error = %e, "failed to remove stale staging directory")
                }
            }
        }
    }

    /// Best effort: removes every bundle directory other than `keep`.
    fn prune_superseded(&self, keep: Uuid) {
        let keep = keep.to_string();
        let entries = match fs::read_dir(self.root.join(BUNDLES_DIR)) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "could not list superseded bundles");
                return;
            }
        };
        for entry in entries.flatten() {
            if entry.file_name().to_string_lossy() == keep.as_str() {
                continue;
            }
            if let Err(e) = fs::remove_dir_all(entry.path()) {
                warn!(path = %entry.path().display(), error = %e, "failed to prune superseded bundle");
            }
        }
    }
}

fn write_json<T: Serialize>(path: &Path, artifact: &'static str, value: &T) -> Result<(), ArtifactError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, value)
        .map_err(|source| ArtifactError::Serialization { artifact, source })?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path, artifact: &'static str) -> Result<T, ArtifactError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ArtifactError::Missing(artifact))
        }
        Err(e) => return Err(e.into()),
    };
    serde_json::from_reader(BufReader::new(file))
        .map_err(|source| ArtifactError::Serialization { artifact, source })
}

fn write_artifact<T: Serialize>(
    dir: &Path,
    bundle_id: Uuid,
    kind: ArtifactKind,
    payload: &T,
) -> Result<(), ArtifactError> {
    let envelope = EnvelopeRef {
        bundle_id,
        artifact: kind.name(),
        payload,
    };
    write_json(&dir.join(kind.file_name()), kind.name(), &envelope)
}

fn read_artifact<T: DeserializeOwned>(
    dir: &Path,
    bundle_id: Uuid,
    kind: ArtifactKind,
) -> Result<T, ArtifactError> {
    let envelope: Envelope<T> = read_json(&dir.join(kind.file_name()), kind.name())?;
    if envelope.bundle_id != bundle_id || envelope.artifact != kind.name() {
        return Err(ArtifactError::BundleMismatch {
            artifact: kind.name(),
            expected: bundle_id,
            found: envelope.bundle_id,
        });
    }
    Ok(envelope.payload)
}
