//! Load the trained-parameter artifact.
//!
//! The artifact is read once at startup. Any failure here is fatal for the
//! process: callers must not build a pipeline without valid parameters.
//!
//! Without a configured path the illustrative artifact compiled into the
//! binary is used, so `credit` works from any directory.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::info;

use crate::error::ModelLoadError;
use crate::models::{ModelArtifact, ModelParameters};

/// The illustrative artifact shipped in `assets/`.
pub const ILLUSTRATIVE_ARTIFACT: &str = include_str!("../../assets/illustrative_model.json");

/// Load from `path`, or the built-in illustrative artifact when `None`.
pub fn load_configured(path: Option<&Path>) -> Result<ModelParameters, ModelLoadError> {
    match path {
        Some(path) => load_parameters(path),
        None => {
            let params = ModelParameters::from_json_str(ILLUSTRATIVE_ARTIFACT)?;
            info!(model = params.name(), "using built-in illustrative model");
            Ok(params)
        }
    }
}

/// Read, parse and validate a model artifact.
pub fn load_parameters(path: &Path) -> Result<ModelParameters, ModelLoadError> {
    let file = File::open(path).map_err(|source| ModelLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let artifact: ModelArtifact =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| ModelLoadError::Json {
            origin: format!("'{}'", path.display()),
            source,
        })?;

    let params = ModelParameters::try_from(artifact)?;
    info!(
        model = params.name(),
        features = params.features().len(),
        bands = params.bands().bands().len(),
        path = %path.display(),
        "loaded model parameters"
    );
    Ok(params)
}
