//! Best score per body model, kept as a small JSON file between runs.
//!
//! The engine never touches the disk; only the binary calls into this module
//! when `--keep-high-score` is given.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::Model;

const APP_DIR_NAME: &str = "twin-snake";

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct StoredScore {
    high_score: u32,
}

/// Location of the score file for `model`. The two models award points on
/// different scales, so they never share a file.
#[must_use]
pub fn scores_path(model: Model) -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join(format!("scores-{}.json", model.name()))
}

/// Reads the stored best score of `model`; a missing file counts as 0.
pub fn load_high_score(model: Model) -> io::Result<u32> {
    read_score(&scores_path(model))
}

pub fn save_high_score(model: Model, score: u32) -> io::Result<()> {
    write_score(&scores_path(model), score)
}

fn read_score(path: &Path) -> io::Result<u32> {
    match fs::read_to_string(path) {
        Ok(raw) => serde_json::from_str::<StoredScore>(&raw)
            .map(|stored| stored.high_score)
            .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error)),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(0),
        Err(error) => Err(error),
    }
}

fn write_score(path: &Path, score: u32) -> io::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }

    let json = serde_json::to_string_pretty(&StoredScore { high_score: score })
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error))?;
    fs::write(path, json)
}
