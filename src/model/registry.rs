//! Registry of named pore models, loaded once from a file-of-filenames.

use super::PoreModel;
use crate::utils::{open_text_reader, Result};
use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

/// An insertion-order-irrelevant name → model map, read-only after
/// construction. Supplies alternative models for reanalysis.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: HashMap<String, PoreModel>,
}

impl ModelRegistry {
    /// Reads a list of model-file paths (one per line, `#` comments and
    /// blank lines skipped) and loads every listed model. Any unreadable
    /// or malformed entry fails the whole load.
    pub fn read_models_fofn(fofn_path: &Path) -> Result<Self> {
        let reader = open_text_reader(fofn_path)?;
        let mut models = HashMap::new();
        for line in reader.lines() {
            let line = line.map_err(|e| format!("{}: {}", fofn_path.display(), e))?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let model_path = Path::new(line);
            let model = PoreModel::from_file(model_path)?;
            let name = if model.name.is_empty() {
                model_path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .ok_or_else(|| format!("Invalid model file name: {}", line))?
                    .to_string()
            } else {
                model.name.clone()
            };
            log::debug!("Loaded model {} (k={}) from {}", name, model.kmer_length, line);
            if models.insert(name.clone(), model).is_some() {
                return Err(format!(
                    "{}: duplicate model name {}",
                    fofn_path.display(),
                    name
                ));
            }
        }
        if models.is_empty() {
            return Err(format!("{}: no models listed", fofn_path.display()));
        }
        Ok(ModelRegistry { models })
    }

    pub fn get(&self, name: &str) -> Option<&PoreModel> {
        self.models.get(name)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PoreModel)> {
        self.models.iter()
    }
}
