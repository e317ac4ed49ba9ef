//! Pore model: per-kmer signal distributions and the per-read scaled view.

use super::alphabet;
use super::state::{GaussianParameters, StateParams};
use crate::signal::ScalingParams;
use crate::utils::{open_text_reader, Result};
use std::io::{BufRead, Write};
use std::path::Path;

/// A pore model: one [`StateParams`] per kmer, indexed by kmer rank.
///
/// The model file format is tab-separated with one row per kmer in rank
/// order, optionally preceded by `#model_name` and `#shift_offset` header
/// lines and a `kmer ...` column header.
#[derive(Debug, Clone, PartialEq)]
pub struct PoreModel {
    pub name: String,
    /// Length of the kmers this model is defined over.
    pub kmer_length: u32,
    /// Legacy base correction reconciling per-read shift values against a
    /// differently-calibrated replacement model. Serialized through
    /// unchanged, never recomputed.
    pub shift_offset: f64,
    states: Vec<StateParams>,
}

impl PoreModel {
    /// Reads a model from a plain or gzip-compressed model file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let reader = open_text_reader(path)?;
        let mut name = String::new();
        let mut shift_offset = 0.0;
        let mut rows: Vec<(u32, StateParams)> = Vec::new();
        let mut kmer_length = 0u32;

        for (line_index, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("{}: {}", path.display(), e))?;
            let line = line.trim();
            let parse_err = || format!("{}: malformed line {}", path.display(), line_index + 1);

            if line.is_empty() {
                continue;
            }
            if let Some(rest) = line.strip_prefix('#') {
                let mut fields = rest.split_whitespace();
                match fields.next() {
                    Some("model_name") => name = fields.next().unwrap_or("").to_string(),
                    Some("shift_offset") => {
                        shift_offset = fields
                            .next()
                            .and_then(|v| v.parse().ok())
                            .ok_or_else(parse_err)?
                    }
                    _ => {}
                }
                continue;
            }
            if line.starts_with("kmer") {
                continue;
            }

            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 5 {
                return Err(parse_err());
            }
            let kmer = fields[0].as_bytes();
            if kmer_length == 0 {
                kmer_length = kmer.len() as u32;
            } else if kmer.len() as u32 != kmer_length {
                return Err(format!(
                    "{}: kmer {} does not have length {}",
                    path.display(),
                    fields[0],
                    kmer_length
                ));
            }
            let rank = alphabet::kmer_rank(kmer)
                .ok_or_else(|| format!("{}: invalid kmer {}", path.display(), fields[0]))?;
            let mut values = [0.0f64; 4];
            for (value, field) in values.iter_mut().zip(&fields[1..5]) {
                *value = field.parse().map_err(|_| parse_err())?;
            }
            rows.push((
                rank,
                StateParams::new(values[0], values[1], values[2], values[3]),
            ));
        }

        if kmer_length == 0 {
            return Err(format!("{}: no kmer rows found", path.display()));
        }
        let num_states = alphabet::num_kmers(kmer_length);
        let mut states: Vec<Option<StateParams>> = vec![None; num_states];
        for (rank, params) in rows {
            if states[rank as usize].replace(params).is_some() {
                return Err(format!(
                    "{}: duplicate kmer {}",
                    path.display(),
                    alphabet::kmer_for_rank(rank, kmer_length)
                ));
            }
        }
        let states: Vec<StateParams> = states
            .into_iter()
            .collect::<Option<_>>()
            .ok_or_else(|| format!("{}: model file does not cover all kmers", path.display()))?;

        Ok(PoreModel {
            name,
            kmer_length,
            shift_offset,
            states,
        })
    }

    /// Builds a model from already-decoded states, e.g. the calibration
    /// tables carried inside a raw-signal file.
    pub fn from_states(
        name: impl Into<String>,
        kmer_length: u32,
        states: Vec<StateParams>,
    ) -> Result<Self> {
        let expected = alphabet::num_kmers(kmer_length);
        if states.len() != expected {
            return Err(format!(
                "Expected {} states for k={}, got {}",
                expected,
                kmer_length,
                states.len()
            ));
        }
        Ok(PoreModel {
            name: name.into(),
            kmer_length,
            shift_offset: 0.0,
            states,
        })
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn state(&self, kmer_rank: u32) -> &StateParams {
        &self.states[kmer_rank as usize]
    }

    pub fn states(&self) -> &[StateParams] {
        &self.states
    }

    /// Replaces the state table with another model's, e.g. when swapping
    /// in a reanalysis model.
    pub fn update_states(&mut self, other: &PoreModel) {
        self.update_states_from(&other.states);
    }

    pub fn update_states_from(&mut self, states: &[StateParams]) {
        assert_eq!(
            states.len(),
            self.states.len(),
            "replacement state table must match kmer length"
        );
        self.states.clear();
        self.states.extend_from_slice(states);
    }

    /// Applies a per-read correction, producing the scaled view consumed
    /// by likelihood evaluation. Level parameters get the affine/variance
    /// correction; the duration rate is scaled and folded back into
    /// sd_stdv. Drift is a per-event time correction and stays in
    /// [`ScalingParams`] for downstream code.
    pub fn scaled(&self, scaling: &ScalingParams) -> ScaledModel {
        let states: Vec<StateParams> = self
            .states
            .iter()
            .map(|state| {
                StateParams::with_sd_lambda(
                    state.level_mean * scaling.scale + scaling.shift,
                    state.level_stdv * scaling.var,
                    state.sd_mean * scaling.scale_sd,
                    state.sd_lambda() * scaling.var_sd,
                )
            })
            .collect();
        ScaledModel::bake(states)
    }

    /// Writes the model in kmer-rank order. `modelname` overrides the
    /// stored name in the header when given.
    pub fn write(&self, path: &Path, modelname: Option<&str>) -> Result<()> {
        let mut file =
            std::fs::File::create(path).map_err(|e| format!("{}: {}", path.display(), e))?;
        let name = modelname.unwrap_or(&self.name);
        let mut out = String::new();
        if !name.is_empty() {
            out.push_str(&format!("#model_name\t{}\n", name));
        }
        out.push_str(&format!("#shift_offset\t{}\n", self.shift_offset));
        out.push_str("kmer\tlevel_mean\tlevel_stdv\tsd_mean\tsd_stdv\n");
        for (rank, state) in self.states.iter().enumerate() {
            out.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\n",
                alphabet::kmer_for_rank(rank as u32, self.kmer_length),
                state.level_mean,
                state.level_stdv,
                state.sd_mean,
                state.sd_stdv
            ));
        }
        file.write_all(out.as_bytes())
            .map_err(|e| format!("{}: {}", path.display(), e))
    }
}

/// A pore model after per-read scaling, with Gaussian parameters baked so
/// likelihood code takes no logarithms. Produced only by
/// [`PoreModel::scaled`]; holding one is the proof that scaling happened.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledModel {
    states: Vec<StateParams>,
    gaussians: Vec<GaussianParameters>,
}

impl ScaledModel {
    fn bake(states: Vec<StateParams>) -> Self {
        let gaussians = states
            .iter()
            .map(|state| GaussianParameters::new(state.level_mean, state.level_stdv))
            .collect();
        ScaledModel { states, gaussians }
    }

    pub fn gaussian(&self, kmer_rank: u32) -> GaussianParameters {
        self.gaussians[kmer_rank as usize]
    }

    pub fn state(&self, kmer_rank: u32) -> StateParams {
        self.states[kmer_rank as usize]
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn test_model(k: u32) -> PoreModel {
        let states = (0..alphabet::num_kmers(k))
            .map(|rank| {
                let base = rank as f64;
                StateParams::new(80.0 + base, 1.0 + base / 100.0, 1.2, 0.3)
            })
            .collect();
        PoreModel::from_states("r9_test", k, states).unwrap()
    }

    #[test]
    fn from_states_checks_length() {
        let states = vec![StateParams::new(80.0, 1.0, 1.2, 0.3); 10];
        assert!(PoreModel::from_states("bad", 3, states).is_err());
    }

    #[test]
    fn file_round_trip_preserves_states() {
        let model = test_model(3);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.tsv");
        model.write(&path, None).unwrap();

        let reread = PoreModel::from_file(&path).unwrap();
        assert_eq!(reread.name, "r9_test");
        assert_eq!(reread.kmer_length, 3);
        assert_eq!(reread.shift_offset, 0.0);
        assert_eq!(reread.states(), model.states());
    }

    #[test]
    fn shift_offset_written_through() {
        let mut model = test_model(2);
        model.shift_offset = -3.25;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.tsv");
        model.write(&path, Some("renamed")).unwrap();

        let reread = PoreModel::from_file(&path).unwrap();
        assert_eq!(reread.name, "renamed");
        assert_eq!(reread.shift_offset, -3.25);
    }

    #[test]
    fn incomplete_model_file_err() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.tsv");
        std::fs::write(&path, "AA\t80\t1\t1.2\t0.3\n").unwrap();
        let err = PoreModel::from_file(&path).unwrap_err();
        assert!(err.contains("does not cover all kmers"), "{}", err);
    }

    #[test]
    fn duplicate_kmer_err() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.tsv");
        let mut text = String::new();
        for kmer in ["A", "C", "G", "T", "A"] {
            text.push_str(&format!("{}\t80\t1\t1.2\t0.3\n", kmer));
        }
        std::fs::write(&path, text).unwrap();
        let err = PoreModel::from_file(&path).unwrap_err();
        assert!(err.contains("duplicate kmer"), "{}", err);
    }

    #[test]
    fn extra_columns_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.tsv");
        let mut text = String::from("kmer\tlevel_mean\tlevel_stdv\tsd_mean\tsd_stdv\tweight\n");
        for kmer in ["A", "C", "G", "T"] {
            text.push_str(&format!("{}\t80\t1\t1.2\t0.3\t1000\n", kmer));
        }
        std::fs::write(&path, text).unwrap();
        let model = PoreModel::from_file(&path).unwrap();
        assert_eq!(model.num_states(), 4);
        assert_eq!(model.state(0).level_mean, 80.0);
    }

    #[test]
    fn scaling_transforms_level_and_duration() {
        let model = test_model(2);
        let scaling = ScalingParams {
            scale: 2.0,
            shift: 5.0,
            drift: 0.01,
            var: 1.5,
            scale_sd: 1.0,
            var_sd: 2.0,
        };
        let scaled = model.scaled(&scaling);

        let raw = model.state(3);
        let state = scaled.state(3);
        assert_abs_diff_eq!(state.level_mean, raw.level_mean * 2.0 + 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(state.level_stdv, raw.level_stdv * 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(state.sd_mean, raw.sd_mean, epsilon = 1e-12);
        assert_abs_diff_eq!(state.sd_lambda(), raw.sd_lambda() * 2.0, epsilon = 1e-9);

        let gaussian = scaled.gaussian(3);
        assert_abs_diff_eq!(gaussian.mean, state.level_mean, epsilon = 1e-12);
        assert_abs_diff_eq!(gaussian.log_stdv, state.level_stdv.ln(), epsilon = 1e-12);
    }

    #[test]
    fn identity_scaling_preserves_levels() {
        let model = test_model(2);
        let scaled = model.scaled(&ScalingParams::default());
        for rank in 0..model.num_states() as u32 {
            let raw = model.state(rank);
            let state = scaled.state(rank);
            assert_abs_diff_eq!(state.level_mean, raw.level_mean, epsilon = 1e-12);
            assert_abs_diff_eq!(state.sd_stdv, raw.sd_stdv, epsilon = 1e-9);
        }
    }

    #[test]
    fn update_states_replaces_table() {
        let mut model = test_model(2);
        let other = PoreModel::from_states(
            "flat",
            2,
            vec![StateParams::new(50.0, 1.0, 1.0, 0.5); 16],
        )
        .unwrap();
        model.update_states(&other);
        assert_eq!(model.name, "r9_test");
        assert_eq!(model.state(7).level_mean, 50.0);
    }

    #[test]
    #[should_panic(expected = "replacement state table must match")]
    fn update_states_length_mismatch_panics() {
        let mut model = test_model(2);
        let other = test_model(3);
        model.update_states(&other);
    }
}
