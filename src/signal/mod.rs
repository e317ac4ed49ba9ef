//! Raw-signal data for one sequencing read: the decoded event stream,
//! per-strand calibration, and the read's default pore models.

use crate::model::PoreModel;

/// Sequencing channel of a 2D nanopore read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    Template,
    Complement,
}

impl Strand {
    pub fn index(self) -> usize {
        match self {
            Strand::Template => 0,
            Strand::Complement => 1,
        }
    }
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strand::Template => write!(f, "template"),
            Strand::Complement => write!(f, "complement"),
        }
    }
}

/// One segmented event from the raw signal stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalEvent {
    /// Mean current level over the event, in picoamps.
    pub mean: f64,
    /// Standard deviation of the current level.
    pub stdv: f64,
    /// Start time of the event, in seconds from the read start.
    pub start_time: f64,
    /// Event duration in seconds.
    pub duration: f64,
}

/// Per-read affine/variance correction reconciling a generic pore model
/// with one read's signal calibration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingParams {
    pub scale: f64,
    pub shift: f64,
    pub drift: f64,
    pub var: f64,
    pub scale_sd: f64,
    pub var_sd: f64,
}

impl Default for ScalingParams {
    fn default() -> Self {
        ScalingParams {
            scale: 1.0,
            shift: 0.0,
            drift: 0.0,
            var: 1.0,
            scale_sd: 1.0,
            var_sd: 1.0,
        }
    }
}

/// Decoded raw-signal data for one read. Owned by the alignment cache for
/// the lifetime of the loaded region and evicted on reload.
pub struct SignalRead {
    pub id: String,
    events: [Vec<SignalEvent>; 2],
    scalings: [ScalingParams; 2],
    models: [Option<PoreModel>; 2],
}

impl SignalRead {
    pub fn new(
        id: impl Into<String>,
        events: [Vec<SignalEvent>; 2],
        scalings: [ScalingParams; 2],
        models: [Option<PoreModel>; 2],
    ) -> Self {
        SignalRead {
            id: id.into(),
            events,
            scalings,
            models,
        }
    }

    pub fn events(&self, strand: Strand) -> &[SignalEvent] {
        &self.events[strand.index()]
    }

    pub fn num_events(&self, strand: Strand) -> usize {
        self.events[strand.index()].len()
    }

    pub fn scaling(&self, strand: Strand) -> &ScalingParams {
        &self.scalings[strand.index()]
    }

    /// The default model this read was basecalled with, if one was decoded.
    pub fn model(&self, strand: Strand) -> Option<&PoreModel> {
        self.models[strand.index()].as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(mean: f64) -> SignalEvent {
        SignalEvent {
            mean,
            stdv: 1.5,
            start_time: 0.0,
            duration: 0.002,
        }
    }

    #[test]
    fn strand_indexing() {
        let read = SignalRead::new(
            "read1",
            [vec![event(100.0), event(101.0)], vec![event(90.0)]],
            [ScalingParams::default(), ScalingParams::default()],
            [None, None],
        );
        assert_eq!(read.num_events(Strand::Template), 2);
        assert_eq!(read.num_events(Strand::Complement), 1);
        assert_eq!(read.events(Strand::Complement)[0].mean, 90.0);
        assert!(read.model(Strand::Template).is_none());
    }

    #[test]
    fn default_scaling_is_identity() {
        let scaling = ScalingParams::default();
        assert_eq!(scaling.scale, 1.0);
        assert_eq!(scaling.shift, 0.0);
        assert_eq!(scaling.var, 1.0);
        assert_eq!(scaling.var_sd, 1.0);
    }
}
