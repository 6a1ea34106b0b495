use std::sync::Arc;

use nih_plug::prelude::*;
use nih_plug_vizia::ViziaState;

use crate::editor;
use crate::gate::GateSettings;

pub const DEFAULT_THRESHOLD: f32 = 0.5;
pub const DEFAULT_ALPHA: f32 = 0.8;

/// Both parameters live on the same normalized scale
pub const UNIT_RANGE: FloatRange = FloatRange::Linear { min: 0., max: 1. };

#[derive(Params)]
pub struct NoiseGateParams {
    /// Editor window size, restored with the session
    #[persist = "editor-state"]
    pub editor_state: Arc<ViziaState>,

    /// The parameter's ID is used to identify the parameter in the wrapped plugin API. As long as
    /// these IDs remain constant, you can rename and reorder these fields as you wish. The
    /// parameters are exposed to the host in the same order they were defined.
    #[id = "threshold"]
    pub threshold: FloatParam,

    #[id = "alpha"]
    pub alpha: FloatParam,
}

impl NoiseGateParams {
    /// Snapshot of the current values, taken once per block.
    ///
    /// Parameters are read unsmoothed on purpose, the whole block sees the
    /// exact same threshold and alpha.
    #[inline]
    pub fn settings(&self) -> GateSettings {
        GateSettings::new(self.threshold.value(), self.alpha.value())
    }
}

impl Default for NoiseGateParams {
    fn default() -> Self {
        Self {
            editor_state: editor::default_state(),
            threshold: FloatParam::new("Threshold", DEFAULT_THRESHOLD, UNIT_RANGE)
                .with_value_to_string(formatters::v2s_f32_rounded(2)),
            alpha: FloatParam::new("Alpha", DEFAULT_ALPHA, UNIT_RANGE)
                .with_value_to_string(formatters::v2s_f32_rounded(2)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = NoiseGateParams::default();
        assert_eq!(params.threshold.value(), 0.5);
        assert_eq!(params.alpha.value(), 0.8);
        assert_eq!(params.settings(), GateSettings::new(0.5, 0.8));
    }

    #[test]
    fn test_ranges_are_normalized() {
        let params = NoiseGateParams::default();
        for param in [&params.threshold, &params.alpha] {
            assert_eq!(param.preview_plain(0.), 0.);
            assert_eq!(param.preview_plain(1.), 1.);
            assert_eq!(param.preview_normalized(0.25), 0.25);
        }
    }

    #[test]
    fn test_names_and_ids() {
        let params = NoiseGateParams::default();
        assert_eq!(params.threshold.name(), "Threshold");
        assert_eq!(params.alpha.name(), "Alpha");

        let ids: Vec<String> = params.param_map().into_iter().map(|(id, _, _)| id).collect();
        assert_eq!(ids, ["threshold", "alpha"]);
    }
}
