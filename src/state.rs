use std::path::Path;

use derive_more::Constructor;
use nih_plug::prelude::*;
use nih_plug::wrapper::state::{ParamValue, PluginState};
use thiserror::Error;

use crate::params::NoiseGateParams;

/// Size of the binary state, two `f32` back to back
pub const STATE_SIZE: usize = 8;

/// File extension of the preset files written by the editor
pub const PRESET_EXTENSION: &str = "gate";

#[derive(Debug, Error)]
pub enum StateError {
    #[error("state blob is {len} bytes long, expected at least {STATE_SIZE}")]
    Truncated { len: usize },

    #[error("preset file i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Binary snapshot of the gate parameters.
///
/// The layout is the one older sessions were saved with: the threshold then
/// alpha, each as a little-endian IEEE-754 `f32`. There is no header, no
/// version and no length marker, so the layout must never change.
#[derive(Debug, Clone, Copy, PartialEq, Constructor)]
pub struct GateState {
    pub threshold: f32,
    pub alpha: f32,
}

impl GateState {
    /// Reads the current parameter values (getState).
    pub fn capture(params: &NoiseGateParams) -> Self {
        Self::new(
            params.threshold.unmodulated_plain_value(),
            params.alpha.unmodulated_plain_value(),
        )
    }

    /// Pushes the values back into the parameters and notifies the host
    /// (setState).
    ///
    /// Must be called from the GUI thread.
    pub fn restore(&self, params: &NoiseGateParams, setter: &ParamSetter) {
        for (param, value) in [(&params.threshold, self.threshold), (&params.alpha, self.alpha)] {
            setter.begin_set_parameter(param);
            setter.set_parameter(param, value);
            setter.end_set_parameter(param);
        }
    }

    pub fn to_bytes(&self) -> [u8; STATE_SIZE] {
        let mut bytes = [0; STATE_SIZE];
        bytes[..4].copy_from_slice(&self.threshold.to_le_bytes());
        bytes[4..].copy_from_slice(&self.alpha.to_le_bytes());
        bytes
    }

    /// Decodes the first [`STATE_SIZE`] bytes of `data`. Anything after them is
    /// ignored.
    ///
    /// Values outside of the unit range are clamped into it and NaN reads as 0,
    /// since preset files can be edited by hand.
    pub fn from_bytes(data: &[u8]) -> Result<Self, StateError> {
        let Some((threshold, rest)) = data.split_first_chunk::<4>() else {
            return Err(StateError::Truncated { len: data.len() });
        };
        let Some((alpha, _)) = rest.split_first_chunk::<4>() else {
            return Err(StateError::Truncated { len: data.len() });
        };

        Ok(Self::new(
            unit_value(f32::from_le_bytes(*threshold)),
            unit_value(f32::from_le_bytes(*alpha)),
        ))
    }

    pub fn save(&self, path: &Path) -> Result<(), StateError> {
        std::fs::write(path, self.to_bytes())?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, StateError> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }
}

/// Brings a stored parameter value back into `[0, 1]`. NaN becomes 0.
pub fn unit_value(value: f32) -> f32 {
    if value.is_nan() {
        0.
    } else {
        value.clamp(0., 1.)
    }
}

/// Clamps restored parameter values into the unit range.
///
/// The host normally can't produce anything else, but hand-edited or corrupted
/// sessions can. Returns `true` if something had to be changed.
pub fn sanitize(state: &mut PluginState) -> bool {
    let mut changed = false;

    for id in ["threshold", "alpha"] {
        if let Some(ParamValue::F32(value)) = state.params.get_mut(id) {
            let clamped = unit_value(*value);
            if clamped != *value {
                nih_warn!("Restored {id} value {value} is out of range, using {clamped}");
                *value = clamped;
                changed = true;
            }
        }
    }

    changed
}
