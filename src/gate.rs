use derive_more::Constructor;

/// Default sample rate used before the host tells us the real one
pub const DEFAULT_SAMPLE_RATE: f32 = 44100.;

/// Levels below this are flushed to zero so a decaying envelope never turns
/// subnormal
const LEVEL_FLOOR: f32 = 1e-20;

/// Parameter values for one block.
///
/// The processor copies the host parameters into this once at the start of
/// every block, so an automation change can never land halfway through a
/// block.
#[derive(Debug, Clone, Copy, PartialEq, Constructor)]
pub struct GateSettings {
    /// Level the smoothed side-chain has to reach to open the gate
    pub threshold: f32,

    /// Smoothing coefficient of the envelope follower, 0 = no memory, 1 = frozen
    pub alpha: f32,
}

/// A side-chain keyed noise gate.
///
/// The side-chain channels are averaged into a single control signal, which
/// goes through a one-pole low-pass (a leaky integrator):
///
/// `level = alpha * level + (1 - alpha) * mix`
///
/// Whenever `level` reaches the threshold, the hold counter is re-armed to one
/// second worth of samples. The main signal passes unchanged while the counter
/// is non-zero and is replaced by silence otherwise. There is no attack or
/// release ramp, the gate switches hard.
///
/// The hold time is fixed to one second and follows the sample rate, it is not
/// a parameter.
#[derive(Debug)]
pub struct EnvelopeGate {
    /// Smoothed side-chain level
    level: f32,

    /// Remaining samples before the gate closes
    hold: u32,

    /// Number of samples the gate stays open after a detection
    hold_length: u32,
}

impl EnvelopeGate {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            level: 0.,
            hold: 0,
            hold_length: Self::hold_length_for(sample_rate),
        }
    }

    fn hold_length_for(sample_rate: f32) -> u32 {
        // Truncation is intended, a 44.1kHz host holds for exactly 44100 samples
        sample_rate.max(0.) as u32
    }

    /// Updates the sample rate, and with it the length of the hold window.
    ///
    /// A hold already in progress keeps counting down from where it was.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.hold_length = Self::hold_length_for(sample_rate);
    }

    /// Forgets the envelope and closes the gate.
    pub fn reset(&mut self) {
        self.level = 0.;
        self.hold = 0;
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn hold_samples(&self) -> u32 {
        self.hold
    }

    pub fn hold_length(&self) -> u32 {
        self.hold_length
    }

    /// Whether the next sample would pass if the side-chain stopped triggering.
    pub fn is_open(&self) -> bool {
        self.hold > 0
    }

    /// Advances the envelope and the hold counter by one sample.
    ///
    /// Returns `true` if the main signal passes for this sample.
    #[inline]
    fn tick(&mut self, settings: GateSettings, mix: f32) -> bool {
        let level = settings.alpha * self.level + (1. - settings.alpha) * mix;
        // A single NaN or inf sample would otherwise stick until the next reset
        self.level = if !level.is_finite() || level.abs() < LEVEL_FLOOR {
            0.
        } else {
            level
        };

        if self.level >= settings.threshold {
            self.hold = self.hold_length;
        }

        let open = self.hold > 0;
        if open {
            self.hold -= 1;
        }
        open
    }

    /// Runs the gate for a single sample.
    ///
    /// `side_chain` holds the value of every side-chain channel at this
    /// sample. An empty frame counts as silence.
    pub fn process_frame(&mut self, settings: GateSettings, side_chain: &[f32]) -> bool {
        let mix = if side_chain.is_empty() {
            0.
        } else {
            side_chain.iter().sum::<f32>() / side_chain.len() as f32
        };
        self.tick(settings, mix)
    }

    /// Gates a whole block in place.
    ///
    /// Every channel of `main` is processed, the block length is the length of
    /// the first main channel. A side-chain channel that is shorter than the
    /// block reads as zeros past its end, and no side-chain at all is treated
    /// as a silent one.
    ///
    /// Does not allocate.
    pub fn process_block<M, S>(&mut self, settings: GateSettings, main: &mut [M], side_chain: &[S])
    where
        M: AsMut<[f32]>,
        S: AsRef<[f32]>,
    {
        let num_samples = main.first_mut().map_or(0, |ch| ch.as_mut().len());
        let num_side = side_chain.len();

        for j in 0..num_samples {
            let mix = if num_side == 0 {
                0.
            } else {
                side_chain
                    .iter()
                    .map(|ch| ch.as_ref().get(j).copied().unwrap_or(0.))
                    .sum::<f32>()
                    / num_side as f32
            };

            if !self.tick(settings, mix) {
                for channel in main.iter_mut() {
                    if let Some(sample) = channel.as_mut().get_mut(j) {
                        *sample = 0.;
                    }
                }
            }
        }
    }
}

impl Default for EnvelopeGate {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}
