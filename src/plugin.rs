use nih_plug::prelude::*;
use nih_plug::wrapper::state::PluginState;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::editor::{self, EditorStates};
use crate::gate::{EnvelopeGate, DEFAULT_SAMPLE_RATE};
use crate::layout;
use crate::params::NoiseGateParams;
use crate::state;
use crate::tasks::{self, TaskRequests};

pub struct NoiseGate {
    // Params of the plugin
    params: Arc<NoiseGateParams>,

    // Envelope follower and hold counter
    gate: EnvelopeGate,

    // Whether the gate was open at the end of the last block, read by the editor
    gate_open: Arc<AtomicBool>,
}

impl Default for NoiseGate {
    fn default() -> Self {
        Self {
            params: Arc::new(NoiseGateParams::default()),
            gate: EnvelopeGate::new(DEFAULT_SAMPLE_RATE),
            gate_open: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl NoiseGate {
    /// Gates the main buffer in place, keyed by the first auxiliary input, and
    /// publishes the gate state for the editor.
    fn process_buffers(&mut self, buffer: &mut Buffer, aux: &AuxiliaryBuffers) {
        // Snapshot once so the whole block sees the same values
        let settings = self.params.settings();

        // An unconnected side-chain gates like a silent one
        let side_chain: &[&mut [f32]] = match aux.inputs.first() {
            Some(side_chain) => side_chain.as_slice_immutable(),
            None => &[],
        };

        self.gate.process_block(settings, buffer.as_slice(), side_chain);
        self.gate_open.store(self.gate.is_open(), Ordering::Relaxed);
    }
}

impl Plugin for NoiseGate {
    const NAME: &'static str = "Sidechain Gate";
    const VENDOR: &'static str = "Sacha RENAULT";
    const URL: &'static str = env!("CARGO_PKG_HOMEPAGE");
    const EMAIL: &'static str = "contact@sacharenault.ovh";

    const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    const AUDIO_IO_LAYOUTS: &'static [AudioIOLayout] = layout::AUDIO_IO_LAYOUTS;

    const MIDI_INPUT: MidiConfig = MidiConfig::None;
    const MIDI_OUTPUT: MidiConfig = MidiConfig::None;

    // Parameters are read once per block
    const SAMPLE_ACCURATE_AUTOMATION: bool = false;

    type SysExMessage = ();
    type BackgroundTask = TaskRequests;

    fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    fn editor(&mut self, async_executor: AsyncExecutor<Self>) -> Option<Box<dyn Editor>> {
        let states = EditorStates {
            params: self.params.clone(),
            gate_open: self.gate_open.clone(),
        };
        editor::create_editor(states, async_executor)
    }

    fn filter_state(state: &mut PluginState) {
        if state::sanitize(state) {
            nih_log!("Restored state had out of range values and was clamped");
        }
    }

    fn initialize(
        &mut self,
        audio_io_layout: &AudioIOLayout,
        buffer_config: &BufferConfig,
        _context: &mut impl InitContext<Self>,
    ) -> bool {
        if !layout::is_supported(audio_io_layout) {
            nih_error!("Unsupported audio layout: {:?}", audio_io_layout);
            return false;
        }

        self.gate.set_sample_rate(buffer_config.sample_rate);
        self.gate.reset();
        self.gate_open.store(false, Ordering::Relaxed);

        nih_log!(
            "Initialized at {} Hz, hold is {} samples",
            buffer_config.sample_rate,
            self.gate.hold_length()
        );
        true
    }

    fn reset(&mut self) {
        // Called from the audio thread, must not allocate
        self.gate.reset();
        self.gate_open.store(false, Ordering::Relaxed);
    }

    fn process(
        &mut self,
        buffer: &mut Buffer,
        aux: &mut AuxiliaryBuffers,
        _context: &mut impl ProcessContext<Self>,
    ) -> ProcessStatus {
        self.process_buffers(buffer, aux);
        ProcessStatus::Normal
    }

    fn task_executor(&mut self) -> TaskExecutor<Self> {
        Box::new(tasks::run)
    }
}
