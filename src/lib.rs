mod editor;
pub mod gate;
pub mod layout;
pub mod params;
mod plugin;
pub mod state;
mod tasks;

use nih_plug::prelude::*;
pub use plugin::NoiseGate;

impl ClapPlugin for NoiseGate {
    const CLAP_ID: &'static str = "ovh.sacharenault.sidechain-gate";
    const CLAP_DESCRIPTION: Option<&'static str> = Some("Noise gate keyed by a stereo side-chain");
    const CLAP_MANUAL_URL: Option<&'static str> = Some(Self::URL);
    const CLAP_SUPPORT_URL: Option<&'static str> = None;

    const CLAP_FEATURES: &'static [ClapFeature] = &[
        ClapFeature::AudioEffect,
        ClapFeature::Gate,
        ClapFeature::Stereo,
        ClapFeature::Mono,
    ];
}

nih_export_clap!(NoiseGate);

impl Vst3Plugin for NoiseGate {
    const VST3_CLASS_ID: [u8; 16] = *b"SidechainGateSR!";

    const VST3_SUBCATEGORIES: &'static [Vst3SubCategory] =
        &[Vst3SubCategory::Fx, Vst3SubCategory::Dynamics];
}

nih_export_vst3!(NoiseGate);
