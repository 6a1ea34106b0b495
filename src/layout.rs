use nih_plug::prelude::*;

/// The side-chain is always a stereo pair
pub const SIDE_CHAIN_CHANNELS: u32 = 2;

const SIDE_CHAIN_NAMES: PortNames = PortNames {
    layout: None,
    main_input: None,
    main_output: None,
    aux_inputs: &["Sidechain In"],
    aux_outputs: &[],
};

// The first audio IO layout is used as the default. Main input and output always match, so a
// host can only pick between stereo and mono, the side-chain stays stereo either way.
pub const AUDIO_IO_LAYOUTS: &[AudioIOLayout] = &[
    AudioIOLayout {
        main_input_channels: NonZeroU32::new(2),
        main_output_channels: NonZeroU32::new(2),

        aux_input_ports: &[new_nonzero_u32(SIDE_CHAIN_CHANNELS)],
        aux_output_ports: &[],

        names: PortNames {
            layout: Some("Stereo"),
            ..SIDE_CHAIN_NAMES
        },
    },
    AudioIOLayout {
        main_input_channels: NonZeroU32::new(1),
        main_output_channels: NonZeroU32::new(1),

        aux_input_ports: &[new_nonzero_u32(SIDE_CHAIN_CHANNELS)],
        aux_output_ports: &[],

        names: PortNames {
            layout: Some("Mono"),
            ..SIDE_CHAIN_NAMES
        },
    },
];

/// Checks a layout against the bus policy: the main bus has the same non-zero
/// channel count on both sides, and there is exactly one stereo side-chain
/// input and no extra outputs.
pub fn is_supported(layout: &AudioIOLayout) -> bool {
    let main_matches = layout.main_input_channels.is_some()
        && layout.main_input_channels == layout.main_output_channels;
    let side_chain_is_stereo = matches!(
        layout.aux_input_ports,
        [channels] if channels.get() == SIDE_CHAIN_CHANNELS
    );

    main_matches && side_chain_is_stereo && layout.aux_output_ports.is_empty()
}
