use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use nih_plug::prelude::*;
use nih_plug_vizia::vizia::prelude::*;
use nih_plug_vizia::widgets::*;
use nih_plug_vizia::{create_vizia_editor, ViziaState, ViziaTheming};

use crate::params::NoiseGateParams;
use crate::plugin::NoiseGate;
use crate::state::GateState;
use crate::tasks::{TaskRequests, TaskResults};

const NO_PRESET: &str = "No preset";

/// What the processor shares with the editor
pub struct EditorStates {
    pub params: Arc<NoiseGateParams>,

    /// Set by the audio thread at the end of every block
    pub gate_open: Arc<AtomicBool>,
}

pub fn default_state() -> Arc<ViziaState> {
    ViziaState::new(|| (420, 260))
}

pub enum AppEvent {
    LoadPreset,
    /// Overwrite the last loaded preset, or ask for a path if there is none
    SavePreset,
    SavePresetAs,
}

#[derive(Lens)]
pub struct Data {
    params: Arc<NoiseGateParams>,
    gate_open: Arc<AtomicBool>,
    preset_name: String,
    preset_path: Option<PathBuf>,
    gui_context: Arc<dyn GuiContext>,
    async_executor: AsyncExecutor<NoiseGate>,

    // Presets decoded by the background thread
    results_sender: Sender<TaskResults>,
    results: Receiver<TaskResults>,
}

impl Data {
    fn load_preset(&self) {
        self.async_executor
            .execute_background(TaskRequests::LoadPreset(self.results_sender.clone()));
    }

    fn handle_results(&mut self) {
        while let Ok(result) = self.results.try_recv() {
            match result {
                TaskResults::LoadedPreset(path, state) => {
                    // Parameter changes have to go through the GUI context
                    let setter = ParamSetter::new(self.gui_context.as_ref());
                    state.restore(&self.params, &setter);
                    nih_log!("Loaded preset {}", path.display());
                    self.preset_name = preset_name(&path);
                    self.preset_path = Some(path);
                }
            }
        }
    }

    fn save_preset(&self, ask_for_path: bool) {
        let state = GateState::capture(&self.params);
        let request = match &self.preset_path {
            Some(path) if !ask_for_path => TaskRequests::WritePreset(path.clone(), state),
            _ => TaskRequests::SavePreset(state),
        };
        self.async_executor.execute_background(request);
    }
}

impl Model for Data {
    fn event(&mut self, _cx: &mut EventContext, event: &mut Event) {
        // Events bubble up to this model, loaded presets are applied on the next one
        self.handle_results();

        event.map(|app_event, _| match app_event {
            AppEvent::LoadPreset => self.load_preset(),
            AppEvent::SavePreset => self.save_preset(false),
            AppEvent::SavePresetAs => self.save_preset(true),
        });
    }
}

fn preset_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|name| name.to_str())
        .map(String::from)
        .unwrap_or_else(|| String::from(NO_PRESET))
}

fn param_column<'a, P, FMap>(
    cx: &'a mut Context,
    title: &str,
    params_to_param: FMap,
) -> Handle<'a, VStack>
where
    P: Param + 'static,
    FMap: Fn(&Arc<NoiseGateParams>) -> &P + Copy + 'static,
{
    let title = title.to_string();
    VStack::new(cx, move |cx| {
        Label::new(cx, &title).class("param-title");
        ParamSlider::new(cx, Data::params, params_to_param);
    })
    .class("param-column")
}

pub fn create_editor(
    states: EditorStates,
    async_executor: AsyncExecutor<NoiseGate>,
) -> Option<Box<dyn Editor>> {
    create_vizia_editor(
        states.params.editor_state.clone(),
        ViziaTheming::Custom,
        move |cx, gui_context| {
            if let Err(e) = cx.add_stylesheet(include_style!("src/editor/style.css")) {
                nih_error!("Couldn't load the editor stylesheet: {:?}", e);
            }

            let (results_sender, results) = mpsc::channel();
            Data {
                params: states.params.clone(),
                gate_open: states.gate_open.clone(),
                preset_name: String::from(NO_PRESET),
                preset_path: None,
                gui_context,
                async_executor: async_executor.clone(),
                results_sender,
                results,
            }
            .build(cx);

            VStack::new(cx, |cx| {
                Label::new(cx, "Sidechain Gate").class("title");

                HStack::new(cx, |cx| {
                    param_column(cx, "Threshold", |params| &params.threshold);
                    param_column(cx, "Alpha", |params| &params.alpha);
                })
                .class("params");

                HStack::new(cx, |cx| {
                    Element::new(cx).class("led").toggle_class(
                        "open",
                        Data::gate_open.map(|open| open.load(Ordering::Relaxed)),
                    );
                    Label::new(cx, Data::preset_name).class("preset-name");
                    Button::new(
                        cx,
                        |cx| cx.emit(AppEvent::LoadPreset),
                        |cx| Label::new(cx, "Load"),
                    );
                    Button::new(
                        cx,
                        |cx| cx.emit(AppEvent::SavePreset),
                        |cx| Label::new(cx, "Save"),
                    );
                    Button::new(
                        cx,
                        |cx| cx.emit(AppEvent::SavePresetAs),
                        |cx| Label::new(cx, "Save As"),
                    );
                })
                .class("preset-bar");
            })
            .class("main");

            ResizeHandle::new(cx);
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_name() {
        assert_eq!(preset_name(Path::new("/tmp/kick bus.gate")), "kick bus");
        assert_eq!(preset_name(Path::new("/")), NO_PRESET);
    }
}
