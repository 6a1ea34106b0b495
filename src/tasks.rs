use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use nih_plug::prelude::*;

use crate::state::{GateState, StateError, PRESET_EXTENSION};

/// Work the editor hands off to the background thread
#[derive(Debug)]
pub enum TaskRequests {
    /// Ask the user where to write the preset, then write it
    SavePreset(GateState),

    /// Write the preset to a known path
    WritePreset(PathBuf, GateState),

    /// Ask the user for a preset file, decode it and send it back to the editor
    LoadPreset(Sender<TaskResults>),
}

/// What the background thread hands back to the editor
#[derive(Debug)]
pub enum TaskResults {
    LoadedPreset(PathBuf, GateState),
}

/// Runs a single background task. File dialogs block, so this must never run
/// on the audio or GUI thread.
pub fn run(task: TaskRequests) {
    let (path, state) = match task {
        TaskRequests::SavePreset(state) => match pick_save_path() {
            Some(path) => (path, state),
            None => return,
        },
        TaskRequests::WritePreset(path, state) => (path, state),
        TaskRequests::LoadPreset(results) => {
            if let Some(path) = pick_preset_file() {
                read_preset(path, &results);
            }
            return;
        }
    };

    match write_preset(&path, &state) {
        Ok(path) => nih_log!("Saved preset to {}", path.display()),
        Err(e) => nih_error!("Failed to save preset to {}: {}", path.display(), e),
    }
}

fn pick_save_path() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("gate preset", &[PRESET_EXTENSION])
        .set_file_name(format!("preset.{PRESET_EXTENSION}"))
        .save_file()
}

/// Opens a preset chooser. Blocks until the user picks a file or cancels.
fn pick_preset_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("gate preset", &[PRESET_EXTENSION])
        .pick_file()
}

/// Decodes a preset file and sends it to the editor, which applies it on the
/// GUI thread.
fn read_preset(path: PathBuf, results: &Sender<TaskResults>) {
    match GateState::load(&path) {
        Ok(state) => {
            // The editor may have been closed in the meantime
            let _ = results.send(TaskResults::LoadedPreset(path, state));
        }
        Err(e) => nih_error!("Failed to load preset {}: {}", path.display(), e),
    }
}

/// Writes the preset, adding the extension when it's missing, and returns the
/// path that was actually written.
pub fn write_preset(path: &Path, state: &GateState) -> Result<PathBuf, StateError> {
    let path = if path.extension().is_none() {
        path.with_extension(PRESET_EXTENSION)
    } else {
        path.to_path_buf()
    };
    state.save(&path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::mpsc;

    #[test]
    fn test_read_preset_sends_decoded_state() {
        let path = std::env::temp_dir().join(format!(
            "sidechain-gate-read-{}.{PRESET_EXTENSION}",
            std::process::id()
        ));
        let state = GateState::new(0.35, 0.65);
        state.save(&path).unwrap();

        let (sender, receiver) = mpsc::channel();
        read_preset(path.clone(), &sender);
        match receiver.try_recv().unwrap() {
            TaskResults::LoadedPreset(loaded_path, loaded) => {
                assert_eq!(loaded_path, path);
                assert_eq!(loaded, state);
            }
        }

        // A broken file is logged and nothing reaches the editor
        std::fs::write(&path, [0xAB; 3]).unwrap();
        read_preset(path.clone(), &sender);
        assert!(receiver.try_recv().is_err());

        std::fs::remove_file(&path).unwrap();
        read_preset(path, &sender);
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_read_preset_survives_closed_editor() {
        let path = std::env::temp_dir().join(format!(
            "sidechain-gate-closed-{}.{PRESET_EXTENSION}",
            std::process::id()
        ));
        GateState::new(0.5, 0.5).save(&path).unwrap();

        let (sender, receiver) = mpsc::channel();
        drop(receiver);
        read_preset(path.clone(), &sender);

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_write_preset_adds_extension() {
        let base = std::env::temp_dir().join(format!("sidechain-gate-task-{}", std::process::id()));
        let state = GateState::new(0.4, 0.6);

        let written = write_preset(&base, &state).unwrap();
        assert_eq!(written.extension().unwrap(), PRESET_EXTENSION);
        assert_eq!(GateState::load(&written).unwrap(), state);

        // An explicit extension is left alone
        let custom = base.with_extension("bin");
        assert_eq!(write_preset(&custom, &state).unwrap(), custom);

        std::fs::remove_file(written).unwrap();
        std::fs::remove_file(custom).unwrap();
    }

    #[test]
    fn test_run_writes_known_path() {
        let path = std::env::temp_dir().join(format!(
            "sidechain-gate-run-{}.{PRESET_EXTENSION}",
            std::process::id()
        ));
        let state = GateState::new(0.9, 0.05);

        run(TaskRequests::WritePreset(path.clone(), state));
        assert_eq!(GateState::load(&path).unwrap(), state);
        std::fs::remove_file(path).unwrap();
    }
}
