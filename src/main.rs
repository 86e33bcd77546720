//! Markup Canvas Editor (Headless-CLI).
//!
//! Lädt ein Markup-Dokument, spielt optional ein JSON-Skript aus
//! `EditorIntent`s ab und gibt die erzeugten Ausgaben als JSON-Zeilen
//! sowie das finale Markup aus.
//!
//! Aufruf: `markup-canvas-editor <input.html> [script.json]`

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use markup_canvas_editor::{EditorController, EditorIntent, EditorOptions, EditorState};

fn main() -> Result<()> {
    // Logger initialisieren
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!(
        "Markup Canvas Editor v{} startet...",
        env!("CARGO_PKG_VERSION")
    );

    let mut args = std::env::args_os().skip(1);
    let Some(input) = args.next().map(PathBuf::from) else {
        bail!("Aufruf: markup-canvas-editor <input.html> [script.json]");
    };
    let script = args.next().map(PathBuf::from);

    // Optionen aus TOML laden (oder Standardwerte)
    let config_path = EditorOptions::config_path();
    let options = EditorOptions::load_from_file(&config_path);

    let markup = std::fs::read_to_string(&input)
        .with_context(|| format!("Eingabe {} nicht lesbar", input.display()))?;

    let mut state = EditorState::with_options(options);
    let mut controller = EditorController::new();
    controller.handle_intent(&mut state, EditorIntent::LoadMarkupRequested { markup })?;

    if let Some(script) = script {
        let intents = read_script(&script)?;
        log::info!("{} Intents aus {} werden abgespielt", intents.len(), script.display());
        for intent in intents {
            controller.handle_intent(&mut state, intent)?;
            for output in controller.take_outputs(&mut state) {
                println!("{}", serde_json::to_string(&output)?);
            }
        }
    }

    println!("{}", markup_canvas_editor::app::use_cases::serialization::serialize(&state));
    Ok(())
}

/// Liest ein Skript: JSON-Array von Intents.
fn read_script(path: &Path) -> Result<Vec<EditorIntent>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Skript {} nicht lesbar", path.display()))?;
    let intents: Vec<EditorIntent> = serde_json::from_str(&content)
        .with_context(|| format!("Skript {} ist kein gültiges Intent-Array", path.display()))?;
    Ok(intents)
}
