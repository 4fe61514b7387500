//! Main application entry point.

use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting Artboard");

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: artboard <script.json>");
        for shortcut in artboard_core::ShortcutRegistry::all() {
            eprintln!("  {:20} {}", shortcut.format(), shortcut.description);
        }
        return ExitCode::FAILURE;
    };

    match artboard_app::run_file(&path) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            eprintln!("artboard: {e}");
            ExitCode::FAILURE
        }
    }
}
