#![warn(clippy::pedantic)]

pub mod export;
pub mod io;
pub mod player;
pub mod preferences;
pub mod script;
pub mod toolbar;

use anyhow::Result as AnyResult;

/// Played when no scripts are given.
const DEMO_SCRIPT: &str = include_str!("demo.sketch");

fn main() -> AnyResult<()> {
    let has_term = std::io::IsTerminal::is_terminal(&std::io::stdin());
    // Log to a terminal, if available. Else, log to "log.out" in the working directory.
    if has_term {
        env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .parse_default_env()
            .init();
    } else {
        let _ = simple_logging::log_to_file("log.out", log::LevelFilter::Debug);
    }

    let preferences = preferences::Preferences::get();
    if preferences.did_fail_to_load() {
        log::warn!("Using default preferences");
    }
    if let Err(e) = preferences.save() {
        log::warn!("Failed to save preferences:\n{e:?}");
    };

    let exporter = export::Exporter::spawn()?;

    // Args are a simple list of script paths, each replayed onto a fresh surface.
    let paths: Vec<std::path::PathBuf> = std::env::args_os().skip(1).map(Into::into).collect();
    if paths.is_empty() {
        log::info!("No scripts given, playing the demo");
        let script: script::Script = DEMO_SCRIPT.parse()?;
        replay("demo", &script, preferences, &exporter)?;
    } else {
        // Did we have at least one success?
        let mut had_success = false;
        for path in &paths {
            let try_block = || -> AnyResult<()> {
                let source = std::fs::read_to_string(path)?;
                let script: script::Script = source.parse()?;
                replay(&path.display().to_string(), &script, preferences, &exporter)
            };
            match try_block() {
                Ok(()) => had_success = true,
                Err(e) => log::error!("failed to play script {path:?}: {e:#}"),
            }
        }
        if !had_success {
            log::warn!("Failed to play any provided script.");
        }
    }

    let summary = exporter.finish();
    log::info!(
        "Done. {} export(s) written, {} failed",
        summary.written,
        summary.failed
    );
    Ok(())
}

fn replay(
    name: &str,
    script: &script::Script,
    preferences: &preferences::Preferences,
    exporter: &export::Exporter,
) -> AnyResult<()> {
    let mut player = player::Player::new(preferences)?.with_exporter(exporter);
    let stats = player.play(script);
    let surface = player.surface();
    log::info!(
        "Played {name}: {} step(s), {} rejected, {} frame(s), {} stroke(s) remain, {} export(s) queued",
        script.len(),
        stats.rejected,
        stats.frames,
        surface.history().len(),
        stats.exports,
    );
    Ok(())
}
