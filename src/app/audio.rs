#[cfg(test)]
#[path = "audio_test.rs"]
mod tests;

use std::path::{Path, PathBuf};
use std::process::Stdio;

use chrono::Local;
use eyre::{Context, Result};
use tokio::process::Command;

use crate::config::resolve_path;

/// Write a narration under `dir` and return the file path.
pub async fn save_audio(dir: &str, turn: usize, format: &str, audio: &[u8]) -> Result<PathBuf> {
    let dir = PathBuf::from(resolve_path(dir).wrap_err(format!("resolving {}", dir))?);
    tokio::fs::create_dir_all(&dir)
        .await
        .wrap_err(format!("creating directory {}", dir.display()))?;

    let name = format!(
        "story-{}-{}.{}",
        turn,
        Local::now().format("%Y%m%d%H%M%S%3f"),
        format
    );
    let path = dir.join(name);
    tokio::fs::write(&path, audio)
        .await
        .wrap_err(format!("writing {}", path.display()))?;
    log::info!("Saved {} bytes of audio to {}", audio.len(), path.display());
    Ok(path)
}

/// Start `player` on the audio file without waiting for playback to end.
pub fn play(player: &[String], path: &Path) -> Result<()> {
    let Some((program, args)) = player.split_first() else {
        eyre::bail!("no player command configured");
    };

    let mut child = Command::new(program)
        .args(args)
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .wrap_err(format!("starting player {}", program))?;

    let program = program.clone();
    tokio::spawn(async move {
        match child.wait().await {
            Ok(status) if status.success() => {}
            Ok(status) => log::warn!("Player {} exited with {}", program, status),
            Err(err) => log::error!("Waiting for player {}: {}", program, err),
        }
    });
    Ok(())
}
