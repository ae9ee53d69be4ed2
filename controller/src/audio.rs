//! Sound cues through an external player process.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use buzzer_core::{AudioCue, ButtonId, Registry};
use log::{debug, warn};

/// Launches `<player> <sound_dir>/button_<id>.wav` per cue without waiting.
pub struct ExternalPlayer {
    player: String,
    sound_dir: PathBuf,
    playing: Vec<Child>,
}

impl ExternalPlayer {
    pub fn new(player: impl Into<String>, sound_dir: impl Into<PathBuf>) -> Self {
        Self {
            player: player.into(),
            sound_dir: sound_dir.into(),
            playing: Vec::new(),
        }
    }

    pub fn cue_path(&self, button: ButtonId) -> PathBuf {
        cue_path(&self.sound_dir, button)
    }

    /// Warn about every button whose cue file is missing.
    pub fn check_cues<const N: usize>(&self, registry: &Registry<N>) -> usize {
        let missing: Vec<_> = registry
            .iter()
            .map(|b| self.cue_path(b.id))
            .filter(|path| !path.is_file())
            .collect();
        for path in &missing {
            warn!("missing sound cue {}", path.display());
        }
        missing.len()
    }

    /// Forget players that have exited so they do not linger as zombies.
    fn reap(&mut self) {
        self.playing.retain_mut(|child| match child.try_wait() {
            Ok(Some(status)) => {
                if !status.success() {
                    warn!("{} exited with {}", self.player, status);
                }
                false
            }
            Ok(None) => true,
            Err(e) => {
                warn!("lost track of {} (pid {}): {}", self.player, child.id(), e);
                false
            }
        });
    }
}

fn cue_path(dir: &Path, button: ButtonId) -> PathBuf {
    dir.join(format!("button_{}.wav", button))
}

impl AudioCue for ExternalPlayer {
    type Error = io::Error;

    fn play(&mut self, button: ButtonId) -> io::Result<()> {
        self.reap();
        let path = self.cue_path(button);
        let child = Command::new(&self.player)
            .arg(&path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .spawn()?;
        debug!("playing {} (pid {})", path.display(), child.id());
        self.playing.push(child);
        Ok(())
    }
}

impl Drop for ExternalPlayer {
    fn drop(&mut self) {
        for child in &mut self.playing {
            if let Err(e) = child.wait() {
                warn!("lost track of {} (pid {}): {}", self.player, child.id(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use buzzer_core::{Registry, QUIZ_BOARD};

    use super::*;

    #[test]
    fn cue_file_is_named_after_button() {
        let player = ExternalPlayer::new("aplay", "/srv/quiz/sounds");
        assert_eq!(player.cue_path(ButtonId(7)), PathBuf::from("/srv/quiz/sounds/button_7.wav"));
    }

    #[test]
    fn reports_missing_cues() {
        let dir = std::env::temp_dir().join(format!("quizbuzz-cues-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("button_0.wav"), b"RIFF").unwrap();

        let registry = Registry::new([QUIZ_BOARD[0], QUIZ_BOARD[1]]).unwrap();
        let player = ExternalPlayer::new("aplay", &dir);
        assert_eq!(player.check_cues(&registry), 1);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_player_is_an_error_not_a_panic() {
        let mut player = ExternalPlayer::new("/nonexistent/quizbuzz-player", "sounds");
        assert!(player.play(ButtonId(0)).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn play_does_not_wait_for_the_player() {
        let mut player = ExternalPlayer::new("true", "sounds");
        player.play(ButtonId(1)).unwrap();
        player.play(ButtonId(2)).unwrap();
        assert!(player.playing.len() <= 2);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn dropping_the_player_collects_running_cues() {
        let mut player = ExternalPlayer::new("sleep", "");
        player.play(ButtonId(0)).unwrap();
        let pid = player.playing[0].id();
        drop(player);
        // The child was waited for, so it no longer exists as a process.
        assert!(!std::path::Path::new(&format!("/proc/{pid}")).exists());
    }
}
