//! Media keys backed by external commands.

use std::future::Future;
use std::io::ErrorKind;
use std::process::Stdio;

use serde::{Deserialize, Serialize};
use tokio::process::Command;

use hestia_app::ports::MediaKeys;
use hestia_domain::command::Outcome;
use hestia_domain::error::HestiaError;

use crate::error::MediaError;

/// Placeholder replaced by the volume percentage in [`MediaCommands::volume`].
pub const PERCENT_PLACEHOLDER: &str = "{percent}";

/// Placeholder replaced by the volume on Windows' `0..=65535` mixer scale.
pub const SYSVOLUME_PLACEHOLDER: &str = "{sysvolume}";

const PLAY_PAUSE_KEY_SCRIPT: &str = "Add-Type -AssemblyName System.Windows.Forms; \
[System.Windows.Forms.SendKeys]::SendWait('{MEDIA_PLAY_PAUSE}')";

/// Command lines for each key, program first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaCommands {
    pub play_pause: Vec<String>,
    /// May contain [`PERCENT_PLACEHOLDER`] or [`SYSVOLUME_PLACEHOLDER`].
    pub volume: Vec<String>,
}

impl MediaCommands {
    /// `playerctl` for playback and ALSA's `amixer` for the master volume.
    #[must_use]
    pub fn linux() -> Self {
        Self {
            play_pause: vec!["playerctl".to_string(), "play-pause".to_string()],
            volume: ["amixer", "set", "Master", "{percent}%"]
                .map(String::from)
                .to_vec(),
        }
    }

    /// PowerShell's `SendKeys` for the play/pause key and NirSoft's
    /// `nircmd` for the system volume.
    #[must_use]
    pub fn windows() -> Self {
        Self {
            play_pause: vec![
                "powershell".to_string(),
                "-Command".to_string(),
                PLAY_PAUSE_KEY_SCRIPT.to_string(),
            ],
            volume: ["nircmd.exe", "setsysvolume", SYSVOLUME_PLACEHOLDER]
                .map(String::from)
                .to_vec(),
        }
    }

    /// Commands for the platform the crate was built for, if any.
    #[must_use]
    pub fn native() -> Option<Self> {
        if cfg!(target_os = "linux") {
            Some(Self::linux())
        } else if cfg!(target_os = "windows") {
            Some(Self::windows())
        } else {
            None
        }
    }

    fn volume_for(&self, percent: u8) -> Vec<String> {
        let sysvolume = u32::from(percent) * 65_535 / 100;
        self.volume
            .iter()
            .map(|arg| {
                arg.replace(PERCENT_PLACEHOLDER, &percent.to_string())
                    .replace(SYSVOLUME_PLACEHOLDER, &sysvolume.to_string())
            })
            .collect()
    }
}

/// Media keys of the machine the daemon runs on.
#[derive(Debug, Clone)]
pub struct HostMediaKeys {
    commands: Option<MediaCommands>,
}

impl HostMediaKeys {
    #[must_use]
    pub fn new(commands: MediaCommands) -> Self {
        Self {
            commands: Some(commands),
        }
    }

    /// Known commands for the current platform; elsewhere every press is an
    /// unconfirmed attempt.
    #[must_use]
    pub fn for_host() -> Self {
        Self {
            commands: MediaCommands::native(),
        }
    }

    async fn run(&self, argv: Option<Vec<String>>) -> Result<Outcome, MediaError> {
        let Some(argv) = argv else {
            tracing::debug!("no media command for this platform");
            return Ok(Outcome::Attempted);
        };
        let (program, args) = argv.split_first().ok_or(MediaError::EmptyCommand)?;

        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match status {
            Ok(status) if status.success() => Ok(Outcome::Confirmed),
            Ok(status) => Err(MediaError::Failed {
                program: program.clone(),
                status: status.to_string(),
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::warn!(program = %program, "media program not installed");
                Ok(Outcome::Attempted)
            }
            Err(source) => Err(MediaError::Spawn {
                program: program.clone(),
                source,
            }),
        }
    }
}

impl MediaKeys for HostMediaKeys {
    fn toggle_play_pause(&self) -> impl Future<Output = Result<Outcome, HestiaError>> + Send {
        let argv = self.commands.as_ref().map(|c| c.play_pause.clone());
        async move { Ok(self.run(argv).await?) }
    }

    fn set_volume(&self, percent: u8) -> impl Future<Output = Result<Outcome, HestiaError>> + Send {
        let argv = self.commands.as_ref().map(|c| c.volume_for(percent));
        async move { Ok(self.run(argv).await?) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(play_pause: &[&str], volume: &[&str]) -> HostMediaKeys {
        HostMediaKeys::new(MediaCommands {
            play_pause: play_pause.iter().map(ToString::to_string).collect(),
            volume: volume.iter().map(ToString::to_string).collect(),
        })
    }

    #[test]
    fn should_substitute_volume_percent() {
        assert_eq!(
            MediaCommands::linux().volume_for(35),
            ["amixer", "set", "Master", "35%"]
        );
    }

    #[test]
    fn should_scale_volume_for_windows_mixer() {
        let commands = MediaCommands::windows();
        assert_eq!(
            commands.volume_for(50),
            ["nircmd.exe", "setsysvolume", "32767"]
        );
        assert_eq!(commands.volume_for(100)[2], "65535");
        assert_eq!(commands.volume_for(0)[2], "0");
    }

    #[test]
    fn should_send_play_pause_key_through_powershell() {
        let commands = MediaCommands::windows();
        assert_eq!(commands.play_pause[0], "powershell");
        assert!(commands.play_pause[2].contains("{MEDIA_PLAY_PAUSE}"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn should_pick_linux_commands_on_linux() {
        assert_eq!(MediaCommands::native(), Some(MediaCommands::linux()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn should_confirm_when_command_succeeds() {
        let keys = keys(&["true"], &["true"]);
        assert_eq!(keys.toggle_play_pause().await.unwrap(), Outcome::Confirmed);
        assert_eq!(keys.set_volume(10).await.unwrap(), Outcome::Confirmed);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn should_fail_when_command_exits_non_zero() {
        let keys = keys(&["false"], &["false"]);
        let result = keys.toggle_play_pause().await;
        assert!(matches!(
            result,
            Err(HestiaError::PlatformAdapter { adapter: "media", .. })
        ));
    }

    #[tokio::test]
    async fn should_attempt_when_program_missing() {
        let keys = keys(&["hestia-no-such-player"], &["hestia-no-such-mixer"]);
        assert_eq!(keys.set_volume(50).await.unwrap(), Outcome::Attempted);
    }

    #[tokio::test]
    async fn should_reject_empty_command() {
        let keys = keys(&[], &[]);
        assert!(keys.toggle_play_pause().await.is_err());
    }

    #[tokio::test]
    async fn should_attempt_without_known_commands() {
        let keys = HostMediaKeys { commands: None };
        assert_eq!(keys.toggle_play_pause().await.unwrap(), Outcome::Attempted);
    }
}
