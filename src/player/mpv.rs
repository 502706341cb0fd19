use std::process::{Child, Command, Stdio};

use tracing::{debug, info, warn};

use crate::api::{StreamKind, StreamSource};
use crate::error::{Error, Result};

pub struct MpvPlayer {
    args: Vec<String>,
    child: Option<Child>,
}

impl MpvPlayer {
    pub fn new(args: Vec<String>) -> Self {
        Self { args, child: None }
    }

    /// Full argument list for one stream: configured args, title, then the URL.
    pub fn build_args(&self, stream: &StreamSource, title: &str) -> Vec<String> {
        let mut args = self.args.clone();

        if !title.is_empty() {
            args.push(format!("--force-media-title={}", title));
        }

        // Embed pages only play if mpv's ytdl hook can resolve them
        if stream.kind == StreamKind::Embed {
            args.push("--script-opts=ytdl_hook-try_ytdl_first=yes".to_string());
        }

        args.push(stream.url.clone());
        args
    }

    /// Launch mpv on a stream, replacing any instance this player started earlier.
    pub fn play(&mut self, stream: &StreamSource, title: &str) -> Result<()> {
        self.stop();

        let mut cmd = Command::new("mpv");

        // Keep mpv output out of the TUI
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::null());
        cmd.args(self.build_args(stream, title));

        debug!(url = %stream.url, kind = stream.kind.as_display(), "Launching mpv");

        let child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::PlayerNotFound("mpv".to_string())
            } else {
                Error::PlayerLaunch(e.to_string())
            }
        })?;

        info!(pid = child.id(), title, "Playback started");
        self.child = Some(child);
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill() {
                warn!(error = %e, "Failed to stop mpv");
            }
            let _ = child.wait();
        }
    }

    /// Check if mpv is still running
    pub fn is_running(&mut self) -> bool {
        if let Some(ref mut child) = self.child {
            match child.try_wait() {
                Ok(Some(_)) => {
                    self.child = None;
                    false
                }
                Ok(None) => true,
                Err(_) => false,
            }
        } else {
            false
        }
    }
}

impl Default for MpvPlayer {
    fn default() -> Self {
        Self::new(vec!["--fullscreen".to_string()])
    }
}
