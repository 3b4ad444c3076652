//! Bridge between the simulation thread and the background audio thread.
//!
//! [`AudioBridge`] implements [`AudioSink`] by sending [`AudioCmd`] messages
//! over a crossbeam channel. The simulation never waits on the audio thread and
//! ignores send failures, so a missing or crashed mixer only means silence.
//!
//! Dropping the bridge asks the thread to shut down and joins it.

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::warn;

use crate::backend::AudioSink;

/// Commands sent *to* the audio thread.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCmd {
    LoadFx { id: String, path: String },
    PlayFx { id: String, volume: f32 },
    Shutdown,
}

pub struct AudioBridge {
    /// Sender for [`AudioCmd`] messages (simulation -> audio thread).
    tx_cmd: Sender<AudioCmd>,
    /// Join handle for the background audio thread, if one was spawned.
    handle: Option<std::thread::JoinHandle<()>>,
}

impl AudioBridge {
    /// Spawn `worker` on its own thread and connect it to a new bridge.
    pub fn spawn<F>(worker: F) -> Self
    where
        F: FnOnce(Receiver<AudioCmd>) + Send + 'static,
    {
        let (tx_cmd, rx_cmd) = unbounded::<AudioCmd>();
        let handle = std::thread::spawn(move || worker(rx_cmd));
        Self {
            tx_cmd,
            handle: Some(handle),
        }
    }

    /// Bridge without a thread; the caller owns the receiving end.
    pub fn detached() -> (Self, Receiver<AudioCmd>) {
        let (tx_cmd, rx_cmd) = unbounded::<AudioCmd>();
        (
            Self {
                tx_cmd,
                handle: None,
            },
            rx_cmd,
        )
    }

    fn send(&self, cmd: AudioCmd) {
        // Ignore send error once the audio thread is gone
        let _ = self.tx_cmd.send(cmd);
    }
}

impl AudioSink for AudioBridge {
    fn play(&self, track: &str, volume: f32) {
        self.send(AudioCmd::PlayFx {
            id: track.to_string(),
            volume,
        });
    }

    fn load(&self, track: &str, path: &str) {
        self.send(AudioCmd::LoadFx {
            id: track.to_string(),
            path: path.to_string(),
        });
    }
}

impl Drop for AudioBridge {
    fn drop(&mut self) {
        self.send(AudioCmd::Shutdown);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("[audio] thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_and_load_become_commands() {
        let (bridge, rx) = AudioBridge::detached();
        bridge.load("blip", "assets/blip.wav");
        bridge.play("blip", 0.5);
        let cmds: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            cmds,
            vec![
                AudioCmd::LoadFx {
                    id: "blip".into(),
                    path: "assets/blip.wav".into()
                },
                AudioCmd::PlayFx {
                    id: "blip".into(),
                    volume: 0.5
                },
            ]
        );
    }

    #[test]
    fn play_without_receiver_is_silent() {
        let (bridge, rx) = AudioBridge::detached();
        drop(rx);
        bridge.play("blip", 1.0);
    }

    #[test]
    fn drop_shuts_down_spawned_thread() {
        let (tx_seen, rx_seen) = unbounded::<AudioCmd>();
        let bridge = AudioBridge::spawn(move |rx| {
            for cmd in rx.iter() {
                let stop = cmd == AudioCmd::Shutdown;
                let _ = tx_seen.send(cmd);
                if stop {
                    break;
                }
            }
        });
        bridge.play("blip", 1.0);
        drop(bridge);
        let seen: Vec<_> = rx_seen.try_iter().collect();
        assert_eq!(seen.last(), Some(&AudioCmd::Shutdown));
        assert_eq!(seen.len(), 2);
    }
}
