// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The audio boundary.
//!
//! Decoded PCM crosses into a platform [`AudioBackend`] which owns mixing
//! and output. The core keeps the bookkeeping: [`SoundPlayer`] maps
//! resource keys to backend sounds, tracks per-sound end callbacks, and
//! polls the backend for playback completions each frame.

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::vec::Vec;

use thiserror::Error;

use crate::resource::ResourceKey;
use crate::time::Repeat;

/// Handle to a sound loaded into an [`AudioBackend`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SoundId(pub u32);

/// Borrowed decoded audio, ready for the backend.
#[derive(Clone, Copy, Debug)]
pub struct PcmData<'a> {
    /// Interleaved little-endian signed 16-bit samples.
    pub data: &'a [u8],
    /// Samples per second per channel.
    pub sample_rate: u32,
    /// Channel count (1 mono, 2 stereo).
    pub channels: u16,
}

/// A failed audio operation. Recoverable: callers log and continue.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AudioError {
    /// No output device is available.
    #[error("no audio output device")]
    NoDevice,
    /// An operation referenced a sound the backend does not know.
    #[error("unknown sound {0:?}")]
    UnknownSound(SoundId),
    /// The PCM parameters are not playable on this backend.
    #[error("unsupported format: {sample_rate} Hz, {channels} channels")]
    UnsupportedFormat {
        /// The rejected sample rate.
        sample_rate: u32,
        /// The rejected channel count.
        channels: u16,
    },
}

/// Platform audio interface.
pub trait AudioBackend {
    /// Uploads decoded PCM, returning a handle for playback control.
    fn load(&mut self, pcm: PcmData<'_>) -> Result<SoundId, AudioError>;

    /// Releases a sound and stops any playback of it.
    fn unload(&mut self, id: SoundId);

    /// Starts playback from the beginning.
    fn play(&mut self, id: SoundId, repeat: Repeat) -> Result<(), AudioError>;

    /// Pauses playback, keeping the position.
    fn pause(&mut self, id: SoundId);

    /// Resumes paused playback.
    fn resume(&mut self, id: SoundId);

    /// Stops playback and resets the position.
    fn stop(&mut self, id: SoundId);

    /// Sets per-sound volume, `0..=1`.
    fn set_volume(&mut self, id: SoundId, volume: f64);

    /// Drains the sounds whose playback finished since the last call.
    ///
    /// Backends without completion tracking may leave the default, in
    /// which case end callbacks never fire.
    fn take_finished(&mut self) -> Vec<SoundId> {
        Vec::new()
    }
}

/// Fires when a sound finishes playing (not when stopped).
pub type SoundEndCallback = Rc<dyn Fn(SoundId)>;

struct SoundEntry {
    id: SoundId,
    on_end: Option<SoundEndCallback>,
}

/// Bookkeeping layer over an [`AudioBackend`].
///
/// Sounds are registered under their [`ResourceKey`] so gameplay code can
/// address them by asset rather than backend handle.
#[derive(Default)]
pub struct SoundPlayer {
    sounds: BTreeMap<ResourceKey, SoundEntry>,
    volume: f64,
}

impl SoundPlayer {
    /// An empty player at full volume.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sounds: BTreeMap::new(),
            volume: 1.0,
        }
    }

    /// Registers a loaded sound under its resource key.
    pub fn register(&mut self, key: ResourceKey, id: SoundId) {
        self.sounds.insert(key, SoundEntry { id, on_end: None });
    }

    /// Sets the callback fired when the sound finishes playing.
    pub fn on_end(&mut self, key: ResourceKey, callback: SoundEndCallback) {
        if let Some(entry) = self.sounds.get_mut(&key) {
            entry.on_end = Some(callback);
        }
    }

    /// The backend handle registered under `key`.
    #[must_use]
    pub fn sound(&self, key: ResourceKey) -> Option<SoundId> {
        self.sounds.get(&key).map(|entry| entry.id)
    }

    /// Plays a registered sound. Unregistered keys are logged and skipped.
    pub fn play(
        &mut self,
        backend: &mut impl AudioBackend,
        key: ResourceKey,
        repeat: Repeat,
    ) {
        let Some(entry) = self.sounds.get(&key) else {
            log::warn!("play of unregistered sound {key:?}");
            return;
        };
        if let Err(error) = backend.play(entry.id, repeat) {
            log::error!("sound playback failed: {error}");
        }
    }

    /// Stops a registered sound.
    pub fn stop(&mut self, backend: &mut impl AudioBackend, key: ResourceKey) {
        if let Some(entry) = self.sounds.get(&key) {
            backend.stop(entry.id);
        }
    }

    /// Master volume, `0..=1`. Applied to every registered sound.
    pub fn set_volume(
        &mut self,
        backend: &mut impl AudioBackend,
        volume: f64,
    ) {
        self.volume = volume.clamp(0.0, 1.0);
        for entry in self.sounds.values() {
            backend.set_volume(entry.id, self.volume);
        }
    }

    /// The current master volume.
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Unloads a sound from the backend and forgets it.
    pub fn unregister(
        &mut self,
        backend: &mut impl AudioBackend,
        key: ResourceKey,
    ) {
        if let Some(entry) = self.sounds.remove(&key) {
            backend.unload(entry.id);
        }
    }

    /// Drains backend completions and fires the matching end callbacks.
    pub fn poll_finished(&mut self, backend: &mut impl AudioBackend) {
        let finished = backend.take_finished();
        if finished.is_empty() {
            return;
        }
        for id in finished {
            let callback = self
                .sounds
                .values()
                .find(|entry| entry.id == id)
                .and_then(|entry| entry.on_end.clone());
            if let Some(callback) = callback {
                callback(id);
            }
        }
    }

    /// Number of registered sounds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    /// Whether no sounds are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }
}

impl core::fmt::Debug for SoundPlayer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SoundPlayer")
            .field("sounds", &self.sounds.len())
            .field("volume", &self.volume)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;

    #[derive(Default)]
    struct FakeBackend {
        next: u32,
        playing: Vec<SoundId>,
        finished: Vec<SoundId>,
        volumes: BTreeMap<u32, f64>,
    }

    impl AudioBackend for FakeBackend {
        fn load(&mut self, _pcm: PcmData<'_>) -> Result<SoundId, AudioError> {
            self.next += 1;
            Ok(SoundId(self.next))
        }

        fn unload(&mut self, id: SoundId) {
            self.playing.retain(|&p| p != id);
        }

        fn play(
            &mut self,
            id: SoundId,
            _repeat: Repeat,
        ) -> Result<(), AudioError> {
            if id.0 == 0 || id.0 > self.next {
                return Err(AudioError::UnknownSound(id));
            }
            self.playing.push(id);
            Ok(())
        }

        fn pause(&mut self, _id: SoundId) {}
        fn resume(&mut self, _id: SoundId) {}

        fn stop(&mut self, id: SoundId) {
            self.playing.retain(|&p| p != id);
        }

        fn set_volume(&mut self, id: SoundId, volume: f64) {
            self.volumes.insert(id.0, volume);
        }

        fn take_finished(&mut self) -> Vec<SoundId> {
            core::mem::take(&mut self.finished)
        }
    }

    fn loaded(backend: &mut FakeBackend) -> SoundId {
        let pcm = PcmData {
            data: &[0, 0, 0, 0],
            sample_rate: 44_100,
            channels: 2,
        };
        backend.load(pcm).unwrap()
    }

    #[test]
    fn plays_registered_sounds_by_key() {
        let mut backend = FakeBackend::default();
        let mut player = SoundPlayer::new();
        let key = ResourceKey::from_path("audio/jump.wav");
        let id = loaded(&mut backend);
        player.register(key, id);

        player.play(&mut backend, key, Repeat::ONCE);
        assert_eq!(backend.playing, [id]);

        player.stop(&mut backend, key);
        assert!(backend.playing.is_empty());
    }

    #[test]
    fn unregistered_keys_are_skipped() {
        let mut backend = FakeBackend::default();
        let mut player = SoundPlayer::new();
        player.play(
            &mut backend,
            ResourceKey::from_path("nope"),
            Repeat::ONCE,
        );
        assert!(backend.playing.is_empty());
    }

    #[test]
    fn master_volume_is_clamped_and_applied() {
        let mut backend = FakeBackend::default();
        let mut player = SoundPlayer::new();
        let key = ResourceKey::from_path("a");
        let id = loaded(&mut backend);
        player.register(key, id);

        player.set_volume(&mut backend, 1.5);
        assert_eq!(player.volume(), 1.0);
        assert_eq!(backend.volumes[&id.0], 1.0);
    }

    #[test]
    fn end_callbacks_fire_on_poll() {
        let mut backend = FakeBackend::default();
        let mut player = SoundPlayer::new();
        let key = ResourceKey::from_path("a");
        let id = loaded(&mut backend);
        player.register(key, id);

        let ended = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&ended);
        player.on_end(key, Rc::new(move |done| sink.borrow_mut().push(done)));

        player.poll_finished(&mut backend);
        assert!(ended.borrow().is_empty());

        backend.finished.push(id);
        player.poll_finished(&mut backend);
        assert_eq!(*ended.borrow(), [id]);
    }

    #[test]
    fn unregister_unloads_from_the_backend() {
        let mut backend = FakeBackend::default();
        let mut player = SoundPlayer::new();
        let key = ResourceKey::from_path("a");
        let id = loaded(&mut backend);
        player.register(key, id);
        player.play(&mut backend, key, Repeat::Forever);

        player.unregister(&mut backend, key);
        assert!(backend.playing.is_empty());
        assert!(player.is_empty());
    }
}
