//! Audio routing
//!
//! The simulation only emits [`GameEvent`]s. This module turns them into calls
//! on an [`AudioSink`]. Sinks are best effort: a missing or broken audio
//! backend must never affect gameplay, so nothing here returns an error.

use crate::sim::state::GameEvent;

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

/// One-shot sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Actor jumped
    Flap,
    /// Cleared an obstacle pair
    Score,
    /// Hit something or fell out, run over
    Failure,
}

/// Anything that can make the game's noises
pub trait AudioSink {
    /// Begin the looping background track (no-op if already running)
    fn start_ambient(&mut self);
    /// Stop the looping background track
    fn stop_ambient(&mut self);
    /// Fire a one-shot cue
    fn play(&mut self, cue: SoundCue);
}

/// Forward a batch of game events to `sink`, in order
pub fn route_events(events: &[GameEvent], sink: &mut dyn AudioSink) {
    for event in events {
        match event {
            GameEvent::AmbientStart => sink.start_ambient(),
            GameEvent::AmbientStop => sink.stop_ambient(),
            GameEvent::Failure { .. } => sink.play(SoundCue::Failure),
            GameEvent::Flap => sink.play(SoundCue::Flap),
            GameEvent::Scored { .. } => sink.play(SoundCue::Score),
            GameEvent::Spawned { .. } | GameEvent::Reset => {}
        }
    }
}

/// Sink for headless runs and platforms without audio
#[derive(Debug, Default)]
pub struct SilentAudio {
    ambient: bool,
}

impl SilentAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ambient_playing(&self) -> bool {
        self.ambient
    }
}

impl AudioSink for SilentAudio {
    fn start_ambient(&mut self) {
        if !self.ambient {
            log::debug!("(silent) ambient loop started");
            self.ambient = true;
        }
    }

    fn stop_ambient(&mut self) {
        if self.ambient {
            log::debug!("(silent) ambient loop stopped");
            self.ambient = false;
        }
    }

    fn play(&mut self, cue: SoundCue) {
        log::trace!("(silent) cue {:?}", cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::FailureCause;

    #[derive(Debug, PartialEq)]
    enum Call {
        Start,
        Stop,
        Play(SoundCue),
    }

    #[derive(Default)]
    struct Recorder(Vec<Call>);

    impl AudioSink for Recorder {
        fn start_ambient(&mut self) {
            self.0.push(Call::Start);
        }
        fn stop_ambient(&mut self) {
            self.0.push(Call::Stop);
        }
        fn play(&mut self, cue: SoundCue) {
            self.0.push(Call::Play(cue));
        }
    }

    #[test]
    fn test_route_game_over() {
        let mut rec = Recorder::default();
        route_events(
            &[
                GameEvent::Flap,
                GameEvent::Scored { score: 1 },
                GameEvent::AmbientStop,
                GameEvent::Failure {
                    cause: FailureCause::Collision,
                },
            ],
            &mut rec,
        );
        assert_eq!(
            rec.0,
            vec![
                Call::Play(SoundCue::Flap),
                Call::Play(SoundCue::Score),
                Call::Stop,
                Call::Play(SoundCue::Failure),
            ]
        );
    }

    #[test]
    fn test_route_reset() {
        let mut rec = Recorder::default();
        route_events(
            &[
                GameEvent::Reset,
                GameEvent::AmbientStart,
                GameEvent::Spawned { gap_center: 300 },
            ],
            &mut rec,
        );
        assert_eq!(rec.0, vec![Call::Start]);
    }

    #[test]
    fn test_silent_tracks_ambient() {
        let mut sink = SilentAudio::new();
        sink.start_ambient();
        assert!(sink.ambient_playing());
        sink.play(SoundCue::Failure);
        sink.stop_ambient();
        assert!(!sink.ambient_playing());
    }
}
