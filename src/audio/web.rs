//! Audio backend using the Web Audio API
//!
//! Procedurally generated sounds - no external files needed!

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use super::{AudioSink, SoundCue};
use crate::settings::Settings;

/// Background drone voices: (frequency, waveform, relative level)
const AMBIENT_VOICES: [(f32, OscillatorType, f32); 2] = [
    (110.0, OscillatorType::Sine, 1.0),
    (164.8, OscillatorType::Triangle, 0.4),
];

/// Web Audio sink for the browser build
pub struct WebAudio {
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    /// Running drone oscillators, if the ambient loop is on
    ambient: Vec<(OscillatorNode, GainNode)>,
}

impl Default for WebAudio {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl WebAudio {
    pub fn new(settings: &Settings) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        let mut audio = Self {
            ctx,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.5,
            muted: false,
            ambient: Vec::new(),
        };
        audio.apply_settings(settings);
        audio
    }

    /// Pick up volume/mute changes
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.master_volume = settings.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = settings.music_volume.clamp(0.0, 1.0);
        self.muted = settings.muted;
        if self.muted {
            self.stop_ambient();
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    fn sfx_level(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    fn music_level(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    /// Context ready to play, resumed if the browser suspended it
    fn live_ctx(&self) -> Option<&AudioContext> {
        let ctx = self.ctx.as_ref()?;
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        Some(ctx)
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Flap - short whoosh up
    fn play_flap(ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = Self::create_osc(ctx, 220.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.25, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(220.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(520.0, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Score - two-note ding
    fn play_score(ctx: &AudioContext, vol: f32) {
        for (i, freq) in [880.0, 1320.0].iter().enumerate() {
            let delay = i as f64 * 0.07;
            if let Some((osc, gain)) = Self::create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.22, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.2).ok();
            }
        }
    }

    /// Failure - impact thud, then a sad descent
    fn play_failure(ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        if let Some((osc, gain)) = Self::create_osc(ctx, 150.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.45, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                .ok();
            osc.frequency().set_value_at_time(150.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(40.0, t + 0.25)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.3).ok();
        }

        for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
            let delay = 0.15 + i as f64 * 0.2;
            if let Some((osc, gain)) = Self::create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.4).ok();
            }
        }
    }
}

impl AudioSink for WebAudio {
    fn start_ambient(&mut self) {
        if !self.ambient.is_empty() {
            return;
        }
        let level = self.music_level();
        if level <= 0.0 {
            return;
        }
        let Some(ctx) = self.live_ctx() else { return };

        let t = ctx.current_time();
        let mut voices = Vec::with_capacity(AMBIENT_VOICES.len());
        for (freq, osc_type, rel) in AMBIENT_VOICES {
            if let Some((osc, gain)) = Self::create_osc(ctx, freq, osc_type) {
                // Fade in so the loop does not click
                gain.gain().set_value_at_time(0.0001, t).ok();
                gain.gain()
                    .linear_ramp_to_value_at_time(level * 0.12 * rel, t + 0.8)
                    .ok();
                osc.start().ok();
                voices.push((osc, gain));
            }
        }
        log::debug!("Ambient loop started ({} voices)", voices.len());
        self.ambient = voices;
    }

    fn stop_ambient(&mut self) {
        if self.ambient.is_empty() {
            return;
        }
        let now = self.ctx.as_ref().map(|c| c.current_time()).unwrap_or(0.0);
        for (osc, gain) in self.ambient.drain(..) {
            gain.gain()
                .exponential_ramp_to_value_at_time(0.0001, now + 0.1)
                .ok();
            osc.stop_with_when(now + 0.12).ok();
        }
        log::debug!("Ambient loop stopped");
    }

    fn play(&mut self, cue: SoundCue) {
        let vol = self.sfx_level();
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = self.live_ctx() else { return };

        match cue {
            SoundCue::Flap => Self::play_flap(ctx, vol),
            SoundCue::Score => Self::play_score(ctx, vol),
            SoundCue::Failure => Self::play_failure(ctx, vol),
        }
    }
}
