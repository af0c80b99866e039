//! Sound cues using the Web Audio API
//!
//! Procedurally generated tones - no external files needed! Recipes are plain
//! data so they can be inspected off the browser; `AudioManager` plays them.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Marker arrived and the previous level is done
    LevelComplete,
    /// Next level became available
    LevelUnlock,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
}

/// A single enveloped oscillator note
///
/// Gain ramps linearly from 0 to `peak_gain` over the attack, then decays
/// exponentially to near silence at `duration`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    /// Start time relative to the cue (seconds)
    pub offset: f64,
    /// Note length (seconds)
    pub duration: f64,
    pub start_freq: f32,
    /// Frequency reached at `sweep_time`, if the note glides
    pub end_freq: Option<f32>,
    pub sweep_time: f64,
    pub peak_gain: f32,
}

/// Linear attack before the decay starts (seconds)
pub const ATTACK: f64 = 0.01;
/// Gain floor for the exponential decay
pub const DECAY_FLOOR: f32 = 0.001;

/// C5, E5, G5
const SUCCESS_NOTES: [f32; 3] = [523.25, 659.25, 783.99];

impl SoundEffect {
    /// The tones making up this cue
    pub fn recipe(&self) -> Vec<Tone> {
        match self {
            // Ascending major arpeggio, 100 ms apart
            SoundEffect::LevelComplete => SUCCESS_NOTES
                .iter()
                .enumerate()
                .map(|(i, &freq)| Tone {
                    waveform: Waveform::Sine,
                    offset: i as f64 * 0.1,
                    duration: 0.3,
                    start_freq: freq,
                    end_freq: None,
                    sweep_time: 0.0,
                    peak_gain: 0.1,
                })
                .collect(),
            // Octave glide A4 -> A5
            SoundEffect::LevelUnlock => vec![Tone {
                waveform: Waveform::Triangle,
                offset: 0.0,
                duration: 0.4,
                start_freq: 440.0,
                end_freq: Some(880.0),
                sweep_time: 0.2,
                peak_gain: 0.05,
            }],
        }
    }

    /// Total length of the cue (seconds)
    pub fn length(&self) -> f64 {
        self.recipe()
            .iter()
            .map(|t| t.offset + t.duration)
            .fold(0.0, f64::max)
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{ATTACK, DECAY_FLOOR, SoundEffect, Tone, Waveform};

    /// Audio manager for the map
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        /// Cue volume (0.0 - 1.0), 0 when muted
        volume: f32,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: 0.8,
            }
        }

        /// Set the cue volume, usually `Settings::effective_volume`
        pub fn set_volume(&mut self, vol: f32) {
            self.volume = vol.clamp(0.0, 1.0);
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.volume;
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            for tone in effect.recipe() {
                self.play_tone(ctx, &tone, vol);
            }
        }

        /// Create an oscillator routed through a gain node
        fn create_osc(
            &self,
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

        fn play_tone(&self, ctx: &AudioContext, tone: &Tone, vol: f32) {
            let osc_type = match tone.waveform {
                Waveform::Sine => OscillatorType::Sine,
                Waveform::Triangle => OscillatorType::Triangle,
            };
            let Some((osc, gain)) = self.create_osc(ctx, tone.start_freq, osc_type) else {
                return;
            };
            let t = ctx.current_time() + tone.offset;

            gain.gain().set_value_at_time(0.0, t).ok();
            gain.gain()
                .linear_ramp_to_value_at_time(tone.peak_gain * vol, t + ATTACK)
                .ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(DECAY_FLOOR, t + tone.duration)
                .ok();

            osc.frequency().set_value_at_time(tone.start_freq, t).ok();
            if let Some(end) = tone.end_freq {
                osc.frequency()
                    .exponential_ramp_to_value_at_time(end, t + tone.sweep_time)
                    .ok();
            }

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + tone.duration).ok();
        }
    }
}
