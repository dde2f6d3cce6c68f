//! Sound effects
//!
//! The simulation never plays audio itself. The game maps domain events to
//! [`SoundEffect`]s and hands them to an [`AudioSink`] through an
//! [`AudioGate`] that honours the player's sound setting. In the browser the
//! sink is [`WebAudio`], which synthesizes each effect with Web Audio
//! oscillators, so no sound files are shipped.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball hits paddle
    PaddleHit,
    /// Ball hits a block (damaged or destroyed)
    BlockBreak,
}

impl SoundEffect {
    /// Effect triggered by a simulation event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::PaddleHit => Some(SoundEffect::PaddleHit),
            GameEvent::BlockDamaged { .. } | GameEvent::BlockDestroyed { .. } => {
                Some(SoundEffect::BlockBreak)
            }
            _ => None,
        }
    }
}

/// Fire-and-forget sound output
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Sink that discards everything (headless runs, no audio device)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect) {}
}

/// Sound-enabled switch in front of a sink
pub struct AudioGate {
    sink: Box<dyn AudioSink>,
    enabled: bool,
}

impl AudioGate {
    pub fn new(sink: Box<dyn AudioSink>, enabled: bool) -> Self {
        Self { sink, enabled }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn play(&mut self, effect: SoundEffect) {
        if self.enabled {
            self.sink.play(effect);
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, SoundEffect};

    /// Master volume of every effect
    const VOLUME: f32 = 0.8;

    /// Web Audio sink
    pub struct WebAudio {
        ctx: Option<AudioContext>,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx }
        }

        /// Oscillator routed through a gain node to the speakers
        fn voice(
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

        /// Short square blip sliding up
        fn paddle_hit(ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = Self::voice(ctx, 220.0, OscillatorType::Square) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(440.0, t + 0.08)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.12).ok();
        }

        /// Bright falling chirp
        fn block_break(ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = Self::voice(ctx, 880.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.25, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(330.0, t + 0.15)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.18).ok();
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, effect: SoundEffect) {
            let Some(ctx) = &self.ctx else { return };
            // Browsers keep the context suspended until a user gesture
            if ctx.state() == AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::PaddleHit => Self::paddle_hit(ctx, VOLUME),
                SoundEffect::BlockBreak => Self::block_break(ctx, VOLUME),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder(Rc<RefCell<Vec<SoundEffect>>>);

    impl AudioSink for Recorder {
        fn play(&mut self, effect: SoundEffect) {
            self.0.borrow_mut().push(effect);
        }
    }

    #[test]
    fn test_event_mapping() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::PaddleHit),
            Some(SoundEffect::PaddleHit)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::BlockDestroyed { block_id: 3 }),
            Some(SoundEffect::BlockBreak)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::BlockDamaged { block_id: 3 }),
            Some(SoundEffect::BlockBreak)
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::Win), None);
    }

    #[test]
    fn test_gate_blocks_when_disabled() {
        let played = Rc::new(RefCell::new(Vec::new()));
        let mut gate = AudioGate::new(Box::new(Recorder(played.clone())), false);
        gate.play(SoundEffect::PaddleHit);
        assert!(played.borrow().is_empty());

        gate.set_enabled(true);
        gate.play(SoundEffect::BlockBreak);
        assert_eq!(*played.borrow(), vec![SoundEffect::BlockBreak]);
    }
}
