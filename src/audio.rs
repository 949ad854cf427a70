//! Audio cues
//!
//! The simulation raises [`GameEvent`]s; the host drains them after each
//! frame and hands them to an [`AudioManager`], which maps each to a
//! procedurally described [`Voice`] and forwards it to an [`AudioSink`].
//! Sinks are fire-and-forget: nothing here waits on playback.

use crate::sim::{GameEvent, WeaponKind};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Pistols and rifles
    Gunshot,
    /// Shotguns
    Blast,
    /// Laser weapons
    Zap,
    /// Flamethrower
    Whoosh,
    /// Grenade/missile/plasma launch
    Launch,
    /// Grenade, missile or plasma going off
    Explosion,
    /// Player took damage
    PlayerHurt,
    /// Enemy took damage
    EnemyHit,
    /// Enemy died
    EnemyDeath,
    Coin,
    Potion,
    /// New weapon equipped
    WeaponSwap,
    /// Tried to buy without enough coins
    Denied,
    /// Hit landed through an open boss channel
    BossHit,
    /// Shot bounced off a closed boss channel
    BossMiss,
    Portal,
    LevelStart,
    GameOver,
    Victory,
}

/// Oscillator waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
    Noise,
}

/// A synthesized tone: start/end frequency sweep, length and loudness
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub waveform: Waveform,
    pub start_hz: f32,
    pub end_hz: f32,
    pub duration: f32,
    /// Final gain after master/sfx volume
    pub gain: f32,
}

impl SoundEffect {
    /// Cue for a simulation event
    pub fn for_event(event: GameEvent) -> Self {
        match event {
            GameEvent::ShotFired(kind) => Self::for_weapon(kind),
            GameEvent::PlayerHit => Self::PlayerHurt,
            GameEvent::EnemyHit => Self::EnemyHit,
            GameEvent::EnemyKilled => Self::EnemyDeath,
            GameEvent::Explosion => Self::Explosion,
            GameEvent::CoinPickup => Self::Coin,
            GameEvent::PotionPickup => Self::Potion,
            GameEvent::WeaponPickup => Self::WeaponSwap,
            GameEvent::NotEnoughCoins => Self::Denied,
            GameEvent::BossHit => Self::BossHit,
            GameEvent::BossMiss => Self::BossMiss,
            GameEvent::PortalEnter => Self::Portal,
            GameEvent::LevelStarted(_) => Self::LevelStart,
            GameEvent::PlayerDeath => Self::GameOver,
            GameEvent::Victory => Self::Victory,
        }
    }

    fn for_weapon(kind: WeaponKind) -> Self {
        use WeaponKind::*;
        match kind {
            Pistol | AssaultRifle | SubMachineGun | MachineGun | SniperRifle => Self::Gunshot,
            Shotgun | LaserShotgun => Self::Blast,
            FlameThrower => Self::Whoosh,
            GrenadeLauncher | MissileLauncher | PlasmaCannon => Self::Launch,
            LaserPistol | LaserAssaultRifle | LaserMachineGun | LaserSniperRifle | LaserCannon
            | LightningStaff => Self::Zap,
        }
    }

    /// Unscaled tone for this effect
    fn base_voice(self) -> (Waveform, f32, f32, f32, f32) {
        use Waveform::*;
        // (waveform, start Hz, end Hz, seconds, base volume)
        match self {
            Self::Gunshot => (Noise, 900.0, 200.0, 0.08, 0.4),
            Self::Blast => (Noise, 600.0, 80.0, 0.2, 0.6),
            Self::Zap => (Sawtooth, 1400.0, 300.0, 0.12, 0.3),
            Self::Whoosh => (Noise, 300.0, 250.0, 0.05, 0.15),
            Self::Launch => (Square, 200.0, 500.0, 0.15, 0.35),
            Self::Explosion => (Noise, 150.0, 30.0, 0.5, 0.8),
            Self::PlayerHurt => (Square, 220.0, 110.0, 0.2, 0.5),
            Self::EnemyHit => (Triangle, 500.0, 350.0, 0.06, 0.3),
            Self::EnemyDeath => (Sawtooth, 400.0, 60.0, 0.35, 0.5),
            Self::Coin => (Sine, 988.0, 1319.0, 0.1, 0.35),
            Self::Potion => (Sine, 523.0, 1047.0, 0.3, 0.4),
            Self::WeaponSwap => (Triangle, 330.0, 660.0, 0.2, 0.4),
            Self::Denied => (Square, 150.0, 150.0, 0.25, 0.3),
            Self::BossHit => (Sawtooth, 120.0, 60.0, 0.3, 0.7),
            Self::BossMiss => (Triangle, 800.0, 700.0, 0.05, 0.2),
            Self::Portal => (Sine, 200.0, 1600.0, 0.8, 0.5),
            Self::LevelStart => (Triangle, 440.0, 880.0, 0.4, 0.4),
            Self::GameOver => (Sawtooth, 400.0, 50.0, 1.2, 0.6),
            Self::Victory => (Sine, 523.0, 2093.0, 1.5, 0.6),
        }
    }
}

/// Where voices end up
pub trait AudioSink {
    /// Start playing; must not block
    fn play(&mut self, effect: SoundEffect, voice: Voice);
}

/// Sink that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogAudioSink {
    pub played: u64,
}

impl AudioSink for LogAudioSink {
    fn play(&mut self, effect: SoundEffect, voice: Voice) {
        self.played += 1;
        log::debug!("audio: {effect:?} ({:.2}s, gain {:.2})", voice.duration, voice.gain);
    }
}

/// Audio manager for the game
pub struct AudioManager<S: AudioSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager<LogAudioSink> {
    fn default() -> Self {
        Self::new(LogAudioSink::default())
    }
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let (waveform, start_hz, end_hz, duration, base) = effect.base_voice();
        self.sink.play(
            effect,
            Voice {
                waveform,
                start_hz,
                end_hz,
                duration,
                gain: base * vol,
            },
        );
    }

    /// Play the cue for every event, in order
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for &event in events {
            self.play(SoundEffect::for_event(event));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<(SoundEffect, Voice)>);

    impl AudioSink for Recorder {
        fn play(&mut self, effect: SoundEffect, voice: Voice) {
            self.0.push((effect, voice));
        }
    }

    #[test]
    fn test_events_map_to_cues() {
        let mut audio = AudioManager::new(Recorder::default());
        audio.handle_events(&[
            GameEvent::ShotFired(WeaponKind::LaserCannon),
            GameEvent::ShotFired(WeaponKind::Shotgun),
            GameEvent::EnemyKilled,
            GameEvent::PortalEnter,
        ]);
        let effects: Vec<_> = audio.sink().0.iter().map(|(e, _)| *e).collect();
        assert_eq!(
            effects,
            vec![
                SoundEffect::Zap,
                SoundEffect::Blast,
                SoundEffect::EnemyDeath,
                SoundEffect::Portal
            ]
        );
    }

    #[test]
    fn test_volume_scales_gain() {
        let mut audio = AudioManager::new(Recorder::default());
        audio.set_master_volume(0.5);
        audio.set_sfx_volume(2.0);
        audio.play(SoundEffect::Explosion);
        let (_, voice) = audio.sink().0[0];
        assert!((voice.gain - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_mute_drops_everything() {
        let mut audio = AudioManager::new(Recorder::default());
        audio.set_muted(true);
        audio.handle_events(&[GameEvent::CoinPickup, GameEvent::PlayerDeath]);
        assert!(audio.sink().0.is_empty());
    }
}
