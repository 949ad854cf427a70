//! Chests and portals: interaction targets anchored to platforms

use serde::{Deserialize, Serialize};

use super::pickup::Potion;
use super::platform::{Platform, PlatformId};
use super::rect::Rect;
use super::weapon::WeaponKind;
use crate::consts::{CHEST_OPEN_TICKS, CHEST_SIZE, PORTAL_SIZE, TICKS_PER_FRAME};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChestContents {
    /// Free weapon swap
    Weapon(WeaponKind),
    /// Potion behind a coin cost
    Upgrade(Potion),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChestState {
    Closed,
    Opening,
    Collected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chest {
    pub id: u32,
    pub host: PlatformId,
    pub contents: ChestContents,
    pub state: ChestState,
    /// Ticks of opening animation played
    pub opening_progress: u32,
}

impl Chest {
    pub fn new(id: u32, host: PlatformId, contents: ChestContents) -> Self {
        Self {
            id,
            host,
            contents,
            state: ChestState::Closed,
            opening_progress: 0,
        }
    }

    /// Sits centered on the host's surface
    pub fn hitbox(&self, host: &Platform) -> Rect {
        Rect::new(
            host.center_x() - CHEST_SIZE / 2.0,
            host.pos.y - 43.0,
            CHEST_SIZE,
            CHEST_SIZE,
        )
    }

    /// Closed -> Opening. No-op in any other state.
    pub fn begin_opening(&mut self) -> bool {
        if self.state != ChestState::Closed {
            return false;
        }
        self.state = ChestState::Opening;
        true
    }

    /// Advance the opening animation. Returns true on the tick it completes.
    pub fn advance(&mut self) -> bool {
        if self.state != ChestState::Opening || self.opening_progress >= CHEST_OPEN_TICKS {
            return false;
        }
        self.opening_progress += 1;
        self.opening_progress == CHEST_OPEN_TICKS
    }

    pub fn is_open(&self) -> bool {
        self.opening_progress >= CHEST_OPEN_TICKS
    }

    /// Mark collected. Returns false if it already was.
    pub fn collect(&mut self) -> bool {
        if self.state == ChestState::Collected {
            return false;
        }
        self.state = ChestState::Collected;
        true
    }

    pub fn frame(&self) -> u32 {
        self.opening_progress / TICKS_PER_FRAME
    }
}

/// Level exit. Entering it with the interact input finishes the level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portal {
    pub id: u32,
    pub host: PlatformId,
    /// Free-running animation counter
    pub animation_phase: u32,
}

impl Portal {
    pub fn new(id: u32, host: PlatformId) -> Self {
        Self {
            id,
            host,
            animation_phase: 0,
        }
    }

    pub fn hitbox(&self, host: &Platform) -> Rect {
        Rect::new(
            host.center_x() - PORTAL_SIZE / 2.0,
            host.pos.y - 118.0,
            PORTAL_SIZE,
            PORTAL_SIZE,
        )
    }

    pub fn animate(&mut self) {
        self.animation_phase = self.animation_phase.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::platform::{PlatformKind, PlatformRole};
    use glam::Vec2;

    #[test]
    fn test_chest_state_machine() {
        let mut chest = Chest::new(1, PlatformId(2), ChestContents::Weapon(WeaponKind::Shotgun));
        assert!(!chest.advance());
        assert!(chest.begin_opening());
        assert!(!chest.begin_opening());
        let mut completed = 0;
        for _ in 0..CHEST_OPEN_TICKS * 2 {
            if chest.advance() {
                completed += 1;
            }
        }
        assert_eq!(completed, 1);
        assert!(chest.is_open());
        assert!(chest.collect());
        assert!(!chest.collect());
        assert!(!chest.begin_opening());
    }

    #[test]
    fn test_hitboxes_centered_on_host() {
        let host = Platform::new(
            PlatformId(2),
            Vec2::new(100.0, 400.0),
            180.0,
            PlatformKind::Static,
            PlatformRole::Exit,
        );
        let chest = Chest::new(1, host.id, ChestContents::Upgrade(Potion::Health(10)));
        assert_eq!(chest.hitbox(&host).center().x, host.center_x());
        let portal = Portal::new(3, host.id);
        let r = portal.hitbox(&host);
        assert_eq!(r.center().x, host.center_x());
        assert!(r.bottom() > host.pos.y);
    }
}
