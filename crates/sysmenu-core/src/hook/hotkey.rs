use std::collections::BTreeSet;

use super::{Hook, HookCore, HookKind, RawMessage};
use crate::event::{EventLog, HookEvent};
use crate::keys;

/// Configured key combinations: `wparam` = the bound menu command.
#[derive(Debug)]
pub struct HotKeyHook {
    core: HookCore,
}

impl HotKeyHook {
    pub fn new() -> Self {
        Self {
            core: HookCore::new(HookKind::HotKey),
        }
    }
}

impl Default for HotKeyHook {
    fn default() -> Self {
        Self::new()
    }
}

impl Hook for HotKeyHook {
    fn core(&self) -> &HookCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut HookCore {
        &mut self.core
    }

    fn decode(&mut self, _slot: usize, msg: &RawMessage, log: &mut EventLog) {
        log.push(HookEvent::HotKey {
            command: msg.wparam as u32,
        });
    }
}

/// Tracks pressed keys and reports a command when the held set equals
/// a bound combination exactly.
#[derive(Debug, Default)]
pub struct HotKeyMatcher {
    bindings: Vec<(u32, BTreeSet<u32>)>,
    pressed: BTreeSet<u32>,
}

impl HotKeyMatcher {
    pub fn new(bindings: &[(u32, Vec<u32>)]) -> Self {
        let bindings = bindings
            .iter()
            .filter(|(_, keys)| !keys.is_empty())
            .map(|(command, combo)| (*command, combo.iter().map(|vk| keys::normalize_vk(*vk)).collect()))
            .collect();
        Self {
            bindings,
            pressed: BTreeSet::new(),
        }
    }

    /// Records a key press and reports the command whose combination is
    /// now held. Auto-repeat of a held key never re-fires.
    ///
    /// `is_down` answers from live key state. Keys whose release never
    /// reached the hook (a secure desktop swallows it) are dropped
    /// before matching.
    pub fn key_down(&mut self, vk: u32, is_down: impl Fn(u32) -> bool) -> Option<u32> {
        let vk = keys::normalize_vk(vk);
        self.pressed.retain(|held| *held == vk || is_down(*held));
        if !self.pressed.insert(vk) {
            return None;
        }
        self.bindings
            .iter()
            .find(|(_, combo)| *combo == self.pressed)
            .map(|(command, _)| *command)
    }

    pub fn key_up(&mut self, vk: u32) {
        self.pressed.remove(&keys::normalize_vk(vk));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{VK_CONTROL, VK_MENU};

    const VK_T: u32 = 0x54;
    const VK_DELETE: u32 = 0x2E;

    /// Every key the matcher remembers is still held.
    fn held(_: u32) -> bool {
        true
    }

    #[test]
    fn full_combination_fires_once() {
        // Arrange
        let mut matcher = HotKeyMatcher::new(&[(0x13, vec![VK_CONTROL, VK_MENU, VK_T])]);

        // Act
        let partial = [matcher.key_down(VK_CONTROL, held), matcher.key_down(VK_MENU, held)];
        let fired = matcher.key_down(VK_T, held);
        let repeat = matcher.key_down(VK_T, held);

        // Assert
        assert_eq!(partial, [None, None]);
        assert_eq!(fired, Some(0x13));
        assert_eq!(repeat, None);
    }

    #[test]
    fn side_specific_modifiers_match_generic_bindings() {
        // Arrange
        const VK_LCONTROL: u32 = 0xA2;
        let mut matcher = HotKeyMatcher::new(&[(0x13, vec![VK_CONTROL, VK_T])]);

        // Act
        matcher.key_down(VK_LCONTROL, held);
        let fired = matcher.key_down(VK_T, held);

        // Assert
        assert_eq!(fired, Some(0x13));
    }

    #[test]
    fn extra_held_key_prevents_a_match() {
        // Arrange
        let mut matcher = HotKeyMatcher::new(&[(0x13, vec![VK_CONTROL, VK_T])]);
        matcher.key_down(VK_MENU, held);
        matcher.key_down(VK_CONTROL, held);

        // Act
        let fired = matcher.key_down(VK_T, held);
        matcher.key_up(VK_MENU);
        matcher.key_up(VK_T);
        let refired = matcher.key_down(VK_T, held);

        // Assert
        assert_eq!(fired, None);
        assert_eq!(refired, Some(0x13));
    }

    #[test]
    fn missed_release_does_not_block_later_combinations() {
        // Arrange
        let mut matcher = HotKeyMatcher::new(&[(0x13, vec![VK_CONTROL, VK_MENU, VK_T])]);
        matcher.key_down(VK_CONTROL, held);
        matcher.key_down(VK_MENU, held);
        matcher.key_down(VK_DELETE, held);
        matcher.key_up(VK_CONTROL);
        matcher.key_up(VK_MENU);
        let live = |vk: u32| vk != VK_DELETE;

        // Act
        matcher.key_down(VK_CONTROL, live);
        matcher.key_down(VK_MENU, live);
        let fired = matcher.key_down(VK_T, live);

        // Assert
        assert_eq!(fired, Some(0x13));
    }

    #[test]
    fn key_still_held_keeps_blocking_a_match() {
        // Arrange
        let mut matcher = HotKeyMatcher::new(&[(0x13, vec![VK_CONTROL, VK_T])]);
        matcher.key_down(VK_DELETE, held);
        matcher.key_down(VK_CONTROL, held);

        // Act
        let fired = matcher.key_down(VK_T, held);

        // Assert
        assert_eq!(fired, None);
    }
}
