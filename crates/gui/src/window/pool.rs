use heapless::Vec;

use super::{Window, WindowId};
use crate::error::GuiError;

struct Slot {
    generation: u16,
    window: Option<Window>,
}

/// Fixed-capacity window storage with generational ids.
///
/// Removing a window bumps its slot's generation, so ids handed out before
/// the removal stop resolving even after the slot is reused.
pub struct WindowPool<const N: usize> {
    slots: Vec<Slot, N>,
    free: Vec<u16, N>,
    len: usize,
}

impl<const N: usize> WindowPool<N> {
    const HAS_ROOM_FOR_ROOT: () = assert!(N > 0, "window pool needs room for the root frame");

    /// Pool whose first slot holds `root`, returned together with its id.
    pub fn with_root(root: Window) -> (Self, WindowId) {
        let () = Self::HAS_ROOM_FOR_ROOT;
        let mut pool = Self::new();
        // Cannot fail: N > 0 is checked at compile time.
        let _ = pool.slots.push(Slot {
            generation: 0,
            window: Some(root),
        });
        pool.len = 1;
        (pool, WindowId::new(0, 0))
    }

    /// Empty pool.
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Store `window` and hand out its id.
    pub fn insert(&mut self, window: Window) -> Result<WindowId, GuiError> {
        if let Some(index) = self.free.pop() {
            let slot = self.slots.get_mut(usize::from(index)).ok_or(GuiError::PoolExhausted)?;
            slot.window = Some(window);
            self.len = self.len.saturating_add(1);
            return Ok(WindowId::new(index, slot.generation));
        }

        let index = u16::try_from(self.slots.len()).map_err(|_| GuiError::PoolExhausted)?;
        self.slots
            .push(Slot {
                generation: 0,
                window: Some(window),
            })
            .map_err(|_| GuiError::PoolExhausted)?;
        self.len = self.len.saturating_add(1);
        Ok(WindowId::new(index, 0))
    }

    /// Take the window out; `None` for stale ids.
    pub fn remove(&mut self, id: WindowId) -> Option<Window> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation() {
            return None;
        }
        let window = slot.window.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        // Cannot fail: every index is pushed at most once per removal.
        let _ = self.free.push(id.index);
        self.len = self.len.saturating_sub(1);
        Some(window)
    }

    /// Remove every window except `keep`.
    pub fn retain_only(&mut self, keep: WindowId) {
        self.free.clear();
        let mut len = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let Ok(index) = u16::try_from(index) else { continue };
            if slot.window.is_some() && WindowId::new(index, slot.generation) == keep {
                len = 1;
                continue;
            }
            if slot.window.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            let _ = self.free.push(index);
        }
        self.len = len;
    }

    pub fn get(&self, id: WindowId) -> Option<&Window> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.window.as_ref())
    }

    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.window.as_mut())
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.get(id).is_some()
    }

    /// Live windows.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        N
    }

    /// Live windows with their ids, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (WindowId, &Window)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            let index = u16::try_from(index).ok()?;
            slot.window.as_ref().map(|w| (WindowId::new(index, slot.generation), w))
        })
    }
}

impl<const N: usize> Default for WindowPool<N> {
    fn default() -> Self {
        Self::new()
    }
}
