//! Parent/child bookkeeping over the [`WindowPool`].
//!
//! Frames keep an ordered list of children. Child order is registration
//! order and is also the focus-navigation order; there is no tiering below
//! the top level.

use heapless::Vec;

use crate::{
    error::GuiError,
    window::{WindowFlags, WindowId, WindowPool},
};

/// Outcome of a focus step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Focus moved the full distance.
    Moved(WindowId),
    /// Focus stopped at the first or last item.
    EndOfList,
    /// Nothing in scope can take focus.
    Nothing,
}

impl<const N: usize> WindowPool<N> {
    /// Append `child` to `parent`'s children and point it back at `parent`.
    pub(crate) fn attach(&mut self, parent: WindowId, child: WindowId) -> Result<(), GuiError> {
        let frame = self.get_mut(parent).ok_or(GuiError::UnknownWindow)?;
        if !frame.get_content().is_frame() {
            return Err(GuiError::UnknownWindow);
        }
        frame.children.push(child).map_err(|_| GuiError::TooManyChildren)?;
        if let Some(window) = self.get_mut(child) {
            window.parent = Some(parent);
        }
        Ok(())
    }

    /// Drop `child` from `parent`'s list, keeping the order of the rest.
    pub(crate) fn detach(&mut self, parent: WindowId, child: WindowId) -> bool {
        let Some(frame) = self.get_mut(parent) else {
            return false;
        };
        match frame.children.iter().position(|&c| c == child) {
            Some(pos) => {
                frame.children.remove(pos);
                true
            }
            None => false,
        }
    }

    /// `true` when `id` is `ancestor` or lies below it.
    pub fn is_within(&self, id: WindowId, ancestor: WindowId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.get(current).and_then(|w| w.parent());
        }
        false
    }

    /// The ancestor of `id` whose parent is `root`.
    pub fn top_level_of(&self, id: WindowId, root: WindowId) -> Option<WindowId> {
        let mut current = id;
        loop {
            let parent = self.get(current)?.parent()?;
            if parent == root {
                return Some(current);
            }
            current = parent;
        }
    }

    /// Set or clear `flag` on `id` and everything below it.
    pub(crate) fn set_subtree_flag(&mut self, id: WindowId, flag: WindowFlags, on: bool) {
        let mut pending: Vec<WindowId, N> = Vec::new();
        let _ = pending.push(id);
        while let Some(current) = pending.pop() {
            let Some(window) = self.get_mut(current) else { continue };
            window.set_flag(flag, on);
            for &child in &window.children {
                let _ = pending.push(child);
            }
        }
    }

    /// Ids of `id` and everything below it, parents before children.
    pub fn subtree(&self, id: WindowId) -> Vec<WindowId, N> {
        let mut out: Vec<WindowId, N> = Vec::new();
        if !self.contains(id) {
            return out;
        }
        let _ = out.push(id);
        let mut next = 0;
        while let Some(&current) = out.get(next) {
            next = next.saturating_add(1);
            if let Some(window) = self.get(current) {
                for &child in window.children() {
                    let _ = out.push(child);
                }
            }
        }
        out
    }

    /// Move focus through `list` by up to `steps` focusable items.
    ///
    /// Without a current focus the first step lands on the first (or, going
    /// backwards, the last) focusable item. Returns the new focus and whether
    /// the end of the list cut the move short.
    pub(crate) fn step_focus(
        &self,
        list: &[WindowId],
        current: Option<WindowId>,
        forward: bool,
        steps: u16,
    ) -> (Option<WindowId>, bool) {
        let focusable = |pos: usize| list.get(pos).and_then(|&id| self.get(id)).is_some_and(|w| w.accepts_focus());

        let mut pos = current.and_then(|c| list.iter().position(|&id| id == c));
        let mut moved: u16 = 0;
        while moved < steps {
            let next = match (pos, forward) {
                (None, true) => (0..list.len()).find(|&p| focusable(p)),
                (None, false) => (0..list.len()).rev().find(|&p| focusable(p)),
                (Some(p), true) => (p.saturating_add(1)..list.len()).find(|&p| focusable(p)),
                (Some(p), false) => (0..p).rev().find(|&p| focusable(p)),
            };
            let Some(next) = next else { break };
            pos = Some(next);
            moved = moved.saturating_add(1);
        }

        let focus = pos.and_then(|p| list.get(p).copied());
        (focus, moved < steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        geometry::rect,
        window::{Content, Window},
    };

    fn pool_with_buttons(n: usize) -> (WindowPool<16>, WindowId, std::vec::Vec<WindowId>) {
        let (mut pool, root) = WindowPool::<16>::with_root(Window::new(rect(0, 0, 100, 100)));
        let mut ids = std::vec::Vec::new();
        for _ in 0..n {
            let id = pool
                .insert(Window::new(rect(0, 0, 10, 10)).content(Content::Button("b")))
                .expect("room");
            pool.attach(root, id).expect("attach");
            ids.push(id);
        }
        (pool, root, ids)
    }

    #[test]
    fn test_attach_sets_parent_and_order() {
        let (pool, root, ids) = pool_with_buttons(3);
        let root_window = pool.get(root).expect("root");
        assert_eq!(root_window.children(), ids.as_slice());
        assert_eq!(pool.get(ids[1]).expect("child").parent(), Some(root));
    }

    #[test]
    fn test_attach_to_non_frame_fails() {
        let (mut pool, _root, ids) = pool_with_buttons(2);
        assert_eq!(pool.attach(ids[0], ids[1]), Err(GuiError::UnknownWindow));
    }

    #[test]
    fn test_detach_keeps_order() {
        let (mut pool, root, ids) = pool_with_buttons(3);
        assert!(pool.detach(root, ids[1]));
        assert!(!pool.detach(root, ids[1]));
        assert_eq!(pool.get(root).expect("root").children(), &[ids[0], ids[2]]);
    }

    #[test]
    fn test_step_focus_forward_and_end() {
        let (pool, _root, ids) = pool_with_buttons(3);
        assert_eq!(pool.step_focus(&ids, None, true, 1), (Some(ids[0]), false));
        assert_eq!(pool.step_focus(&ids, Some(ids[0]), true, 2), (Some(ids[2]), false));
        assert_eq!(pool.step_focus(&ids, Some(ids[2]), true, 1), (Some(ids[2]), true));
        assert_eq!(pool.step_focus(&ids, Some(ids[1]), true, 5), (Some(ids[2]), true));
    }

    #[test]
    fn test_step_focus_skips_disabled() {
        let (mut pool, _root, ids) = pool_with_buttons(3);
        pool.get_mut(ids[1]).expect("child").set_flag(WindowFlags::ENABLED, false);
        assert_eq!(pool.step_focus(&ids, Some(ids[0]), true, 1), (Some(ids[2]), false));
        assert_eq!(pool.step_focus(&ids, Some(ids[2]), false, 1), (Some(ids[0]), false));
    }

    #[test]
    fn test_step_focus_backwards_from_nothing() {
        let (pool, _root, ids) = pool_with_buttons(3);
        assert_eq!(pool.step_focus(&ids, None, false, 1), (Some(ids[2]), false));
    }

    #[test]
    fn test_subtree_flag_reaches_grandchildren() {
        let (mut pool, root, _) = pool_with_buttons(0);
        let frame = pool.insert(Window::new(rect(0, 0, 50, 50))).expect("room");
        pool.attach(root, frame).expect("attach");
        let leaf = pool.insert(Window::new(rect(0, 0, 5, 5))).expect("room");
        pool.attach(frame, leaf).expect("attach");

        pool.set_subtree_flag(frame, WindowFlags::SHADOW, true);
        assert!(pool.get(leaf).expect("leaf").is_shadowed());
        assert!(!pool.get(root).expect("root").is_shadowed());
        assert_eq!(pool.subtree(frame).as_slice(), &[frame, leaf]);
        assert!(pool.is_within(leaf, root));
        assert_eq!(pool.top_level_of(leaf, root), Some(frame));
    }
}
