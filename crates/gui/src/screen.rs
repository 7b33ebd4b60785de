//! A screen: the root frame plus the four z-order tiers above it.
//!
//! Top-level windows are kept in one ordered list per [`WinType`]. The
//! drawing and event chain is `normal → dialog → strong_dialog → popup`,
//! each list in registration order, so the last window of the last
//! non-empty tier is on top.
//!
//! Two policies are enforced on every registration change:
//!
//! - A popup may never cover a visible dialog. Registering one that would
//!   fails with [`GuiError::PopupConflict`], and registering anything on top
//!   of an existing popup evicts the popup.
//! - Normal windows overlapped by the topmost visible window of any higher
//!   tier are flagged [`WindowFlags::HIDDEN_BEHIND_DIALOG`] and skipped when
//!   drawing. The flag is recomputed from scratch each time.

use embedded_graphics::{pixelcolor::Rgb565, prelude::*, primitives::Rectangle};
use heapless::Vec;

use crate::{
    config::{MAX_WINDOWS, SCREEN_RECT, TIER_CAPACITY},
    draw,
    error::GuiError,
    frame::Navigation,
    geometry::RectExt,
    window::{Content, WinType, Window, WindowFlags, WindowId, WindowPool},
};

type Tier = Vec<WindowId, TIER_CAPACITY>;

/// Root frame, tiers, focus and capture for one screen.
pub struct Screen {
    pool: WindowPool<MAX_WINDOWS>,
    root: WindowId,
    tiers: [Tier; 4],
    focused: Option<WindowId>,
    captured: Option<WindowId>,
    menu_timeout: bool,
}

impl Screen {
    /// Empty full-display screen with a black background.
    pub fn new() -> Self {
        Self::with_rect(SCREEN_RECT)
    }

    /// Empty screen covering `rect`.
    pub fn with_rect(rect: Rectangle) -> Self {
        let (pool, root) = WindowPool::with_root(Window::new(rect).back_color(Rgb565::BLACK));
        Self {
            pool,
            root,
            tiers: [Vec::new(), Vec::new(), Vec::new(), Vec::new()],
            focused: None,
            captured: None,
            menu_timeout: true,
        }
    }

    /// Destroy every window and restore the defaults, keeping the root.
    pub fn reset(&mut self) {
        self.pool.retain_only(self.root);
        if let Some(root) = self.pool.get_mut(self.root) {
            root.children.clear();
            root.set_flag(WindowFlags::INVALID, true);
        }
        for tier in &mut self.tiers {
            tier.clear();
        }
        self.focused = None;
        self.captured = None;
        self.menu_timeout = true;
    }

    /// The screen's own frame. Parent of every top-level window.
    pub fn root(&self) -> WindowId {
        self.root
    }

    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.pool.get(id)
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.pool.contains(id)
    }

    /// Live windows including the root.
    pub fn window_count(&self) -> usize {
        self.pool.len()
    }

    /// Set the colour painted behind all windows.
    pub fn set_background(&mut self, color: Rgb565) {
        if let Some(root) = self.pool.get_mut(self.root) {
            let fore = root.get_fore_color();
            root.set_colors(color, fore);
        }
    }

    /// Whether the menu timeout may close this screen.
    pub fn menu_timeout_enabled(&self) -> bool {
        self.menu_timeout
    }

    pub fn set_menu_timeout(&mut self, enabled: bool) {
        self.menu_timeout = enabled;
    }

    // ── Construction and destruction ────────────────────────────────────

    /// Add `window` under `parent`, or as a top-level window when `parent`
    /// is `None` or the root.
    ///
    /// Top-level windows are registered in the tier named by their
    /// [`WinType`]; children inherit their parent's tier. On error the
    /// window is not kept.
    pub fn insert(&mut self, parent: Option<WindowId>, mut window: Window) -> Result<WindowId, GuiError> {
        let parent = parent.filter(|&p| p != self.root);
        window.children.clear();

        let Some(parent) = parent else {
            window.parent = Some(self.root);
            let id = self.pool.insert(window)?;
            if let Err(e) = self.register_sub_win(id) {
                self.pool.remove(id);
                return Err(e);
            }
            return Ok(id);
        };

        let parent_type = self.pool.get(parent).ok_or(GuiError::UnknownWindow)?.win_type();
        window.set_win_type(parent_type);
        let id = self.pool.insert(window)?;
        if let Err(e) = self.pool.attach(parent, id) {
            self.pool.remove(id);
            return Err(e);
        }
        Ok(id)
    }

    /// Add a top-level window to its tier.
    ///
    /// Fails with [`GuiError::PopupConflict`] for a popup overlapping a
    /// visible dialog or strong dialog. Otherwise evicts popups the new
    /// window overlaps and recomputes which normal windows are hidden.
    pub fn register_sub_win(&mut self, id: WindowId) -> Result<(), GuiError> {
        let window = self.pool.get(id).ok_or(GuiError::UnknownWindow)?;
        if window.parent() != Some(self.root) || self.tier_of(id).is_some() {
            return Err(GuiError::UnknownWindow);
        }
        let (win_type, rect) = (window.win_type(), window.rect());

        if win_type == WinType::Popup && !self.can_register_popup(rect) {
            gui_warn!("popup rejected: it would cover a dialog");
            return Err(GuiError::PopupConflict);
        }

        self.tier_mut(win_type).push(id).map_err(|_| GuiError::TierFull)?;
        gui_trace!("registered {} window", win_type.as_str());

        self.unregister_conflicting_popups(rect, id);
        self.hide_behind_dialogs();
        self.invalidate(id);
        Ok(())
    }

    /// Take a top-level window out of its tier without destroying it.
    ///
    /// A detached window is not drawn and receives no input until it is
    /// registered again.
    pub fn unregister_sub_win(&mut self, id: WindowId) -> bool {
        let Some(win_type) = self.tier_of(id) else {
            return false;
        };
        let tier = self.tier_mut(win_type);
        if let Some(pos) = tier.iter().position(|&w| w == id) {
            tier.remove(pos);
        }
        self.drop_focus_within(id);
        self.hide_behind_dialogs();
        if win_type != WinType::Normal {
            self.invalidate_root();
        }
        true
    }

    /// Destroy `id` and everything below it.
    ///
    /// The root cannot be destroyed. Returns `false` for stale ids.
    pub fn destroy_window(&mut self, id: WindowId) -> bool {
        if id == self.root {
            return false;
        }
        let Some(window) = self.pool.get(id) else {
            return false;
        };
        let parent = window.parent();
        let children = window.children.clone();

        for child in children {
            self.destroy_window(child);
        }

        match parent {
            Some(p) if p == self.root => {
                self.unregister_sub_win(id);
            }
            Some(p) => {
                self.pool.detach(p, id);
                self.invalidate(p);
            }
            None => {}
        }
        self.drop_focus_within(id);
        self.pool.remove(id);
        // A window that covered part of the root leaves a hole behind.
        if parent == Some(self.root) {
            self.invalidate_root();
        }
        true
    }

    /// Destroy every top-level window carrying `flag`. Returns how many.
    pub fn close_flagged(&mut self, flag: WindowFlags) -> usize {
        let mut doomed: Vec<WindowId, { 4 * TIER_CAPACITY }> = Vec::new();
        for id in self.chain() {
            if self.pool.get(id).is_some_and(|w| w.flags().contains(flag)) {
                let _ = doomed.push(id);
            }
        }
        for &id in &doomed {
            self.destroy_window(id);
        }
        doomed.len()
    }

    // ── Tiers ───────────────────────────────────────────────────────────

    /// Top-level windows of one tier, bottom to top.
    pub fn tier(&self, win_type: WinType) -> &[WindowId] {
        let [normal, dialog, strong, popup] = &self.tiers;
        match win_type {
            WinType::Normal => normal,
            WinType::Dialog => dialog,
            WinType::StrongDialog => strong,
            WinType::Popup => popup,
        }
    }

    pub fn tier_first(&self, win_type: WinType) -> Option<WindowId> {
        self.tier(win_type).first().copied()
    }

    pub fn tier_last(&self, win_type: WinType) -> Option<WindowId> {
        self.tier(win_type).last().copied()
    }

    /// All top-level windows in drawing order.
    pub fn chain(&self) -> impl DoubleEndedIterator<Item = WindowId> + '_ {
        self.tiers.iter().flat_map(|tier| tier.iter().copied())
    }

    /// Tier `id` is registered in, if any.
    pub fn tier_of(&self, id: WindowId) -> Option<WinType> {
        WinType::ALL.into_iter().find(|&t| self.tier(t).contains(&id))
    }

    fn tier_mut(&mut self, win_type: WinType) -> &mut Tier {
        let [normal, dialog, strong, popup] = &mut self.tiers;
        match win_type {
            WinType::Normal => normal,
            WinType::Dialog => dialog,
            WinType::StrongDialog => strong,
            WinType::Popup => popup,
        }
    }

    fn last_visible(&self, win_type: WinType) -> Option<WindowId> {
        self.tier(win_type)
            .iter()
            .rev()
            .copied()
            .find(|&id| self.pool.get(id).is_some_and(Window::is_visible))
    }

    /// A popup at `rect` may be registered unless it overlaps a visible
    /// dialog or strong dialog.
    pub fn can_register_popup(&self, rect: Rectangle) -> bool {
        [WinType::Dialog, WinType::StrongDialog].into_iter().all(|t| {
            self.tier(t)
                .iter()
                .filter_map(|&id| self.pool.get(id))
                .all(|w| !(w.is_visible() && w.rect().overlaps(&rect)))
        })
    }

    /// Destroy every popup except `exclude` that overlaps `rect`.
    pub fn unregister_conflicting_popups(&mut self, rect: Rectangle, exclude: WindowId) {
        let mut doomed: Tier = Vec::new();
        for &id in self.tier(WinType::Popup) {
            if id != exclude && self.pool.get(id).is_some_and(|w| w.rect().overlaps(&rect)) {
                let _ = doomed.push(id);
            }
        }
        for id in doomed {
            gui_debug!("popup evicted by an overlapping window");
            self.destroy_window(id);
        }
    }

    /// Recompute [`WindowFlags::HIDDEN_BEHIND_DIALOG`] for the normal tier.
    pub fn hide_behind_dialogs(&mut self) {
        let mut covers: Vec<Rectangle, 3> = Vec::new();
        for t in WinType::HIDING {
            if let Some(rect) = self.last_visible(t).and_then(|id| self.pool.get(id)).map(Window::rect) {
                let _ = covers.push(rect);
            }
        }

        let normals: Tier = self.tier(WinType::Normal).iter().copied().collect();
        for id in normals {
            let Some(window) = self.pool.get_mut(id) else { continue };
            let hidden = covers.iter().any(|c| c.overlaps(&window.rect()));
            if window.set_flag(WindowFlags::HIDDEN_BEHIND_DIALOG, hidden) && !hidden {
                self.pool.set_subtree_flag(id, WindowFlags::INVALID, true);
            }
        }
    }

    // ── Ancestry ────────────────────────────────────────────────────────

    /// The top-level window `id` belongs to.
    pub fn top_level_of(&self, id: WindowId) -> Option<WindowId> {
        self.pool.top_level_of(id, self.root)
    }

    /// `true` when `id` is `ancestor` or lies below it.
    pub fn is_within(&self, id: WindowId, ancestor: WindowId) -> bool {
        self.pool.is_within(id, ancestor)
    }

    pub fn parent_of(&self, id: WindowId) -> Option<WindowId> {
        self.pool.get(id).and_then(Window::parent)
    }

    // ── Capture and focus ───────────────────────────────────────────────

    /// The window that receives input right now.
    ///
    /// The topmost strong dialog wins, then the topmost dialog, then an
    /// explicitly captured window, then the topmost normal window that
    /// accepts capture. An explicit capture inside the winning dialog is
    /// honoured.
    pub fn captured_window(&self) -> Option<WindowId> {
        let explicit = self
            .captured
            .filter(|&c| self.pool.get(c).is_some_and(Window::accepts_capture));

        for t in [WinType::StrongDialog, WinType::Dialog] {
            let modal = self
                .tier(t)
                .iter()
                .rev()
                .copied()
                .find(|&id| self.pool.get(id).is_some_and(Window::accepts_capture));
            if let Some(modal) = modal {
                return Some(explicit.filter(|&c| self.is_within(c, modal)).unwrap_or(modal));
            }
        }

        if explicit.is_some() {
            return explicit;
        }

        self.tier(WinType::Normal)
            .iter()
            .rev()
            .copied()
            .find(|&id| self.pool.get(id).is_some_and(Window::accepts_capture))
    }

    /// Route input to `id` until released. Ignored for windows that cannot
    /// hold capture.
    pub fn set_capture(&mut self, id: WindowId) -> bool {
        if self.pool.get(id).is_some_and(Window::accepts_capture) {
            self.captured = Some(id);
            true
        } else {
            false
        }
    }

    pub fn release_capture(&mut self) {
        self.captured = None;
    }

    pub fn focused(&self) -> Option<WindowId> {
        self.focused.filter(|&f| self.pool.contains(f))
    }

    /// Move focus to `id`. Disabled or unknown windows are ignored.
    pub fn set_focus(&mut self, id: WindowId) -> bool {
        if !self.pool.get(id).is_some_and(Window::is_enabled) {
            return false;
        }
        if self.focused == Some(id) {
            return true;
        }
        if let Some(old) = self.focused.take() {
            self.invalidate(old);
        }
        self.focused = Some(id);
        self.invalidate(id);
        true
    }

    pub fn clear_focus(&mut self) {
        if let Some(old) = self.focused.take() {
            self.invalidate(old);
        }
    }

    /// Focused window if it lies inside `scope`.
    pub fn focus_within(&self, scope: WindowId) -> Option<WindowId> {
        self.focused().filter(|&f| self.is_within(f, scope))
    }

    fn drop_focus_within(&mut self, id: WindowId) {
        if self.focused.is_some_and(|f| f == id || self.pool.is_within(f, id)) {
            self.focused = None;
        }
        if self.captured.is_some_and(|c| c == id || self.pool.is_within(c, id)) {
            self.captured = None;
        }
    }

    /// Move focus by `steps` items inside `scope`.
    ///
    /// Navigates the siblings of the current focus when it lies inside
    /// `scope`, the children of `scope` otherwise.
    pub fn step_focus(&mut self, scope: WindowId, forward: bool, steps: u16) -> Navigation {
        let current = self.focus_within(scope).filter(|&f| f != scope);
        let container = current.and_then(|f| self.parent_of(f)).unwrap_or(scope);
        let Some(list) = self.pool.get(container).map(|w| w.children.clone()) else {
            return Navigation::Nothing;
        };

        let (next, hit_end) = self.pool.step_focus(&list, current, forward, steps);
        match next {
            None => Navigation::Nothing,
            Some(id) => {
                self.set_focus(id);
                if hit_end {
                    Navigation::EndOfList
                } else {
                    Navigation::Moved(id)
                }
            }
        }
    }

    // ── Window state ────────────────────────────────────────────────────

    /// Show or hide `id`. Changing a dialog or popup re-evaluates hiding.
    pub fn set_visible(&mut self, id: WindowId, visible: bool) -> bool {
        let Some(window) = self.pool.get_mut(id) else {
            return false;
        };
        if !window.set_flag(WindowFlags::VISIBLE, visible) {
            return true;
        }
        let (win_type, is_top) = (window.win_type(), window.parent() == Some(self.root));
        if visible {
            self.pool.set_subtree_flag(id, WindowFlags::INVALID, true);
        } else {
            self.drop_focus_within(id);
            match self.parent_of(id) {
                Some(p) if !is_top => self.invalidate(p),
                _ => self.invalidate_root(),
            }
        }
        if is_top && win_type != WinType::Normal {
            self.hide_behind_dialogs();
        }
        true
    }

    pub fn show(&mut self, id: WindowId) -> bool {
        self.set_visible(id, true)
    }

    pub fn hide(&mut self, id: WindowId) -> bool {
        self.set_visible(id, false)
    }

    /// Dim `id` and its children, or undo it.
    pub fn set_shadow(&mut self, id: WindowId, shadow: bool) -> bool {
        self.set_flag(id, WindowFlags::SHADOW, shadow)
    }

    pub fn set_enabled(&mut self, id: WindowId, enabled: bool) -> bool {
        if !enabled && self.focused == Some(id) {
            self.focused = None;
        }
        self.set_flag(id, WindowFlags::ENABLED, enabled)
    }

    pub fn set_checked(&mut self, id: WindowId, checked: bool) -> bool {
        self.set_flag(id, WindowFlags::CHECKED, checked)
    }

    /// Set or clear any flag, invalidating on change.
    ///
    /// Visibility goes through [`Screen::set_visible`] so hiding stays
    /// consistent.
    pub fn set_flag(&mut self, id: WindowId, flag: WindowFlags, on: bool) -> bool {
        if flag.contains(WindowFlags::VISIBLE) {
            return self.set_visible(id, on);
        }
        let Some(window) = self.pool.get_mut(id) else {
            return false;
        };
        if window.set_flag(flag, on) {
            self.invalidate(id);
        }
        true
    }

    pub fn set_content(&mut self, id: WindowId, content: Content) -> bool {
        self.pool.get_mut(id).is_some_and(|w| {
            w.set_content(content);
            true
        })
    }

    pub fn set_text(&mut self, id: WindowId, text: &'static str) -> bool {
        self.set_content(id, Content::Text(text))
    }

    pub fn set_number(&mut self, id: WindowId, value: i32) -> bool {
        self.set_content(id, Content::Number(value))
    }

    pub fn set_progress(&mut self, id: WindowId, percent: u8) -> bool {
        self.set_content(id, Content::Progress(percent.min(100)))
    }

    pub fn set_colors(&mut self, id: WindowId, back: Rgb565, fore: Rgb565) -> bool {
        self.pool.get_mut(id).is_some_and(|w| {
            w.set_colors(back, fore);
            true
        })
    }

    /// Move or resize `id`. Repaints the whole screen.
    pub fn set_rect(&mut self, id: WindowId, rect: Rectangle) -> bool {
        let Some(window) = self.pool.get_mut(id) else {
            return false;
        };
        window.set_rect(rect);
        self.invalidate_root();
        // A moved top-level window can start or stop overlapping a dialog,
        // whichever side of the overlap it is on.
        if self.tier_of(id).is_some() {
            self.hide_behind_dialogs();
        }
        true
    }

    // ── Invalidation and drawing ────────────────────────────────────────

    /// Mark `id` and its children for redraw.
    pub fn invalidate(&mut self, id: WindowId) {
        self.pool.set_subtree_flag(id, WindowFlags::INVALID, true);
    }

    /// Mark every window overlapping `area` for redraw.
    pub fn invalidate_area(&mut self, area: Rectangle) {
        let mut hit: Vec<WindowId, MAX_WINDOWS> = Vec::new();
        for (id, window) in self.pool.iter() {
            if id != self.root && window.rect().overlaps(&area) {
                let _ = hit.push(id);
            }
        }
        for id in hit {
            self.invalidate(id);
        }
    }

    /// Repaint everything on the next draw.
    pub fn invalidate_root(&mut self) {
        if let Some(root) = self.pool.get_mut(self.root) {
            root.set_flag(WindowFlags::INVALID, true);
        }
    }

    /// Clear the redraw mark of `id` and its children.
    pub fn validate(&mut self, id: WindowId) {
        self.pool.set_subtree_flag(id, WindowFlags::INVALID, false);
    }

    /// `true` when anything needs drawing.
    pub fn needs_redraw(&self) -> bool {
        self.pool.iter().any(|(id, w)| w.is_invalid() && (id == self.root || w.is_on_screen()))
    }

    /// On-screen windows with [`WindowFlags::HAS_TIMER`].
    pub fn timer_windows(&self) -> Vec<WindowId, MAX_WINDOWS> {
        let mut out = Vec::new();
        for top in self.chain() {
            for id in self.pool.subtree(top) {
                if self
                    .pool
                    .get(id)
                    .is_some_and(|w| w.is_on_screen() && w.flags().contains(WindowFlags::HAS_TIMER))
                {
                    let _ = out.push(id);
                }
            }
        }
        out
    }

    /// Paint everything marked invalid, in chain order.
    ///
    /// An invalid root repaints the background and every window. Hidden
    /// windows and their children are skipped; shadowed ones are dimmed
    /// together with their children.
    pub fn draw<D>(&mut self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        if let Some(root) = self.pool.get(self.root) {
            if root.is_invalid() {
                target.fill_solid(&root.rect(), root.get_back_color())?;
                let tops: Vec<WindowId, { 4 * TIER_CAPACITY }> = self.chain().collect();
                for id in tops {
                    self.invalidate(id);
                }
                if let Some(root) = self.pool.get_mut(self.root) {
                    root.set_flag(WindowFlags::INVALID, false);
                }
            }
        }

        for t in WinType::ALL {
            let mut pos = 0;
            while let Some(id) = self.tier(t).get(pos).copied() {
                self.draw_tree(id, false, target)?;
                pos = pos.saturating_add(1);
            }
        }
        Ok(())
    }

    fn draw_tree<D>(&mut self, id: WindowId, dimmed: bool, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Some(window) = self.pool.get(id) else {
            return Ok(());
        };
        if !window.is_on_screen() {
            return Ok(());
        }
        let dimmed = dimmed || window.is_shadowed();
        let children = window.children.clone();

        if window.is_invalid() {
            draw::draw_window(window, self.focused == Some(id), dimmed, target)?;
            if let Some(window) = self.pool.get_mut(id) {
                window.set_flag(WindowFlags::INVALID, false);
            }
            // A repainted frame wipes its children.
            for &child in &children {
                if let Some(child) = self.pool.get_mut(child) {
                    child.set_flag(WindowFlags::INVALID, true);
                }
            }
        }

        for child in children {
            self.draw_tree(child, dimmed, target)?;
        }
        Ok(())
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}
