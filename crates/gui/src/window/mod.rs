//! Window records and the pool that owns them.
//!
//! A window is plain data: rectangle, colours, flags and one [`Content`]
//! variant. Behaviour lives in the [`Screen`](crate::Screen) that owns the
//! pool and in the screen body or dialog that created the window. Windows
//! refer to each other by [`WindowId`] only, so a destroyed window can never
//! be reached through a stale handle.

mod flags;
mod pool;

pub use flags::WindowFlags;
pub use pool::WindowPool;

use embedded_graphics::{pixelcolor::Rgb565, prelude::RgbColor, primitives::Rectangle};
use heapless::Vec;

use crate::config::MAX_CHILDREN;

/// Generational handle into a [`WindowPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WindowId {
    index: u16,
    generation: u16,
}

impl WindowId {
    pub(crate) const fn new(index: u16, generation: u16) -> Self {
        Self { index, generation }
    }

    pub(crate) fn index(self) -> usize {
        usize::from(self.index)
    }

    pub(crate) fn generation(self) -> u16 {
        self.generation
    }
}

/// Z-order tier of a top-level window.
///
/// Later tiers are drawn on top of earlier ones and take input first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WinType {
    /// Ordinary screen content.
    Normal,
    /// Modal dialog; hides the normal windows it covers.
    Dialog,
    /// Dialog that outranks every normal dialog.
    StrongDialog,
    /// Transient notification; never covers a dialog.
    Popup,
}

impl WinType {
    /// Tiers in drawing order.
    pub const ALL: [Self; 4] = [Self::Normal, Self::Dialog, Self::StrongDialog, Self::Popup];

    /// Tiers that hide the normal windows they overlap, lowest first.
    pub(crate) const HIDING: [Self; 3] = [Self::StrongDialog, Self::Dialog, Self::Popup];

    /// Short name for log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Dialog => "dialog",
            Self::StrongDialog => "strong_dialog",
            Self::Popup => "popup",
        }
    }
}

/// What a window shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Content {
    /// Container; draws its background and owns children.
    Frame,
    /// Single line of text.
    Text(&'static str),
    /// Signed integer.
    Number(i32),
    /// Horizontal bar, 0-100 %.
    Progress(u8),
    /// Focusable item with a label.
    Button(&'static str),
}

impl Content {
    /// Only frames may own children.
    pub fn is_frame(self) -> bool {
        matches!(self, Self::Frame)
    }

    /// Only buttons take part in focus navigation.
    pub fn is_focusable(self) -> bool {
        matches!(self, Self::Button(_))
    }
}

/// One node of the window tree.
#[derive(Debug, Clone)]
pub struct Window {
    rect: Rectangle,
    flags: WindowFlags,
    win_type: WinType,
    content: Content,
    back_color: Rgb565,
    fore_color: Rgb565,
    pub(crate) parent: Option<WindowId>,
    pub(crate) children: Vec<WindowId, MAX_CHILDREN>,
}

impl Window {
    /// Visible, enabled, invalid frame of the normal tier.
    pub fn new(rect: Rectangle) -> Self {
        Self {
            rect,
            flags: WindowFlags::default(),
            win_type: WinType::Normal,
            content: Content::Frame,
            back_color: Rgb565::BLACK,
            fore_color: Rgb565::WHITE,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Set the tier. Ignored for child windows, which follow their parent.
    pub fn kind(mut self, win_type: WinType) -> Self {
        self.win_type = win_type;
        self
    }

    /// Set the content.
    pub fn content(mut self, content: Content) -> Self {
        self.content = content;
        self
    }

    /// Set the background colour.
    pub fn back_color(mut self, color: Rgb565) -> Self {
        self.back_color = color;
        self
    }

    /// Set the foreground colour.
    pub fn fore_color(mut self, color: Rgb565) -> Self {
        self.fore_color = color;
        self
    }

    /// Add extra flags on top of the defaults.
    pub fn with_flags(mut self, flags: WindowFlags) -> Self {
        self.flags.insert(flags);
        self
    }

    /// Start hidden.
    pub fn hidden(mut self) -> Self {
        self.flags.remove(WindowFlags::VISIBLE);
        self
    }

    pub fn rect(&self) -> Rectangle {
        self.rect
    }

    pub fn flags(&self) -> WindowFlags {
        self.flags
    }

    pub fn win_type(&self) -> WinType {
        self.win_type
    }

    pub fn get_content(&self) -> Content {
        self.content
    }

    pub fn get_back_color(&self) -> Rgb565 {
        self.back_color
    }

    pub fn get_fore_color(&self) -> Rgb565 {
        self.fore_color
    }

    /// Parent frame; `None` only for a screen's root.
    pub fn parent(&self) -> Option<WindowId> {
        self.parent
    }

    /// Direct children in registration order.
    pub fn children(&self) -> &[WindowId] {
        &self.children
    }

    pub fn is_visible(&self) -> bool {
        self.flags.contains(WindowFlags::VISIBLE)
    }

    pub fn is_enabled(&self) -> bool {
        self.flags.contains(WindowFlags::ENABLED)
    }

    pub fn is_invalid(&self) -> bool {
        self.flags.contains(WindowFlags::INVALID)
    }

    pub fn is_hidden_behind_dialog(&self) -> bool {
        self.flags.contains(WindowFlags::HIDDEN_BEHIND_DIALOG)
    }

    pub fn is_shadowed(&self) -> bool {
        self.flags.contains(WindowFlags::SHADOW)
    }

    pub fn is_checked(&self) -> bool {
        self.flags.contains(WindowFlags::CHECKED)
    }

    /// Visible and not covered by a dialog.
    pub fn is_on_screen(&self) -> bool {
        self.is_visible() && !self.is_hidden_behind_dialog()
    }

    /// Frames and buttons that are on screen and enabled may hold input
    /// capture.
    pub fn accepts_capture(&self) -> bool {
        self.is_on_screen() && self.is_enabled() && (self.content.is_frame() || self.content.is_focusable())
    }

    /// May receive focus during navigation.
    pub fn accepts_focus(&self) -> bool {
        self.is_on_screen() && self.is_enabled() && self.content.is_focusable()
    }

    /// Set or clear `flag`; returns whether anything changed.
    pub(crate) fn set_flag(&mut self, flag: WindowFlags, on: bool) -> bool {
        let before = self.flags;
        self.flags.set(flag, on);
        before != self.flags
    }

    /// Replace the content; invalidates only on change.
    pub(crate) fn set_content(&mut self, content: Content) -> bool {
        if self.content == content {
            return false;
        }
        self.content = content;
        self.flags.insert(WindowFlags::INVALID);
        true
    }

    pub(crate) fn set_rect(&mut self, rect: Rectangle) {
        self.rect = rect;
        self.flags.insert(WindowFlags::INVALID);
    }

    pub(crate) fn set_colors(&mut self, back: Rgb565, fore: Rgb565) {
        if self.back_color != back || self.fore_color != fore {
            self.back_color = back;
            self.fore_color = fore;
            self.flags.insert(WindowFlags::INVALID);
        }
    }

    pub(crate) fn set_win_type(&mut self, win_type: WinType) {
        self.win_type = win_type;
    }
}
