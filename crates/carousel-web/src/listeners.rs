#![forbid(unsafe_code)]

//! Event subscriptions a mounted carousel holds on the page.

use bitflags::bitflags;

bitflags! {
    /// DOM listeners attached for one carousel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Listeners: u16 {
        /// `touchstart` on the track.
        const TOUCH_START       = 1 << 0;
        /// `touchmove` on the track.
        const TOUCH_MOVE        = 1 << 1;
        /// `touchend` on the track.
        const TOUCH_END         = 1 << 2;
        /// `mousedown` on the track.
        const MOUSE_DOWN        = 1 << 3;
        /// `mousemove` on the window, so drags survive leaving the track.
        const WINDOW_MOUSE_MOVE = 1 << 4;
        /// `mouseup` on the window.
        const WINDOW_MOUSE_UP   = 1 << 5;
        /// `contextmenu` on the track (suppressed).
        const CONTEXT_MENU      = 1 << 6;
        /// `mouseenter` on the container.
        const MOUSE_ENTER       = 1 << 7;
        /// `mouseleave` on the container.
        const MOUSE_LEAVE       = 1 << 8;
        /// `resize` on the window.
        const WINDOW_RESIZE     = 1 << 9;
        /// `click` on the previous button.
        const PREV_CLICK        = 1 << 10;
        /// `click` on the next button.
        const NEXT_CLICK        = 1 << 11;

        const POINTER = Self::TOUCH_START.bits()
            | Self::TOUCH_MOVE.bits()
            | Self::TOUCH_END.bits()
            | Self::MOUSE_DOWN.bits()
            | Self::WINDOW_MOUSE_MOVE.bits()
            | Self::WINDOW_MOUSE_UP.bits();
        const HOVER = Self::MOUSE_ENTER.bits() | Self::MOUSE_LEAVE.bits();
    }
}

impl Default for Listeners {
    fn default() -> Self {
        Self::empty()
    }
}

impl Listeners {
    /// The set a carousel attaches: pointer, context menu, and resize always;
    /// hover only with `pause_on_hover`; buttons only when present.
    #[must_use]
    pub fn for_mount(has_prev: bool, has_next: bool, pause_on_hover: bool) -> Self {
        let mut set = Self::POINTER | Self::CONTEXT_MENU | Self::WINDOW_RESIZE;
        set.set(Self::HOVER, pause_on_hover);
        set.set(Self::PREV_CLICK, has_prev);
        set.set(Self::NEXT_CLICK, has_next);
        set
    }
}
