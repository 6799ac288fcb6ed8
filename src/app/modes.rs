//! Presentation mode of the registration form.
//!
//! The same form is hosted in one of two containers depending on the width of
//! the viewport it is shown in:
//!
//! - **Dialog**: centered modal, used on wide viewports
//! - **Drawer**: bottom sheet with extra event details, used on narrow ones
//!
//! # Example
//!
//! ```rust
//! use eventdesk::app::modes::Presentation;
//!
//! assert_eq!(Presentation::for_viewport_width(767), Presentation::Drawer);
//! assert_eq!(Presentation::for_viewport_width(768), Presentation::Dialog);
//! ```

/// Viewports narrower than this many pixels get the drawer.
pub const MOBILE_BREAKPOINT_PX: u32 = 768;

/// Container the registration form is presented in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// Modal dialog for desktop widths.
    Dialog,

    /// Bottom drawer for mobile widths.
    ///
    /// Shows the event date, location and remaining spots above the form.
    Drawer,
}

impl Presentation {
    /// Picks the container for a viewport `width` in pixels.
    #[must_use]
    pub const fn for_viewport_width(width: u32) -> Self {
        if width < MOBILE_BREAKPOINT_PX {
            Self::Drawer
        } else {
            Self::Dialog
        }
    }

    #[must_use]
    pub const fn is_drawer(self) -> bool {
        matches!(self, Self::Drawer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoint_is_exclusive() {
        assert_eq!(Presentation::for_viewport_width(0), Presentation::Drawer);
        assert_eq!(Presentation::for_viewport_width(767), Presentation::Drawer);
        assert_eq!(Presentation::for_viewport_width(768), Presentation::Dialog);
        assert_eq!(Presentation::for_viewport_width(1920), Presentation::Dialog);
    }
}
