//! Sidebar width resolution.
//!
//! The conversation view reserves fixed pixel widths for the sources and
//! statistics sidebars depending on the viewport width. Collapsing a sidebar
//! zeroes its reservation without disturbing the other side.

/// Pixel widths reserved for the two sidebars at the current viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputBounds {
    pub left: u32,
    pub right: u32,
}

/// Resolves sidebar reservations for `viewport_width`.
///
/// Breakpoints, widest first: above 1400 px the sidebars get 300/320 px,
/// 1201 to 1400 px gets 280/300, 1025 to 1200 px gets 260/280, and at
/// 1024 px or below both sidebars collapse to zero regardless of the flags.
#[must_use]
pub fn input_bounds(viewport_width: u32, left_collapsed: bool, right_collapsed: bool) -> InputBounds {
    let (left, right) = if viewport_width > 1400 {
        (300, 320)
    } else if viewport_width > 1200 {
        (280, 300)
    } else if viewport_width > 1024 {
        (260, 280)
    } else {
        (0, 0)
    };

    InputBounds {
        left: if left_collapsed { 0 } else { left },
        right: if right_collapsed { 0 } else { right },
    }
}
