//! Hover tooltip placement.
//!
//! The tooltip follows the mouse, sitting up and to the right of the cursor,
//! and flips sides to stay inside the viewport.

/// Width and height in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Top-left corner of the tooltip, viewport-relative.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TooltipPosition {
    pub top: f64,
    pub left: f64,
}

const OFFSET_X: f64 = 14.0;
const OFFSET_Y: f64 = 34.0;

/// Place a tooltip of `tooltip` size for a cursor at (`x`, `y`).
pub fn place_tooltip(x: f64, y: f64, tooltip: Size, viewport: Size) -> TooltipPosition {
    let mut top = y - OFFSET_Y;
    let mut left = x + OFFSET_X;

    // Off the right edge: go to the left of the cursor.
    if left + tooltip.width > viewport.width {
        left -= tooltip.width + 36.0;
    }

    if left < 0.0 {
        // Too wide for either side: pin to the left edge, above the cursor,
        // or below it if that runs off the top.
        left = 0.0;
        top -= tooltip.height - 22.0;
        if top < 0.0 {
            top += tooltip.height + 47.0;
        }
    } else if top < 0.0 {
        top = 0.0;
    } else if top + tooltip.height > viewport.height {
        top = viewport.height - tooltip.height;
    }

    TooltipPosition { top, left }
}
