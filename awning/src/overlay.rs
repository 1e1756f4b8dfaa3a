//! Floating-panel placement for the dropdown.

use ratatui::layout::Rect;

/// Calculate the screen rectangle for the dropdown panel.
///
/// The panel is anchored below the anchor's left edge and shifted
/// horizontally as needed to stay inside the screen. When there is not
/// enough room below, it opens above the anchor instead.
pub fn panel_rect(screen: Rect, anchor: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(screen.width);
    let height = height.min(screen.height);
    let x = constrain_x(anchor.x, width, screen);

    let y_below = anchor.y + anchor.height;
    let fits_below = y_below + height <= screen.y + screen.height;
    if fits_below {
        Rect::new(x, y_below, width, height)
    } else {
        Rect::new(x, anchor.y.saturating_sub(height), width, height)
    }
}

/// Constrain an x position so a panel of `width` stays inside the screen.
fn constrain_x(x: u16, width: u16, screen: Rect) -> u16 {
    let max_x = screen.x + screen.width.saturating_sub(width);
    x.min(max_x).max(screen.x)
}
