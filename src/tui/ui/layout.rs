use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Rectangle of `percent_x` by `percent_y` of `r`, centered in it.
pub(super) fn popup(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Min(0),
        ])
        .split(r);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Min(0),
        ])
        .split(rows[1]);
    cols[1]
}

/// Keeps the last `height` lines, scrolled back by `offset`.
pub(super) fn tail_window<T>(lines: &[T], height: usize, offset: usize) -> &[T] {
    let end = lines.len().saturating_sub(offset);
    let start = end.saturating_sub(height);
    &lines[start..end]
}
