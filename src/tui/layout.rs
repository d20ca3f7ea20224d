use ratatui::layout::{Constraint, Direction, Layout as RatLayout, Rect};

pub struct Layout {
    pub inner_area: Rect, // Area inside the outer border
    pub input_area: Rect,
    pub post_area: Rect,
    pub toggles_area: Rect,
    pub tags_area: Rect,
    pub status_area: Rect,
}

impl Layout {
    /// Minimum terminal dimensions required for the application
    /// Height: 3 input + 5 post + 4 toggles (wrapped) + 3 tags + 1 status
    pub const MIN_WIDTH: u16 = 40;
    pub const MIN_HEIGHT: u16 = 16;

    pub fn calculate(size: Rect) -> Self {
        // Ensure minimum terminal size (accounting for outer border)
        let width = size.width.max(Self::MIN_WIDTH + 2);
        let height = size.height.max(Self::MIN_HEIGHT + 2);
        let size = Rect::new(size.x, size.y, width, height);

        let inner_area = Rect::new(
            size.x + 1,
            size.y + 1,
            size.width.saturating_sub(2),
            size.height.saturating_sub(2),
        );

        // Toggles wrap onto a second line on narrow terminals
        let toggles_height = if inner_area.width < 80 { 4 } else { 3 };

        let vertical = RatLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),              // URL input
                Constraint::Length(5),              // Post info / error
                Constraint::Length(toggles_height), // Category toggles
                Constraint::Min(3),                 // Combined tags
                Constraint::Length(1),              // Status
            ])
            .split(inner_area);

        Self {
            inner_area,
            input_area: vertical[0],
            post_area: vertical[1],
            toggles_area: vertical[2],
            tags_area: vertical[3],
            status_area: vertical[4],
        }
    }
}
