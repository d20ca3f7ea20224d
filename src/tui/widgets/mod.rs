pub mod advisory;
pub mod category_toggles;
pub mod color;
pub mod combined_tags;
pub mod help;
pub mod post_info;
pub mod status_bar;
pub mod url_input;

use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// Helper function to create a centered rect using up certain percentage of the available rect
/// Based on ratatui popup example: https://ratatui.rs/examples/apps/popup/
pub fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}
