//! Input field.
//!
//! Displays the message buffer with the cursor shown while the field has
//! focus.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};

use crate::input::{Focus, InputRouter};

const PROMPT_WIDTH: u16 = 3; // "> " inside the left border
const INPUT_LINE_OFFSET_Y: u16 = 1; // inside top border
const RIGHT_PADDING: u16 = 1; // inside right border

/// Render the input field.
pub fn render(frame: &mut Frame, router: &InputRouter, area: Rect) {
    let focused = router.focus() == Focus::Input;
    let border_style =
        if focused { Style::default().fg(Color::Cyan) } else { Style::default() };
    let block =
        Block::default().borders(Borders::ALL).border_style(border_style).title(" Message ");

    let input_text = format!("> {}", router.buffer());
    let paragraph =
        Paragraph::new(input_text).style(Style::default().fg(Color::White)).block(block);

    frame.render_widget(paragraph, area);

    if !focused {
        return;
    }

    #[allow(clippy::cast_possible_truncation)]
    let cursor_offset = (router.cursor() as u16)
        .min(area.width.saturating_sub(PROMPT_WIDTH + RIGHT_PADDING));

    let cursor_x = area.x.saturating_add(PROMPT_WIDTH).saturating_add(cursor_offset);
    let cursor_y = area.y.saturating_add(INPUT_LINE_OFFSET_Y);
    let max_x = area.x.saturating_add(area.width).saturating_sub(RIGHT_PADDING);

    frame.set_cursor_position((cursor_x.min(max_x), cursor_y));
}
