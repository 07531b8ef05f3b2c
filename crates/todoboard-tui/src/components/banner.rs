use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::time::Duration;
use tokio::time::Instant;

use crate::theme::colors::ERROR_COLOR;

/// Transient one-line error notice drawn over the top of the screen.
#[derive(Debug, Clone)]
pub struct Banner {
    pub message: String,
    pub created_at: Instant,
}

impl Banner {
    pub const TTL: Duration = Duration::from_secs(5);

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            created_at: Instant::now(),
        }
    }

    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() > ttl
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let color = ERROR_COLOR;

        // Border plus one column of padding on each side.
        let box_width = (self.message.chars().count() + 4).min(area.width as usize) as u16;
        let centered_x = area.width.saturating_sub(box_width) / 2;
        let banner_area = Rect {
            x: area.x + centered_x,
            y: area.y,
            width: box_width,
            height: 3.min(area.height),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));
        let widget = Paragraph::new(self.message.as_str())
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(block);

        frame.render_widget(Clear, banner_area);
        frame.render_widget(widget, banner_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_banner_expires_after_ttl() {
        let banner = Banner::error("Failed to close task 1");
        assert!(!banner.is_expired(Banner::TTL));
        tokio::time::advance(Banner::TTL + Duration::from_millis(1)).await;
        assert!(banner.is_expired(Banner::TTL));
    }
}
