#[cfg(test)]
#[path = "scroll_test.rs"]
mod tests;

use ratatui::widgets::ScrollbarState;

/// Viewport over the rendered transcript. The position is always clamped so
/// the view can never run past the last line, and paging moves by half the
/// viewport height so a page keeps some context on screen.
#[derive(Default)]
pub struct Scroll {
    line_count: u16,
    viewport_height: u16,
    pub position: u16,
    pub scrollbar_state: ScrollbarState,
}

impl Scroll {
    fn max_position(&self) -> u16 {
        return self.line_count.saturating_sub(self.viewport_height);
    }

    fn page_step(&self) -> u16 {
        return (self.viewport_height / 2).max(1);
    }

    pub fn up(&mut self) {
        self.position = self.position.saturating_sub(1);
        self.scrollbar_state.prev();
    }

    pub fn down(&mut self) {
        self.position = self.position.saturating_add(1).min(self.max_position());
        self.scrollbar_state.next();
    }

    pub fn up_page(&mut self) {
        for _ in 0..self.page_step() {
            self.up();
        }
    }

    pub fn down_page(&mut self) {
        for _ in 0..self.page_step() {
            self.down();
        }
    }

    pub fn last(&mut self) {
        self.position = self.max_position();
        self.scrollbar_state.last();
    }

    pub fn set_state(&mut self, line_count: u16, viewport_height: u16) {
        self.line_count = line_count;
        self.viewport_height = viewport_height;
        self.position = self.position.min(self.max_position());
        self.scrollbar_state = self
            .scrollbar_state
            .content_length(line_count)
            .viewport_content_length(viewport_height);
    }
}
