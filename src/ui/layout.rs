use tui::layout::{Constraint, Layout, Rect, Size};
pub const TAB_BAR_HEIGHT: u16 = 3;
pub const LOG_PANE_HEIGHT: u16 = 10;

/// Pre-computed layout areas for the main draw loop.
pub struct LayoutAreas {
    pub tab_bar: [Rect; 2],
    pub main: Rect,
    /// Zero-sized unless the log pane is open.
    pub logs: Rect,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        let rect = Rect::new(0, 0, size.width, size.height);
        Self::from_rect(rect, false, false)
    }

    pub fn update(&mut self, area: Rect, full_screen: bool, show_logs: bool) {
        *self = Self::from_rect(area, full_screen, show_logs);
    }

    fn from_rect(area: Rect, full_screen: bool, show_logs: bool) -> Self {
        let (tab_bar, body) = if full_screen {
            ([Rect::ZERO, Rect::ZERO], area)
        } else {
            let [tab, body] =
                Layout::vertical([Constraint::Length(TAB_BAR_HEIGHT), Constraint::Fill(1)]).areas(area);
            (Self::split_tab_bar(tab), body)
        };

        if !show_logs {
            return LayoutAreas { tab_bar, main: body, logs: Rect::ZERO };
        }

        let [main, logs] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(LOG_PANE_HEIGHT)]).areas(body);
        LayoutAreas { tab_bar, main, logs }
    }

    fn split_tab_bar(area: Rect) -> [Rect; 2] {
        Layout::horizontal([Constraint::Percentage(85), Constraint::Percentage(15)]).areas(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_pane_takes_rows_from_the_bottom() {
        let mut layout = LayoutAreas::new(Size::new(100, 40));
        assert_eq!(layout.logs, Rect::ZERO);
        assert_eq!(layout.main.height, 40 - TAB_BAR_HEIGHT);

        layout.update(Rect::new(0, 0, 100, 40), false, true);
        assert_eq!(layout.logs.height, LOG_PANE_HEIGHT);
        assert_eq!(layout.main.height + LOG_PANE_HEIGHT, 40 - TAB_BAR_HEIGHT);

        layout.update(Rect::new(0, 0, 100, 40), true, false);
        assert_eq!(layout.main.height, 40);
        assert_eq!(layout.tab_bar[0], Rect::ZERO);
    }
}
