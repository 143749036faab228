use ratatui::{
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use weathervane_core::Component;

use crate::action::Action;

pub struct HelpBar;

pub struct HelpBarProps {
    /// Show the like/dislike keys (only useful once weather is on screen)
    pub show_feedback: bool,
}

impl Component<Action> for HelpBar {
    type Props<'a> = HelpBarProps;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let key = Style::default().fg(Color::Cyan).bold();
        let label = Style::default().fg(Color::DarkGray);

        let mut spans = Vec::with_capacity(6);
        if props.show_feedback {
            spans.push(Span::styled(" l", key));
            spans.push(Span::styled(" like  ", label));
            spans.push(Span::styled("d", key));
            spans.push(Span::styled(" dislike  ", label));
        }
        spans.push(Span::styled("q", key));
        spans.push(Span::styled(" quit ", label));

        frame.render_widget(Paragraph::new(Line::from(spans).centered()), area);
    }
}
