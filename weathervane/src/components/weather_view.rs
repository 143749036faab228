//! The weather screen
//!
//! Renders whatever `UiState` the machine last published and turns key
//! presses into actions. It never looks at the machine's internals.

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use weathervane_core::{Component, EventKind};

use super::{HelpBar, HelpBarProps};
use crate::action::Action;
use crate::state::{Feedback, UiState};

pub const LOCATION_ICON: &str = "📍 ";
pub const ERROR_ICON: &str = "⚠️";
pub const SPINNERS: [&str; 4] = ["◐", "◓", "◑", "◒"];

pub struct WeatherViewProps<'a> {
    pub ui: &'a UiState,
    /// Animation frame counter for the spinner
    pub tick: u32,
    pub is_focused: bool,
}

#[derive(Default)]
pub struct WeatherView;

impl Component<Action> for WeatherView {
    type Props<'a> = WeatherViewProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Char('l') | KeyCode::Char('+') => Some(Action::FeedbackLike),
                KeyCode::Char('d') | KeyCode::Char('-') => Some(Action::FeedbackDislike),
                KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let outer_block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Rgb(80, 80, 100)))
            .title(" ☁ Weather ")
            .title_style(Style::default().fg(Color::Cyan).bold())
            .title_alignment(Alignment::Center);

        frame.render_widget(outer_block.clone(), area);
        let inner = outer_block.inner(area);

        let [body_area, help_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

        let lines = body_lines(props.ui, props.tick);
        let [centered] = Layout::vertical([Constraint::Length(lines.len() as u16)])
            .flex(Flex::Center)
            .areas(body_area);
        frame.render_widget(Paragraph::new(lines), centered);

        let mut help = HelpBar;
        help.render(
            frame,
            help_area,
            HelpBarProps {
                show_feedback: matches!(props.ui, UiState::Loaded { .. }),
            },
        );
    }
}

fn body_lines(ui: &UiState, tick: u32) -> Vec<Line<'static>> {
    match ui {
        UiState::Loading => {
            let spinner = SPINNERS[(tick as usize / 2) % SPINNERS.len()];
            let dots = ".".repeat((tick as usize / 3) % 4);
            vec![Line::from(vec![
                Span::styled(spinner, Style::default().fg(Color::Cyan)),
                Span::styled(
                    format!(" Fetching weather{:<3}", dots),
                    Style::default().fg(Color::Gray),
                ),
            ])
            .centered()]
        }
        UiState::Loaded {
            description,
            temperature,
            icon,
            location,
            feedback,
        } => vec![
            Line::from(vec![
                Span::raw(LOCATION_ICON),
                Span::styled(location.clone(), Style::default().fg(Color::White).bold()),
            ])
            .centered(),
            blank_line(),
            Line::from(icon.clone()).centered(),
            blank_line(),
            Line::from(Span::styled(
                temperature.clone(),
                Style::default().fg(Color::Rgb(255, 220, 100)).bold(),
            ))
            .centered(),
            Line::from(Span::styled(
                description.clone(),
                Style::default().fg(Color::Gray),
            ))
            .centered(),
            blank_line(),
            feedback_line(*feedback),
        ],
        UiState::Error => vec![
            Line::from(ERROR_ICON).centered(),
            Line::from(Span::styled(
                "Error",
                Style::default().fg(Color::Red).bold(),
            ))
            .centered(),
            Line::from(Span::styled(
                "Weather is unavailable right now",
                Style::default().fg(Color::Rgb(200, 100, 100)),
            ))
            .centered(),
        ],
    }
}

fn feedback_line(feedback: Feedback) -> Line<'static> {
    let line = match feedback {
        Feedback::NotGiven => Line::from(Span::styled(
            "How is it out there?",
            Style::default().fg(Color::DarkGray),
        )),
        Feedback::Liked => Line::from(Span::styled(
            "👍 You like this weather",
            Style::default().fg(Color::Green),
        )),
        Feedback::Disliked => Line::from(Span::styled(
            "👎 You dislike this weather",
            Style::default().fg(Color::Rgb(255, 150, 80)),
        )),
    };
    line.centered()
}

fn blank_line() -> Line<'static> {
    Line::from("")
}
