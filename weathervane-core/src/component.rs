//! Component trait for pure UI elements

use ratatui::{layout::Rect, Frame};

use crate::event::EventKind;

/// A pure UI component that renders based on props and emits actions
///
/// Props carry everything needed to render. `handle_event` turns input into
/// actions and never mutates shared state; all data changes go through the
/// store.
///
/// ```ignore
/// impl Component<Action> for WeatherView {
///     type Props<'a> = WeatherViewProps<'a>;
///
///     fn handle_event(&mut self, event: &EventKind, _props: Self::Props<'_>) -> impl IntoIterator<Item = Action> {
///         match event {
///             EventKind::Key(key) if key.code == KeyCode::Char('l') => Some(Action::FeedbackLike),
///             _ => None,
///         }
///     }
///
///     fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) { /* ... */ }
/// }
/// ```
pub trait Component<A> {
    /// Data required to render the component (read-only)
    type Props<'a>;

    /// Handle an event and return actions to dispatch
    ///
    /// Default implementation returns no actions (render-only components).
    #[allow(unused_variables)]
    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = A> {
        None::<A>
    }

    /// Render the component to the frame
    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>);
}
