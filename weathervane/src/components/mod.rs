pub mod help_bar;
pub mod weather_view;

pub use weathervane_core::Component;

pub use help_bar::{HelpBar, HelpBarProps};
pub use weather_view::{WeatherView, WeatherViewProps, ERROR_ICON, LOCATION_ICON, SPINNERS};
