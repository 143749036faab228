//! Effects - side effects declared by the reducer
//!
//! The reducer stays pure; the machine's effect handler performs these.

use crate::state::{Coordinates, Weather};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Start one fetch for the location emission tagged `generation`
    FetchWeather { coords: Coordinates, generation: u64 },

    /// Hand a tap to the feedback sink
    RecordFeedback { weather: Weather, liked: bool },
}
