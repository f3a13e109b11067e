//! Record types shared between the API and storage layers

pub mod event;

pub use event::{is_hex_color, Event, EventRow, DEFAULT_COLOR_HEX, DEFAULT_EMOJI};
