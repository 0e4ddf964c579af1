pub mod listing_card;
pub mod slider;

pub use listing_card::{listing_card, load_more_item};
pub use slider::recent_strip;
