pub mod layout;
pub mod setup;
pub mod widgets;
