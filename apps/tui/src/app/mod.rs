// Application state, view models and key handling for the dashboard

pub mod actions;
pub mod filter_panel;
pub mod input;
pub mod state;
pub mod views;

pub use input::handle_input;
pub use state::App;
