mod quiz;
mod settings;
mod state;

pub use quiz::QuizView;
pub use settings::SettingsView;
pub use state::{ViewError, ViewState, view_state_from_resource};

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;
