pub mod bigfloat;
pub mod complex;
pub mod config;
pub mod error;
pub mod escape_grid;
pub mod precision;
pub mod state;
pub mod view_window;

pub use bigfloat::BigFloat;
pub use complex::{ArbitraryComplex, FixedComplex};
pub use config::EngineConfig;
pub use error::StateError;
pub use escape_grid::{EscapeGrid, EscapeResult};
pub use precision::calculate_precision_bits;
pub use state::{LegacyViewState, ViewState};
pub use view_window::ViewWindow;
