pub mod cancellation;
pub mod cardioid;
pub mod engine;
pub mod error;
pub mod perturbation;
pub mod render;

pub use cancellation::{AtomicBoolChecker, CancellationChecker, NeverCancel, RowBudget};
pub use cardioid::{in_main_bulbs, in_main_bulbs_arbitrary};
pub use engine::{FractalEngine, PassKernel};
pub use error::EngineError;
pub use perturbation::{
    compute_orbit, compute_series, escape_hardware, escape_perturbed, escape_perturbed_traced,
    EscapePath, ReferenceOrbit, SeriesCoefficients,
};
pub use render::{render_pass, render_pass_parallel, RenderOutcome};

// Re-export core types for convenience
pub use deepbrot_core::*;
