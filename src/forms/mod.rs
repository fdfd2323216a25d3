//! Declarative form definitions and the generic flow driver.

pub mod engine;
pub mod state;
pub mod step;

pub use engine::{FormFlow, StepOutcome, Submission};
pub use state::{ConversationState, EvictionPolicy, IdleTimeout, NeverExpire, SessionStore};
pub use step::{FieldValidator, FormKind, Step, form_def};
