// Verdict - validation sessions with layered error messages
//
// This library runs rule chains over named fields, resolves the message of
// every failed rule and keeps the errors and values for later inspection.

// Re-export core functionality
pub use verdict_core::*;

// Re-export optional crates
#[cfg(feature = "validation")]
pub use verdict_validation;

#[cfg(feature = "log")]
pub use verdict_log;

// Prelude for common imports
pub mod prelude {
    pub use crate::{Error, HttpRequest, HttpResponse};

    #[cfg(feature = "validation")]
    pub use verdict_validation::{
        ErrorEntry, FieldKey, FieldRules, Input, Messages, Overrides, Rule, RuleChain,
        RuleFailure, RuleSpec, ValidationError, ValidationPipe, Validator, ValidatorConfig,
    };
}
