//! Type inference and key detection.

mod keys;
mod overrides;
mod profile;
mod type_inference;

pub use keys::{DEFAULT_LOW_CARDINALITY_THRESHOLD, KeyCandidateDetector};
pub use overrides::TypeOverrides;
pub use profile::{ColumnProfile, distinct_count, profile_columns};
pub use type_inference::{InferenceConfig, TypeInferencer, boolean_truth, is_boolean_word};
