//! The three cooperating searches over the modal-editor simulator: cursor
//! movement, single-region edits, and their composition across a whole
//! transcript, all priced by the biomechanical effort model.

pub mod analyze;
pub mod composition;
pub mod edit;
pub mod levenshtein;
pub mod movement;
pub mod params;
pub mod reach;
pub mod result;
pub mod sequence;

pub use analyze::{Analyzer, LayoutKind};
pub use composition::CompositionOptimizer;
pub use edit::EditOptimizer;
pub use levenshtein::Levenshtein;
pub use movement::{MotionExclusions, MovementOptimizer};
pub use params::OptimizerParams;
pub use result::{EditMatrix, EditPath, RangeResult, SearchResult};
pub use sequence::{flatten_sequences, format_sequences, Sequence};
