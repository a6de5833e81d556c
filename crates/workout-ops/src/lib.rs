pub mod batch;
pub mod error;
pub mod mixer;
pub mod operation;
pub mod rebase;
pub mod store;

pub use batch::{apply_batch, decode_operations};
pub use error::{OperationError, StoreError};
pub use mixer::mix_workouts;
pub use operation::Operation;
pub use rebase::apply_with_rebase;
pub use store::{MemoryStore, WorkoutStore};
