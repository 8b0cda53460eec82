pub mod codec;
pub mod errors;
pub mod store;
pub mod types;

pub use codec::{first_number, recover_action, recover_rule, TIME_FORMAT};
pub use errors::{SnapshotError, SnapshotResult};
pub use store::SnapshotStore;
pub use types::{Snapshot, SnapshotRule};
