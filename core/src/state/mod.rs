pub mod slot;
pub mod store;

pub use slot::{SlotState, SlotTimer, Visibility};
pub use store::SlotStateStore;
