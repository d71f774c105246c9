//! # Dispo Session
//!
//! 計劃會話狀態：變更覆寫、採購單連結與增量重算

pub mod dirty_tracking;
pub mod overlay;
pub mod po_link;
pub mod session;

// Re-export 主要類型
pub use dirty_tracking::DirtyTracker;
pub use overlay::{ChangeOutcome, ChangeStore};
pub use po_link::PoLinkRegistry;
pub use session::PlanningSession;
