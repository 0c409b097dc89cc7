pub mod catalog;
pub mod notify;
pub mod projector;
pub mod reconciler;
pub mod session;
pub mod tabs;

pub use catalog::{MovieCatalog, TmdbCatalog};
pub use projector::{Projector, ViewMode};
pub use reconciler::{Reconciler, TrackedIndex, Transition};
pub use tabs::{Tab, TabController};
