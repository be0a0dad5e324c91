/*!
 * Resources Module
 * Resource instances, allocation, waiting-queue promotion and deadlock recovery
 */

pub mod deadlock;
pub mod manager;
pub mod table;

pub use deadlock::{is_deadlocked, waiting_names, Recovery};
pub use manager::ResourceManager;
pub use table::{Acquire, Release, ResourceInstance, ResourceTable};
