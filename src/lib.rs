pub mod constants;
pub mod directory;
pub mod error;
pub mod io;
pub mod logger;
pub mod memory;
pub mod process;
pub mod report;
pub mod translation;
pub mod vm_manager;

// Re-export commonly used items for convenience
pub use constants::*;
pub use error::{AllocationStage, SimError, SimResult};
pub use process::CreationPolicy;
pub use translation::VirtualAddress;
pub use vm_manager::{PageMapping, VmManager};
