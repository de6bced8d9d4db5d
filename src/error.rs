//! Error type shared by every simulator operation.

use std::fmt;

use crate::constants::N_FRAMES;

/// Which allocation a process creation was attempting when memory ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationStage {
    PageTable,
    DataPage(usize),
}

/// Errors reported by the simulator.
///
/// All of these are recovered at the command boundary: the front-end prints
/// the message and moves on to the next command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    /// Physical address outside the store
    OutOfRange(usize),
    /// Value does not fit in a memory cell
    ValueOutOfRange(i64),
    /// Frame index that may not be freed or bound (frame 0 or past the end)
    FrameOutOfRange(usize),
    /// Process id outside [0, N_FRAMES)
    InvalidProcess(usize),
    /// Process id or page count outside [0, N_FRAMES) on creation
    InvalidRequest { process: usize, pages: usize },
    /// Creation requested for a process that already has a page table
    ProcessExists(usize),
    /// No free frame left
    Exhausted,
    /// Process creation ran out of frames
    OutOfMemory { process: usize, stage: AllocationStage },
    /// Translation against a process with no page table
    ProcessNotFound(usize),
    /// Virtual address outside [0, MEM_SIZE)
    AddressOutOfRange(usize),
    /// Virtual page not mapped in the process's page table
    PageFault { process: usize, page: usize },
}

pub type SimResult<T> = Result<T, SimError>;

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::OutOfRange(addr) => write!(f, "physical address {} out of range", addr),
            SimError::ValueOutOfRange(value) => {
                write!(f, "value {} out of range [0-255]", value)
            }
            SimError::FrameOutOfRange(frame) => {
                write!(f, "frame {} out of range [1-{}]", frame, N_FRAMES - 1)
            }
            SimError::InvalidProcess(process) => {
                write!(f, "Requested process {} is not valid. [0-{}]", process, N_FRAMES - 1)
            }
            SimError::InvalidRequest { process, pages } => write!(
                f,
                "Invalid request: proc {} with {} pages. [0-{}]",
                process,
                pages,
                N_FRAMES - 1
            ),
            SimError::ProcessExists(process) => write!(f, "proc {} already exists", process),
            SimError::Exhausted => write!(f, "no free frames"),
            SimError::OutOfMemory { process, stage } => match stage {
                AllocationStage::PageTable => write!(f, "OOM: proc {}: page table", process),
                AllocationStage::DataPage(_) => write!(f, "OOM: proc {}: data page", process),
            },
            SimError::ProcessNotFound(process) => write!(f, "proc {} does not exist", process),
            SimError::AddressOutOfRange(va) => {
                write!(f, "virtual address {} out of range", va)
            }
            SimError::PageFault { process, page } => {
                write!(f, "Page fault: proc {}: virtual page {:02x} not mapped", process, page)
            }
        }
    }
}

impl std::error::Error for SimError {}
