//! Process table directory: one byte per process id inside frame 0, holding
//! the frame of that process's page table (0 = no process).

use crate::constants::*;
use crate::error::{SimError, SimResult};
use crate::memory::PhysicalMemory;

/// Address of the directory slot for `process`
pub fn directory_slot(process: usize) -> SimResult<usize> {
    if process >= N_FRAMES {
        return Err(SimError::InvalidProcess(process));
    }
    Ok(PhysicalMemory::frame_to_address(FREE_MAP_FRAME) + DIRECTORY_BASE + process)
}

impl PhysicalMemory {
    /// Raw directory entry; 0 when the process does not exist
    pub fn page_table_frame_of(&self, process: usize) -> SimResult<usize> {
        let slot = directory_slot(process)?;
        Ok(self.read(slot)? as usize)
    }

    pub fn page_table_of(&self, process: usize) -> SimResult<Option<usize>> {
        let frame = self.page_table_frame_of(process)?;
        Ok((frame != 0).then_some(frame))
    }

    /// Record `frame` as the page table of `process`. The frame must already
    /// be allocated.
    pub fn bind(&mut self, process: usize, frame: usize) -> SimResult<()> {
        let slot = directory_slot(process)?;
        if !(1..N_FRAMES).contains(&frame) {
            return Err(SimError::FrameOutOfRange(frame));
        }
        self.write(slot, frame as u8)
    }

    pub fn unbind(&mut self, process: usize) -> SimResult<()> {
        let slot = directory_slot(process)?;
        self.write(slot, 0)
    }
}
