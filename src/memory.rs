use crate::constants::*;
use crate::error::{SimError, SimResult};

/// Simulated RAM. Frame 0 doubles as the free-frame map and the process
/// directory, so allocator state lives in the same bytes it manages.
pub struct PhysicalMemory {
    data: Box<[u8; MEM_SIZE]>,
}

impl PhysicalMemory {
    /// Create a new physical memory, zeroed with frame 0 marked used
    pub fn new() -> Self {
        let mut pm = PhysicalMemory { data: Box::new([0u8; MEM_SIZE]) };
        pm.initialize();
        pm
    }

    /// Zero every byte, then reserve frame 0 for the free map
    pub fn initialize(&mut self) {
        self.data.fill(0);
        self.data[FREE_MAP_FRAME] = FRAME_USED;
    }

    /// Read a byte from physical memory
    pub fn read(&self, address: usize) -> SimResult<u8> {
        self.data.get(address).copied().ok_or(SimError::OutOfRange(address))
    }

    /// Write a byte to physical memory
    pub fn write(&mut self, address: usize, value: u8) -> SimResult<()> {
        let cell = self.data.get_mut(address).ok_or(SimError::OutOfRange(address))?;
        *cell = value;
        Ok(())
    }

    /// Calculate the starting address of a frame
    #[inline]
    pub fn frame_to_address(frame: usize) -> usize {
        frame << PAGE_SHIFT
    }

    // =========================================================================
    // Frame allocator
    // =========================================================================

    /// Hand out the lowest-numbered free frame, zeroed.
    pub fn allocate_frame(&mut self) -> SimResult<usize> {
        let frame = (1..N_FRAMES)
            .find(|&frame| self.data[frame] == FRAME_FREE)
            .ok_or(SimError::Exhausted)?;
        self.data[frame] = FRAME_USED;
        let start = Self::frame_to_address(frame);
        self.data[start..start + FRAME_SIZE].fill(0);
        log::debug!("allocated frame {}", frame);
        Ok(frame)
    }

    /// Return a frame to the free map. Freeing a frame that is already free
    /// is not detected.
    pub fn free_frame(&mut self, frame: usize) -> SimResult<()> {
        if !(1..N_FRAMES).contains(&frame) {
            return Err(SimError::FrameOutOfRange(frame));
        }
        self.data[frame] = FRAME_FREE;
        log::debug!("freed frame {}", frame);
        Ok(())
    }

    /// `false` for frame 0 and for indices past the end
    pub fn is_frame_free(&self, frame: usize) -> bool {
        frame < N_FRAMES && self.data[frame] == FRAME_FREE
    }

    pub fn free_frame_count(&self) -> usize {
        self.data[..N_FRAMES].iter().filter(|&&b| b == FRAME_FREE).count()
    }

    /// One entry per frame, `true` when the frame is free
    pub fn free_frame_bitmap(&self) -> Vec<bool> {
        self.data[..N_FRAMES].iter().map(|&b| b == FRAME_FREE).collect()
    }

    // =========================================================================
    // Page table entries
    // =========================================================================

    /// Get a Page Table entry (0 when unmapped)
    #[inline]
    pub fn page_entry(&self, pt_frame: usize, page: usize) -> usize {
        self.data[Self::frame_to_address(pt_frame) + page] as usize
    }

    /// Set a Page Table entry
    pub fn set_page_entry(&mut self, pt_frame: usize, page: usize, frame: usize) {
        debug_assert!(page < N_FRAMES && frame < N_FRAMES);
        self.data[Self::frame_to_address(pt_frame) + page] = frame as u8;
    }

    /// Frames mapped by a page table, in virtual page order, up to the first
    /// unmapped entry.
    pub fn mapped_frames(&self, pt_frame: usize) -> Vec<usize> {
        (0..N_FRAMES)
            .map(|page| self.page_entry(pt_frame, page))
            .take_while(|&frame| frame != UNMAPPED as usize)
            .collect()
    }
}

impl Default for PhysicalMemory {
    fn default() -> Self {
        Self::new()
    }
}

/// Narrow an integer read from user input to a memory cell value.
pub fn byte_value(value: i64) -> SimResult<u8> {
    u8::try_from(value).map_err(|_| SimError::ValueOutOfRange(value))
}
