use crate::constants::*;
use crate::error::{SimError, SimResult};
use crate::memory::PhysicalMemory;

/// Represents the decomposed components of a Virtual Address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualAddress {
    pub va: usize,
    pub page: usize,
    pub offset: usize,
}

impl VirtualAddress {
    /// Decompose a raw VA into its components
    pub fn from_raw(va: usize) -> Self {
        let page = va >> PAGE_SHIFT;
        let offset = va & OFFSET_MASK;

        VirtualAddress { va, page, offset }
    }

    /// Pack a page number and an in-page offset back into an address
    #[inline]
    pub fn compose(page: usize, offset: usize) -> usize {
        (page << PAGE_SHIFT) | (offset & OFFSET_MASK)
    }
}

impl std::fmt::Display for VirtualAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VA({}) = (page={}, offset={})", self.va, self.page, self.offset)
    }
}

/// Translate a virtual address of `process` to a physical address.
///
/// The lookup goes directory slot → page table frame → data frame. An
/// unmapped page is a page fault; there is no on-demand mapping.
pub fn translate(pm: &PhysicalMemory, process: usize, va: usize) -> SimResult<usize> {
    if process >= N_FRAMES {
        return Err(SimError::InvalidProcess(process));
    }
    if va >= MEM_SIZE {
        return Err(SimError::AddressOutOfRange(va));
    }
    let va = VirtualAddress::from_raw(va);

    let pt_frame = pm.page_table_of(process)?.ok_or(SimError::ProcessNotFound(process))?;

    let frame = pm.page_entry(pt_frame, va.page);
    if frame == UNMAPPED as usize {
        return Err(SimError::PageFault { process, page: va.page });
    }

    let pa = VirtualAddress::compose(frame, va.offset);
    assert!(pa < MEM_SIZE, "translated address {} outside physical memory", pa);
    log::trace!("proc {}: {} -> PA {}", process, va, pa);

    Ok(pa)
}
