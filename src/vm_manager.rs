use crate::constants::*;
use crate::error::SimResult;
use crate::io::Command;
use crate::memory::PhysicalMemory;
use crate::process::{self, CreationPolicy};
use crate::report;
use crate::translation;

/// One mapped page table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMapping {
    pub virtual_page: usize,
    pub frame: usize,
}

/// Owns the simulated RAM and routes every operation through it.
pub struct VmManager {
    pm: PhysicalMemory,
    policy: CreationPolicy,
}

impl VmManager {
    pub fn new(policy: CreationPolicy) -> Self {
        VmManager { pm: PhysicalMemory::new(), policy }
    }

    /// Reset memory to its just-booted state
    pub fn initialize_memory(&mut self) {
        self.pm.initialize();
    }

    pub fn memory(&self) -> &PhysicalMemory {
        &self.pm
    }

    pub fn policy(&self) -> CreationPolicy {
        self.policy
    }

    pub fn create_process(&mut self, process: usize, page_count: usize) -> SimResult<()> {
        process::create_process(&mut self.pm, process, page_count, self.policy).map(|_| ())
    }

    pub fn destroy_process(&mut self, process: usize) -> SimResult<()> {
        process::destroy_process(&mut self.pm, process).map(|_| ())
    }

    pub fn translate(&self, process: usize, va: usize) -> SimResult<usize> {
        translation::translate(&self.pm, process, va)
    }

    pub fn load(&self, process: usize, va: usize) -> SimResult<u8> {
        self.load_at(process, va).map(|(_, value)| value)
    }

    pub fn store(&mut self, process: usize, va: usize, value: u8) -> SimResult<()> {
        self.store_at(process, va, value).map(|_| ())
    }

    /// Load a byte, also returning the physical address it came from
    pub fn load_at(&self, process: usize, va: usize) -> SimResult<(usize, u8)> {
        let pa = self.translate(process, va)?;
        Ok((pa, self.pm.read(pa)?))
    }

    /// Store a byte, returning the physical address written
    pub fn store_at(&mut self, process: usize, va: usize, value: u8) -> SimResult<usize> {
        let pa = self.translate(process, va)?;
        self.pm.write(pa, value)?;
        Ok(pa)
    }

    /// One entry per frame, `true` when free
    pub fn free_frame_bitmap(&self) -> Vec<bool> {
        self.pm.free_frame_bitmap()
    }

    /// Mapped entries of a process's page table. Empty if the process does
    /// not exist.
    pub fn page_table_snapshot(&self, process: usize) -> SimResult<Vec<PageMapping>> {
        let Some(pt_frame) = self.pm.page_table_of(process)? else {
            return Ok(Vec::new());
        };
        Ok((0..N_FRAMES)
            .map(|virtual_page| PageMapping {
                virtual_page,
                frame: self.pm.page_entry(pt_frame, virtual_page),
            })
            .filter(|mapping| mapping.frame != UNMAPPED as usize)
            .collect())
    }

    /// Run one command, returning the text it reports (if any).
    pub fn execute(&mut self, command: &Command) -> SimResult<Option<String>> {
        match *command {
            Command::NewProcess { process, pages } => {
                self.create_process(process, pages)?;
                Ok(None)
            }
            Command::KillProcess { process } => {
                self.destroy_process(process)?;
                Ok(None)
            }
            Command::PrintFreeMap => Ok(Some(report::render_free_map(&self.free_frame_bitmap()))),
            Command::PrintPageTable { process } => {
                let mappings = self.page_table_snapshot(process)?;
                Ok(Some(report::render_page_table(process, &mappings)))
            }
            Command::Store { process, va, value } => {
                let pa = self.store_at(process, va, value)?;
                Ok(Some(format!("Store proc {}: {} => {}, value={}\n", process, va, pa, value)))
            }
            Command::Load { process, va } => {
                let (pa, value) = self.load_at(process, va)?;
                Ok(Some(format!("Load proc {}: {} => {}, value={}\n", process, va, pa, value)))
            }
        }
    }
}

impl Default for VmManager {
    fn default() -> Self {
        Self::new(CreationPolicy::default())
    }
}
