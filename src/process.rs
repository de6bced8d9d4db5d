//! Process lifecycle: building a page table with its data frames, and
//! tearing it all down again.

use crate::constants::*;
use crate::error::{AllocationStage, SimError, SimResult};
use crate::memory::PhysicalMemory;

/// What to do when memory runs out halfway through creating a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreationPolicy {
    /// Keep the page table and whatever data pages were allocated
    #[default]
    Partial,
    /// Tear the process back down before reporting the failure
    AllOrNothing,
}

/// Allocate a page table for `process` and map `page_count` fresh frames at
/// virtual pages `0..page_count`. Returns the page table frame.
pub fn create_process(
    pm: &mut PhysicalMemory,
    process: usize,
    page_count: usize,
    policy: CreationPolicy,
) -> SimResult<usize> {
    if process >= N_FRAMES || page_count >= N_FRAMES {
        return Err(SimError::InvalidRequest { process, pages: page_count });
    }
    if pm.page_table_of(process)?.is_some() {
        return Err(SimError::ProcessExists(process));
    }

    let pt_frame = pm
        .allocate_frame()
        .map_err(|_| out_of_memory(process, AllocationStage::PageTable))?;
    pm.bind(process, pt_frame)?;

    for page in 0..page_count {
        let frame = match pm.allocate_frame() {
            Ok(frame) => frame,
            Err(_) => {
                if policy == CreationPolicy::AllOrNothing {
                    destroy_process(pm, process)?;
                }
                return Err(out_of_memory(process, AllocationStage::DataPage(page)));
            }
        };
        pm.set_page_entry(pt_frame, page, frame);
    }

    log::info!("proc {}: page table in frame {}, {} pages", process, pt_frame, page_count);
    Ok(pt_frame)
}

fn out_of_memory(process: usize, stage: AllocationStage) -> SimError {
    log::warn!("proc {}: out of frames ({:?})", process, stage);
    SimError::OutOfMemory { process, stage }
}

/// Every frame `process` owns: its page table first, then its data frames
/// in virtual page order. Empty if the process does not exist.
pub fn owned_frames(pm: &PhysicalMemory, process: usize) -> SimResult<Vec<usize>> {
    let Some(pt_frame) = pm.page_table_of(process)? else {
        return Ok(Vec::new());
    };
    let mut frames = vec![pt_frame];
    frames.extend(pm.mapped_frames(pt_frame));
    Ok(frames)
}

/// Free every frame of `process` and clear its directory entry. Destroying
/// a process that does not exist does nothing. Returns the freed frames.
pub fn destroy_process(pm: &mut PhysicalMemory, process: usize) -> SimResult<Vec<usize>> {
    let frames = owned_frames(pm, process)?;
    if frames.is_empty() {
        log::debug!("proc {}: nothing to destroy", process);
        return Ok(frames);
    }

    if let Some(&bad) = frames.iter().find(|&&frame| !(1..N_FRAMES).contains(&frame)) {
        log::warn!("proc {}: page table holds invalid frame {}", process, bad);
        return Err(SimError::FrameOutOfRange(bad));
    }

    pm.unbind(process)?;
    for &frame in &frames {
        pm.free_frame(frame)?;
    }

    log::info!("proc {}: released {} frames", process, frames.len());
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_process_layout() {
        let mut pm = PhysicalMemory::new();
        let pt = create_process(&mut pm, 17, 2, CreationPolicy::Partial).unwrap();

        assert_eq!(pt, 1);
        assert_eq!(pm.page_table_of(17), Ok(Some(1)));
        assert_eq!(pm.page_entry(1, 0), 2);
        assert_eq!(pm.page_entry(1, 1), 3);
        assert_eq!(pm.page_entry(1, 2), 0);
        assert_eq!(owned_frames(&pm, 17), Ok(vec![1, 2, 3]));
    }

    #[test]
    fn test_create_process_zero_pages() {
        let mut pm = PhysicalMemory::new();
        create_process(&mut pm, 0, 0, CreationPolicy::Partial).unwrap();
        assert_eq!(owned_frames(&pm, 0), Ok(vec![1]));
    }

    #[test]
    fn test_create_process_invalid_request() {
        let mut pm = PhysicalMemory::new();
        assert_eq!(
            create_process(&mut pm, 64, 1, CreationPolicy::Partial),
            Err(SimError::InvalidRequest { process: 64, pages: 1 })
        );
        assert_eq!(
            create_process(&mut pm, 1, 64, CreationPolicy::Partial),
            Err(SimError::InvalidRequest { process: 1, pages: 64 })
        );
        assert_eq!(pm.free_frame_count(), N_FRAMES - 1);
    }

    #[test]
    fn test_create_existing_process_rejected() {
        let mut pm = PhysicalMemory::new();
        create_process(&mut pm, 4, 1, CreationPolicy::Partial).unwrap();
        let before = pm.free_frame_bitmap();

        assert_eq!(
            create_process(&mut pm, 4, 3, CreationPolicy::Partial),
            Err(SimError::ProcessExists(4))
        );
        assert_eq!(pm.free_frame_bitmap(), before);
    }

    #[test]
    fn test_oom_on_page_table() {
        let mut pm = PhysicalMemory::new();
        create_process(&mut pm, 1, 62, CreationPolicy::Partial).unwrap();
        assert_eq!(pm.free_frame_count(), 0);

        assert_eq!(
            create_process(&mut pm, 2, 0, CreationPolicy::Partial),
            Err(SimError::OutOfMemory { process: 2, stage: AllocationStage::PageTable })
        );
        assert_eq!(pm.page_table_of(2), Ok(None));
    }

    #[test]
    fn test_oom_partial_keeps_allocated_pages() {
        let mut pm = PhysicalMemory::new();
        create_process(&mut pm, 1, 59, CreationPolicy::Partial).unwrap();
        assert_eq!(pm.free_frame_count(), 3);

        // page table + 2 data pages fit, the third does not
        assert_eq!(
            create_process(&mut pm, 2, 5, CreationPolicy::Partial),
            Err(SimError::OutOfMemory { process: 2, stage: AllocationStage::DataPage(2) })
        );
        assert_eq!(owned_frames(&pm, 2), Ok(vec![61, 62, 63]));
        assert_eq!(pm.free_frame_count(), 0);

        // the half-built process still tears down cleanly
        destroy_process(&mut pm, 2).unwrap();
        assert_eq!(pm.free_frame_count(), 3);
    }

    #[test]
    fn test_oom_all_or_nothing_rolls_back() {
        let mut pm = PhysicalMemory::new();
        create_process(&mut pm, 1, 59, CreationPolicy::Partial).unwrap();
        let before = pm.free_frame_bitmap();

        assert_eq!(
            create_process(&mut pm, 2, 5, CreationPolicy::AllOrNothing),
            Err(SimError::OutOfMemory { process: 2, stage: AllocationStage::DataPage(2) })
        );
        assert_eq!(pm.page_table_of(2), Ok(None));
        assert_eq!(pm.free_frame_bitmap(), before);
    }

    #[test]
    fn test_destroy_frees_everything() {
        let mut pm = PhysicalMemory::new();
        create_process(&mut pm, 9, 4, CreationPolicy::Partial).unwrap();

        let freed = destroy_process(&mut pm, 9).unwrap();

        assert_eq!(freed, vec![1, 2, 3, 4, 5]);
        assert!(freed.iter().all(|&f| pm.is_frame_free(f)));
        assert_eq!(pm.page_table_of(9), Ok(None));
        assert_eq!(pm.free_frame_count(), N_FRAMES - 1);
    }

    #[test]
    fn test_destroy_then_create_smaller() {
        let mut pm = PhysicalMemory::new();
        create_process(&mut pm, 1, 2, CreationPolicy::Partial).unwrap();
        destroy_process(&mut pm, 1).unwrap();

        // frame 1 comes back as the new page table and must start empty
        assert_eq!(create_process(&mut pm, 2, 0, CreationPolicy::Partial), Ok(1));
        assert_eq!(owned_frames(&pm, 2), Ok(vec![1]));
        assert!(pm.is_frame_free(2));
        assert!(pm.is_frame_free(3));
    }

    #[test]
    fn test_destroy_after_mixed_reuse_keeps_neighbours() {
        let mut pm = PhysicalMemory::new();
        create_process(&mut pm, 1, 2, CreationPolicy::Partial).unwrap();
        destroy_process(&mut pm, 1).unwrap();
        create_process(&mut pm, 2, 1, CreationPolicy::Partial).unwrap();
        create_process(&mut pm, 3, 0, CreationPolicy::Partial).unwrap();

        assert_eq!(owned_frames(&pm, 2), Ok(vec![1, 2]));
        assert_eq!(owned_frames(&pm, 3), Ok(vec![3]));

        assert_eq!(destroy_process(&mut pm, 2), Ok(vec![1, 2]));
        assert!(!pm.is_frame_free(3));
        assert_eq!(owned_frames(&pm, 3), Ok(vec![3]));
    }

    #[test]
    fn test_data_frame_reused_as_page_table() {
        let mut pm = PhysicalMemory::new();
        create_process(&mut pm, 1, 1, CreationPolicy::Partial).unwrap();
        // data page of proc 1 is frame 2
        pm.write(PhysicalMemory::frame_to_address(2), 200).unwrap();
        pm.write(PhysicalMemory::frame_to_address(2) + 1, 9).unwrap();
        destroy_process(&mut pm, 1).unwrap();

        create_process(&mut pm, 4, 0, CreationPolicy::Partial).unwrap();
        create_process(&mut pm, 5, 1, CreationPolicy::Partial).unwrap();
        assert_eq!(pm.page_table_of(5), Ok(Some(2)));
        assert_eq!(owned_frames(&pm, 5), Ok(vec![2, 3]));

        assert_eq!(destroy_process(&mut pm, 5), Ok(vec![2, 3]));
        assert_eq!(owned_frames(&pm, 4), Ok(vec![1]));
    }

    #[test]
    fn test_destroy_corrupt_table_changes_nothing() {
        let mut pm = PhysicalMemory::new();
        create_process(&mut pm, 5, 1, CreationPolicy::Partial).unwrap();
        // page table is frame 1; plant a bogus entry after the real one
        pm.write(PhysicalMemory::frame_to_address(1) + 1, 200).unwrap();
        let before = pm.free_frame_bitmap();

        assert_eq!(destroy_process(&mut pm, 5), Err(SimError::FrameOutOfRange(200)));
        assert_eq!(pm.page_table_of(5), Ok(Some(1)));
        assert_eq!(pm.free_frame_bitmap(), before);
    }

    #[test]
    fn test_destroy_missing_process_is_noop() {
        let mut pm = PhysicalMemory::new();
        create_process(&mut pm, 1, 1, CreationPolicy::Partial).unwrap();

        assert_eq!(destroy_process(&mut pm, 2), Ok(Vec::new()));
        assert_eq!(pm.free_frame_count(), N_FRAMES - 3);
        assert_eq!(destroy_process(&mut pm, 64), Err(SimError::InvalidProcess(64)));
    }

    #[test]
    fn test_destroy_leaves_other_processes_alone() {
        let mut pm = PhysicalMemory::new();
        create_process(&mut pm, 1, 2, CreationPolicy::Partial).unwrap();
        create_process(&mut pm, 2, 2, CreationPolicy::Partial).unwrap();

        destroy_process(&mut pm, 1).unwrap();

        assert_eq!(owned_frames(&pm, 2), Ok(vec![4, 5, 6]));
        assert!(!pm.is_frame_free(4));
    }
}
