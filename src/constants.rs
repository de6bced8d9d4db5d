pub const PAGE_SHIFT: u32 = 8;

pub const FRAME_SIZE: usize = 1 << PAGE_SHIFT;
pub const N_FRAMES: usize = 64;
pub const MEM_SIZE: usize = N_FRAMES * FRAME_SIZE;

pub const OFFSET_MASK: usize = FRAME_SIZE - 1;

// Frame 0 holds the free map in bytes [0, N_FRAMES) and the process
// directory in bytes [N_FRAMES, 2 * N_FRAMES).
pub const FREE_MAP_FRAME: usize = 0;
pub const DIRECTORY_BASE: usize = N_FRAMES;

// Free map and page table byte encodings
pub const FRAME_FREE: u8 = 0;
pub const FRAME_USED: u8 = 1;
pub const UNMAPPED: u8 = 0;

const _: () = assert!(MEM_SIZE == 16384);
const _: () = assert!(DIRECTORY_BASE + N_FRAMES <= FRAME_SIZE);
