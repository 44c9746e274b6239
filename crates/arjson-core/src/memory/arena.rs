//! Bump arena that owns every node, element table and unescaped string of a tree
//!
//! Memory is handed out from fixed-size blocks (64 KiB by default). A request
//! that can never fit into a standard block gets a dedicated block of exactly
//! the requested size, which is tracked separately and never bump-allocated
//! from. Addresses stay stable until the arena is dropped: blocks are never
//! moved, compacted or freed early.
//!
//! Allocation takes `&self`, so any number of references into the arena may
//! be alive at the same time. [`Arena::reset`] takes `&mut self`, which makes
//! the borrow checker prove that none of them survive the rewind.
//!
//! Running out of system memory is fatal: block acquisition goes through
//! [`std::alloc::handle_alloc_error`], the same way `Vec` and `Box` fail.

use std::{
    alloc::{self, Layout},
    cell::{Cell, RefCell},
    fmt, mem,
    ptr::{self, NonNull},
    slice, str,
};

/// Alignment of every standard block
const BLOCK_ALIGN: usize = 16;

/// Smallest block size accepted by [`Arena::with_block_size`]
const MIN_BLOCK_SIZE: usize = 64;

/// One system allocation owned by the arena
struct Block {
    ptr: NonNull<u8>,
    layout: Layout,
}

// SAFETY: a block is the unique owner of its allocation; nothing else holds
// the pointer once the arena moves to another thread.
unsafe impl Send for Block {}

impl Block {
    fn new(size: usize, align: usize) -> Self {
        let layout = Layout::from_size_align(size, align)
            .unwrap_or_else(|_| capacity_overflow(size));
        // SAFETY: callers never request zero-sized blocks
        let raw = unsafe { alloc::alloc(layout) };
        let ptr = NonNull::new(raw).unwrap_or_else(|| alloc::handle_alloc_error(layout));
        Self { ptr, layout }
    }

    fn size(&self) -> usize {
        self.layout.size()
    }

    fn base(&self) -> usize {
        self.ptr.as_ptr() as usize
    }
}

impl Drop for Block {
    fn drop(&mut self) {
        // SAFETY: ptr was returned by `alloc::alloc` with exactly this layout
        unsafe { alloc::dealloc(self.ptr.as_ptr(), self.layout) }
    }
}

#[cold]
fn capacity_overflow(size: usize) -> ! {
    panic!("arena allocation of {size} bytes exceeds the address space")
}

/// Block-based bump allocator
///
/// All tree storage produced by the parser and the builders lives here and
/// shares the arena's lifetime. There is no per-value destruction: `alloc*`
/// only accepts `Copy` types, which never own resources.
pub struct Arena {
    block_size: usize,
    /// Standard blocks in acquisition order; never empty
    blocks: RefCell<Vec<Block>>,
    /// Dedicated blocks for oversize requests
    large: RefCell<Vec<Block>>,
    /// Index of the block currently bump-allocated from
    current: Cell<usize>,
    /// Bump offset inside the current block
    offset: Cell<usize>,
    /// Bytes handed out since construction or the last reset
    allocated: Cell<usize>,
}

/// Memory usage snapshot of an [`Arena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaStats {
    /// Standard blocks acquired so far
    pub blocks: usize,
    /// Dedicated oversize blocks acquired so far
    pub large_blocks: usize,
    /// Bytes handed out since construction or the last reset
    pub bytes_allocated: usize,
    /// Total bytes held from the system allocator
    pub capacity: usize,
}

impl Arena {
    /// Default size of a standard block
    pub const DEFAULT_BLOCK_SIZE: usize = 64 * 1024;

    /// Create an arena with 64 KiB blocks
    pub fn new() -> Self {
        Self::with_block_size(Self::DEFAULT_BLOCK_SIZE)
    }

    /// Create an arena with a custom standard block size
    ///
    /// The first block is acquired immediately. Sizes below 64 bytes are
    /// rounded up.
    pub fn with_block_size(block_size: usize) -> Self {
        let block_size = block_size.max(MIN_BLOCK_SIZE);
        tracing::trace!(block_size, "acquiring initial arena block");
        Self {
            block_size,
            blocks: RefCell::new(vec![Block::new(block_size, BLOCK_ALIGN)]),
            large: RefCell::new(Vec::new()),
            current: Cell::new(0),
            offset: Cell::new(0),
            allocated: Cell::new(0),
        }
    }

    /// Size of a standard block in bytes
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Allocate `count` default-valued, properly aligned slots of `T`
    #[allow(clippy::mut_from_ref)]
    pub fn alloc<T: Copy + Default>(&self, count: usize) -> &mut [T] {
        let ptr = self.alloc_uninit::<T>(count);
        // SAFETY: `ptr` is valid for `count` writes of `T` and is not aliased
        unsafe {
            for i in 0..count {
                ptr.as_ptr().add(i).write(T::default());
            }
            slice::from_raw_parts_mut(ptr.as_ptr(), count)
        }
    }

    /// Move a single value into the arena
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_value<T: Copy>(&self, value: T) -> &mut T {
        let ptr = self.alloc_uninit::<T>(1);
        // SAFETY: `ptr` is valid, aligned and unaliased storage for one `T`
        unsafe {
            ptr.as_ptr().write(value);
            &mut *ptr.as_ptr()
        }
    }

    /// Copy a slice into a fixed arena slice of the same length
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_slice_copy<T: Copy>(&self, src: &[T]) -> &mut [T] {
        let ptr = self.alloc_uninit::<T>(src.len());
        // SAFETY: destination is fresh arena memory and cannot overlap `src`
        unsafe {
            ptr::copy_nonoverlapping(src.as_ptr(), ptr.as_ptr(), src.len());
            slice::from_raw_parts_mut(ptr.as_ptr(), src.len())
        }
    }

    /// Zero-filled byte buffer
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_bytes(&self, len: usize) -> &mut [u8] {
        self.alloc::<u8>(len)
    }

    /// Copy a string into the arena
    pub fn alloc_str(&self, s: &str) -> &str {
        let bytes = self.alloc_slice_copy(s.as_bytes());
        // SAFETY: the bytes were copied verbatim from a `&str`
        unsafe { str::from_utf8_unchecked(bytes) }
    }

    /// Rewind to the start of the first block
    ///
    /// Every earlier allocation becomes dead. Standard blocks are kept and
    /// refilled in order before any new block is acquired; dedicated
    /// oversize blocks stay owned until the arena is dropped.
    pub fn reset(&mut self) {
        tracing::debug!(
            bytes_allocated = self.allocated.get(),
            blocks = self.blocks.get_mut().len(),
            "resetting arena"
        );
        self.current.set(0);
        self.offset.set(0);
        self.allocated.set(0);
    }

    /// Current memory usage
    pub fn stats(&self) -> ArenaStats {
        let blocks = self.blocks.borrow();
        let large = self.large.borrow();
        ArenaStats {
            blocks: blocks.len(),
            large_blocks: large.len(),
            bytes_allocated: self.allocated.get(),
            capacity: blocks.iter().chain(large.iter()).map(Block::size).sum(),
        }
    }

    fn alloc_uninit<T>(&self, count: usize) -> NonNull<T> {
        if count == 0 || mem::size_of::<T>() == 0 {
            return NonNull::dangling();
        }
        let layout = Layout::array::<T>(count)
            .unwrap_or_else(|_| capacity_overflow(count.saturating_mul(mem::size_of::<T>())));
        self.alloc_layout(layout).cast()
    }

    fn alloc_layout(&self, layout: Layout) -> NonNull<u8> {
        let (size, align) = (layout.size(), layout.align());
        let worst_case = if align <= BLOCK_ALIGN {
            size
        } else {
            size.saturating_add(align - 1)
        };
        if worst_case > self.block_size {
            return self.alloc_large(layout);
        }
        // A fresh block always satisfies `worst_case <= block_size`.
        loop {
            if let Some(ptr) = self.try_bump(size, align) {
                return ptr;
            }
            self.next_block();
        }
    }

    fn try_bump(&self, size: usize, align: usize) -> Option<NonNull<u8>> {
        let blocks = self.blocks.borrow();
        let block = &blocks[self.current.get()];
        let cursor = block.base() + self.offset.get();
        let aligned = cursor.checked_add(align - 1)? & !(align - 1);
        let start = aligned - block.base();
        let end = start.checked_add(size)?;
        if end > block.size() {
            return None;
        }
        self.offset.set(end);
        self.allocated.set(self.allocated.get() + size);
        // SAFETY: `start..end` lies within the block
        Some(unsafe { NonNull::new_unchecked(block.ptr.as_ptr().add(start)) })
    }

    fn next_block(&self) {
        let mut blocks = self.blocks.borrow_mut();
        let next = self.current.get() + 1;
        if next == blocks.len() {
            tracing::trace!(
                block_size = self.block_size,
                blocks = next + 1,
                "acquiring arena block"
            );
            blocks.push(Block::new(self.block_size, BLOCK_ALIGN));
        }
        self.current.set(next);
        self.offset.set(0);
    }

    fn alloc_large(&self, layout: Layout) -> NonNull<u8> {
        tracing::debug!(
            size = layout.size(),
            block_size = self.block_size,
            "acquiring dedicated arena block"
        );
        let block = Block::new(layout.size(), layout.align());
        let ptr = block.ptr;
        self.large.borrow_mut().push(block);
        self.allocated.set(self.allocated.get() + layout.size());
        ptr
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("block_size", &self.block_size)
            .field("stats", &self.stats())
            .finish()
    }
}
