//! In-process reader for when the overlay runs inside the host

use super::{MemoryError, MemoryReader, Result};

/// Reads the current process's address space through raw pointers
#[derive(Debug)]
pub struct LocalMemory {
    _private: (),
}

impl LocalMemory {
    /// Create a reader over the current process.
    ///
    /// # Safety
    ///
    /// Every non-null address passed to [`MemoryReader::read_bytes`] must be
    /// valid for reads of the requested length for the duration of the call.
    /// The host must not free entity records while a frame is being built.
    pub unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl MemoryReader for LocalMemory {
    fn read_bytes(&self, address: u64, buf: &mut [u8]) -> Result<()> {
        if address == 0 {
            return Err(MemoryError::Null { len: buf.len() });
        }
        let Ok(address) = usize::try_from(address) else {
            return Err(MemoryError::Unmapped {
                address,
                len: buf.len(),
            });
        };

        // SAFETY: the constructor's contract makes `address..address + len`
        // readable; byte copies carry no alignment requirement.
        unsafe {
            std::ptr::copy_nonoverlapping(address as *const u8, buf.as_mut_ptr(), buf.len());
        }
        Ok(())
    }
}
