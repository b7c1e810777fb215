//! Read-only access to host memory
//!
//! Every structure the viewer inspects lives in memory it does not own.
//! [`MemoryReader`] is the single seam through which those bytes are read:
//! [`LocalMemory`] reads the current process when injected into the host,
//! [`SnapshotMemory`] serves a synthetic image for tests and the demo.
//!
//! All multi-byte values are little-endian.

mod local;
mod snapshot;
mod tests;

pub use local::LocalMemory;
pub use snapshot::SnapshotMemory;

/// Failure to read from host memory
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemoryError {
    #[error("null pointer read of {len} bytes")]
    Null { len: usize },
    #[error("unmapped read of {len} bytes at {address:#x}")]
    Unmapped { address: u64, len: usize },
    #[error("address overflow: {address:#x} + {offset:#x}")]
    Overflow { address: u64, offset: u64 },
    #[error("mapping {len} bytes at {address:#x} overlaps a mapped region")]
    Overlap { address: u64, len: usize },
}

pub type Result<T> = std::result::Result<T, MemoryError>;

/// Byte-level reader over an external address space
pub trait MemoryReader {
    /// Fill `buf` with the bytes starting at `address`.
    fn read_bytes(&self, address: u64, buf: &mut [u8]) -> Result<()>;

    fn read_u8(&self, address: u64) -> Result<u8> {
        Ok(read_array::<1, _>(self, address)?[0])
    }

    fn read_u16(&self, address: u64) -> Result<u16> {
        read_array(self, address).map(u16::from_le_bytes)
    }

    fn read_u32(&self, address: u64) -> Result<u32> {
        read_array(self, address).map(u32::from_le_bytes)
    }

    fn read_u64(&self, address: u64) -> Result<u64> {
        read_array(self, address).map(u64::from_le_bytes)
    }

    fn read_f32(&self, address: u64) -> Result<f32> {
        read_array(self, address).map(f32::from_le_bytes)
    }

    /// Read a pointer-sized value, mapping null to `None`.
    fn read_ptr(&self, address: u64) -> Result<Option<u64>> {
        let ptr = self.read_u64(address)?;
        Ok((ptr != 0).then_some(ptr))
    }

    /// Read a NUL-terminated string of at most `max_len` bytes.
    ///
    /// Invalid UTF-8 is replaced rather than rejected; host names are
    /// display-only.
    fn read_c_string(&self, address: u64, max_len: usize) -> Result<String> {
        let mut bytes = Vec::new();
        let mut byte = [0u8; 1];
        for i in 0..max_len as u64 {
            self.read_bytes(field(address, i)?, &mut byte)?;
            if byte[0] == 0 {
                break;
            }
            bytes.push(byte[0]);
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl<R: MemoryReader + ?Sized> MemoryReader for &R {
    fn read_bytes(&self, address: u64, buf: &mut [u8]) -> Result<()> {
        (**self).read_bytes(address, buf)
    }
}

/// Address of a field at `offset` inside the record at `base`.
pub fn field(base: u64, offset: u64) -> Result<u64> {
    base.checked_add(offset).ok_or(MemoryError::Overflow {
        address: base,
        offset,
    })
}

fn read_array<const N: usize, R: MemoryReader + ?Sized>(reader: &R, address: u64) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    reader.read_bytes(address, &mut buf)?;
    Ok(buf)
}
