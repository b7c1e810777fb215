//! Sparse in-memory image of a host address space

use std::collections::BTreeMap;

use super::{MemoryError, MemoryReader, Result, field};

/// First address handed out by [`SnapshotMemory::alloc`]
const ALLOC_BASE: u64 = 0x1000_0000;
/// Allocation alignment, matching the host allocator
const ALLOC_ALIGN: u64 = 16;

/// A set of mapped regions keyed by base address
///
/// Regions never overlap; [`SnapshotMemory::map`] rejects a region that
/// would. Reads must fall entirely inside one region;
/// anything else reports [`MemoryError::Unmapped`], which is how a freed or
/// never-populated host record looks to the viewer.
#[derive(Debug, Clone, Default)]
pub struct SnapshotMemory {
    regions: BTreeMap<u64, Vec<u8>>,
    next_alloc: u64,
}

impl SnapshotMemory {
    pub fn new() -> Self {
        Self {
            regions: BTreeMap::new(),
            next_alloc: ALLOC_BASE,
        }
    }

    /// Map `bytes` at `base`, replacing any region that starts there.
    ///
    /// Fails with [`MemoryError::Overlap`] when the new region would cover
    /// part of any other region.
    pub fn map(&mut self, base: u64, bytes: Vec<u8>) -> Result<()> {
        let len = bytes.len();
        let end = field(base, len as u64)?;

        let covers_previous = self
            .regions
            .range(..base)
            .next_back()
            .is_some_and(|(&start, region)| start.saturating_add(region.len() as u64) > base);
        let covers_next = self.regions.range(base..end).any(|(&start, _)| start != base);
        if covers_previous || covers_next {
            return Err(MemoryError::Overlap { address: base, len });
        }

        if end > self.next_alloc {
            self.next_alloc = align_up(end);
        }
        self.regions.insert(base, bytes);
        Ok(())
    }

    /// Unmap the region starting at `base`. Returns whether one existed.
    pub fn unmap(&mut self, base: u64) -> bool {
        self.regions.remove(&base).is_some()
    }

    /// Reserve a zeroed region of `len` bytes and return its base address.
    pub fn alloc(&mut self, len: usize) -> u64 {
        let base = align_up(self.next_alloc.max(ALLOC_BASE));
        self.regions.insert(base, vec![0; len.max(1)]);
        self.next_alloc = align_up(base.saturating_add(len.max(1) as u64));
        base
    }

    /// Reserve a region holding `s` followed by a NUL terminator.
    pub fn alloc_c_string(&mut self, s: &str) -> u64 {
        let base = self.alloc(s.len() + 1);
        // Freshly allocated: the write is always in bounds.
        if let Some(region) = self.regions.get_mut(&base) {
            region[..s.len()].copy_from_slice(s.as_bytes());
        }
        base
    }

    pub fn write_bytes(&mut self, address: u64, data: &[u8]) -> Result<()> {
        let (offset, region) = self.region_mut(address, data.len())?;
        region[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }

    pub fn write_u16(&mut self, address: u64, value: u16) -> Result<()> {
        self.write_bytes(address, &value.to_le_bytes())
    }

    pub fn write_u32(&mut self, address: u64, value: u32) -> Result<()> {
        self.write_bytes(address, &value.to_le_bytes())
    }

    pub fn write_u64(&mut self, address: u64, value: u64) -> Result<()> {
        self.write_bytes(address, &value.to_le_bytes())
    }

    pub fn write_f32(&mut self, address: u64, value: f32) -> Result<()> {
        self.write_bytes(address, &value.to_le_bytes())
    }

    /// Write `value` into the field at `offset` of the record at `base`.
    pub fn write_field_u64(&mut self, base: u64, offset: u64, value: u64) -> Result<()> {
        self.write_u64(field(base, offset)?, value)
    }

    /// Number of mapped regions
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    fn locate(&self, address: u64, len: usize) -> Option<(u64, usize)> {
        let (&base, region) = self.regions.range(..=address).next_back()?;
        let offset = usize::try_from(address - base).ok()?;
        let end = offset.checked_add(len)?;
        (end <= region.len()).then_some((base, offset))
    }

    fn region_mut(&mut self, address: u64, len: usize) -> Result<(usize, &mut Vec<u8>)> {
        let unmapped = MemoryError::Unmapped { address, len };
        let (base, offset) = self.locate(address, len).ok_or(unmapped.clone())?;
        let region = self.regions.get_mut(&base).ok_or(unmapped)?;
        Ok((offset, region))
    }
}

impl MemoryReader for SnapshotMemory {
    fn read_bytes(&self, address: u64, buf: &mut [u8]) -> Result<()> {
        if address == 0 {
            return Err(MemoryError::Null { len: buf.len() });
        }
        let (base, offset) = self
            .locate(address, buf.len())
            .ok_or(MemoryError::Unmapped {
                address,
                len: buf.len(),
            })?;
        let region = &self.regions[&base];
        buf.copy_from_slice(&region[offset..offset + buf.len()]);
        Ok(())
    }
}

fn align_up(address: u64) -> u64 {
    address
        .checked_next_multiple_of(ALLOC_ALIGN)
        .unwrap_or(u64::MAX)
}
