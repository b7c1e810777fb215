//! Tests for host memory readers

#![cfg(test)]

use super::{LocalMemory, MemoryError, MemoryReader, SnapshotMemory, field};

#[test]
fn test_snapshot_typed_reads() {
    let mut memory = SnapshotMemory::new();
    let base = memory.alloc(32);
    memory.write_u16(base, 0xBEEF).unwrap();
    memory.write_u32(base + 4, 0xDEAD_BEEF).unwrap();
    memory.write_u64(base + 8, 0x0123_4567_89AB_CDEF).unwrap();
    memory.write_f32(base + 16, 1.5).unwrap();

    assert_eq!(memory.read_u8(base).unwrap(), 0xEF);
    assert_eq!(memory.read_u16(base).unwrap(), 0xBEEF);
    assert_eq!(memory.read_u32(base + 4).unwrap(), 0xDEAD_BEEF);
    assert_eq!(memory.read_u64(base + 8).unwrap(), 0x0123_4567_89AB_CDEF);
    assert_eq!(memory.read_f32(base + 16).unwrap(), 1.5);
}

#[test]
fn test_snapshot_unmapped_read() {
    let memory = SnapshotMemory::new();
    assert_eq!(
        memory.read_u32(0x4000),
        Err(MemoryError::Unmapped {
            address: 0x4000,
            len: 4
        })
    );
}

#[test]
fn test_snapshot_read_straddling_region_end() {
    let mut memory = SnapshotMemory::new();
    let base = memory.alloc(6);
    // Last two bytes are mapped, the following six are not
    assert!(matches!(
        memory.read_u64(base + 4),
        Err(MemoryError::Unmapped { .. })
    ));
    assert!(memory.read_u16(base + 4).is_ok());
}

#[test]
fn test_snapshot_null_read() {
    let memory = SnapshotMemory::new();
    assert_eq!(memory.read_u64(0), Err(MemoryError::Null { len: 8 }));
}

#[test]
fn test_snapshot_allocations_do_not_overlap() {
    let mut memory = SnapshotMemory::new();
    let a = memory.alloc(10);
    let b = memory.alloc(10);
    assert!(b >= a + 10);
    assert_eq!(a % 16, 0);
    assert_eq!(b % 16, 0);
    assert_eq!(memory.region_count(), 2);
}

#[test]
fn test_snapshot_unmap() {
    let mut memory = SnapshotMemory::new();
    let base = memory.alloc(8);
    memory.write_u64(base, 7).unwrap();
    assert!(memory.unmap(base));
    assert!(memory.read_u64(base).is_err());
    assert!(!memory.unmap(base));
}

#[test]
fn test_snapshot_map_explicit_base() {
    let mut memory = SnapshotMemory::new();
    memory.map(0x2000_0000, vec![1, 2, 3, 4]).unwrap();
    assert_eq!(memory.read_u32(0x2000_0000).unwrap(), 0x0403_0201);

    // Later allocations land past the explicit mapping
    let next = memory.alloc(4);
    assert!(next >= 0x2000_0004);
}

#[test]
fn test_snapshot_map_rejects_overlap() {
    let mut memory = SnapshotMemory::new();
    memory.map(0x2000_0000, vec![0; 16]).unwrap();

    // Tail of the new region runs into the existing one
    assert_eq!(
        memory.map(0x1FFF_FFF8, vec![0; 16]),
        Err(MemoryError::Overlap {
            address: 0x1FFF_FFF8,
            len: 16,
        })
    );
    // New region starts inside the existing one
    assert_eq!(
        memory.map(0x2000_0008, vec![0; 4]),
        Err(MemoryError::Overlap {
            address: 0x2000_0008,
            len: 4,
        })
    );
    // Touching regions are fine
    memory.map(0x1FFF_FFF0, vec![0xAA; 16]).unwrap();
    memory.map(0x2000_0010, vec![0xBB; 16]).unwrap();
    assert_eq!(memory.region_count(), 3);
    assert_eq!(memory.read_u8(0x1FFF_FFFF).unwrap(), 0xAA);
    assert_eq!(memory.read_u8(0x2000_0010).unwrap(), 0xBB);
}

#[test]
fn test_snapshot_map_replaces_same_base() {
    let mut memory = SnapshotMemory::new();
    memory.map(0x2000_0000, vec![1; 8]).unwrap();
    memory.map(0x2000_0000, vec![2; 4]).unwrap();
    assert_eq!(memory.region_count(), 1);
    assert_eq!(memory.read_u8(0x2000_0000).unwrap(), 2);
    assert!(memory.read_u8(0x2000_0004).is_err());
}

#[test]
fn test_snapshot_map_end_overflow() {
    let mut memory = SnapshotMemory::new();
    assert_eq!(
        memory.map(u64::MAX - 1, vec![0; 4]),
        Err(MemoryError::Overflow {
            address: u64::MAX - 1,
            offset: 4,
        })
    );
    assert_eq!(memory.region_count(), 0);
}

#[test]
fn test_read_ptr_maps_null_to_none() {
    let mut memory = SnapshotMemory::new();
    let base = memory.alloc(16);
    memory.write_u64(base + 8, 0x1234).unwrap();

    assert_eq!(memory.read_ptr(base).unwrap(), None);
    assert_eq!(memory.read_ptr(base + 8).unwrap(), Some(0x1234));
}

#[test]
fn test_read_c_string() {
    let mut memory = SnapshotMemory::new();
    let name = memory.alloc_c_string("Nao");
    assert_eq!(memory.read_c_string(name, 64).unwrap(), "Nao");
}

#[test]
fn test_read_c_string_truncates_at_max_len() {
    let mut memory = SnapshotMemory::new();
    let name = memory.alloc_c_string("Tarlach");
    assert_eq!(memory.read_c_string(name, 3).unwrap(), "Tar");
}

#[test]
fn test_read_c_string_unterminated_fails() {
    let mut memory = SnapshotMemory::new();
    let base = memory.alloc(3);
    memory.write_bytes(base, b"abc").unwrap();
    // Runs off the end of the region before finding a terminator
    assert!(memory.read_c_string(base, 16).is_err());
}

#[test]
fn test_read_c_string_lossy() {
    let mut memory = SnapshotMemory::new();
    let base = memory.alloc(4);
    memory.write_bytes(base, &[b'a', 0xFF, b'b', 0]).unwrap();
    assert_eq!(memory.read_c_string(base, 16).unwrap(), "a\u{FFFD}b");
}

#[test]
fn test_field_overflow() {
    assert_eq!(field(0x10, 0x20).unwrap(), 0x30);
    assert_eq!(
        field(u64::MAX, 1),
        Err(MemoryError::Overflow {
            address: u64::MAX,
            offset: 1
        })
    );
}

#[test]
fn test_reader_through_reference() {
    let mut memory = SnapshotMemory::new();
    let base = memory.alloc(4);
    memory.write_u32(base, 42).unwrap();

    let by_ref = &memory;
    assert_eq!(MemoryReader::read_u32(&by_ref, base).unwrap(), 42);
}

#[test]
fn test_local_memory_reads_own_process() {
    let values: [u32; 2] = [0x1111_2222, 0x3333_4444];
    let address = values.as_ptr() as u64;

    // SAFETY: `values` outlives every read below.
    let memory = unsafe { LocalMemory::new() };
    assert_eq!(memory.read_u32(address).unwrap(), 0x1111_2222);
    assert_eq!(memory.read_u32(address + 4).unwrap(), 0x3333_4444);
}

#[test]
fn test_local_memory_rejects_null() {
    // SAFETY: only the null address is read.
    let memory = unsafe { LocalMemory::new() };
    assert_eq!(memory.read_u32(0), Err(MemoryError::Null { len: 4 }));
}
