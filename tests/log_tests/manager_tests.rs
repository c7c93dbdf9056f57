//! Tests for the LogManager
//!
//! These tests verify:
//! - Appends land in consecutive slots from the base
//! - Dump returns valid entries in slot order
//! - Rollover when the region is full
//! - Erase zeroes the region and resets the cursor

use nvlog::config::OversizePolicy;
use nvlog::log::{LogManager, LogRegion};
use nvlog::store::InMemoryStore;
use nvlog::NvlogError;

fn new_manager() -> LogManager<InMemoryStore> {
    LogManager::new(InMemoryStore::new(32 * 1024), LogRegion::default()).unwrap()
}

fn small_manager(max_entries: usize) -> LogManager<InMemoryStore> {
    LogManager::new(InMemoryStore::new(1024), LogRegion::new(0, 64, max_entries)).unwrap()
}

// =============================================================================
// Construction Tests
// =============================================================================

#[test]
fn test_new_does_not_touch_store() {
    let manager = new_manager();
    assert_eq!(manager.cursor(), None);
    assert_eq!(manager.store().read_count(), 0);
    assert_eq!(manager.store().write_count(), 0);
}

#[test]
fn test_new_rejects_region_past_capacity() {
    let result = LogManager::new(InMemoryStore::new(1024), LogRegion::new(0, 64, 32));
    assert!(matches!(result, Err(NvlogError::Config(_))));
}

#[test]
fn test_new_rejects_tiny_slots() {
    let result = LogManager::new(InMemoryStore::new(1024), LogRegion::new(0, 3, 4));
    assert!(result.is_err());
}

// =============================================================================
// Append Tests
// =============================================================================

#[test]
fn test_append_consecutive_slots() {
    let mut manager = new_manager();

    assert_eq!(manager.append("Boot").unwrap(), 0);
    assert_eq!(manager.append("A").unwrap(), 64);
    assert_eq!(manager.append("BB").unwrap(), 128);
    assert_eq!(manager.cursor(), Some(192));

    let data = manager.store().data();
    assert_eq!(&data[..7], &[b'B', b'o', b'o', b't', 0x00, 0x39, 0xEF]);
    assert_eq!(&data[64..68], &[b'A', 0x00, 0x09, 0x07]);
    assert_eq!(&data[128..133], &[b'B', b'B', 0x00, 0x8D, 0xE4]);
}

#[test]
fn test_append_with_nonzero_base() {
    let mut manager =
        LogManager::new(InMemoryStore::new(4096), LogRegion::new(1024, 32, 8)).unwrap();

    assert_eq!(manager.append("one").unwrap(), 1024);
    assert_eq!(manager.append("two").unwrap(), 1056);
    assert_eq!(manager.dump_all().unwrap(), vec!["one", "two"]);
}

#[test]
fn test_append_recovers_existing_entries_first() {
    let mut manager = new_manager();
    manager.append("first").unwrap();
    manager.append("second").unwrap();

    let store = manager.into_store();
    let mut manager = LogManager::new(store, LogRegion::default()).unwrap();

    assert_eq!(manager.append("third").unwrap(), 128);
    assert_eq!(manager.dump_all().unwrap(), vec!["first", "second", "third"]);
}

#[test]
fn test_append_truncates_long_text() {
    let mut manager = new_manager();
    let long = "L".repeat(100);

    manager.append(&long).unwrap();

    let entries = manager.dump_all().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0], "L".repeat(61));
}

#[test]
fn test_append_reject_policy_writes_nothing() {
    assert_eq!(new_manager().oversize_policy(), OversizePolicy::Truncate);

    let mut manager = new_manager().with_oversize_policy(OversizePolicy::Reject);
    assert_eq!(manager.oversize_policy(), OversizePolicy::Reject);
    let long = "L".repeat(62);

    let result = manager.append(&long);
    assert!(matches!(result, Err(NvlogError::TooLong { .. })));
    assert_eq!(manager.store().write_count(), 0);
    assert!(manager.dump_all().unwrap().is_empty());
}

#[test]
fn test_append_empty_text_rejected() {
    let mut manager = new_manager();
    assert!(matches!(manager.append(""), Err(NvlogError::EmptyEntry)));
    assert_eq!(manager.store().write_count(), 0);
}

#[test]
fn test_append_write_failure_keeps_cursor() {
    let mut manager = new_manager();
    manager.append("ok").unwrap();

    manager.store_mut().fail_next_writes(1);
    let result = manager.append("lost");
    assert!(matches!(result, Err(NvlogError::Bus { .. })));
    assert_eq!(manager.cursor(), Some(64));

    assert_eq!(manager.append("retry").unwrap(), 64);
}

// =============================================================================
// Dump Tests
// =============================================================================

#[test]
fn test_dump_empty_log() {
    let mut manager = new_manager();
    assert!(manager.dump_all().unwrap().is_empty());
}

#[test]
fn test_dump_does_not_move_cursor() {
    let mut manager = new_manager();
    manager.append("x").unwrap();
    manager.dump_all().unwrap();
    assert_eq!(manager.cursor(), Some(64));
}

#[test]
fn test_dump_includes_max_length_entry() {
    let mut manager = new_manager();
    let max = "m".repeat(61);
    manager.append(&max).unwrap();
    manager.append("after").unwrap();

    assert_eq!(manager.dump_all().unwrap(), vec![max, "after".to_string()]);
}

#[test]
fn test_entries_reports_addresses() {
    let mut manager = new_manager();
    manager.append("a").unwrap();
    manager.append("b").unwrap();

    let addresses: Vec<u32> = manager
        .entries()
        .map(|record| record.unwrap().address)
        .collect();
    assert_eq!(addresses, vec![0, 64]);
}

#[test]
fn test_dump_propagates_read_error() {
    let mut manager = new_manager();
    manager.append("a").unwrap();
    manager.store_mut().fail_next_reads(1);

    assert!(matches!(manager.dump_all(), Err(NvlogError::Bus { .. })));
}

// =============================================================================
// Rollover Tests
// =============================================================================

#[test]
fn test_rollover_when_full() {
    let mut manager = small_manager(4);

    for i in 0..4 {
        assert_eq!(manager.append(&format!("entry {}", i)).unwrap(), i * 64);
    }
    assert!(manager.is_full());

    assert_eq!(manager.append("wrapped").unwrap(), 0);
    assert_eq!(manager.cursor(), Some(64));
    assert_eq!(manager.dump_all().unwrap(), vec!["wrapped"]);

    // Everything past the first slot was zeroed
    assert!(manager.store().data()[64..256].iter().all(|&b| b == 0));
}

#[test]
fn test_rollover_full_default_region() {
    let mut manager = new_manager();

    for i in 0..32 {
        manager.append(&format!("e{}", i)).unwrap();
    }
    assert_eq!(manager.cursor(), Some(2048));
    assert_eq!(manager.dump_all().unwrap().len(), 32);

    assert_eq!(manager.append("fresh").unwrap(), 0);
    assert_eq!(manager.dump_all().unwrap(), vec!["fresh"]);
}

#[test]
fn test_rollover_after_restart_with_full_region() {
    let mut manager = small_manager(2);
    manager.append("a").unwrap();
    manager.append("b").unwrap();

    let store = manager.into_store();
    let mut manager = LogManager::new(store, LogRegion::new(0, 64, 2)).unwrap();
    assert_eq!(manager.append("c").unwrap(), 0);
    assert_eq!(manager.dump_all().unwrap(), vec!["c"]);
}

// =============================================================================
// Erase Tests
// =============================================================================

#[test]
fn test_erase_all_zeroes_region() {
    let mut manager = new_manager();
    for i in 0..5 {
        manager.append(&format!("entry {}", i)).unwrap();
    }

    manager.erase_all().unwrap();

    assert_eq!(manager.cursor(), None);
    assert!(manager.store().data()[..2048].iter().all(|&b| b == 0));
    assert!(manager.dump_all().unwrap().is_empty());
    assert_eq!(manager.append("next").unwrap(), 0);
}

#[test]
fn test_erase_all_one_write_per_slot() {
    let mut manager = small_manager(8);
    manager.erase_all().unwrap();
    assert_eq!(manager.store().write_count(), 8);
}

#[test]
fn test_erase_all_leaves_outside_bytes() {
    let store = InMemoryStore::filled(4096, 0xAA);
    let mut manager = LogManager::new(store, LogRegion::new(64, 64, 4)).unwrap();

    manager.erase_all().unwrap();

    let data = manager.store().data();
    assert_eq!(data[63], 0xAA);
    assert!(data[64..320].iter().all(|&b| b == 0));
    assert_eq!(data[320], 0xAA);
}

#[test]
fn test_erase_failure_forces_rescan() {
    let mut manager = small_manager(4);
    manager.append("a").unwrap();
    manager.append("b").unwrap();

    manager.store_mut().fail_next_writes(1);
    assert!(manager.erase_all().is_err());
    assert_eq!(manager.cursor(), None);

    // Nothing was erased, so a rescan finds both entries
    assert_eq!(manager.append("c").unwrap(), 128);
}
