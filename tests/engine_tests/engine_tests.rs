//! Tests for the device engine
//!
//! These tests verify:
//! - Boot sequence (recovery, boot record, status flag)
//! - Status changes are persisted and logged
//! - Console command execution

use nvlog::config::Config;
use nvlog::console::{Command, Response};
use nvlog::flag::{load_flag, FlagSlot};
use nvlog::log::{LogRegion, ScanStop};
use nvlog::store::{InMemoryStore, PersistentStore};
use nvlog::{Engine, NvlogError};

fn small_config() -> Config {
    Config::builder()
        .store_capacity(1024)
        .region(LogRegion::new(0, 64, 8))
        .status_flag_address(1023)
        .build()
}

fn boot(store: InMemoryStore) -> Engine<InMemoryStore> {
    Engine::open(Config::default(), store).unwrap()
}

// =============================================================================
// Boot Sequence Tests
// =============================================================================

#[test]
fn test_first_boot_on_blank_store() {
    let engine = boot(InMemoryStore::new(32 * 1024));
    let report = engine.boot_report();

    assert_eq!(report.recovery.cursor, 0);
    assert_eq!(report.recovery.stop, ScanStop::Empty);
    assert_eq!(report.boot_address, 0);
    assert_eq!(report.status, 0x02);
    assert!(!report.status_restored);
    assert_eq!(engine.status(), 0x02);

    let store = engine.into_store();
    assert_eq!(store.data()[32767], 0x02);
    assert_eq!(store.data()[32766], 0xFD);
    assert_eq!(&store.data()[..4], b"Boot");
}

#[test]
fn test_second_boot_restores_status_and_appends() {
    let mut engine = boot(InMemoryStore::new(32 * 1024));
    engine.set_status(0x07).unwrap();

    let mut engine = boot(engine.into_store());
    let report = engine.boot_report();

    assert_eq!(report.recovery.valid_entries, 2);
    assert_eq!(report.boot_address, 128);
    assert!(report.status_restored);
    assert_eq!(engine.status(), 0x07);

    let entries = engine.dump_entries().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0], "Boot");
    assert_eq!(entries[2], "Boot");
}

#[test]
fn test_corrupt_flag_reset_to_default() {
    let mut engine = boot(InMemoryStore::new(32 * 1024));
    engine.set_status(0x10).unwrap();

    let mut store = engine.into_store();
    store.flip_bit(32766, 3);

    let engine = boot(store);
    assert!(!engine.boot_report().status_restored);
    assert_eq!(engine.status(), 0x02);
}

#[test]
fn test_custom_boot_message_and_default_status() {
    let config = Config::builder()
        .boot_message("Power on")
        .default_status(0x80)
        .build();
    let mut engine = Engine::open(config, InMemoryStore::new(32 * 1024)).unwrap();

    assert_eq!(engine.status(), 0x80);
    assert_eq!(engine.dump_entries().unwrap(), vec!["Power on"]);
}

#[test]
fn test_open_rejects_small_store() {
    let result = Engine::open(Config::default(), InMemoryStore::new(1024));
    assert!(matches!(result, Err(NvlogError::Config(_))));
}

#[test]
fn test_open_rejects_invalid_config() {
    let config = Config::builder()
        .store_capacity(1024)
        .region(LogRegion::new(0, 64, 8))
        .status_flag_address(100)
        .build();
    let result = Engine::open(config, InMemoryStore::new(1024));
    assert!(matches!(result, Err(NvlogError::Config(_))));
}

#[test]
fn test_open_propagates_store_error() {
    let mut store = InMemoryStore::new(1024);
    store.fail_next_reads(1);

    let result = Engine::open(small_config(), store);
    assert!(matches!(result, Err(NvlogError::Bus { .. })));
}

#[test]
fn test_boot_rolls_over_full_region() {
    let mut engine = Engine::open(small_config(), InMemoryStore::new(1024)).unwrap();
    for i in 0..7 {
        engine.append_entry(&format!("event {}", i)).unwrap();
    }
    assert!(engine.log().is_full());

    let mut engine = Engine::open(small_config(), engine.into_store()).unwrap();
    assert_eq!(engine.boot_report().recovery.stop, ScanStop::RegionEnd);
    assert_eq!(engine.boot_report().boot_address, 0);
    assert_eq!(engine.dump_entries().unwrap(), vec!["Boot"]);
}

// =============================================================================
// Status Tests
// =============================================================================

#[test]
fn test_set_status_persists_and_logs() {
    let mut engine = boot(InMemoryStore::new(32 * 1024));
    let address = engine.set_status(0x05).unwrap();
    assert_eq!(address, 64);

    let entries = engine.dump_entries().unwrap();
    assert!(entries[1].starts_with("Time since boot: "));
    assert!(entries[1].ends_with(" seconds, LED state: 0x05"));

    let slot = engine.status_slot();
    let loaded = load_flag(engine.log_mut().store_mut(), slot).unwrap();
    assert!(loaded.valid);
    assert_eq!(loaded.value, 0x05);
}

#[test]
fn test_toggle_status() {
    let mut engine = boot(InMemoryStore::new(32 * 1024));

    assert_eq!(engine.toggle_status(0x01).unwrap(), 0x03);
    assert_eq!(engine.toggle_status(0x02).unwrap(), 0x01);
    assert_eq!(engine.status(), 0x01);
    assert_eq!(engine.dump_entries().unwrap().len(), 3);
}

#[test]
fn test_status_flag_outside_log_region() {
    let mut engine = Engine::open(small_config(), InMemoryStore::new(1024)).unwrap();
    engine.set_status(0xAA).unwrap();
    engine.erase_all().unwrap();

    let mut store = engine.into_store();
    let loaded = load_flag(&mut store, FlagSlot::new(1023).unwrap()).unwrap();
    assert!(loaded.valid);
    assert_eq!(loaded.value, 0xAA);
    assert!(store.read(0, 512).unwrap().iter().all(|&b| b == 0));
}

#[test]
fn test_status_write_failure_keeps_old_status() {
    let mut engine = boot(InMemoryStore::new(32 * 1024));
    engine.log_mut().store_mut().fail_next_writes(1);

    assert!(engine.set_status(0x09).is_err());
    assert_eq!(engine.status(), 0x02);
}

// =============================================================================
// Command Tests
// =============================================================================

#[test]
fn test_execute_read() {
    let mut engine = boot(InMemoryStore::new(32 * 1024));
    engine.append_entry("hello").unwrap();

    let response = engine.execute(Command::Read).unwrap();
    assert_eq!(
        response,
        Response::Entries(vec!["Boot".to_string(), "hello".to_string()])
    );
}

#[test]
fn test_execute_erase() {
    let mut engine = boot(InMemoryStore::new(32 * 1024));
    engine.append_entry("hello").unwrap();

    let response = engine.execute(Command::Erase).unwrap();
    assert_eq!(response, Response::Erased { cursor: 0 });
    assert_eq!(engine.log().cursor(), Some(0));
    assert!(engine.dump_entries().unwrap().is_empty());

    // Status survives an erase
    assert_eq!(engine.status(), 0x02);
    assert_eq!(engine.append_entry("after").unwrap(), 0);
}
