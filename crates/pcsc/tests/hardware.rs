//! Tests against whatever PC/SC readers are attached
//!
//! These skip quietly when no PC/SC service or reader is available.

use scout_apdu_core::{CardExecutor, CardTransport, Executor, FileId, Iso7816Ext};
use scout_apdu_transport_pcsc::{ConnectStrategy, PcscConfig, PcscDeviceManager};

#[test]
fn test_list_readers() {
    let Ok(manager) = PcscDeviceManager::new() else {
        eprintln!("PC/SC service unavailable, skipping");
        return;
    };

    match manager.list_readers() {
        Ok(readers) => {
            for reader in readers {
                assert!(!reader.name().is_empty());
                assert_eq!(reader.atr().is_some(), reader.has_card());
                if let Some(atr) = reader.atr() {
                    println!("{}: {}", reader.name(), hex::encode_upper(atr));
                }
            }
        }
        Err(e) => eprintln!("No readers: {e}"),
    }
}

#[test]
#[ignore = "requires a card in a reader"]
fn test_select_master_file() {
    let manager = PcscDeviceManager::new().unwrap();
    let transport = manager
        .connect_strategy(ConnectStrategy::AnyCard, PcscConfig::default())
        .unwrap();
    assert!(transport.is_connected());
    assert!(!transport.atr().unwrap().is_empty());

    let mut executor = CardExecutor::new(transport);
    let response = executor.select_ef(FileId::new(0x3F00), 0x00).unwrap();
    println!("SELECT 3F00: {} ({})", response.status(), response.category());

    executor.reset().unwrap();
}
