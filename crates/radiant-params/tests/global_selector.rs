//! Process-wide selector and legacy constants
//!
//! Every test here switches the shared selector, so they run under one lock
//! and put mainnet back when done.

use radiant_params::selector;
use radiant_params::{Error, LegacyConstants, LegacyField, LegacyValue, NetworkKind};
use std::sync::{Arc, Mutex, MutexGuard};

static SERIAL: Mutex<()> = Mutex::new(());

fn serial() -> MutexGuard<'static, ()> {
    let guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    selector::select_main();
    guard
}

#[test]
fn test_starts_on_mainnet() {
    let _guard = serial();
    assert_eq!(selector::active().kind(), NetworkKind::Mainnet);
    assert_eq!(selector::global().units().default_unit(), "RXD");
}

#[test]
fn test_named_entry_points() {
    let _guard = serial();
    let cases: [(fn(), NetworkKind); 5] = [
        (selector::select_testnet, NetworkKind::Testnet),
        (selector::select_testnet4, NetworkKind::Testnet4),
        (selector::select_scalenet, NetworkKind::Scalenet),
        (selector::select_regtest, NetworkKind::Regtest),
        (selector::select_main, NetworkKind::Mainnet),
    ];
    for (select, kind) in cases {
        select();
        let active = selector::active();
        assert_eq!(active.kind(), kind);
        assert_eq!(selector::global().units().default_unit(), active.default_unit());
    }
}

#[test]
fn test_legacy_view_follows_switches() {
    let _guard = serial();
    let constants = LegacyConstants::global();
    assert_eq!(constants.title(), "Electron Radiant");
    assert_eq!(constants.xprv_headers()["standard"], 0x0488_ade4);

    selector::select_testnet();
    assert_eq!(constants.title(), "Electron Radiant Testnet");
    assert_eq!(constants.wif_prefix(), 0xef);
    assert_eq!(
        constants.get(LegacyField::DefaultUnit),
        LegacyValue::Text("tRXD".to_string())
    );

    selector::select_main();
    assert_eq!(constants.wif_prefix(), 0x80);
}

#[test]
fn test_legacy_writes_rejected_on_every_network() {
    let _guard = serial();
    let constants = LegacyConstants::global();
    for kind in NetworkKind::ALL {
        selector::global().select(kind);
        let before = selector::active();
        for field in LegacyField::ALL {
            let err = constants.set(field.name(), "x").unwrap_err();
            assert!(matches!(err, Error::ImmutableConstants { .. }));
        }
        assert!(Arc::ptr_eq(&before, &selector::active()));
    }
    selector::select_main();
}

#[test]
fn test_install_after_use_fails() {
    let _guard = serial();
    let replacement = radiant_params::NetworkConfig::default()
        .into_selector()
        .unwrap();
    assert!(matches!(
        selector::install(replacement),
        Err(Error::SelectorAlreadyInstalled)
    ));
}

#[test]
fn test_concurrent_readers_see_whole_networks() {
    let _guard = serial();
    let readers: Vec<_> = (0..4)
        .map(|_| {
            std::thread::spawn(|| {
                for _ in 0..500 {
                    let net = selector::active();
                    let expected_p2sh = if net.is_testnet() { 196 } else { 5 };
                    assert_eq!(net.addrtype_p2sh(), expected_p2sh);
                }
            })
        })
        .collect();
    for i in 0..200 {
        if i % 2 == 0 {
            selector::select_testnet();
        } else {
            selector::select_main();
        }
    }
    for reader in readers {
        reader.join().unwrap();
    }
    selector::select_main();
}

#[test]
fn test_concurrent_snapshots_pair_network_and_units() {
    let _guard = serial();
    let readers: Vec<_> = (0..4)
        .map(|_| {
            std::thread::spawn(|| {
                for _ in 0..500 {
                    let (net, units) = selector::global().snapshot();
                    assert_eq!(units.default_unit, net.default_unit());
                    assert_eq!(units.base_units, *net.base_units());
                }
            })
        })
        .collect();
    for i in 0..200 {
        if i % 2 == 0 {
            selector::select_scalenet();
        } else {
            selector::select_main();
        }
    }
    for reader in readers {
        reader.join().unwrap();
    }
    selector::select_main();
}
