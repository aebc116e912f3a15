use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use showtech_core::{HeaderStyle, PlatformFamily, SectionStore};

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

fn load(path: &str) -> SectionStore {
    let raw = fs::read_to_string(fixture(path)).expect("fixture should be readable");
    SectionStore::extract(&raw).expect("fixture should have sections")
}

#[test]
fn ios_capture_mixes_every_header_style() {
    let store = load("fixtures/ios-showtech.txt");
    let styles: Vec<(&str, HeaderStyle)> = store
        .iter()
        .map(|section| (section.command.as_str(), section.style))
        .collect();
    assert_eq!(
        styles,
        vec![
            ("show version", HeaderStyle::Banner),
            ("show running-config", HeaderStyle::Banner),
            ("show ip interface brief", HeaderStyle::Quoted),
            ("show interfaces trunk", HeaderStyle::Quoted),
            ("show interfaces", HeaderStyle::Quoted),
            ("show cdp neighbors detail", HeaderStyle::Timestamped),
        ]
    );
}

#[test]
fn first_running_config_wins() {
    let store = load("fixtures/ios-showtech.txt");
    assert_eq!(store.hostname(), "edge-sw1");
    let config = store.running_config().expect("running config");
    assert!(config.starts_with("Building configuration..."));
    assert!(config.trim_end().ends_with("end"));
    assert!(!config.contains("should-be-ignored"));
}

#[test]
fn bodies_stop_at_the_next_header() {
    let store = load("fixtures/ios-showtech.txt");
    let trunk = store.get("SHOW   interfaces TRUNK").expect("trunk section");
    assert!(trunk.starts_with("Port        Mode"));
    assert!(!trunk.contains("GigabitEthernet1/0/1 is up"));
}

#[test]
fn platform_family_comes_from_show_version() {
    assert_eq!(
        load("fixtures/ios-showtech.txt").platform_family(),
        PlatformFamily::Ios
    );
    assert_eq!(
        load("fixtures/nxos-showtech.txt").platform_family(),
        PlatformFamily::Nxos
    );
}

#[test]
fn nxos_tables_keep_their_dash_separators() {
    let store = load("fixtures/nxos-showtech.txt");
    assert_eq!(store.hostname(), "nx-core1");
    let brief = store.get("show interface brief").expect("brief section");
    assert!(brief.starts_with("----"));
    assert!(brief.contains("Port-channel VLAN"));
    assert!(store.contains("show interface trunk"));
    assert!(store.contains("show cdp neighbors detail"));
}
