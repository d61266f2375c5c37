use shelf_catalog::{Browser, BrowserRegistry, CUSTOM_HASH, INTEGRATED_HASH};

#[test]
fn builtins_are_registered_in_order() {
    let registry = BrowserRegistry::new();
    let names: Vec<_> = registry.iter().map(|b| b.name().to_string()).collect();
    assert_eq!(names, ["Integrated", "Custom"]);
    assert!(registry.get(INTEGRATED_HASH).is_integrated());
    assert!(registry.get(CUSTOM_HASH).is_custom());
}

#[test]
fn hash_is_last_twelve_md5_hex_digits() {
    // md5("Firefox") = 763f7f1aec350cd1a46238d1d5c3c229
    let expected = i64::from_str_radix("38d1d5c3c229", 16).unwrap();
    assert_eq!(Browser::make_hash("Firefox"), expected);
    assert_eq!(Browser::new("Firefox").hashed_name(), format!("Firefox###{expected}"));
}

#[test]
fn duplicate_add_is_ignored() {
    let mut registry = BrowserRegistry::new();
    assert!(registry.add(Browser::new("Brave")));
    assert!(!registry.add(Browser::new("Brave")));
    assert_eq!(registry.len(), 3);
}

#[test]
fn indexes_follow_insertion_order() {
    let mut registry = BrowserRegistry::new();
    registry.add(Browser::new("Opera"));
    registry.add(Browser::new("Microsoft Edge"));
    let indexes: Vec<_> = registry.iter().map(|b| (b.name().to_string(), b.index())).collect();
    assert_eq!(
        indexes,
        [
            ("Integrated".to_string(), 0),
            ("Custom".to_string(), 1),
            ("Opera".to_string(), 2),
            ("Microsoft Edge".to_string(), 3),
        ]
    );
}

#[test]
fn unknown_hash_falls_back_to_integrated() {
    let registry = BrowserRegistry::new();
    assert_eq!(registry.get(123_456).name(), "Integrated");
}

#[test]
fn private_flag_chosen_by_name() {
    assert_eq!(Browser::new("Google Chrome").private_arg(), Some("-incognito"));
    assert_eq!(Browser::new("Firefox").private_arg(), Some("-private-window"));
    assert_eq!(Browser::new("LibreWolf").private_arg(), Some("-private-window"));
    assert_eq!(Browser::new("Lynx").private_arg(), None);
}

#[test]
fn launch_args_prepend_private_flag() {
    let browser = Browser::new("Microsoft Edge").with_args(vec!["--new-window".into()]);
    assert_eq!(browser.launch_args(true), ["-inprivate", "--new-window"]);
    assert_eq!(browser.launch_args(false), ["--new-window"]);
}
