#![cfg(feature = "serde")]

use schema::{ClassDef, GameTables};

#[test]
fn tables_load_from_json() {
    let json = r#"{
        "species": ["kobold", "jackal"],
        "artifacts": ["the Phial of Galadriel"],
        "races": ["Human"],
        "classes": [{ "name": "Mage", "total_spells": 12 }],
        "kind_count": 5
    }"#;
    let tables: GameTables = serde_json::from_str(json).unwrap();
    tables.validate().unwrap();
    assert_eq!(tables.species_name(2), Some("jackal"));
    assert!(tables.egos.is_empty());
    assert_eq!(tables.classes, vec![ClassDef::new("Mage", 12)]);
}

#[test]
fn testing_tables_survive_json() {
    let tables = GameTables::for_testing();
    let json = serde_json::to_string(&tables).unwrap();
    let back: GameTables = serde_json::from_str(&json).unwrap();
    assert_eq!(back, tables);
}
