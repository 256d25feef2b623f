use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use bibliaai::storage::SqliteKeyValueStore;

#[allow(dead_code)]
pub fn create_temp_store() -> (Arc<SqliteKeyValueStore>, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let db_path = tmp.path().join("storage.db");
    let store =
        SqliteKeyValueStore::new_with_path(db_path).expect("failed to create sqlite store with path");
    (Arc::new(store), tmp)
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// A valid study payload as a model would return it
#[allow(dead_code)]
pub fn study_json() -> Value {
    json!({
        "title": "A Graça que Transforma",
        "theme": "Graça Salvadora",
        "introduction": "Há um poder que nenhum esforço humano pode produzir.",
        "key_verses": [
            { "reference": "Efésios 2:8", "text": "Porque pela graça sois salvos, por meio da fé." },
            { "reference": "Romanos 5:20", "text": "Onde o pecado abundou, superabundou a graça." },
            { "reference": "Tito 2:11", "text": "Porque a graça de Deus se há manifestado." }
        ],
        "sermon_body": "## Introdução\n\nIrmãos, hoje falaremos da graça.",
        "illustration_prompts": [
            "A shepherd carrying a lost lamb at sunrise",
            "An empty tomb bathed in golden light",
            "A prodigal son embraced by his father"
        ],
        "practical_application": "1. Perdoe. 2. Ore. 3. Sirva.",
        "conclusion": "Aceite hoje a graça que transforma.",
        "hymns": [
            { "title": "Graça Excelsa", "number": "301", "reason": "Exalta a graça de Cristo." }
        ]
    })
}
