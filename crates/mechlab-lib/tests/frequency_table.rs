mod common;

use std::fs;

use mechlab_lib::{FrequencyTable, LoadoutCoderV3, SENTINEL};
use tempfile::TempDir;

#[test]
fn embedded_table_covers_every_catalog_id() {
    let db = common::catalog();
    let table = FrequencyTable::embedded().expect("embedded table loads");

    let ids = db
        .items()
        .map(|i| i.id)
        .chain(db.upgrades().map(|u| u.id))
        .chain(db.pods().map(|p| p.id));
    for id in ids {
        let symbol = i32::try_from(id).expect("fixture ids fit");
        assert!(table.get(symbol).is_some(), "id {id} has no frequency");
    }
    assert!(table.get(SENTINEL).is_some());
}

#[test]
fn corpus_table_counts_stock_symbols() {
    let db = common::catalog();
    let table = FrequencyTable::from_corpus(&db).expect("corpus table");

    // Eight sentinels for each empty and stock loadout.
    let loadouts = 2 * db.chassis_sorted().len() as u64;
    assert_eq!(table.get(SENTINEL), Some(1 + 8 * loadouts));
    // Medium lasers: three on the Hunchback, four on the Jenner.
    assert_eq!(table.get(1500), Some(1 + 3 + 4));
    // Never equipped anywhere.
    assert_eq!(table.get(1502), Some(1));
}

#[test]
fn regenerated_table_is_written_and_usable() {
    let db = common::catalog();
    let table = FrequencyTable::from_corpus(&db).expect("corpus table");

    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("frequencies.csv");
    let file = fs::File::create(&path).expect("create csv");
    table.write_csv(file).expect("csv written");

    let reloaded = FrequencyTable::from_path(&path).expect("csv reloads");
    assert_eq!(reloaded, table);

    let coder = LoadoutCoderV3::new(&db, &reloaded).expect("coder builds");
    let stock = common::stock(&db, common::chassis::TIMBER_WOLF);
    let (decoded, errors) = coder
        .decode(&coder.encode(&stock).expect("encodes"))
        .expect("decodes");
    assert!(errors.is_empty());
    assert_eq!(decoded, stock);
}
