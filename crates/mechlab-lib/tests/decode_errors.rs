mod common;

use common::chassis::HUNCHBACK;
use mechlab_lib::{
    symbol_sequence, DenialKind, Error, FrequencyTable, LoadoutCoderV3, TracingReporter,
};

/// Fixed-width prefix of a standard chassis stream: header and armor.
const STANDARD_PREFIX: usize = 14;

/// Encode a stock Hunchback whose symbol stream was edited by `edit`.
fn tampered_stream(edit: impl FnOnce(&mut Vec<i32>)) -> Vec<u8> {
    let db = common::catalog();
    let coder = LoadoutCoderV3::with_embedded_table(&db).expect("coder builds");
    let stock = common::stock(&db, HUNCHBACK);

    let mut symbols = symbol_sequence(&stock).expect("symbols");
    edit(&mut symbols);
    let code = FrequencyTable::embedded()
        .expect("embedded table")
        .build_code()
        .expect("code builds");

    let mut bytes = coder.encode(&stock).expect("encodes")[..STANDARD_PREFIX].to_vec();
    bytes.extend(code.encode(&symbols).expect("symbols are coded"));
    bytes
}

#[test]
fn altered_header_is_unsupported() {
    let db = common::catalog();
    let coder = LoadoutCoderV3::with_embedded_table(&db).expect("coder builds");
    let mut bytes = coder
        .encode(&common::stock(&db, HUNCHBACK))
        .expect("encodes");
    bytes[0] = 0xAF;

    let err = coder.decode(&bytes).expect_err("wrong header");
    match err {
        Error::UnsupportedFormat { header } => assert_eq!(header, 0xAF),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn short_input_is_truncated() {
    let db = common::catalog();
    let coder = LoadoutCoderV3::with_embedded_table(&db).expect("coder builds");

    let err = coder.decode(&[]).expect_err("empty");
    assert!(matches!(err, Error::TruncatedData { actual: 0, .. }));

    let err = coder.decode(&[0xAE, 0x07]).expect_err("chassis id cut");
    assert!(matches!(err, Error::TruncatedData { actual: 2, .. }));

    let err = coder
        .decode(&[0xAE, 0x07, 0xD0, 10, 10])
        .expect_err("armor cut");
    assert!(matches!(
        err,
        Error::TruncatedData {
            expected: 14,
            actual: 5
        }
    ));
}

#[test]
fn unknown_chassis_fails_the_whole_decode() {
    let db = common::catalog();
    let coder = LoadoutCoderV3::with_embedded_table(&db).expect("coder builds");
    let mut bytes = coder
        .encode(&common::stock(&db, HUNCHBACK))
        .expect("encodes");
    bytes[1] = 0x00;
    bytes[2] = 0x01;

    let err = coder.decode(&bytes).expect_err("no such chassis");
    assert!(matches!(err, Error::UnknownChassis { id: 1 }));
    assert!(!err.is_recoverable());
}

#[test]
fn cut_compressed_stream_is_malformed() {
    let db = common::catalog();
    let coder = LoadoutCoderV3::with_embedded_table(&db).expect("coder builds");
    let bytes = coder
        .encode(&common::stock(&db, HUNCHBACK))
        .expect("encodes");

    let err = coder
        .decode(&bytes[..bytes.len() - 1])
        .expect_err("stop symbol lost");
    assert!(matches!(err, Error::MalformedStream { .. }));
}

#[test]
fn missing_sentinels_are_malformed() {
    let bytes = tampered_stream(|symbols| symbols.truncate(6));
    let db = common::catalog();
    let coder = LoadoutCoderV3::with_embedded_table(&db).expect("coder builds");
    let err = coder.decode(&bytes).expect_err("locations missing");
    assert!(matches!(err, Error::MalformedStream { .. }));
}

#[test]
fn retired_item_is_skipped_and_reported() {
    // Right arm items start after the four upgrades.
    let bytes = tampered_stream(|symbols| symbols.insert(4, 9999));
    let db = common::catalog();
    let coder = LoadoutCoderV3::with_embedded_table(&db).expect("coder builds");

    let (loadout, errors) = coder.decode(&bytes).expect("decodes with warnings");
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], Error::UnknownItem { id: 9999 }));
    assert!(errors[0].is_recoverable());
    assert_eq!(loadout, common::stock(&db, HUNCHBACK));
}

#[test]
fn rejected_command_is_skipped_and_the_rest_applies() {
    let bytes = tampered_stream(|symbols| {
        let engine = symbols
            .iter()
            .position(|&s| s == 3200)
            .expect("stock engine present");
        symbols.insert(engine + 1, 3201);
        symbols.insert(4, 9999);
    });
    let db = common::catalog();
    let coder = LoadoutCoderV3::with_embedded_table(&db).expect("coder builds");

    let (loadout, errors) = coder.decode(&bytes).expect("decodes with warnings");
    assert_eq!(errors.len(), 2);
    // Stream order: the right arm comes before the center torso.
    assert!(matches!(errors[0], Error::UnknownItem { id: 9999 }));
    match &errors[1] {
        Error::Denied(denial) => assert_eq!(denial.kind, DenialKind::EngineAlreadyPresent),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(loadout, common::stock(&db, HUNCHBACK));
}

#[test]
fn tracing_reporter_counts_recoverable_failures() {
    let bytes = tampered_stream(|symbols| symbols.insert(4, 9999));
    let db = common::catalog();
    let coder = LoadoutCoderV3::with_embedded_table(&db).expect("coder builds");

    let mut reporter = TracingReporter::new();
    let loadout = coder
        .decode_with(&bytes, &mut reporter)
        .expect("decodes with warnings");
    assert_eq!(reporter.reported(), 1);
    assert_eq!(loadout.chassis().id, HUNCHBACK);
}

#[test]
fn ids_missing_from_the_table_cannot_be_encoded() {
    let db = common::catalog();
    let table = FrequencyTable::from_reader("symbol,frequency\n-1,80\n2810,10\n".as_bytes())
        .expect("valid table");
    let coder = LoadoutCoderV3::new(&db, &table).expect("coder builds");

    let err = coder
        .encode(&common::stock(&db, HUNCHBACK))
        .expect_err("most ids are absent");
    assert!(matches!(err, Error::Encoding { .. }));
}
