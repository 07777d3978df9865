use std::io::Cursor;

use super::*;
use crate::assets::{decode::ImageFormatHint, lookup::PortraitIndex};

fn png(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_fn(w, h, |x, y| image::Rgba([x as u8, y as u8, 90, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn small_card() -> CardSpec {
    CardSpec::new(200, 300, 10, 0.6)
}

fn four_up() -> SheetSpec {
    SheetSpec {
        width: 500,
        height: 700,
        cards_per_sheet: 4,
        margin: 10,
        inter_card_margin: 10,
        ..SheetSpec::default()
    }
}

fn renderer(opts: BatchOptions) -> BatchRenderer {
    BatchRenderer::new(
        small_card(),
        four_up(),
        StyleBook::builtin(),
        PortraitLimits::default(),
        opts,
    )
    .unwrap()
}

fn items() -> Vec<BatchItem> {
    (0..10)
        .map(|i| {
            let tier = if i == 7 { "Mystery" } else { "Epic" };
            let record = CharacterRecord::new(format!("Brainrot {i}"), tier, 100 * i, i, "Standard");
            let portrait = match i {
                0 | 4 => Some(PortraitSource::new(png(64, 48), ImageFormatHint::Auto)),
                5 => Some(PortraitSource::new(b"not a png".to_vec(), ImageFormatHint::Auto)),
                _ => None,
            };
            BatchItem::new(record, portrait)
        })
        .collect()
}

#[test]
fn run_renders_in_order_and_packs_sheets() {
    let renderer = renderer(BatchOptions {
        threads: Some(2),
        chunk_size: 3,
        ..BatchOptions::default()
    });
    let mut sink = CollectSink::new();
    let report = renderer.run(&items(), &mut sink).unwrap();

    assert_eq!(report.total, 10);
    assert_eq!(report.rendered, 10);
    assert_eq!(report.invalid_portraits, 1);
    // Eight records without a usable portrait.
    assert_eq!(report.placeholders, 8);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.sheets, 3);
    assert!(report.unknown_tiers.contains("mystery"));

    assert_eq!(sink.total(), Some(10));
    assert!(sink.is_finished());
    assert_eq!(
        sink.cards.iter().map(|(i, _)| *i).collect::<Vec<_>>(),
        (0..10).collect::<Vec<_>>()
    );
    assert!(!sink.cards[0].1.placeholder_art);
    assert!(sink.cards[5].1.placeholder_art);
    assert!(sink.cards.iter().all(|(_, c)| (c.width(), c.height()) == (200, 300)));

    assert_eq!(
        sink.sheets.iter().map(|s| (s.page_index, s.card_count())).collect::<Vec<_>>(),
        vec![(1, 4), (2, 4), (3, 2)]
    );
    assert_eq!(sink.sheets[2].placements[1].record.name, "Brainrot 9");
}

#[test]
fn parallel_and_serial_runs_are_identical() {
    let mut serial = CollectSink::new();
    renderer(BatchOptions {
        threads: Some(1),
        chunk_size: 10,
        ..BatchOptions::default()
    })
    .run(&items(), &mut serial)
    .unwrap();

    let mut parallel = CollectSink::new();
    renderer(BatchOptions {
        threads: Some(4),
        chunk_size: 2,
        ..BatchOptions::default()
    })
    .run(&items(), &mut parallel)
    .unwrap();

    let prints = |s: &CollectSink| {
        s.cards
            .iter()
            .map(|(_, c)| c.fingerprint())
            .chain(s.sheets.iter().map(Sheet::fingerprint))
            .collect::<Vec<_>>()
    };
    assert_eq!(prints(&serial), prints(&parallel));
}

#[test]
fn skip_policy_records_failures_and_keeps_going() {
    let mut batch = items();
    batch[2].record.name = "   ".to_string();

    let mut sink = CollectSink::new();
    let report = renderer(BatchOptions::default()).run(&batch, &mut sink).unwrap();
    assert_eq!(report.rendered, 9);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.failures[0].index, 2);
    assert_eq!(report.failures[0].kind, ErrorKind::Validation);
    assert!(sink.cards.iter().all(|(i, _)| *i != 2));
    assert_eq!(sink.sheets.len(), 3);
    assert_eq!(sink.sheets[2].card_count(), 1);
}

#[test]
fn abort_policy_stops_the_run() {
    let mut batch = items();
    batch[2].record.tier = String::new();
    let renderer = renderer(BatchOptions {
        failure_policy: FailurePolicy::Abort,
        ..BatchOptions::default()
    });
    let err = renderer.run(&batch, &mut CollectSink::new()).unwrap_err();
    assert!(matches!(err, CardError::Validation(_)));
}

#[test]
fn sheets_can_be_disabled() {
    let mut sink = CollectSink::new();
    let report = renderer(BatchOptions {
        emit_sheets: false,
        ..BatchOptions::default()
    })
    .run(&items(), &mut sink)
    .unwrap();
    assert_eq!(report.sheets, 0);
    assert!(sink.sheets.is_empty());
    assert_eq!(sink.cards.len(), 10);
}

#[test]
fn impossible_layout_fails_before_rendering() {
    let sheet = SheetSpec {
        width: 500,
        height: 350,
        cards_per_sheet: 5,
        ..four_up()
    };
    let err = BatchRenderer::new(
        small_card(),
        sheet,
        StyleBook::builtin(),
        PortraitLimits::default(),
        BatchOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, CardError::Layout(_)));
}

#[test]
fn zero_threads_is_rejected() {
    let err = BatchRenderer::new(
        small_card(),
        four_up(),
        StyleBook::builtin(),
        PortraitLimits::default(),
        BatchOptions {
            threads: Some(0),
            ..BatchOptions::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, CardError::Validation(_)));
}

#[test]
fn empty_batch_still_brackets_the_sink() {
    let mut sink = CollectSink::new();
    let report = renderer(BatchOptions::default()).run(&[], &mut sink).unwrap();
    assert_eq!(report, BatchReport::default());
    assert!(sink.is_finished());
    assert_eq!(sink.total(), Some(0));
}

#[test]
fn loader_runs_match_prebuilt_items() {
    let batch = items();
    let records: Vec<CharacterRecord> = batch.iter().map(|i| i.record.clone()).collect();
    let opts = BatchOptions {
        threads: Some(3),
        chunk_size: 4,
        ..BatchOptions::default()
    };

    let mut eager = CollectSink::new();
    let eager_report = renderer(opts.clone()).run(&batch, &mut eager).unwrap();

    let mut lazy = CollectSink::new();
    let lazy_report = renderer(opts)
        .run_with_loader(
            &records,
            |record| {
                batch
                    .iter()
                    .find(|i| i.record.name == record.name)
                    .and_then(|i| i.portrait.clone())
            },
            &mut lazy,
        )
        .unwrap();

    assert_eq!(eager_report, lazy_report);
    assert_eq!(
        eager.cards.iter().map(|(i, c)| (*i, c.fingerprint())).collect::<Vec<_>>(),
        lazy.cards.iter().map(|(i, c)| (*i, c.fingerprint())).collect::<Vec<_>>()
    );
    assert_eq!(eager.sheets.len(), lazy.sheets.len());
}

#[test]
fn unreadable_portrait_file_degrades_to_placeholder() {
    let index = PortraitIndex::from_files(vec![
        std::env::temp_dir()
            .join(format!("cardpress-missing-{}", std::process::id()))
            .join("Brainrot 1.png"),
    ]);
    let records: Vec<CharacterRecord> = (0..3)
        .map(|i| CharacterRecord::new(format!("Brainrot {i}"), "Epic", 10, 1, "Standard"))
        .collect();

    let mut sink = CollectSink::new();
    let report = renderer(BatchOptions::default())
        .run_with_loader(&records, |r| index.load(&r.name), &mut sink)
        .unwrap();
    assert_eq!(report.rendered, 3);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.invalid_portraits, 1);
    assert_eq!(report.placeholders, 3);
    assert!(sink.cards[1].1.placeholder_art);
}

#[test]
fn pool_build_failures_are_not_render_errors() {
    // A second global pool is always refused, which gives a real build error to map.
    let _ = rayon::ThreadPoolBuilder::new().build_global();
    let build_err = rayon::ThreadPoolBuilder::new().build_global().unwrap_err();
    let err = pool_error(build_err);
    assert_eq!(err.kind(), ErrorKind::Other);
    assert!(err.to_string().contains("rayon thread pool"), "{err}");
}
