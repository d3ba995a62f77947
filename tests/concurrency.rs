use std::thread;

use pathheader::{NoMatchPolicy, PathHeader, PathHeaderFactory};

const RULES: &str = r#"
%SYS=([^"]*)
//ldml/numbers/symbols[@numberSystem="%SYS"]/(decimal|group)	Numbers;Symbols;Symbols ($1);$2
//ldml/numbers/minimalPairs/pluralMinimalPairs[@count="([^"]*)"]	Numbers;Minimal Pairs;Plural;&count($1)
//ldml/localeDisplayNames/territories/territory[@type="([^"]*)"]	Locale Display Names;Territories;Names;$1
//ldml/units/unit[@type="([^"]*)"]	Units;Other Units;Units;$1;read-only
//ldml/special/(.*)	Special;Unknown;Other;$1
"#;

const WORKERS: usize = 8;
const PATHS: usize = 100_000;

fn synthetic(i: usize) -> String {
    match i % 5 {
        0 => format!(r#"//ldml/numbers/symbols[@numberSystem="ns{}"]/{}"#, i / 10, if i % 2 == 0 { "decimal" } else { "group" }),
        1 => format!(r#"//ldml/numbers/minimalPairs/pluralMinimalPairs[@count="{i}"]"#),
        2 => format!(r#"//ldml/localeDisplayNames/territories/territory[@type="T{i}"]"#),
        3 => format!(r#"//ldml/units/unit[@type="u{i}"]"#),
        _ => format!("//ldml/special/item{i}"),
    }
}

fn engine() -> PathHeaderFactory {
    PathHeaderFactory::builder().rules_text(RULES).build().unwrap()
}

/// Everything that identifies a classification, orders included.
fn fingerprint(h: &PathHeader) -> (String, String, i32, i32, String) {
    (
        h.original_path().to_string(),
        h.to_string(),
        h.header_order(),
        h.code_order(),
        h.status().to_string(),
    )
}

#[test]
fn eight_workers_agree_with_a_sequential_run() {
    // Every path appears twice so workers race on the same keys
    let paths: Vec<String> = (0..PATHS).map(|i| synthetic(i % (PATHS / 2))).collect();

    let sequential = engine();
    let mut expected: Vec<_> = paths
        .iter()
        .map(|p| fingerprint(&sequential.classify(p).unwrap()))
        .collect();
    expected.sort();
    expected.dedup();

    let concurrent = engine();
    let chunk = paths.len().div_ceil(WORKERS);
    let mut actual: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = paths
            .chunks(chunk)
            .map(|part| {
                let engine = &concurrent;
                s.spawn(move || {
                    part.iter()
                        .map(|p| fingerprint(&engine.classify(p).unwrap()))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    });
    actual.sort();
    actual.dedup();

    assert_eq!(expected.len(), PATHS / 2);
    assert_eq!(actual, expected);
    assert!(concurrent.display_collisions().is_empty());
    assert!(concurrent.unmatched_rules().is_empty());
}

#[test]
fn parallel_batches_match_sequential_order() {
    let paths: Vec<String> = (0..5_000).rev().map(synthetic).collect();

    let f = engine();
    let report = f.classify_batch(&paths, NoMatchPolicy::Fail).unwrap();

    let reference = engine();
    let mut expected: Vec<PathHeader> = paths
        .iter()
        .map(|p| (*reference.classify(p).unwrap()).clone())
        .collect();
    expected.sort();

    let actual: Vec<PathHeader> = report.headers.iter().map(|h| (**h).clone()).collect();
    assert_eq!(actual, expected);
}
