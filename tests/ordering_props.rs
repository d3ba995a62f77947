use std::cmp::Ordering;

use pathheader::PathHeaderFactory;
use proptest::prelude::*;

const SAMPLE: &[&str] = &[
    r#"//ldml/numbers/symbols[@numberSystem="latn"]/decimal"#,
    r#"//ldml/numbers/symbols[@numberSystem="latn"]/group"#,
    r#"//ldml/numbers/symbols[@numberSystem="arab"]/decimal"#,
    r#"//ldml/numbers/symbols[@numberSystem="latn"]/currencyGroup"#,
    r#"//ldml/numbers/minimalPairs/pluralMinimalPairs[@count="one"]"#,
    r#"//ldml/numbers/minimalPairs/pluralMinimalPairs[@count="other"]"#,
    r#"//ldml/numbers/minimalPairs/pluralMinimalPairs[@count="1000"]"#,
    r#"//ldml/dates/calendars/calendar[@type="gregorian"]/months/monthContext[@type="format"]/monthWidth[@type="wide"]/month[@type="11"]"#,
    r#"//ldml/dates/calendars/calendar[@type="gregorian"]/months/monthContext[@type="stand-alone"]/monthWidth[@type="narrow"]/month[@type="2"]"#,
    r#"//ldml/dates/calendars/calendar[@type="buddhist"]/eras/eraAbbr/era[@type="0"]"#,
    r#"//ldml/dates/fields/field[@type="year-short"]/displayName"#,
    r#"//ldml/dates/fields/field[@type="day"]/relative[@type="-1"]"#,
    r#"//ldml/localeDisplayNames/languages/language[@type="fr"]"#,
    r#"//ldml/localeDisplayNames/languages/language[@type="de"][@alt="short"]"#,
    r#"//ldml/localeDisplayNames/scripts/script[@type="Cyrl"]"#,
    "//ldml/characters/exemplarCharacters",
    r#"//ldml/characters/exemplarCharacters[@type="auxiliary"]"#,
    "//ldml/delimiters/quotationStart",
    "//ldml/posix/messages/yesstr",
    r#"//ldmlBCP47/keyword/key[@name="ca"]/type[@name="gregory"]"#,
    r#"//ldml/units/unitLength[@type="short"]/unit[@type="length-meter"]/unitPattern[@count="one"]"#,
    r#"//ldml/units/unitLength[@type="long"]/unit[@type="length-meter"]/displayName"#,
    "//ldml/something/unmodelled",
];

/// Sorted path order after classifying `order` on a fresh engine.
fn sorted_after(order: &[&str]) -> Vec<String> {
    let f = PathHeaderFactory::builtin().unwrap();
    let mut headers: Vec<_> = order.iter().map(|p| f.classify(p).unwrap()).collect();
    headers.sort();
    headers
        .iter()
        .map(|h| h.original_path().to_string())
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn first_classification_order_does_not_change_sorting(
        order in Just(SAMPLE.to_vec()).prop_shuffle()
    ) {
        let reference = sorted_after(SAMPLE);
        prop_assert_eq!(sorted_after(&order), reference);
    }

    #[test]
    fn pairwise_comparison_is_order_independent(
        a in 0..SAMPLE.len(),
        b in 0..SAMPLE.len(),
    ) {
        let forward = PathHeaderFactory::builtin().unwrap();
        let x1 = forward.classify(SAMPLE[a]).unwrap();
        let y1 = forward.classify(SAMPLE[b]).unwrap();

        let backward = PathHeaderFactory::builtin().unwrap();
        let y2 = backward.classify(SAMPLE[b]).unwrap();
        let x2 = backward.classify(SAMPLE[a]).unwrap();

        prop_assert_eq!(x1.cmp(&y1), x2.cmp(&y2));
        prop_assert_eq!(x1.cmp(&y1) == Ordering::Equal, a == b);
    }
}

#[test]
fn classification_is_idempotent_across_the_sample() {
    let f = PathHeaderFactory::builtin().unwrap();
    for path in SAMPLE {
        let a = f.classify(path).unwrap();
        let b = f.classify(path).unwrap();
        assert!(std::sync::Arc::ptr_eq(&a, &b), "{path}");
    }
}
