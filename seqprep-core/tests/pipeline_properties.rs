use proptest::prelude::*;

use seqprep_core::analyzer::normalizer::{
    collapse_whitespace, remove_accents, remove_digits, remove_non_ascii,
    remove_special_characters, to_lower,
};
use seqprep_core::column::{apply, apply_parallel};
use seqprep_core::{
    normalize, ContractionExpander, ContractionTable, NoContractions, NormalizeError,
    NormalizerConfig, TextNormalizer,
};

const START: &str = "<start> ";
const END: &str = " <end>";

fn body_of(out: &str) -> &str {
    out.strip_prefix(START)
        .and_then(|s| s.strip_suffix(END))
        .unwrap_or_else(|| panic!("untagged output: {out:?}"))
}

/// Mixed-script text with contractions, digits and punctuation sprinkled in.
fn messy_text() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<String>(),
        "[A-Za-z0-9 '’,.!?\\-\t\n]{0,64}",
        proptest::collection::vec(
            prop_oneof![
                Just("Don't"),
                Just("it’s"),
                Just("Y'ALL'D'VE"),
                Just("gonna"),
                Just("café"),
                Just("Ñandú"),
                Just("x²"),
                Just("½"),
                Just("ﬁ"),
                Just("İ"),
                Just("你好"),
                Just("🙂"),
                Just("\u{a0}"),
                Just("  "),
                Just("123"),
                Just("!!"),
                Just("-"),
                Just("'"),
            ],
            0..16,
        )
        .prop_map(|parts| parts.join(" ")),
    ]
}

#[test]
fn empty_input() {
    assert_eq!(normalize(""), "<start>  <end>");
}

#[test]
fn documented_examples() {
    assert_eq!(normalize("Don't Stop!! 123"), "<start> do not stop <end>");
    assert_eq!(normalize("Café Münich"), "<start> cafe munich <end>");
}

#[test]
fn normalizing_twice_tags_twice() {
    let once = normalize("Hello there");
    assert_eq!(once, "<start> hello there <end>");
    assert_eq!(normalize(&once), "<start> start hello there end <end>");
    assert_eq!(normalize(&normalize("")), "<start> start end <end>");
}

#[test]
fn column_driver_contract() {
    let normalizer = TextNormalizer::default();
    let out = apply(&normalizer, &["A", "B"]);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0], normalize("A"));
}

#[test]
fn invalid_bytes() {
    let bytes = vec![0xffu8];
    let err = TextNormalizer::default().normalize_bytes(&bytes).unwrap_err();
    assert!(matches!(err, NormalizeError::Decode { valid_up_to: 0, .. }));
}

proptest! {
    #[test]
    fn output_has_no_digits(text in messy_text()) {
        let out = normalize(&text);
        prop_assert!(!out.bytes().any(|b| b.is_ascii_digit()), "{out:?}");
    }

    #[test]
    fn body_uses_restricted_alphabet(text in messy_text()) {
        let out = normalize(&text);
        let body = body_of(&out);
        prop_assert!(
            body.bytes().all(|b| b.is_ascii_lowercase() || matches!(b, b' ' | b'\'' | b'-')),
            "{body:?}"
        );
    }

    #[test]
    fn body_is_collapsed_and_trimmed(text in messy_text()) {
        let out = normalize(&text);
        let body = body_of(&out);
        prop_assert!(!body.contains("  "), "{body:?}");
        prop_assert!(!body.starts_with(' ') && !body.ends_with(' '), "{body:?}");
    }

    #[test]
    fn single_pass_matches_stage_composition(text in messy_text()) {
        let table = ContractionTable::english();
        let lowered = to_lower(&text);
        let expanded = table.expand(&lowered);
        let staged = collapse_whitespace(&remove_special_characters(&remove_non_ascii(
            &remove_accents(&remove_digits(&expanded)),
        )));

        let bare = TextNormalizer::new(NormalizerConfig { tags: None }, table.clone());
        prop_assert_eq!(bare.normalize(&text), staged);
    }

    #[test]
    fn renormalizing_wraps_again(text in messy_text()) {
        let normalizer = TextNormalizer::with_expander(NoContractions);
        let once = normalizer.normalize(&text);
        let body = body_of(&once);
        let expected = if body.is_empty() {
            "<start> start end <end>".to_owned()
        } else {
            format!("<start> start {body} end <end>")
        };
        prop_assert_eq!(normalizer.normalize(&once), expected);
    }

    #[test]
    fn parallel_apply_matches_sequential(column in proptest::collection::vec(messy_text(), 0..32)) {
        let normalizer = TextNormalizer::default();
        let sequential = apply(&normalizer, &column);
        prop_assert_eq!(sequential.len(), column.len());
        prop_assert_eq!(apply_parallel(&normalizer, &column), sequential);
    }

    #[test]
    fn bytes_and_str_agree(text in any::<String>()) {
        let normalizer = TextNormalizer::default();
        prop_assert_eq!(normalizer.normalize_bytes(text.as_bytes()).unwrap(), normalizer.normalize(&text));
    }
}
