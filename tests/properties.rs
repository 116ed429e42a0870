//! Property-based invariants for the mask engine, numeric grouping and rule
//! composition.

use fieldmask::mask::{self, Edit, FormatterState, MaskTemplate};
use fieldmask::{CharClass, Formatter, MaskedField, NumberFormat, NumberLocale, Rule};
use indexmap::IndexMap;
use proptest::prelude::*;
use std::sync::Arc;

// ── Strategy helpers ──────────────────────────────────────────────────

fn arb_mask() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("###-##-####"),
        Just("(###) ###-####"),
        Just("####"),
        Just("+# ###"),
        Just("##/##/####"),
        Just("#####-####"),
    ]
}

/// A mask plus a digit string that fits in it.
fn arb_mask_and_raw() -> impl Strategy<Value = (MaskTemplate, String)> {
    arb_mask().prop_flat_map(|mask| {
        let template = MaskTemplate::parse(mask).expect("mask");
        let capacity = template.capacity();
        ("[0-9]{0,20}").prop_map(move |digits| {
            let raw: String = digits.chars().take(capacity).collect();
            (template.clone(), raw)
        })
    })
}

fn mixed_table() -> IndexMap<char, CharClass> {
    let mut table = IndexMap::new();
    table.insert('#', CharClass::digit());
    table.insert('A', CharClass::letter());
    table.insert('X', CharClass::alphanumeric());
    table
}

fn arb_mixed_mask() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("AA-####"),
        Just("A#A #A#"),
        Just("XXX-XXX"),
        Just("(AA) ##/XX"),
        Just("#A#A"),
    ]
}

fn sample_for(class: &CharClass, pick: usize) -> char {
    let pool: &[u8] = match class.name() {
        "digit" => b"0123456789",
        "letter" => b"abcdefghijklmnopqrstuvwxyz",
        _ => b"abcdefghijklmnopqrstuvwxyz0123456789",
    };
    char::from(pool[pick % pool.len()])
}

/// A letter/digit/alphanumeric mask plus a raw value whose every char
/// matches its placeholder.
fn arb_mixed_mask_and_raw() -> impl Strategy<Value = (MaskTemplate, String)> {
    arb_mixed_mask().prop_flat_map(|mask| {
        let template = MaskTemplate::parse_with(mask, &mixed_table()).expect("mask");
        let capacity = template.capacity();
        prop::collection::vec(any::<usize>(), 0..=capacity).prop_map(move |picks| {
            let raw: String = template
                .placeholders()
                .zip(picks)
                .map(|(class, pick)| sample_for(class, pick))
                .collect();
            (template.clone(), raw)
        })
    })
}

fn arb_any_mask_and_raw() -> impl Strategy<Value = (MaskTemplate, String)> {
    prop_oneof![arb_mask_and_raw(), arb_mixed_mask_and_raw()]
}

fn arb_leaf_rule() -> impl Strategy<Value = Rule> {
    prop_oneof![
        Just(Rule::none()),
        Just(!Rule::none()),
        (0usize..6).prop_map(Rule::length),
        (0usize..4, 0usize..6).prop_map(|(min, extra)| Rule::length_in(min..=min + extra)),
        Just(Rule::subset([CharClass::digit()])),
        Just(Rule::subset([CharClass::letter(), CharClass::one_of("-")])),
        Just(Rule::custom("even length", |v: &str| v.chars().count() % 2 == 0)),
    ]
}

fn arb_rule() -> impl Strategy<Value = Rule> {
    arb_leaf_rule().prop_recursive(3, 12, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a.and(b)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a.or(b)),
            inner.prop_map(|a| !a),
        ]
    })
}

// ── Properties ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn extract_inverts_render((template, raw) in arb_any_mask_and_raw()) {
        let display = mask::render(&template, &raw);
        prop_assert_eq!(mask::extract_raw(&template, &display), raw);
    }

    #[test]
    fn render_is_idempotent((template, raw) in arb_any_mask_and_raw()) {
        let display = mask::render(&template, &raw);
        let again = mask::render(&template, &mask::extract_raw(&template, &display));
        prop_assert_eq!(again, display);
    }

    #[test]
    fn insert_never_exceeds_capacity(
        (template, raw) in arb_mask_and_raw(),
        extra in "[0-9]{0,20}",
    ) {
        let state = FormatterState::at_end(raw.clone());
        let out = mask::apply(&template, &state, &Edit::insert(extra.clone(), state.caret));
        let expected = (raw.chars().count() + extra.chars().count()).min(template.capacity());
        prop_assert_eq!(out.state.raw.chars().count(), expected);
        prop_assert!(out.state.caret <= out.state.raw.chars().count());
    }

    #[test]
    fn single_backspace_removes_one_raw_char(
        (template, raw) in arb_any_mask_and_raw(),
        pick in any::<prop::sample::Index>(),
    ) {
        prop_assume!(!raw.is_empty());
        let len = raw.chars().count();
        let caret = pick.index(len) + 1;

        let formatter = Arc::new(Formatter::from_template(template.clone()));
        let mut field = MaskedField::new(formatter).with_default(raw.clone());
        field.set_caret(mask::raw_to_display(&template, caret));
        prop_assert!(field.backspace());

        let mut expected: Vec<char> = raw.chars().collect();
        expected.remove(caret - 1);
        prop_assert_eq!(field.raw(), expected.into_iter().collect::<String>());
    }

    #[test]
    fn caret_maps_back_to_raw((template, raw) in arb_any_mask_and_raw()) {
        let len = raw.chars().count();
        for caret in 0..=len {
            let display = mask::raw_to_display(&template, caret);
            prop_assert_eq!(mask::display_to_raw(&template, len, display), caret);
        }
    }

    #[test]
    fn delete_removes_exactly_the_range(
        (template, raw) in arb_any_mask_and_raw(),
        a in any::<prop::sample::Index>(),
        b in any::<prop::sample::Index>(),
    ) {
        let len = raw.chars().count();
        let (x, y) = (a.index(len + 1), b.index(len + 1));
        let range = x.min(y)..x.max(y);
        let state = FormatterState::at_end(raw.clone());
        let out = mask::apply(&template, &state, &Edit::delete(range.clone()));
        prop_assert_eq!(out.state.raw.chars().count(), len - range.len());

        let mut expected: Vec<char> = raw.chars().collect();
        expected.drain(range);
        prop_assert_eq!(out.state.raw, expected.into_iter().collect::<String>());
    }

    #[test]
    fn de_morgan_holds(a in arb_rule(), b in arb_rule(), value in "[a-z0-9-]{0,8}") {
        let left = (!(a.clone().and(b.clone()))).evaluate(&value).is_valid;
        let right = ((!a).or(!b)).evaluate(&value).is_valid;
        prop_assert_eq!(left, right);
    }

    #[test]
    fn evaluation_is_repeatable(rule in arb_rule(), value in "[a-z0-9-]{0,8}") {
        prop_assert_eq!(rule.evaluate(&value), rule.evaluate(&value));
    }

    #[test]
    fn grouping_only_adds_separators(digits in "[0-9]{0,15}") {
        let format = NumberFormat::integer(NumberLocale::EN_US);
        let display = format.render(&digits);
        let stripped: String = display.chars().filter(|ch| *ch != ',').collect();
        prop_assert_eq!(stripped, digits.clone());
        let len = digits.chars().count();
        for caret in 0..=len {
            let shown = format.raw_to_display(&digits, caret);
            prop_assert_eq!(format.display_to_raw(&digits, shown), caret);
        }
    }
}
