// Property-based tests for index translation.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use gridkit::{IndexMapType, IndexMapper};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Axis state: a permutation plus hidden and trimmed flags per physical index.
#[derive(Debug, Clone)]
struct AxisState {
    sequence: Vec<usize>,
    hidden: Vec<bool>,
    trimmed: Vec<bool>,
}

fn arb_axis() -> impl Strategy<Value = AxisState> {
    (0usize..40).prop_flat_map(|length| {
        (
            Just((0..length).collect::<Vec<_>>()).prop_shuffle(),
            prop::collection::vec(prop::bool::weighted(0.3), length),
            prop::collection::vec(prop::bool::weighted(0.2), length),
        )
            .prop_map(|(sequence, hidden, trimmed)| AxisState {
                sequence,
                hidden,
                trimmed,
            })
    })
}

fn build(state: &AxisState) -> IndexMapper {
    let mut mapper = IndexMapper::new(state.sequence.len());
    mapper.set_indexes_sequence(state.sequence.clone()).unwrap();
    let hidden = state.hidden.clone();
    mapper.register_index_map("hidden", IndexMapType::Hiding, move |p| hidden[p]);
    let trimmed = state.trimmed.clone();
    mapper.register_index_map("trimmed", IndexMapType::Trimming, move |p| trimmed[p]);
    mapper
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn prop_visual_round_trip(state in arb_axis()) {
        let mapper = build(&state);
        for visual in 0..mapper.count_visual() {
            let physical = mapper.to_physical(visual).unwrap();
            prop_assert_eq!(mapper.to_visual(physical), Some(visual));
            prop_assert!(!state.trimmed[physical]);
        }
        for physical in 0..state.sequence.len() {
            prop_assert_eq!(mapper.to_visual(physical).is_none(), state.trimmed[physical]);
        }
    }

    #[test]
    fn prop_counts_match_flags(state in arb_axis()) {
        let mapper = build(&state);
        let visual = state.trimmed.iter().filter(|t| !**t).count();
        let renderable = state
            .trimmed
            .iter()
            .zip(&state.hidden)
            .filter(|(t, h)| !**t && !**h)
            .count();
        prop_assert_eq!(mapper.count_physical(), state.sequence.len());
        prop_assert_eq!(mapper.count_visual(), visual);
        prop_assert_eq!(mapper.count_renderable(), renderable);
    }

    #[test]
    fn prop_visual_order_follows_sequence(state in arb_axis()) {
        let mapper = build(&state);
        let expected: Vec<usize> = state
            .sequence
            .iter()
            .copied()
            .filter(|&p| !state.trimmed[p])
            .collect();
        let actual: Vec<usize> = (0..mapper.count_visual())
            .map(|v| mapper.to_physical(v).unwrap())
            .collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_renderable_is_ordered_subset_of_visual(state in arb_axis()) {
        let mapper = build(&state);
        let mut last_visual = None;
        for renderable in 0..mapper.count_renderable() {
            let visual = mapper.renderable_to_visual(renderable).unwrap();
            prop_assert!(last_visual.map_or(true, |last| visual > last));
            prop_assert!(!mapper.is_visual_hidden(visual));
            prop_assert_eq!(mapper.visual_to_renderable(visual), Some(renderable));
            let physical = mapper.renderable_to_physical(renderable).unwrap();
            prop_assert_eq!(mapper.to_renderable(physical), Some(renderable));
            last_visual = Some(visual);
        }
    }

    #[test]
    fn prop_unregister_restores_identity(state in arb_axis()) {
        let mut mapper = IndexMapper::new(state.sequence.len());
        let trimmed = state.trimmed.clone();
        mapper.register_index_map("trimmed", IndexMapType::Trimming, move |p| trimmed[p]);
        prop_assert!(mapper.unregister_index_map("trimmed"));
        for index in 0..state.sequence.len() {
            prop_assert_eq!(mapper.to_physical(index), Some(index));
        }
    }
}

// ---------------------------------------------------------------------------
// Examples
// ---------------------------------------------------------------------------

#[test]
fn test_move_with_trimmed_neighbours() {
    let mut mapper = IndexMapper::new(5);
    mapper.register_index_map("trim", IndexMapType::Trimming, |p| p == 1);

    // visual order is [0, 2, 3, 4]; move visual 3 (physical 4) to the front
    mapper.move_indexes(&[3], 0).unwrap();

    let order: Vec<usize> = (0..mapper.count_visual())
        .map(|v| mapper.to_physical(v).unwrap())
        .collect();
    assert_eq!(order, vec![4, 0, 2, 3]);
    assert_eq!(mapper.indexes_sequence(), &[4, 0, 1, 2, 3]);
}

#[test]
fn test_growing_axis_appends_plain_indexes() {
    let mut mapper = IndexMapper::new(3);
    mapper.register_index_map("hide", IndexMapType::Hiding, |p| p == 0);
    mapper.set_length(5);

    assert_eq!(mapper.count_visual(), 5);
    assert_eq!(mapper.count_renderable(), 4);
    assert!(!mapper.is_hidden(4));

    mapper.set_length(2);
    assert_eq!(mapper.count_physical(), 2);
    assert_eq!(mapper.to_physical(2), None);
}

#[test]
fn test_map_value_errors() {
    let mut mapper = IndexMapper::new(2);
    assert!(mapper.set_index_map_value("missing", 0, true).is_err());
    mapper.register_index_map("hide", IndexMapType::Hiding, |_| false);
    assert!(mapper.set_index_map_value("hide", 5, true).is_err());
    mapper.set_index_map_value("hide", 1, true).unwrap();
    assert!(mapper.is_visual_hidden(1));
    assert!(mapper.set_indexes_sequence(vec![0, 0]).is_err());
}
