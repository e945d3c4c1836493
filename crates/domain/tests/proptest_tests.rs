//! Property-based tests for domain value objects
//!
//! These tests use proptest to verify invariants across many random inputs.

use domain::value_objects::{PlayerState, RateOrdinal, ReportedState, VolumePercent};
use proptest::prelude::*;

// ============================================================================
// VolumePercent Property Tests
// ============================================================================

mod volume_tests {
    use super::*;

    proptest! {
        #[test]
        fn level_index_is_always_in_range(v in 0u8..=100, levels in 1usize..64) {
            let volume = VolumePercent::new(v).unwrap();
            prop_assert!(volume.level_index(levels) < levels);
        }

        #[test]
        fn level_index_matches_floor_below_full_volume(v in 0u8..100, levels in 1usize..64) {
            let volume = VolumePercent::new(v).unwrap();
            prop_assert_eq!(volume.level_index(levels), usize::from(v) * levels / 100);
        }

        #[test]
        fn level_index_is_monotonic(a in 0u8..=100, b in 0u8..=100, levels in 1usize..64) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let lo = VolumePercent::new(lo).unwrap();
            let hi = VolumePercent::new(hi).unwrap();
            prop_assert!(lo.level_index(levels) <= hi.level_index(levels));
        }

        #[test]
        fn values_above_hundred_rejected(v in 101u8..=255) {
            prop_assert!(VolumePercent::new(v).is_err());
        }
    }
}

// ============================================================================
// RateOrdinal Property Tests
// ============================================================================

mod rate_tests {
    use super::*;

    proptest! {
        #[test]
        fn valid_ordinals_index_into_five_levels(r in 1u8..=5) {
            let rate = RateOrdinal::new(r).unwrap();
            prop_assert!(rate.index() < RateOrdinal::LEVELS);
        }

        #[test]
        fn invalid_ordinals_rejected(r in prop_oneof![Just(0u8), 6u8..=255]) {
            prop_assert!(RateOrdinal::new(r).is_err());
        }
    }
}

// ============================================================================
// PlayerState Property Tests
// ============================================================================

mod player_state_tests {
    use super::*;

    proptest! {
        #[test]
        fn only_three_codes_decode(code in 0u8..=255) {
            let decoded = ReportedState(code).decode();
            prop_assert_eq!(decoded.is_ok(), code <= 2);
            if let Ok(state) = decoded {
                prop_assert_eq!(state.code(), code);
            }
        }
    }

    #[test]
    fn all_states_round_trip_through_codes() {
        for state in [PlayerState::Stopped, PlayerState::Playing, PlayerState::Paused] {
            assert_eq!(PlayerState::from_code(state.code()), Ok(state));
        }
    }
}
