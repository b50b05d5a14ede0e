//! Property checks for the occupancy invariants, ranking determinism, conflict symmetry,
//! and ledger additivity.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use proptest::prelude::*;
use rhu_placement::placement::{
    has_conflict, rank_units, LicenseeStatus, NewLicensee, NewRhu, PlacementError,
    PlacementRegistry, PrisonId, RhuId,
};

const TAGS: [&str; 6] = [
    "wheelchair_access",
    "mental_health_support",
    "no_alcohol",
    "near_pubs",
    "no_city_center",
    "near_city_center",
];

#[derive(Debug, Clone)]
enum Operation {
    Allocate(usize, usize),
    Deallocate(usize, usize),
    Exit(usize),
}

fn tag_set() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set(prop::sample::select(TAGS.to_vec()), 0..4)
        .prop_map(|set| set.into_iter().map(str::to_string).collect())
}

fn operation(licensees: usize, units: usize) -> impl Strategy<Value = Operation> {
    prop_oneof![
        4 => (0..licensees, 0..units).prop_map(|(l, r)| Operation::Allocate(l, r)),
        2 => (0..licensees, 0..units).prop_map(|(l, r)| Operation::Deallocate(l, r)),
        1 => (0..licensees).prop_map(Operation::Exit),
    ]
}

fn intake(index: usize, required: BTreeSet<String>, conditions: BTreeSet<String>) -> NewLicensee {
    NewLicensee {
        prison_id: PrisonId(format!("P{index:03}")),
        name: format!("Licensee {index}"),
        release_date: NaiveDate::from_ymd_opt(2025, 12, 1).expect("valid date"),
        licence_conditions: conditions,
        required_matching_attributes: required,
        health_and_misc_notes: String::new(),
    }
}

fn unit(index: usize, capacity: u32, cost_per_day: f64) -> NewRhu {
    NewRhu {
        name: format!("Unit {index}"),
        capacity,
        cost_per_day,
        supported_attributes: BTreeSet::new(),
        location_flags: BTreeSet::new(),
    }
}

fn check_invariants(registry: &PlacementRegistry) -> Result<(), TestCaseError> {
    let rhus = registry.list_rhus();
    for rhu in &rhus {
        prop_assert!(rhu.occupancy() <= rhu.capacity as usize);
    }
    for licensee in registry.list_licensees() {
        let holding = rhus
            .iter()
            .filter(|rhu| rhu.houses(&licensee.prison_id))
            .count();
        let expected = usize::from(licensee.status == LicenseeStatus::Allocated);
        prop_assert_eq!(holding, expected, "{}", licensee);
    }
    Ok(())
}

proptest! {
    #[test]
    fn occupancy_invariants_hold_for_any_operation_sequence(
        capacities in prop::collection::vec(1u32..4, 1..4),
        operations in prop::collection::vec(operation(6, 3), 0..60),
    ) {
        let registry = PlacementRegistry::new();
        for index in 0..6 {
            registry
                .register_licensee(intake(index, BTreeSet::new(), BTreeSet::new()))
                .expect("registers");
        }
        for (index, capacity) in capacities.iter().enumerate() {
            registry.register_rhu(unit(index, *capacity, 10.0)).expect("registers");
        }
        let units = capacities.len();

        for operation in operations {
            let result = match operation {
                Operation::Allocate(l, r) => registry
                    .allocate(&PrisonId(format!("P{l:03}")), RhuId(r % units))
                    .map(|_| ()),
                Operation::Deallocate(l, r) => registry
                    .deallocate(&PrisonId(format!("P{l:03}")), RhuId(r % units))
                    .map(|_| ()),
                Operation::Exit(l) => {
                    registry.set_status(&PrisonId(format!("P{l:03}")), LicenseeStatus::Exited)
                }
            };
            prop_assert!(
                matches!(
                    result,
                    Ok(())
                        | Err(PlacementError::AlreadyAllocated { .. })
                        | Err(PlacementError::TerminalStatus { .. })
                        | Err(PlacementError::StillOccupying { .. })
                ),
                "unexpected outcome {:?}",
                result
            );
            check_invariants(&registry)?;
        }
    }

    #[test]
    fn ranking_is_deterministic_and_sorted(
        required in tag_set(),
        conditions in tag_set(),
        units in prop::collection::vec((tag_set(), tag_set(), 0u32..200), 1..8),
    ) {
        let registry = PlacementRegistry::new();
        registry
            .register_licensee(intake(0, required, conditions))
            .expect("registers");
        for (index, (supported, flags, cost)) in units.into_iter().enumerate() {
            registry
                .register_rhu(NewRhu {
                    name: format!("Unit {index}"),
                    capacity: 2,
                    cost_per_day: f64::from(cost) / 4.0,
                    supported_attributes: supported,
                    location_flags: flags,
                })
                .expect("registers");
        }

        let id = PrisonId::from("P000");
        let first = registry.rank_rhus_for(&id).expect("ranks");
        let second = registry.rank_rhus_for(&id).expect("ranks");
        prop_assert_eq!(&first, &second);

        for pair in first.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
            if pair[0].score == pair[1].score {
                prop_assert!(pair[0].rhu.id < pair[1].rhu.id);
            }
        }

        let licensee = registry.licensee(&id).expect("known");
        let direct = rank_units(&licensee, &registry.list_rhus());
        prop_assert_eq!(first, direct);
    }

    #[test]
    fn conflict_is_symmetric_and_side_effect_free(
        left in tag_set(),
        right in tag_set(),
    ) {
        let registry = PlacementRegistry::new();
        registry
            .register_licensee(intake(0, BTreeSet::new(), left.clone()))
            .expect("registers");
        registry
            .register_licensee(intake(1, BTreeSet::new(), right.clone()))
            .expect("registers");
        let mut forward = unit(0, 1, 5.0);
        forward.location_flags = right.clone();
        let mut reverse = unit(1, 1, 5.0);
        reverse.location_flags = left.clone();
        let forward = registry.register_rhu(forward).expect("registers");
        let reverse = registry.register_rhu(reverse).expect("registers");

        let licensees_before = registry.list_licensees();
        let rhus_before = registry.list_rhus();

        let a = registry.has_conflict(&PrisonId::from("P000"), forward.id).expect("known");
        let b = registry.has_conflict(&PrisonId::from("P001"), reverse.id).expect("known");
        prop_assert_eq!(a, b);
        prop_assert_eq!(a, !left.is_disjoint(&right));

        let direct = has_conflict(&licensees_before[0], &rhus_before[0]);
        prop_assert_eq!(a, direct);

        prop_assert_eq!(registry.list_licensees(), licensees_before);
        prop_assert_eq!(registry.list_rhus(), rhus_before);
    }

    #[test]
    fn ledger_is_additive_over_split_periods(
        pence in 0u32..1_000_000,
        d1 in 0i64..5_000,
        d2 in 0i64..5_000,
    ) {
        let split = PlacementRegistry::new();
        let whole = PlacementRegistry::new();
        let cost = f64::from(pence) / 100.0;
        let a = split.register_rhu(unit(0, 1, cost)).expect("registers");
        let b = whole.register_rhu(unit(0, 1, cost)).expect("registers");

        split.total_cost(d1, a.id).expect("valid");
        split.total_cost(d2, a.id).expect("valid");
        whole.total_cost(d1 + d2, b.id).expect("valid");

        prop_assert_eq!(split.ledger().running_total(), whole.ledger().running_total());
        prop_assert_eq!(
            split.ledger().running_total_pence(),
            (d1 + d2) * i64::from(pence)
        );

        split.reset_costs();
        prop_assert_eq!(split.ledger().running_total(), 0.0);
    }
}
