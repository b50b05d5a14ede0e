use std::collections::BTreeSet;
use std::sync::Arc;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::placement::domain::{Licensee, LicenseeStatus, NewLicensee, NewRhu, PrisonId, Rhu, RhuId};
use crate::placement::{placement_router, PlacementRegistry};

pub(super) fn tags(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| value.to_string()).collect()
}

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date")
}

pub(super) fn licensee_intake(prison_id: &str, required: &[&str], conditions: &[&str]) -> NewLicensee {
    NewLicensee {
        prison_id: PrisonId::from(prison_id),
        name: format!("Licensee {prison_id}"),
        release_date: NaiveDate::from_ymd_opt(2025, 6, 29).expect("valid date"),
        licence_conditions: tags(conditions),
        required_matching_attributes: tags(required),
        health_and_misc_notes: String::new(),
    }
}

pub(super) fn rhu_intake(
    name: &str,
    capacity: u32,
    cost_per_day: f64,
    supported: &[&str],
    flags: &[&str],
) -> NewRhu {
    NewRhu {
        name: name.to_string(),
        capacity,
        cost_per_day,
        supported_attributes: tags(supported),
        location_flags: tags(flags),
    }
}

/// Detached licensee for exercising the pure scoring functions.
pub(super) fn licensee(required: &[&str], conditions: &[&str]) -> Licensee {
    Licensee::from_intake(licensee_intake("P900", required, conditions))
}

/// Detached unit for exercising the pure scoring functions.
pub(super) fn rhu(id: usize, name: &str, cost_per_day: f64, supported: &[&str], flags: &[&str]) -> Rhu {
    Rhu::from_intake(RhuId(id), rhu_intake(name, 2, cost_per_day, supported, flags))
}

/// The demonstration data set: three licensees and three units.
pub(super) fn sample_registry() -> PlacementRegistry {
    let registry = PlacementRegistry::new();
    for intake in [
        licensee_intake("P001", &["mental_health_support"], &["no_city_center"]),
        licensee_intake("P002", &["substance_misuse_support"], &["no_alcohol"]),
        licensee_intake("P003", &["wheelchair_access"], &[]),
    ] {
        registry.register_licensee(intake).expect("licensee registers");
    }
    for intake in [
        rhu_intake(
            "RHU North",
            2,
            80.0,
            &["mental_health_support", "wheelchair_access"],
            &["near_city_center"],
        ),
        rhu_intake("RHU South", 3, 60.0, &["substance_misuse_support"], &["near_pubs"]),
        rhu_intake("RHU East", 1, 50.0, &["wheelchair_access"], &[]),
    ] {
        registry.register_rhu(intake).expect("unit registers");
    }
    registry
}

/// Checks both occupancy invariants across the whole registry.
pub(super) fn assert_invariants(registry: &PlacementRegistry) {
    let rhus = registry.list_rhus();
    for rhu in &rhus {
        assert!(
            rhu.occupancy() <= rhu.capacity as usize,
            "{} holds {} with capacity {}",
            rhu.name,
            rhu.occupancy(),
            rhu.capacity
        );
    }

    for licensee in registry.list_licensees() {
        let holding = rhus
            .iter()
            .filter(|rhu| rhu.houses(&licensee.prison_id))
            .count();
        match licensee.status {
            LicenseeStatus::Allocated => assert_eq!(holding, 1, "{licensee}"),
            LicenseeStatus::Pending | LicenseeStatus::Exited => {
                assert_eq!(holding, 0, "{licensee}")
            }
        }
    }
}

pub(super) fn router_with(registry: PlacementRegistry) -> axum::Router {
    placement_router(Arc::new(registry))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
