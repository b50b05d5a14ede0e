use chrono::{Duration, NaiveDate};
use metrics_exporter_prometheus::PrometheusHandle;
use rhu_placement::placement::{NewLicensee, NewRhu, PlacementError, PlacementRegistry, PrisonId};
use std::collections::BTreeSet;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn tags(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn sample_licensee(
    name: &str,
    prison_id: &str,
    release_date: NaiveDate,
    licence_conditions: &[&str],
    required_matching_attributes: &[&str],
) -> NewLicensee {
    NewLicensee {
        prison_id: PrisonId::from(prison_id),
        name: name.to_string(),
        release_date,
        licence_conditions: tags(licence_conditions),
        required_matching_attributes: tags(required_matching_attributes),
        health_and_misc_notes: String::new(),
    }
}

fn sample_rhu(
    name: &str,
    capacity: u32,
    cost_per_day: f64,
    supported_attributes: &[&str],
    location_flags: &[&str],
) -> NewRhu {
    NewRhu {
        name: name.to_string(),
        capacity,
        cost_per_day,
        supported_attributes: tags(supported_attributes),
        location_flags: tags(location_flags),
    }
}

/// Register the demonstration licensees and units. Release dates are relative to `today`.
pub(crate) fn seed_sample_data(
    registry: &PlacementRegistry,
    today: NaiveDate,
) -> Result<(), PlacementError> {
    let licensees = [
        sample_licensee(
            "John Smith",
            "P001",
            today + Duration::days(120),
            &["no_city_center"],
            &["mental_health_support"],
        ),
        sample_licensee(
            "Jane Doe",
            "P002",
            today + Duration::days(60),
            &["no_alcohol"],
            &["substance_misuse_support"],
        ),
        sample_licensee(
            "Alex Brown",
            "P003",
            today + Duration::days(200),
            &[],
            &["wheelchair_access"],
        ),
    ];
    for licensee in licensees {
        registry.register_licensee(licensee)?;
    }

    let rhus = [
        sample_rhu(
            "RHU North",
            2,
            80.0,
            &["mental_health_support", "wheelchair_access"],
            &["near_city_center"],
        ),
        sample_rhu(
            "RHU South",
            3,
            60.0,
            &["substance_misuse_support"],
            &["near_pubs"],
        ),
        sample_rhu("RHU East", 1, 50.0, &["wheelchair_access"], &[]),
    ];
    for rhu in rhus {
        registry.register_rhu(rhu)?;
    }

    Ok(())
}
