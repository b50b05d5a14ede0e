use crate::infra::seed_sample_data;
use chrono::{Local, NaiveDate};
use clap::Args;
use rhu_placement::error::AppError;
use rhu_placement::placement::{Licensee, PlacementRegistry, RankedUnit};

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Reference date for release countdowns (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Number of days to cost for each committed placement.
    #[arg(long, default_value_t = 30)]
    pub(crate) days: i64,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { today, days } = args;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let registry = PlacementRegistry::new();
    seed_sample_data(&registry, today)?;

    println!("RHU placement demo (evaluated {today})");
    println!("\nHousing units");
    for rhu in registry.list_rhus() {
        println!("- [{}] {}", rhu.id, rhu);
    }

    for licensee in registry.list_licensees() {
        println!("\n{licensee}");
        println!(
            "  {} days until release",
            licensee.days_until_release(today)
        );

        let ranked = registry.rank_rhus_for(&licensee.prison_id)?;
        render_ranking(&ranked);

        match place_best_candidate(&registry, &licensee, &ranked)? {
            Some(candidate) => {
                let cost = registry.total_cost(days, candidate.rhu.id)?;
                println!(
                    "  Allocated to {} | {} days at £{:.2}/day = £{:.2}",
                    candidate.rhu.name, days, candidate.rhu.cost_per_day, cost
                );
            }
            None => println!("  No conflict-free unit with space; left pending"),
        }
    }

    println!("\nOccupancy");
    for rhu in registry.list_rhus() {
        let occupants = registry.occupants(rhu.id)?;
        let names: Vec<&str> = occupants
            .iter()
            .map(|licensee| licensee.name.as_str())
            .collect();
        println!(
            "- {}: {}/{} [{}]",
            rhu.name,
            rhu.occupancy(),
            rhu.capacity,
            names.join(", ")
        );
    }

    println!(
        "\nTotal accumulated cost: £{:.2}",
        registry.ledger().running_total()
    );

    Ok(())
}

fn render_ranking(ranked: &[RankedUnit]) {
    println!("  Ranked units");
    for (position, entry) in ranked.iter().enumerate() {
        let conflict_note = if entry.conflicting_flags.is_empty() {
            String::new()
        } else {
            format!(" | conflicts: {}", entry.conflicting_flags.join(", "))
        };
        let capacity_note = if entry.rhu.has_space() { "" } else { " | full" };
        println!(
            "  {}. {} score {:.1} (matched {}){}{}",
            position + 1,
            entry.rhu.name,
            entry.score,
            entry.matched_attributes.len(),
            conflict_note,
            capacity_note
        );
    }
}

/// Greedy choice: the best-ranked unit with space and no conflict, re-checked against the
/// registry before committing.
fn place_best_candidate<'a>(
    registry: &PlacementRegistry,
    licensee: &Licensee,
    ranked: &'a [RankedUnit],
) -> Result<Option<&'a RankedUnit>, AppError> {
    for candidate in ranked.iter().filter(|entry| entry.rhu.has_space()) {
        if registry.has_conflict(&licensee.prison_id, candidate.rhu.id)? {
            continue;
        }
        if registry.allocate(&licensee.prison_id, candidate.rhu.id)? {
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}
