//! Auto-schedule generator for a full training cycle.
//!
//! Produces a fresh draft assignment for every cycle day from the catalog and
//! the user's preferences:
//! - Spread rest days evenly, always resting on the last day
//! - Fill training days round-robin by focus (weights, cardio, or a mix)
//! - Append mobility to the two candidate days furthest apart
//!
//! The output is fully deterministic. Nothing is persisted here.

use crate::{
    Catalog, CatalogEntry, Error, Focus, Result, Schedule, UserPreferences, WorkoutKind,
};

/// Mobility category kept off generated days while other templates exist
const DEPRIORITIZED_MOBILITY_CATEGORY: &str = "core";

/// Rest day positions for a cycle, ascending
///
/// Position `k` of `rest_days` is `N - floor((rest_days - k) * N / rest_days)`,
/// which gives `{7}`, `{4, 7}`, `{3, 5, 7}` for a 7-day cycle with one to
/// three rest days, and spaces other combinations evenly with day N last.
pub fn rest_positions(cycle_length: u32, rest_days: u32) -> Result<Vec<u32>> {
    if cycle_length == 0 {
        return Err(Error::InvalidConfig("cycle length must be at least 1".into()));
    }
    if rest_days < 1 || rest_days >= cycle_length {
        return Err(Error::InvalidConfig(format!(
            "rest days must be between 1 and {} for a {}-day cycle, got {}",
            cycle_length.saturating_sub(1),
            cycle_length,
            rest_days
        )));
    }

    let n = u64::from(cycle_length);
    let r = u64::from(rest_days);
    Ok((1..=r).map(|k| (n - (r - k) * n / r) as u32).collect())
}

/// Generate a complete cycle assignment
///
/// ## Algorithm
///
/// 1. **Rest placement**: `rest_positions(N, rest_days)`
/// 2. **Training positions**: every other day, ascending
/// 3. **Focus fill**:
///    - all-weights / all-cardio: round-robin over the catalog list
///    - mix: the first `min(weights, ceil(T / 2))` training days get weights,
///      the rest cardio
/// 4. **Mobility**: candidates are cardio days then weights days (each
///    ascending); the first and last candidate get a mobility template
///    appended, rotating through the pool
///
/// Days a catalog could not fill stay unconfigured.
pub fn generate_schedule(
    cycle_length: u32,
    catalog: &Catalog,
    preferences: &UserPreferences,
) -> Result<Schedule> {
    let rest = rest_positions(cycle_length, preferences.rest_days)?;
    let mut schedule = Schedule::new(cycle_length)?;

    for &day in &rest {
        schedule.select_rest(day)?;
    }

    let training: Vec<u32> = (1..=cycle_length).filter(|d| !rest.contains(d)).collect();

    let (weights_slots, cardio_slots): (&[u32], &[u32]) = match preferences.focus {
        Focus::AllWeights => (training.as_slice(), &[][..]),
        Focus::AllCardio => (&[][..], training.as_slice()),
        Focus::Mix => {
            let weights_count = catalog.weights.len().min(training.len().div_ceil(2));
            training.split_at(weights_count)
        }
    };

    tracing::debug!(
        "Generating {}-day cycle: rest {:?}, weights {:?}, cardio {:?}",
        cycle_length,
        rest,
        weights_slots,
        cardio_slots
    );

    let weights_days = assign_round_robin(
        &mut schedule,
        weights_slots,
        &catalog.weights,
        WorkoutKind::Weights,
    )?;
    let cardio_days = assign_round_robin(
        &mut schedule,
        cardio_slots,
        &catalog.cardio,
        WorkoutKind::Cardio,
    )?;

    if preferences.include_mobility {
        add_mobility(&mut schedule, catalog, &cardio_days, &weights_days)?;
    }

    Ok(schedule)
}

/// Assign catalog entries to days in order, wrapping around the catalog
///
/// Returns the days actually assigned (none when the catalog is empty).
fn assign_round_robin(
    schedule: &mut Schedule,
    days: &[u32],
    entries: &[CatalogEntry],
    kind: WorkoutKind,
) -> Result<Vec<u32>> {
    if entries.is_empty() {
        if !days.is_empty() {
            tracing::warn!(
                "No {} entries in catalog, leaving days {:?} unconfigured",
                kind,
                days
            );
        }
        return Ok(Vec::new());
    }

    for (i, &day) in days.iter().enumerate() {
        let entry = &entries[i % entries.len()];
        schedule.add_workout(day, entry.to_planned(kind))?;
        tracing::debug!("Day {}: {} '{}'", day, kind, entry.id);
    }
    Ok(days.to_vec())
}

fn add_mobility(
    schedule: &mut Schedule,
    catalog: &Catalog,
    cardio_days: &[u32],
    weights_days: &[u32],
) -> Result<()> {
    let pool = catalog.mobility_pool();
    if pool.is_empty() {
        tracing::debug!("Mobility requested but catalog has none");
        return Ok(());
    }

    let preferred: Vec<&CatalogEntry> = pool
        .iter()
        .copied()
        .filter(|e| {
            !e.category
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(DEPRIORITIZED_MOBILITY_CATEGORY))
        })
        .collect();
    let pool = if preferred.is_empty() { pool } else { preferred };

    let candidates: Vec<u32> = cardio_days.iter().chain(weights_days).copied().collect();
    let targets: Vec<u32> = match candidates.as_slice() {
        [] => Vec::new(),
        [only] => vec![*only],
        [first, .., last] => vec![*first, *last],
    };

    for (i, &day) in targets.iter().enumerate() {
        let entry = pool[i % pool.len()];
        schedule.add_workout(day, entry.to_planned(WorkoutKind::Mobility))?;
        tracing::debug!("Day {}: mobility '{}'", day, entry.id);
    }
    Ok(())
}
