// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calendar grids of activities grouped by training block.

use crate::models::{Activity, Block, CalendarBlock, CalendarEntry, CalendarWeek};
use chrono::{DateTime, Datelike, Utc};
use std::collections::{BTreeMap, HashSet};

/// Name of the pseudo-block holding activities outside every block.
pub const UNASSIGNED_BLOCK: &str = "Unassigned";

/// Lay activities out in week rows (numbered from `start`) and Monday-first
/// day columns. Activities on the same day keep date order.
pub fn block_grid(activities: &[&Activity], start: DateTime<Utc>) -> Vec<CalendarWeek> {
    let mut sorted: Vec<&Activity> = activities.to_vec();
    sorted.sort_by_key(|activity| activity.date);

    let mut weeks: BTreeMap<i64, [Vec<CalendarEntry>; 7]> = BTreeMap::new();
    for activity in sorted {
        let week_no = (activity.date - start).num_days().div_euclid(7) + 1;
        let day = activity.date.weekday().num_days_from_monday() as usize;
        weeks.entry(week_no).or_default()[day].push(CalendarEntry {
            activity_id: activity.activity_id,
            name: activity.name.clone(),
        });
    }

    weeks
        .into_iter()
        .map(|(week_no, days)| CalendarWeek { week_no, days })
        .collect()
}

/// Group activities into their training blocks, newest block first.
///
/// A block owns every activity dated within its start and end days. Activities
/// belonging to no block are collected in a trailing "Unassigned" entry whose
/// weeks count from the earliest of them.
pub fn calendar_blocks(activities: &[Activity], blocks: &[Block]) -> Vec<CalendarBlock> {
    let mut blocks: Vec<&Block> = blocks.iter().collect();
    blocks.sort_by(|a, b| b.start_date.cmp(&a.start_date));

    let mut assigned: HashSet<u64> = HashSet::new();
    let mut result = Vec::with_capacity(blocks.len() + 1);

    for block in blocks {
        let members: Vec<&Activity> = activities
            .iter()
            .filter(|activity| block.contains(activity.date.date_naive()))
            .collect();
        assigned.extend(members.iter().map(|activity| activity.activity_id));

        let start = crate::time_utils::start_of_day(block.start_date);
        result.push(CalendarBlock {
            block_id: Some(block.block_id),
            name: block.name.clone(),
            period: block.period(),
            activity_count: members.len(),
            weeks: block_grid(&members, start),
        });
    }

    let unassigned: Vec<&Activity> = activities
        .iter()
        .filter(|activity| !assigned.contains(&activity.activity_id))
        .collect();

    if let Some(start) = unassigned.iter().map(|activity| activity.date).min() {
        result.push(CalendarBlock {
            block_id: None,
            name: UNASSIGNED_BLOCK.to_string(),
            period: "---".to_string(),
            activity_count: unassigned.len(),
            weeks: block_grid(&unassigned, start),
        });
    }

    result
}
