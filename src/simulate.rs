//! Synthetic task generation.
//!
//! Creates plausible tasks from fixed word lists and walks each one through a
//! weighted random sequence of lifecycle actions. Everything is driven by a
//! seeded [`StdRng`], so a seed reproduces the same data set.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::error::Result;
use crate::rank::Rank;
use crate::service::TaskService;
use crate::task::{NewTask, TaskAction};

/// Titles paired index-for-index with `DESCRIPTIONS`.
const TITLES: [&str; 21] = [
    "generate fake tasks",
    "AMM script",
    "bonding curve script",
    "write T letter",
    "share tokeneconomics",
    "net hooks",
    "rename map",
    "document CRV tokeneconomics",
    "document network code",
    "refactor tau",
    "darkfi bull thesis",
    "book flights",
    "finish DAO spec",
    "gui library",
    "incremental merkle tree",
    "reply to amy",
    "make vector a mutex hashmap",
    "agorism intro",
    "write tutorial",
    "cashier spec",
    "design note enc scheme",
];

const DESCRIPTIONS: [&str; 21] = [
    "create a script called simulator that creates fake tasks with legit info",
    "write a simple AMM in python",
    "write a simple bonding curve in python",
    "send journal to T",
    "finish token document and share with team",
    "write /net hooks for map",
    "think of a better name for map",
    "explain why CRV tokeneconomics is superior",
    "write top level documentation for /net module",
    "refactor tau to enable merge strategies",
    "write darkfi bull thesis for egirl capital",
    "book trip to US and back",
    "code specification for anonymous DAOs",
    "initial spec for gui library",
    "study incremental merkle trees",
    "write email to amy",
    "refactor map to use hashmaps instead of vectors",
    "write introduction to agorism journal",
    "darkfi testnet tutorial",
    "write trustless cashier specification",
    "create encryption scheme for note",
];

const ASSIGNEES: [&str; 10] = [
    "roz", "nar", "xesan", "parazyd", "mylta", "genjix", "pythia", "armor", "dunklezfr", "dasman",
];

const PROJECTS: [&str; 12] = [
    "tau", "df.token", "phil", "df.net", "df.map", "df.defi", "admin", "df.dao", "df.gui",
    "df.crypto", "df.v0", "df.v1",
];

/// Transition weights out of each state. `stop` is absorbing here.
fn transition_weights(current: TaskAction) -> &'static [(TaskAction, u32)] {
    match current {
        TaskAction::Open => &[(TaskAction::Start, 1), (TaskAction::Open, 2)],
        TaskAction::Start => &[
            (TaskAction::Start, 10),
            (TaskAction::Pause, 10),
            (TaskAction::Stop, 1),
        ],
        TaskAction::Pause => &[
            (TaskAction::Start, 20),
            (TaskAction::Pause, 20),
            (TaskAction::Stop, 1),
        ],
        TaskAction::Stop => &[(TaskAction::Stop, 1)],
    }
}

/// Weighted pick of the action following `current`.
pub fn next_action<R: Rng>(current: TaskAction, rng: &mut R) -> TaskAction {
    let weights = transition_weights(current);
    match WeightedIndex::new(weights.iter().map(|(_, weight)| *weight)) {
        Ok(dist) => weights[dist.sample(rng)].0,
        Err(_) => current,
    }
}

/// A random task. Due days stop at 28 so every `DDMM` exists in every year.
pub fn synthetic_task<R: Rng>(rng: &mut R) -> NewTask {
    let pick = rng.gen_range(0..TITLES.len());
    let day: u32 = rng.gen_range(1..=28);
    let month: u32 = rng.gen_range(1..=12);
    let rank = Rank::from(rng.gen_range(1..=11u64));

    NewTask {
        title: TITLES[pick].to_string(),
        description: DESCRIPTIONS[pick].to_string(),
        assignee: ASSIGNEES.choose(rng).map(|name| name.to_string()),
        project: PROJECTS.choose(rng).map(|name| name.to_string()),
        due: Some(format!("{day:02}{month:02}")),
        rank: Some(rank),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SimulationOptions {
    pub count: usize,
    pub steps: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationSummary {
    pub seed: u64,
    pub created: usize,
    pub transitions: usize,
    pub final_states: BTreeMap<TaskAction, usize>,
}

/// Create `count` tasks, each walked through up to `steps` random actions.
///
/// The clock starts at `start` and advances one minute per action. Due dates
/// roll forward from `today`.
pub fn run(
    service: &TaskService,
    options: SimulationOptions,
    seed: u64,
    start: DateTime<Utc>,
    today: NaiveDate,
) -> Result<SimulationSummary> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut now = start;
    let mut summary = SimulationSummary {
        seed,
        created: 0,
        transitions: 0,
        final_states: BTreeMap::new(),
    };

    for _ in 0..options.count {
        let mut task = service.create(synthetic_task(&mut rng), now, today)?;
        summary.created += 1;

        for _ in 0..options.steps {
            let current = task.current_state();
            if current == TaskAction::Stop {
                break;
            }
            now += Duration::minutes(1);
            let action = next_action(current, &mut rng);
            if service.transition(&mut task, action, now)? {
                summary.transitions += 1;
            }
        }

        *summary.final_states.entry(task.current_state()).or_default() += 1;
        now += Duration::minutes(1);
    }

    tracing::info!(
        seed,
        created = summary.created,
        transitions = summary.transitions,
        "simulation finished"
    );
    Ok(summary)
}
