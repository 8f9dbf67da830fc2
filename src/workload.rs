use std::{fs, ops::RangeInclusive, path::Path};

use anyhow::{Context, Result, bail};
use rand::prelude::*;

use crate::{core::Ticks, sim::Process};

/// Value ranges for randomly generated processes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadSpec {
    pub arrival: RangeInclusive<Ticks>,
    pub burst: RangeInclusive<Ticks>,
}

impl Default for WorkloadSpec {
    fn default() -> Self {
        Self {
            arrival: 0..=9,
            burst: 1..=10,
        }
    }
}

/// `count` processes with ids `1..=count`, drawn from `spec` with a seeded RNG.
pub fn generate(count: usize, spec: &WorkloadSpec, seed: u64) -> Result<Vec<Process>> {
    if spec.arrival.is_empty() || spec.burst.is_empty() {
        bail!("empty arrival or burst range in {spec:?}");
    }
    if *spec.burst.start() == 0 {
        bail!("burst range must start at 1 or above, got {:?}", spec.burst);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let procs = (1..=count as u64)
        .map(|id| Process {
            id,
            arrival_time: rng.random_range(spec.arrival.clone()),
            burst_time: rng.random_range(spec.burst.clone()),
        })
        .collect();

    Ok(procs)
}

/// Reads a JSON array of `{"id", "arrivalTime", "burstTime"}` objects.
pub fn load(path: &Path) -> Result<Vec<Process>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read workload {}", path.display()))?;
    parse(&text).with_context(|| format!("Failed to parse workload {}", path.display()))
}

pub fn parse(text: &str) -> Result<Vec<Process>> {
    let procs: Vec<Process> = serde_json::from_str(text)?;
    Ok(procs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_processes_stay_in_range() {
        let spec = WorkloadSpec::default();
        let procs = generate(200, &spec, 7).unwrap();

        assert_eq!(procs.len(), 200);
        for (i, p) in procs.iter().enumerate() {
            assert_eq!(p.id, i as u64 + 1);
            assert!(spec.arrival.contains(&p.arrival_time));
            assert!(spec.burst.contains(&p.burst_time));
        }
    }

    #[test]
    fn same_seed_gives_same_workload() {
        let spec = WorkloadSpec::default();
        assert_eq!(
            generate(10, &spec, 42).unwrap(),
            generate(10, &spec, 42).unwrap()
        );
    }

    #[test]
    fn zero_burst_range_is_rejected() {
        let spec = WorkloadSpec {
            arrival: 0..=3,
            burst: 0..=3,
        };
        assert!(generate(3, &spec, 0).is_err());
    }

    #[test]
    fn parses_original_json_shape() {
        let procs = parse(r#"[{"id": 1, "arrivalTime": 0, "burstTime": 5}]"#).unwrap();
        assert_eq!(procs, vec![Process::new(1, 0, 5)]);
    }
}
