use cpusim::{
    MlfqConfig, PolicyKind, Process, ScheduleEntry, SimConfig, SimError, fifo, mlfq,
    round_robin, simulate, simulate_all, sjf, stcf,
};

fn entry(pid: u64, start_time: u64, finish_time: u64) -> ScheduleEntry {
    ScheduleEntry {
        pid,
        start_time,
        finish_time,
    }
}

fn find(schedule: &[ScheduleEntry], pid: u64) -> ScheduleEntry {
    *schedule
        .iter()
        .find(|e| e.pid == pid)
        .expect("pid missing from schedule")
}

#[test]
fn fifo_runs_in_arrival_order() {
    let procs = [Process::new(1, 0, 5), Process::new(2, 1, 3)];
    assert_eq!(fifo(&procs).unwrap(), vec![entry(1, 0, 5), entry(2, 5, 8)]);
}

#[test]
fn fifo_idles_until_late_arrival_and_keeps_ties_stable() {
    let procs = [
        Process::new(3, 6, 1),
        Process::new(1, 2, 2),
        Process::new(2, 2, 1),
    ];
    assert_eq!(
        fifo(&procs).unwrap(),
        vec![entry(1, 2, 4), entry(2, 4, 5), entry(3, 6, 7)]
    );
}

#[test]
fn sjf_only_considers_arrived_processes() {
    let procs = [
        Process::new(1, 0, 8),
        Process::new(2, 1, 4),
        Process::new(3, 2, 9),
    ];
    assert_eq!(
        sjf(&procs).unwrap(),
        vec![entry(1, 0, 8), entry(2, 8, 12), entry(3, 12, 21)]
    );
}

#[test]
fn sjf_picks_shortest_and_breaks_ties_by_input_order() {
    let procs = [
        Process::new(1, 0, 3),
        Process::new(2, 1, 6),
        Process::new(3, 1, 2),
        Process::new(4, 2, 2),
    ];
    // At t=3: 2 (6), 3 (2) and 4 (2) are ready; 3 wins the tie by index
    assert_eq!(
        sjf(&procs).unwrap(),
        vec![entry(1, 0, 3), entry(3, 3, 5), entry(4, 5, 7), entry(2, 7, 13)]
    );
}

#[test]
fn stcf_preempts_for_shorter_remaining_time() {
    let procs = [Process::new(1, 0, 7), Process::new(2, 2, 4)];
    assert_eq!(
        stcf(&procs).unwrap(),
        vec![entry(1, 0, 11), entry(2, 2, 6)]
    );
}

#[test]
fn stcf_keeps_running_process_on_equal_remaining_time_with_lower_index() {
    // At t=1 process 1 has 3 left and process 2 needs 3: index 0 keeps the CPU
    let procs = [Process::new(1, 0, 4), Process::new(2, 1, 3)];
    assert_eq!(stcf(&procs).unwrap(), vec![entry(1, 0, 4), entry(2, 4, 7)]);
}

#[test]
fn stcf_tie_goes_to_lower_input_index_not_the_runner() {
    // Process 2 is listed first, so on a tie at t=1 it wins over process 1
    let procs = [Process::new(2, 1, 3), Process::new(1, 0, 4)];
    assert_eq!(stcf(&procs).unwrap(), vec![entry(2, 1, 4), entry(1, 0, 7)]);
}

#[test]
fn round_robin_alternates_by_quantum() {
    let procs = [Process::new(1, 0, 4), Process::new(2, 1, 2)];
    assert_eq!(
        round_robin(&procs, 2).unwrap(),
        vec![entry(1, 0, 6), entry(2, 2, 4)]
    );
}

#[test]
fn round_robin_puts_arrival_ahead_of_requeued_process() {
    // Process 2 arrives exactly when process 1's slice ends at t=2
    let procs = [
        Process::new(1, 0, 4),
        Process::new(2, 2, 2),
        Process::new(3, 5, 1),
    ];
    let schedule = round_robin(&procs, 2).unwrap();
    assert_eq!(find(&schedule, 2), entry(2, 2, 4));
    assert_eq!(find(&schedule, 1), entry(1, 0, 6));
    assert_eq!(find(&schedule, 3), entry(3, 6, 7));
}

#[test]
fn round_robin_rejects_zero_quantum() {
    let procs = [Process::new(1, 0, 4)];
    assert!(matches!(
        round_robin(&procs, 0),
        Err(SimError::InvalidConfiguration(_))
    ));
}

#[test]
fn mlfq_long_process_walks_down_all_levels() {
    let procs = [Process::new(1, 0, 20)];
    let schedule = mlfq(&procs, &MlfqConfig::default()).unwrap();
    assert_eq!(schedule, vec![entry(1, 0, 20)]);
}

#[test]
fn mlfq_new_arrival_interleaves_in_top_queue() {
    // Both sit in level 0 and rotate one unit at a time
    let procs = [Process::new(1, 0, 3), Process::new(2, 1, 2)];
    let schedule = mlfq(&procs, &MlfqConfig::default()).unwrap();
    // Units: 1, 2, 1, 2 (done at 4), 1 (done at 5)
    assert_eq!(schedule, vec![entry(1, 0, 5), entry(2, 1, 4)]);
}

#[test]
fn mlfq_demoted_process_yields_to_fresh_arrival() {
    let config = MlfqConfig::new(2, vec![1, 4]).unwrap();
    let procs = [Process::new(1, 0, 3), Process::new(2, 2, 1)];
    // 1 runs t0 and drops to level 1; runs t1 there; 2 arrives at t2 in level 0
    let schedule = mlfq(&procs, &config).unwrap();
    assert_eq!(schedule, vec![entry(1, 0, 4), entry(2, 2, 3)]);
}

#[test]
fn mlfq_lowest_level_process_stays_in_lowest_level() {
    let config = MlfqConfig::new(2, vec![1, 1]).unwrap();
    let procs = [Process::new(1, 0, 5), Process::new(2, 0, 5)];
    let schedule = mlfq(&procs, &config).unwrap();
    // Both bottom out after one unit and then alternate each unit
    assert_eq!(schedule, vec![entry(1, 0, 9), entry(2, 1, 10)]);
}

#[test]
fn mlfq_rejects_mismatched_quanta() {
    assert!(matches!(
        MlfqConfig::new(3, vec![4, 8]),
        Err(SimError::InvalidConfiguration(_))
    ));
}

#[test]
fn invalid_process_is_rejected_by_every_policy() {
    let procs = [Process::new(1, 0, 2), Process::new(2, 1, 0)];
    let config = SimConfig::default();
    for kind in PolicyKind::ALL {
        let err = simulate(kind, &procs, &config).unwrap_err();
        assert_eq!(
            err,
            SimError::InvalidProcess {
                pid: 2,
                reason: "burst time must be positive"
            },
            "{kind}"
        );
    }
}

#[test]
fn workload_past_the_clock_limit_is_rejected() {
    let late = [Process::new(1, u64::MAX - 1, 5)];
    assert!(matches!(fifo(&late), Err(SimError::InvalidProcess { pid: 1, .. })));
    assert!(matches!(
        round_robin(&late, 2),
        Err(SimError::InvalidProcess { pid: 1, .. })
    ));

    // Each arrival fits, but not the work queued behind the last one
    let crowded = [Process::new(1, u64::MAX - 10, 6), Process::new(2, 0, 6)];
    for kind in PolicyKind::ALL {
        assert!(
            simulate(kind, &crowded, &SimConfig::default()).is_err(),
            "{kind}"
        );
    }
}

#[test]
fn empty_workload_gives_empty_schedules() {
    for outcome in simulate_all(&[], &SimConfig::default()).unwrap() {
        assert!(outcome.schedule.is_empty(), "{}", outcome.policy);
    }
}

#[test]
fn unit_burst_alone_finishes_one_tick_after_start() {
    let procs = [Process::new(9, 4, 1)];
    for outcome in simulate_all(&procs, &SimConfig::default()).unwrap() {
        assert_eq!(outcome.schedule, vec![entry(9, 4, 5)], "{}", outcome.policy);
    }
}

#[test]
fn simulate_all_reports_policies_in_canonical_order() {
    let procs = [Process::new(1, 0, 1)];
    let names: Vec<_> = simulate_all(&procs, &SimConfig::default())
        .unwrap()
        .into_iter()
        .map(|o| o.policy)
        .collect();
    assert_eq!(names, vec!["FIFO", "SJF", "STCF", "RR", "MLFQ"]);
}
