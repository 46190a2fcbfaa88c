mod common;

use std::fs;
use std::io::Write;
use std::path::Path;

use common::RecordingLauncher;
use prs_core::{LaunchRequest, SamplerVariant, SweepError};
use prs_sweep::{
    run_plan, BuildStep, DryRunLauncher, FailurePolicy, LedgerState, RunOpts, SweepPlan,
    SweepStrategy,
};

fn small_plan(results_dir: &Path) -> SweepPlan {
    SweepPlan {
        executable: "./build/ParRandomSampling".into(),
        results_dir: results_dir.to_path_buf(),
        sweep_label: "run".to_string(),
        samplers: vec![SamplerVariant::Naive, SamplerVariant::ParPerm],
        threads: vec![1, 4],
        n: 1_000,
        repeats: 1,
        strategy: SweepStrategy::Percent {
            percents: vec![10, 50],
        },
        build: Some(BuildStep {
            program: "cmake".into(),
            args: vec!["--build".to_string(), "build".to_string()],
        }),
        ..SweepPlan::default()
    }
}

#[test]
fn sweeps_samplers_then_threads_then_points() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let plan = small_plan(temp.path());
    let mut launcher = RecordingLauncher::appending();
    let report = run_plan(&plan, &mut launcher, &RunOpts::default()).expect("run");

    assert_eq!(launcher.requests[0].program, Path::new("cmake"));
    assert!(report.built);

    let trials = launcher.trials();
    assert_eq!(trials.len() as u64, plan.total_launches());
    let expected: Vec<(String, u32, u64, u32)> = ["naive", "parperm"]
        .iter()
        .flat_map(|sampler| {
            [1u32, 4].into_iter().flat_map(move |threads| {
                [100u64, 500].into_iter().flat_map(move |k| {
                    (0..=1u32).map(move |rep| (sampler.to_string(), threads, k, rep))
                })
            })
        })
        .collect();
    assert_eq!(trials, expected);

    for request in launcher.requests.iter().skip(1) {
        let threads = &request.args[0];
        assert_eq!(request.env["PARLAY_NUM_THREADS"], *threads);
    }

    for threads in [1, 4] {
        let ledger = temp.path().join(format!("run_{threads}_1K.csv"));
        let contents = fs::read_to_string(&ledger).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("algo,k,num_threads,time"));
        assert_eq!(lines.count(), 8);
        assert!(!contents.lines().skip(1).any(|l| l.starts_with("algo")));
    }

    assert_eq!(report.launches, 16);
    assert_eq!(report.sweeps.len(), 4);
    assert_eq!(report.sweeps[0].ledger_state, LedgerState::Created);
    assert_eq!(report.sweeps[2].ledger_state, LedgerState::Present);
    assert!(report.sweeps.iter().all(|s| s.rows_appended == Some(4) && s.points == 2));
    assert!(report.is_clean());
}

#[test]
fn fixed_point_sweep_launches_repeats_plus_one() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let plan = SweepPlan {
        results_dir: temp.path().to_path_buf(),
        sweep_label: "huge_k_results".to_string(),
        samplers: vec![SamplerVariant::SeqPermFull],
        threads: vec![24],
        repeats: 3,
        strategy: SweepStrategy::Fixed {
            k: Some(250_000_000),
        },
        ..SweepPlan::default()
    };
    let mut launcher = RecordingLauncher::default();
    run_plan(&plan, &mut launcher, &RunOpts::default()).unwrap();

    let trials = launcher.trials();
    assert_eq!(trials.len(), 4);
    assert!(trials.iter().all(|t| t.2 == 250_000_000));
    let repeats: Vec<u32> = trials.iter().map(|t| t.3).collect();
    assert_eq!(repeats, vec![0, 1, 2, 3]);
    assert!(temp.path().join("huge_k_results_24_500M.csv").exists());
}

fn build_fails(request: &LaunchRequest) -> bool {
    request.program == Path::new("cmake")
}

#[test]
fn build_failure_aborts_before_any_trial() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let plan = small_plan(temp.path());
    let mut launcher = RecordingLauncher::failing(build_fails);
    let err = run_plan(&plan, &mut launcher, &RunOpts::default()).unwrap_err();

    assert!(matches!(err, SweepError::Build(_)));
    assert_eq!(launcher.requests.len(), 1);
    assert!(launcher.trials().is_empty());
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn skip_build_bypasses_build_step() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let plan = small_plan(temp.path());
    let mut launcher = RecordingLauncher::failing(build_fails);
    let opts = RunOpts {
        skip_build: true,
        ..RunOpts::default()
    };
    let report = run_plan(&plan, &mut launcher, &opts).unwrap();
    assert!(!report.built);
    assert_eq!(launcher.requests.len(), 16);
}

#[test]
fn missing_results_directory_is_fatal() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let plan = small_plan(&temp.path().join("missing"));
    let mut launcher = RecordingLauncher::default();
    let opts = RunOpts {
        skip_build: true,
        ..RunOpts::default()
    };
    let err = run_plan(&plan, &mut launcher, &opts).unwrap_err();
    assert!(matches!(err, SweepError::FileSystem(_)));
    assert!(launcher.requests.is_empty());
}

fn k_500_fails(request: &LaunchRequest) -> bool {
    request.args.get(3).map(String::as_str) == Some("500")
}

#[test]
fn trial_failures_are_reported_not_hidden() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let mut plan = small_plan(temp.path());
    plan.build = None;
    let mut launcher = RecordingLauncher::failing(k_500_fails);
    let report = run_plan(&plan, &mut launcher, &RunOpts::default()).unwrap();
    assert_eq!(report.launches, 16);
    assert_eq!(report.failures.len(), 8);
    assert!(report.failures.iter().all(|f| f.k == 500));
    assert!(!report.is_clean());
}

#[test]
fn dry_run_counts_every_planned_launch() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let plan = small_plan(temp.path());
    let mut launcher = DryRunLauncher::default();
    let opts = RunOpts {
        skip_build: true,
        dry_run: true,
    };
    let report = run_plan(&plan, &mut launcher, &opts).unwrap();
    assert_eq!(launcher.launched, plan.total_launches());
    assert!(report.dry_run);
    assert!(report.sweeps.iter().all(|s| s.rows_appended == Some(0)));
}

fn crash_with_garbage_row(request: &LaunchRequest) -> bool {
    if request.args.get(3).map(String::as_str) != Some("100") {
        return false;
    }
    let mut ledger = fs::OpenOptions::new()
        .append(true)
        .open(&request.args[1])
        .unwrap();
    ledger.write_all(b"naive,100,1,\xff\xfe\n").unwrap();
    true
}

#[test]
fn malformed_rows_from_crashed_trials_do_not_stop_the_sweep() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let mut plan = small_plan(temp.path());
    plan.build = None;
    let mut launcher = RecordingLauncher::failing(crash_with_garbage_row);
    let report = run_plan(&plan, &mut launcher, &RunOpts::default()).expect("run");

    assert_eq!(report.launches, 16);
    assert_eq!(report.failures.len(), 8);
    assert!(report.failures.iter().all(|f| f.k == 100));
    assert_eq!(report.sweeps[0].rows_appended, Some(2));
    assert_eq!(report.sweeps[2].rows_appended, Some(2));
    assert!(report.aborted.is_none());
}

#[test]
fn abort_policy_keeps_the_partial_report() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let mut plan = small_plan(temp.path());
    plan.build = None;
    plan.on_failure = FailurePolicy::Abort;
    let mut launcher = RecordingLauncher::failing(k_500_fails);
    let report = run_plan(&plan, &mut launcher, &RunOpts::default()).expect("report");

    let err = report.aborted.as_ref().expect("aborted");
    assert!(matches!(err, SweepError::Trial(_)));
    assert_eq!(err.info().context["k"], "500");
    assert_eq!(launcher.trials().len(), 3);
    assert_eq!(report.launches, 3);
    assert_eq!(report.sweeps.len(), 1);
    assert_eq!(report.sweeps[0].points, 1);
    assert_eq!(report.sweeps[0].launches, 3);
    assert!(!report.is_clean());
}
