//! Pipeline resume specs
//!
//! Verify failed runs keep their place and rewound runs re-drive only the
//! remaining phases.

use crate::prelude::*;
use crate::prelude::assert_eq;

#[test]
fn failed_phase_keeps_state_and_resumes_there() {
    let (mut run, observer) = recorded(Numbers::failing_transform());

    let err = run.process(Options::new()).unwrap_err();
    assert!(matches!(err, RunError::Stage { .. }));
    assert_eq!(run.state(), PipelineState::Transform);
    assert_eq!(run.data(), Some(&vec![1, 2]));

    run.pipeline_mut().fail_transform = false;
    observer.clear();
    assert_eq!(run.process(Options::new()).unwrap(), PipelineState::Complete);

    assert_eq!(run.pipeline().calls, vec!["extract", "transform", "transform", "load"]);
    assert_eq!(run.data(), Some(&vec![1, 2, 3]));
    assert_eq!(observer.transitions().len(), 5);
}

#[test]
fn rewind_to_transform_matches_an_uninterrupted_run() {
    let uninterrupted = Run::execute(Numbers::default(), Options::new()).unwrap();

    let mut run = quiet(Numbers::default());
    run.process(Options::new()).unwrap();
    run.reverse_to(PipelineState::Transform).unwrap();
    run.process(Options::new()).unwrap();

    assert_eq!(run.data(), uninterrupted.data());
    assert_eq!(run.output(), uninterrupted.output());
    assert_eq!(run.pipeline().count("extract"), 1);
    assert_eq!(run.pipeline().count("transform"), 2);
    assert_eq!(run.pipeline().count("load"), 2);
}

#[test]
fn rewind_by_name() {
    let mut run = quiet(Numbers::default());
    run.process(Options::new()).unwrap();

    run.reverse_to_named("before_load").unwrap();
    assert_eq!(run.state(), PipelineState::BeforeLoad);
    assert_eq!(run.output(), None);
}

#[test]
fn rewind_cannot_skip_ahead() {
    let mut run = quiet(Numbers::failing_transform());
    assert!(run.process(Options::new()).is_err());

    let err = run.reverse_to(PipelineState::AfterLoad).unwrap_err();
    assert_eq!(
        err,
        StateError::UnreachableState {
            target: PipelineState::AfterLoad,
            current: PipelineState::Transform,
        }
    );
    assert_eq!(
        err.to_string(),
        "cannot reverse to after_load: run has only reached transform".to_string()
    );
    assert_eq!(run.state(), PipelineState::Transform);
}

#[test]
fn rewind_rejects_unknown_state_names() {
    let mut run = quiet(Numbers::default());
    run.process(Options::new()).unwrap();

    let err = run.reverse_to_named("halfway").unwrap_err();
    assert_eq!(err.to_string(), "invalid state: halfway".to_string());
    assert_eq!(run.state(), PipelineState::Complete);
}

#[test]
fn resumed_run_keeps_its_first_options() {
    let mut run = quiet(Numbers::failing_transform());
    let first = Options::new().with("batch", 7);
    assert!(run.process(first.clone()).is_err());

    run.pipeline_mut().fail_transform = false;
    run.process(Options::new().with("batch", 8)).unwrap();

    assert_eq!(run.options(), Some(&first));
}
