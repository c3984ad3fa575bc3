//! Pipeline process specs
//!
//! Verify a fresh run walks every state once and ends at complete.

use crate::prelude::*;
use crate::prelude::assert_eq;

/// A pipeline that implements none of its stage bodies
struct Idle;

impl Pipeline for Idle {
    const NAME: &'static str = "Idle";
    type Data = Vec<i32>;
    type Output = usize;
    type Error = Failure;
}

#[test]
fn fresh_run_walks_all_ten_states() {
    let (mut run, observer) = recorded(Numbers::default());
    assert_eq!(run.state(), PipelineState::BeforeExtract);

    assert_eq!(run.process(Options::new()).unwrap(), PipelineState::Complete);

    let visited: Vec<PipelineState> = std::iter::once(PipelineState::BeforeExtract)
        .chain(observer.transitions().into_iter().map(|(_, to)| to))
        .collect();
    assert_eq!(visited, PipelineState::ALL.to_vec());
}

#[test]
fn extract_transform_load_produces_committed_data() {
    let run = Run::execute(Numbers::default(), Options::new()).unwrap();

    assert_eq!(run.data(), Some(&vec![1, 2, 3]));
    assert_eq!(run.output(), Some(&3));
    assert_eq!(run.pipeline().calls, vec!["extract", "transform", "load"]);
}

#[test]
fn pipeline_without_bodies_still_completes() {
    let (mut run, observer) = recorded(Idle);
    run.process(Options::new()).unwrap();

    assert!(run.is_complete());
    assert_eq!(run.data(), None);
    assert_eq!(run.output(), None);
    assert_eq!(observer.transitions().len(), 9);
}

#[test]
fn completed_run_does_nothing_on_process() {
    let (mut run, observer) = recorded(Numbers::default());
    run.process(Options::new()).unwrap();
    observer.clear();

    assert_eq!(run.process(Options::new()).unwrap(), PipelineState::Complete);
    assert_eq!(run.pipeline().calls.len(), 3);
    assert!(observer.transitions().is_empty());
}

#[test]
fn options_reach_stage_bodies() {
    struct Echo;

    impl Pipeline for Echo {
        const NAME: &'static str = "Echo";
        type Data = String;
        type Output = String;
        type Error = Failure;

        fn extract(&mut self, cx: &StageContext<'_, String>) -> Result<Option<String>, Failure> {
            let source = cx
                .options()
                .get_str("source")
                .ok_or_else(|| Failure::new("no source"))?;
            Ok(Some(source.to_string()))
        }

        fn transform(&mut self, cx: &StageContext<'_, String>) -> Result<Option<String>, Failure> {
            Ok(cx.data().map(|source| source.to_uppercase()))
        }
    }

    let run = Run::execute(Echo, Options::new().with("source", "ledger.csv")).unwrap();
    assert_eq!(run.data(), Some(&"LEDGER.CSV".to_string()));

    let err = Run::execute(Echo, Options::new()).unwrap_err();
    assert_eq!(err.to_string(), "extract failed: no source".to_string());
}

#[test]
fn phase_that_produces_nothing_clears_data() {
    struct ExtractOnly;

    impl Pipeline for ExtractOnly {
        const NAME: &'static str = "ExtractOnly";
        type Data = Vec<i32>;
        type Output = usize;
        type Error = Failure;

        fn extract(&mut self, _: &StageContext<'_, Vec<i32>>) -> Result<Option<Vec<i32>>, Failure> {
            Ok(Some(vec![1, 2]))
        }
    }

    let mut run = quiet(ExtractOnly);
    run.process(Options::new()).unwrap();
    assert_eq!(run.data(), None);
    assert_eq!(run.output(), None);
}
