//! Hook specs
//!
//! Verify hooks fire at their points around the stage bodies and can stop
//! a run.

use crate::prelude::*;
use crate::prelude::assert_eq;

fn marking_registry() -> HookRegistry<Numbers> {
    let mut registry = HookRegistry::<Numbers>::new();
    for point in HookPoint::ALL {
        registry.register(point, move |cx| {
            cx.pipeline.calls.push(point.state().name());
            Ok(())
        });
    }
    registry
}

#[test]
fn hooks_fire_around_each_stage_body() {
    let mut run = quiet(Numbers::default()).with_registry(Arc::new(marking_registry()));
    run.process(Options::new()).unwrap();

    assert_eq!(
        run.pipeline().calls,
        vec![
            "before_extract",
            "extract",
            "after_extract",
            "before_transform",
            "transform",
            "after_transform",
            "before_load",
            "load",
            "after_load",
        ]
    );
}

#[test]
fn before_load_guard_stops_an_empty_run() {
    struct EmptySource;

    impl Pipeline for EmptySource {
        const NAME: &'static str = "EmptySource";
        type Data = Vec<i32>;
        type Output = usize;
        type Error = Failure;

        fn extract(&mut self, _: &StageContext<'_, Vec<i32>>) -> Result<Option<Vec<i32>>, Failure> {
            Ok(Some(Vec::new()))
        }

        fn load(&mut self, _: &StageContext<'_, Vec<i32>>) -> Result<Option<usize>, Failure> {
            panic!("load must not run");
        }

        fn register_hooks(hooks: &mut HookRegistry<Self>) {
            hooks.register(HookPoint::BeforeLoad, |cx| match &*cx.data {
                Some(rows) if !rows.is_empty() => Ok(()),
                _ => Err(Failure::new("no data to load")),
            });
        }
    }

    let mut run = quiet(EmptySource);
    let err = run.process(Options::new()).unwrap_err();

    assert_eq!(err.to_string(), "before_load hook failed: no data to load".to_string());
    assert_eq!(run.state(), PipelineState::BeforeLoad);
}

#[test]
fn after_hooks_see_raw_before_it_is_committed() {
    let mut registry = HookRegistry::<Numbers>::new();
    registry.register(HookPoint::AfterExtract, |cx| {
        assert_eq!(*cx.data, None);
        if let Some(rows) = &mut *cx.raw {
            rows.iter_mut().for_each(|n| *n *= 2);
        }
        Ok(())
    });
    let mut run = quiet(Numbers::default()).with_registry(Arc::new(registry));
    run.process(Options::new()).unwrap();

    assert_eq!(run.data(), Some(&vec![2, 4, 3]));
}

#[test]
fn dispatch_outside_the_current_point_is_ignored() {
    let mut run = quiet(Numbers::default()).with_registry(Arc::new(marking_registry()));

    assert!(!run.dispatch(HookPoint::AfterLoad).unwrap());
    assert!(!run.dispatch(HookPoint::BeforeTransform).unwrap());
    assert_eq!(run.state(), PipelineState::BeforeExtract);
    assert!(run.pipeline().calls.is_empty());

    assert!(run.dispatch(HookPoint::BeforeExtract).unwrap());
    assert_eq!(run.state(), PipelineState::Extract);
}

#[test]
fn only_hook_states_are_hook_points() {
    let points: Vec<PipelineState> = PipelineState::ALL
        .into_iter()
        .filter(|state| HookPoint::try_from(*state).is_ok())
        .collect();
    assert_eq!(points.len(), 6);

    assert_eq!(
        HookPoint::try_from(PipelineState::Load),
        Err(StateError::NotAHookPoint {
            state: PipelineState::Load
        })
    );
}
