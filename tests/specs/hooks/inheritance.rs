//! Hook inheritance specs
//!
//! Verify a pipeline built on another keeps the parent's hooks and runs
//! them first.

use crate::prelude::*;
use crate::prelude::assert_eq;

/// Parent pipeline that audits every run it is part of
#[derive(Debug, Default)]
struct Audit {
    trail: Vec<String>,
}

impl Pipeline for Audit {
    const NAME: &'static str = "Audit";
    type Data = Vec<i32>;
    type Output = usize;
    type Error = Failure;

    fn register_hooks(hooks: &mut HookRegistry<Self>) {
        hooks
            .register(HookPoint::BeforeExtract, |cx| {
                cx.pipeline.trail.push(format!("audit: start {}", cx.run_id));
                Ok(())
            })
            .register(HookPoint::AfterLoad, |cx| {
                let done = format!("audit: done, loaded {:?}", cx.output);
                cx.pipeline.trail.push(done);
                Ok(())
            });
    }
}

/// Child pipeline that adds its own hook on top of `Audit`
#[derive(Debug, Default)]
struct Import {
    audit: Audit,
}

impl Pipeline for Import {
    const NAME: &'static str = "Import";
    type Data = Vec<i32>;
    type Output = usize;
    type Error = Failure;

    fn extract(&mut self, _: &StageContext<'_, Vec<i32>>) -> Result<Option<Vec<i32>>, Failure> {
        self.audit.trail.push("import: extract".to_string());
        Ok(Some(vec![5]))
    }

    fn load(&mut self, _: &StageContext<'_, Vec<i32>>) -> Result<Option<usize>, Failure> {
        Ok(Some(1))
    }

    fn register_hooks(hooks: &mut HookRegistry<Self>) {
        hooks.register(HookPoint::BeforeExtract, |cx| {
            cx.pipeline.audit.trail.push("import: start".to_string());
            Ok(())
        });
        hooks.inherit::<Audit>(|import| &mut import.audit);
    }
}

#[test]
fn parent_hooks_run_before_the_childs_own() {
    let mut run = quiet(Import::default()).with_id("run-42");
    run.process(Options::new()).unwrap();

    assert_eq!(
        run.pipeline().audit.trail.iter().map(String::as_str).collect::<Vec<_>>(),
        vec![
            "audit: start run-42",
            "import: start",
            "import: extract",
            "audit: done, loaded Some(1)",
        ]
    );
}

#[test]
fn parent_registry_is_unchanged() {
    assert_eq!(HookRegistry::<Audit>::for_pipeline().len(), 2);
    assert_eq!(HookRegistry::<Import>::for_pipeline().len(), 3);
}

#[test]
fn one_registry_serves_many_runs() {
    let registry = Arc::new(HookRegistry::<Import>::for_pipeline());

    for id in ["a", "b"] {
        let mut run = quiet(Import::default())
            .with_id(id)
            .with_registry(Arc::clone(&registry));
        run.process(Options::new()).unwrap();
        assert_eq!(run.pipeline().audit.trail.len(), 4);
        assert_eq!(run.pipeline().audit.trail[0], format!("audit: start {}", id));
    }
}
