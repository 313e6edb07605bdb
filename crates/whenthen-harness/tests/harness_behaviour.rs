//! Behavioural tests for harness adapter execution semantics.

use rstest::{fixture, rstest};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;
use whenthen_harness::{
    Block, HarnessAdapter, HarnessConfig, HostFramework, Pacer, Spec, SpecMetadata, StdHarness,
    WaitFor,
};

#[fixture]
fn harness() -> StdHarness {
    StdHarness::with_config(
        HarnessConfig::new()
            .with_default_timeout(Duration::from_millis(40))
            .with_poll_interval(Duration::from_millis(1)),
    )
}

/// Pacer standing in for an event loop: each pause advances a tick counter.
#[derive(Clone, Default)]
struct TickPacer {
    ticks: Rc<Cell<u32>>,
}

impl Pacer for TickPacer {
    fn pause(&mut self, _interval: Duration) {
        self.ticks.set(self.ticks.get() + 1);
    }
}

#[rstest]
fn std_harness_runs_body_once(harness: StdHarness) {
    let call_count = Rc::new(Cell::new(0u8));
    let call_count_clone = Rc::clone(&call_count);
    let spec = Spec::new(SpecMetadata::default(), move |_| {
        call_count_clone.set(call_count_clone.get() + 1);
    });

    let report = harness.run(spec);
    assert!(report.is_ok_and(|report| report.blocks_run() == 1));
    assert_eq!(call_count.get(), 1);
}

#[rstest]
fn deferred_blocks_wait_for_earlier_latches(harness: StdHarness) {
    let pacer = TickPacer::default();
    let ticks = Rc::clone(&pacer.ticks);
    let observed = Rc::new(RefCell::new(Vec::new()));
    let observed_clone = Rc::clone(&observed);

    let spec = Spec::new(SpecMetadata::new("latch", "orders blocks"), move |scope| {
        let latch_ticks = Rc::clone(&ticks);
        scope.wait_for(WaitFor::new(move || latch_ticks.get() >= 3));
        scope.defer(Block::new(move |_| {
            observed_clone.borrow_mut().push(ticks.get());
        }));
    });

    let report = harness.with_pacer(pacer).run(spec);
    let Ok(report) = report else {
        panic!("latch opens after three ticks");
    };
    assert_eq!(*observed.borrow(), vec![3]);
    assert_eq!(report.polls(), 4);
    assert_eq!(report.waits_resolved(), 1);
}

#[rstest]
fn supports_non_static_borrows(harness: StdHarness) {
    let counter = Cell::new(0u8);
    let spec = Spec::new(SpecMetadata::default(), |scope| {
        scope.runs(|_| counter.set(counter.get() + 1));
        scope.waits_for(|| counter.get() == 1);
        scope.runs(|_| counter.set(counter.get() + 1));
    });

    assert!(harness.run(spec).is_ok());
    assert_eq!(counter.get(), 2);
}

#[rstest]
fn timeout_skips_remaining_blocks(harness: StdHarness) {
    let ran_after = Cell::new(false);
    let spec = Spec::new(SpecMetadata::new("uploads", "finish"), |scope| {
        scope.wait_for(WaitFor::new(|| false).with_message("the upload to finish"));
        scope.runs(|_| ran_after.set(true));
    });

    let Err(err) = harness.run(spec) else {
        panic!("closed latch must time out");
    };
    assert!(err.is_timeout());
    assert_eq!(
        err.to_string(),
        "uploads finish: timed out after 40ms waiting for the upload to finish"
    );
    assert!(!ran_after.get());
}

#[rstest]
fn wait_timeout_overrides_default(harness: StdHarness) {
    let spec = Spec::new(SpecMetadata::default(), |scope| {
        scope.wait_for(WaitFor::new(|| false).with_timeout(Duration::from_millis(2)));
    });

    let Err(err) = harness.run(spec) else {
        panic!("closed latch must time out");
    };
    assert_eq!(
        err.to_string(),
        "<unknown> <unknown>: timed out after 2ms waiting for something to happen"
    );
}

#[test]
#[should_panic(expected = "std harness panic propagation")]
fn std_harness_propagates_block_panics() {
    let spec = Spec::new(SpecMetadata::default(), |scope| {
        scope.runs(|_| panic!("std harness panic propagation"));
    });
    let _ = StdHarness::new().run(spec);
}

#[test]
fn spec_exposes_metadata() {
    let spec = Spec::new(
        SpecMetadata::new("payments", "settle overnight"),
        |_| {},
    );
    assert_eq!(spec.metadata().suite(), "payments");
    assert_eq!(spec.metadata().description(), "settle overnight");
    let (metadata, _body) = spec.into_parts();
    assert_eq!(metadata.full_name(), "payments settle overnight");
}
