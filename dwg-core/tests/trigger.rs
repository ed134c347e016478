//! Behavioral tests for `Trigger<E>`.

use std::sync::{Arc, Mutex};

use dwg_core::{Callback, Context, DwgError, Event, Trigger, ALL};

#[derive(Clone)]
struct Note {
    kind: &'static str,
    value: i32,
}

impl Note {
    fn new(kind: &'static str) -> Self {
        Self { kind, value: 0 }
    }
}

impl Event for Note {
    fn event_type(&self) -> &str {
        self.kind
    }
}

/// Helper: create a shared call-log that listeners append to.
fn make_log() -> Arc<Mutex<Vec<String>>> {
    Arc::new(Mutex::new(Vec::new()))
}

/// Helper: a callback that records `tag` on each invocation.
fn record(log: &Arc<Mutex<Vec<String>>>, tag: &'static str) -> Callback<Note> {
    let log = Arc::clone(log);
    Callback::new(move |_ctx, _event: &Note| {
        log.lock().unwrap().push(tag.to_owned());
        Ok(())
    })
}

// ============================================================================
// Ordering and deduplication
// ============================================================================

#[test]
fn listeners_run_in_registration_order() {
    let trigger: Trigger<Note> = Trigger::new();
    let log = make_log();

    trigger.on("x", record(&log, "a"), Context::none());
    trigger.on("x", record(&log, "b"), Context::none());
    trigger.on("x", record(&log, "c"), Context::none());

    trigger.emit(&Note::new("x")).expect("listeners succeed");

    assert_eq!(*log.lock().unwrap(), vec!["a", "b", "c"]);
}

#[test]
fn reregistering_the_same_pair_does_not_duplicate_delivery() {
    let trigger: Trigger<Note> = Trigger::new();
    let log = make_log();
    let cb = record(&log, "a");

    trigger.on("x", cb.clone(), Context::none());
    trigger.on("x", cb, Context::none());

    trigger.emit(&Note::new("x")).expect("listeners succeed");

    assert_eq!(*log.lock().unwrap(), vec!["a"]);
}

#[test]
fn same_callback_under_two_contexts_is_two_listeners() {
    let trigger: Trigger<Note> = Trigger::new();
    let log = make_log();
    let cb = record(&log, "a");

    trigger.on("x", cb.clone(), Context::none());
    trigger.on("x", cb, Context::new("other"));

    trigger.emit(&Note::new("x")).expect("listeners succeed");

    assert_eq!(*log.lock().unwrap(), vec!["a", "a"]);
}

#[test]
fn emission_only_reaches_the_matching_type() {
    let trigger: Trigger<Note> = Trigger::new();
    let log = make_log();

    trigger.on("x", record(&log, "x"), Context::none());
    trigger.on("y", record(&log, "y"), Context::none());

    trigger.emit(&Note::new("y")).expect("listeners succeed");

    assert_eq!(*log.lock().unwrap(), vec!["y"]);
}

// ============================================================================
// Wildcard channel
// ============================================================================

#[test]
fn all_listeners_run_after_type_specific_listeners_for_any_type() {
    let trigger: Trigger<Note> = Trigger::new();
    let log = make_log();

    // Registered first, still runs last within each emission.
    trigger.on(ALL, record(&log, "all"), Context::none());
    trigger.on("x", record(&log, "x"), Context::none());
    trigger.on("y", record(&log, "y"), Context::none());

    trigger.emit(&Note::new("x")).expect("listeners succeed");
    trigger.emit(&Note::new("y")).expect("listeners succeed");
    trigger.emit(&Note::new("z")).expect("listeners succeed");

    assert_eq!(
        *log.lock().unwrap(),
        vec!["x", "all", "y", "all", "all"]
    );
}

// ============================================================================
// One-shot listeners
// ============================================================================

#[test]
fn once_fires_exactly_once_across_two_emissions() {
    let trigger: Trigger<Note> = Trigger::new();
    let log = make_log();

    trigger.once("x", record(&log, "once"), Context::none());
    trigger.on("x", record(&log, "always"), Context::none());

    trigger.emit(&Note::new("x")).expect("listeners succeed");
    trigger.emit(&Note::new("x")).expect("listeners succeed");

    assert_eq!(*log.lock().unwrap(), vec!["once", "always", "always"]);
}

#[test]
fn off_cancels_a_pending_once_before_it_ever_fires() {
    let trigger: Trigger<Note> = Trigger::new();
    let log = make_log();
    let cb = record(&log, "once");

    trigger.once("x", cb.clone(), Context::none());
    trigger.off("x", &cb, &Context::none());

    trigger.emit(&Note::new("x")).expect("listeners succeed");

    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn once_does_not_refire_on_reentrant_emission_of_the_same_type() {
    let trigger: Arc<Trigger<Note>> = Arc::new(Trigger::new());
    let count = Arc::new(Mutex::new(0));

    let reentrant = {
        let trigger = Arc::clone(&trigger);
        let count = Arc::clone(&count);
        Callback::new(move |_ctx, _event: &Note| {
            *count.lock().unwrap() += 1;
            // The registration was already removed, so this reaches
            // nothing.
            trigger.emit(&Note::new("x"))
        })
    };
    trigger.once("x", reentrant, Context::none());

    trigger.emit(&Note::new("x")).expect("listeners succeed");

    assert_eq!(*count.lock().unwrap(), 1);
}

// ============================================================================
// Snapshot semantics during emit
// ============================================================================

#[test]
fn removal_during_emit_does_not_affect_the_current_pass() {
    // Subscribe A, B, C under "x"; inside A, unsubscribe B. The current
    // pass still runs {A, B, C}; the next one runs {A, C} only.
    let trigger: Arc<Trigger<Note>> = Arc::new(Trigger::new());
    let log = make_log();

    let b = record(&log, "b");
    let a = {
        let trigger = Arc::clone(&trigger);
        let log = Arc::clone(&log);
        let b = b.clone();
        Callback::new(move |_ctx, _event: &Note| {
            log.lock().unwrap().push("a".to_owned());
            trigger.off("x", &b, &Context::none());
            Ok(())
        })
    };

    trigger.on("x", a, Context::none());
    trigger.on("x", b, Context::none());
    trigger.on("x", record(&log, "c"), Context::none());

    trigger.emit(&Note::new("x")).expect("listeners succeed");
    assert_eq!(*log.lock().unwrap(), vec!["a", "b", "c"]);

    trigger.emit(&Note::new("x")).expect("listeners succeed");
    assert_eq!(*log.lock().unwrap(), vec!["a", "b", "c", "a", "c"]);
}

#[test]
fn listener_added_during_emit_is_not_called_in_the_current_pass() {
    let trigger: Arc<Trigger<Note>> = Arc::new(Trigger::new());
    let log = make_log();

    let adder = {
        let trigger = Arc::clone(&trigger);
        let log = Arc::clone(&log);
        Callback::new(move |_ctx, _event: &Note| {
            log.lock().unwrap().push("adder".to_owned());
            trigger.on("x", record(&log, "late"), Context::none());
            Ok(())
        })
    };
    trigger.on("x", adder, Context::none());

    trigger.emit(&Note::new("x")).expect("listeners succeed");
    assert_eq!(*log.lock().unwrap(), vec!["adder"]);

    trigger.emit(&Note::new("x")).expect("listeners succeed");
    assert_eq!(
        *log.lock().unwrap(),
        vec!["adder", "adder", "late"]
    );
}

// ============================================================================
// Failure semantics
// ============================================================================

#[test]
fn a_failing_listener_aborts_the_rest_of_the_pass() {
    let trigger: Trigger<Note> = Trigger::new();
    let log = make_log();

    trigger.on(
        "x",
        Callback::new(|_ctx, _event: &Note| Err(DwgError::Listener("boom".to_owned()))),
        Context::none(),
    );
    trigger.on("x", record(&log, "after"), Context::none());

    let err = trigger.emit(&Note::new("x")).expect_err("listener failed");

    assert!(matches!(err, DwgError::Listener(_)));
    assert!(
        log.lock().unwrap().is_empty(),
        "listeners after the failure must not run"
    );
}

// ============================================================================
// Context delivery
// ============================================================================

#[test]
fn the_callback_receives_its_context_and_the_event_payload() {
    struct Owner {
        id: u32,
    }

    let trigger: Trigger<Note> = Trigger::new();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&seen);
    trigger.on(
        "add",
        Callback::new(move |ctx, event: &Note| {
            let owner = ctx.downcast_ref::<Owner>().expect("owner context");
            sink.lock().unwrap().push((owner.id, event.value));
            Ok(())
        }),
        Context::new(Owner { id: 7 }),
    );

    trigger
        .emit(&Note {
            kind: "add",
            value: 42,
        })
        .expect("listeners succeed");

    assert_eq!(*seen.lock().unwrap(), vec![(7, 42)]);
}
