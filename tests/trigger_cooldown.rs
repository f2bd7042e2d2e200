use std::error::Error;
use std::time::{Duration, Instant};

use devloop::engine::{DebouncedTrigger, TriggerDecision};
use devloop::watch::WatchProfile;

type TestResult = Result<(), Box<dyn Error>>;

fn src_trigger(cooldown: Duration) -> Result<DebouncedTrigger, Box<dyn Error>> {
    let profile = WatchProfile::new("src", &[])?;
    Ok(DebouncedTrigger::new(profile, cooldown))
}

#[test]
fn first_relevant_event_fires() -> TestResult {
    let trigger = src_trigger(Duration::from_secs(1))?;
    let now = Instant::now();

    assert_eq!(
        trigger.evaluate("src/main.zig", false, now),
        TriggerDecision::Fire
    );
    assert_eq!(trigger.last_fired(), None);
    Ok(())
}

#[test]
fn directory_events_are_ignored() -> TestResult {
    let trigger = src_trigger(Duration::from_secs(1))?;
    let now = Instant::now();

    assert_eq!(
        trigger.evaluate("src/sub", true, now),
        TriggerDecision::Ignored
    );
    Ok(())
}

#[test]
fn paths_outside_subtree_are_ignored() -> TestResult {
    let trigger = src_trigger(Duration::from_secs(1))?;
    let now = Instant::now();

    assert_eq!(
        trigger.evaluate("static/index.html", false, now),
        TriggerDecision::Ignored
    );
    // Prefix match is component-aware.
    assert_eq!(
        trigger.evaluate("srcfoo/a.zig", false, now),
        TriggerDecision::Ignored
    );
    // Absolute paths (non-relativizable events) never match the subtree.
    assert_eq!(
        trigger.evaluate("/tmp/elsewhere.zig", false, now),
        TriggerDecision::Ignored
    );
    Ok(())
}

#[test]
fn excluded_paths_are_ignored() -> TestResult {
    let profile = WatchProfile::new("src", &["**/*.tmp".to_string()])?;
    let trigger = DebouncedTrigger::new(profile, Duration::from_secs(1));
    let now = Instant::now();

    assert_eq!(
        trigger.evaluate("src/scratch.tmp", false, now),
        TriggerDecision::Ignored
    );
    assert_eq!(
        trigger.evaluate("src/main.zig", false, now),
        TriggerDecision::Fire
    );
    Ok(())
}

#[test]
fn second_event_within_cooldown_is_suppressed() -> TestResult {
    let mut trigger = src_trigger(Duration::from_secs(1))?;
    let base = Instant::now();

    assert_eq!(
        trigger.evaluate("src/a.zig", false, base),
        TriggerDecision::Fire
    );
    trigger.mark_fired(base);

    // Same file modified again 0.5s later: one build only.
    assert_eq!(
        trigger.evaluate("src/a.zig", false, base + Duration::from_millis(500)),
        TriggerDecision::Cooldown
    );
    Ok(())
}

#[test]
fn events_a_full_cooldown_apart_both_fire() -> TestResult {
    let mut trigger = src_trigger(Duration::from_secs(1))?;
    let base = Instant::now();

    assert_eq!(
        trigger.evaluate("src/a.zig", false, base),
        TriggerDecision::Fire
    );
    trigger.mark_fired(base);

    // Exactly the cooldown apart counts as outside the window.
    assert_eq!(
        trigger.evaluate("src/b.zig", false, base + Duration::from_secs(1)),
        TriggerDecision::Fire
    );
    Ok(())
}

#[test]
fn marking_fired_suppresses_even_without_a_successful_build() -> TestResult {
    // The runtime calls mark_fired unconditionally after dispatching the
    // build, so a failing build still starts the cooldown.
    let mut trigger = src_trigger(Duration::from_secs(1))?;
    let base = Instant::now();

    trigger.mark_fired(base);
    assert_eq!(
        trigger.evaluate("src/a.zig", false, base + Duration::from_millis(10)),
        TriggerDecision::Cooldown
    );
    Ok(())
}

#[test]
fn last_fired_timestamp_is_non_decreasing() -> TestResult {
    let mut trigger = src_trigger(Duration::from_secs(1))?;
    let base = Instant::now();
    let later = base + Duration::from_secs(2);

    trigger.mark_fired(later);
    trigger.mark_fired(base); // out-of-order update must not move time backwards
    assert_eq!(trigger.last_fired(), Some(later));
    Ok(())
}
