//! Full-size trials for every catalog entry.
//!
//! Each test runs one complete trial (reset → rendezvous → racing loop →
//! join → classify) at the family's shipped iteration count and asserts
//! that no forbidden outcome was observed. Permitted-shape categories
//! are additionally checked to partition the iteration space where the
//! family defines them.

use litmus_core::{run_trial, StartDiscipline, TrialOutcome};
use litmus_scenarios::{
    causality_chain, causality_cycle, causality_gate, causality_relay, coherence,
    final_publication, load_buffering, message_passing, mutex_counter, read_after_write,
    store_buffering, wide_word_plain, wide_word_sync,
};

#[test]
fn coherence_polls_are_monotonic() {
    let scenario = coherence();
    let agg = run_trial(&scenario);
    assert!(agg.is_clean(), "{}", agg.format());
    assert_eq!(
        agg.category("advanced") + agg.category("steady"),
        u64::from(scenario.iterations())
    );
}

#[test]
fn message_passing_payload_follows_flag() {
    let scenario = message_passing();
    let agg = run_trial(&scenario);
    assert!(agg.is_clean(), "{}", agg.format());
    assert_eq!(
        agg.category("synchronized") + agg.category("unsynchronized"),
        u64::from(scenario.iterations())
    );
}

#[test]
fn message_passing_overlaps_with_plain_start_flags() {
    // The start-flag discipline is a scenario parameter; a plain flag
    // must still release the trial and the guarantee must still hold.
    let agg = run_trial(&message_passing().with_start(StartDiscipline::Plain));
    assert!(agg.is_clean(), "{}", agg.format());
}

#[test]
fn load_buffering_never_cycles() {
    let agg = run_trial(&load_buffering());
    assert!(agg.is_clean(), "{}", agg.format());
}

#[test]
fn causality_chain_never_conjures_values() {
    let agg = run_trial(&causality_chain());
    assert!(agg.is_clean(), "{}", agg.format());
}

#[test]
fn causality_cycle_stays_quiet() {
    let agg = run_trial(&causality_cycle());
    assert!(agg.is_clean(), "{}", agg.format());
}

#[test]
fn causality_relay_and_gate_never_answer_early() {
    let relay = causality_relay();
    let agg = run_trial(&relay);
    assert!(agg.is_clean(), "{}", agg.format());
    assert_eq!(
        agg.category("fast_path") + agg.category("slow_path"),
        u64::from(relay.iterations())
    );

    let agg = run_trial(&causality_gate());
    assert!(agg.is_clean(), "{}", agg.format());
}

#[test]
fn wide_word_distinguishes_disciplines() {
    // Plain halves may tear; that is a category, never a violation.
    let plain = wide_word_plain();
    let agg = run_trial(&plain);
    assert!(agg.is_clean(), "{}", agg.format());
    assert_eq!(
        agg.category("intact") + agg.category("torn"),
        2 * u64::from(plain.iterations())
    );

    // One atomic word never tears.
    let agg = run_trial(&wide_word_sync());
    assert!(agg.is_clean(), "{}", agg.format());
}

#[test]
fn final_publication_always_shows_the_frozen_value() {
    let agg = run_trial(&final_publication());
    assert!(agg.is_clean(), "{}", agg.format());
}

#[test]
fn mutex_counter_loses_no_updates() {
    let agg = run_trial(&mutex_counter());
    assert!(agg.is_clean(), "{}", agg.format());
}

#[test]
fn store_buffering_shapes_partition_iterations() {
    let scenario = store_buffering();
    let agg = run_trial(&scenario);
    assert!(agg.is_clean(), "{}", agg.format());
    assert_eq!(
        agg.category("side_by_side") + agg.category("a_outruns_b") + agg.category("b_outruns_a"),
        u64::from(scenario.iterations())
    );
}

#[test]
fn read_after_write_respects_the_total_order() {
    let agg = run_trial(&read_after_write());
    assert!(agg.is_clean(), "{}", agg.format());
}

#[test]
fn every_trial_reports_completed() {
    for agg in [
        run_trial(&coherence().with_iterations(1_000)),
        run_trial(&mutex_counter().with_iterations(1_000)),
        run_trial(&wide_word_sync().with_iterations(1_000)),
    ] {
        assert_eq!(agg.outcome, TrialOutcome::Completed);
    }
}
