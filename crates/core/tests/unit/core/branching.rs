//! # Branch Handling Tests
//!
//! Direction decisions, the single-branch issue stall, queue redirects,
//! and the cycle guard for programs that never drain.

use crate::common::builders::{arith_imm, branch};
use crate::common::harness::{engine, issue_cycles, run};
use rstest::rstest;
use tomsim_core::SimConfig;
use tomsim_core::common::SimError;
use tomsim_core::isa::Opcode;

#[rstest]
#[case::beq_equal_takes(Opcode::Beq, 0.0, 0.0, true)]
#[case::beq_unequal_falls_through(Opcode::Beq, 1.0, 0.0, false)]
#[case::bne_unequal_takes(Opcode::Bne, 1.0, 0.0, true)]
#[case::bne_equal_falls_through(Opcode::Bne, 0.0, 0.0, false)]
fn test_branch_direction(
    #[case] op: Opcode,
    #[case] lhs: f64,
    #[case] rhs: f64,
    #[case] taken: bool,
) {
    let mut eng = engine(
        SimConfig::default(),
        vec![
            branch(op, 2, "F1", "F2"),
            arith_imm(Opcode::Daddi, "F3", "F0", 9),
        ],
    );
    assert!(eng.set_register("F1", lhs));
    assert!(eng.set_register("F2", rhs));
    run(&mut eng);
    let expected = if taken { 0.0 } else { 9.0 };
    assert_eq!(eng.register_value("F3"), Some(expected));
}

#[test]
fn test_taken_branch_squashes_fall_through() {
    let mut eng = engine(
        SimConfig::default(),
        vec![
            arith_imm(Opcode::Daddi, "F1", "F0", 1),
            branch(Opcode::Beq, 3, "F0", "F0"),
            arith_imm(Opcode::Daddi, "F2", "F0", 99),
            arith_imm(Opcode::Daddi, "F3", "F0", 7),
        ],
    );
    run(&mut eng);
    assert_eq!(eng.register_value("F1"), Some(1.0));
    assert_eq!(eng.register_value("F2"), Some(0.0));
    assert_eq!(eng.register_value("F3"), Some(7.0));
    // The squashed entry never issues; the target lands right after the
    // redirect applies at the end of cycle 3.
    assert_eq!(issue_cycles(&eng), vec![Some(1), Some(2), None, Some(4)]);

    let at_redirect = eng.snapshot(3).unwrap();
    assert_eq!(at_redirect.queue.len(), 1);
    assert_eq!(at_redirect.queue[0].index, 3);
}

#[test]
fn test_issue_stalls_while_branch_in_flight() {
    let mut eng = engine(
        SimConfig::default(),
        vec![
            arith_imm(Opcode::Daddi, "F1", "F0", 1),
            branch(Opcode::Beq, 3, "F1", "F0"),
            arith_imm(Opcode::Daddi, "F2", "F0", 99),
        ],
    );
    run(&mut eng);
    // The branch waits on F1 through cycle 3's broadcast, resolves not
    // taken at cycle 4, and releases issue for cycle 5.
    assert_eq!(issue_cycles(&eng), vec![Some(1), Some(2), Some(5)]);
    assert_eq!(eng.register_value("F2"), Some(99.0));

    let mid_flight = eng.snapshot(3).unwrap();
    assert!(mid_flight.branch.slot.busy);
    assert_eq!(mid_flight.issue_cycles[2], None);
}

#[test]
fn test_branch_to_program_end_drains() {
    let mut eng = engine(
        SimConfig::default(),
        vec![branch(Opcode::Beq, 1, "F0", "F0")],
    );
    run(&mut eng);
    assert!(eng.is_complete());
    assert_eq!(issue_cycles(&eng), vec![Some(1)]);
}

#[test]
fn test_branch_loop_trips_cycle_guard() {
    let mut config = SimConfig::default();
    config.max_cycles = 50;
    let mut eng = engine(config, vec![branch(Opcode::Beq, 0, "F0", "F0")]);
    assert_eq!(
        eng.run_to_completion(),
        Err(SimError::NonTermination { limit: 50 })
    );
}
