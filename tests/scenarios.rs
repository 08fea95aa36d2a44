//! End-to-end programs driven one cycle at a time.

mod common;

use common::*;
use sim_lib::cpu::CPUPolicy;
use sim_lib::instruction::NOP;
use sim_lib::loader::load_words;
use sim_lib::memory::DataMemory;
use sim_lib::run_wrapper::run;
use sim_lib::run_wrapper::HaltReason;
use sim_lib::single_cycle::StepOutcome;
use sim_lib::snapshot::CoreSnapshot;

#[test]
fn addi_addi_add() {
    let mut m = Machine::new(0, &[addi(1, 0, 5), addi(2, 0, 7), add(3, 1, 2)]);
    m.run(3);
    assert_eq!(m.reg(3), 12);
    assert_eq!(m.core.read_pc(), 12);
}

#[test]
fn store_then_load() {
    let mut m = Machine::new(0, &[addi(2, 0, -77), sw(2, 0, 0), lw(4, 0, 0)]);
    m.run(3);
    assert_eq!(m.reg(4), m.reg(2));
    assert_eq!(m.ram.read_word(0), Ok(m.reg(2)));
    assert_eq!(m.reg(4) as i32, -77);
}

#[test]
fn store_with_negative_offset() {
    let mut m = Machine::new(0, &[addi(1, 0, 0x40), addi(2, 0, 9), sw(2, 1, -8), lw(3, 0, 0x38)]);
    m.run(4);
    assert_eq!(m.ram.read_word(0x38), Ok(9));
    assert_eq!(m.reg(3), 9);
}

#[test]
fn beq_taken_from_zero() {
    let mut m = Machine::new(0, &[beq(0, 0, 8), NOP, NOP]);
    assert_eq!(m.step(), StepOutcome::Continue(8));
    assert_eq!(m.core.read_pc(), 8);
}

#[test]
fn bne_backwards() {
    let program = [addi(1, 0, 1), addi(2, 0, 2), NOP, NOP, NOP, bne(1, 2, -4)];
    let mut m = Machine::new(0, &program);
    m.run(5);
    assert_eq!(m.core.read_pc(), 20);
    assert_eq!(m.step(), StepOutcome::Continue(16));
}

#[test]
fn bne_not_taken_falls_through() {
    let mut m = Machine::new(0, &[addi(1, 0, 3), addi(2, 0, 3), bne(1, 2, -8)]);
    m.run(3);
    assert_eq!(m.core.read_pc(), 12);
}

#[test]
fn slt_is_signed() {
    let mut m = Machine::new(0, &[addi(5, 0, -1), slt(6, 0, 5), sltu(7, 0, 5)]);
    m.run(3);
    assert_eq!(m.reg(6), 0);
    assert_eq!(m.reg(7), 1);
}

#[test]
fn blt_and_bgeu_disagree_on_negative() {
    // x1 = -1; blt x1, x0 is taken, bgeu x1, x0 is also taken, blt x0, x1 is not
    let program = [addi(1, 0, -1), blt(1, 0, 8), NOP, blt(0, 1, 8), bgeu(1, 0, 8), NOP, NOP];
    let mut m = Machine::new(0, &program);
    m.run(2);
    assert_eq!(m.core.read_pc(), 12);
    m.run(1);
    assert_eq!(m.core.read_pc(), 16);
    m.run(1);
    assert_eq!(m.core.read_pc(), 24);
}

#[test]
fn arithmetic_shift_right() {
    let mut m = Machine::new(0, &[addi(1, 0, -16), srai(2, 1, 2), addi(3, 0, 31), sra(4, 1, 3)]);
    m.run(4);
    assert_eq!(m.reg(2) as i32, -4);
    assert_eq!(m.reg(4), 0xffff_ffff);
}

#[test]
fn sub_wraps() {
    let mut m = Machine::new(0, &[addi(1, 0, 1), sub(2, 0, 1)]);
    m.run(2);
    assert_eq!(m.reg(2), 0xffff_ffff);
}

#[test]
fn same_register_read_twice() {
    let mut m = Machine::new(0, &[addi(1, 0, 21), add(1, 1, 1)]);
    m.run(2);
    assert_eq!(m.reg(1), 42);
}

#[test]
fn unsupported_opcode_is_noop() {
    // lui x1, 0x12345; jal x1, 64; ecall
    let program = [0x1234_50b7, 0x0400_00ef, 0x0000_0073, addi(2, 0, 1)];
    let mut m = Machine::new(0, &program);
    let before = m.core.snapshot();
    m.run(3);
    let after = m.core.snapshot();
    assert_eq!(after.registers, before.registers);
    assert_eq!(after.pc, 12);
    assert_eq!(m.core.history().unsupported_count, 3);
    m.run(1);
    assert_eq!(m.reg(2), 1);
}

#[test]
fn load_fault_leaves_state_untouched() {
    // lw x1, 0x7ff(x1) lands on a misaligned address
    let mut m = Machine::new(0, &[addi(1, 0, 7), lw(1, 1, 0x7ff)]);
    m.run(1);
    let before = m.core.snapshot();
    assert_eq!(m.step(), StepOutcome::MemoryFault(0x7ff + 7));
    assert_eq!(m.core.snapshot(), before);
}

#[test]
fn store_fault_leaves_memory_untouched() {
    let mut m = Machine::new(0, &[addi(1, 0, 2), addi(2, 0, 5), sw(2, 1, 0)]);
    m.run(2);
    let before = m.core.snapshot();
    assert_eq!(m.step(), StepOutcome::MemoryFault(2));
    assert_eq!(m.core.snapshot(), before);
    assert_eq!(m.ram.read_word(0), Ok(0));
}

#[test]
fn illegal_fetch_is_reported() {
    let mut m = Machine::new(0x100, &[NOP]);
    m.run(1);
    assert_eq!(m.step(), StepOutcome::IllegalFetch(0x104));
    assert_eq!(m.core.read_pc(), 0x104);
}

#[test]
fn misaligned_branch_target_faults_on_fetch() {
    let mut m = Machine::new(0, &[beq(0, 0, 6), NOP, NOP]);
    assert_eq!(m.step(), StepOutcome::Continue(6));
    assert_eq!(m.step(), StepOutcome::IllegalFetch(6));
}

#[test]
fn extreme_branch_offsets_wrap() {
    let mut m = Machine::new(0, &[beq(0, 0, -4096)]);
    assert_eq!(m.step(), StepOutcome::Continue(0u32.wrapping_sub(4096)));

    let mut m = Machine::new(0xffff_fffc, &[beq(0, 0, 4094)]);
    assert_eq!(m.step(), StepOutcome::Continue(0xffff_fffcu32.wrapping_add(4094)));
}

#[test]
fn snapshot_resume_matches_uninterrupted_run() {
    let program = [addi(1, 0, 3), addi(2, 0, 4), add(3, 1, 2), sub(4, 3, 1)];
    let mut straight = Machine::new(0, &program);
    straight.run(4);

    let mut first = Machine::new(0, &program);
    first.run(2);
    let words = first.core.snapshot().to_words();

    let mut resumed = Machine::new(0, &program);
    resumed.core.restore(&CoreSnapshot::from_words(words));
    resumed.run(2);

    assert_eq!(resumed.core.snapshot(), straight.core.snapshot());
}

#[test]
fn countdown_loop_runs_to_halt() {
    // x1 = 5; do { x2 += x1; x1 -= 1 } while x1 != 0; sw x2, 0(x0); halt
    let program = [
        addi(1, 0, 5),
        add(2, 2, 1),
        addi(1, 1, -1),
        bne(1, 0, -8),
        sw(2, 0, 0),
        beq(0, 0, 0),
    ];
    let mut loaded = load_words(&program, 0).with_ram(0, 0x1000);
    let summary = run(&mut loaded, CPUPolicy::default());
    assert_eq!(summary.halt, HaltReason::SelfLoop);
    assert_eq!(summary.snapshot.registers[2], 15);
    assert_eq!(loaded.data.read_word(0), Ok(15));
    assert_eq!(summary.history.store_count, 1);
    assert_eq!(summary.history.branch_taken_count, 5);
}
