//! Instruction-level tests for the MC6809E core.
//!
//! Each test assembles a short program into flat RAM, steps the CPU,
//! and checks registers, flags, memory, and cycle counts against the
//! data-sheet behavior.

use emu_core::Bus;
use motorola_6809::{Cpu6809, RunState};

/// Flat 64KB RAM bus for CPU-only testing.
struct TestBus {
    ram: Vec<u8>,
}

impl TestBus {
    fn new() -> Self {
        Self {
            ram: vec![0; 0x1_0000],
        }
    }

    fn load(&mut self, addr: u16, bytes: &[u8]) {
        let start = usize::from(addr);
        self.ram[start..start + bytes.len()].copy_from_slice(bytes);
    }
}

impl Bus for TestBus {
    fn read(&mut self, address: u16) -> u8 {
        self.ram[usize::from(address)]
    }

    fn write(&mut self, address: u16, value: u8) {
        self.ram[usize::from(address)] = value;
    }
}

/// CPU initialised at 0x1000 with an empty bus.
fn setup() -> (Cpu6809, TestBus) {
    let mut cpu = Cpu6809::new();
    cpu.init(0x1000);
    (cpu, TestBus::new())
}

#[test]
fn adca_immediate_half_carry() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x1000, &[0x89, 0x11]); // adca #$11
    cpu.regs.a = 0x2F;
    cpu.regs.cc.c = true;

    assert_eq!(cpu.step(&mut bus), RunState::Exec);
    assert_eq!(cpu.regs.a, 0x41);
    assert!(cpu.regs.cc.h);
    assert!(!cpu.regs.cc.c);
    assert!(!cpu.regs.cc.z);
    assert!(!cpu.regs.cc.n);
    assert!(!cpu.regs.cc.v);
    assert_eq!(cpu.last_cycles(), 2);
    assert_eq!(cpu.last_bytes(), 2);
}

#[test]
fn daa_after_bcd_addition() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x1000, &[0x19]); // daa
    cpu.regs.a = 0x9B;

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x01);
    assert!(cpu.regs.cc.c);
    assert!(!cpu.regs.cc.n);
    assert!(!cpu.regs.cc.z);
}

#[test]
fn lda_indexed_auto_increment() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x1000, &[0xA6, 0x80]); // lda ,x+
    bus.ram[0x2000] = 0x5A;
    cpu.regs.x = 0x2000;

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x5A);
    assert_eq!(cpu.regs.x, 0x2001);
    assert_eq!(cpu.last_cycles(), 6, "4 base + 2 for ,R+");
}

#[test]
fn lda_extended_indirect() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x1000, &[0xA6, 0x9F, 0x30, 0x00]); // lda [$3000]
    bus.ram[0x3000] = 0x12;
    bus.ram[0x3001] = 0x34;
    bus.ram[0x1234] = 0x77;

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x77);
    assert_eq!(cpu.last_cycles(), 9, "4 base + 5 for [n16]");
    assert_eq!(cpu.last_bytes(), 4);
}

#[test]
fn indexed_five_bit_offset() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x1000, &[0xA6, 0x1F]); // lda -1,x (5-bit offset)
    bus.ram[0x1FFF] = 0xAB;
    cpu.regs.x = 0x2000;

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0xAB);
    assert_eq!(cpu.last_cycles(), 5, "4 base + 1 for 5-bit offset");
}

#[test]
fn indexed_pre_decrement_two() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x1000, &[0xEC, 0x83]); // ldd ,--x
    bus.ram[0x1FFE] = 0xBE;
    bus.ram[0x1FFF] = 0xEF;
    cpu.regs.x = 0x2000;

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.d(), 0xBEEF);
    assert_eq!(cpu.regs.x, 0x1FFE);
    assert_eq!(cpu.last_cycles(), 8, "5 base + 3 for ,--R");
}

#[test]
fn direct_mode_uses_dp() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x1000, &[0x96, 0x42]); // lda <$42
    bus.ram[0x2042] = 0x99;
    cpu.regs.dp = 0x20;

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a, 0x99);
    assert_eq!(cpu.last_cycles(), 4);
}

#[test]
fn irq_entry_and_rti_round_trip() {
    let (mut cpu, mut bus) = setup();
    // Service routine: a single rti.
    bus.load(0x2000, &[0x3B]);
    bus.load(0xFFF8, &[0x20, 0x00]); // IRQ vector
    bus.load(0x1234, &[0x12]); // nop at the interrupted address

    cpu.regs.pc = 0x1234;
    cpu.regs.s = 0x7FFF;
    cpu.regs.a = 0xAA;
    cpu.regs.b = 0xBB;
    cpu.regs.dp = 0xDD;
    cpu.regs.x = 0x1111;
    cpu.regs.y = 0x2222;
    cpu.regs.u = 0x3333;
    let flags_before = cpu.regs.cc;

    cpu.irq(true);
    cpu.step(&mut bus); // service + rti executes as the first ISR instruction

    assert_eq!(cpu.regs.s, 0x7FFF, "frame fully unwound");

    // The twelve-byte frame was laid out below the original S.
    let frame_base = 0x7FFF - 12;
    assert_eq!(bus.ram[frame_base] & 0x80, 0x80, "stacked CC has E set");
    assert_eq!(bus.ram[frame_base + 1], 0xAA);
    assert_eq!(bus.ram[frame_base + 2], 0xBB);
    assert_eq!(bus.ram[frame_base + 3], 0xDD);
    assert_eq!(bus.ram[frame_base + 4], 0x11);
    assert_eq!(bus.ram[frame_base + 5], 0x11);
    assert_eq!(bus.ram[frame_base + 6], 0x22);
    assert_eq!(bus.ram[frame_base + 7], 0x22);
    assert_eq!(bus.ram[frame_base + 8], 0x33);
    assert_eq!(bus.ram[frame_base + 9], 0x33);
    assert_eq!(bus.ram[frame_base + 10], 0x12, "PC high");
    assert_eq!(bus.ram[frame_base + 11], 0x34, "PC low");

    // RTI restored the pre-interrupt register file (E becomes set in
    // the restored CC because the frame was stacked with E=1).
    assert_eq!(cpu.regs.pc, 0x1234);
    assert_eq!(cpu.regs.a, 0xAA);
    assert_eq!(cpu.regs.b, 0xBB);
    assert_eq!(cpu.regs.dp, 0xDD);
    assert_eq!(cpu.regs.x, 0x1111);
    assert_eq!(cpu.regs.y, 0x2222);
    assert_eq!(cpu.regs.u, 0x3333);
    assert_eq!(cpu.regs.cc.c, flags_before.c);
    assert_eq!(cpu.regs.cc.n, flags_before.n);
    assert_eq!(cpu.regs.cc.z, flags_before.z);
    assert_eq!(cpu.regs.cc.v, flags_before.v);
    assert_eq!(cpu.regs.cc.h, flags_before.h);
}

#[test]
fn rti_short_frame_after_firq() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x2000, &[0x3B]); // rti
    bus.load(0xFFF6, &[0x20, 0x00]); // FIRQ vector
    bus.load(0x4321, &[0x12]);

    cpu.regs.pc = 0x4321;
    cpu.regs.s = 0x7FFF;
    cpu.firq(true);
    cpu.step(&mut bus);

    assert_eq!(cpu.regs.s, 0x7FFF);
    assert_eq!(cpu.regs.pc, 0x4321);
    assert!(!cpu.regs.cc.e, "short frame restores E clear");
}

#[test]
fn pshs_puls_round_trip() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x1000, &[0x34, 0xFF]); // pshs pc,u,y,x,dp,b,a,cc
    bus.load(0x1002, &[0x35, 0xFF]); // puls all
    cpu.regs.s = 0x7FFF;
    cpu.regs.a = 0x11;
    cpu.regs.b = 0x22;
    cpu.regs.dp = 0x33;
    cpu.regs.x = 0x4444;
    cpu.regs.y = 0x5555;
    cpu.regs.u = 0x6666;

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.s, 0x7FFF - 12);
    assert_eq!(cpu.last_cycles(), 5 + 1 + 4, "entry + one per word");

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.s, 0x7FFF);
    assert_eq!(cpu.regs.a, 0x11);
    assert_eq!(cpu.regs.x, 0x4444);
    // PULS pulled the stacked PC (0x1002), so execution resumed there
    // and the second instruction was the PULS itself.
    assert_eq!(cpu.regs.pc, 0x1002);
}

#[test]
fn pshu_pulu_exchange_s() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x1000, &[0x36, 0x40]); // pshu s
    cpu.regs.u = 0x6000;
    cpu.regs.s = 0x1234;

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.u, 0x5FFE);
    assert_eq!(bus.ram[0x5FFE], 0x12);
    assert_eq!(bus.ram[0x5FFF], 0x34);
}

#[test]
fn jsr_rts_round_trip() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x1000, &[0xBD, 0x20, 0x00]); // jsr $2000
    bus.load(0x2000, &[0x39]); // rts
    cpu.regs.s = 0x7FFF;

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.pc, 0x2000);
    assert_eq!(cpu.regs.s, 0x7FFD);
    assert_eq!(cpu.last_cycles(), 8);

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.pc, 0x1003);
    assert_eq!(cpu.regs.s, 0x7FFF);
}

#[test]
fn branches_taken_and_not_taken() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x1000, &[0x27, 0x10]); // beq +$10
    cpu.regs.cc.z = false;
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.pc, 0x1002, "not taken falls through");
    assert_eq!(cpu.last_cycles(), 3);

    cpu.init(0x1000);
    cpu.regs.cc.z = true;
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.pc, 0x1012, "taken lands at target");
    assert_eq!(cpu.last_cycles(), 3);
}

#[test]
fn long_branch_cycles_fixed() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x1000, &[0x10, 0x26, 0x01, 0x00]); // lbne +$0100
    cpu.regs.cc.z = false;
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.pc, 0x1104);
    assert_eq!(cpu.last_cycles(), 5);
    assert_eq!(cpu.last_bytes(), 4);

    cpu.init(0x1000);
    cpu.regs.cc.z = true;
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.pc, 0x1004);
    assert_eq!(cpu.last_cycles(), 5);
}

#[test]
fn negative_branch_offset() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x1000, &[0x20, 0xFE]); // bra -2 (to itself)
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.pc, 0x1000);
}

#[test]
fn exg_and_tfr() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x1000, &[0x1E, 0x12]); // exg x,y
    bus.load(0x1002, &[0x1F, 0x8A]); // tfr a,cc
    cpu.regs.x = 0xAAAA;
    cpu.regs.y = 0xBBBB;

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.x, 0xBBBB);
    assert_eq!(cpu.regs.y, 0xAAAA);

    cpu.regs.a = 0x05; // Z and C
    cpu.step(&mut bus);
    assert!(cpu.regs.cc.z);
    assert!(cpu.regs.cc.c);
    assert!(!cpu.regs.cc.n);
}

#[test]
fn tfr_to_s_arms_nmi() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x1000, &[0x1F, 0x14]); // tfr x,s
    bus.load(0xFFFC, &[0x30, 0x00]); // NMI vector
    bus.load(0x3000, &[0x12]);
    cpu.regs.x = 0x7F00;

    cpu.nmi_trigger();
    cpu.step(&mut bus); // tfr arms; latch still pending
    assert_eq!(cpu.regs.s, 0x7F00);

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.pc, 0x3001, "NMI serviced once armed");
}

#[test]
fn sync_wakes_on_masked_line() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x1000, &[0x13, 0x12]); // sync; nop
    cpu.regs.cc.i = true;

    cpu.step(&mut bus);
    assert_eq!(cpu.run_state(), RunState::Sync);
    assert_eq!(cpu.step(&mut bus), RunState::Sync, "no line, still waiting");

    cpu.irq(true); // masked by I, but the line is asserted
    assert_eq!(cpu.step(&mut bus), RunState::Exec);
    assert_eq!(cpu.regs.pc, 0x1002, "resumed at the next instruction");
}

#[test]
fn sync_services_unmasked_interrupt() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x1000, &[0x13]); // sync
    bus.load(0xFFF8, &[0x20, 0x00]);
    bus.load(0x2000, &[0x12]);
    cpu.regs.s = 0x7FFF;

    cpu.step(&mut bus);
    assert_eq!(cpu.run_state(), RunState::Sync);

    cpu.irq(true);
    assert_eq!(cpu.step(&mut bus), RunState::Exec);
    assert_eq!(cpu.regs.pc, 0x2001);
    assert!(cpu.regs.cc.i);
}

#[test]
fn cwai_stacks_once() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x1000, &[0x3C, 0xEF]); // cwai #$ef (clear I)
    bus.load(0xFFF8, &[0x20, 0x00]);
    bus.load(0x2000, &[0x12]);
    cpu.regs.s = 0x7FFF;
    cpu.regs.cc.i = true;

    cpu.step(&mut bus);
    assert_eq!(cpu.run_state(), RunState::Sync);
    assert_eq!(cpu.regs.s, 0x7FFF - 12, "frame stacked by CWAI");

    cpu.irq(true);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.s, 0x7FFF - 12, "service did not push again");
    assert_eq!(cpu.regs.pc, 0x2001);
}

#[test]
fn cwai_wait_ignores_masked_lines() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x1000, &[0x3C, 0xFF]); // cwai #$ff (masks unchanged)
    cpu.regs.s = 0x7FFF;
    cpu.regs.cc.i = true;

    cpu.step(&mut bus);
    assert_eq!(cpu.run_state(), RunState::Sync);

    cpu.irq(true); // I is set: masked, and CWAI keeps waiting
    assert_eq!(cpu.step(&mut bus), RunState::Sync);
}

#[test]
fn swi_vectors_and_masks() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x1000, &[0x3F]); // swi
    bus.load(0xFFFA, &[0x20, 0x00]);
    bus.load(0x2000, &[0x12]);
    cpu.regs.s = 0x7FFF;

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.pc, 0x2000);
    assert!(cpu.regs.cc.i);
    assert!(cpu.regs.cc.f);
    assert!(cpu.regs.cc.e);
    assert_eq!(cpu.regs.s, 0x7FFF - 12);
    assert_eq!(cpu.last_cycles(), 19);
}

#[test]
fn swi2_leaves_masks() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x1000, &[0x10, 0x3F]); // swi2
    bus.load(0xFFF4, &[0x20, 0x00]);
    cpu.regs.s = 0x7FFF;

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.pc, 0x2000);
    assert!(!cpu.regs.cc.i);
    assert!(!cpu.regs.cc.f);
    assert_eq!(cpu.last_cycles(), 20);
}

#[test]
fn swi3_vectors_via_fff2() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x1000, &[0x11, 0x3F]); // swi3
    bus.load(0xFFF2, &[0x21, 0x00]);
    cpu.regs.s = 0x7FFF;

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.pc, 0x2100);
    assert!(!cpu.regs.cc.i);
}

#[test]
fn sixteen_bit_loads_and_stores() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x1000, &[0xCC, 0x12, 0x34]); // ldd #$1234
    bus.load(0x1003, &[0xFD, 0x40, 0x00]); // std $4000
    bus.load(0x1006, &[0x10, 0xCE, 0x7F, 0xFF]); // lds #$7fff

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.d(), 0x1234);
    assert_eq!(cpu.last_cycles(), 3);

    cpu.step(&mut bus);
    assert_eq!(bus.ram[0x4000], 0x12);
    assert_eq!(bus.ram[0x4001], 0x34);
    assert_eq!(cpu.last_cycles(), 6);

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.s, 0x7FFF);
    assert_eq!(cpu.last_cycles(), 4);
    assert_eq!(cpu.last_bytes(), 4);
}

#[test]
fn memory_read_modify_write() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x1000, &[0x7C, 0x40, 0x00]); // inc $4000
    bus.ram[0x4000] = 0x7F;

    cpu.step(&mut bus);
    assert_eq!(bus.ram[0x4000], 0x80);
    assert!(cpu.regs.cc.v, "0x7F + 1 overflows");
    assert!(cpu.regs.cc.n);
    assert_eq!(cpu.last_cycles(), 7);
}

#[test]
fn abx_adds_unsigned_b() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x1000, &[0x3A]); // abx
    cpu.regs.x = 0x1000;
    cpu.regs.b = 0xFF;

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.x, 0x10FF, "B is not sign-extended for ABX");
}

#[test]
fn lea_z_updates() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x1000, &[0x30, 0x01]); // leax 1,x (5-bit offset)
    cpu.regs.x = 0xFFFF;
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.x, 0x0000);
    assert!(cpu.regs.cc.z, "LEAX updates Z");

    bus.load(0x1002, &[0x32, 0x61]); // leas 1,s
    cpu.regs.cc.z = false;
    cpu.regs.s = 0xFFFF;
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.s, 0x0000);
    assert!(!cpu.regs.cc.z, "LEAS leaves Z alone");
}

#[test]
fn cmp16_family() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x1000, &[0x8C, 0x10, 0x00]); // cmpx #$1000
    bus.load(0x1003, &[0x10, 0x83, 0x20, 0x00]); // cmpd #$2000
    bus.load(0x1007, &[0x11, 0x8C, 0x00, 0x00]); // cmps #$0000
    cpu.regs.x = 0x1000;

    cpu.step(&mut bus);
    assert!(cpu.regs.cc.z);

    cpu.regs.set_d(0x1000);
    cpu.step(&mut bus);
    assert!(cpu.regs.cc.c, "D < operand sets borrow");
    assert!(!cpu.regs.cc.z);

    cpu.regs.s = 0;
    cpu.step(&mut bus);
    assert!(cpu.regs.cc.z);
}

#[test]
fn mnemonic_lookup() {
    let (cpu, mut bus) = setup();
    bus.load(0x1000, &[0x89]); // adca
    bus.load(0x1001, &[0x10, 0x8E]); // ldy
    bus.load(0x1003, &[0x11, 0x3F]); // swi3
    bus.load(0x1005, &[0x01]); // illegal

    assert_eq!(cpu.mnemonic_at(&mut bus, 0x1000), "adca");
    assert_eq!(cpu.mnemonic_at(&mut bus, 0x1001), "ldy");
    assert_eq!(cpu.mnemonic_at(&mut bus, 0x1003), "swi3");
    assert_eq!(cpu.mnemonic_at(&mut bus, 0x1005), "???");
}

#[test]
fn d_always_projects_a_and_b() {
    let (mut cpu, mut bus) = setup();
    bus.load(
        0x1000,
        &[
            0x86, 0x12, // lda #$12
            0xC6, 0x34, // ldb #$34
            0xC3, 0x00, 0x01, // addd #$0001
        ],
    );

    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.d(), 0x1234);

    cpu.step(&mut bus);
    assert_eq!(cpu.regs.d(), 0x1235);
    assert_eq!(cpu.regs.a, 0x12);
    assert_eq!(cpu.regs.b, 0x35);
}

#[test]
fn cycle_counts_match_the_datasheet_table() {
    // (program bytes, expected cycles) per addressing-mode variant,
    // from a zeroed register state.
    let cases: &[(&[u8], u8)] = &[
        (&[0x12], 2),                   // nop
        (&[0x86, 0x00], 2),             // lda #
        (&[0x96, 0x00], 4),             // lda <
        (&[0xB6, 0x00, 0x00], 5),       // lda >
        (&[0xA6, 0x84], 4),             // lda 0,x
        (&[0xA6, 0x88, 0x05], 5),       // lda n8,x
        (&[0xA6, 0x89, 0x01, 0x00], 8), // lda n16,x
        (&[0xA6, 0x85], 5),             // lda b,x
        (&[0xA6, 0x8B], 8),             // lda d,x
        (&[0xA6, 0x8C, 0x05], 5),       // lda n8,pc
        (&[0xA6, 0x94], 7),             // lda [,x]
        (&[0x4F], 2),                   // clra
        (&[0x0F, 0x00], 6),             // clr <
        (&[0x7F, 0x00, 0x00], 7),       // clr >
        (&[0x3D], 11),                  // mul
        (&[0x1E, 0x12], 8),             // exg x,y
        (&[0x1F, 0x12], 6),             // tfr x,y
        (&[0x8E, 0x00, 0x00], 3),       // ldx #
        (&[0x10, 0x8E, 0x00, 0x00], 4), // ldy #
        (&[0x34, 0x00], 6),             // pshs (empty mask)
        (&[0x35, 0x01], 6),             // puls cc
        (&[0x39], 5),                   // rts
        (&[0x11, 0x83, 0x00, 0x00], 5), // cmpu #
    ];

    for (program, expected) in cases {
        let (mut cpu, mut bus) = setup();
        bus.load(0x1000, program);
        cpu.step(&mut bus);
        assert_eq!(
            cpu.last_cycles(),
            *expected,
            "program {program:02X?} cycle count"
        );
    }
}

#[test]
fn state_snapshot_reports_last_instruction() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x1000, &[0xB6, 0x20, 0x00]); // lda $2000
    bus.ram[0x2000] = 0x42;

    cpu.step(&mut bus);
    let state = cpu.state();
    assert_eq!(state.regs.a, 0x42);
    assert_eq!(state.run_state, RunState::Exec);
    assert_eq!(state.last_pc, 0x1000);
    assert_eq!(state.last_bytes, 3);
    assert_eq!(state.last_cycles, 5);
    assert!(!state.nmi_armed);
}

#[test]
fn illegal_indexed_submode_raises_exception() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x1000, &[0xA6, 0x87]); // lda with reserved submode 7

    assert_eq!(cpu.step(&mut bus), RunState::Exception);
}
