//! Example test module exercising the `scu` runner end to end.
//!
//! Loosely modeled on the CUnit-style fixture the original `scu` examples
//! shipped with: a suite name, a setup/teardown pair that manages a
//! resource, and a handful of cases spanning pass, non-fatal failure, and
//! fatal failure.

use std::cell::RefCell;

use anyhow::Context;

scu::module!("arithmetic");

thread_local! {
    static COUNTER: RefCell<i64> = const { RefCell::new(0) };
}

#[scu::setup]
fn setup() {
    COUNTER.with(|c| *c.borrow_mut() = 0);
}

#[scu::teardown]
fn teardown() {
    println!("teardown ran with final counter {}", COUNTER.with(|c| *c.borrow()));
}

#[scu::before_each]
fn before_each() {
    COUNTER.with(|c| *c.borrow_mut() += 1);
}

#[scu::test_case(description = "addition is commutative", tags("math", "fast"))]
fn addition_is_commutative() {
    scu::assert_eq!(2 + 3, 3 + 2);
}

#[scu::test_case(description = "byte-width comparison treats 0xff and -1 as equal", tags("math"))]
fn integer_width_is_respected() {
    let a: u8 = 0xff;
    let b: i8 = -1;
    scu::assert_int_eq!(a, b, 1);
}

#[scu::test_case(description = "intentionally wrong sum")]
fn deliberately_wrong_sum() {
    scu::assert_eq!(2 + 2, 5);
}

#[scu::test_case(description = "fatal assertion stops the thunk")]
fn fatal_short_circuits() {
    scu::assert_fatal!(1 == 2);
    // Unreachable: the fatal assertion above unwinds to the recovery pad,
    // so this never contributes an assertion or a failure.
    scu::assert!(true);
}

#[scu::test_case(description = "string helpers round-trip")]
fn string_helpers() {
    scu::assert_str_eq!("hello", "hello");
    scu::assert_nstr_eq!("hello world", "hello there", 5);
}

#[scu::test_case(description = "memory comparison reports a hex dump on mismatch")]
fn memory_mismatch_reports_hex_dump() {
    let lhs: [u8; 20] = [0; 20];
    let mut rhs: [u8; 20] = [0; 20];
    rhs[0] = 1;
    scu::assert_mem_eq!(lhs, rhs);
}

fn main() -> anyhow::Result<()> {
    let code = scu::engine::try_run().context("demo-arithmetic failed to start")?;
    std::process::exit(code);
}
