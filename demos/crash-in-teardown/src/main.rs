//! A module whose teardown hook aborts the process, demonstrating the
//! "process crash inside a test" error path from the engine's error
//! handling design: the harness observes a missing `module_end` rather
//! than a reported failure.

scu::module!("crash-in-teardown");

#[scu::teardown]
fn teardown() {
    println!("buckle up, about to crash in teardown");
    std::io::Write::flush(&mut std::io::stdout()).ok();
    std::process::abort();
}

#[scu::test_case(description = "not a very interesting test")]
fn uninteresting() {
    scu::assert!(true);
}

scu::main!();
