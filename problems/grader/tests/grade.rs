use grading::TestDriver;

fn main() {
    let ok = TestDriver::new(std::env::args().skip(1).filter(|arg| !arg.starts_with('-')))
        .start(&problems_grader::tests());
    // Exit right away: a test that missed its deadline leaves a stuck thread.
    std::process::exit(if ok { 0 } else { 1 });
}
