use grading::TestDriver;
use std::process::ExitCode;

fn main() -> ExitCode {
    let driver = TestDriver::new(std::env::args().skip(1));
    if driver.start(&problems_grader::tests()) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
