use std::process::ExitCode;

use log::{error, info};
use matcheck::{logging, run_suite, BlockedMatmul, HarnessConfig};

fn main() -> ExitCode {
    let config = match HarnessConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("matcheck: {e}");
            return ExitCode::from(1);
        }
    };

    if let Err(e) = logging::init(config.log_level) {
        eprintln!("matcheck: could not install logger: {e}");
    }

    let cases = config.test_cases();
    info!(
        "N = {}, A = {}, B = {}, exit policy {:?}",
        config.size, config.fill_a, config.fill_b, config.exit
    );

    let report = run_suite(&cases, &BlockedMatmul, config.mismatch);
    print!("{}", report.render(config.color));

    let code = report.exit_code(config.exit);
    if code != 0 {
        error!(
            "{} failed, {} errored out of {} case(s)",
            report.failed(),
            report.errored(),
            report.entries().len()
        );
    }
    ExitCode::from(code)
}
