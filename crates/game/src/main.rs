mod app;

use std::process::ExitCode;

fn main() -> ExitCode {
    app::run(app::build_app())
}
