//! Binary entrypoint for the `jira-export` CLI.

use std::process::ExitCode;

use jira_export::Error;

fn main() -> ExitCode {
    match jira_export::run(std::env::args_os()) {
        Ok(summary) => {
            println!("{} issues are found.", summary.count);
            println!("{} file is exported.", summary.output.display());
            ExitCode::SUCCESS
        }
        Err(Error::Usage(err)) => {
            if err.use_stderr() {
                eprintln!("Please specify output excel file path.");
            }
            let _ = err.print();
            ExitCode::from(u8::try_from(err.exit_code()).unwrap_or(2))
        }
        Err(err) => {
            let _ = jira_export::report_error(&err, &mut std::io::stderr().lock());
            ExitCode::FAILURE
        }
    }
}
