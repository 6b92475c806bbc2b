use std::process::ExitCode;
use termcheck_cli::{build_cli, init_tracing, run, GlobalOptions, Invocation};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let matches = build_cli().get_matches();
    let globals = GlobalOptions::from_matches(&matches);
    init_tracing(globals.log_json);

    let Some(invocation) = Invocation::from_matches(&matches) else {
        anyhow::bail!("unknown subcommand");
    };

    let mut stdout = std::io::stdout();
    let outcome = run(&globals, invocation, &mut stdout).await?;
    Ok(outcome.exit_code())
}
