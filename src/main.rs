/*!
 * procsim - Main Entry Point
 *
 * Loads a process definition file, runs it under the chosen scheduling
 * policy and prints the event log to stdout.
 */

use procsim_kernel::core::limits::DEFAULT_CLI_LOG_FILTER;
use procsim_kernel::{
    init_tracing, load_file, KernelError, OutputFormat, RunConfig, RunOutcome, Scheduler,
};
use tracing::{info, warn};

fn main() -> miette::Result<()> {
    let config = RunConfig::from_env_args(std::env::args().skip(1)).map_err(KernelError::from)?;
    init_tracing(config.trace_json, DEFAULT_CLI_LOG_FILTER);

    info!(path = %config.path.display(), policy = %config.scheduler.policy, "loading process definition");
    let model = load_file(&config.path).map_err(KernelError::from)?;

    let mut scheduler = Scheduler::new(&model, config.scheduler);
    let outcome = scheduler.run();
    if let RunOutcome::Stalled { process, resource } = &outcome {
        warn!(process = %process, resource = %resource, "run stalled; remaining processes never ran");
    }

    let events = scheduler.events();
    match config.output {
        OutputFormat::Text => print!("{}", events.render_text()),
        OutputFormat::Json => {
            let json = events.to_json().map_err(KernelError::from)?;
            println!("{}", json);
        }
    }

    info!(stats = ?scheduler.stats(), outcome = outcome.as_str(), "done");
    Ok(())
}
