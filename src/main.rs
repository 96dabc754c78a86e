use anyhow::{Result, anyhow};
use argh::FromArgs;
use release_runner::env::{Environment, parse_assignment};
use release_runner::{
    BuildToken, DryRun, FailurePolicy, ProcessExecutor, ReleaseError, ReleasePlan, Runner,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(FromArgs)]
/// Build stylesheets, minify assets and compile the release binary, stopping at the
/// first failing step.
struct Args {
    #[argh(option)]
    /// directory the build steps run in. Defaults to the directory of this crate.
    root: Option<PathBuf>,

    #[argh(switch)]
    /// do not pass a build token to cargo.
    no_etag: bool,

    #[argh(option)]
    /// use this build token instead of a freshly generated one.
    etag: Option<BuildToken>,

    #[argh(option)]
    /// extra KEY=VALUE variable for every step; may be repeated.
    env: Vec<String>,

    #[argh(switch)]
    /// run every step even if an earlier one failed.
    keep_going: bool,

    #[argh(switch)]
    /// print the commands instead of running them.
    dry_run: bool,
}

fn default_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn release(args: Args) -> Result<()> {
    let token = match (args.no_etag, args.etag) {
        (true, Some(_)) => return Err(anyhow!("--no-etag and --etag cannot be used together")),
        (true, None) => None,
        (false, Some(token)) => Some(token),
        (false, None) => Some(BuildToken::generate()),
    };

    let root = args.root.unwrap_or_else(default_root);
    log::info!("release root: {}", root.display());
    match &token {
        Some(token) => log::info!("build token: {}", token),
        None => log::info!("build token: disabled"),
    }

    let mut env = Environment::capture(&root);
    for assignment in &args.env {
        let (key, value) = parse_assignment(assignment)?;
        env.set_var(key, value);
    }
    let env = env.with_release_overlay();

    let policy = if args.keep_going {
        FailurePolicy::KeepGoing
    } else {
        FailurePolicy::FailFast
    };
    let plan = ReleasePlan::release(token);

    let report = if args.dry_run {
        Runner::new(DryRun::new(std::io::stdout()), env)
            .with_policy(policy)
            .run(&plan)?
    } else {
        Runner::new(ProcessExecutor, env)
            .with_policy(policy)
            .run(&plan)?
    };
    log::info!("release finished: {} steps", report.outcomes.len());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();
    match release(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            match e.downcast_ref::<ReleaseError>() {
                Some(release_error) => ExitCode::from(release_error.exit_code()),
                None => ExitCode::FAILURE,
            }
        }
    }
}
