use argh::FromArgs;
use restricted_shell::Interpreter;
use tracing_subscriber::EnvFilter;

#[derive(FromArgs)]
/// A restricted interactive shell with a fixed set of allowed commands.
struct Options {
    /// tracing filter for diagnostics written to stderr (default: warn)
    #[argh(option, default = "String::from(\"warn\")")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let options: Options = argh::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&options.log_level)?)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    std::panic::set_hook(Box::new(|info| tracing::error!("{info}")));

    Interpreter::default().repl()
}
