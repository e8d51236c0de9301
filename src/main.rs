use log::info;
use microshell::Interpreter;
use microshell::config::Config;
use microshell::env::Environment;
use microshell::logging;

fn main() {
    let config = Config::load();
    logging::init(&config.logging);
    info!("microshell starting");

    let env = Environment::with_config(&config);
    let style = env.style;
    let mut shell = Interpreter::new(env);

    let shutdown = shell.repl();
    info!("shutting down: {shutdown}");
    shutdown.report(style);
    std::process::exit(shutdown.exit_code());
}
