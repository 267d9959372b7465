use simple_shell::config::Config;
use simple_shell::repl;

fn main() {
    env_logger::init();
    let config = Config::from_env();
    if let Err(err) = repl::start(&config) {
        eprintln!("SimpleShell: {:#}", err);
        std::process::exit(1);
    }
}
