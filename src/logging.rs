use std::io::Write;

use env_logger::Env;
use log::warn;

/// Route `log` output to stderr, tagged with the program name.
/// The level defaults to `info` and `RUST_LOG` overrides it. Report output
/// goes to stdout and is never mixed with these lines.
pub fn init_logging(program: &'static str) {
    if env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(move |buf, record| {
            let t = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
            let level_style = buf.default_level_style(record.level());
            writeln!(
                buf,
                "{t} {level_style}{}{level_style:#} {program} {}",
                record.level(),
                record.args()
            )
        })
        .try_init()
        .is_err()
    {
        warn!("logging was already initialised");
    }
}
