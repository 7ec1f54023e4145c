use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::{debug, error};
use urlconf_server::config::Config;
use urlconf_server::http::server::Server;
use urlconf_server::{logging, views};

fn main() {
    let config = Config::parse();
    logging::init(&config.log_level);

    if let Err(e) = run(config) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(config: Config) -> anyhow::Result<()> {
    config.validate()?;

    let registry = views::registry();
    let urlconf = views::urlconf(&registry).context("Invalid url configuration")?;
    urlconf.check().context("Invalid url configuration")?;
    for pattern in urlconf.patterns() {
        debug!(%pattern, "url pattern");
    }

    let server = Server::from_tcp_addr(&config.bind_addr(), config.workers, Arc::new(urlconf))?;
    server.run()
}
