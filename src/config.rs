use anyhow::bail;
use clap::Parser;

/// Development server for the url dispatcher.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Config {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1")]
    pub addr: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8003)]
    pub port: u16,

    /// Number of worker threads
    #[arg(short, long, default_value_t = 10)]
    pub workers: usize,

    /// Log level, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn bind_addr(&self) -> String {
        if self.addr.contains(':') {
            format!("[{}]:{}", self.addr, self.port)
        } else {
            format!("{}:{}", self.addr, self.port)
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.workers == 0 {
            bail!("--workers must be at least 1");
        }
        if self.addr.is_empty() {
            bail!("--addr can't be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::parse_from(["urlconf-server"]);
        assert_eq!(config.bind_addr(), "127.0.0.1:8003");
        assert_eq!(config.workers, 10);
        assert_eq!(config.log_level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn ipv6_address_is_bracketed() {
        let config = Config::parse_from(["urlconf-server", "--addr", "::1", "-p", "9000"]);
        assert_eq!(config.bind_addr(), "[::1]:9000");
    }

    #[test]
    fn zero_workers_is_invalid() {
        let config = Config::parse_from(["urlconf-server", "--workers", "0"]);
        assert!(config.validate().is_err());
    }
}
