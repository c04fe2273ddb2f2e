use clap::Parser;
use std::env;
use std::ffi::OsString;
use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;
use warp::http::{StatusCode, Uri, header::HeaderName};

use crate::trivia::DEFAULT_API_URL;

/// Trivia question relay
#[derive(Parser, Debug, PartialEq, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Config {
    /// Which errors we want to log (info, warn or error)
    #[clap(short, long, default_value = "info")]
    pub log_level: String,
    /// Address or host name the server listens on
    #[clap(long, default_value = "127.0.0.1")]
    pub host: String,
    /// Which PORT the server is listening to
    #[clap(short, long, default_value = "8000")]
    pub port: u16,
    /// Trivia API endpoint questions are fetched from
    #[clap(long, default_value = DEFAULT_API_URL)]
    pub upstream_url: String,
    /// Seconds to wait for the trivia API before giving up
    #[clap(long, default_value = "5")]
    pub upstream_timeout: u64,
    /// Comma separated origins allowed by CORS, `*` allows any
    #[clap(long, default_value = "*")]
    pub cors_origins: String,
    /// Comma separated request headers allowed by CORS
    #[clap(
        long,
        default_value = "content-type,accept,authorization,origin,x-requested-with"
    )]
    pub cors_headers: String,
    /// Do not allow credentials on cross origin requests
    #[clap(long)]
    pub no_cors_credentials: bool,
    /// Answer 404 instead of 200 when no question matches the filters
    #[clap(long)]
    pub strict_status: bool,
}

impl Config {
    pub fn new() -> Result<Config, handle_errors::Error> {
        Config::from_args(env::args_os())
    }

    pub fn from_args<I, T>(args: I) -> Result<Config, handle_errors::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let config = Config::parse_from(args);

        let port = env::var("PORT")
            .ok()
            .map(|val| val.parse::<u16>())
            .unwrap_or(Ok(config.port))
            .map_err(handle_errors::Error::ParseError)?;

        let upstream_timeout = env::var("TRIVIA_API_TIMEOUT")
            .ok()
            .map(|val| val.parse::<u64>())
            .unwrap_or(Ok(config.upstream_timeout))
            .map_err(handle_errors::Error::ParseError)?;

        let host = env::var("HOST").unwrap_or(config.host);
        let upstream_url = env::var("TRIVIA_API_URL").unwrap_or(config.upstream_url);
        let cors_origins = env::var("CORS_ORIGINS").unwrap_or(config.cors_origins);
        let cors_headers = env::var("CORS_HEADERS").unwrap_or(config.cors_headers);

        let config = Config {
            log_level: config.log_level,
            host,
            port,
            upstream_url,
            upstream_timeout,
            cors_origins,
            cors_headers,
            no_cors_credentials: config.no_cors_credentials,
            strict_status: config.strict_status,
        };
        config.socket_addr()?;
        config.validate_cors()?;

        Ok(config)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, handle_errors::Error> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| handle_errors::Error::InvalidConfig(format!("host {}: {}", self.host, e)))?
            .next()
            .ok_or_else(|| {
                handle_errors::Error::InvalidConfig(format!("host {} has no address", self.host))
            })
    }

    /// Origins must be bare `scheme://host[:port]`, headers valid header names.
    pub fn validate_cors(&self) -> Result<(), handle_errors::Error> {
        for origin in self.cors_origins() {
            let authority = origin
                .parse::<Uri>()
                .ok()
                .filter(|uri| uri.scheme().is_some())
                .and_then(|uri| uri.authority().map(|a| a.to_string()));
            let rest = origin.split_once("://").map(|(_, rest)| rest);
            if rest.is_none() || authority.as_deref() != rest {
                return Err(handle_errors::Error::InvalidConfig(format!(
                    "CORS origin {} is not scheme://host",
                    origin
                )));
            }
        }

        for header in self.cors_headers() {
            HeaderName::from_bytes(header.as_bytes()).map_err(|e| {
                handle_errors::Error::InvalidConfig(format!("CORS header {}: {}", header, e))
            })?;
        }

        Ok(())
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout)
    }

    /// Empty when any origin is allowed.
    pub fn cors_origins(&self) -> Vec<String> {
        let origins = split_list(&self.cors_origins);
        if origins.iter().any(|o| o == "*") {
            Vec::new()
        } else {
            origins
        }
    }

    pub fn cors_headers(&self) -> Vec<String> {
        split_list(&self.cors_headers)
    }

    /// Status overriding the default one of a no-question reply.
    pub fn no_question_status(&self) -> Option<StatusCode> {
        if self.strict_status {
            Some(StatusCode::NOT_FOUND)
        } else {
            None
        }
    }
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod config_tests {
    use super::*;

    fn set_env() {
        unsafe { env::set_var("PORT", "9090") };
        unsafe { env::set_var("HOST", "0.0.0.0") };
        unsafe { env::set_var("TRIVIA_API_URL", "http://localhost:4000/api.php") };
        unsafe { env::set_var("TRIVIA_API_TIMEOUT", "2") };
        unsafe { env::set_var("CORS_ORIGINS", "http://localhost:5500") };
    }

    fn unset_env() {
        unsafe { env::remove_var("PORT") };
        unsafe { env::remove_var("HOST") };
        unsafe { env::remove_var("TRIVIA_API_URL") };
        unsafe { env::remove_var("TRIVIA_API_TIMEOUT") };
        unsafe { env::remove_var("CORS_ORIGINS") };
    }

    #[test]
    fn defaults() {
        let config = Config::parse_from(["trivia-relay"]);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.port, 8000);
        assert_eq!(config.upstream_url, "https://opentdb.com/api.php");
        assert_eq!(config.upstream_timeout(), Duration::from_secs(5));
        assert!(config.cors_origins().is_empty());
        assert!(config.cors_headers().contains(&"content-type".to_string()));
        assert!(!config.no_cors_credentials);
        assert_eq!(config.no_question_status(), None);
        assert_eq!(
            config.socket_addr().unwrap(),
            "127.0.0.1:8000".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn flags_are_parsed() {
        let config = Config::parse_from([
            "trivia-relay",
            "--port",
            "3030",
            "--cors-origins",
            "http://localhost:5500, http://127.0.0.1:5500",
            "--no-cors-credentials",
            "--strict-status",
        ]);
        assert_eq!(config.port, 3030);
        assert_eq!(
            config.cors_origins(),
            vec!["http://localhost:5500", "http://127.0.0.1:5500"]
        );
        assert!(config.no_cors_credentials);
        assert_eq!(config.no_question_status(), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn wildcard_anywhere_allows_any_origin() {
        let config = Config::parse_from(["trivia-relay", "--cors-origins", "http://a.test,*"]);
        assert!(config.cors_origins().is_empty());
    }

    #[test]
    fn host_name_is_resolved() {
        let config = Config::parse_from(["trivia-relay", "--host", "localhost", "--port", "3030"]);
        let addr = config.socket_addr().unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 3030);
    }

    #[test]
    fn unresolvable_host_is_rejected() {
        let config = Config::parse_from(["trivia-relay", "--host", "not a host"]);
        assert!(matches!(
            config.socket_addr(),
            Err(handle_errors::Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn cors_values_are_validated() {
        let config = Config::parse_from(["trivia-relay", "--cors-origins", "http://localhost:5500"]);
        assert!(config.validate_cors().is_ok());

        let config = Config::parse_from(["trivia-relay", "--cors-origins", "http://localhost:5500/"]);
        assert!(config.validate_cors().is_err());

        let config = Config::parse_from(["trivia-relay", "--cors-origins", "localhost"]);
        assert!(config.validate_cors().is_err());

        let config = Config::parse_from(["trivia-relay", "--cors-headers", "bad header"]);
        assert!(config.validate_cors().is_err());
    }

    // the only test touching the process environment
    #[test]
    fn env_overrides_flags() {
        set_env();
        let config = Config::from_args(["trivia-relay", "--port", "1234"]).unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.upstream_url, "http://localhost:4000/api.php");
        assert_eq!(config.upstream_timeout(), Duration::from_secs(2));
        assert_eq!(config.cors_origins(), vec!["http://localhost:5500"]);

        unsafe { env::set_var("PORT", "eighty") };
        let result = Config::from_args(["trivia-relay"]);
        assert!(matches!(result, Err(handle_errors::Error::ParseError(_))));

        unset_env();
        let config = Config::from_args(["trivia-relay"]).unwrap();
        assert_eq!(config.port, 8000);
    }
}
