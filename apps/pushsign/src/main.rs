//! pushsign - sign message push API requests.
//!
//! Reads the application credentials from the environment, signs the request
//! described on the command line, and prints the headers the request must
//! carry. Logs go to stderr so stdout can be piped straight into a client.
//!
//! # Usage
//!
//! ```text
//! APP_ID=app-1 APP_SECRET=s3cr3t pushsign POST https://push.example.com/api/v1/messages @body.json
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `APP_ID` | *(required)* | Application id |
//! | `APP_SECRET` | *(required)* | Shared HMAC secret |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod cli;

use anyhow::{Context, Result};
use pushsign_auth::headers::signature_header_pairs;
use pushsign_auth::{Credentials, RequestDescriptor, SignatureResult, SignerConfig, sign};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, Invocation, USAGE, parse_args};

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Sign the request described by `invocation`.
fn run(invocation: &Invocation, config: &SignerConfig) -> Result<SignatureResult> {
    let credentials = Credentials::from_config(config).inspect_err(|e| {
        error!(error = %e, "please configure APP_ID and APP_SECRET in the environment");
    })?;

    let body = invocation.body.read()?;
    let request = RequestDescriptor::new(&invocation.method, &invocation.target, body);

    info!(
        app_id = %credentials.app_id(),
        method = %request.method(),
        path = %request.path(),
        "signing request",
    );

    Ok(sign(&request, &credentials)?)
}

/// Render the result for stdout.
fn render(result: &SignatureResult, json: bool) -> Result<String> {
    if json {
        return serde_json::to_string_pretty(result).context("cannot serialize signature");
    }

    Ok(signature_header_pairs(result)
        .iter()
        .map(|(name, value)| format!("{name}: {value}"))
        .collect::<Vec<_>>()
        .join("\n"))
}

fn main() -> Result<()> {
    let invocation = match parse_args(std::env::args().skip(1)) {
        Ok(Command::Sign(invocation)) => invocation,
        Ok(Command::Help) => {
            println!("{USAGE}");
            return Ok(());
        }
        Err(e) => {
            eprintln!("{USAGE}\n");
            return Err(e);
        }
    };

    let config = SignerConfig::from_env();
    init_tracing(&config.log_level)?;

    let result = run(&invocation, &config)?;
    println!("{}", render(&result, invocation.json)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use pushsign_auth::SignError;

    use super::*;
    use crate::cli::BodySource;

    fn config(app_id: Option<&str>, app_secret: Option<&str>) -> SignerConfig {
        SignerConfig {
            app_id: app_id.map(ToOwned::to_owned),
            app_secret: app_secret.map(ToOwned::to_owned),
            log_level: "info".to_owned(),
        }
    }

    fn invocation(body: BodySource) -> Invocation {
        Invocation {
            json: false,
            method: "post".to_owned(),
            target: "https://push.example.com/api/v1/messages?debug=1".to_owned(),
            body,
        }
    }

    #[test]
    fn test_should_sign_invocation() {
        let result = run(
            &invocation(BodySource::Inline(r#"{"b":2,"a":1}"#.to_owned())),
            &config(Some("app-1"), Some("s3cr3t")),
        )
        .unwrap();

        assert_eq!(result.app_id, "app-1");
        assert_eq!(result.canonical_params, r#"{"a":1,"b":2}"#);
        assert!(
            result
                .string_to_sign
                .starts_with(r#"POST/api/v1/messages{"a":1,"b":2}"#)
        );
    }

    #[test]
    fn test_should_fail_without_credentials() {
        let err = run(&invocation(BodySource::None), &config(Some("app-1"), None)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SignError>(),
            Some(SignError::MissingCredential("APP_SECRET"))
        ));
    }

    #[test]
    fn test_should_render_header_lines() {
        let result = run(
            &invocation(BodySource::None),
            &config(Some("app-1"), Some("s3cr3t")),
        )
        .unwrap();

        let rendered = render(&result, false).unwrap();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "X-App-Id: app-1");
        assert_eq!(lines[1], format!("X-Timestamp: {}", result.timestamp));
        assert_eq!(lines[2], format!("X-Nonce: {}", result.nonce));
        assert_eq!(lines[3], format!("X-Signature: {}", result.signature));
        assert_eq!(lines[4], "Content-Type: application/json");
    }

    #[test]
    fn test_should_render_json() {
        let result = run(
            &invocation(BodySource::None),
            &config(Some("app-1"), Some("s3cr3t")),
        )
        .unwrap();

        let rendered = render(&result, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["appId"], "app-1");
        assert_eq!(value["signature"], result.signature.as_str());
        assert_eq!(value["canonicalParams"], "");
    }
}
