//! Configuration for retrace

use std::path::PathBuf;

use retrace_core::RetryPolicy;

use crate::notify::SmtpServerConfig;

/// Configuration for retries, log locations and notification delivery.
///
/// Path resolution and defaults live here so renderers and executors stay
/// free of process-level concerns.
#[derive(Debug, Clone, PartialEq)]
pub struct RetraceConfig {
    /// Directory default log paths resolve into
    pub log_dir: PathBuf,

    /// File name for failure reports inside `log_dir`
    pub failure_log_name: String,

    /// Default retry policy
    pub retry: RetryPolicy,

    /// Outbound mail settings, when notifications are enabled
    pub smtp: Option<SmtpServerConfig>,
}

impl Default for RetraceConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            failure_log_name: Self::DEFAULT_FAILURE_LOG.to_string(),
            retry: RetryPolicy::default(), // single attempt, no wait
            smtp: None,
        }
    }
}

impl RetraceConfig {
    /// File name used for failure reports when none is configured.
    pub const DEFAULT_FAILURE_LOG: &'static str = "Exceptions.log";

    /// Set the log directory.
    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = log_dir.into();
        self
    }

    /// Set the failure log file name.
    pub fn with_failure_log_name(mut self, name: impl Into<String>) -> Self {
        self.failure_log_name = name.into();
        self
    }

    /// Set the default retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the outbound mail settings.
    pub fn with_smtp(mut self, smtp: SmtpServerConfig) -> Self {
        self.smtp = Some(smtp);
        self
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is read first, if present.
    /// This will look for:
    /// - `RETRACE_LOG_DIR` for the log directory
    /// - `RETRACE_FAILURE_LOG` for the failure log file name
    /// - `RETRACE_MAX_RETRIES` for the default retry count
    /// - `RETRACE_RETRY_WAIT_SECS` for the wait between retries (fractional seconds)
    /// - `RETRACE_SMTP_SERVER` and `RETRACE_SMTP_FROM` for notifications (both required)
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`](crate::Error::InvalidInput) when a numeric
    /// variable does not parse or only one of the SMTP variables is set.
    #[cfg(feature = "env")]
    pub fn from_env() -> crate::Result<Self> {
        use std::env;

        use crate::error::Error;

        let _ = dotenvy::dotenv();

        let mut config = Self::default();

        if let Ok(log_dir) = env::var("RETRACE_LOG_DIR") {
            config.log_dir = PathBuf::from(log_dir);
        }

        if let Ok(name) = env::var("RETRACE_FAILURE_LOG")
            && !name.is_empty()
        {
            config.failure_log_name = name;
        }

        let max_retries = match env::var("RETRACE_MAX_RETRIES") {
            Ok(raw) => raw.trim().parse::<u32>().map_err(|e| {
                Error::invalid_input(format!("RETRACE_MAX_RETRIES={raw:?} is not a count: {e}"))
            })?,
            Err(_) => config.retry.max_retries(),
        };

        let wait_secs = match env::var("RETRACE_RETRY_WAIT_SECS") {
            Ok(raw) => raw.trim().parse::<f64>().map_err(|e| {
                Error::invalid_input(format!(
                    "RETRACE_RETRY_WAIT_SECS={raw:?} is not a number: {e}"
                ))
            })?,
            Err(_) => config.retry.wait_between_retries().as_secs_f64(),
        };

        config.retry = RetryPolicy::try_from_secs_f64(max_retries, wait_secs)
            .map_err(|e| Error::invalid_input(e.to_string()))?;

        config.smtp = match (env::var("RETRACE_SMTP_SERVER"), env::var("RETRACE_SMTP_FROM")) {
            (Ok(server), Ok(from)) => Some(SmtpServerConfig::new(server, from)?),
            (Err(_), Err(_)) => None,
            _ => {
                return Err(Error::invalid_input(
                    "RETRACE_SMTP_SERVER and RETRACE_SMTP_FROM must be set together",
                ));
            }
        };

        Ok(config)
    }

    /// Merge this configuration with another, with the other taking precedence
    /// wherever it differs from the defaults.
    pub fn merge(mut self, other: RetraceConfig) -> Self {
        let defaults = Self::default();
        if other.log_dir != defaults.log_dir {
            self.log_dir = other.log_dir;
        }
        if other.failure_log_name != defaults.failure_log_name {
            self.failure_log_name = other.failure_log_name;
        }
        if other.retry != defaults.retry {
            self.retry = other.retry;
        }
        if other.smtp.is_some() {
            self.smtp = other.smtp;
        }
        self
    }
}

/// Directory of the running executable, falling back to the working directory.
fn default_log_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(PathBuf::from))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}
