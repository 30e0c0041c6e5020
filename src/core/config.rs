use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub mail: MailConfig,
    pub recaptcha: RecaptchaConfig,
    pub rate_limit: RateLimitConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

/// SMTP transport configuration for notification dispatch
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// SMTP relay hostname
    pub smtp_host: String,
    /// Relay login (for Gmail this is the account address)
    pub smtp_username: String,
    /// Relay password (for Gmail an app password)
    pub smtp_password: String,
    /// Sender mailbox, e.g. "Keystone Sports Therapy <hello@kstherapyclinic.com>"
    pub from: String,
    /// Operator mailbox receiving form notifications
    pub operator_address: String,
    /// Upper bound on a single SMTP send
    pub send_timeout: Duration,
}

/// reCAPTCHA v3 verification configuration
#[derive(Debug, Clone)]
pub struct RecaptchaConfig {
    /// Shared secret for the siteverify API. Verification fails closed when absent.
    pub secret_key: Option<String>,
    pub verify_url: String,
    /// Minimum acceptable risk score in [0,1]
    pub min_score: f64,
    /// Upper bound on the siteverify call
    pub timeout: Duration,
}

/// Fixed-window rate limit policies for the contact endpoint
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub rapid_max_requests: u32,
    pub rapid_window_secs: u64,
    pub sustained_max_requests: u32,
    pub sustained_window_secs: u64,
    /// Interval of the background sweep evicting expired counters
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            mail: MailConfig::from_env()?,
            recaptcha: RecaptchaConfig::from_env()?,
            rate_limit: RateLimitConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl MailConfig {
    const DEFAULT_SEND_TIMEOUT_SECS: u64 = 10;

    pub fn from_env() -> Result<Self, String> {
        let smtp_host = env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string());

        let smtp_username = env::var("SMTP_USERNAME")
            .map_err(|_| "SMTP_USERNAME environment variable is required".to_string())?;

        let smtp_password = env::var("SMTP_PASSWORD")
            .map_err(|_| "SMTP_PASSWORD environment variable is required".to_string())?;

        let from = env::var("EMAIL_FROM")
            .unwrap_or_else(|_| "Keystone Sports Therapy <hello@kstherapyclinic.com>".to_string());

        let operator_address =
            env::var("EMAIL_TO").unwrap_or_else(|_| "hello@kstherapyclinic.com".to_string());

        let send_timeout_secs = env::var("SMTP_SEND_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_SEND_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "SMTP_SEND_TIMEOUT_SECS must be a valid number".to_string())?;

        Ok(Self {
            smtp_host,
            smtp_username,
            smtp_password,
            from,
            operator_address,
            send_timeout: Duration::from_secs(send_timeout_secs),
        })
    }
}

impl RecaptchaConfig {
    const DEFAULT_VERIFY_URL: &'static str = "https://www.google.com/recaptcha/api/siteverify";
    const DEFAULT_MIN_SCORE: f64 = 0.5;
    const DEFAULT_TIMEOUT_SECS: u64 = 10;

    pub fn from_env() -> Result<Self, String> {
        // Deliberately optional: a missing secret makes every verification
        // fail closed instead of preventing startup
        let secret_key = env::var("RECAPTCHA_SECRET_KEY")
            .ok()
            .filter(|s| !s.is_empty());

        let verify_url = env::var("RECAPTCHA_VERIFY_URL")
            .unwrap_or_else(|_| Self::DEFAULT_VERIFY_URL.to_string());

        let min_score = env::var("RECAPTCHA_MIN_SCORE")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_SCORE.to_string())
            .parse::<f64>()
            .map_err(|_| "RECAPTCHA_MIN_SCORE must be a valid number".to_string())?;

        let timeout_secs = env::var("RECAPTCHA_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "RECAPTCHA_TIMEOUT_SECS must be a valid number".to_string())?;

        Ok(Self {
            secret_key,
            verify_url,
            min_score,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl RateLimitConfig {
    // Reference policies: 2 requests per minute, 5 per 15 minutes,
    // sweep every 5 minutes
    const DEFAULT_RAPID_MAX_REQUESTS: u32 = 2;
    const DEFAULT_RAPID_WINDOW_SECS: u64 = 60;
    const DEFAULT_SUSTAINED_MAX_REQUESTS: u32 = 5;
    const DEFAULT_SUSTAINED_WINDOW_SECS: u64 = 900;
    const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;

    pub fn from_env() -> Result<Self, String> {
        let rapid_max_requests = env::var("RATE_LIMIT_RAPID_MAX_REQUESTS")
            .unwrap_or_else(|_| Self::DEFAULT_RAPID_MAX_REQUESTS.to_string())
            .parse::<u32>()
            .map_err(|_| "RATE_LIMIT_RAPID_MAX_REQUESTS must be a valid number".to_string())?;

        let rapid_window_secs = env::var("RATE_LIMIT_RAPID_WINDOW_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_RAPID_WINDOW_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "RATE_LIMIT_RAPID_WINDOW_SECS must be a valid number".to_string())?;

        let sustained_max_requests = env::var("RATE_LIMIT_SUSTAINED_MAX_REQUESTS")
            .unwrap_or_else(|_| Self::DEFAULT_SUSTAINED_MAX_REQUESTS.to_string())
            .parse::<u32>()
            .map_err(|_| "RATE_LIMIT_SUSTAINED_MAX_REQUESTS must be a valid number".to_string())?;

        let sustained_window_secs = env::var("RATE_LIMIT_SUSTAINED_WINDOW_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_SUSTAINED_WINDOW_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "RATE_LIMIT_SUSTAINED_WINDOW_SECS must be a valid number".to_string())?;

        let sweep_interval_secs = env::var("RATE_LIMIT_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_SWEEP_INTERVAL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "RATE_LIMIT_SWEEP_INTERVAL_SECS must be a valid number".to_string())?;

        Ok(Self {
            rapid_max_requests,
            rapid_window_secs,
            sustained_max_requests,
            sustained_window_secs,
            sweep_interval_secs,
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Keystone Clinic API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION").unwrap_or_else(|_| {
            "Form submission API for the Keystone Sports Therapy website".to_string()
        });

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}
