use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,
    pub api_prefix: String,

    /// Minutes east of UTC for the hostel's wall clock (default 330, Asia/Kolkata).
    pub tz_offset_minutes: i32,
    pub sweep_hour: u32,
    pub sweep_minute: u32,

    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_api_per_min: u32,
}

/// Reject an out-of-range sweep time at boot; left unchecked it would only
/// panic inside the spawned scheduler task, killing the nightly sweep while
/// the server keeps serving.
fn validated_sweep_time(hour: u32, minute: u32) -> (u32, u32) {
    assert!(hour <= 23, "SWEEP_HOUR must be 0-23");
    assert!(minute <= 59, "SWEEP_MINUTE must be 0-59");
    (hour, minute)
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let (sweep_hour, sweep_minute) = validated_sweep_time(
            env::var("SWEEP_HOUR")
                .unwrap_or_else(|_| "23".to_string())
                .parse()
                .expect("SWEEP_HOUR must be 0-23"),
            env::var("SWEEP_MINUTE")
                .unwrap_or_else(|_| "59".to_string())
                .parse()
                .expect("SWEEP_MINUTE must be 0-59"),
        );

        Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string()),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            tz_offset_minutes: env::var("TZ_OFFSET_MINUTES")
                .unwrap_or_else(|_| "330".to_string())
                .parse()
                .expect("TZ_OFFSET_MINUTES must be an integer"),
            sweep_hour,
            sweep_minute,

            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("DB_MAX_CONNECTIONS must be an integer"),
            db_acquire_timeout_secs: env::var("DB_ACQUIRE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .expect("DB_ACQUIRE_TIMEOUT_SECS must be an integer"),

            rate_login_per_min: env::var("RATE_LOGIN_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .expect("RATE_LOGIN_PER_MIN must be an integer"),
            rate_api_per_min: env::var("RATE_API_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .expect("RATE_API_PER_MIN must be an integer"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sweep_time_is_accepted() {
        assert_eq!(validated_sweep_time(23, 59), (23, 59));
        assert_eq!(validated_sweep_time(0, 0), (0, 0));
    }

    #[test]
    #[should_panic(expected = "SWEEP_HOUR must be 0-23")]
    fn out_of_range_sweep_hour_fails_at_boot() {
        validated_sweep_time(24, 0);
    }

    #[test]
    #[should_panic(expected = "SWEEP_MINUTE must be 0-59")]
    fn out_of_range_sweep_minute_fails_at_boot() {
        validated_sweep_time(23, 60);
    }
}
