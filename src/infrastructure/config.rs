use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub circulation: CirculationConfig,
}

/// Circulation desk constants. Overridable per deployment via environment
/// variables; the defaults match what the desk has always used.
#[derive(Clone, Debug)]
pub struct CirculationConfig {
    /// Days a fresh loan runs before it is due.
    pub loan_period_days: i64,
    /// Days added to the due date on each renewal.
    pub renewal_extension_days: i64,
    /// Loans due within this many days count as "Mendekati Jatuh Tempo".
    pub due_soon_threshold_days: i64,
    /// Fine accrued per late day, in rupiah.
    pub fine_per_day: f64,
    /// Renewal cap. Unset means unlimited renewals.
    pub max_renewals: Option<i32>,
    pub borrow_limit_student: u64,
    pub borrow_limit_teacher: u64,
    pub borrow_limit_staff: u64,
}

impl CirculationConfig {
    /// Open-loan cap for a member role. Librarians share the staff limit,
    /// guests the student limit.
    pub fn borrow_limit_for(&self, role: &str) -> u64 {
        match role {
            "teacher" => self.borrow_limit_teacher,
            "staff" | "librarian" => self.borrow_limit_staff,
            _ => self.borrow_limit_student,
        }
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            loan_period_days: env_parse("LOAN_PERIOD_DAYS", defaults.loan_period_days),
            renewal_extension_days: env_parse(
                "RENEWAL_EXTENSION_DAYS",
                defaults.renewal_extension_days,
            ),
            due_soon_threshold_days: env_parse(
                "DUE_SOON_THRESHOLD_DAYS",
                defaults.due_soon_threshold_days,
            ),
            fine_per_day: env_parse("FINE_PER_DAY", defaults.fine_per_day),
            max_renewals: env::var("MAX_RENEWALS").ok().and_then(|v| v.parse().ok()),
            borrow_limit_student: env_parse("BORROW_LIMIT_STUDENT", defaults.borrow_limit_student),
            borrow_limit_teacher: env_parse("BORROW_LIMIT_TEACHER", defaults.borrow_limit_teacher),
            borrow_limit_staff: env_parse("BORROW_LIMIT_STAFF", defaults.borrow_limit_staff),
        }
    }
}

impl Default for CirculationConfig {
    fn default() -> Self {
        Self {
            loan_period_days: 7,
            renewal_extension_days: 7,
            due_soon_threshold_days: 3,
            fine_per_day: 1000.0,
            max_renewals: None,
            borrow_limit_student: 5,
            borrow_limit_teacher: 10,
            borrow_limit_staff: 15,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://siperpus.db?mode=rwc".to_string());

        Self {
            database_url,
            port: env_parse("PORT", 8000),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(Vec::new),
            circulation: CirculationConfig::from_env(),
        }
    }
}
