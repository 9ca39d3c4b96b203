use anyhow::Result;

pub struct AppConfig {
    pub database: DatabaseConfig,
    pub reservation: ReservationConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let database = DatabaseConfig {
            host: std::env::var("DATABASE_HOST")?,
            port: std::env::var("DATABASE_PORT")?.parse()?,
            username: std::env::var("DATABASE_USERNAME")?,
            password: std::env::var("DATABASE_PASSWORD")?,
            database: std::env::var("DATABASE_NAME")?,
        };
        let reservation = ReservationConfig {
            // 空き状況を一度に計算できる日数の上限
            max_availability_range_days: std::env::var("AVAILABILITY_MAX_RANGE_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(90),
        };
        Ok(Self {
            database,
            reservation,
        })
    }
}

pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

pub struct ReservationConfig {
    pub max_availability_range_days: i64,
}
