use log::LevelFilter;

pub const LOG_LEVEL_ENV: &str = "HOOPDASH_LOG";

#[derive(Debug, Default, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
}

impl AppSettings {
    pub fn load() -> Self {
        let log_level = std::env::var(LOG_LEVEL_ENV).ok().and_then(|v| parse_level(&v));
        Self { full_screen: false, log_level }
    }
}

fn parse_level(raw: &str) -> Option<LevelFilter> {
    raw.trim().parse().ok()
}
