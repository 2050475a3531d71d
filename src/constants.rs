pub mod cache {

    pub const WEATHER_TTL_MINUTES: i64 = 30;

    pub const BUSINESS_TTL_MINUTES: i64 = 1000;

    pub const TRAIL_TTL_MINUTES: i64 = 100;

    pub const MOVIE_TTL_MINUTES: i64 = 10_000;

    pub const EVENT_TTL_MINUTES: i64 = 1000;
}

pub mod providers {

    pub const USER_AGENT: &str = concat!("cityscout/", env!("CARGO_PKG_VERSION"));

    /// Prefixed to the TMDB `poster_path` fragment, which already starts with `/`.
    pub const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

    /// Day-level display format for weather and event dates, e.g. `Mon Jan 01 2001`.
    pub const DISPLAY_DATE_FORMAT: &str = "%a %b %d %Y";
}

pub mod limits {

    pub const MAX_QUERY_LENGTH: usize = 256;
}
