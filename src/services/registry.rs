//! Per-resource descriptors for the cache engine.
//!
//! A [`CachedResource`] ties a projected record type to its [`ResourceKind`],
//! its table, the provider's raw record and the conversions between them.
//! The engine is generic over this trait, so adding a resource type is one
//! new impl plus its entity.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelBehavior, ActiveModelTrait, EntityTrait, Set};
use serde::Serialize;

use crate::clients::{darksky, hiking, meetup, tmdb, yelp};
use crate::constants::providers::{DISPLAY_DATE_FORMAT, TMDB_IMAGE_BASE};
use crate::db::ResourceTable;
use crate::domain::{LocationId, ResourceKind};
use crate::entities::{events, movies, trails, weathers, yelps};
use crate::models::{Business, CachedRow, Event, Movie, Trail, Weather};

pub trait CachedResource: Serialize + Clone + Send + Sync + 'static {
    const KIND: ResourceKind;

    type Entity: ResourceTable;

    type ActiveModel: ActiveModelTrait<Entity = Self::Entity> + ActiveModelBehavior + Send + 'static;

    /// Record shape as the provider returns it.
    type Raw: Send + Sync + 'static;

    /// Field projection of one provider record.
    fn project(raw: Self::Raw) -> Self;

    fn from_model(model: <Self::Entity as EntityTrait>::Model) -> CachedRow<Self>;

    fn to_active_model(row: &CachedRow<Self>) -> Self::ActiveModel;
}

fn display_date(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.format(DISPLAY_DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// `2018-10-13 09:32:03` into (`2018-10-13`, `09:32:03`).
fn split_condition_date(raw: Option<&str>) -> (Option<String>, Option<String>) {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return (None, None);
    };

    match raw.split_once(' ') {
        Some((date, time)) => (Some(date.to_string()), Some(time.trim().to_string())),
        None => (Some(raw.to_string()), None),
    }
}

impl CachedResource for Weather {
    const KIND: ResourceKind = ResourceKind::Weather;
    type Entity = weathers::Entity;
    type ActiveModel = weathers::ActiveModel;
    type Raw = darksky::DarkSkyDay;

    fn project(raw: darksky::DarkSkyDay) -> Self {
        Self {
            forecast: raw.summary,
            time: display_date(DateTime::from_timestamp(raw.time, 0)),
        }
    }

    fn from_model(model: weathers::Model) -> CachedRow<Self> {
        CachedRow {
            data: Self {
                forecast: model.forecast,
                time: model.time,
            },
            location_id: LocationId::new(model.location_id),
            created_at: model.created_at,
        }
    }

    fn to_active_model(row: &CachedRow<Self>) -> weathers::ActiveModel {
        weathers::ActiveModel {
            forecast: Set(row.data.forecast.clone()),
            time: Set(row.data.time.clone()),
            created_at: Set(row.created_at.clone()),
            location_id: Set(row.location_id.value()),
            ..Default::default()
        }
    }
}

impl CachedResource for Business {
    const KIND: ResourceKind = ResourceKind::Business;
    type Entity = yelps::Entity;
    type ActiveModel = yelps::ActiveModel;
    type Raw = yelp::YelpBusiness;

    fn project(raw: yelp::YelpBusiness) -> Self {
        Self {
            name: raw.name,
            image_url: raw.image_url,
            rating: raw.rating,
            price: raw.price,
            url: raw.url,
        }
    }

    fn from_model(model: yelps::Model) -> CachedRow<Self> {
        CachedRow {
            data: Self {
                name: model.name,
                image_url: model.image_url,
                rating: model.rating,
                price: model.price,
                url: model.url,
            },
            location_id: LocationId::new(model.location_id),
            created_at: model.created_at,
        }
    }

    fn to_active_model(row: &CachedRow<Self>) -> yelps::ActiveModel {
        let data = &row.data;
        yelps::ActiveModel {
            name: Set(data.name.clone()),
            image_url: Set(data.image_url.clone()),
            rating: Set(data.rating),
            price: Set(data.price.clone()),
            url: Set(data.url.clone()),
            created_at: Set(row.created_at.clone()),
            location_id: Set(row.location_id.value()),
            ..Default::default()
        }
    }
}

impl CachedResource for Trail {
    const KIND: ResourceKind = ResourceKind::Trail;
    type Entity = trails::Entity;
    type ActiveModel = trails::ActiveModel;
    type Raw = hiking::HikingTrail;

    fn project(raw: hiking::HikingTrail) -> Self {
        let (condition_date, condition_time) = split_condition_date(raw.condition_date.as_deref());
        Self {
            name: raw.name,
            location: raw.location,
            length: raw.length,
            condition_date,
            condition_time,
            conditions: raw.condition_status,
            stars: raw.stars,
            star_votes: raw.star_votes,
            summary: raw.summary,
            trail_url: raw.url,
        }
    }

    fn from_model(model: trails::Model) -> CachedRow<Self> {
        CachedRow {
            data: Self {
                name: model.name,
                location: model.location,
                length: model.length,
                condition_date: model.condition_date,
                condition_time: model.condition_time,
                conditions: model.conditions,
                stars: model.stars,
                star_votes: model.star_votes,
                summary: model.summary,
                trail_url: model.trail_url,
            },
            location_id: LocationId::new(model.location_id),
            created_at: model.created_at,
        }
    }

    fn to_active_model(row: &CachedRow<Self>) -> trails::ActiveModel {
        let data = &row.data;
        trails::ActiveModel {
            name: Set(data.name.clone()),
            location: Set(data.location.clone()),
            length: Set(data.length),
            condition_date: Set(data.condition_date.clone()),
            condition_time: Set(data.condition_time.clone()),
            conditions: Set(data.conditions.clone()),
            stars: Set(data.stars),
            star_votes: Set(data.star_votes),
            summary: Set(data.summary.clone()),
            trail_url: Set(data.trail_url.clone()),
            created_at: Set(row.created_at.clone()),
            location_id: Set(row.location_id.value()),
            ..Default::default()
        }
    }
}

impl CachedResource for Movie {
    const KIND: ResourceKind = ResourceKind::Movie;
    type Entity = movies::Entity;
    type ActiveModel = movies::ActiveModel;
    type Raw = tmdb::TmdbMovie;

    fn project(raw: tmdb::TmdbMovie) -> Self {
        let image_url = raw
            .poster_path
            .filter(|p| !p.is_empty())
            .map(|p| format!("{TMDB_IMAGE_BASE}{p}"));

        Self {
            title: raw.title,
            released_on: raw.release_date,
            total_votes: raw.vote_count,
            average_votes: raw.vote_average,
            overview: raw.overview,
            image_url,
        }
    }

    fn from_model(model: movies::Model) -> CachedRow<Self> {
        CachedRow {
            data: Self {
                title: model.title,
                released_on: model.released_on,
                total_votes: model.total_votes,
                average_votes: model.average_votes,
                overview: model.overview,
                image_url: model.image_url,
            },
            location_id: LocationId::new(model.location_id),
            created_at: model.created_at,
        }
    }

    fn to_active_model(row: &CachedRow<Self>) -> movies::ActiveModel {
        let data = &row.data;
        movies::ActiveModel {
            title: Set(data.title.clone()),
            released_on: Set(data.released_on.clone()),
            total_votes: Set(data.total_votes),
            average_votes: Set(data.average_votes),
            overview: Set(data.overview.clone()),
            image_url: Set(data.image_url.clone()),
            created_at: Set(row.created_at.clone()),
            location_id: Set(row.location_id.value()),
            ..Default::default()
        }
    }
}

impl CachedResource for Event {
    const KIND: ResourceKind = ResourceKind::Event;
    type Entity = events::Entity;
    type ActiveModel = events::ActiveModel;
    type Raw = meetup::MeetupEvent;

    fn project(raw: meetup::MeetupEvent) -> Self {
        Self {
            link: raw.link,
            name: raw.name,
            host: raw.group.map(|g| g.name),
            event_date: raw
                .created
                .map(|ms| display_date(DateTime::from_timestamp_millis(ms)))
                .filter(|d| !d.is_empty()),
        }
    }

    fn from_model(model: events::Model) -> CachedRow<Self> {
        CachedRow {
            data: Self {
                link: model.link,
                name: model.name,
                host: model.host,
                event_date: model.event_date,
            },
            location_id: LocationId::new(model.location_id),
            created_at: model.created_at,
        }
    }

    fn to_active_model(row: &CachedRow<Self>) -> events::ActiveModel {
        let data = &row.data;
        events::ActiveModel {
            link: Set(data.link.clone()),
            name: Set(data.name.clone()),
            host: Set(data.host.clone()),
            event_date: Set(data.event_date.clone()),
            created_at: Set(row.created_at.clone()),
            location_id: Set(row.location_id.value()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_time_is_a_day_level_display_date() {
        let weather = Weather::project(darksky::DarkSkyDay {
            summary: "Light rain in the morning.".to_string(),
            // 2018-10-20T07:00:00Z
            time: 1_540_018_800,
        });

        assert_eq!(weather.forecast, "Light rain in the morning.");
        assert_eq!(weather.time, "Sat Oct 20 2018");
    }

    #[test]
    fn trail_condition_date_is_split() {
        let trail = Trail::project(hiking::HikingTrail {
            name: "Rattlesnake Ledge".to_string(),
            location: Some("North Bend, Washington".to_string()),
            length: Some(4.3),
            condition_date: Some("2018-10-13 09:32:03".to_string()),
            condition_status: Some("All Clear".to_string()),
            stars: Some(4.4),
            star_votes: Some(84),
            summary: None,
            url: Some("https://www.hikingproject.com/trail/7011192".to_string()),
        });

        assert_eq!(trail.condition_date.as_deref(), Some("2018-10-13"));
        assert_eq!(trail.condition_time.as_deref(), Some("09:32:03"));
        assert_eq!(trail.conditions.as_deref(), Some("All Clear"));
        assert_eq!(
            trail.trail_url.as_deref(),
            Some("https://www.hikingproject.com/trail/7011192")
        );
    }

    #[test]
    fn condition_date_without_time() {
        assert_eq!(
            split_condition_date(Some("2018-10-13")),
            (Some("2018-10-13".to_string()), None)
        );
        assert_eq!(split_condition_date(Some("  ")), (None, None));
        assert_eq!(split_condition_date(None), (None, None));
    }

    #[test]
    fn movie_poster_becomes_absolute_image_url() {
        let raw = tmdb::TmdbMovie {
            title: "Sleepless in Seattle".to_string(),
            release_date: Some("1993-06-24".to_string()),
            vote_count: Some(1480),
            vote_average: Some(6.7),
            overview: Some("A widower...".to_string()),
            poster_path: Some("/abc.jpg".to_string()),
        };

        let movie = Movie::project(raw.clone());
        assert_eq!(
            movie.image_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/abc.jpg")
        );
        assert_eq!(movie.released_on.as_deref(), Some("1993-06-24"));
        assert_eq!(movie.total_votes, Some(1480));

        let no_poster = Movie::project(tmdb::TmdbMovie {
            poster_path: None,
            ..raw
        });
        assert!(no_poster.image_url.is_none());
    }

    #[test]
    fn event_host_and_date_come_from_group_and_creation() {
        let event = Event::project(meetup::MeetupEvent {
            link: Some("https://meetup.com/e/1".to_string()),
            name: "Rust Seattle".to_string(),
            group: Some(meetup::MeetupGroup {
                name: "Seattle Rust Meetup".to_string(),
            }),
            // 2018-10-19T00:00:00Z
            created: Some(1_539_907_200_000),
        });

        assert_eq!(event.host.as_deref(), Some("Seattle Rust Meetup"));
        assert_eq!(event.event_date.as_deref(), Some("Fri Oct 19 2018"));

        let bare = Event::project(meetup::MeetupEvent {
            link: None,
            name: "Board games".to_string(),
            group: None,
            created: None,
        });
        assert!(bare.host.is_none());
        assert!(bare.event_date.is_none());
    }

    #[test]
    fn model_round_trip_keeps_bookkeeping_columns() {
        let row = CachedRow {
            data: Business {
                name: "Pike Place Chowder".to_string(),
                image_url: None,
                rating: Some(4.5),
                price: Some("$$".to_string()),
                url: None,
            },
            location_id: LocationId::new(9),
            created_at: "2026-03-01T10:00:00+00:00".to_string(),
        };

        let active = Business::to_active_model(&row);
        let model = yelps::Model {
            id: 1,
            name: active.name.clone().unwrap(),
            image_url: active.image_url.clone().unwrap(),
            rating: active.rating.clone().unwrap(),
            price: active.price.clone().unwrap(),
            url: active.url.clone().unwrap(),
            created_at: active.created_at.clone().unwrap(),
            location_id: active.location_id.clone().unwrap(),
        };

        assert_eq!(Business::from_model(model), row);
    }

    #[test]
    fn kinds_match_their_tables() {
        use sea_orm::EntityName;
        assert_eq!(weathers::Entity.table_name(), Weather::KIND.table_name());
        assert_eq!(yelps::Entity.table_name(), Business::KIND.table_name());
        assert_eq!(trails::Entity.table_name(), Trail::KIND.table_name());
        assert_eq!(movies::Entity.table_name(), Movie::KIND.table_name());
        assert_eq!(events::Entity.table_name(), Event::KIND.table_name());
    }
}
