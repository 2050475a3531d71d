//! Fake providers shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use cityscout::clients::darksky::DarkSkyDay;
use cityscout::clients::hiking::HikingTrail;
use cityscout::clients::meetup::{MeetupEvent, MeetupGroup};
use cityscout::clients::tmdb::TmdbMovie;
use cityscout::clients::yelp::YelpBusiness;
use cityscout::clients::{FetchParams, Geocoder, ProviderAdapter, ProviderError, ProviderSet};
use cityscout::models::location::NewLocation;
use cityscout::services::CachedResource;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct FakeGeocoder {
    pub calls: AtomicUsize,
    pub fail: bool,
}

impl FakeGeocoder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail: false,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail: true,
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn geocode(&self, query: &str) -> Result<NewLocation, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ProviderError::EmptyResult { provider: "fake geocoder" });
        }
        Ok(NewLocation {
            search_query: query.to_string(),
            formatted_query: "Seattle, WA, USA".to_string(),
            latitude: 47.606_209,
            longitude: -122.332_071,
        })
    }
}

/// Returns the same records on every call, or fails when built with
/// [`Canned::failing`].
pub struct Canned<R: CachedResource> {
    records: Option<Vec<R::Raw>>,
    seen: Mutex<Vec<FetchParams>>,
}

impl<R: CachedResource> Canned<R> {
    pub fn ok(records: Vec<R::Raw>) -> Arc<Self> {
        Arc::new(Self {
            records: Some(records),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            records: None,
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn seen(&self) -> Vec<FetchParams> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl<R> ProviderAdapter<R> for Canned<R>
where
    R: CachedResource,
    R::Raw: Clone,
{
    async fn fetch(&self, params: &FetchParams) -> Result<Vec<R::Raw>, ProviderError> {
        self.seen.lock().unwrap().push(params.clone());
        self.records.clone().ok_or(ProviderError::Rejected {
            provider: "canned",
            status: "OVER_QUERY_LIMIT key=secret".to_string(),
        })
    }
}

pub fn forecast() -> Vec<DarkSkyDay> {
    vec![
        DarkSkyDay {
            summary: "Light rain in the morning.".to_string(),
            time: 1_540_018_800,
        },
        DarkSkyDay {
            summary: "Overcast throughout the day.".to_string(),
            time: 1_540_105_200,
        },
    ]
}

pub fn businesses() -> Vec<YelpBusiness> {
    vec![YelpBusiness {
        name: "Pike Place Chowder".to_string(),
        image_url: Some("https://s3-media.example/chowder.jpg".to_string()),
        rating: Some(4.5),
        price: Some("$$".to_string()),
        url: Some("https://www.yelp.com/biz/pike-place-chowder".to_string()),
    }]
}

pub fn trails() -> Vec<HikingTrail> {
    vec![HikingTrail {
        name: "Rattlesnake Ledge".to_string(),
        location: Some("North Bend, Washington".to_string()),
        length: Some(4.3),
        condition_date: Some("2018-10-13 09:32:03".to_string()),
        condition_status: Some("All Clear".to_string()),
        stars: Some(4.4),
        star_votes: Some(84),
        summary: Some("A popular hike.".to_string()),
        url: Some("https://www.hikingproject.com/trail/7011192".to_string()),
    }]
}

pub fn movies() -> Vec<TmdbMovie> {
    vec![TmdbMovie {
        title: "Sleepless in Seattle".to_string(),
        release_date: Some("1993-06-24".to_string()),
        vote_count: Some(1480),
        vote_average: Some(6.7),
        overview: Some("A young boy who tries to set his dad up.".to_string()),
        poster_path: Some("/abc.jpg".to_string()),
    }]
}

pub fn events() -> Vec<MeetupEvent> {
    vec![MeetupEvent {
        link: Some("https://www.meetup.com/seattle-rust/events/1".to_string()),
        name: "Rust Seattle".to_string(),
        group: Some(MeetupGroup {
            name: "Seattle Rust Meetup".to_string(),
        }),
        created: Some(1_539_907_200_000),
    }]
}

/// Handles to every fake so tests can count calls.
pub struct Fakes {
    pub geocoder: Arc<FakeGeocoder>,
    pub weather: Arc<Canned<cityscout::models::Weather>>,
    pub businesses: Arc<Canned<cityscout::models::Business>>,
    pub trails: Arc<Canned<cityscout::models::Trail>>,
    pub movies: Arc<Canned<cityscout::models::Movie>>,
    pub events: Arc<Canned<cityscout::models::Event>>,
}

impl Fakes {
    pub fn healthy() -> Self {
        Self {
            geocoder: FakeGeocoder::new(),
            weather: Canned::ok(forecast()),
            businesses: Canned::ok(businesses()),
            trails: Canned::ok(trails()),
            movies: Canned::ok(movies()),
            events: Canned::ok(events()),
        }
    }

    pub fn provider_set(&self) -> ProviderSet {
        ProviderSet {
            weather: self.weather.clone(),
            businesses: self.businesses.clone(),
            trails: self.trails.clone(),
            movies: self.movies.clone(),
            events: self.events.clone(),
        }
    }
}
