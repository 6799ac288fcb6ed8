#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration as Days, NaiveDate, TimeZone, Utc};
use eventdesk::api::{ApiError, ContactApi, EventsApi};
use eventdesk::domain::{
    ContactMessage, EventRecord, PageQuery, PageResult, RegistrationRecord, RegistrationRequest,
};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

pub fn event(id: i64, name: &str) -> EventRecord {
    let day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + Days::days(id);
    EventRecord {
        id,
        name: name.to_string(),
        location: format!("Hall {}", id % 3),
        date: day,
        available_spots: 10,
        created_at: Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap(),
    }
}

/// `count` events named `Event 1` .. `Event {count}`.
pub fn numbered_events(count: i64) -> Vec<EventRecord> {
    (1..=count).map(|id| event(id, &format!("Event {id}"))).collect()
}

/// In-memory events backend with scripted latency and failures.
#[derive(Default)]
pub struct FakeEventsApi {
    events: Mutex<Vec<EventRecord>>,
    list_calls: Mutex<Vec<PageQuery>>,
    register_calls: Mutex<Vec<(i64, RegistrationRequest)>>,
    delays: Mutex<HashMap<String, Duration>>,
    failing_pages: Mutex<HashSet<u32>>,
    register_results: Mutex<VecDeque<Result<RegistrationRecord, ApiError>>>,
}

impl FakeEventsApi {
    pub fn with_events(events: Vec<EventRecord>) -> Self {
        let api = Self::default();
        *api.events.lock().unwrap() = events;
        api
    }

    /// Responses for `search` take `delay` to arrive.
    pub fn delay_search(&self, search: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(search.to_string(), delay);
    }

    pub fn fail_page(&self, page: u32) {
        self.failing_pages.lock().unwrap().insert(page);
    }

    pub fn push_register_result(&self, result: Result<RegistrationRecord, ApiError>) {
        self.register_results.lock().unwrap().push_back(result);
    }

    pub fn list_calls(&self) -> Vec<PageQuery> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn register_calls(&self) -> Vec<(i64, RegistrationRequest)> {
        self.register_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventsApi for FakeEventsApi {
    async fn list_events(&self, query: &PageQuery) -> Result<PageResult<EventRecord>, ApiError> {
        self.list_calls.lock().unwrap().push(query.clone());

        let delay = self.delays.lock().unwrap().get(&query.search).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing_pages.lock().unwrap().contains(&query.page) {
            return Err(ApiError::Status {
                status: 500,
                message: Some("database unavailable".to_string()),
            });
        }

        let needle = query.search.to_lowercase();
        let matching: Vec<EventRecord> = self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|event| event.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        let limit = query.limit.get() as usize;
        let skip = (query.page as usize - 1) * limit;
        Ok(PageResult {
            items: matching.iter().skip(skip).take(limit).cloned().collect(),
            total: matching.len() as u64,
            page: query.page,
            limit: query.limit.get(),
        })
    }

    async fn register(
        &self,
        event_id: i64,
        request: &RegistrationRequest,
    ) -> Result<RegistrationRecord, ApiError> {
        self.register_calls
            .lock()
            .unwrap()
            .push((event_id, request.clone()));

        if let Some(result) = self.register_results.lock().unwrap().pop_front() {
            return result;
        }

        let mut events = self.events.lock().unwrap();
        let event = events
            .iter_mut()
            .find(|event| event.id == event_id)
            .ok_or(ApiError::Status {
                status: 404,
                message: Some("Event not found".to_string()),
            })?;
        event.available_spots -= 1;

        Ok(RegistrationRecord {
            id: 1,
            name: request.name.clone(),
            email: request.email.clone(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap(),
            event: event.clone(),
        })
    }
}

/// Contact backend answering from a script, succeeding when it runs out.
#[derive(Default)]
pub struct FakeContactApi {
    results: Mutex<VecDeque<Result<(), ApiError>>>,
    sent: Mutex<Vec<ContactMessage>>,
}

impl FakeContactApi {
    pub fn push_result(&self, result: Result<(), ApiError>) {
        self.results.lock().unwrap().push_back(result);
    }

    pub fn sent(&self) -> Vec<ContactMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContactApi for FakeContactApi {
    async fn send_contact(&self, message: &ContactMessage) -> Result<(), ApiError> {
        self.sent.lock().unwrap().push(message.clone());
        self.results.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}
