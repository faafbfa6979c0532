//! Catalog browsing: venues, events, categories and creator cards.

use std::num::NonZeroUsize;

use futures::future::join_all;
use lru::LruCache;
use meetspace_api_client::ApiClient;
use meetspace_core::models::{Category, CreatorInfo, Event, EventFilter, Page, VenueListItem};
use meetspace_core::models::Role;
use meetspace_core::{AppError, AppResult, AuthenticatedIdentity};

/// Events shown per catalog page.
pub const EVENTS_PAGE_SIZE: u32 = 6;

/// Venues shown per catalog page.
pub const VENUES_PAGE_SIZE: u32 = 9;

/// Name shown for a creator whose profile could not be loaded.
pub const FALLBACK_CREATOR_NAME: &str = "Креатор";

const CREATOR_CACHE_CAPACITY: usize = 256;

/// Published-events query of the catalog page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventQuery {
    pub category_id: Option<i64>,
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
}

impl Default for EventQuery {
    fn default() -> Self {
        Self {
            category_id: None,
            page: 1,
            page_size: EVENTS_PAGE_SIZE,
        }
    }
}

pub struct Catalog<'a> {
    api: &'a ApiClient,
    token: Option<String>,
    creators: LruCache<i64, CreatorInfo>,
}

impl<'a> Catalog<'a> {
    pub fn new(api: &'a ApiClient, token: Option<String>) -> Self {
        let capacity = NonZeroUsize::new(CREATOR_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Self {
            api,
            token,
            creators: LruCache::new(capacity),
        }
    }

    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// One page of venues. With `enrich`, rows lacking a description or an
    /// address are completed from the full venue profile; failed lookups
    /// leave the row as listed.
    pub async fn venues(
        &self,
        limit: u32,
        offset: u32,
        enrich: bool,
    ) -> AppResult<Page<VenueListItem>> {
        let mut page = self.api.fetch_venues(self.token(), limit, offset).await?;
        if !enrich {
            return Ok(page);
        }

        let token = self.token();
        let wanted: Vec<(usize, i64)> = page
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.needs_details())
            .map(|(index, item)| (index, item.user_id))
            .collect();
        let lookups = wanted.into_iter().map(|(index, user_id)| async move {
            (index, user_id, self.api.fetch_venue_profile(user_id, token).await)
        });

        for (index, user_id, result) in join_all(lookups).await {
            match result {
                Ok(profile) => page.items[index].merge_profile(&profile),
                Err(e) => tracing::debug!(user_id, error = %e, "Venue details unavailable"),
            }
        }
        Ok(page)
    }

    /// Published events, paged on the client.
    pub async fn events(&self, query: EventQuery) -> AppResult<Page<Event>> {
        let filter = EventFilter {
            category_id: query.category_id,
            ..EventFilter::published()
        };
        let all = self.api.fetch_events(&filter, self.token()).await?;
        let page_size = query.page_size.max(1);
        let offset = query.page.max(1).saturating_sub(1).saturating_mul(page_size);
        Ok(Page::slice(all, page_size, offset))
    }

    /// Events of the logged-in creator, any status.
    pub async fn my_events(&self, identity: &AuthenticatedIdentity) -> AppResult<Vec<Event>> {
        if identity.user.role != Role::Creator {
            return Err(AppError::InvalidInput(
                "Only creators have their own events".to_string(),
            ));
        }
        self.api
            .fetch_events(&EventFilter::by_creator(identity.user.id), Some(&identity.token))
            .await
    }

    pub async fn categories(&self) -> AppResult<Vec<Category>> {
        self.api.fetch_categories(self.token()).await
    }

    /// Name and avatar of an event's creator. Successful lookups are cached;
    /// failures yield the fallback name and are retried next time.
    pub async fn creator_info(&mut self, creator_id: i64) -> CreatorInfo {
        if let Some(info) = self.creators.get(&creator_id) {
            return info.clone();
        }

        let Some(token) = self.token.clone() else {
            return CreatorInfo {
                name: FALLBACK_CREATOR_NAME.to_string(),
                avatar_id: None,
            };
        };

        match self.api.fetch_creator_profile(creator_id, &token).await {
            Ok(profile) => {
                let name = if profile.name.trim().is_empty() {
                    FALLBACK_CREATOR_NAME.to_string()
                } else {
                    profile.name.clone()
                };
                let info = CreatorInfo {
                    name,
                    avatar_id: profile.photo_id,
                };
                self.creators.put(creator_id, info.clone());
                info
            }
            Err(e) => {
                tracing::debug!(creator_id, error = %e, "Creator info unavailable");
                CreatorInfo {
                    name: FALLBACK_CREATOR_NAME.to_string(),
                    avatar_id: None,
                }
            }
        }
    }
}
