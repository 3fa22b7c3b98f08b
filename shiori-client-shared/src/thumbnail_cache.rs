use std::{
    collections::{HashMap, HashSet},
    path::PathBuf,
    sync::{Arc, mpsc},
    time::{Duration, Instant},
};

use shiori_core::{
    Thumbnail, ThumbnailRequester,
    shiori_state::{Series, SeriesKey},
};

use crate::thumbnails;

const TIME_BEFORE_LOAD_ATTEMPT: Duration = Duration::from_millis(100);

/// Clients implement this to produce their own data from raw cover bytes.
/// Called once per entry, when its image data arrives.
pub trait ClientData: Clone {
    fn from_image_data(data: &Arc<[u8]>, key: &SeriesKey) -> Self;
}

pub struct ThumbnailCache<T: ClientData> {
    thumbnail_loaded_rx: mpsc::Receiver<Thumbnail>,
    cache: HashMap<SeriesKey, CacheEntry<T>>,
    /// `None` until the thumbnail directory is ready, or if it could not be created.
    cache_dir: Option<PathBuf>,
    max_cache_size: usize,
    cache_entry_timeout: Duration,
}

struct CacheEntry<T> {
    first_requested: Instant,
    last_requested: Instant,
    state: CacheEntryState<T>,
}

enum CacheEntryState<T> {
    Unloaded,
    /// Requested from the source, no image available yet
    Loading,
    Loaded(T),
    /// The source had no usable cover; not requested again while cached
    Failed,
}

impl<T: ClientData> ThumbnailCache<T> {
    pub fn new(
        thumbnail_loaded_rx: mpsc::Receiver<Thumbnail>,
        max_cache_size: usize,
        cache_entry_timeout: Duration,
    ) -> Self {
        Self {
            thumbnail_loaded_rx,
            cache: HashMap::new(),
            cache_dir: None,
            max_cache_size,
            cache_entry_timeout,
        }
    }

    pub fn set_cache_dir(&mut self, cache_dir: Option<PathBuf>) {
        self.cache_dir = cache_dir;
    }

    /// Process incoming thumbnails, evict stale/excess entries.
    /// Returns keys of evicted entries (for client-side cleanup like `ctx.forget_image()`).
    pub fn update(&mut self) -> Vec<SeriesKey> {
        for incoming in self.thumbnail_loaded_rx.try_iter() {
            let Some(cache_entry) = self.cache.get_mut(&incoming.key) else {
                tracing::debug!(
                    "cache entry for {} not found when receiving thumbnail",
                    incoming.key
                );
                continue;
            };

            let Some(data) = incoming.data else {
                cache_entry.state = CacheEntryState::Failed;
                continue;
            };
            cache_entry.state = CacheEntryState::Loaded(T::from_image_data(&data, &incoming.key));
            tracing::debug!("loaded thumbnail for {}", incoming.key);

            if let Some(cache_dir) = &self.cache_dir {
                let path = thumbnails::thumbnail_path(cache_dir, &incoming.key);
                if !path.exists() {
                    std::thread::spawn(move || thumbnails::save_to_disk(&path, &data));
                }
            }
        }

        let mut removal_candidates: HashSet<SeriesKey> = self
            .cache
            .iter()
            .filter(|(_, entry)| entry.last_requested.elapsed() > self.cache_entry_timeout)
            .map(|(key, _)| key.clone())
            .collect();

        let overage = self
            .cache
            .len()
            .saturating_sub(self.max_cache_size)
            .saturating_sub(removal_candidates.len());
        if overage > 0 {
            let mut by_age: Vec<_> = self
                .cache
                .iter()
                .filter(|(key, _)| !removal_candidates.contains(*key))
                .collect();
            by_age.sort_by_key(|(_, entry)| entry.last_requested);
            removal_candidates.extend(by_age.into_iter().take(overage).map(|(key, _)| key.clone()));
        }

        if !removal_candidates.is_empty() {
            tracing::debug!("forgetting {} thumbnails", removal_candidates.len());
        }
        self.cache.retain(|key, _| !removal_candidates.contains(key));
        removal_candidates.into_iter().collect()
    }

    /// Get client data for a series' cover, triggering loading if needed.
    /// Returns `None` while nothing is available.
    pub fn get(&mut self, requester: &impl ThumbnailRequester, series: &Series) -> Option<&T> {
        let key = series.key();
        let now = Instant::now();
        let cache_entry = self.cache.entry(key.clone()).or_insert(CacheEntry {
            first_requested: now,
            last_requested: now,
            state: CacheEntryState::Unloaded,
        });
        cache_entry.last_requested = now;

        if let CacheEntryState::Unloaded = cache_entry.state
            && let Some(cache_dir) = &self.cache_dir
            && let Some(data) = thumbnails::load_from_disk(cache_dir, &key)
        {
            cache_entry.state = CacheEntryState::Loaded(T::from_image_data(&data, &key));
        }

        // Wait briefly so that tiles scrolled straight past don't trigger fetches.
        if let CacheEntryState::Unloaded = cache_entry.state
            && cache_entry.first_requested.elapsed() > TIME_BEFORE_LOAD_ATTEMPT
        {
            requester.request_thumbnail(&key, &series.remote_cover_url);
            cache_entry.state = CacheEntryState::Loading;
            tracing::debug!("requesting thumbnail for {key}");
        }

        match &cache_entry.state {
            CacheEntryState::Loaded(client_data) => Some(client_data),
            _ => None,
        }
    }
}
