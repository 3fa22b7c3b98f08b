use std::{
    collections::HashMap,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, mpsc},
};

use shiori_state::{ExtensionId, Series, SeriesKey};

use crate::{
    AddModalState, AppState, AppStateError, SearchError, SearchRequest, SearchSource, Settings,
    tokio_thread::TokioThread,
};

/// Cover image bytes for a series, or `None` if they could not be fetched.
pub struct Thumbnail {
    pub key: SeriesKey,
    pub data: Option<Arc<[u8]>>,
}

/// Something that can fetch cover images in the background and deliver them as
/// [`Thumbnail`]s.
pub trait ThumbnailRequester {
    fn request_thumbnail(&self, key: &SeriesKey, url: &str);
}

pub struct LogicArgs {
    pub search_extension: ExtensionId,
    pub settings: Settings,
    pub sources: Vec<Arc<dyn SearchSource>>,
    pub thumbnail_loaded_tx: mpsc::Sender<Thumbnail>,
    /// Called from the background thread whenever shared state changed.
    pub request_repaint: Arc<dyn Fn() + Send + Sync>,
}

pub struct Logic {
    tokio_thread: TokioThread,
    state: Arc<RwLock<AppState>>,
    sources: HashMap<ExtensionId, Arc<dyn SearchSource>>,
    http: reqwest::Client,
    thumbnail_loaded_tx: mpsc::Sender<Thumbnail>,
    request_repaint: Arc<dyn Fn() + Send + Sync>,
}

impl Logic {
    pub fn new(args: LogicArgs) -> std::io::Result<Self> {
        let LogicArgs {
            search_extension,
            settings,
            sources,
            thumbnail_loaded_tx,
            request_repaint,
        } = args;

        let sources = sources
            .into_iter()
            .map(|source| (source.extension_id(), source))
            .collect::<HashMap<_, _>>();
        if !sources.contains_key(&search_extension) {
            tracing::warn!("no source registered for configured extension `{search_extension}`");
        }

        Ok(Self {
            tokio_thread: TokioThread::new()?,
            state: Arc::new(RwLock::new(AppState::new(search_extension, settings))),
            sources,
            http: reqwest::Client::new(),
            thumbnail_loaded_tx,
            request_repaint,
        })
    }

    pub fn get_state(&self) -> Arc<RwLock<AppState>> {
        self.state.clone()
    }

    /// Fetch results for the current query: the first page of a new search when
    /// `fresh`, otherwise the next page of the current one.
    ///
    /// Next-page requests are ignored while a page is loading or once the source
    /// has reported its last page. Returns whether a page is now being fetched.
    pub fn handle_search(&self, fresh: bool) -> bool {
        let Some(request) = self.write_state().search.begin(fresh) else {
            tracing::debug!(fresh, "search request ignored");
            return false;
        };

        let Some(source) = self.sources.get(&request.extension_id).cloned() else {
            let mut state = self.write_state();
            state.search.fail(&request);
            state.error = Some(AppStateError::UnknownExtension {
                extension_id: request.extension_id.to_string(),
            });
            return false;
        };

        tracing::debug!(
            extension = %request.extension_id,
            query = %request.query,
            page = request.page,
            "fetching search page"
        );

        let state = self.state.clone();
        let request_repaint = self.request_repaint.clone();
        self.tokio_thread.spawn(async move {
            let query = request.query.clone();
            let page = request.page;
            let outcome = tokio::task::spawn_blocking(move || source.search(&query, page)).await;

            {
                let mut state = state.write().unwrap();
                match outcome {
                    Ok(Ok(result)) => {
                        let count = result.series_list.len();
                        if state.search.complete(&request, result) {
                            tracing::info!(
                                "loaded page {} of `{}` ({count} series)",
                                request.page,
                                request.extension_id
                            );
                        } else {
                            tracing::debug!("dropping page {} of a superseded search", request.page);
                        }
                    }
                    Ok(Err(e)) => record_search_failure(&mut state, &request, e.to_string()),
                    Err(e) => record_search_failure(&mut state, &request, e.to_string()),
                }
            }
            request_repaint();
        });
        true
    }

    pub fn is_loading(&self) -> bool {
        self.read_state().search.loading
    }

    pub fn in_library(&self, series: &Series) -> bool {
        self.read_state().library.contains(series)
    }

    pub fn add_to_library(&self, series: Series) {
        let title = series.title.clone();
        if self.write_state().library.add(&series) {
            tracing::info!("added `{title}` to the library");
        }
    }

    pub fn set_query(&self, query: &str) {
        self.write_state().search.query = query.trim().to_string();
    }

    pub fn get_search_extension(&self) -> ExtensionId {
        self.read_state().search.extension_id.clone()
    }

    pub fn set_search_extension(&self, extension_id: ExtensionId) {
        self.write_state().search.extension_id = extension_id;
    }

    /// The registered sources, in a stable order.
    pub fn get_source_ids(&self) -> Vec<ExtensionId> {
        let mut ids: Vec<_> = self.sources.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn get_library_columns(&self) -> u32 {
        self.read_state().settings.library_columns
    }

    pub fn set_library_columns(&self, columns: u32) {
        self.write_state().settings.library_columns = columns;
    }

    pub fn get_add_modal(&self) -> AddModalState {
        self.read_state().add_modal.clone()
    }

    pub fn update_add_modal(&self, f: impl FnOnce(&mut AddModalState)) {
        f(&mut self.write_state().add_modal);
    }

    pub fn get_error(&self) -> Option<AppStateError> {
        self.read_state().error.clone()
    }

    pub fn clear_error(&self) {
        self.write_state().error = None;
    }
}
impl Logic {
    fn read_state(&self) -> RwLockReadGuard<'_, AppState> {
        self.state.read().unwrap()
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, AppState> {
        self.state.write().unwrap()
    }
}

impl ThumbnailRequester for Logic {
    fn request_thumbnail(&self, key: &SeriesKey, url: &str) {
        let key = key.clone();
        let tx = self.thumbnail_loaded_tx.clone();

        if url.is_empty() {
            let _ = tx.send(Thumbnail { key, data: None });
            return;
        }

        let http = self.http.clone();
        let url = url.to_string();
        let request_repaint = self.request_repaint.clone();
        self.tokio_thread.spawn(async move {
            let data = match fetch_cover(&http, &url).await {
                Ok(data) => Some(data.into()),
                Err(e) => {
                    tracing::warn!("failed to fetch cover for {key} from {url}: {e}");
                    None
                }
            };
            // The receiver only goes away on shutdown.
            let _ = tx.send(Thumbnail { key, data });
            request_repaint();
        });
    }
}

fn record_search_failure(state: &mut AppState, request: &SearchRequest, error: String) {
    if !state.search.fail(request) {
        return;
    }
    tracing::warn!(
        "search of `{}` failed on page {}: {error}",
        request.extension_id,
        request.page
    );
    state.error = Some(AppStateError::SearchFailed {
        extension_id: request.extension_id.to_string(),
        error,
    });
}

async fn fetch_cover(http: &reqwest::Client, url: &str) -> Result<Vec<u8>, SearchError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        let response = http.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    } else {
        let path = url.strip_prefix("file://").unwrap_or(url);
        Ok(tokio::fs::read(path).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use shiori_state::{FS_METADATA, SearchResult, SourceId};

    use super::*;
    use crate::sf::FilesystemSource;

    struct CountingSource {
        total: usize,
        page_size: usize,
    }
    impl SearchSource for CountingSource {
        fn extension_id(&self) -> ExtensionId {
            ExtensionId::from("counting")
        }

        fn search(&self, query: &str, page: u32) -> Result<SearchResult, SearchError> {
            if query == "fail" {
                return Err("source unavailable".into());
            }
            let start = (page as usize - 1) * self.page_size;
            let end = (start + self.page_size).min(self.total);
            let series_list = (start..end)
                .map(|i| Series {
                    extension_id: self.extension_id(),
                    source_id: SourceId::from(i.to_string().as_str()),
                    title: format!("{query} {i}"),
                    remote_cover_url: String::new(),
                    description: String::new(),
                })
                .collect();
            Ok(SearchResult {
                series_list,
                has_more: end < self.total,
            })
        }
    }

    fn make_logic(extension: &str) -> (Logic, mpsc::Receiver<Thumbnail>) {
        let (tx, rx) = mpsc::channel();
        let logic = Logic::new(LogicArgs {
            search_extension: ExtensionId::from(extension),
            settings: Settings::default(),
            sources: vec![Arc::new(CountingSource {
                total: 5,
                page_size: 2,
            })],
            thumbnail_loaded_tx: tx,
            request_repaint: Arc::new(|| {}),
        })
        .unwrap();
        (logic, rx)
    }

    fn wait_until_loaded(logic: &Logic) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while logic.is_loading() {
            assert!(Instant::now() < deadline, "search did not finish in time");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn paginates_through_a_source() {
        let (logic, _rx) = make_logic("counting");
        logic.set_query("  query ");

        assert!(logic.handle_search(true));
        wait_until_loaded(&logic);
        assert!(logic.handle_search(false));
        wait_until_loaded(&logic);
        assert!(logic.handle_search(false));
        wait_until_loaded(&logic);
        // Exhausted; this one is ignored.
        assert!(!logic.handle_search(false));
        assert!(!logic.is_loading());

        let state = logic.get_state();
        let state = state.read().unwrap();
        assert_eq!(state.search.result.len(), 5);
        assert!(!state.search.result.has_more);
        assert_eq!(state.search.result.series_list[0].title, "query 0");
        assert!(state.error.is_none());
    }

    #[test]
    fn source_errors_are_recorded() {
        let (logic, _rx) = make_logic("counting");
        logic.set_query("fail");
        logic.handle_search(true);
        wait_until_loaded(&logic);

        assert!(matches!(
            logic.get_error(),
            Some(AppStateError::SearchFailed { .. })
        ));
        logic.clear_error();
        assert!(logic.get_error().is_none());
    }

    #[test]
    fn unknown_extension_fails_immediately() {
        let (logic, _rx) = make_logic("nonexistent");
        assert!(!logic.handle_search(true));

        assert!(!logic.is_loading());
        assert_eq!(
            logic.get_error(),
            Some(AppStateError::UnknownExtension {
                extension_id: "nonexistent".to_string()
            })
        );
    }

    #[test]
    fn filesystem_source_is_registered_under_fs_metadata() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("Series")).unwrap();

        let (tx, _rx) = mpsc::channel();
        let logic = Logic::new(LogicArgs {
            search_extension: FS_METADATA,
            settings: Settings::default(),
            sources: vec![Arc::new(FilesystemSource::new(root.path(), 10))],
            thumbnail_loaded_tx: tx,
            request_repaint: Arc::new(|| {}),
        })
        .unwrap();

        assert_eq!(logic.get_source_ids(), [FS_METADATA]);
        logic.handle_search(true);
        wait_until_loaded(&logic);
        assert_eq!(logic.get_state().read().unwrap().search.result.len(), 1);
    }

    #[test]
    fn local_covers_are_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let cover = dir.path().join("cover.png");
        std::fs::write(&cover, b"not really a png").unwrap();

        let (logic, rx) = make_logic("counting");
        let key = SeriesKey {
            extension_id: FS_METADATA,
            source_id: SourceId::from("a"),
        };
        logic.request_thumbnail(&key, &cover.to_string_lossy());
        let thumbnail = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(thumbnail.key, key);
        assert_eq!(thumbnail.data.as_deref(), Some(&b"not really a png"[..]));

        logic.request_thumbnail(&key, "");
        assert!(rx.recv_timeout(Duration::from_secs(5)).unwrap().data.is_none());
    }
}
