pub use shiori_filesystem as sf;
pub use shiori_state;

mod app_state;
pub use app_state::{
    AddModalState, AppState, AppStateError, Library, SearchRequest, SearchState, Settings,
};

mod logic;
pub use logic::{Logic, LogicArgs, Thumbnail, ThumbnailRequester};

mod search;
pub use search::{SearchError, SearchSource};

mod tokio_thread;
