// Gallery module - fetch state and the lightbox viewer
mod lightbox;
mod normalize;
mod types;

pub use lightbox::Lightbox;
pub use normalize::normalize_photo_list;
pub use types::Photo;

use chrono::{DateTime, Local};
use tracing::warn;

use crate::client::ApiClient;

/// The one message guests see for any flavor of list-fetch failure.
pub const FETCH_ERROR_MESSAGE: &str = "We could not load the gallery. Please try again soon.";

/// Page-level state for the gallery: the fetched photo list, fetch status,
/// and the lightbox cursor. Fetching happens once on first use and then
/// only on explicit refresh; a failed refresh never clears photos that were
/// already on screen.
pub struct GalleryView {
    client: ApiClient,
    base_url: String,
    photos: Vec<Photo>,
    is_fetching: bool,
    fetch_error: Option<String>,
    last_updated: Option<DateTime<Local>>,
    has_fetched: bool,
    lightbox: Lightbox,
}

impl GalleryView {
    pub fn new(client: ApiClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            photos: Vec::new(),
            is_fetching: false,
            fetch_error: None,
            last_updated: None,
            has_fetched: false,
            lightbox: Lightbox::default(),
        }
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn is_fetching(&self) -> bool {
        self.is_fetching
    }

    pub fn fetch_error(&self) -> Option<&str> {
        self.fetch_error.as_deref()
    }

    /// When the photo list last synced successfully.
    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        self.last_updated
    }

    /// Fetch on first use only. Re-renders of the page go through here, so
    /// the guard is what keeps the list endpoint from being hammered.
    pub async fn fetch_if_needed(&mut self) {
        if !self.has_fetched {
            self.refresh().await;
        }
    }

    /// Re-fetch the photo list. On failure the previous list stays up and
    /// the generic error message is surfaced instead.
    pub async fn refresh(&mut self) {
        self.is_fetching = true;
        self.fetch_error = None;

        match self.client.fetch_photo_list().await {
            Ok(payload) => {
                self.photos = normalize_photo_list(&payload, &self.base_url);
                self.last_updated = Some(Local::now());
            }
            Err(error) => {
                warn!("Photo list fetch failed: {}", error);
                self.fetch_error = Some(FETCH_ERROR_MESSAGE.to_string());
            }
        }

        self.is_fetching = false;
        self.has_fetched = true;
    }

    pub fn open_lightbox(&mut self, index: usize) -> bool {
        self.lightbox.open(index, self.photos.len())
    }

    pub fn close_lightbox(&mut self) {
        self.lightbox.close();
    }

    pub fn lightbox_is_open(&self) -> bool {
        self.lightbox.is_open()
    }

    pub fn next_photo(&mut self) {
        self.lightbox.next(self.photos.len());
    }

    pub fn prev_photo(&mut self) {
        self.lightbox.prev(self.photos.len());
    }

    /// The photo under the lightbox cursor, with its position.
    pub fn current_photo(&self) -> Option<(usize, &Photo)> {
        let index = self.lightbox.cursor()?;
        self.photos.get(index).map(|photo| (index, photo))
    }
}
