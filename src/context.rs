//! Application context.
//!
//! One [`AppContext`] owns the session store, the query cache and the API
//! client for a running app. Screens receive it by reference instead of
//! reaching for globals, and tests build as many independent contexts as
//! they like.

use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::adapters::{FileStorage, ReqwestHttpClient};
use crate::api::{keys, ApiClient};
use crate::config::AppConfig;
use crate::error::GreenPlateResult;
use crate::models::{Listing, ListingDraft, Reservation};
use crate::query::{QueryClient, QueryObserver, QueryOptions};
use crate::session::SessionStore;
use crate::traits::{HttpClient, KeyValueStorage};
use crate::view::{ReservationView, SessionView};

pub struct AppContext {
    session: SessionStore,
    queries: QueryClient,
    api: ApiClient,
    gc_sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("session", &self.session)
            .field("queries", &self.queries)
            .field("api", &self.api)
            .finish()
    }
}

impl AppContext {
    /// Build a context backed by files under the configured data dir and the
    /// reqwest transport, restoring any persisted session.
    pub async fn open(config: &AppConfig) -> GreenPlateResult<Self> {
        let data_dir = config.resolve_data_dir()?;
        info!(data_dir = %data_dir.display(), api = %config.api_base_url, "Opening app context");

        let storage: Arc<dyn KeyValueStorage> = Arc::new(FileStorage::new(data_dir));
        let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::default());
        Ok(Self::with_parts(config, storage, http).await)
    }

    /// Build a context over explicit storage and transport.
    pub async fn with_parts(
        config: &AppConfig,
        storage: Arc<dyn KeyValueStorage>,
        http: Arc<dyn HttpClient>,
    ) -> Self {
        let session = SessionStore::open(storage).await;
        let queries = QueryClient::with_config(&config.query);
        let api = ApiClient::new(http, config.api_base_url.clone());
        let gc_sweeper = config
            .query
            .gc_sweep_interval
            .map(|interval| queries.spawn_gc_sweeper(interval));

        Self {
            session,
            queries,
            api,
            gc_sweeper: Mutex::new(gc_sweeper),
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn queries(&self) -> &QueryClient {
        &self.queries
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session_view(&self) -> SessionView {
        SessionView::from_session(&self.session.snapshot())
    }

    /// Listings matching `params`, shared through the cache.
    pub async fn listings(&self, params: &[(String, String)]) -> GreenPlateResult<Arc<Vec<Listing>>> {
        let api = self.api.clone();
        let owned = params.to_vec();
        let listings = self
            .queries
            .fetch_query(keys::listings(params), QueryOptions::new(), move || {
                let api = api.clone();
                let params = owned.clone();
                async move { api.listings(&params).await }
            })
            .await?;
        Ok(listings)
    }

    /// Keep the listings for `params` live for a feed screen.
    pub fn observe_listings(&self, params: &[(String, String)]) -> QueryObserver<Vec<Listing>> {
        let api = self.api.clone();
        let owned = params.to_vec();
        self.queries
            .observe(keys::listings(params), QueryOptions::new(), move || {
                let api = api.clone();
                let params = owned.clone();
                async move { api.listings(&params).await }
            })
    }

    pub async fn listing(&self, id: &str) -> GreenPlateResult<Arc<Listing>> {
        let api = self.api.clone();
        let id_owned = id.to_string();
        let listing = self
            .queries
            .fetch_query(keys::listing(id), QueryOptions::new(), move || {
                let api = api.clone();
                let id = id_owned.clone();
                async move { api.listing(&id).await }
            })
            .await?;
        Ok(listing)
    }

    pub async fn reservation(&self, id: &str) -> GreenPlateResult<Arc<Reservation>> {
        let api = self.api.clone();
        let id_owned = id.to_string();
        let reservation = self
            .queries
            .fetch_query(keys::reservation(id), QueryOptions::new(), move || {
                let api = api.clone();
                let id = id_owned.clone();
                async move { api.reservation(&id).await }
            })
            .await?;
        Ok(reservation)
    }

    /// The reservation with its listing details when they can be loaded.
    ///
    /// A failed listing lookup degrades to a view without listing details.
    pub async fn reservation_view(&self, id: &str) -> GreenPlateResult<ReservationView> {
        let reservation = self.reservation(id).await?;
        let listing = match self.listing(&reservation.listing_id).await {
            Ok(listing) => Some(listing),
            Err(err) => {
                warn!(
                    reservation = %reservation.id,
                    listing = %reservation.listing_id,
                    error = %err,
                    "Showing reservation without listing details"
                );
                None
            }
        };
        Ok(ReservationView::new(&reservation, listing.as_deref()))
    }

    /// Publish a listing, then make every listings query refetch.
    pub async fn create_listing(&self, draft: &ListingDraft) -> GreenPlateResult<Listing> {
        let listing = self.api.create_listing(draft).await?;
        self.queries
            .set_query_data(keys::listing(&listing.id), listing.clone());
        let invalidated = self.queries.invalidate_queries(&keys::all_listings());
        debug!(listing = %listing.id, invalidated, "Listing created");
        Ok(listing)
    }

    /// Flush pending session writes, stop the gc sweeper and drop every
    /// cached query.
    pub async fn shutdown(&self) {
        self.session.flush().await;
        let sweeper = self
            .gc_sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = sweeper {
            handle.abort();
        }
        self.queries.clear();
        debug!("App context shut down");
    }
}
