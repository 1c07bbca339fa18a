//! Catalog Loader
//!
//! Fetches the purchasable games once per visit. The catalog is replaced
//! wholesale on a successful re-fetch; a failed fetch leaves whatever was
//! loaded before in place.

use immersia_client::{ApiClient, HttpClient};
use shared::models::CatalogItem;

use crate::error::{PosError, PosResult};

/// Loaded list of games, in backend order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn get(&self, id: i64) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Swap in a confirmed item after a successful update
    pub(crate) fn replace(&mut self, item: CatalogItem) -> bool {
        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }
}

/// Load progress shown by the selection screen
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    NotLoaded,
    Loaded,
    /// Last fetch failed; holds the user-facing message
    Failed(String),
}

pub async fn load_catalog<H: HttpClient>(api: &ApiClient<H>) -> PosResult<Catalog> {
    let items = api.list_games().await.map_err(PosError::from)?;
    tracing::debug!(count = items.len(), "Catalog loaded");
    Ok(Catalog::new(items))
}

/// Catalog plus its load state
#[derive(Debug, Clone)]
pub struct CatalogLoader<H: HttpClient> {
    api: ApiClient<H>,
    catalog: Catalog,
    state: LoadState,
}

impl<H: HttpClient> CatalogLoader<H> {
    pub fn new(api: ApiClient<H>) -> Self {
        Self {
            api,
            catalog: Catalog::default(),
            state: LoadState::NotLoaded,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Re-fetch the catalog; errors are logged and recorded, never returned
    pub async fn refresh(&mut self) -> &Catalog {
        match load_catalog(&self.api).await {
            Ok(catalog) => {
                self.catalog = catalog;
                self.state = LoadState::Loaded;
            }
            Err(e) => {
                tracing::error!("Error fetching games: {}", e);
                self.state = LoadState::Failed(e.user_message());
            }
        }
        &self.catalog
    }
}
