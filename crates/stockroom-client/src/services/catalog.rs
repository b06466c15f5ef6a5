//! # Catalog Services
//!
//! Categories, stores, accounts and products share one endpoint family:
//!
//! ```text
//! GET  /<resource>/all?search&sortBy&sortOrder&limit&page   list
//! POST /<resource>/detail  {id}                             one entity
//! POST /<resource>/create  {...}                            acknowledgement
//! POST /<resource>/update  {id, ...}                        acknowledgement
//! POST /<resource>/delete  {id}                             acknowledgement
//! ```
//!
//! A [`CatalogResource`] marker binds a path to its entity, filter and
//! request types so [`CatalogApi`] is written once.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use stockroom_core::validation::{validate_filter, ValidationResult};
use stockroom_core::{
    Account, AccountFilter, Category, CreateAccountRequest, CreateCategoryRequest,
    CreateProductRequest, CreateStoreRequest, IdRequest, Identified, ListFilter, ListPayload, Page,
    Product, ProductFilter, Store, ToQuery, UpdateAccountRequest, UpdateCategoryRequest,
    UpdateProductRequest, UpdateStoreRequest,
};
use tracing::debug;

use crate::error::ClientResult;
use crate::http::ApiClient;

pub type EntityId<R> = <<R as CatalogResource>::Entity as Identified>::Id;

/// Binds a catalog endpoint family to its types.
pub trait CatalogResource: Send + Sync + 'static {
    /// Path prefix, e.g. `/categories`.
    const PATH: &'static str;

    /// Plural noun used in log lines and error messages.
    const LABEL: &'static str;

    /// Singular form of [`Self::LABEL`].
    const NOUN: &'static str;

    type Entity: Identified + DeserializeOwned + Clone + Send + Sync + 'static;
    type Filter: ToQuery + Default + Clone + Send + Sync + 'static;
    type Create: Serialize + Send + Sync;
    type Update: Serialize + Send + Sync;

    fn validate(filter: &Self::Filter) -> ValidationResult<()>;
}

pub enum Categories {}

pub enum Stores {}

/// Suppliers and customers (`/akun` on the wire).
pub enum Accounts {}

pub enum Products {}

impl CatalogResource for Categories {
    const PATH: &'static str = "/categories";
    const LABEL: &'static str = "categories";
    const NOUN: &'static str = "category";
    type Entity = Category;
    type Filter = ListFilter;
    type Create = CreateCategoryRequest;
    type Update = UpdateCategoryRequest;

    fn validate(filter: &ListFilter) -> ValidationResult<()> {
        validate_filter(filter)
    }
}

impl CatalogResource for Stores {
    const PATH: &'static str = "/store";
    const LABEL: &'static str = "stores";
    const NOUN: &'static str = "store";
    type Entity = Store;
    type Filter = ListFilter;
    type Create = CreateStoreRequest;
    type Update = UpdateStoreRequest;

    fn validate(filter: &ListFilter) -> ValidationResult<()> {
        validate_filter(filter)
    }
}

impl CatalogResource for Accounts {
    const PATH: &'static str = "/akun";
    const LABEL: &'static str = "accounts";
    const NOUN: &'static str = "account";
    type Entity = Account;
    type Filter = AccountFilter;
    type Create = CreateAccountRequest;
    type Update = UpdateAccountRequest;

    fn validate(filter: &AccountFilter) -> ValidationResult<()> {
        validate_filter(&filter.list)
    }
}

impl CatalogResource for Products {
    const PATH: &'static str = "/products";
    const LABEL: &'static str = "products";
    const NOUN: &'static str = "product";
    type Entity = Product;
    type Filter = ProductFilter;
    type Create = CreateProductRequest;
    type Update = UpdateProductRequest;

    fn validate(filter: &ProductFilter) -> ValidationResult<()> {
        validate_filter(&filter.list)
    }
}

/// Endpoint wrapper for one catalog resource.
pub struct CatalogApi<R> {
    client: ApiClient,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for CatalogApi<R> {
    fn clone(&self) -> Self {
        CatalogApi {
            client: self.client.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: CatalogResource> CatalogApi<R> {
    pub fn new(client: ApiClient) -> Self {
        CatalogApi {
            client,
            _resource: PhantomData,
        }
    }

    pub async fn list(&self, filter: &R::Filter) -> ClientResult<Page<R::Entity>> {
        R::validate(filter)?;
        let query = filter.to_query();
        debug!(resource = R::LABEL, query = %query.encode(), "Listing");

        let payload: ListPayload<R::Entity> =
            self.client.get(&endpoint::<R>("all"), query).await?;
        Ok(payload.into())
    }

    pub async fn detail(&self, id: &EntityId<R>) -> ClientResult<R::Entity> {
        self.client
            .post(&endpoint::<R>("detail"), &IdRequest { id })
            .await
    }

    pub async fn create(&self, request: &R::Create) -> ClientResult<()> {
        self.client.post_ack(&endpoint::<R>("create"), request).await
    }

    pub async fn update(&self, request: &R::Update) -> ClientResult<()> {
        self.client.post_ack(&endpoint::<R>("update"), request).await
    }

    pub async fn delete(&self, id: &EntityId<R>) -> ClientResult<()> {
        self.client
            .post_ack(&endpoint::<R>("delete"), &IdRequest { id })
            .await
    }
}

fn endpoint<R: CatalogResource>(action: &str) -> String {
    format!("{}/{action}", R::PATH)
}
