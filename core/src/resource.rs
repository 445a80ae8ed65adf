//! Typed accessors for each API resource.
//!
//! # Design
//! One generic `Resource<E>` carries the get/list/delete logic. The entity
//! type supplies its JSON keys and URL collection through `Entity` and
//! `Addressable`; `Deletable` opts a type into `delete`. Per-entity list
//! operations are inherent methods on the concrete instantiation, since each
//! has its own parent path.
//!
//! ```rust,no_run
//! use snapads_core::{Context, SnapchatClient};
//!
//! let client = SnapchatClient::new("token")?;
//! let ctx = Context::background();
//! for campaign in client.campaigns().list(&ctx, "acct-1")? {
//!     println!("{} {}", campaign.id, campaign.status);
//! }
//! # Ok::<(), snapads_core::ApiError>(())
//! ```

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::client::SnapchatClient;
use crate::context::Context;
use crate::envelope::{self, Envelope};
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::types::{Ad, AdAccount, AdSquad, Campaign, FundingSource, Organization, TotalStat, User};

/// A type that arrives wrapped in a response envelope.
pub trait Entity: DeserializeOwned {
    /// Key of the sub-envelope array, e.g. `adsquads`.
    const PLURAL_KEY: &'static str;
    /// Key of the entity inside each sub-envelope, e.g. `adsquad`.
    const SINGULAR_KEY: &'static str;
    /// Human-readable name used in error context.
    const LABEL: &'static str;
}

/// An entity that can be fetched by id at `{COLLECTION}/{id}`.
pub trait Addressable: Entity {
    const COLLECTION: &'static str;
}

/// An entity that can be deleted at `{COLLECTION}/{id}`.
pub trait Deletable: Addressable {}

/// Accessor for one entity type, borrowed from the client.
pub struct Resource<'c, E> {
    client: &'c SnapchatClient,
    entity: PhantomData<fn() -> E>,
}

impl<'c, E: Entity> Resource<'c, E> {
    pub(crate) fn new(client: &'c SnapchatClient) -> Self {
        Self {
            client,
            entity: PhantomData,
        }
    }

    pub(crate) fn fetch_list(
        &self,
        ctx: &Context,
        path: &str,
        context: &str,
    ) -> Result<Vec<E>, ApiError> {
        let envelope: Envelope<E> = self.client.call(ctx, HttpMethod::Get, path)?;
        envelope::extract_list(envelope, context)
    }
}

impl<E: Addressable> Resource<'_, E> {
    pub fn get(&self, ctx: &Context, id: &str) -> Result<E, ApiError> {
        let path = format!("{}/{id}", E::COLLECTION);
        let envelope: Envelope<E> = self.client.call(ctx, HttpMethod::Get, &path)?;
        envelope::extract_single(envelope, &format!("get {} with id {id}", E::LABEL))
    }
}

impl<E: Deletable> Resource<'_, E> {
    pub fn delete(&self, ctx: &Context, id: &str) -> Result<(), ApiError> {
        let path = format!("{}/{id}", E::COLLECTION);
        let envelope: Envelope<E> = self.client.call(ctx, HttpMethod::Delete, &path)?;
        envelope::extract_delete_ack(envelope, &format!("delete {} with id {id}", E::LABEL))
    }
}

impl Resource<'_, Ad> {
    pub fn list_by_ad_squad(&self, ctx: &Context, ad_squad_id: &str) -> Result<Vec<Ad>, ApiError> {
        self.fetch_list(
            ctx,
            &format!("adsquads/{ad_squad_id}/ads"),
            &format!("list ads for ad squad with id {ad_squad_id}"),
        )
    }

    pub fn list_by_ad_account(&self, ctx: &Context, ad_account_id: &str) -> Result<Vec<Ad>, ApiError> {
        self.fetch_list(
            ctx,
            &format!("adaccounts/{ad_account_id}/ads"),
            &format!("list ads for ad account with id {ad_account_id}"),
        )
    }
}

impl Resource<'_, AdSquad> {
    pub fn list_by_campaign(&self, ctx: &Context, campaign_id: &str) -> Result<Vec<AdSquad>, ApiError> {
        self.fetch_list(
            ctx,
            &format!("campaigns/{campaign_id}/adsquads"),
            &format!("list ad squads for campaign with id {campaign_id}"),
        )
    }

    pub fn list_by_ad_account(
        &self,
        ctx: &Context,
        ad_account_id: &str,
    ) -> Result<Vec<AdSquad>, ApiError> {
        self.fetch_list(
            ctx,
            &format!("adaccounts/{ad_account_id}/adsquads"),
            &format!("list ad squads for ad account with id {ad_account_id}"),
        )
    }
}

impl Resource<'_, Campaign> {
    /// Campaigns under an ad account.
    pub fn list(&self, ctx: &Context, ad_account_id: &str) -> Result<Vec<Campaign>, ApiError> {
        self.fetch_list(
            ctx,
            &format!("adaccounts/{ad_account_id}/campaigns"),
            &format!("list campaigns for ad account with id {ad_account_id}"),
        )
    }
}

impl Resource<'_, AdAccount> {
    /// Ad accounts under an organization.
    pub fn list(&self, ctx: &Context, organization_id: &str) -> Result<Vec<AdAccount>, ApiError> {
        self.fetch_list(
            ctx,
            &format!("organizations/{organization_id}/adaccounts"),
            &format!("list ad accounts for organization with id {organization_id}"),
        )
    }
}

impl Resource<'_, FundingSource> {
    /// Funding sources under an organization.
    pub fn list(&self, ctx: &Context, organization_id: &str) -> Result<Vec<FundingSource>, ApiError> {
        self.fetch_list(
            ctx,
            &format!("organizations/{organization_id}/funding-sources"),
            &format!("list funding sources for organization with id {organization_id}"),
        )
    }
}

impl Resource<'_, Organization> {
    /// Organizations the authenticated user belongs to.
    pub fn list(&self, ctx: &Context) -> Result<Vec<Organization>, ApiError> {
        self.fetch_list(ctx, "me/organizations", "list organizations for the authenticated user")
    }
}

/// Reporting endpoints.
pub struct Measurements<'c> {
    client: &'c SnapchatClient,
}

impl<'c> Measurements<'c> {
    pub(crate) fn new(client: &'c SnapchatClient) -> Self {
        Self { client }
    }

    /// Lifetime totals for an ad squad.
    ///
    /// Only the top-level status is checked; each `total_stat` entry keeps
    /// its own sub-status for the caller to inspect.
    pub fn stats_for_ad_squad(
        &self,
        ctx: &Context,
        ad_squad_id: &str,
    ) -> Result<Envelope<TotalStat>, ApiError> {
        let path = format!("adsquads/{ad_squad_id}/stats");
        let envelope: Envelope<TotalStat> = self.client.call(ctx, HttpMethod::Get, &path)?;
        envelope::ensure_success(
            envelope,
            &format!("get stats for ad squad with id {ad_squad_id}"),
        )
    }
}

#[derive(Deserialize)]
struct MeResponse {
    #[serde(default)]
    me: Option<User>,
}

pub struct Users<'c> {
    client: &'c SnapchatClient,
}

impl<'c> Users<'c> {
    pub(crate) fn new(client: &'c SnapchatClient) -> Self {
        Self { client }
    }

    /// The user the access token belongs to.
    pub fn me(&self, ctx: &Context) -> Result<User, ApiError> {
        let response: MeResponse = self.client.call(ctx, HttpMethod::Get, "me")?;
        response.me.ok_or_else(|| ApiError::NotFound {
            context: "get authenticated user".to_string(),
        })
    }
}
