//! Entities returned by the Snapchat Ads API.
//!
//! # Design
//! Flat records mirroring the upstream JSON. Every field falls back to its
//! default when absent or `null`, because the API omits fields that do not
//! apply to an entity's type (a coupon funding source has no card number, a draft
//! campaign has no end time). Entities hold no reference back to the client.

use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::ser::Error as SerError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::resource::{Addressable, Deletable, Entity};

/// RFC 3339 timestamp as sent by the API, e.g. `2024-03-01T17:04:05.123Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(OffsetDateTime);

impl Timestamp {
    pub fn parse(input: &str) -> Result<Self, time::error::Parse> {
        OffsetDateTime::parse(input, &Rfc3339).map(Self)
    }

    pub fn into_inner(self) -> OffsetDateTime {
        self.0
    }

    pub fn format_rfc3339(self) -> Result<String, time::error::Format> {
        self.0.format(&Rfc3339)
    }
}

impl From<OffsetDateTime> for Timestamp {
    fn from(value: OffsetDateTime) -> Self {
        Self(value)
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let formatted = self.format_rfc3339().map_err(|_| std::fmt::Error)?;
        f.write_str(&formatted)
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = self.format_rfc3339().map_err(S::Error::custom)?;
        serializer.serialize_str(&formatted)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

/// Treat an explicit `null` like a missing field.
///
/// The API sends `null` for values that do not apply to an entity; those
/// fields take their default instead of failing the whole response.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ad {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ad_squad_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub creative_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// `ACTIVE` or `PAUSED`.
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub review_status: String,
    /// Populated when the review rejected the ad.
    #[serde(deserialize_with = "null_as_default")]
    pub review_status_reason: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdSquad {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub campaign_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    /// Max bid in micro-currency.
    #[serde(deserialize_with = "null_as_default")]
    pub bid_micro: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub billing_event: String,
    #[serde(deserialize_with = "null_as_default")]
    pub daily_budget_micro: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub lifetime_budget_micro: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub optimization_goal: String,
    #[serde(deserialize_with = "null_as_default")]
    pub placement: String,
    #[serde(deserialize_with = "null_as_default")]
    pub included_content_types: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub excluded_content_types: Vec<String>,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Campaign {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ad_account_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub measurement_spec: CampaignMeasurementSpec,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
    #[serde(deserialize_with = "null_as_default")]
    pub daily_budget_micro: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub lifetime_spend_cap_micro: i64,
}

/// Apps tracked for a campaign.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignMeasurementSpec {
    #[serde(deserialize_with = "null_as_default")]
    pub ios_app_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub android_app_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdAccount {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub organization_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub timezone: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub lifetime_spend_cap_micro: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub advertiser_organization_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub advertiser: String,
    #[serde(deserialize_with = "null_as_default")]
    pub currency: String,
    #[serde(deserialize_with = "null_as_default")]
    pub funding_source_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Organization {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub address_line_1: String,
    #[serde(deserialize_with = "null_as_default")]
    pub locality: String,
    #[serde(deserialize_with = "null_as_default")]
    pub administrative_district_level_1: String,
    #[serde(deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(deserialize_with = "null_as_default")]
    pub postal_code: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

/// A credit card, line of credit, or coupon. Which fields are populated
/// depends on `kind`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FundingSource {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub currency: String,
    #[serde(deserialize_with = "null_as_default")]
    pub budget_spent_micro: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_budget_micro: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub available_credit_micro: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub card_type: String,
    #[serde(rename = "last_4", deserialize_with = "null_as_default")]
    pub last4: String,
    #[serde(deserialize_with = "null_as_default")]
    pub expiration_year: String,
    #[serde(deserialize_with = "null_as_default")]
    pub expiration_month: String,
    #[serde(deserialize_with = "null_as_default")]
    pub daily_spend_limit_micro: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub daily_spend_limit_currency: String,
    /// Coupon value in micro-currency.
    #[serde(deserialize_with = "null_as_default")]
    pub value_micro: i64,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

/// The authenticated user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub organization_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub display_name: String,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

/// Lifetime totals for one entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TotalStat {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub granularity: String,
    #[serde(deserialize_with = "null_as_default")]
    pub stats: MeasurementStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementStats {
    #[serde(deserialize_with = "null_as_default")]
    pub impressions: i64,
    /// Swipe-ups.
    #[serde(deserialize_with = "null_as_default")]
    pub swipes: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub spend: i64,
    #[serde(rename = "quartile_1", deserialize_with = "null_as_default")]
    pub first_quartile: i64,
    #[serde(rename = "quartile_2", deserialize_with = "null_as_default")]
    pub second_quartile: i64,
    #[serde(rename = "quartile_3", deserialize_with = "null_as_default")]
    pub third_quartile: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub screen_time_millis: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub view_completion: i64,
    /// Impressions with at least two seconds of watch time or a swipe-up.
    #[serde(deserialize_with = "null_as_default")]
    pub video_views: i64,
}

impl Entity for Ad {
    const PLURAL_KEY: &'static str = "ads";
    const SINGULAR_KEY: &'static str = "ad";
    const LABEL: &'static str = "ad";
}

impl Addressable for Ad {
    const COLLECTION: &'static str = "ads";
}

impl Deletable for Ad {}

impl Entity for AdSquad {
    const PLURAL_KEY: &'static str = "adsquads";
    const SINGULAR_KEY: &'static str = "adsquad";
    const LABEL: &'static str = "ad squad";
}

impl Addressable for AdSquad {
    const COLLECTION: &'static str = "adsquads";
}

impl Deletable for AdSquad {}

impl Entity for Campaign {
    const PLURAL_KEY: &'static str = "campaigns";
    const SINGULAR_KEY: &'static str = "campaign";
    const LABEL: &'static str = "campaign";
}

impl Addressable for Campaign {
    const COLLECTION: &'static str = "campaigns";
}

impl Deletable for Campaign {}

impl Entity for AdAccount {
    const PLURAL_KEY: &'static str = "adaccounts";
    const SINGULAR_KEY: &'static str = "adaccount";
    const LABEL: &'static str = "ad account";
}

impl Addressable for AdAccount {
    const COLLECTION: &'static str = "adaccounts";
}

impl Entity for Organization {
    const PLURAL_KEY: &'static str = "organizations";
    const SINGULAR_KEY: &'static str = "organization";
    const LABEL: &'static str = "organization";
}

impl Addressable for Organization {
    const COLLECTION: &'static str = "organizations";
}

impl Entity for FundingSource {
    const PLURAL_KEY: &'static str = "fundingsources";
    const SINGULAR_KEY: &'static str = "fundingsource";
    const LABEL: &'static str = "funding source";
}

impl Addressable for FundingSource {
    const COLLECTION: &'static str = "fundingsources";
}

impl Entity for TotalStat {
    const PLURAL_KEY: &'static str = "total_stats";
    const SINGULAR_KEY: &'static str = "total_stat";
    const LABEL: &'static str = "total stat";
}
