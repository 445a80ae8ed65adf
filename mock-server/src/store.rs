//! In-memory data behind the mock API.
//!
//! Records are the mock's own schema, serialized in the wire shape the
//! client expects. Relationships are plain parent-id fields.

use std::collections::HashMap;

use serde::Serialize;

/// A row that can be wrapped in a sub-envelope.
pub trait Record: Serialize + Clone {
    const PLURAL: &'static str;
    const SINGULAR: &'static str;

    fn id(&self) -> &str;
}

#[derive(Clone, Debug, Serialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub organization_id: String,
    pub display_name: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub country: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct AdAccount {
    pub id: String,
    pub name: String,
    pub organization_id: String,
    pub timezone: String,
    pub currency: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub funding_source_ids: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct FundingSource {
    pub id: String,
    pub organization_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    pub currency: String,
    pub card_type: Option<String>,
    pub last_4: Option<String>,
    pub value_micro: Option<i64>,
    pub created_at: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Campaign {
    pub id: String,
    pub ad_account_id: String,
    pub name: String,
    pub status: String,
    pub daily_budget_micro: i64,
    pub start_time: String,
    pub created_at: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct AdSquad {
    pub id: String,
    pub campaign_id: String,
    pub name: String,
    pub status: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub bid_micro: i64,
    pub placement: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Ad {
    pub id: String,
    pub ad_squad_id: String,
    pub creative_id: String,
    pub name: String,
    pub status: String,
    pub review_status: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: String,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct Stats {
    pub impressions: i64,
    pub swipes: i64,
    pub spend: i64,
    pub quartile_1: i64,
    pub quartile_2: i64,
    pub quartile_3: i64,
    pub view_completion: i64,
    pub video_views: i64,
}

macro_rules! record {
    ($ty:ty, $plural:literal, $singular:literal) => {
        impl Record for $ty {
            const PLURAL: &'static str = $plural;
            const SINGULAR: &'static str = $singular;

            fn id(&self) -> &str {
                &self.id
            }
        }
    };
}

record!(Organization, "organizations", "organization");
record!(AdAccount, "adaccounts", "adaccount");
record!(FundingSource, "fundingsources", "fundingsource");
record!(Campaign, "campaigns", "campaign");
record!(AdSquad, "adsquads", "adsquad");
record!(Ad, "ads", "ad");

#[derive(Clone, Debug)]
pub struct Store {
    pub user: User,
    pub organizations: Vec<Organization>,
    pub ad_accounts: Vec<AdAccount>,
    pub funding_sources: Vec<FundingSource>,
    pub campaigns: Vec<Campaign>,
    pub ad_squads: Vec<AdSquad>,
    pub ads: Vec<Ad>,
    /// Lifetime totals per ad squad id.
    pub stats: HashMap<String, Stats>,
    /// Ids whose sub-request reports a failure, with the reason.
    pub failures: HashMap<String, String>,
}

impl Store {
    pub fn failure(&self, id: &str) -> Option<&str> {
        self.failures.get(id).map(String::as_str)
    }

    pub fn ad_squads_for_account(&self, ad_account_id: &str) -> Vec<AdSquad> {
        self.ad_squads
            .iter()
            .filter(|squad| {
                self.campaigns
                    .iter()
                    .any(|c| c.id == squad.campaign_id && c.ad_account_id == ad_account_id)
            })
            .cloned()
            .collect()
    }

    pub fn ads_for_account(&self, ad_account_id: &str) -> Vec<Ad> {
        let squads = self.ad_squads_for_account(ad_account_id);
        self.ads
            .iter()
            .filter(|ad| squads.iter().any(|s| s.id == ad.ad_squad_id))
            .cloned()
            .collect()
    }

    /// Fixed data set used by `app()`.
    ///
    /// ```text
    /// org-1 ── acct-1 ── camp-1 ── sq-1 ── ad-1, ad-2 (failed sub-request)
    ///       │         └─ camp-2 ── sq-2 ── ad-3
    ///       ├─ acct-2 (no campaigns)
    ///       └─ fs-1 (card), fs-2 (coupon)
    /// org-2 (no ad accounts, no funding sources)
    /// ```
    pub fn seeded() -> Self {
        let created = "2024-01-15T09:30:00.000Z".to_string();
        let org = |id: &str, name: &str| Organization {
            id: id.into(),
            name: name.into(),
            country: "US".into(),
            kind: "ENTERPRISE".into(),
            created_at: created.clone(),
            updated_at: created.clone(),
        };
        let account = |id: &str, name: &str, funding: &[&str]| AdAccount {
            id: id.into(),
            name: name.into(),
            organization_id: "org-1".into(),
            timezone: "America/Los_Angeles".into(),
            currency: "USD".into(),
            kind: "PARTNER".into(),
            funding_source_ids: funding.iter().map(|f| f.to_string()).collect(),
        };
        let campaign = |id: &str, name: &str, status: &str| Campaign {
            id: id.into(),
            ad_account_id: "acct-1".into(),
            name: name.into(),
            status: status.into(),
            daily_budget_micro: 50_000_000,
            start_time: created.clone(),
            created_at: created.clone(),
        };
        let squad = |id: &str, campaign_id: &str, name: &str| AdSquad {
            id: id.into(),
            campaign_id: campaign_id.into(),
            name: name.into(),
            status: "ACTIVE".into(),
            kind: "SNAP_ADS".into(),
            bid_micro: 1_500_000,
            placement: "SNAP_ADS".into(),
        };
        let ad = |id: &str, ad_squad_id: &str, name: &str, review: &str| Ad {
            id: id.into(),
            ad_squad_id: ad_squad_id.into(),
            creative_id: format!("creative-{id}"),
            name: name.into(),
            status: "ACTIVE".into(),
            review_status: review.into(),
            kind: "SNAP_AD".into(),
            created_at: created.clone(),
        };

        Self {
            user: User {
                id: "user-1".into(),
                email: "owner@example.test".into(),
                organization_id: "org-1".into(),
                display_name: "Mock Owner".into(),
                created_at: created.clone(),
                updated_at: created.clone(),
            },
            organizations: vec![org("org-1", "Acme Media"), org("org-2", "Dormant Org")],
            ad_accounts: vec![
                account("acct-1", "Acme Main", &["fs-1", "fs-2"]),
                account("acct-2", "Acme Sandbox", &[]),
            ],
            funding_sources: vec![
                FundingSource {
                    id: "fs-1".into(),
                    organization_id: "org-1".into(),
                    kind: "CREDIT_CARD".into(),
                    status: "ACTIVE".into(),
                    currency: "USD".into(),
                    card_type: Some("VISA".into()),
                    last_4: Some("4242".into()),
                    value_micro: None,
                    created_at: created.clone(),
                },
                FundingSource {
                    id: "fs-2".into(),
                    organization_id: "org-1".into(),
                    kind: "COUPON".into(),
                    status: "ACTIVE".into(),
                    currency: "USD".into(),
                    card_type: None,
                    last_4: None,
                    value_micro: Some(100_000_000),
                    created_at: created.clone(),
                },
            ],
            campaigns: vec![
                campaign("camp-1", "Spring Launch", "ACTIVE"),
                campaign("camp-2", "Evergreen", "PAUSED"),
            ],
            ad_squads: vec![
                squad("sq-1", "camp-1", "Launch US 18-24"),
                squad("sq-2", "camp-2", "Evergreen Broad"),
            ],
            ads: vec![
                ad("ad-1", "sq-1", "Launch Teaser", "APPROVED"),
                ad("ad-2", "sq-1", "Launch Cutdown", "REJECTED"),
                ad("ad-3", "sq-2", "Evergreen Loop", "APPROVED"),
            ],
            stats: HashMap::from([(
                "sq-1".to_string(),
                Stats {
                    impressions: 12_000,
                    swipes: 340,
                    spend: 84_500_000,
                    quartile_1: 9_100,
                    quartile_2: 6_400,
                    quartile_3: 4_200,
                    view_completion: 3_050,
                    video_views: 7_800,
                },
            )]),
            failures: HashMap::from([(
                "ad-2".to_string(),
                "creative failed review".to_string(),
            )]),
        }
    }
}
