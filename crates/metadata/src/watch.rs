//! Streaming availability: TMDB watch/providers responses folded into a
//! per-country offer table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{TitleCard, TitleKind};

const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

/// Where a title can be streamed, rented or bought, per country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchInfo {
    pub title: String,
    pub year: Option<i32>,
    #[serde(rename = "type")]
    pub kind: TitleKind,
    pub all_country_offers: BTreeMap<String, CountryOffers>,
    pub available_countries: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryOffers {
    pub link: Option<String>,
    pub flatrate: Vec<WatchOffer>,
    pub rent: Vec<WatchOffer>,
    pub buy: Vec<WatchOffer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchOffer {
    pub name: String,
    pub icon: Option<String>,
}

fn offers_at(country: &serde_json::Value, kind: &str) -> Vec<WatchOffer> {
    country[kind]
        .as_array()
        .map(|offers| {
            offers
                .iter()
                .filter_map(|o| {
                    let name = o["provider_name"].as_str()?;
                    Some(WatchOffer {
                        name: name.to_string(),
                        icon: o["logo_path"]
                            .as_str()
                            .map(|p| format!("{IMAGE_BASE}/w92{p}")),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Fold a raw watch/providers response into the offer table. Countries with
/// no offers in any category are dropped.
pub fn parse_watch_info(card: &TitleCard, data: &serde_json::Value) -> WatchInfo {
    let mut all_country_offers = BTreeMap::new();

    if let Some(results) = data["results"].as_object() {
        for (country, entry) in results {
            let offers = CountryOffers {
                link: entry["link"].as_str().map(|s| s.to_string()),
                flatrate: offers_at(entry, "flatrate"),
                rent: offers_at(entry, "rent"),
                buy: offers_at(entry, "buy"),
            };
            if offers.flatrate.is_empty() && offers.rent.is_empty() && offers.buy.is_empty() {
                continue;
            }
            all_country_offers.insert(country.clone(), offers);
        }
    }

    let available_countries = all_country_offers.keys().cloned().collect();

    WatchInfo {
        title: card.title.clone(),
        year: card.year,
        kind: card.kind,
        all_country_offers,
        available_countries,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
