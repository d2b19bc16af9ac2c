//! Wildberries card API adapter.
//!
//! Fetches live size/price/stock state for one article through the public
//! card detail endpoint. The upstream discriminates on request headers, so
//! every request carries a browser-like user agent, a per-article referer,
//! and an accept-language header.

use async_trait::async_trait;
use reqwest::header;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::config::CatalogConfig;
use crate::domain::{ArticleId, Price, ProductSnapshot, SizeOffer, StockState};
use crate::error::CatalogError;
use crate::port::Catalog;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36";
const ACCEPT_LANGUAGE: &str = "ru-RU,ru;q=0.9,en;q=0.8";

/// Fixed query parameters of the card detail endpoint.
const CARD_QUERY: &str = "appType=1&curr=byn&dest=-8144334&spp=30";

/// Catalog implementation over the Wildberries card API.
pub struct WbCatalog {
    client: reqwest::Client,
    api_url: String,
}

impl WbCatalog {
    /// Build a catalog client from configuration.
    ///
    /// # Errors
    ///
    /// [`CatalogError::Transport`] when the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(CatalogError::Transport)?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
        })
    }
}

#[async_trait]
impl Catalog for WbCatalog {
    async fn fetch(&self, article: &ArticleId) -> Result<ProductSnapshot, CatalogError> {
        let url = format!("{}?{}&nm={}", self.api_url, CARD_QUERY, article);
        let referer = format!("https://www.wildberries.by/catalog/{article}/detail.aspx");

        debug!(article = %article, "Fetching product card");

        let response = self
            .client
            .get(&url)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::REFERER, referer)
            .header(header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE)
            .send()
            .await
            .map_err(CatalogError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(CatalogError::Transport)?;
        decode_card(&body, article)
    }
}

/// Decode a card API payload into a product snapshot.
///
/// An empty product list is [`CatalogError::NotFound`], not a decode error.
pub(crate) fn decode_card(
    body: &str,
    article: &ArticleId,
) -> Result<ProductSnapshot, CatalogError> {
    let payload: CardResponse = serde_json::from_str(body).map_err(|e| CatalogError::Decode {
        reason: e.to_string(),
    })?;

    let Some(product) = payload.products.into_iter().next() else {
        return Err(CatalogError::NotFound {
            article: article.to_string(),
        });
    };

    Ok(product.into_snapshot())
}

#[derive(Debug, Deserialize)]
struct CardResponse {
    #[serde(default)]
    products: Vec<ProductDto>,
}

#[derive(Debug, Deserialize)]
struct ProductDto {
    name: String,
    #[serde(default)]
    sizes: Vec<SizeDto>,
    #[serde(default)]
    colors: Vec<ColorDto>,
}

impl ProductDto {
    fn into_snapshot(self) -> ProductSnapshot {
        // The storefront shows the color as part of the product name.
        let name = match self.colors.first() {
            Some(color) if !color.name.is_empty() => format!("{} {}", self.name, color.name),
            _ => self.name,
        };

        let sizes = self
            .sizes
            .into_iter()
            .map(|size| {
                // In stock only when there is physical stock and a price.
                let state = match (&size.price, size.stocks.is_empty()) {
                    (Some(price), false) => StockState::InStock(price.total()),
                    _ => StockState::OutOfStock,
                };
                SizeOffer {
                    name: size.name,
                    state,
                }
            })
            .collect();

        ProductSnapshot { name, sizes }
    }
}

#[derive(Debug, Deserialize)]
struct ColorDto {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct SizeDto {
    name: String,
    #[serde(default)]
    stocks: Vec<serde_json::Value>,
    price: Option<PriceDto>,
}

/// Price pair in minor units (cents).
#[derive(Debug, Deserialize)]
struct PriceDto {
    #[serde(default)]
    product: i64,
    #[serde(default)]
    logistics: i64,
}

impl PriceDto {
    /// Total price scaled from minor to major units, exactly.
    fn total(&self) -> Price {
        Decimal::from(self.product + self.logistics) / Decimal::from(100)
    }
}
