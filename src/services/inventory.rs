// src/services/inventory.rs

//! Inventory API client.
//!
//! The client is only obtainable through [`InventoryApi::sign_in`], so every
//! value of this type is already authenticated and carries its bearer token
//! into each call.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{ApiConfig, Credentials, Product};
use crate::services::InventoryWriter;
use crate::utils::http;

/// User-Agent string for API requests.
const USER_AGENT: &str = concat!("stocksync/", env!("CARGO_PKG_VERSION"));

/// Response body of `POST auth/sign-in`.
#[derive(Debug, Deserialize)]
struct SignInResponse {
    #[serde(rename = "userToken")]
    user_token: UserToken,
}

#[derive(Debug, Deserialize)]
struct UserToken {
    token: String,
}

/// Response body of `GET products`.
#[derive(Debug, Deserialize)]
struct ProductListResponse {
    items: Vec<Product>,
}

/// Authenticated client for the inventory API.
pub struct InventoryApi {
    client: Client,
    base_url: Url,
    token: String,
}

impl InventoryApi {
    /// Sign in and return an authenticated client.
    ///
    /// Any failure here is fatal to the run; nothing is scraped before
    /// authentication succeeds.
    pub async fn sign_in(config: &ApiConfig, credentials: &Credentials) -> Result<Self> {
        let client = http::create_client(USER_AGENT, config.timeout_secs)?;
        let base_url = Url::parse(&config.base_url)?;

        let response = client
            .post(base_url.join("auth/sign-in")?)
            .json(&json!({
                "email": credentials.email,
                "password": credentials.password,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::auth(format!("sign-in returned HTTP {status}")));
        }

        let body: SignInResponse = response
            .json()
            .await
            .map_err(|e| AppError::auth(format!("malformed sign-in response: {e}")))?;

        if body.user_token.token.is_empty() {
            return Err(AppError::auth("no token received"));
        }

        Ok(Self {
            client,
            base_url,
            token: body.user_token.token,
        })
    }

    /// Fetch the full product set.
    pub async fn fetch_products(&self) -> Result<Vec<Product>> {
        let response = self
            .client
            .get(self.base_url.join("products")?)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::api("fetch products", format!("HTTP {status}")));
        }

        let body: ProductListResponse = response.json().await?;
        Ok(body.items)
    }
}

#[async_trait]
impl InventoryWriter for InventoryApi {
    async fn update_product(&self, product: &Product) -> Result<()> {
        let url = self.base_url.join(&format!("products/{}", product.id))?;
        let response = self
            .client
            .put(url)
            .bearer_auth(&self.token)
            .json(product)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::api(
                format!("update product {}", product.id),
                format!("HTTP {status}"),
            ));
        }
        Ok(())
    }
}
