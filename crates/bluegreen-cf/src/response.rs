//! Decoders for `cf curl` responses from the v2 platform API.

use serde::Deserialize;

use crate::{CfError, Result};

#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    resources: Vec<Resource<T>>,
}

#[derive(Debug, Deserialize)]
struct Resource<T> {
    #[serde(default)]
    metadata: Option<Metadata>,
    entity: T,
}

#[derive(Debug, Deserialize)]
struct Metadata {
    guid: String,
}

#[derive(Debug, Deserialize)]
struct AppEntity {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RouteEntity {
    #[serde(default)]
    domain: Option<DomainResource>,
}

#[derive(Debug, Deserialize)]
struct DomainResource {
    entity: DomainEntity,
}

#[derive(Debug, Deserialize)]
struct DomainEntity {
    name: String,
}

/// Read `total_results` from a paginated list response.
///
/// # Errors
///
/// Returns [`CfError::Json`] for malformed JSON, [`CfError::MissingTotalResults`]
/// when the key is absent and [`CfError::InvalidTotalResults`] when it is not a
/// non-negative integer.
pub fn parse_total_results(json: &str) -> Result<u64> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let total = value
        .get("total_results")
        .ok_or(CfError::MissingTotalResults)?;

    total.as_u64().ok_or_else(|| CfError::InvalidTotalResults {
        value: total.to_string(),
    })
}

/// Find the guid of the application named `name` in an app list response.
///
/// # Errors
///
/// Returns [`CfError::AppNotFound`] if no listed application has that name.
pub fn parse_app_guid(json: &str, name: &str) -> Result<String> {
    let page: Page<AppEntity> = serde_json::from_str(json)?;

    page.resources
        .into_iter()
        .find(|resource| resource.entity.name == name)
        .and_then(|resource| resource.metadata)
        .map(|metadata| metadata.guid)
        .ok_or_else(|| CfError::AppNotFound {
            name: name.to_string(),
        })
}

/// Domain name of the first route in a route list fetched with
/// `inline-relations-depth=1`.
///
/// # Errors
///
/// Returns [`CfError::NoRoutes`] when the list is empty or the first route
/// has no inlined domain.
pub fn parse_first_route_domain(json: &str, app: &str) -> Result<String> {
    let page: Page<RouteEntity> = serde_json::from_str(json)?;

    page.resources
        .into_iter()
        .next()
        .and_then(|route| route.entity.domain)
        .map(|domain| domain.entity.name)
        .ok_or_else(|| CfError::NoRoutes {
            app: app.to_string(),
        })
}
