//! Microsoft Graph client for group membership lookups

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::auth::{AuthManager, ClientCredentials};
use super::models::{GraphPage, GroupRef, MemberRecord};
use super::query::{ODataQuery, display_name_filter};
use super::transport::{GraphTransport, ReqwestTransport};
use crate::config::{DirectoryConfig, Secret};
use crate::error::UpstreamRequestError;
use crate::services::DirectorySource;
use crate::services::reconcile::DirectoryMemberSet;

/// Reads group membership from Microsoft Graph
pub struct GraphClient {
    transport: Box<dyn GraphTransport>,
    auth: AuthManager,
    base_url: String,
    member_attribute: String,
    page_size: Option<u32>,
}

impl GraphClient {
    /// Client backed by reqwest, configured from the directory settings
    pub fn from_config(config: &DirectoryConfig) -> Result<Self, UpstreamRequestError> {
        let transport = ReqwestTransport::new(&config.resilience)?;
        Ok(Self::with_transport(config, Box::new(transport)))
    }

    pub fn with_transport(config: &DirectoryConfig, transport: Box<dyn GraphTransport>) -> Self {
        Self {
            transport,
            auth: AuthManager::new(ClientCredentials::from_config(config)),
            base_url: config.graph_base_url.trim_end_matches('/').to_string(),
            member_attribute: config.member_attribute.clone(),
            page_size: config.page_size,
        }
    }

    async fn token(&self) -> Result<Secret, UpstreamRequestError> {
        self.auth.access_token(self.transport.as_ref()).await
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<GraphPage<T>, UpstreamRequestError> {
        let token = self.token().await?;
        let body: Value = self.transport.get_json(url, token.expose()).await?;
        serde_json::from_value(body).map_err(|e| UpstreamRequestError::InvalidResponse {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    /// Resolve a display name to exactly one group id.
    ///
    /// The match is exact and case-sensitive. Zero matches and more than one
    /// match are both errors.
    pub async fn get_group_id(&self, group_name: &str) -> Result<String, UpstreamRequestError> {
        log::info!("Fetching group ID for '{}'", group_name);

        let url = ODataQuery::new("groups")
            .filter(display_name_filter(group_name))
            .select(&["id"])
            .to_url(&self.base_url);

        let page: GraphPage<GroupRef> = self.get_page(&url).await?;

        match page.value.as_slice() {
            [] => {
                log::error!("Group '{}' not found", group_name);
                Err(UpstreamRequestError::GroupNotFound(group_name.to_string()))
            }
            [group] => {
                log::info!("Resolved group '{}' to {}", group_name, group.id);
                Ok(group.id.clone())
            }
            groups => Err(UpstreamRequestError::AmbiguousGroup {
                name: group_name.to_string(),
                count: groups.len(),
            }),
        }
    }

    /// Fetch every member record of a group, following `@odata.nextLink`
    pub async fn get_group_members(
        &self,
        group_id: &str,
    ) -> Result<Vec<MemberRecord>, UpstreamRequestError> {
        log::info!("Fetching members for group ID: {}", group_id);

        let first_url = ODataQuery::new(format!("groups/{}/members", group_id))
            .select(&[self.member_attribute.as_str()])
            .top(self.page_size)
            .to_url(&self.base_url);

        let mut members = Vec::new();
        let mut next_link = Some(first_url);
        let mut page_number = 0;

        while let Some(url) = next_link {
            page_number += 1;
            let page: GraphPage<MemberRecord> = self.get_page(&url).await?;
            log::debug!("Page {} returned {} members", page_number, page.value.len());
            members.extend(page.value);
            next_link = page.next_link;
        }

        log::info!(
            "Total members fetched: {} across {} pages",
            members.len(),
            page_number
        );
        Ok(members)
    }

    /// Normalized identifiers of the members exposing the identifier attribute
    pub fn extract_identifiers(&self, members: &[MemberRecord]) -> DirectoryMemberSet {
        let mut set = DirectoryMemberSet::new();
        let mut skipped = 0;

        for member in members {
            match member.attribute(&self.member_attribute) {
                Some(name) => {
                    set.insert_raw(name);
                }
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            log::debug!(
                "Skipped {} members without {}",
                skipped,
                self.member_attribute
            );
        }
        log::info!(
            "Valid members with {}: {}",
            self.member_attribute,
            set.len()
        );
        set
    }
}

#[async_trait]
impl DirectorySource for GraphClient {
    async fn fetch_group_members(
        &self,
        group_name: &str,
    ) -> Result<DirectoryMemberSet, UpstreamRequestError> {
        let group_id = self.get_group_id(group_name).await?;
        let members = self.get_group_members(&group_id).await?;
        Ok(self.extract_identifiers(&members))
    }
}
