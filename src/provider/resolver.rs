//! Repository name resolution
//!
//! Short repository names are qualified with the configured organization or,
//! failing that, the authenticated account. The account lookup happens at
//! most once per resolver. Qualified names are then looked up so that
//! missing repositories are skipped and the rest are scanned under their
//! canonical `owner/name`.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::provider::traits::{ProviderClient, RepositoryResolver};

pub struct OwnerResolver {
    client: Arc<dyn ProviderClient>,
    organization: Option<String>,
    login: OnceCell<Option<String>>,
}

impl OwnerResolver {
    pub fn new(client: Arc<dyn ProviderClient>, organization: Option<String>) -> Self {
        Self {
            client,
            organization: organization
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty()),
            login: OnceCell::new(),
        }
    }

    async fn authenticated_login(&self) -> Option<String> {
        self.login
            .get_or_init(|| async {
                match self.client.fetch_authenticated_login().await {
                    Ok(login) => Some(login),
                    Err(e) => {
                        log::warn!("Could not determine authenticated user: {}", e);
                        None
                    }
                }
            })
            .await
            .clone()
    }

    /// `owner/name` for a configured name, `None` when no owner is known
    async fn qualify(&self, name: &str) -> Option<String> {
        if name.contains('/') {
            return Some(name.to_string());
        }
        if let Some(organization) = &self.organization {
            return Some(format!("{}/{}", organization, name));
        }
        self.authenticated_login()
            .await
            .map(|login| format!("{}/{}", login, name))
    }
}

#[async_trait]
impl RepositoryResolver for OwnerResolver {
    async fn resolve(&self, name: &str) -> Option<String> {
        let Some(qualified) = self.qualify(name).await else {
            log::warn!("Using unresolved repository name '{}'", name);
            return Some(name.to_string());
        };

        match self.client.fetch_repository_name(&qualified).await {
            Ok(Some(canonical)) => Some(canonical),
            Ok(None) => {
                log::warn!("Repository {} not found, skipping", qualified);
                None
            }
            Err(e) => {
                log::warn!("Could not look up repository {}: {}", qualified, e);
                Some(qualified)
            }
        }
    }
}
