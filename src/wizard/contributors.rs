//! Contributor management for the Authors section

use super::Wizard;
use super::events::track;
use super::messages::{Message, keys};
use crate::error::{Error, Result};
use crate::store::load_all;
use crate::types::{Contributor, NewContributor, User};
use tracing::debug;

impl Wizard<'_> {
    fn container_id(&self) -> Result<String> {
        self.container
            .as_ref()
            .map(|c| c.id.clone())
            .ok_or_else(|| Error::InvalidTransition("no project bound".to_string()))
    }

    /// Load every contributor of the container
    pub async fn load_contributors(&mut self) -> Result<&[Contributor]> {
        let container_id = self.container_id()?;
        let store = self.store;
        let id: &str = &container_id;
        match load_all(move |page| store.container_contributors(id, page)).await {
            Ok(contributors) => {
                debug!(container = %container_id, count = contributors.len(), "contributors loaded");
                self.contributors = contributors;
                Ok(&self.contributors)
            }
            Err(e) => {
                self.notifier
                    .error(&Message::new(keys::ERROR_LOADING_CONTRIBUTORS))
                    .await;
                Err(e)
            }
        }
    }

    /// Load every contributor of the parent container, if there is one
    pub async fn load_parent_contributors(&mut self) -> Result<&[Contributor]> {
        let Some(parent_id) = self.parent_container.as_ref().map(|c| c.id.clone()) else {
            self.parent_contributors.clear();
            return Ok(&self.parent_contributors);
        };
        let store = self.store;
        let id: &str = &parent_id;
        self.parent_contributors =
            load_all(move |page| store.container_contributors(id, page)).await?;
        Ok(&self.parent_contributors)
    }

    /// Search users by any name field
    pub async fn search_contributors(&mut self, query: &str, page: u32) -> Result<&[User]> {
        track(
            "button",
            "click",
            &format!("{} - Search for Authors", self.mode_label()),
        );
        match self.store.search_users(query, page).await {
            Ok(results) => {
                self.search_results = results.items;
                Ok(&self.search_results)
            }
            Err(e) => {
                self.notifier
                    .error(&Message::new(keys::SEARCH_CONTRIBUTORS_ERROR))
                    .await;
                Err(e)
            }
        }
    }

    /// Add a registered user or an invited person to the container
    pub async fn add_contributor(&mut self, contributor: &NewContributor) -> Result<()> {
        let container_id = self.container_id()?;
        match self.store.add_contributor(&container_id, contributor).await {
            Ok(added) => {
                debug!(contributor = %added.id, "contributor added");
                self.contributors.push(added);
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .error(&Message::new(keys::ERROR_ADDING_CONTRIBUTOR))
                    .await;
                Err(e)
            }
        }
    }

    /// Invite someone by name and email
    pub async fn add_unregistered_contributor(&mut self, full_name: &str, email: &str) -> Result<()> {
        self.add_contributor(&NewContributor::Unregistered {
            full_name: full_name.trim().to_string(),
            email: email.trim().to_string(),
        })
        .await
    }

    /// Remove a contributor from the container
    pub async fn remove_contributor(&mut self, contributor_id: &str) -> Result<()> {
        let container_id = self.container_id()?;
        match self
            .store
            .remove_contributor(&container_id, contributor_id)
            .await
        {
            Ok(()) => {
                self.contributors.retain(|c| c.id != contributor_id);
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .error(&Message::new(keys::ERROR_REMOVING_CONTRIBUTOR))
                    .await;
                Err(e)
            }
        }
    }
}
