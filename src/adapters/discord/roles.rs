//! Lazy role-name lookup for the admin check.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::client::DiscordClient;
use crate::ports::TransportError;

/// Resolves a member's role names, caching channel guilds and role tables.
///
/// Member role ids are fetched on every lookup; role names change rarely and
/// are cached per guild.
pub struct RoleResolver {
    client: Arc<DiscordClient>,
    guilds: Mutex<HashMap<String, Option<String>>>,
    role_names: Mutex<HashMap<String, HashMap<String, String>>>,
}

impl RoleResolver {
    pub fn new(client: Arc<DiscordClient>) -> Self {
        Self {
            client,
            guilds: Mutex::new(HashMap::new()),
            role_names: Mutex::new(HashMap::new()),
        }
    }

    /// Role names of `user_id` in the guild owning `channel_id`.
    ///
    /// Lookup failures yield no roles, so the caller is treated as a non-admin.
    pub async fn role_names(&self, channel_id: &str, user_id: &str) -> Vec<String> {
        match self.lookup(channel_id, user_id).await {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!("Failed to resolve roles for {}: {}", user_id, e);
                Vec::new()
            }
        }
    }

    async fn lookup(&self, channel_id: &str, user_id: &str) -> Result<Vec<String>, TransportError> {
        // 1. Guild of the channel (direct messages have none)
        let Some(guild_id) = self.guild_of(channel_id).await? else {
            return Ok(Vec::new());
        };

        // 2. Member role ids
        let member = self.client.member(&guild_id, user_id).await?;

        // 3. Role names
        let names = self.role_table(&guild_id).await?;
        Ok(member
            .roles
            .iter()
            .filter_map(|role_id| names.get(role_id).cloned())
            .collect())
    }

    async fn guild_of(&self, channel_id: &str) -> Result<Option<String>, TransportError> {
        if let Some(guild) = self.guilds.lock().await.get(channel_id) {
            return Ok(guild.clone());
        }
        let guild = self.client.channel(channel_id).await?.guild_id;
        self.guilds
            .lock()
            .await
            .insert(channel_id.to_string(), guild.clone());
        Ok(guild)
    }

    async fn role_table(&self, guild_id: &str) -> Result<HashMap<String, String>, TransportError> {
        if let Some(table) = self.role_names.lock().await.get(guild_id) {
            return Ok(table.clone());
        }
        let table: HashMap<String, String> = self
            .client
            .guild_roles(guild_id)
            .await?
            .into_iter()
            .map(|role| (role.id, role.name))
            .collect();
        self.role_names
            .lock()
            .await
            .insert(guild_id.to_string(), table.clone());
        Ok(table)
    }
}
