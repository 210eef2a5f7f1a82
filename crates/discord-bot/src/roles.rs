//! Guild role upkeep: the title role follows the leaderboard leader, and
//! achievements may carry a reward role.

use eyre::Result;
use futures_util::StreamExt;
use ppbot_db::SizeRepository;
use serenity::http::Http;
use serenity::model::id::{GuildId, RoleId, UserId};
use tracing::{debug, info, warn};

use crate::handlers::HandlerContext;

async fn find_role(http: &Http, guild_id: GuildId, name: &str) -> Result<Option<RoleId>> {
    let roles = guild_id.roles(http).await?;
    Ok(roles
        .into_iter()
        .find(|(_, role)| role.name == name)
        .map(|(id, _)| id))
}

/// Role changes that move the title to `leader`.
#[derive(Debug, Default, PartialEq, Eq)]
struct TitleMoves {
    remove_from: Vec<UserId>,
    give_leader: bool,
}

fn plan_title_moves(leader: UserId, leader_has_role: bool, holders: &[UserId]) -> TitleMoves {
    TitleMoves {
        remove_from: holders.iter().copied().filter(|holder| *holder != leader).collect(),
        give_leader: !leader_has_role,
    }
}

/// Moves the title role to whoever tops the leaderboard. Missing roles and
/// permission problems are logged and skipped. Nothing changes while the
/// board is empty or the leader is not in this guild.
pub async fn sync_title_role(handler_ctx: &HandlerContext, guild_id: GuildId) -> Result<()> {
    let http = &handler_ctx.ctx.http;
    let role_name = handler_ctx.config.title_role_name();

    let Some(role_id) = find_role(http, guild_id, role_name).await? else {
        warn!("Title role '{}' not found in guild {}", role_name, guild_id);
        return Ok(());
    };

    let Some(leader) = handler_ctx.store().top_sizes(1).await?.first().map(|entry| UserId(entry.user_id)) else {
        return Ok(());
    };

    let mut leader_member = match guild_id.member(&handler_ctx.ctx, leader).await {
        Ok(member) => member,
        Err(e) => {
            debug!("Leader {} is not a member of guild {}: {:?}", leader, guild_id, e);
            return Ok(());
        }
    };

    // Walks every page of the member list.
    let mut holders = Vec::new();
    let mut members = guild_id.members_iter(http).boxed();
    while let Some(member) = members.next().await {
        let member = member?;
        if member.roles.contains(&role_id) {
            holders.push(member);
        }
    }

    let holder_ids: Vec<UserId> = holders.iter().map(|member| member.user.id).collect();
    let moves = plan_title_moves(leader, leader_member.roles.contains(&role_id), &holder_ids);
    for mut holder in holders.into_iter().filter(|member| moves.remove_from.contains(&member.user.id)) {
        match holder.remove_role(http, role_id).await {
            Ok(()) => info!("Removed title role from {}", holder.user.id),
            Err(e) => warn!("Could not remove title role from {}: {:?}", holder.user.id, e),
        }
    }
    if moves.give_leader {
        match leader_member.add_role(http, role_id).await {
            Ok(()) => info!("Gave title role to {}", leader),
            Err(e) => warn!("Could not give title role to {}: {:?}", leader, e),
        }
    }

    Ok(())
}

/// Gives `user_id` the role called `role_name`. Returns false when the role
/// does not exist or could not be assigned.
pub async fn grant_role_by_name(
    handler_ctx: &HandlerContext,
    guild_id: GuildId,
    user_id: u64,
    role_name: &str,
) -> Result<bool> {
    let http = &handler_ctx.ctx.http;
    let Some(role_id) = find_role(http, guild_id, role_name).await? else {
        warn!("Reward role '{}' not found in guild {}", role_name, guild_id);
        return Ok(false);
    };

    let mut member = guild_id.member(&handler_ctx.ctx, UserId(user_id)).await?;
    if member.roles.contains(&role_id) {
        return Ok(true);
    }
    match member.add_role(http, role_id).await {
        Ok(()) => {
            info!("Gave reward role '{}' to {}", role_name, user_id);
            Ok(true)
        }
        Err(e) => {
            warn!("Could not give reward role '{}' to {}: {:?}", role_name, user_id, e);
            Ok(false)
        }
    }
}
