//! Announcement command handlers.

use std::sync::Arc;

use tabled::Tabled;

use schoolhub_core::{
    Announcement, CreateAnnouncementRequest, EntityId, Extra, Portal, UpdateAnnouncementRequest,
};

use crate::cli::{AnnouncementsArgs, AnnouncementsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output::{detail_block, or_dash};

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct AnnouncementRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Pinned")]
    pinned: String,
    #[tabled(rename = "Posted")]
    posted: String,
}

impl From<&Arc<Announcement>> for AnnouncementRow {
    fn from(a: &Arc<Announcement>) -> Self {
        Self {
            id: a.id.to_string(),
            title: or_dash(a.title.as_deref()),
            category: or_dash(a.category.as_deref()),
            priority: or_dash(a.priority.as_deref()),
            pinned: if a.pinned() { "yes".into() } else { String::new() },
            posted: or_dash(a.created_at.as_deref()),
        }
    }
}

fn detail(a: &Arc<Announcement>) -> String {
    let mut block = detail_block(&[
        ("ID", a.id.to_string()),
        ("Title", or_dash(a.title.as_deref())),
        ("Category", or_dash(a.category.as_deref())),
        ("Priority", or_dash(a.priority.as_deref())),
        ("Pinned", a.pinned().to_string()),
        ("Recipients", or_dash(a.get("recipientType").and_then(serde_json::Value::as_str))),
        ("Posted", or_dash(a.created_at.as_deref())),
    ]);
    if let Some(ref content) = a.content {
        block.push_str("\n\n");
        block.push_str(content);
    }
    block
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    portal: &Portal,
    args: AnnouncementsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let store = portal.announcements();

    match args.command {
        AnnouncementsCommand::List(list) => {
            util::list(store, &list, global, |a| AnnouncementRow::from(a)).await
        }

        AnnouncementsCommand::Get { id } => {
            util::load_all(store, global).await?;
            util::show(&util::find(store, &id)?, global, detail);
            Ok(())
        }

        AnnouncementsCommand::Create {
            title,
            content,
            category,
            priority,
            recipients,
            classes,
            from_file,
        } => {
            let req: CreateAnnouncementRequest = if let Some(ref path) = from_file {
                serde_json::from_value(util::read_json_file(path)?)?
            } else {
                CreateAnnouncementRequest {
                    title: title.unwrap_or_default(),
                    content: content.unwrap_or_default(),
                    category,
                    priority,
                    recipient_type: recipients,
                    target_classes: classes,
                    extra: Extra::new(),
                }
            };
            let created = store.create(&req).await?;
            util::show(&created, global, detail);
            Ok(())
        }

        AnnouncementsCommand::Update {
            id,
            title,
            content,
            category,
            priority,
            recipients,
            classes,
            from_file,
        } => {
            let update: UpdateAnnouncementRequest = if let Some(ref path) = from_file {
                serde_json::from_value(util::read_json_file(path)?)?
            } else {
                UpdateAnnouncementRequest {
                    title,
                    content,
                    category,
                    priority,
                    recipient_type: recipients,
                    target_classes: classes,
                    extra: Extra::new(),
                }
            };
            util::load_all(store, global).await?;
            let updated = store.update(&EntityId::from(id), &update).await?;
            util::show(&updated, global, detail);
            Ok(())
        }

        AnnouncementsCommand::Delete { id } => {
            util::load_all(store, global).await?;
            let target = util::find(store, &id)?;
            if !util::confirm_delete("announcement", target.title.as_deref(), &target.id, global)? {
                return Ok(());
            }
            store.delete(&target.id).await?;
            Ok(())
        }

        AnnouncementsCommand::Pin { id } => {
            util::load_all(store, global).await?;
            let pinned = store.toggle_pin(&EntityId::from(id)).await?;
            util::show(&pinned, global, detail);
            Ok(())
        }
    }
}
