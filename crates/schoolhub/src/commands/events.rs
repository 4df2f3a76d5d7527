//! School event command handlers.

use std::sync::Arc;

use tabled::Tabled;

use schoolhub_core::{CreateEventRequest, EntityId, Event, Extra, Portal, UpdateEventRequest};

use crate::cli::{EventsArgs, EventsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output::{detail_block, or_dash};

use super::util;

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "RSVPs")]
    rsvps: String,
}

impl From<&Arc<Event>> for EventRow {
    fn from(e: &Arc<Event>) -> Self {
        Self {
            id: e.id.to_string(),
            title: or_dash(e.title.as_deref()),
            date: or_dash(e.date.as_deref()),
            location: or_dash(e.location.as_deref()),
            category: or_dash(e.category.as_deref()),
            rsvps: e.rsvp_count.map(|n| n.to_string()).unwrap_or_default(),
        }
    }
}

fn detail(e: &Arc<Event>) -> String {
    let mut block = detail_block(&[
        ("ID", e.id.to_string()),
        ("Title", or_dash(e.title.as_deref())),
        ("Date", or_dash(e.date.as_deref())),
        ("Ends", or_dash(e.end_date.as_deref())),
        ("Location", or_dash(e.location.as_deref())),
        ("Category", or_dash(e.category.as_deref())),
        (
            "RSVPs",
            e.rsvp_count.map_or_else(|| "-".into(), |n| n.to_string()),
        ),
    ]);
    if let Some(ref description) = e.description {
        block.push_str("\n\n");
        block.push_str(description);
    }
    block
}

pub async fn handle(portal: &Portal, args: EventsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let store = portal.events();

    match args.command {
        EventsCommand::List(list) => util::list(store, &list, global, |e| EventRow::from(e)).await,

        EventsCommand::Get { id } => {
            util::load_all(store, global).await?;
            util::show(&util::find(store, &id)?, global, detail);
            Ok(())
        }

        EventsCommand::Create {
            title,
            date,
            end_date,
            description,
            location,
            category,
            from_file,
        } => {
            let req: CreateEventRequest = if let Some(ref path) = from_file {
                serde_json::from_value(util::read_json_file(path)?)?
            } else {
                CreateEventRequest {
                    title: title.unwrap_or_default(),
                    date: date.unwrap_or_default(),
                    end_date,
                    description,
                    location,
                    category,
                    extra: Extra::new(),
                }
            };
            let created = store.create(&req).await?;
            util::show(&created, global, detail);
            Ok(())
        }

        EventsCommand::Update {
            id,
            title,
            date,
            end_date,
            description,
            location,
            category,
            from_file,
        } => {
            let update: UpdateEventRequest = if let Some(ref path) = from_file {
                serde_json::from_value(util::read_json_file(path)?)?
            } else {
                UpdateEventRequest {
                    title,
                    date,
                    end_date,
                    description,
                    location,
                    category,
                    extra: Extra::new(),
                }
            };
            util::load_all(store, global).await?;
            let updated = store.update(&EntityId::from(id), &update).await?;
            util::show(&updated, global, detail);
            Ok(())
        }

        EventsCommand::Delete { id } => {
            util::load_all(store, global).await?;
            let target = util::find(store, &id)?;
            if !util::confirm_delete("event", target.title.as_deref(), &target.id, global)? {
                return Ok(());
            }
            store.delete(&target.id).await?;
            Ok(())
        }

        EventsCommand::Rsvp { id, status } => {
            util::load_all(store, global).await?;
            let event = store.rsvp(&EntityId::from(id), status.as_deref()).await?;
            util::show(&event, global, detail);
            Ok(())
        }
    }
}
