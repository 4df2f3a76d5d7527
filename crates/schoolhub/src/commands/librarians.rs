//! Librarian account command handlers.

use std::sync::Arc;

use tabled::Tabled;

use schoolhub_core::{
    CreateLibrarianRequest, EntityId, Extra, Librarian, Portal, UpdateLibrarianRequest,
};

use crate::cli::{GlobalOpts, LibrariansArgs, LibrariansCommand};
use crate::error::CliError;
use crate::output::{detail_block, or_dash};

use super::util;

#[derive(Tabled)]
struct LibrarianRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Employee ID")]
    employee_id: String,
}

impl From<&Arc<Librarian>> for LibrarianRow {
    fn from(l: &Arc<Librarian>) -> Self {
        Self {
            id: l.id.to_string(),
            name: or_dash(l.name.as_deref()),
            email: or_dash(l.email.as_deref()),
            phone: or_dash(l.phone.as_deref()),
            employee_id: or_dash(l.employee_id.as_deref()),
        }
    }
}

fn detail(l: &Arc<Librarian>) -> String {
    detail_block(&[
        ("ID", l.id.to_string()),
        ("Name", or_dash(l.name.as_deref())),
        ("Email", or_dash(l.email.as_deref())),
        ("Phone", or_dash(l.phone.as_deref())),
        ("Employee ID", or_dash(l.employee_id.as_deref())),
    ])
}

pub async fn handle(
    portal: &Portal,
    args: LibrariansArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let store = portal.librarians();

    match args.command {
        LibrariansCommand::List(list) => {
            util::list(store, &list, global, |l| LibrarianRow::from(l)).await
        }

        LibrariansCommand::Get { id } => {
            util::load_all(store, global).await?;
            util::show(&util::find(store, &id)?, global, detail);
            Ok(())
        }

        LibrariansCommand::Create {
            name,
            email,
            phone,
            employee_id,
        } => {
            let req = CreateLibrarianRequest {
                name,
                email,
                phone,
                employee_id,
                extra: Extra::new(),
            };
            let created = store.create(&req).await?;
            util::show(&created, global, detail);
            Ok(())
        }

        LibrariansCommand::Update {
            id,
            name,
            email,
            phone,
        } => {
            let update = UpdateLibrarianRequest {
                name,
                email,
                phone,
                extra: Extra::new(),
            };
            util::load_all(store, global).await?;
            let updated = store.update(&EntityId::from(id), &update).await?;
            util::show(&updated, global, detail);
            Ok(())
        }

        LibrariansCommand::Delete { id } => {
            util::load_all(store, global).await?;
            let target = util::find(store, &id)?;
            if !util::confirm_delete("librarian", target.name.as_deref(), &target.id, global)? {
                return Ok(());
            }
            store.delete(&target.id).await?;
            Ok(())
        }
    }
}
