//! Fee structure command handlers.

use std::fmt::Write as _;
use std::sync::Arc;

use tabled::Tabled;

use schoolhub_core::{
    CreateFeeStructureRequest, EntityId, Extra, FeeStructure, Portal, UpdateFeeStructureRequest,
};

use crate::cli::{FeesArgs, FeesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output::{detail_block, or_dash};

use super::util;

#[derive(Tabled)]
struct FeeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Class")]
    class: String,
    #[tabled(rename = "Year")]
    year: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Due")]
    due: String,
}

impl From<&Arc<FeeStructure>> for FeeRow {
    fn from(f: &Arc<FeeStructure>) -> Self {
        Self {
            id: f.id.to_string(),
            name: or_dash(f.name.as_deref()),
            class: or_dash(f.class_name.as_deref()),
            year: or_dash(f.academic_year.as_deref()),
            total: format!("{:.2}", f.total()),
            due: or_dash(f.due_date.as_deref()),
        }
    }
}

fn detail(f: &Arc<FeeStructure>) -> String {
    let mut block = detail_block(&[
        ("ID", f.id.to_string()),
        ("Name", or_dash(f.name.as_deref())),
        ("Class", or_dash(f.class_name.as_deref())),
        ("Year", or_dash(f.academic_year.as_deref())),
        ("Due", or_dash(f.due_date.as_deref())),
        ("Total", format!("{:.2}", f.total())),
    ]);
    let components = f.components();
    if !components.is_empty() {
        block.push_str("\n\nComponents:");
        let width = components.iter().map(|c| c.name.len()).max().unwrap_or(0);
        for c in components {
            let _ = write!(block, "\n  {:<width$}  {:>10.2}", c.name, c.amount);
        }
    }
    block
}

pub async fn handle(portal: &Portal, args: FeesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let store = portal.fee_structures();

    match args.command {
        FeesCommand::List(list) => util::list(store, &list, global, |f| FeeRow::from(f)).await,

        FeesCommand::Get { id } => {
            util::load_all(store, global).await?;
            util::show(&util::find(store, &id)?, global, detail);
            Ok(())
        }

        FeesCommand::Create {
            name,
            class,
            academic_year,
            components,
            due_date,
            from_file,
        } => {
            let req: CreateFeeStructureRequest = if let Some(ref path) = from_file {
                serde_json::from_value(util::read_json_file(path)?)?
            } else {
                CreateFeeStructureRequest {
                    name: name.unwrap_or_default(),
                    class_name: class.unwrap_or_default(),
                    academic_year,
                    components: util::parse_components(&components)?,
                    due_date,
                    extra: Extra::new(),
                }
            };
            let created = store.create(&req).await?;
            util::show(&created, global, detail);
            Ok(())
        }

        FeesCommand::Update {
            id,
            name,
            class,
            academic_year,
            components,
            due_date,
            from_file,
        } => {
            let update: UpdateFeeStructureRequest = if let Some(ref path) = from_file {
                serde_json::from_value(util::read_json_file(path)?)?
            } else {
                UpdateFeeStructureRequest {
                    name,
                    class_name: class,
                    academic_year,
                    components: if components.is_empty() {
                        None
                    } else {
                        Some(util::parse_components(&components)?)
                    },
                    due_date,
                    extra: Extra::new(),
                }
            };
            util::load_all(store, global).await?;
            let updated = store.update(&EntityId::from(id), &update).await?;
            util::show(&updated, global, detail);
            Ok(())
        }

        FeesCommand::Delete { id } => {
            util::load_all(store, global).await?;
            let target = util::find(store, &id)?;
            if !util::confirm_delete("fee structure", target.name.as_deref(), &target.id, global)?
            {
                return Ok(());
            }
            store.delete(&target.id).await?;
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn row_shows_full_id_and_component_total() {
        let fee: FeeStructure = serde_json::from_value(serde_json::json!({
            "_id": "65f0c2a1b4d3e8f901234567",
            "class": "10",
            "components": [{ "name": "Tuition", "amount": 1200 }, { "name": "Lab", "amount": 150.5 }]
        }))
        .unwrap();
        let row = FeeRow::from(&Arc::new(fee));
        assert_eq!(row.id, "65f0c2a1b4d3e8f901234567");
        assert_eq!(row.name, "-");
        assert_eq!(row.total, "1350.50");
    }
}
