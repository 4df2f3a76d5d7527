//! Library command handlers: books, borrow requests, issues.

use std::sync::Arc;

use tabled::Tabled;

use schoolhub_core::{
    Book, BookIssue, BookRequest, CreateBookIssueRequest, CreateBookRequest, EntityId, Extra,
    Portal, UpdateBookRequest,
};

use crate::cli::{
    BooksArgs, BooksCommand, GlobalOpts, IssuesArgs, IssuesCommand, LibraryArgs, LibraryCommand,
    RequestsArgs, RequestsCommand,
};
use crate::error::CliError;
use crate::output::{detail_block, or_dash};

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct BookRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Available")]
    available: String,
}

impl From<&Arc<Book>> for BookRow {
    fn from(b: &Arc<Book>) -> Self {
        Self {
            id: b.id.to_string(),
            title: or_dash(b.title.as_deref()),
            author: or_dash(b.author.as_deref()),
            category: or_dash(b.category.as_deref()),
            available: copies(b),
        }
    }
}

#[derive(Tabled)]
struct RequestRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Book")]
    book: String,
    #[tabled(rename = "Student")]
    student: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Requested")]
    requested: String,
}

impl From<&Arc<BookRequest>> for RequestRow {
    fn from(r: &Arc<BookRequest>) -> Self {
        Self {
            id: r.id.to_string(),
            book: r.book_label().to_owned(),
            student: r.student_label().to_owned(),
            status: or_dash(r.status.as_deref()),
            requested: or_dash(r.created_at.as_deref()),
        }
    }
}

#[derive(Tabled)]
struct IssueRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Book")]
    book: String,
    #[tabled(rename = "Student")]
    student: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Returned")]
    returned: String,
    #[tabled(rename = "Fine")]
    fine: String,
}

impl From<&Arc<BookIssue>> for IssueRow {
    fn from(i: &Arc<BookIssue>) -> Self {
        Self {
            id: i.id.to_string(),
            book: i.book_label().to_owned(),
            student: i.student_label().to_owned(),
            due: or_dash(i.due_date.as_deref()),
            returned: if i.is_returned() {
                i.return_date.clone().unwrap_or_else(|| "yes".into())
            } else {
                String::new()
            },
            fine: i.fine.filter(|f| *f > 0.0).map(|f| format!("{f:.2}")).unwrap_or_default(),
        }
    }
}

fn copies(b: &Book) -> String {
    match (b.available_copies, b.total_copies) {
        (Some(available), Some(total)) => format!("{available}/{total}"),
        (Some(n), None) | (None, Some(n)) => n.to_string(),
        (None, None) => "-".into(),
    }
}

fn book_detail(b: &Arc<Book>) -> String {
    detail_block(&[
        ("ID", b.id.to_string()),
        ("Title", or_dash(b.title.as_deref())),
        ("Author", or_dash(b.author.as_deref())),
        ("ISBN", or_dash(b.isbn.as_deref())),
        ("Category", or_dash(b.category.as_deref())),
        ("Copies", copies(b)),
    ])
}

fn request_detail(r: &Arc<BookRequest>) -> String {
    detail_block(&[
        ("ID", r.id.to_string()),
        ("Book", r.book_label().to_owned()),
        ("Student", r.student_label().to_owned()),
        ("Status", or_dash(r.status.as_deref())),
    ])
}

fn issue_detail(i: &Arc<BookIssue>) -> String {
    detail_block(&[
        ("ID", i.id.to_string()),
        ("Book", i.book_label().to_owned()),
        ("Student", i.student_label().to_owned()),
        ("Issued", or_dash(i.issue_date.as_deref())),
        ("Due", or_dash(i.due_date.as_deref())),
        ("Returned", or_dash(i.return_date.as_deref())),
    ])
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle(portal: &Portal, args: LibraryArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        LibraryCommand::Books(args) => books(portal, args, global).await,
        LibraryCommand::Requests(args) => requests(portal, args, global).await,
        LibraryCommand::Issues(args) => issues(portal, args, global).await,
    }
}

async fn books(portal: &Portal, args: BooksArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let store = portal.books();

    match args.command {
        BooksCommand::List(list) => util::list(store, &list, global, |b| BookRow::from(b)).await,

        BooksCommand::Get { id } => {
            util::load_all(store, global).await?;
            util::show(&util::find(store, &id)?, global, book_detail);
            Ok(())
        }

        BooksCommand::Create {
            title,
            author,
            isbn,
            category,
            copies,
            from_file,
        } => {
            let req: CreateBookRequest = if let Some(ref path) = from_file {
                serde_json::from_value(util::read_json_file(path)?)?
            } else {
                CreateBookRequest {
                    title: title.unwrap_or_default(),
                    author: author.unwrap_or_default(),
                    isbn,
                    category,
                    total_copies: copies,
                    extra: Extra::new(),
                }
            };
            let created = store.create(&req).await?;
            util::show(&created, global, book_detail);
            Ok(())
        }

        BooksCommand::Update {
            id,
            title,
            author,
            isbn,
            category,
            copies,
            from_file,
        } => {
            let update: UpdateBookRequest = if let Some(ref path) = from_file {
                serde_json::from_value(util::read_json_file(path)?)?
            } else {
                UpdateBookRequest {
                    title,
                    author,
                    isbn,
                    category,
                    total_copies: copies,
                    extra: Extra::new(),
                }
            };
            util::load_all(store, global).await?;
            let updated = store.update(&EntityId::from(id), &update).await?;
            util::show(&updated, global, book_detail);
            Ok(())
        }

        BooksCommand::Delete { id } => {
            util::load_all(store, global).await?;
            let target = util::find(store, &id)?;
            if !util::confirm_delete("book", target.title.as_deref(), &target.id, global)? {
                return Ok(());
            }
            store.delete(&target.id).await?;
            Ok(())
        }
    }
}

async fn requests(
    portal: &Portal,
    args: RequestsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let store = portal.book_requests();

    match args.command {
        RequestsCommand::List(list) => {
            util::list(store, &list, global, |r| RequestRow::from(r)).await
        }

        RequestsCommand::Approve { id } => {
            util::load_all(store, global).await?;
            let approved = store.approve(&EntityId::from(id)).await?;
            util::show(&approved, global, request_detail);
            Ok(())
        }

        RequestsCommand::Reject { id, reason } => {
            util::load_all(store, global).await?;
            let target = util::find(store, &id)?;
            let prompt = format!(
                "Reject {}'s request for '{}'?",
                target.student_label(),
                target.book_label()
            );
            if !util::confirm(&prompt, global.yes)? {
                return Ok(());
            }
            let rejected = store.reject(&target.id, reason.as_deref()).await?;
            util::show(&rejected, global, request_detail);
            Ok(())
        }
    }
}

async fn issues(portal: &Portal, args: IssuesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let store = portal.book_issues();

    match args.command {
        IssuesCommand::List(list) => util::list(store, &list, global, |i| IssueRow::from(i)).await,

        IssuesCommand::Create { book, student, due } => {
            let req = CreateBookIssueRequest {
                book_id: EntityId::from(book),
                student_id: EntityId::from(student),
                due_date: due,
                extra: Extra::new(),
            };
            let issued = store.create(&req).await?;
            util::show(&issued, global, issue_detail);
            Ok(())
        }

        IssuesCommand::Return { id } => {
            util::load_all(store, global).await?;
            let returned = store.return_book(&EntityId::from(id)).await?;
            util::show(&returned, global, issue_detail);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(available: Option<u32>, total: Option<u32>) -> Book {
        serde_json::from_value(serde_json::json!({
            "_id": "b1",
            "title": "Dune",
            "availableCopies": available,
            "totalCopies": total,
        }))
        .unwrap_or_else(|e| panic!("fixture: {e}"))
    }

    #[test]
    fn copies_shows_available_over_total() {
        assert_eq!(copies(&book(Some(2), Some(5))), "2/5");
        assert_eq!(copies(&book(None, Some(5))), "5");
        assert_eq!(copies(&book(None, None)), "-");
    }
}
