//! Interactive paging through the event listing.

use clap::Args;

use attendance_core::error::AppError;
use attendance_core::types::PageLimit;

use crate::client::{ApiClient, EventPages, EventQuery};
use crate::navigator::{CursorNavigator, PageSource};
use crate::output::{self, EventRow, OutputFormat};

/// Arguments for the browse command
#[derive(Debug, Args)]
pub struct BrowseArgs {
    /// Only events of this type code
    #[arg(short = 't', long = "type")]
    pub type_code: Option<String>,

    /// Only events recorded by this user
    #[arg(short, long)]
    pub created_by: Option<String>,

    /// Page size (1-100)
    #[arg(short, long, default_value_t = 25)]
    pub limit: i64,

    /// Print the first page and exit
    #[arg(long)]
    pub once: bool,
}

/// Menu entries, offered only when they apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Next,
    Previous,
    Reset,
    Quit,
}

impl Action {
    fn label(self) -> &'static str {
        match self {
            Self::Next => "Next page",
            Self::Previous => "Previous page",
            Self::Reset => "Back to first page",
            Self::Quit => "Quit",
        }
    }
}

fn available_actions(has_next: bool, has_prev: bool) -> Vec<Action> {
    let mut actions = Vec::with_capacity(4);
    if has_next {
        actions.push(Action::Next);
    }
    if has_prev {
        actions.push(Action::Previous);
        actions.push(Action::Reset);
    }
    actions.push(Action::Quit);
    actions
}

/// Execute the browse command
pub async fn execute(
    args: &BrowseArgs,
    client: &ApiClient,
    format: OutputFormat,
) -> Result<(), AppError> {
    let source = EventPages {
        client: client.clone(),
        query: EventQuery {
            type_code: args.type_code.clone(),
            created_by: args.created_by.clone(),
            limit: PageLimit::clamped(args.limit),
        },
    };
    let mut nav = CursorNavigator::new(source);
    nav.reset().await?;

    loop {
        show(&nav, format);
        if args.once {
            return Ok(());
        }

        let actions = available_actions(nav.has_next(), nav.has_prev());
        let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();
        let choice = dialoguer::Select::new()
            .with_prompt("Navigate")
            .items(&labels)
            .default(0)
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;

        let step = match actions[choice] {
            Action::Next => nav.go_next().await.map(|_| ()),
            Action::Previous => nav.go_prev().await.map(|_| ()),
            Action::Reset => nav.reset().await,
            Action::Quit => return Ok(()),
        };
        // A failed fetch leaves the current page in place.
        if let Err(e) = step {
            output::print_error(&e.message);
        }
    }
}

fn show<S>(nav: &CursorNavigator<S>, format: OutputFormat)
where
    S: PageSource<Row = attendance_entity::EventRecord>,
{
    let rows: Vec<EventRow> = nav.rows().iter().map(EventRow::from).collect();
    if format == OutputFormat::Table {
        output::print_kv("page", &nav.page_number().to_string());
    }
    output::print_list(&rows, format);
}
