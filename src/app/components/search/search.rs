use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

use crate::app::models::{Keyword, SelectionResult};

use super::SearchViewModel;

#[derive(Debug)]
pub enum SearchCommand {
    Search(String),
    Save(usize),
    Delete(usize),
    Select(SelectionResult),
    Marker,
    List,
    Quit,
}

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("Not a valid position: {0}")]
    BadPosition(String),
    #[error("Invalid selection payload: {0}")]
    BadPayload(#[from] serde_json::Error),
}

// Positions are 1-based, as displayed
fn parse_position(arg: &str) -> Result<usize, CommandError> {
    match usize::from_str(arg) {
        Ok(position) if position > 0 => Ok(position - 1),
        _ => Err(CommandError::BadPosition(arg.to_string())),
    }
}

impl FromStr for SearchCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (command, arg) = match line.find(char::is_whitespace) {
            Some(index) => (&line[..index], line[index..].trim()),
            None => (line, ""),
        };
        match (command, arg) {
            ("search", "") => Err(CommandError::MissingArgument("query")),
            ("search", query) => Ok(Self::Search(query.to_string())),
            ("save", "") => Err(CommandError::MissingArgument("position")),
            ("save", position) => Ok(Self::Save(parse_position(position)?)),
            ("delete", "") => Err(CommandError::MissingArgument("position")),
            ("delete", position) => Ok(Self::Delete(parse_position(position)?)),
            ("select", "") => Err(CommandError::MissingArgument("payload")),
            ("select", payload) => Ok(Self::Select(serde_json::from_str(payload)?)),
            ("marker", _) => Ok(Self::Marker),
            ("list", _) => Ok(Self::List),
            ("quit", _) | ("exit", _) => Ok(Self::Quit),
            (other, _) => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

pub fn format_keyword(keyword: &Keyword) -> String {
    format!(
        "{} ({}) [{}, {}]",
        keyword.name, keyword.address, keyword.x, keyword.y
    )
}

pub fn format_keywords(title: &str, keywords: &[Keyword]) -> String {
    if keywords.is_empty() {
        return format!("{}: none", title);
    }
    keywords
        .iter()
        .enumerate()
        .fold(format!("{}:", title), |acc, (i, keyword)| {
            format!("{}\n  {}. {}", acc, i + 1, format_keyword(keyword))
        })
}

fn format_optional(title: &str, keyword: &Option<Keyword>) -> String {
    match keyword {
        Some(keyword) => format!("{}: {}", title, format_keyword(keyword)),
        None => format!("{}: none", title),
    }
}

// Console front-end of the search screen
pub struct SearchScreen {
    model: Arc<SearchViewModel>,
}

impl SearchScreen {
    pub fn new(model: Arc<SearchViewModel>) -> Self {
        Self { model }
    }

    fn render_on_change<T, F>(mut receiver: watch::Receiver<T>, render: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&T) -> String + Send + 'static,
    {
        tokio::spawn(async move {
            while receiver.changed().await.is_ok() {
                let text = render(&*receiver.borrow());
                println!("{}", text);
            }
        });
    }

    /// Prints every later change of the screen state.
    pub fn start(&self) {
        Self::render_on_change(self.model.search_results().subscribe(), |results| {
            format_keywords("Results", results)
        });
        Self::render_on_change(self.model.saved_keywords().subscribe(), |saved| {
            format_keywords("Saved", saved)
        });
        Self::render_on_change(self.model.selected_keyword().subscribe(), |selected| {
            format_optional("Selected", selected)
        });
        Self::render_on_change(self.model.last_marker().subscribe(), |marker| {
            format_optional("Last marker", marker)
        });
    }

    pub fn render_initial_state(&self) -> String {
        format!(
            "{}\n{}",
            format_keywords("Saved", &self.model.saved_keywords().borrow()),
            format_optional("Last marker", &self.model.last_marker().borrow())
        )
    }

    /// Returns false once the user asked to leave.
    pub fn handle(&self, command: SearchCommand) -> bool {
        debug!("command: {:?}", &command);
        match command {
            SearchCommand::Search(query) => {
                let search = self.model.search(&query);
                tokio::spawn(async move {
                    match search.await {
                        Ok(Err(err)) => error!("Search failed: {}", err),
                        Err(err) => error!("Search task failed: {}", err),
                        Ok(Ok(())) => {}
                    }
                });
            }
            SearchCommand::Save(position) => {
                let keyword = self.model.search_results().borrow().get(position).cloned();
                match keyword {
                    Some(keyword) => self.model.save_keyword(&keyword),
                    None => warn!("No search result at position {}", position + 1),
                }
            }
            SearchCommand::Delete(position) => {
                let keyword = self.model.saved_keywords().borrow().get(position).cloned();
                match keyword {
                    Some(keyword) => self.model.delete_keyword(&keyword),
                    None => warn!("No saved keyword at position {}", position + 1),
                }
            }
            SearchCommand::Select(selection) => self.model.process_selection_result(selection),
            SearchCommand::Marker => self.model.load_last_marker_position(),
            SearchCommand::List => println!(
                "{}",
                format_keywords("Saved", &self.model.saved_keywords().borrow())
            ),
            SearchCommand::Quit => return false,
        }
        true
    }
}
