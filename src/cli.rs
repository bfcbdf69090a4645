use clap::{Args, Parser, Subcommand};

use crate::model::{BookId, Shelf};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Login(LoginArgs),
    Signup(SignupArgs),
    Library {
        #[command(subcommand)]
        command: LibraryCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum LibraryCommand {
    Show(ShowArgs),
    Move(MoveArgs),
    Remove(RemoveArgs),
    Add(AddArgs),
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Backend base URL (falls back to CLUBSHELF_BASE_URL).
    #[arg(long)]
    pub base_url: Option<String>,

    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub password: String,
}

#[derive(Debug, Args)]
pub struct SignupArgs {
    /// Backend base URL (falls back to CLUBSHELF_BASE_URL).
    #[arg(long)]
    pub base_url: Option<String>,

    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Backend base URL (falls back to CLUBSHELF_BASE_URL).
    #[arg(long)]
    pub base_url: Option<String>,
}

#[derive(Debug, Args)]
pub struct MoveArgs {
    /// Backend base URL (falls back to CLUBSHELF_BASE_URL).
    #[arg(long)]
    pub base_url: Option<String>,

    /// Id of the saved book to move.
    #[arg(long)]
    pub book: BookId,

    /// Shelf the book is currently on.
    #[arg(long, value_enum)]
    pub from: Shelf,

    /// Shelf to move the book to.
    #[arg(long, value_enum)]
    pub to: Shelf,
}

#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Backend base URL (falls back to CLUBSHELF_BASE_URL).
    #[arg(long)]
    pub base_url: Option<String>,

    /// Id of the saved book to remove.
    #[arg(long)]
    pub book: BookId,

    /// Shelf the book is currently on.
    #[arg(long, value_enum)]
    pub from: Shelf,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Backend base URL (falls back to CLUBSHELF_BASE_URL).
    #[arg(long)]
    pub base_url: Option<String>,

    #[arg(long)]
    pub title: String,

    /// Single author string; join multiple authors before passing it.
    #[arg(long)]
    pub author: Option<String>,

    /// Cover image URL or data:image/... URI.
    #[arg(long)]
    pub cover: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Shelf to save the book to.
    #[arg(long, value_enum)]
    pub to: Shelf,
}
