use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use clap::Parser as _;

use clubshelf::api::HttpReadingListBackend;
use clubshelf::cli::{
    AddArgs, Cli, Command, LibraryCommand, LoginArgs, MoveArgs, RemoveArgs, ShowArgs,
    SignupArgs,
};
use clubshelf::credentials::EnvTokenSource;
use clubshelf::library::LibraryStore;
use clubshelf::model::NewBook;
use clubshelf::view::render_library;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    clubshelf::logging::init().context("init logging")?;

    let cli = Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        Command::Login(args) => login(args).await.context("login")?,
        Command::Signup(args) => signup(args).await.context("signup")?,
        Command::Library { command } => match command {
            LibraryCommand::Show(args) => library_show(args).await.context("library show")?,
            LibraryCommand::Move(args) => library_move(args).await.context("library move")?,
            LibraryCommand::Remove(args) => {
                library_remove(args).await.context("library remove")?;
            }
            LibraryCommand::Add(args) => library_add(args).await.context("library add")?,
        },
    }

    Ok(())
}

async fn login(args: LoginArgs) -> anyhow::Result<()> {
    let base_url = resolve_base_url(args.base_url)?;
    let client = http_client()?;
    let token =
        clubshelf::auth::login(&client, &base_url, &args.username, &args.password).await?;
    tracing::info!("signed in; export CLUBSHELF_TOKEN to use the library commands");
    println!("{token}");
    Ok(())
}

async fn signup(args: SignupArgs) -> anyhow::Result<()> {
    let base_url = resolve_base_url(args.base_url)?;
    let client = http_client()?;
    clubshelf::auth::signup(&client, &base_url, &args.username, &args.email, &args.password)
        .await?;
    println!("Signup successful! Please log in.");
    Ok(())
}

async fn library_show(args: ShowArgs) -> anyhow::Result<()> {
    let store = store_for(args.base_url)?;
    store.load().await.context("load reading list")?;
    if let Some(snapshot) = store.snapshot() {
        print!("{}", render_library(&snapshot));
    }
    Ok(())
}

async fn library_move(args: MoveArgs) -> anyhow::Result<()> {
    let store = store_for(args.base_url)?;
    store.load().await.context("load reading list")?;
    store.move_book(&args.book, args.from, args.to).await?;
    println!("Moved book {} from {} to {}.", args.book, args.from, args.to);
    if let Some(snapshot) = store.snapshot() {
        print!("{}", render_library(&snapshot));
    }
    Ok(())
}

async fn library_remove(args: RemoveArgs) -> anyhow::Result<()> {
    let store = store_for(args.base_url)?;
    store.load().await.context("load reading list")?;
    store.remove_book(&args.book, args.from).await?;
    println!("Removed book {} from {}.", args.book, args.from);
    if let Some(snapshot) = store.snapshot() {
        print!("{}", render_library(&snapshot));
    }
    Ok(())
}

async fn library_add(args: AddArgs) -> anyhow::Result<()> {
    let store = store_for(args.base_url)?;
    let book = NewBook {
        title: args.title,
        author: args.author,
        cover_image: args.cover,
        description: args.description,
    };
    store.add_book(&book, args.to).await?;
    println!("Added \"{}\" to {}.", book.title, args.to);
    Ok(())
}

fn resolve_base_url(flag: Option<String>) -> anyhow::Result<String> {
    let raw = match flag {
        Some(value) => value,
        None => std::env::var("CLUBSHELF_BASE_URL")
            .map_err(|_| anyhow::anyhow!("missing --base-url (or set CLUBSHELF_BASE_URL)"))?,
    };
    let base_url = raw.trim().trim_end_matches('/').to_owned();
    if base_url.is_empty() {
        anyhow::bail!("base url is empty");
    }
    Ok(base_url)
}

fn store_for(base_url_flag: Option<String>) -> anyhow::Result<LibraryStore> {
    let base_url = resolve_base_url(base_url_flag)?;
    let backend = HttpReadingListBackend::new(&base_url, Arc::new(EnvTokenSource::default()))
        .context("build backend client")?;
    Ok(LibraryStore::new(Arc::new(backend)))
}

fn http_client() -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .context("build http client")
}
