//! Meetspace CLI: command-line client for the Meetspace marketplace.
//!
//! Set MEETSPACE_API_URL (or API_URL). The logged-in identity is kept in
//! MEETSPACE_IDENTITY_PATH (default ~/.meetspace/identity.json).

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use meetspace_api_client::ApiClient;
use meetspace_cli::{
    cell, error_report, identity_storage, init_tracing, link_rows, truncate_string,
};
use meetspace_core::models::{
    Category, CreateEventRequest, Event, ImageType, Page, SocialLinks, VenueListItem,
};
use meetspace_core::{
    AuthenticatedIdentity, ClientConfig, FileIdentityStorage, IdentityStore, LoginForm,
    ProfileDetails, SignupForm, VenueDetails, DEFAULT_CITY,
};
use meetspace_services::{
    read_image_file, Catalog, CreatorFlow, EventQuery, LateWritePolicy, ProfileView, Profiles,
    StepOutcome, VenueFlow, VENUES_PAGE_SIZE,
};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "meetspace", about = "Meetspace marketplace CLI")]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value = "json", global = true)]
    format: Format,

    /// Identity file (overrides MEETSPACE_IDENTITY_PATH)
    #[arg(long, global = true)]
    identity: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Table,
}

#[derive(clap::Args)]
struct SignupArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
}

#[derive(clap::Args)]
struct ContactArgs {
    /// About text, up to 400 characters
    #[arg(long)]
    about: String,
    #[arg(long, default_value = DEFAULT_CITY)]
    city: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "")]
    work_email: String,
    /// Personal Telegram handle or link
    #[arg(long, default_value = "")]
    telegram: String,
}

#[derive(clap::Args)]
struct SocialArgs {
    #[arg(long, default_value = "")]
    tg_channel: String,
    #[arg(long, default_value = "")]
    vk: String,
    #[arg(long, default_value = "")]
    tiktok: String,
    #[arg(long, default_value = "")]
    youtube: String,
    #[arg(long, default_value = "")]
    dzen: String,
}

impl SocialArgs {
    fn links(&self) -> SocialLinks {
        SocialLinks {
            telegram_channel: self.tg_channel.clone(),
            vk: self.vk.clone(),
            tiktok: self.tiktok.clone(),
            youtube: self.youtube.clone(),
            dzen: self.dzen.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored identity
    Logout,
    /// Show the logged-in account
    Whoami,
    /// Register a creator account and fill in its profile
    RegisterCreator {
        #[command(flatten)]
        signup: SignupArgs,
        #[command(flatten)]
        contacts: ContactArgs,
        /// Avatar image file
        #[arg(long)]
        avatar: Option<PathBuf>,
        #[command(flatten)]
        social: SocialArgs,
    },
    /// Register a venue account and fill in its profile
    RegisterVenue {
        #[command(flatten)]
        signup: SignupArgs,
        #[command(flatten)]
        contacts: ContactArgs,
        /// Street address
        #[arg(long)]
        street: String,
        /// Logo image file
        #[arg(long)]
        logo: Option<PathBuf>,
        /// Cover image file
        #[arg(long)]
        cover: Option<PathBuf>,
        /// Supported event format (repeatable)
        #[arg(long = "event-format")]
        event_formats: Vec<String>,
        #[command(flatten)]
        social: SocialArgs,
    },
    /// Browse venues
    Venues {
        /// Page number, starting at 1
        #[arg(long, default_value = "1")]
        page: u32,
        /// Skip loading full details of sparse rows
        #[arg(long)]
        no_enrich: bool,
    },
    /// Browse published events
    Events {
        #[arg(long)]
        category: Option<i64>,
        /// Page number, starting at 1
        #[arg(long, default_value = "1")]
        page: u32,
        /// Only events of the logged-in creator
        #[arg(long)]
        mine: bool,
    },
    /// List event categories
    Categories,
    /// Show the profile of the logged-in account
    Profile,
    /// Event operations
    Event {
        #[command(subcommand)]
        sub: EventCommands,
    },
}

#[derive(Subcommand)]
enum EventCommands {
    /// Create an event
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// Category ID (repeatable)
        #[arg(long = "category")]
        categories: Vec<i64>,
        /// Cover image file
        #[arg(long)]
        cover: Option<PathBuf>,
    },
    /// Publish an event
    Publish { id: i64 },
    /// Archive an event
    Archive { id: i64 },
    /// Delete an event
    Delete { id: i64 },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

fn print_outcome(step: &str, outcome: &StepOutcome) {
    match outcome {
        StepOutcome::Advanced => tracing::debug!(step, "Step advanced"),
        StepOutcome::Degraded { reason } => {
            eprintln!("warning: {} was not saved: {}", step, reason)
        }
        StepOutcome::Abandoned => eprintln!("warning: {} was superseded", step),
    }
}

fn print_venue_table(page: &Page<VenueListItem>) {
    println!(
        "\n=== Venues (page {} of {}, {} total) ===\n",
        page.current_page(),
        page.total_pages().max(1),
        page.total
    );
    if page.items.is_empty() {
        println!("No venues found.");
        return;
    }
    println!(
        "{:<8} {:<30} {:<40} {:<40}",
        "User", "Name", "Address", "Description"
    );
    println!("{}", "-".repeat(120));
    for venue in &page.items {
        println!(
            "{:<8} {:<30} {:<40} {:<40}",
            venue.user_id,
            truncate_string(&venue.name, 30),
            cell(venue.display_address(), 40),
            cell(venue.description.as_deref(), 40),
        );
    }
    if page.has_next() {
        println!("\n... (more venues available, use --page to see more)");
    }
}

async fn print_event_table(
    catalog: &mut Catalog<'_>,
    events: &[Event],
    categories: &[Category],
) {
    if events.is_empty() {
        println!("No events found.");
        return;
    }
    println!(
        "{:<8} {:<40} {:<20} {:<24} {:<10}",
        "ID", "Title", "Category", "Creator", "Status"
    );
    println!("{}", "-".repeat(106));
    for event in events {
        let creator = catalog.creator_info(event.creator_id).await;
        println!(
            "{:<8} {:<40} {:<20} {:<24} {:<10}",
            event.id,
            truncate_string(&event.title, 40),
            cell(
                event.primary_category(categories).map(|c| c.name.as_str()),
                20
            ),
            truncate_string(&creator.name, 24),
            event.status.as_str(),
        );
    }
}

fn require_identity(
    store: &IdentityStore<FileIdentityStorage>,
) -> anyhow::Result<AuthenticatedIdentity> {
    store
        .current()
        .cloned()
        .context("Not logged in. Run `meetspace login` first")
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = %format!("{:#}", err), "Command failed");
            eprintln!("{}", error_report(&err));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ClientConfig::from_env().context("Invalid configuration")?;
    let client = ApiClient::from_config(&config).context(
        "Failed to create API client. Set MEETSPACE_API_URL (or API_URL)",
    )?;
    let mut identity = IdentityStore::hydrate(identity_storage(&config, cli.identity.clone()))
        .await
        .context("Failed to load stored identity")?;
    let policy: LateWritePolicy = config.late_write_policy;

    match cli.command {
        Commands::Login { email, password } => {
            let form = LoginForm::new(email, password).checked()?;
            let response = client.login(&form.email, &form.password).await?;
            let authenticated = AuthenticatedIdentity::from_login(&response);
            identity.login(authenticated.clone()).await?;
            print_json(&authenticated.user)?;
        }
        Commands::Logout => {
            identity.logout().await?;
            print_json(&serde_json::json!({ "success": true }))?;
        }
        Commands::Whoami => {
            let current = require_identity(&identity)?;
            print_json(&current.user)?;
        }
        Commands::RegisterCreator {
            signup,
            contacts,
            avatar,
            social,
        } => {
            let mut flow = CreatorFlow::new(&client, policy);
            let form = SignupForm::new(signup.name, signup.email, signup.password);
            print_outcome("account", &flow.create_account(form).await?);
            if let Some(path) = avatar {
                flow.select_avatar(&path).await?;
            }
            let details = ProfileDetails {
                description: contacts.about,
                city: contacts.city,
                phone: contacts.phone,
                work_email: contacts.work_email,
                telegram_personal: contacts.telegram,
            };
            print_outcome("profile", &flow.submit_profile(details).await?);
            let links = social.links();
            let outcome = if links.is_empty() {
                flow.skip_social_links()
            } else {
                flow.submit_social_links(links).await?
            };
            print_outcome("social links", &outcome);
            let authenticated = flow.complete(&mut identity).await?;
            print_json(&authenticated.user)?;
        }
        Commands::RegisterVenue {
            signup,
            contacts,
            street,
            logo,
            cover,
            event_formats,
            social,
        } => {
            let mut flow = VenueFlow::new(&client, policy);
            let form = SignupForm::new(signup.name, signup.email, signup.password);
            flow.start(form)?;
            if let Some(path) = logo {
                flow.select_logo(&path).await?;
            }
            if let Some(path) = cover {
                flow.select_cover(&path).await?;
            }
            let details = VenueDetails {
                description: contacts.about,
                city: contacts.city,
                street,
                phone: contacts.phone,
                work_email: contacts.work_email,
                telegram_personal: contacts.telegram,
                event_formats: event_formats.clone(),
            };
            print_outcome("profile", &flow.submit_profile(details).await?);
            let links = social.links();
            let outcome = if links.is_empty() && event_formats.is_empty() {
                flow.skip_social_links()
            } else {
                flow.submit_social_links(event_formats, links).await?
            };
            print_outcome("social links", &outcome);
            let authenticated = flow.complete(&mut identity).await?;
            print_json(&authenticated.user)?;
        }
        Commands::Venues { page, no_enrich } => {
            let catalog = Catalog::new(&client, identity.token().map(str::to_string));
            let offset = page.max(1).saturating_sub(1).saturating_mul(VENUES_PAGE_SIZE);
            let venues = catalog.venues(VENUES_PAGE_SIZE, offset, !no_enrich).await?;
            match cli.format {
                Format::Json => print_json(&venues)?,
                Format::Table => print_venue_table(&venues),
            }
        }
        Commands::Events {
            category,
            page,
            mine,
        } => {
            let mut catalog = Catalog::new(&client, identity.token().map(str::to_string));
            let events = if mine {
                let current = require_identity(&identity)?;
                let events = catalog.my_events(&current).await?;
                let count = events.len();
                Page::new(events, count as u64, count as u32, 0)
            } else {
                catalog
                    .events(EventQuery {
                        category_id: category,
                        page,
                        ..Default::default()
                    })
                    .await?
            };
            match cli.format {
                Format::Json => print_json(&events)?,
                Format::Table => {
                    let categories = catalog.categories().await.unwrap_or_else(|e| {
                        tracing::warn!(error = %e, "Categories unavailable");
                        Vec::new()
                    });
                    print_event_table(&mut catalog, &events.items, &categories).await;
                    if events.has_next() {
                        println!("\n... (more events available, use --page to see more)");
                    }
                }
            }
        }
        Commands::Categories => {
            let catalog = Catalog::new(&client, identity.token().map(str::to_string));
            let categories = catalog.categories().await?;
            match cli.format {
                Format::Json => print_json(&categories)?,
                Format::Table => {
                    for category in &categories {
                        println!("{:<8} {}", category.id, category.name);
                    }
                }
            }
        }
        Commands::Profile => {
            let current = require_identity(&identity)?;
            let view = Profiles::new(&client).own_profile(&current).await?;
            match (cli.format, &view) {
                (Format::Table, ProfileView::Creator(creator)) => {
                    println!("Name:        {}", creator.profile.name);
                    println!("About:       {}", cell(creator.profile.description.as_deref(), 80));
                    println!("Phone:       {}", cell(creator.profile.phone.as_deref(), 40));
                    println!("Work email:  {}", cell(creator.profile.work_email.as_deref(), 40));
                    println!(
                        "Avatar:      {}",
                        creator.avatar_id.map_or("-".to_string(), |id| id.to_string())
                    );
                    let profile = &creator.profile;
                    for row in link_rows(&[
                        ("Telegram", profile.tg_channel_link.as_deref()),
                        ("VK", profile.vk_link.as_deref()),
                        ("TikTok", profile.tiktok_link.as_deref()),
                        ("YouTube", profile.youtube_link.as_deref()),
                        ("Dzen", profile.dzen_link.as_deref()),
                    ]) {
                        println!("{}", row);
                    }
                }
                (Format::Table, ProfileView::Venue(venue)) => {
                    let address = venue
                        .profile
                        .street_address
                        .as_deref()
                        .or(venue.profile.address.as_deref());
                    println!("Name:        {}", venue.profile.name);
                    println!("About:       {}", cell(venue.profile.description.as_deref(), 80));
                    println!("Address:     {}", cell(address, 80));
                    println!("Phone:       {}", cell(venue.profile.phone.as_deref(), 40));
                    println!("Gallery:     {} photos", venue.gallery_ids.len());
                    let profile = &venue.profile;
                    for row in link_rows(&[
                        ("Telegram", profile.tg_channel_link.as_deref()),
                        ("VK", profile.vk_link.as_deref()),
                        ("TikTok", profile.tiktok_link.as_deref()),
                        ("YouTube", profile.youtube_link.as_deref()),
                        ("Dzen", profile.dzen_link.as_deref()),
                    ]) {
                        println!("{}", row);
                    }
                }
                _ => print_json(&view)?,
            }
        }
        Commands::Event { sub } => {
            let current = require_identity(&identity)?;
            let token = current.token.as_str();
            match sub {
                EventCommands::Create {
                    title,
                    description,
                    categories,
                    cover,
                } => {
                    let cover_photo_id = match cover {
                        Some(path) => {
                            let (file, bytes) = read_image_file(&path).await?;
                            let uploaded = client
                                .upload_image_bytes(
                                    bytes,
                                    &file.file_name,
                                    &file.content_type,
                                    ImageType::EventCover,
                                    token,
                                )
                                .await?;
                            Some(uploaded.id)
                        }
                        None => None,
                    };
                    let request = CreateEventRequest {
                        title,
                        description,
                        cover_photo_id,
                        category_ids: (!categories.is_empty()).then_some(categories),
                    };
                    let event = client.create_event(&request, token).await?;
                    print_json(&event)?;
                }
                EventCommands::Publish { id } => {
                    client.publish_event(id, token).await?;
                    print_json(&serde_json::json!({ "success": true, "id": id, "status": "published" }))?;
                }
                EventCommands::Archive { id } => {
                    client.archive_event(id, token).await?;
                    print_json(&serde_json::json!({ "success": true, "id": id, "status": "archived" }))?;
                }
                EventCommands::Delete { id } => {
                    client.delete_event(id, token).await?;
                    print_json(&serde_json::json!({
                        "success": true,
                        "message": format!("Event {} deleted", id)
                    }))?;
                }
            }
        }
    }

    Ok(())
}
