//! Command handlers: build the client, call the service, print the result.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clipers_core::api::ProgressCallback;
use clipers_core::models::{Cliper, JobFilters, NewPost, ProfilePatch, User};
use clipers_core::services::PollSettings;
use clipers_core::utils::media_url;
use clipers_core::{
    ApiClient, ApiConfig, FileTokenStore, KeyringTokenStore, MemoryTokenStore, TokenStore,
};
use tracing::{info, warn};

use crate::cli::{
    Args, CliperCommands, Commands, CompanyCommands, FeedCommands, JobCommands, OutputFormat,
    ProfileCommands,
};
use crate::config::{Settings, StoreKind};
use crate::output::{emit, emit_list, emit_value};

const SESSION_EXPIRED_HINT: &str = "Session expired. Run `clipers login` to sign in again.";

pub async fn run(args: Args, settings: &mut Settings) -> Result<()> {
    let config = match args.api_url.as_deref().or(settings.api_url.as_deref()) {
        Some(url) => ApiConfig::new(url),
        None => ApiConfig::from_env(),
    };
    let store_kind = args.store.or(settings.token_store).unwrap_or_default();
    let tokens = open_store(store_kind)?;
    info!(base_url = config.base_url(), store = %store_kind, "Using API");

    let client = ApiClient::new(config, tokens)
        .context("Failed to create API client")?
        .on_auth_expired(|| eprintln!("{}", SESSION_EXPIRED_HINT));
    let format = args.output;

    match args.command {
        Commands::Login { email } => login(&client, settings, store_kind, email, format).await,
        Commands::Logout => {
            client.auth().logout().context("Failed to clear stored tokens")?;
            eprintln!("Logged out.");
            Ok(())
        }
        Commands::Status => status(&client, store_kind, format).await,
        Commands::Jobs { command } => jobs(&client, command, format).await,
        Commands::Clipers { command } => clipers(&client, command, format).await,
        Commands::Feed { command } => feed(&client, command, format).await,
        Commands::Profile { command } => profile(&client, command, format).await,
        Commands::Company { command } => company(&client, command, format).await,
    }
}

fn open_store(kind: StoreKind) -> Result<Arc<dyn TokenStore>> {
    let store: Arc<dyn TokenStore> = match kind {
        StoreKind::Memory => Arc::new(MemoryTokenStore::new()),
        StoreKind::File => Arc::new(
            FileTokenStore::in_default_dir().context("Could not locate the token directory")?,
        ),
        StoreKind::Keyring => {
            let keyring = KeyringTokenStore::new();
            if !keyring.is_available() {
                warn!("OS keychain not available, falling back to the token file");
                Arc::new(
                    FileTokenStore::in_default_dir()
                        .context("Could not locate the token directory")?,
                )
            } else {
                Arc::new(keyring)
            }
        }
    };
    Ok(store)
}

async fn login(
    client: &ApiClient,
    settings: &mut Settings,
    store_kind: StoreKind,
    email: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let email = match email.or_else(|| settings.last_email.clone()) {
        Some(email) => email,
        None => prompt("Email: ")?,
    };
    let password = rpassword::prompt_password(format!("Password for {}: ", email))
        .context("Failed to read password")?;

    let user = client
        .auth()
        .login(&email, &password)
        .await
        .context("Login failed")?;

    settings.last_email = Some(email.trim().to_string());
    settings.token_store = Some(store_kind);
    if let Err(e) = settings.save() {
        warn!("Failed to save settings: {}", e);
    }

    eprintln!("Logged in.");
    match user {
        Some(user) => emit(format, &user),
        None => Ok(()),
    }
}

async fn status(client: &ApiClient, store_kind: StoreKind, format: OutputFormat) -> Result<()> {
    let authenticated = client.auth().is_authenticated()?;
    let user = if authenticated {
        Some(client.auth().me().await.context("Failed to load the current user")?)
    } else {
        None
    };
    let report = serde_json::json!({
        "apiUrl": client.config().base_url(),
        "store": store_kind.to_string(),
        "authenticated": authenticated,
        "user": user,
    });
    emit_value(format, &report)
}

async fn jobs(client: &ApiClient, command: JobCommands, format: OutputFormat) -> Result<()> {
    let jobs = client.jobs();
    match command {
        JobCommands::Search {
            query,
            location,
            job_type,
            salary_min,
            salary_max,
            skills,
            industry,
            page,
        } => {
            let filters = JobFilters {
                location,
                job_type,
                salary_min,
                salary_max,
                skills,
                industry,
            };
            let result = jobs.search(&query, &filters, page).await?;
            if result.has_more {
                eprintln!("More results: --page {}", page + 1);
            }
            emit_list(format, &result.jobs)
        }
        JobCommands::Show { id } => emit(format, &jobs.get(&id).await?),
        JobCommands::Apply { id } => {
            jobs.apply(&id).await.with_context(|| format!("Failed to apply to job {}", id))?;
            eprintln!("Applied to job {}.", id);
            Ok(())
        }
        JobCommands::Matches { id } => emit_list(format, &jobs.matches(&id).await?),
        JobCommands::Applicants { id, ranked: true } => {
            emit_list(format, &jobs.ranked_applicants(&id).await?)
        }
        JobCommands::Applicants { id, ranked: false } => {
            emit_list(format, &jobs.applicants(&id).await?)
        }
        JobCommands::Mine => emit_list(format, &jobs.my_applications().await?),
        JobCommands::Delete { id } => {
            jobs.delete(&id).await?;
            eprintln!("Deleted job {}.", id);
            Ok(())
        }
    }
}

async fn clipers(client: &ApiClient, command: CliperCommands, format: OutputFormat) -> Result<()> {
    let service = client.clipers();
    let origin = client.config().origin().to_string();
    match command {
        CliperCommands::List { page, pages } => {
            let result = service.list_pages(page, pages).await?;
            if result.has_more {
                eprintln!("More results: --page {}", page + pages);
            }
            emit_list(format, &with_media_urls(result.clipers, &origin))
        }
        CliperCommands::Mine => emit_list(format, &with_media_urls(service.mine().await?, &origin)),
        CliperCommands::Show { id } => {
            let cliper = service.get(&id).await?;
            emit(format, &with_media_urls(vec![cliper], &origin)[0])
        }
        CliperCommands::Upload {
            path,
            title,
            description,
            wait,
        } => {
            if title.trim().is_empty() {
                bail!("A title is required");
            }
            let cliper = service
                .upload_file(&path, &title, &description, Some(progress_bar()))
                .await
                .with_context(|| format!("Failed to upload {}", path.display()))?;

            let cliper = if wait && !cliper.status.is_terminal() {
                eprintln!("Waiting for processing...");
                let processed = service
                    .wait_until_processed(&cliper.id, PollSettings::default())
                    .await;
                processed.unwrap_or(cliper)
            } else {
                cliper
            };
            emit(format, &with_media_urls(vec![cliper], &origin)[0])
        }
        CliperCommands::Delete { id } => {
            service.delete(&id).await?;
            eprintln!("Deleted cliper {}.", id);
            Ok(())
        }
    }
}

async fn feed(client: &ApiClient, command: FeedCommands, format: OutputFormat) -> Result<()> {
    let feed = client.feed();
    match command {
        FeedCommands::Posts { page } => {
            let result = feed.posts(page).await?;
            if result.has_more {
                eprintln!("More results: --page {}", page + 1);
            }
            emit_list(format, &result.posts)
        }
        FeedCommands::Post { content } => emit(format, &feed.create_post(&NewPost::text(content)).await?),
        FeedCommands::Like { id } => {
            feed.like(&id).await?;
            eprintln!("Liked post {}.", id);
            Ok(())
        }
        FeedCommands::Comments { id } => emit_list(format, &feed.comments(&id).await?),
        FeedCommands::Comment { id, content } => emit(format, &feed.add_comment(&id, &content).await?),
        FeedCommands::Edit { id, content } => emit(format, &feed.update_post(&id, &content).await?),
        FeedCommands::Delete { id } => {
            feed.delete_post(&id).await?;
            eprintln!("Deleted post {}.", id);
            Ok(())
        }
        FeedCommands::EditComment {
            post_id,
            comment_id,
            content,
        } => emit(format, &feed.update_comment(&post_id, &comment_id, &content).await?),
        FeedCommands::DeleteComment { post_id, comment_id } => {
            feed.delete_comment(&post_id, &comment_id).await?;
            eprintln!("Deleted comment {}.", comment_id);
            Ok(())
        }
    }
}

async fn profile(client: &ApiClient, command: ProfileCommands, format: OutputFormat) -> Result<()> {
    let profile = client.profile();
    let origin = client.config().origin().to_string();
    match command {
        ProfileCommands::Show => emit(format, &with_avatar_url(profile.load().await?, &origin)),
        ProfileCommands::Update {
            first_name,
            last_name,
            phone,
            address,
        } => {
            let patch = ProfilePatch {
                first_name,
                last_name,
                phone,
                address,
            };
            if patch.is_empty() {
                bail!("Nothing to update; pass at least one field");
            }
            emit(format, &with_avatar_url(profile.update(&patch).await?, &origin))
        }
        ProfileCommands::Avatar { path } => {
            let user = profile
                .upload_avatar_file(&path, Some(progress_bar()))
                .await
                .with_context(|| format!("Failed to upload {}", path.display()))?;
            emit(format, &with_avatar_url(user, &origin))
        }
        ProfileCommands::DeleteAvatar => {
            profile.delete_avatar().await?;
            eprintln!("Avatar removed.");
            Ok(())
        }
        ProfileCommands::Ats => {
            emit(format, &profile.ats_profile().await?)
        }
    }
}

async fn company(client: &ApiClient, command: CompanyCommands, format: OutputFormat) -> Result<()> {
    let companies = client.companies();
    let company = match command {
        CompanyCommands::Show { id } => companies.get(&id).await?,
        CompanyCommands::User { user_id } => companies.by_user(&user_id).await?,
    };
    emit(format, &company)
}

/// Replace backend-relative media paths with absolute URLs.
fn with_media_urls(clipers: Vec<Cliper>, origin: &str) -> Vec<Cliper> {
    clipers
        .into_iter()
        .map(|mut cliper| {
            cliper.video_url = Some(media_url(cliper.video_url.as_deref(), origin));
            cliper.thumbnail_url = Some(media_url(cliper.thumbnail_url.as_deref(), origin));
            cliper
        })
        .collect()
}

fn with_avatar_url(mut user: User, origin: &str) -> User {
    user.profile_image = Some(media_url(user.profile_image.as_deref(), origin));
    user
}

fn progress_bar() -> ProgressCallback {
    Arc::new(|percent: u8| {
        let mut stderr = io::stderr();
        let _ = write!(stderr, "\rUploading {:>3}%", percent);
        if percent >= 100 {
            let _ = writeln!(stderr);
        }
        let _ = stderr.flush();
    })
}

fn prompt(label: &str) -> Result<String> {
    eprint!("{}", label);
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let line = line.trim().to_string();
    if line.is_empty() {
        bail!("No input given");
    }
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_media_urls() {
        let cliper: Cliper = serde_json::from_value(serde_json::json!({
            "id": "c1",
            "videoUrl": "/uploads/c1.mp4",
            "thumbnailUrl": "https://cdn.example.com/c1.jpg"
        }))
        .unwrap();
        let resolved = with_media_urls(vec![cliper], "https://host");
        assert_eq!(resolved[0].video_url.as_deref(), Some("https://host/uploads/c1.mp4"));
        assert_eq!(
            resolved[0].thumbnail_url.as_deref(),
            Some("https://cdn.example.com/c1.jpg")
        );
    }

    #[test]
    fn test_with_avatar_url() {
        let user: User = serde_json::from_value(serde_json::json!({"id": "u1"})).unwrap();
        let user = with_avatar_url(user, "https://host");
        assert_eq!(user.profile_image.as_deref(), Some("/placeholder.svg"));
    }

    #[test]
    fn test_memory_store_starts_empty() {
        let store = open_store(StoreKind::Memory).unwrap();
        assert_eq!(store.access_token().unwrap(), None);
    }
}
