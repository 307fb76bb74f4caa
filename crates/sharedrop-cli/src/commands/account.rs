//! Account commands: signup, login, logout, whoami, profile.

use clap::Args;

use sharedrop_core::error::AppError;
use sharedrop_core::types::ProfileUpdate;

use crate::context::CliContext;
use crate::output::{self, OutputFormat};

/// Arguments for signup and login
#[derive(Debug, Args)]
pub struct CredentialArgs {
    /// Email address
    #[arg(short, long)]
    pub email: String,

    /// Password (will prompt if not provided)
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Arguments for the profile command
#[derive(Debug, Args)]
pub struct ProfileArgs {
    /// New nickname
    #[arg(long)]
    pub nickname: Option<String>,

    /// New biography
    #[arg(long)]
    pub bio: Option<String>,

    /// New avatar URL
    #[arg(long)]
    pub avatar_url: Option<String>,
}

impl ProfileArgs {
    fn update(&self) -> ProfileUpdate {
        ProfileUpdate {
            nickname: self.nickname.clone(),
            bio: self.bio.clone(),
            avatar_url: self.avatar_url.clone(),
        }
    }
}

fn password(args: &CredentialArgs, confirm: bool) -> Result<String, AppError> {
    if let Some(password) = &args.password {
        return Ok(password.clone());
    }
    let mut prompt = dialoguer::Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    prompt
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {}", e)))
}

/// Create an account and keep its session.
pub async fn signup(ctx: &CliContext, args: &CredentialArgs) -> Result<(), AppError> {
    let password = password(args, true)?;
    ctx.session.sign_up(&args.email, &password).await?;
    ctx.persist_session().await?;
    output::print_success(&format!("Account created for {}", args.email));
    Ok(())
}

/// Sign in and keep the session.
pub async fn login(ctx: &CliContext, args: &CredentialArgs) -> Result<(), AppError> {
    let password = password(args, false)?;
    ctx.session.sign_in(&args.email, &password).await?;
    ctx.persist_session().await?;
    output::print_success(&format!("Signed in as {}", args.email));
    Ok(())
}

/// Sign out. The saved session is removed even when the remote call fails.
pub async fn logout(ctx: &CliContext) -> Result<(), AppError> {
    ctx.session.sign_out().await?;
    ctx.persist_session().await?;
    output::print_success("Signed out");
    Ok(())
}

/// Show the signed-in user.
pub async fn whoami(ctx: &CliContext, format: OutputFormat) -> Result<(), AppError> {
    ctx.require_user().await?;
    let snapshot = ctx.session.snapshot().await;

    match format {
        OutputFormat::Json => output::print_json(&snapshot),
        OutputFormat::Table => {
            if let Some(user) = &snapshot.user {
                output::print_kv("Name", snapshot.display_name().unwrap_or_default());
                output::print_kv("Email", &user.email);
                output::print_kv("User ID", user.id.as_str());
                if let Some(role) = &user.role {
                    output::print_kv("Role", role);
                }
            }
        }
    }
    Ok(())
}

/// Show the profile, or update it when any field is given.
pub async fn profile(
    ctx: &CliContext,
    args: &ProfileArgs,
    format: OutputFormat,
) -> Result<(), AppError> {
    ctx.require_user().await?;

    let update = args.update();
    if update.is_empty() {
        ctx.session.refresh_profile().await?;
    } else {
        ctx.session.update_profile(&update).await?;
        output::print_success("Profile updated");
    }

    let profile = ctx.session.snapshot().await.profile;
    match (format, profile) {
        (OutputFormat::Json, profile) => output::print_json(&profile),
        (OutputFormat::Table, Some(profile)) => {
            output::print_kv("Nickname", profile.nickname.as_deref().unwrap_or("-"));
            output::print_kv("Bio", profile.bio.as_deref().unwrap_or("-"));
            output::print_kv("Avatar", profile.avatar_url.as_deref().unwrap_or("-"));
        }
        (OutputFormat::Table, None) => println!("No profile yet."),
    }
    Ok(())
}
