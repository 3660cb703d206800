//! Session commands: login, logout, whoami.

use clap::Args;
use serde_json::Value;

use irbana_client::{ApiClient, AuthApi, ProfileCache};
use irbana_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for login
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account e-mail (will prompt if not provided)
    #[arg(short, long)]
    pub email: Option<String>,
    /// Password (will prompt if not provided)
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Arguments for whoami
#[derive(Debug, Args)]
pub struct WhoamiArgs {
    /// Reload the profile from the server instead of the cached copy
    #[arg(long)]
    pub refresh: bool,
}

/// Sign in and store the session
pub async fn login(args: &LoginArgs, client: &ApiClient) -> Result<(), AppError> {
    let email = match &args.email {
        Some(e) => e.clone(),
        None => dialoguer::Input::new()
            .with_prompt("E-mail")
            .interact_text()
            .map_err(|e| AppError::internal(format!("Input error: {}", e)))?,
    };

    let password = match &args.password {
        Some(p) => p.clone(),
        None => dialoguer::Password::new()
            .with_prompt("Password")
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {}", e)))?,
    };

    let outcome = AuthApi::new(client.clone()).login(&email, &password).await?;
    let name = outcome
        .user
        .get("nome")
        .or_else(|| outcome.user.get("email"))
        .and_then(Value::as_str)
        .unwrap_or(&email);
    output::print_success(&format!("Signed in as {}", name));
    Ok(())
}

/// End the session
pub async fn logout(client: &ApiClient) -> Result<(), AppError> {
    if !client.is_authenticated().await? {
        output::print_warning("No active session");
        return Ok(());
    }
    AuthApi::new(client.clone()).logout().await?;
    output::print_success("Signed out");
    Ok(())
}

/// Show the signed-in user's profile
pub async fn whoami(
    args: &WhoamiArgs,
    client: &ApiClient,
    format: OutputFormat,
) -> Result<(), AppError> {
    if !client.is_authenticated().await? {
        return Err(AppError::authentication(
            "Not signed in. Run `irbana login` first.",
        ));
    }

    let profiles = ProfileCache::new(client.clone());
    let profile = if args.refresh {
        profiles.refresh().await?
    } else {
        profiles.get().await?
    };

    match format {
        OutputFormat::Json => output::print_item(profile.as_ref(), format),
        OutputFormat::Table => {
            let field = |key: &str| {
                profile
                    .user
                    .get(key)
                    .map(output::display_value)
                    .unwrap_or_default()
            };
            output::print_kv("Name", &field("nome"));
            output::print_kv("E-mail", &field("email"));
            output::print_kv("Role", &profile.role);
            output::print_kv("Level", &output::cell(profile.level));
            if let Some(name) = profile.perfil.as_ref().and_then(|p| p.nome.as_deref()) {
                output::print_kv("Profile", name);
            }
            output::print_kv("Permissions", &profile.permissions.len().to_string());
        }
    }
    Ok(())
}
