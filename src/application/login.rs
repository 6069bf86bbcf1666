use anyhow::Result;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;
use dialoguer::Password;
use dialoguer::Select;
use yansi::Paint;

use crate::domain::models::Session;
use crate::domain::services::auth::AuthService;
use crate::domain::services::credentials::CredentialStore;
use crate::infrastructure::api::ApiClient;
use crate::infrastructure::api::ClientError;

fn print_client_error(err: &ClientError) {
    match err {
        ClientError::Http { status, detail } => {
            eprintln!(
                "{}",
                Paint::red(format!(
                    "Error: {status} - {}",
                    detail.as_deref().unwrap_or("no detail provided")
                ))
            );
        }
        ClientError::Transport(inner) => {
            eprintln!("{}", Paint::red(format!("Unable to connect to server: {inner}")));
        }
    }
}

fn prompt_credentials() -> Result<(String, String)> {
    let email = Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt("Email")
        .interact_text()?;
    let password = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("Password")
        .interact()?;

    return Ok((email, password));
}

/// Restores a persisted session, or walks the user through login/register
/// until one succeeds. Runs before the terminal enters raw mode.
pub async fn ensure_session<S: CredentialStore>(
    auth: &AuthService<S>,
    client: &ApiClient,
) -> Result<Session> {
    if let Some(session) = auth.restore().await {
        tracing::debug!(user_email = session.user_email, "restored session");
        return Ok(session);
    }

    loop {
        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Welcome to Paperchat")
            .default(0)
            .items(&["Log in", "Create an account", "Quit"])
            .interact()?;

        match choice {
            0 => {
                let (email, password) = prompt_credentials()?;
                match auth.login(client, &email, &password).await {
                    Ok(session) => {
                        return Ok(session);
                    }
                    Err(err) => match err.downcast_ref::<ClientError>() {
                        Some(client_err) => print_client_error(client_err),
                        None => eprintln!("{}", Paint::red(format!("Login failed: {err}"))),
                    },
                }
            }
            1 => {
                let (email, password) = prompt_credentials()?;
                match auth.register(client, &email, &password).await {
                    Ok(()) => {
                        println!("Account created. You can log in now.");
                    }
                    Err(err) => print_client_error(&err),
                }
            }
            _ => {
                std::process::exit(0);
            }
        }
    }
}
