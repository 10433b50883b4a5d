use crate::auth::password;
use crate::auth::validation::RegisterRequest;
use crate::config::SeedUser;
use crate::error::AppResult;
use crate::models::NewUser;
use crate::registry::RegistryError;
use crate::state::AppState;

/// Create the configured seed accounts. Seeds go through the same validation
/// as registration; a username that already exists is skipped.
pub async fn seed_users(state: &AppState, seeds: &[SeedUser]) -> AppResult<usize> {
    let mut created = 0;

    for seed in seeds {
        let registration = RegisterRequest {
            username: seed.username.clone(),
            password: seed.password.clone(),
            first_name: seed.first_name.clone(),
            last_name: seed.last_name.clone(),
            profile_image: seed.profile_image.clone(),
        }
        .validate()?;

        let password_hash =
            password::hash_password(registration.password, state.config.auth.bcrypt_cost).await?;

        let result = state
            .users
            .insert(NewUser {
                username: registration.username,
                password_hash,
                first_name: registration.first_name,
                last_name: registration.last_name,
                profile_image: registration.profile_image,
            })
            .await;

        match result {
            Ok(user) => {
                tracing::info!("Seeded user {} (id {})", user.username, user.id);
                created += 1;
            }
            Err(RegistryError::UsernameTaken) => {
                tracing::warn!("Seed user {} already exists, skipping", seed.username);
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(created)
}
