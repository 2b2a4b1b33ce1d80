use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::{
    db::UserStore,
    error::{AppError, AppResult},
    models::UserChanges,
};

/// Stored profile image ready to be served
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileImage {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

/// Final path component of a client-supplied file name
fn sanitize_file_name(file_name: &str) -> Option<&str> {
    file_name
        .rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
}

fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Removes a stored image, ignoring files that are already gone
pub async fn discard_file(path: &str) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => tracing::debug!(path = %path, "Removed profile image"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path, error = %e, "Failed to remove profile image"),
    }
}

/// Stores a new profile image for the user and returns its path
pub async fn upload(
    users: &dyn UserStore,
    upload_dir: &Path,
    user_id: Uuid,
    file_name: &str,
    bytes: &[u8],
) -> AppResult<String> {
    let user = users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let name = sanitize_file_name(file_name)
        .ok_or_else(|| AppError::InvalidInput("A file name is required".to_string()))?;

    tokio::fs::create_dir_all(upload_dir).await?;
    let path: PathBuf = upload_dir.join(format!("{}_{}", user.id, name));
    let stored = path.to_string_lossy().into_owned();

    tokio::fs::write(&path, bytes).await?;

    let previous = user.profile_image.as_deref();
    let changes = UserChanges {
        profile_image: Some(Some(stored.clone())),
        ..Default::default()
    };
    let saved = users
        .update(user.id, changes)
        .await
        .and_then(|updated| {
            updated.ok_or_else(|| AppError::NotFound("User not found".to_string()))
        });

    // The old image stays referenced until the new path is saved
    if let Err(e) = saved {
        if previous != Some(stored.as_str()) {
            discard_file(&stored).await;
        }
        return Err(e);
    }

    if let Some(previous) = previous {
        if previous != stored {
            discard_file(previous).await;
        }
    }

    tracing::info!(user_id = %user.id, path = %stored, size = bytes.len(), "Profile image stored");
    Ok(stored)
}

pub async fn image(users: &dyn UserStore, user_id: Uuid) -> AppResult<ProfileImage> {
    let user = users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let path = user
        .profile_image
        .ok_or_else(|| AppError::NotFound("No profile image".to_string()))?;

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound("Profile image file not found".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    Ok(ProfileImage {
        bytes,
        content_type: content_type_for(Path::new(&path)),
    })
}
