use std::path::Path;

use serde::Serialize;
use todoboard_persistence::CredentialStore;

use crate::cli::KeyAction;
use crate::output::{output_error, output_success};

#[derive(Debug, Serialize)]
struct KeyStatus {
    stored: bool,
    storage_path: String,
}

#[derive(Debug, Serialize)]
struct KeyCleared {
    removed: bool,
    storage_path: String,
}

pub async fn handle(credentials: &CredentialStore, storage_path: &Path, action: KeyAction) {
    let storage_path = storage_path.display().to_string();
    match action {
        KeyAction::Set { key } => match credentials.save(&key).await {
            Ok(()) => {
                tracing::info!("Stored API key in {}", storage_path);
                output_success(KeyStatus {
                    stored: true,
                    storage_path,
                });
            }
            Err(e) => output_error(&e.to_string()),
        },
        KeyAction::Clear => match credentials.clear().await {
            Ok(removed) => output_success(KeyCleared {
                removed,
                storage_path,
            }),
            Err(e) => output_error(&e.to_string()),
        },
        KeyAction::Status => {
            let stored = credentials.load().await.is_some();
            output_success(KeyStatus {
                stored,
                storage_path,
            });
        }
    }
}
